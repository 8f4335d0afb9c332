//! ndbin-test - Test support for the ndbin crates
//!
//! Builders for the binary test images used by the regression tests:
//! ASCII-art patterns for exact expectations, seeded random images for
//! property tests, and a couple of parametric shapes. Everything is
//! deterministic; random images take an explicit seed.

use ndbin_core::BinaryImage;
use rand::rngs::StdRng;
use rand::{RngExt, SeedableRng};

/// Build a 2-D binary image from ASCII rows.
///
/// `#` and `x` mark foreground; everything else is background. All rows
/// must have the same length.
///
/// # Panics
///
/// Panics on empty or ragged input; test patterns are constants.
pub fn from_rows(rows: &[&str]) -> BinaryImage {
    let height = rows.len();
    let width = rows.first().map_or(0, |r| r.chars().count());
    assert!(height > 0 && width > 0, "pattern must be non-empty");
    let mut img = BinaryImage::new(&[height, width]).expect("pattern sizes are valid");
    for (y, row) in rows.iter().enumerate() {
        assert_eq!(row.chars().count(), width, "ragged pattern row {y}");
        for (x, ch) in row.chars().enumerate() {
            if ch == '#' || ch == 'x' {
                img.set(&[y, x], true);
            }
        }
    }
    img
}

/// Render a 2-D binary image as ASCII rows (`#` foreground, `.`
/// background), for readable assertion failures.
pub fn to_rows(img: &BinaryImage) -> Vec<String> {
    assert_eq!(img.dimensionality(), 2, "rendering is 2-D only");
    let (h, w) = (img.size(0), img.size(1));
    (0..h)
        .map(|y| {
            (0..w)
                .map(|x| if img.get(&[y, x]) { '#' } else { '.' })
                .collect()
        })
        .collect()
}

/// Random binary image with the given foreground density, reproducible
/// from the seed.
pub fn random_binary(sizes: &[usize], density: f64, seed: u64) -> BinaryImage {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut img = BinaryImage::new(sizes).expect("sizes are valid");
    let mut coords = vec![0usize; sizes.len()];
    loop {
        img.set(&coords, rng.random::<f64>() < density);
        let mut d = sizes.len();
        loop {
            if d == 0 {
                return img;
            }
            d -= 1;
            coords[d] += 1;
            if coords[d] < sizes[d] {
                break;
            }
            coords[d] = 0;
        }
    }
}

/// Axis-aligned filled box: foreground on `lo[d] <= c < hi[d]`.
pub fn filled_box(sizes: &[usize], lo: &[usize], hi: &[usize]) -> BinaryImage {
    let mut img = BinaryImage::new(sizes).expect("sizes are valid");
    let mut coords = lo.to_vec();
    if lo.iter().zip(hi).any(|(&l, &h)| l >= h) {
        return img;
    }
    loop {
        img.set(&coords, true);
        let mut d = sizes.len();
        loop {
            if d == 0 {
                return img;
            }
            d -= 1;
            coords[d] += 1;
            if coords[d] < hi[d] {
                break;
            }
            coords[d] = lo[d];
        }
    }
}

/// Number of pixels whose samples differ between two same-shaped images.
pub fn diff_count(a: &BinaryImage, b: &BinaryImage) -> usize {
    assert_eq!(a.sizes(), b.sizes(), "images must have the same shape");
    let mut count = 0;
    let mut coords = vec![0usize; a.sizes().len()];
    loop {
        if a.get(&coords) != b.get(&coords) {
            count += 1;
        }
        let mut d = coords.len();
        loop {
            if d == 0 {
                return count;
            }
            d -= 1;
            coords[d] += 1;
            if coords[d] < a.sizes()[d] {
                break;
            }
            coords[d] = 0;
        }
    }
}
