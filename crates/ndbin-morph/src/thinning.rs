//! Iterative thinning and thickening over interval arrays
//!
//! One pass applies every interval's sup-generating test in sequence to
//! the current image: thinning removes the matches, thickening adds
//! them. An optional mask restricts where pixels may change. The
//! iteration count bounds the number of passes; zero means run until a
//! whole pass over all intervals changes nothing. Thinning only removes
//! and thickening only adds, so convergence is guaranteed.

use crate::error::{MorphError, MorphResult};
use crate::hitmiss::{Expansion, sup_generating};
use crate::interval::Interval;
use crate::interval_sets::homotopic_thinning_intervals;
use ndbin_core::{BinaryImage, CoreError, SAMPLE_BIT};

/// Thin the foreground: iteratively remove sup-generating matches.
pub fn binary_thinning(
    input: &BinaryImage,
    mask: Option<&BinaryImage>,
    intervals: &[Interval],
    iterations: usize,
) -> MorphResult<BinaryImage> {
    iterate(input, mask, intervals, iterations, true)
}

/// Thicken the foreground: iteratively add sup-generating matches.
///
/// Thickening interval sets are typically the inverted duals of thinning
/// sets (see
/// [`homotopic_thickening_intervals`](crate::interval_sets::homotopic_thickening_intervals)).
pub fn binary_thickening(
    input: &BinaryImage,
    mask: Option<&BinaryImage>,
    intervals: &[Interval],
    iterations: usize,
) -> MorphResult<BinaryImage> {
    iterate(input, mask, intervals, iterations, false)
}

/// Topology-preserving skeletonization with the standard interval set.
pub fn homotopic_thinning(
    input: &BinaryImage,
    mask: Option<&BinaryImage>,
    iterations: usize,
) -> MorphResult<BinaryImage> {
    binary_thinning(input, mask, &homotopic_thinning_intervals(), iterations)
}

fn iterate(
    input: &BinaryImage,
    mask: Option<&BinaryImage>,
    intervals: &[Interval],
    iterations: usize,
    thin: bool,
) -> MorphResult<BinaryImage> {
    if intervals.is_empty() {
        return Err(MorphError::InvalidParameters(
            "interval array must not be empty".into(),
        ));
    }
    if let Some(mask) = mask
        && mask.sizes() != input.sizes()
    {
        return Err(CoreError::SizeMismatch {
            expected: input.sizes().to_vec(),
            actual: mask.sizes().to_vec(),
        }
        .into());
    }

    let mut out = input.clone();
    let mut pass = 0;
    loop {
        let mut changed = false;
        for interval in intervals {
            let mut matches = sup_generating(&out, interval, Expansion::Default)?;
            if let Some(mask) = mask {
                matches.and_with(mask)?;
            }
            changed |= apply_matches(&mut out, &matches, thin);
        }
        pass += 1;
        if !changed || (iterations != 0 && pass >= iterations) {
            break;
        }
    }
    Ok(out)
}

/// Remove (thin) or add (thicken) the matched pixels; reports whether
/// anything changed.
fn apply_matches(out: &mut BinaryImage, matches: &BinaryImage, thin: bool) -> bool {
    let mut changed = false;
    let dim = out.dimensionality() - 1;
    let n = out.size(dim);
    let out_stride = out.stride(dim);
    let m_stride = matches.stride(dim);
    for line in out.lines(dim) {
        let mut a = line.offset as isize;
        let mut b = matches.offset_of(&line.coords) as isize;
        for _ in 0..n {
            if matches.data()[b as usize] & SAMPLE_BIT != 0 {
                let byte = &mut out.data_mut()[a as usize];
                if thin {
                    if *byte & SAMPLE_BIT != 0 {
                        *byte &= !SAMPLE_BIT;
                        changed = true;
                    }
                } else if *byte & SAMPLE_BIT == 0 {
                    *byte |= SAMPLE_BIT;
                    changed = true;
                }
            }
            a += out_stride;
            b += m_stride;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval_sets::homotopic_thickening_intervals;

    fn blob(sizes: &[usize], y0: usize, y1: usize, x0: usize, x1: usize) -> BinaryImage {
        let mut img = BinaryImage::new(sizes).unwrap();
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(&[y, x], true);
            }
        }
        img
    }

    #[test]
    fn test_thinning_is_anti_extensive() {
        let img = blob(&[10, 10], 2, 8, 2, 8);
        let out = homotopic_thinning(&img, None, 0).unwrap();
        let mut extra = out.clone();
        extra.subtract(&img).unwrap();
        assert_eq!(extra.count_foreground(), 0);
        assert!(out.count_foreground() > 0);
    }

    #[test]
    fn test_thinning_converges_and_is_stable() {
        let img = blob(&[12, 12], 1, 11, 3, 9);
        let converged = homotopic_thinning(&img, None, 0).unwrap();
        let again = homotopic_thinning(&converged, None, 1).unwrap();
        assert!(again.equals(&converged));
    }

    #[test]
    fn test_thinning_iteration_limit() {
        let img = blob(&[12, 12], 1, 11, 1, 11);
        let one = homotopic_thinning(&img, None, 1).unwrap();
        let full = homotopic_thinning(&img, None, 0).unwrap();
        assert!(one.count_foreground() >= full.count_foreground());
        assert!(one.count_foreground() < img.count_foreground());
    }

    #[test]
    fn test_single_line_is_fixed_point() {
        let img = blob(&[7, 7], 3, 4, 1, 6);
        let out = homotopic_thinning(&img, None, 0).unwrap();
        assert!(out.equals(&img));
    }

    #[test]
    fn test_mask_restricts_changes() {
        let img = blob(&[10, 10], 2, 8, 2, 8);
        // Mask allows no change at all.
        let mask = BinaryImage::new(&[10, 10]).unwrap();
        let out = homotopic_thinning(&img, Some(&mask), 0).unwrap();
        assert!(out.equals(&img));
    }

    #[test]
    fn test_thickening_is_extensive() {
        let img = blob(&[10, 10], 3, 6, 3, 6);
        let out =
            binary_thickening(&img, None, &homotopic_thickening_intervals(), 2).unwrap();
        let mut lost = img.clone();
        lost.subtract(&out).unwrap();
        assert_eq!(lost.count_foreground(), 0);
        assert!(out.count_foreground() > img.count_foreground());
    }

    #[test]
    fn test_empty_intervals_rejected() {
        let img = blob(&[5, 5], 1, 4, 1, 4);
        assert!(binary_thinning(&img, None, &[], 0).is_err());
    }

    #[test]
    fn test_mask_size_mismatch_rejected() {
        let img = blob(&[5, 5], 1, 4, 1, 4);
        let mask = BinaryImage::new(&[6, 5]).unwrap();
        assert!(homotopic_thinning(&img, Some(&mask), 0).is_err());
    }
}
