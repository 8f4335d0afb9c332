//! Standard interval libraries for thinning, thickening and pixel
//! classification
//!
//! Each set is built from a small number of base patterns plus the
//! rotation generator; the interleaved ordering keeps opposite angles
//! adjacent so the thinning passes alternate sides and erode shapes
//! evenly.
//!
//! Pattern strings use `x` for hit, `o` for miss and `.` for don't-care,
//! one row per line.

use crate::interval::{Interval, IntervalElement, RotationOrder, invert_interval_array};
use ndbin_core::BinaryImage;

// Golay-style thinning pair: an edge pattern and a corner pattern.
// Their 45-degree rotations remove boundary pixels from all eight
// directions without breaking connectivity.
const HOMOTOPIC_1: &str = "ooo\n.x.\nxxx";
const HOMOTOPIC_2: &str = ".oo\nxxo\n.x.";

// Line end with exactly one neighbor; the relaxed variant leaves the
// positions beside the neighbor free so diagonal line ends match too.
const END_PIXEL: &str = "ooo\noxo\n.x.";
const END_PIXEL_STRICT: &str = "ooo\noxo\noxo";

// Junction patterns: three branches leaving the center.
const BRANCH_1: &str = "x.x\n.x.\n.x.";
const BRANCH_2: &str = "x.x\n.x.\nx..";

// Foreground pixel with at least one edge-connected background neighbor.
const BOUNDARY_PIXEL: &str = "...\n.xo\n...";

fn pattern(s: &str) -> Interval {
    Interval::from_string(s).expect("pattern constant is valid")
}

fn rotations(s: &str, step: u32, order: RotationOrder) -> Vec<Interval> {
    pattern(s)
        .rotated_versions(step, order)
        .expect("pattern constant is 2-D")
}

/// Interval matching isolated foreground pixels: center hit, every
/// neighbor of the unit cube miss. Defined for any dimensionality.
pub fn single_pixel_interval(ndims: usize) -> Interval {
    assert!(ndims > 0, "dimensionality must be positive");
    let sizes = vec![3usize; ndims];
    let n: usize = sizes.iter().product();
    let mut elements = vec![IntervalElement::Miss; n];
    elements[n / 2] = IntervalElement::Hit;
    Interval::from_elements(&sizes, elements).expect("single-pixel interval is valid")
}

/// The sixteen intervals of homotopic (topology-preserving) thinning.
pub fn homotopic_thinning_intervals() -> Vec<Interval> {
    let mut set = rotations(HOMOTOPIC_1, 45, RotationOrder::InterleavedClockwise);
    set.extend(rotations(HOMOTOPIC_2, 45, RotationOrder::InterleavedClockwise));
    set
}

/// The dual set: homotopic thickening of the foreground.
pub fn homotopic_thickening_intervals() -> Vec<Interval> {
    let mut set = homotopic_thinning_intervals();
    invert_interval_array(&mut set);
    set
}

/// Intervals matching line end pixels in any of the eight directions.
pub fn end_pixel_intervals() -> Vec<Interval> {
    rotations(END_PIXEL, 45, RotationOrder::InterleavedClockwise)
}

/// Strict end-pixel intervals: exactly one edge-connected neighbor.
///
/// Used by thinning variants that erode end pixels, where the relaxed
/// patterns would also match across diagonal joins.
pub fn homotopic_end_pixel_intervals() -> Vec<Interval> {
    rotations(END_PIXEL_STRICT, 45, RotationOrder::InterleavedClockwise)
}

/// Intervals matching skeleton branch (junction) pixels.
pub fn branch_pixel_intervals() -> Vec<Interval> {
    let mut set = rotations(BRANCH_1, 90, RotationOrder::Clockwise);
    set.extend(rotations(BRANCH_2, 90, RotationOrder::Clockwise));
    set
}

/// Intervals matching object boundary pixels.
pub fn boundary_pixel_intervals() -> Vec<Interval> {
    rotations(BOUNDARY_PIXEL, 45, RotationOrder::InterleavedClockwise)
}

/// Hit image and miss image for a pattern set entry, as used by callers
/// that assemble their own intervals from binary images.
pub fn images_from_pattern(s: &str) -> (BinaryImage, BinaryImage) {
    let interval = pattern(s);
    let sizes = interval.sizes().to_vec();
    let mut hits = BinaryImage::new(&sizes).expect("pattern sizes are valid");
    let mut misses = BinaryImage::new(&sizes).expect("pattern sizes are valid");
    let (h, w) = (sizes[0], sizes[1]);
    for y in 0..h {
        for x in 0..w {
            match interval.elements()[y * w + x] {
                IntervalElement::Hit => hits.set(&[y, x], true),
                IntervalElement::Miss => misses.set(&[y, x], true),
                IntervalElement::DontCare => {}
            }
        }
    }
    (hits, misses)
}
