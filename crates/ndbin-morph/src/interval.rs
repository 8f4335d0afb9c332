//! Intervals: ternary hit-or-miss structuring elements
//!
//! An interval is an odd-sized kernel anchored at its geometric center
//! where every position is one of hit (must be foreground), miss (must
//! be background) or don't-care. Intervals are immutable value objects;
//! kernel data lives behind an `Arc` so rotation generators can hand out
//! arrays whose members share storage. Array-level inversion detects
//! shared storage and inverts it once.

use crate::error::{MorphError, MorphResult};
use ndbin_core::BinaryImage;
use std::str::FromStr;
use std::sync::Arc;

/// Element of an interval kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntervalElement {
    /// Position is ignored.
    #[default]
    DontCare,
    /// Must match foreground.
    Hit,
    /// Must match background.
    Miss,
}

impl IntervalElement {
    fn inverted(self) -> Self {
        match self {
            IntervalElement::Hit => IntervalElement::Miss,
            IntervalElement::Miss => IntervalElement::Hit,
            IntervalElement::DontCare => IntervalElement::DontCare,
        }
    }
}

/// Ordering of the rotated versions of an interval.
///
/// Interleaved orderings place each angle next to its 180-degree
/// opposite, the access pattern unions and intersections over rotations
/// expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOrder {
    Clockwise,
    CounterClockwise,
    InterleavedClockwise,
    InterleavedCounterClockwise,
}

impl RotationOrder {
    fn clockwise(self) -> bool {
        matches!(
            self,
            RotationOrder::Clockwise | RotationOrder::InterleavedClockwise
        )
    }

    fn interleaved(self) -> bool {
        matches!(
            self,
            RotationOrder::InterleavedClockwise | RotationOrder::InterleavedCounterClockwise
        )
    }
}

impl FromStr for RotationOrder {
    type Err = MorphError;

    fn from_str(s: &str) -> MorphResult<Self> {
        match s {
            "clockwise" => Ok(RotationOrder::Clockwise),
            "counter-clockwise" => Ok(RotationOrder::CounterClockwise),
            "interleaved clockwise" => Ok(RotationOrder::InterleavedClockwise),
            "interleaved counter-clockwise" => Ok(RotationOrder::InterleavedCounterClockwise),
            _ => Err(MorphError::InvalidParameters(format!(
                "unknown rotation ordering '{s}'"
            ))),
        }
    }
}

/// An N-dimensional ternary structuring element.
#[derive(Debug, Clone)]
pub struct Interval {
    sizes: Vec<usize>,
    data: Arc<[IntervalElement]>,
}

impl Interval {
    /// Build an interval from a flat element grid in row-major order
    /// (last dimension fastest).
    ///
    /// # Errors
    ///
    /// Fails when a dimension has even extent, the element count does
    /// not match the sizes, or no hit position exists.
    pub fn from_elements(sizes: &[usize], elements: Vec<IntervalElement>) -> MorphResult<Self> {
        if sizes.is_empty() {
            return Err(MorphError::InvalidInterval(
                "interval must have at least one dimension".into(),
            ));
        }
        for &s in sizes {
            if s % 2 == 0 {
                return Err(MorphError::InvalidInterval(format!(
                    "interval extents must be odd, got {sizes:?}"
                )));
            }
        }
        let n: usize = sizes.iter().product();
        if elements.len() != n {
            return Err(MorphError::InvalidInterval(format!(
                "element count {} does not match sizes {sizes:?}",
                elements.len()
            )));
        }
        if !elements.contains(&IntervalElement::Hit) {
            return Err(MorphError::InvalidInterval(
                "interval has no hit position".into(),
            ));
        }
        Ok(Interval {
            sizes: sizes.to_vec(),
            data: elements.into(),
        })
    }

    /// Build a 2-D interval from a string pattern.
    ///
    /// Each line is one kernel row; `x` marks a hit, `o` a miss, `.` or
    /// space a don't-care. Short lines are padded with don't-cares.
    pub fn from_string(pattern: &str) -> MorphResult<Self> {
        let lines: Vec<&str> = pattern.lines().collect();
        let height = lines.len();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        let mut elements = vec![IntervalElement::DontCare; height * width];
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                elements[y * width + x] = match ch {
                    'x' | 'X' => IntervalElement::Hit,
                    'o' | 'O' => IntervalElement::Miss,
                    '.' | ' ' => IntervalElement::DontCare,
                    _ => {
                        return Err(MorphError::InvalidInterval(format!(
                            "unexpected character '{ch}' in interval pattern"
                        )));
                    }
                };
            }
        }
        Self::from_elements(&[height, width], elements)
    }

    /// Build an interval from a hit image and a miss image.
    ///
    /// Foreground pixels of `hits` become hit positions, foreground
    /// pixels of `misses` become miss positions; the sets must be
    /// disjoint and the images identically sized.
    pub fn from_images(hits: &BinaryImage, misses: &BinaryImage) -> MorphResult<Self> {
        if hits.sizes() != misses.sizes() {
            return Err(MorphError::InvalidInterval(format!(
                "hit and miss images differ in shape: {:?} vs {:?}",
                hits.sizes(),
                misses.sizes()
            )));
        }
        let sizes = hits.sizes().to_vec();
        let mut elements = Vec::with_capacity(hits.num_pixels());
        let mut coords = vec![0usize; sizes.len()];
        loop {
            let h = hits.get(&coords);
            let m = misses.get(&coords);
            if h && m {
                return Err(MorphError::InvalidInterval(format!(
                    "hit and miss sets overlap at {coords:?}"
                )));
            }
            elements.push(if h {
                IntervalElement::Hit
            } else if m {
                IntervalElement::Miss
            } else {
                IntervalElement::DontCare
            });
            // Row-major odometer, matching the flat element order.
            let mut d = sizes.len();
            loop {
                if d == 0 {
                    return Self::from_elements(&sizes, elements);
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

    /// Extent per dimension (all odd).
    #[inline]
    pub fn sizes(&self) -> &[usize] {
        &self.sizes
    }

    /// Number of kernel dimensions.
    #[inline]
    pub fn dimensionality(&self) -> usize {
        self.sizes.len()
    }

    /// Half-extent per dimension.
    pub fn radius(&self) -> Vec<usize> {
        self.sizes.iter().map(|&s| s / 2).collect()
    }

    /// Flat kernel data in row-major order.
    #[inline]
    pub fn elements(&self) -> &[IntervalElement] {
        &self.data
    }

    /// Hit and miss positions as coordinates relative to the center.
    pub fn relative_entries(&self) -> Vec<(Vec<isize>, IntervalElement)> {
        let mut entries = Vec::new();
        let mut coords = vec![0usize; self.sizes.len()];
        for &elem in self.data.iter() {
            if elem != IntervalElement::DontCare {
                let rel: Vec<isize> = coords
                    .iter()
                    .zip(&self.sizes)
                    .map(|(&c, &s)| c as isize - (s / 2) as isize)
                    .collect();
                entries.push((rel, elem));
            }
            let mut d = self.sizes.len();
            loop {
                if d == 0 {
                    return entries;
                }
                d -= 1;
                coords[d] += 1;
                if coords[d] < self.sizes[d] {
                    break;
                }
                coords[d] = 0;
            }
        }
        entries
    }

    /// A copy with hits and misses exchanged.
    pub fn inverted(&self) -> Self {
        Interval {
            sizes: self.sizes.clone(),
            data: self.data.iter().map(|e| e.inverted()).collect(),
        }
    }

    /// Rotate a 2-D interval by 90 degrees.
    pub fn rotate_by_90(&self, clockwise: bool) -> MorphResult<Self> {
        self.require_2d("rotation")?;
        let (h, w) = (self.sizes[0], self.sizes[1]);
        let mut out = vec![IntervalElement::DontCare; h * w];
        for y in 0..h {
            for x in 0..w {
                // Clockwise: row y becomes column (h - 1 - y).
                let (ny, nx) = if clockwise {
                    (x, h - 1 - y)
                } else {
                    (w - 1 - x, y)
                };
                out[ny * h + nx] = self.data[y * w + x];
            }
        }
        Ok(Interval {
            sizes: vec![w, h],
            data: out.into(),
        })
    }

    /// Rotate a 2-D interval by 45 degrees.
    ///
    /// The kernel is padded to a square first if necessary; each
    /// concentric shell of the square is then rotated by one-eighth of
    /// its circumference, which is an exact permutation. Eight
    /// applications return the original kernel.
    pub fn rotate_by_45(&self, clockwise: bool) -> MorphResult<Self> {
        self.require_2d("rotation")?;
        let square = self.padded_to_square();
        let s = square.sizes[0];
        let c = s / 2;
        let mut out: Vec<IntervalElement> = square.data.to_vec();
        for r in 1..=c {
            let ring = ring_coords(c, r, s);
            let len = ring.len();
            debug_assert_eq!(len, 8 * r);
            for (i, &src) in ring.iter().enumerate() {
                let j = if clockwise {
                    (i + r) % len
                } else {
                    (i + len - r) % len
                };
                out[ring[j]] = square.data[src];
            }
        }
        Ok(Interval {
            sizes: square.sizes,
            data: out.into(),
        })
    }

    /// Generate the rotated versions of a 2-D interval.
    ///
    /// `step_degrees` must be 45, 90 or 180, giving 8, 4 or 2 versions.
    /// The first version is always the unrotated interval itself (it
    /// shares kernel storage with `self`).
    pub fn rotated_versions(
        &self,
        step_degrees: u32,
        order: RotationOrder,
    ) -> MorphResult<Vec<Interval>> {
        self.require_2d("rotation")?;
        let count = match step_degrees {
            45 => 8,
            90 => 4,
            180 => 2,
            _ => {
                return Err(MorphError::InvalidParameters(format!(
                    "rotation step must be 45, 90 or 180 degrees, got {step_degrees}"
                )));
            }
        };
        let clockwise = order.clockwise();
        let mut versions = Vec::with_capacity(count);
        versions.push(self.clone());
        for k in 1..count {
            let prev = &versions[k - 1];
            let next = match step_degrees {
                45 => prev.rotate_by_45(clockwise)?,
                90 => prev.rotate_by_90(clockwise)?,
                _ => prev.rotate_by_90(clockwise)?.rotate_by_90(clockwise)?,
            };
            versions.push(next);
        }
        if order.interleaved() && count > 2 {
            let half = count / 2;
            let mut interleaved = Vec::with_capacity(count);
            for k in 0..half {
                interleaved.push(versions[k].clone());
                interleaved.push(versions[k + half].clone());
            }
            versions = interleaved;
        }
        Ok(versions)
    }

    fn padded_to_square(&self) -> Interval {
        let (h, w) = (self.sizes[0], self.sizes[1]);
        let s = h.max(w);
        if h == w {
            return self.clone();
        }
        let dy = (s - h) / 2;
        let dx = (s - w) / 2;
        let mut out = vec![IntervalElement::DontCare; s * s];
        for y in 0..h {
            for x in 0..w {
                out[(y + dy) * s + (x + dx)] = self.data[y * w + x];
            }
        }
        Interval {
            sizes: vec![s, s],
            data: out.into(),
        }
    }

    fn require_2d(&self, operation: &'static str) -> MorphResult<()> {
        if self.sizes.len() != 2 {
            return Err(MorphError::UnsupportedDimensionality {
                operation,
                required: 2,
                actual: self.sizes.len(),
            });
        }
        Ok(())
    }
}

/// Invert every interval of an array in place.
///
/// Members sharing kernel storage are inverted once and keep sharing the
/// (new) storage afterwards, so no kernel is inverted twice.
pub fn invert_interval_array(intervals: &mut [Interval]) {
    let mut seen: Vec<(*const IntervalElement, Arc<[IntervalElement]>)> = Vec::new();
    for interval in intervals.iter_mut() {
        let ptr = interval.data.as_ptr();
        if let Some((_, replacement)) = seen.iter().find(|(p, _)| *p == ptr) {
            interval.data = replacement.clone();
        } else {
            let inverted: Arc<[IntervalElement]> =
                interval.data.iter().map(|e| e.inverted()).collect();
            seen.push((ptr, inverted.clone()));
            interval.data = inverted;
        }
    }
}

/// Flat indices of the Chebyshev ring at distance `r` around the center
/// `c` of an `s`-by-`s` square, enumerated clockwise from the top-left
/// corner.
fn ring_coords(c: usize, r: usize, s: usize) -> Vec<usize> {
    let top = c - r;
    let bottom = c + r;
    let left = c - r;
    let right = c + r;
    let mut ring = Vec::with_capacity(8 * r);
    for x in left..right {
        ring.push(top * s + x);
    }
    for y in top..bottom {
        ring.push(y * s + right);
    }
    for x in ((left + 1)..=right).rev() {
        ring.push(bottom * s + x);
    }
    for y in ((top + 1)..=bottom).rev() {
        ring.push(y * s + left);
    }
    ring
}
