//! Neighbor offset tables
//!
//! A connectivity value selects which of the up-to-`3^n - 1` unit
//! neighbors of a pixel count as adjacent: connectivity 1 admits only
//! neighbors that differ in a single coordinate (edge neighbors),
//! connectivity `n` admits every neighbor of the unit cube. The
//! [`NeighborList`] turns the selected relative coordinates into linear
//! memory offsets for a concrete stride vector, so the propagation loops
//! can walk neighbors by pointer arithmetic alone.
//!
//! Alternating connectivities reduce the directional bias that a fixed
//! neighborhood imprints on a propagation front over many iterations:
//! the effective ball of alternating 1/2 connectivity in 2-D is closer
//! to a Euclidean disc than either fixed choice. Alternation is defined
//! for 2-D and 3-D only.

use crate::error::{MorphError, MorphResult};

/// Connectivity descriptor.
///
/// `Fixed(c)` uses the same neighborhood on every iteration; the
/// alternating variants switch between connectivity 1 and the image
/// dimensionality on successive iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    /// Neighbors differing in at most `c` coordinates, `1 <= c <= ndims`.
    Fixed(usize),
    /// Connectivity 1 on even iterations, `ndims` on odd ones (2-D/3-D).
    AlternateLowFirst,
    /// Connectivity `ndims` on even iterations, 1 on odd ones (2-D/3-D).
    AlternateHighFirst,
}

impl Connectivity {
    /// Map the canonical integer descriptor: positive values select a
    /// fixed connectivity, -1 and -2 the two alternation orders.
    pub fn from_int(value: isize) -> MorphResult<Self> {
        match value {
            v if v > 0 => Ok(Connectivity::Fixed(v as usize)),
            -1 => Ok(Connectivity::AlternateLowFirst),
            -2 => Ok(Connectivity::AlternateHighFirst),
            _ => Err(MorphError::InvalidConnectivity(format!(
                "{value} is not a valid connectivity descriptor"
            ))),
        }
    }

    /// Check the descriptor against an image dimensionality.
    pub fn validate(self, ndims: usize) -> MorphResult<()> {
        match self {
            Connectivity::Fixed(c) => {
                if c == 0 || c > ndims {
                    return Err(MorphError::InvalidConnectivity(format!(
                        "connectivity {c} out of range for {ndims}-dimensional image"
                    )));
                }
            }
            Connectivity::AlternateLowFirst | Connectivity::AlternateHighFirst => {
                if ndims != 2 && ndims != 3 {
                    return Err(MorphError::InvalidConnectivity(format!(
                        "alternating connectivity is only defined for 2- and 3-dimensional images, got {ndims}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Connectivity in effect on `iteration` (0-based).
    ///
    /// Call [`Connectivity::validate`] first; this does not re-check.
    pub fn for_iteration(self, ndims: usize, iteration: usize) -> usize {
        match self {
            Connectivity::Fixed(c) => c,
            Connectivity::AlternateLowFirst => {
                if iteration % 2 == 0 { 1 } else { ndims }
            }
            Connectivity::AlternateHighFirst => {
                if iteration % 2 == 0 { ndims } else { 1 }
            }
        }
    }
}

/// One neighbor: relative coordinates and the linear memory offset.
#[derive(Debug, Clone)]
pub struct Neighbor {
    coords: Vec<isize>,
    offset: isize,
}

impl Neighbor {
    /// Relative coordinates, each in {-1, 0, 1}.
    #[inline]
    pub fn coords(&self) -> &[isize] {
        &self.coords
    }

    /// Linear offset (dot product of the coordinates with the strides).
    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }
}

/// Ordered neighbor table for one connectivity and stride vector.
#[derive(Debug, Clone)]
pub struct NeighborList {
    neighbors: Vec<Neighbor>,
}

impl NeighborList {
    /// Enumerate the neighbors for `connectivity` over `strides`.
    ///
    /// Neighbors appear in odometer order of their relative coordinates
    /// (last dimension fastest), which fixes the propagation order and
    /// keeps results deterministic.
    pub fn new(connectivity: usize, strides: &[isize]) -> MorphResult<Self> {
        let ndims = strides.len();
        Connectivity::Fixed(connectivity).validate(ndims)?;
        let mut neighbors = Vec::new();
        let mut rel = vec![-1isize; ndims];
        loop {
            let nonzero = rel.iter().filter(|&&c| c != 0).count();
            if nonzero > 0 && nonzero <= connectivity {
                let offset = rel
                    .iter()
                    .zip(strides)
                    .map(|(&c, &s)| c * s)
                    .sum();
                neighbors.push(Neighbor {
                    coords: rel.clone(),
                    offset,
                });
            }
            // Odometer over {-1, 0, 1}^n.
            let mut d = ndims;
            loop {
                if d == 0 {
                    return Ok(NeighborList { neighbors });
                }
                d -= 1;
                if rel[d] < 1 {
                    rel[d] += 1;
                    break;
                }
                rel[d] = -1;
            }
        }
    }

    /// Number of neighbors in the table.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// True when the table is empty (never for a valid connectivity).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Iterate over the neighbors.
    pub fn iter(&self) -> std::slice::Iter<'_, Neighbor> {
        self.neighbors.iter()
    }

    /// Neighbor at position `k` in table order.
    #[inline]
    pub fn neighbor(&self, k: usize) -> &Neighbor {
        &self.neighbors[k]
    }

    /// True when neighbor `k` of the pixel at `coords` lies inside an
    /// image of the given sizes. Only border pixels need this test.
    #[inline]
    pub fn in_image(&self, k: usize, coords: &[usize], sizes: &[usize]) -> bool {
        self.neighbors[k]
            .coords
            .iter()
            .zip(coords)
            .zip(sizes)
            .all(|((&rel, &c), &size)| {
                let nc = c as isize + rel;
                nc >= 0 && (nc as usize) < size
            })
    }
}
