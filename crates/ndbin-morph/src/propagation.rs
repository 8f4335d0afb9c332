//! Breadth-first propagation core: dilation, erosion, opening, closing
//!
//! Dilation and erosion share one queue-driven engine. The output starts
//! as a copy of the input; a scan collects every pixel of the polarity
//! being flipped that already touches the opposite polarity (or, at the
//! image border, virtual outside pixels per the edge condition) into a
//! FIFO. The first iteration flips the collected pixels; each further
//! iteration flips and enqueues the yet-unflipped neighbors of the
//! current frontier. Pixels are finalized the moment they are flipped, so
//! the result is independent of the order in which a level is drained.
//!
//! Interior pixels dereference their neighbor offsets without bounds
//! checks; only pixels carrying the border bit recover their coordinates
//! and test each neighbor against the image extent.

use crate::bits::{self, PixelBit};
use crate::border::mark_border;
use crate::error::{MorphError, MorphResult};
use crate::neighborhood::{Connectivity, NeighborList};
use crate::queue::EdgeQueue;
use ndbin_core::{BinaryImage, CoordsComputer, SAMPLE_BIT};
use std::str::FromStr;

/// Assumed value of the space outside the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeCondition {
    /// Outside pixels are background.
    #[default]
    Background,
    /// Outside pixels are foreground.
    Object,
}

impl EdgeCondition {
    /// The inverse condition (used by duals of operations).
    pub fn inverse(self) -> Self {
        match self {
            EdgeCondition::Background => EdgeCondition::Object,
            EdgeCondition::Object => EdgeCondition::Background,
        }
    }

    #[inline]
    pub(crate) fn outside_value(self) -> bool {
        self == EdgeCondition::Object
    }
}

impl FromStr for EdgeCondition {
    type Err = MorphError;

    fn from_str(s: &str) -> MorphResult<Self> {
        match s {
            "background" => Ok(EdgeCondition::Background),
            "object" => Ok(EdgeCondition::Object),
            _ => Err(MorphError::InvalidParameters(format!(
                "unknown edge condition '{s}', expected 'object' or 'background'"
            ))),
        }
    }
}

/// Edge handling for opening and closing.
///
/// `Special` runs each step with its artifact-free condition: erosion
/// treats outside as object, dilation treats outside as background, so
/// neither step manufactures or destroys structure at the image border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpeningEdge {
    #[default]
    Background,
    Object,
    Special,
}

impl OpeningEdge {
    fn erosion_edge(self) -> EdgeCondition {
        match self {
            OpeningEdge::Background => EdgeCondition::Background,
            OpeningEdge::Object | OpeningEdge::Special => EdgeCondition::Object,
        }
    }

    fn dilation_edge(self) -> EdgeCondition {
        match self {
            OpeningEdge::Background | OpeningEdge::Special => EdgeCondition::Background,
            OpeningEdge::Object => EdgeCondition::Object,
        }
    }
}

impl FromStr for OpeningEdge {
    type Err = MorphError;

    fn from_str(s: &str) -> MorphResult<Self> {
        match s {
            "background" => Ok(OpeningEdge::Background),
            "object" => Ok(OpeningEdge::Object),
            "special" => Ok(OpeningEdge::Special),
            _ => Err(MorphError::InvalidParameters(format!(
                "unknown edge handling '{s}', expected 'object', 'background' or 'special'"
            ))),
        }
    }
}

/// Which polarity the propagation flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polarity {
    /// Background pixels adjacent to foreground become foreground.
    Dilate,
    /// Foreground pixels adjacent to background become background.
    Erode,
}

impl Polarity {
    /// Sample value of the pixels this polarity flips.
    #[inline]
    fn from_value(self) -> bool {
        matches!(self, Polarity::Erode)
    }
}

/// Dilate a binary image by `iterations` propagation steps.
pub fn binary_dilation(
    input: &BinaryImage,
    connectivity: Connectivity,
    iterations: usize,
    edge: EdgeCondition,
) -> MorphResult<BinaryImage> {
    let mut out = input.clone();
    propagate(&mut out, connectivity, iterations, edge, Polarity::Dilate)?;
    Ok(out)
}

/// Erode a binary image by `iterations` propagation steps.
pub fn binary_erosion(
    input: &BinaryImage,
    connectivity: Connectivity,
    iterations: usize,
    edge: EdgeCondition,
) -> MorphResult<BinaryImage> {
    let mut out = input.clone();
    propagate(&mut out, connectivity, iterations, edge, Polarity::Erode)?;
    Ok(out)
}

/// Opening: erosion followed by dilation.
pub fn binary_opening(
    input: &BinaryImage,
    connectivity: Connectivity,
    iterations: usize,
    edge: OpeningEdge,
) -> MorphResult<BinaryImage> {
    let eroded = binary_erosion(input, connectivity, iterations, edge.erosion_edge())?;
    binary_dilation(&eroded, connectivity, iterations, edge.dilation_edge())
}

/// Closing: dilation followed by erosion.
pub fn binary_closing(
    input: &BinaryImage,
    connectivity: Connectivity,
    iterations: usize,
    edge: OpeningEdge,
) -> MorphResult<BinaryImage> {
    let dilated = binary_dilation(input, connectivity, iterations, edge.dilation_edge())?;
    binary_erosion(&dilated, connectivity, iterations, edge.erosion_edge())
}

/// The shared queue engine. Mutates `out` in place.
fn propagate(
    out: &mut BinaryImage,
    connectivity: Connectivity,
    iterations: usize,
    edge: EdgeCondition,
    polarity: Polarity,
) -> MorphResult<()> {
    let ndims = out.dimensionality();
    connectivity.validate(ndims)?;
    if iterations == 0 {
        return Ok(());
    }

    let from_value = polarity.from_value();
    let outside_is_opposite = edge.outside_value() != from_value;

    mark_border(out, PixelBit::Border);

    // At most two distinct tables; alternation switches between them.
    let even = NeighborList::new(connectivity.for_iteration(ndims, 0), out.strides())?;
    let odd = NeighborList::new(connectivity.for_iteration(ndims, 1), out.strides())?;
    let tables = [even, odd];

    let sizes: Vec<usize> = out.sizes().to_vec();
    let cc = CoordsComputer::new(out.sizes(), out.strides(), out.origin());
    let mut queue = EdgeQueue::new();

    // Collect the initial frontier: every pixel of the flipped polarity
    // with an opposite-polarity neighbor, real or virtual.
    let dim = ndims - 1;
    let n = sizes[dim];
    let line_stride = out.stride(dim);
    let list = &tables[0];
    let mut coords = vec![0usize; ndims];
    for line in out.lines(dim) {
        let mut off = line.offset as isize;
        for i in 0..n {
            let idx = off as usize;
            off += line_stride;
            let byte = out.data()[idx];
            if (byte & SAMPLE_BIT != 0) != from_value {
                continue;
            }
            let qualifies = if bits::test(byte, PixelBit::Border) {
                coords.copy_from_slice(&line.coords);
                coords[dim] = i;
                outside_is_opposite
                    || (0..list.len()).any(|k| {
                        list.in_image(k, &coords, &sizes) && {
                            let nb = (idx as isize + list.neighbor(k).offset()) as usize;
                            (out.data()[nb] & SAMPLE_BIT != 0) != from_value
                        }
                    })
            } else {
                list.iter().any(|nb| {
                    let nb_idx = (idx as isize + nb.offset()) as usize;
                    (out.data()[nb_idx] & SAMPLE_BIT != 0) != from_value
                })
            };
            if qualifies {
                queue.push(idx);
            }
        }
    }

    // First iteration: everything collected is known to touch the
    // opposite polarity, so it flips unconditionally.
    let level = queue.len();
    for _ in 0..level {
        let idx = queue.pop().expect("level count matches queue length");
        out.data_mut()[idx] ^= SAMPLE_BIT;
        queue.push(idx);
    }

    // Remaining iterations: grow the frontier one level at a time.
    for iteration in 1..iterations {
        let list = &tables[iteration % 2];
        let level = queue.len();
        if level == 0 {
            break;
        }
        for _ in 0..level {
            let idx = queue.pop().expect("level count matches queue length");
            if bits::test(out.data()[idx], PixelBit::Border) {
                cc.coords_into(idx, &mut coords);
                for k in 0..list.len() {
                    if !list.in_image(k, &coords, &sizes) {
                        continue;
                    }
                    let nb = (idx as isize + list.neighbor(k).offset()) as usize;
                    if (out.data()[nb] & SAMPLE_BIT != 0) == from_value {
                        out.data_mut()[nb] ^= SAMPLE_BIT;
                        queue.push(nb);
                    }
                }
            } else {
                for neighbor in list.iter() {
                    let nb = (idx as isize + neighbor.offset()) as usize;
                    if (out.data()[nb] & SAMPLE_BIT != 0) == from_value {
                        out.data_mut()[nb] ^= SAMPLE_BIT;
                        queue.push(nb);
                    }
                }
            }
        }
    }

    // Strip the border bit (and any other transient plane) before the
    // image leaves the engine.
    out.for_each_sample_mut(|b| *b &= SAMPLE_BIT);
    Ok(())
}
