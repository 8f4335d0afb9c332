//! Queue-driven conditional thinning and thickening, 2-D only
//!
//! A specialization of the interval-driven engine for the common 2-D
//! case: instead of correlating hit-or-miss kernels over the whole image
//! on every pass, candidate pixels carry their packed 8-neighborhood
//! into a 256-entry table that answers whether the pixel can flip
//! without changing the topology of the image. The table encodes the
//! simple-point test for 8-connected foreground over 4-connected
//! background: a foreground pixel may be removed iff its neighborhood
//! holds exactly one 8-connected foreground component and exactly one
//! background component touching an edge neighbor. The end-pixel
//! condition selects whether single-neighbor pixels (line ends) may
//! erode.
//!
//! The working image carries a one-pixel pad valued per the edge
//! condition, so packing a neighborhood never bounds-checks.

use crate::bits::PixelBit;
use crate::error::{MorphError, MorphResult};
use crate::propagation::EdgeCondition;
use crate::queue::EdgeQueue;
use ndbin_core::{BinaryImage, CoreError, SAMPLE_BIT};
use std::str::FromStr;

const VALUE: u8 = PixelBit::Value.mask();
const MASK: u8 = PixelBit::Mask.mask();
const QUEUED: u8 = PixelBit::Queued.mask();

/// Treatment of line end pixels during 2-D thinning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndPixelCondition {
    /// Line ends are never removed; thinning yields a skeleton that
    /// spans the original shape.
    #[default]
    Keep,
    /// Single-neighbor pixels may erode; shapes without holes shrink
    /// toward a single pixel.
    Lose,
}

impl FromStr for EndPixelCondition {
    type Err = MorphError;

    fn from_str(s: &str) -> MorphResult<Self> {
        match s {
            "keep" => Ok(EndPixelCondition::Keep),
            "lose" => Ok(EndPixelCondition::Lose),
            _ => Err(MorphError::InvalidParameters(format!(
                "unknown end pixel condition '{s}', expected 'keep' or 'lose'"
            ))),
        }
    }
}

/// Grid positions of the packed neighborhood, clockwise from east.
/// Bit k of a pattern corresponds to entry k. Even entries are the edge
/// (4-connected) neighbors.
const RING: [(isize, isize); 8] = [
    (0, 1),   // E
    (1, 1),   // SE
    (1, 0),   // S
    (1, -1),  // SW
    (0, -1),  // W
    (-1, -1), // NW
    (-1, 0),  // N
    (-1, 1),  // NE
];

/// Thin the foreground of a 2-D image, preserving topology.
///
/// `mask` restricts where pixels may change; `None` allows changes
/// everywhere. Runs to convergence.
pub fn conditional_thinning_2d(
    input: &BinaryImage,
    mask: Option<&BinaryImage>,
    end: EndPixelCondition,
    edge: EdgeCondition,
) -> MorphResult<BinaryImage> {
    require_2d(input)?;
    if let Some(mask) = mask
        && mask.sizes() != input.sizes()
    {
        return Err(CoreError::SizeMismatch {
            expected: input.sizes().to_vec(),
            actual: mask.sizes().to_vec(),
        }
        .into());
    }

    let border = [1usize, 1];
    let fill = if edge.outside_value() { SAMPLE_BIT } else { 0 };
    let mut work = input.pad(&border, fill)?;

    // Mask plane on the real pixels only; pad pixels can never flip.
    {
        let (h, w) = (input.size(0), input.size(1));
        for y in 0..h {
            for x in 0..w {
                let allowed = mask.is_none_or(|m| m.get(&[y, x]));
                if allowed {
                    *work.at_mut(&[y + 1, x + 1]) |= MASK;
                }
            }
        }
    }

    let offsets: Vec<isize> = RING
        .iter()
        .map(|&(dy, dx)| dy * work.stride(0) + dx * work.stride(1))
        .collect();
    let table = topology_table(end);

    // One round seeds the queue with every changeable foreground pixel
    // that has an edge-connected background neighbor and drains it.
    // A flip only enqueues edge neighbors (diagonals as a fallback), so
    // a pixel whose removability was unlocked by a diagonal flip alone
    // can be missed within a round; the outer loop rescans until a full
    // round changes nothing.
    let mut queue = EdgeQueue::new();
    loop {
        let n = work.size(1);
        let stride = work.stride(1);
        for line in work.lines(1) {
            let mut off = line.offset as isize;
            for _ in 0..n {
                let idx = off as usize;
                off += stride;
                if work.data()[idx] & (VALUE | MASK) != VALUE | MASK {
                    continue;
                }
                let boundary = offsets
                    .iter()
                    .step_by(2)
                    .any(|&o| work.data()[(idx as isize + o) as usize] & VALUE == 0);
                if boundary {
                    work.data_mut()[idx] |= QUEUED;
                    queue.push(idx);
                }
            }
        }

        let mut flipped = 0usize;
        while let Some(idx) = queue.pop() {
            work.data_mut()[idx] &= !QUEUED;
            if work.data()[idx] & (VALUE | MASK) != VALUE | MASK {
                continue;
            }
            let mut pattern = 0usize;
            for (k, &o) in offsets.iter().enumerate() {
                if work.data()[(idx as isize + o) as usize] & VALUE != 0 {
                    pattern |= 1 << k;
                }
            }
            if !table[pattern] {
                continue;
            }
            work.data_mut()[idx] &= !VALUE;
            flipped += 1;

            // Advance the front through edge neighbors; fall back to the
            // diagonals only when no edge neighbor can take over, so the
            // front still moves around concave corners.
            let mut enqueued = 0;
            for &o in offsets.iter().step_by(2) {
                let nb = (idx as isize + o) as usize;
                if work.data()[nb] & (VALUE | MASK | QUEUED) == VALUE | MASK {
                    work.data_mut()[nb] |= QUEUED;
                    queue.push(nb);
                    enqueued += 1;
                }
            }
            if enqueued == 0 {
                for &o in offsets.iter().skip(1).step_by(2) {
                    let nb = (idx as isize + o) as usize;
                    if work.data()[nb] & (VALUE | MASK | QUEUED) == VALUE | MASK {
                        work.data_mut()[nb] |= QUEUED;
                        queue.push(nb);
                    }
                }
            }
        }
        if flipped == 0 {
            break;
        }
    }

    work.for_each_sample_mut(|b| *b &= SAMPLE_BIT);
    Ok(work.unpad(&border)?)
}

/// Thicken the foreground of a 2-D image, preserving topology.
///
/// The dual of [`conditional_thinning_2d`]: thins the background under
/// the inverted edge condition, restricted to the same mask.
pub fn conditional_thickening_2d(
    input: &BinaryImage,
    mask: Option<&BinaryImage>,
    end: EndPixelCondition,
    edge: EdgeCondition,
) -> MorphResult<BinaryImage> {
    let inverted = input.inverted();
    let mut out = conditional_thinning_2d(&inverted, mask, end, edge.inverse())?;
    out.invert();
    Ok(out)
}

/// Build the 256-entry removability table for one end-pixel policy.
///
/// Index: packed 8-neighborhood of a foreground pixel, bit k set when
/// ring position k is foreground.
fn topology_table(end: EndPixelCondition) -> [bool; 256] {
    let mut table = [false; 256];
    for (pattern, entry) in table.iter_mut().enumerate() {
        let fg: Vec<bool> = (0..8).map(|k| pattern & (1 << k) != 0).collect();
        let count = fg.iter().filter(|&&b| b).count();
        let min_neighbors = match end {
            EndPixelCondition::Keep => 2,
            EndPixelCondition::Lose => 1,
        };
        *entry = count >= min_neighbors
            && foreground_components(&fg) == 1
            && background_components(&fg) == 1;
    }
    table
}

/// Number of 8-connected components of the foreground ring cells.
fn foreground_components(fg: &[bool]) -> usize {
    components(fg, true, |a, b| {
        let (ay, ax) = RING[a];
        let (by, bx) = RING[b];
        (ay - by).abs() <= 1 && (ax - bx).abs() <= 1
    })
}

/// Number of 4-connected background components that touch an edge
/// neighbor of the center. Background connectivity is evaluated within
/// the ring only; the center itself is foreground and never connects
/// background cells.
fn background_components(fg: &[bool]) -> usize {
    let mut qualifying = 0;
    let mut visited = [false; 8];
    for start in 0..8 {
        if fg[start] || visited[start] {
            continue;
        }
        // Flood one 4-connected background component.
        let mut stack = vec![start];
        visited[start] = true;
        let mut touches_edge_neighbor = start % 2 == 0;
        while let Some(a) = stack.pop() {
            for b in 0..8 {
                if fg[b] || visited[b] {
                    continue;
                }
                let (ay, ax) = RING[a];
                let (by, bx) = RING[b];
                if (ay - by).abs() + (ax - bx).abs() == 1 {
                    visited[b] = true;
                    touches_edge_neighbor |= b % 2 == 0;
                    stack.push(b);
                }
            }
        }
        if touches_edge_neighbor {
            qualifying += 1;
        }
    }
    qualifying
}

fn components(cells: &[bool], value: bool, adjacent: impl Fn(usize, usize) -> bool) -> usize {
    let mut visited = [false; 8];
    let mut count = 0;
    for start in 0..8 {
        if cells[start] != value || visited[start] {
            continue;
        }
        count += 1;
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(a) = stack.pop() {
            for b in 0..8 {
                if cells[b] != value || visited[b] || !adjacent(a, b) {
                    continue;
                }
                visited[b] = true;
                stack.push(b);
            }
        }
    }
    count
}

fn require_2d(input: &BinaryImage) -> MorphResult<()> {
    if input.dimensionality() != 2 {
        return Err(MorphError::UnsupportedDimensionality {
            operation: "conditional thinning",
            required: 2,
            actual: input.dimensionality(),
        });
    }
    Ok(())
}
