//! Seeded conditional propagation (geodesic reconstruction)
//!
//! Grows a seed region outward, strictly confined to a mask region. The
//! working image keeps two independent planes in the status byte: the
//! mask plane (propagation allowed) and the seed plane (reached). The
//! image is processed with a one-pixel pad on every side: pad pixels
//! carry the border bit, never the mask bit, and carry the seed bit iff
//! the edge condition treats outside space as object. Since every
//! neighbor offset moves at most one pixel per dimension, all neighbor
//! dereferences from real pixels land inside the pad and no per-pixel
//! bounds checks are needed anywhere in the loop.

use crate::bits::PixelBit;
use crate::border::mark_border;
use crate::error::MorphResult;
use crate::neighborhood::{Connectivity, NeighborList};
use crate::propagation::EdgeCondition;
use crate::queue::EdgeQueue;
use ndbin_core::{BinaryImage, CoreError};

const VALUE: u8 = PixelBit::Value.mask();
const MASK: u8 = PixelBit::Mask.mask();
const BORDER: u8 = PixelBit::Border.mask();

/// Propagate `seed` through `mask` by breadth-first expansion.
///
/// A pixel becomes part of the result when it is reachable from the seed
/// (or, under edge condition `object`, from outside the image) through a
/// chain of neighboring mask pixels no longer than `iterations` steps;
/// `iterations == 0` runs to convergence. `None` as seed means an
/// all-background seed, which is only productive with edge condition
/// `object`. The result is always `mask AND reached`.
///
/// # Errors
///
/// Fails when seed and mask sizes differ or the connectivity is not
/// valid for the mask's dimensionality.
pub fn binary_propagation(
    seed: Option<&BinaryImage>,
    mask: &BinaryImage,
    connectivity: Connectivity,
    iterations: usize,
    edge: EdgeCondition,
) -> MorphResult<BinaryImage> {
    let ndims = mask.dimensionality();
    connectivity.validate(ndims)?;
    if let Some(seed) = seed
        && seed.sizes() != mask.sizes()
    {
        return Err(CoreError::SizeMismatch {
            expected: mask.sizes().to_vec(),
            actual: seed.sizes().to_vec(),
        }
        .into());
    }

    let sizes: Vec<usize> = mask.sizes().to_vec();
    let border = vec![1usize; ndims];
    let padded_sizes: Vec<usize> = sizes.iter().map(|&s| s + 2).collect();

    // Assemble the working planes.
    let mut work = BinaryImage::new(&padded_sizes)?;
    mark_border(&mut work, PixelBit::Border);
    if edge == EdgeCondition::Object {
        // Pad pixels start as already-reached sources.
        work.for_each_sample_mut(|b| {
            if *b & BORDER != 0 {
                *b |= VALUE;
            }
        });
    }
    {
        let dim = ndims - 1;
        let n = sizes[dim];
        let mask_stride = mask.stride(dim);
        let seed_stride = seed.map_or(0, |s| s.stride(dim));
        let work_stride = work.stride(dim);
        let mut inner = vec![0usize; ndims];
        for line in mask.lines(dim) {
            for (d, c) in inner.iter_mut().enumerate() {
                *c = line.coords[d] + 1;
            }
            let mut m = line.offset as isize;
            let mut s = seed.map_or(0, |img| img.offset_of(&line.coords) as isize);
            let mut w = work.offset_of(&inner) as isize;
            for _ in 0..n {
                let mut byte = work.data()[w as usize];
                if mask.data()[m as usize] & VALUE != 0 {
                    byte |= MASK;
                }
                if let Some(seed) = seed
                    && seed.data()[s as usize] & VALUE != 0
                {
                    byte |= VALUE;
                }
                work.data_mut()[w as usize] = byte;
                m += mask_stride;
                s += seed_stride;
                w += work_stride;
            }
        }
    }

    let even = NeighborList::new(connectivity.for_iteration(ndims, 0), work.strides())?;
    let odd = NeighborList::new(connectivity.for_iteration(ndims, 1), work.strides())?;
    let tables = [even, odd];

    // Initial frontier: mask pixels not yet reached but adjacent to a
    // reached pixel. Pad pixels never qualify (no mask bit).
    let mut queue = EdgeQueue::new();
    {
        let dim = ndims - 1;
        let n = padded_sizes[dim];
        let stride = work.stride(dim);
        let list = &tables[0];
        for line in work.lines(dim) {
            let mut off = line.offset as isize;
            for _ in 0..n {
                let idx = off as usize;
                off += stride;
                let byte = work.data()[idx];
                if byte & (MASK | VALUE) != MASK {
                    continue;
                }
                let adjacent = list.iter().any(|nb| {
                    work.data()[(idx as isize + nb.offset()) as usize] & VALUE != 0
                });
                if adjacent {
                    queue.push(idx);
                }
            }
        }
    }

    // First iteration reaches the collected frontier; each further one
    // claims the unreached mask neighbors of the previous level. The
    // loop ends as soon as a level comes up empty.
    let level = queue.len();
    for _ in 0..level {
        let idx = queue.pop().expect("level count matches queue length");
        work.data_mut()[idx] |= VALUE;
        queue.push(idx);
    }
    let mut iteration = 1;
    while !queue.is_empty() && (iterations == 0 || iteration < iterations) {
        let list = &tables[iteration % 2];
        let level = queue.len();
        for _ in 0..level {
            let idx = queue.pop().expect("level count matches queue length");
            for neighbor in list.iter() {
                let nb = (idx as isize + neighbor.offset()) as usize;
                if work.data()[nb] & (MASK | VALUE) == MASK {
                    work.data_mut()[nb] |= VALUE;
                    queue.push(nb);
                }
            }
        }
        iteration += 1;
    }

    // Intersection pass: reached AND mask, auxiliary planes stripped,
    // pad removed.
    work.for_each_sample_mut(|b| {
        *b = if *b & (MASK | VALUE) == MASK | VALUE {
            VALUE
        } else {
            0
        };
    });
    Ok(work.unpad(&border)?)
}

/// Remove every foreground component that touches the image edge.
///
/// Propagates an all-background seed through the input with outside
/// space treated as object, which reaches exactly the edge-connected
/// components, then removes the reached set from the input.
pub fn edge_objects_remove(
    input: &BinaryImage,
    connectivity: Connectivity,
) -> MorphResult<BinaryImage> {
    let reached = binary_propagation(None, input, connectivity, 0, EdgeCondition::Object)?;
    let mut out = input.clone();
    out.xor_with(&reached)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(img: &mut BinaryImage, y0: usize, y1: usize, x0: usize, x1: usize) {
        for y in y0..y1 {
            for x in x0..x1 {
                img.set(&[y, x], true);
            }
        }
    }

    #[test]
    fn test_seed_fills_connected_mask_region() {
        let mut mask = BinaryImage::new(&[8, 8]).unwrap();
        rect(&mut mask, 1, 6, 1, 6);
        let mut seed = BinaryImage::new(&[8, 8]).unwrap();
        seed.set(&[3, 3], true);
        let out = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(1),
            0,
            EdgeCondition::Background,
        )
        .unwrap();
        assert!(out.equals(&mask));
    }

    #[test]
    fn test_containment_seed_result_mask() {
        let mut mask = BinaryImage::new(&[8, 8]).unwrap();
        rect(&mut mask, 0, 8, 0, 3);
        rect(&mut mask, 4, 5, 0, 8);
        let mut seed = BinaryImage::new(&[8, 8]).unwrap();
        seed.set(&[0, 0], true);
        let out = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(2),
            3,
            EdgeCondition::Background,
        )
        .unwrap();
        // seed <= result <= mask
        let mut s = seed.clone();
        s.subtract(&out).unwrap();
        assert_eq!(s.count_foreground(), 0);
        let mut r = out.clone();
        r.subtract(&mask).unwrap();
        assert_eq!(r.count_foreground(), 0);
    }

    #[test]
    fn test_disconnected_region_unreached() {
        let mut mask = BinaryImage::new(&[7, 7]).unwrap();
        rect(&mut mask, 1, 3, 1, 3);
        rect(&mut mask, 4, 6, 4, 6);
        let mut seed = BinaryImage::new(&[7, 7]).unwrap();
        seed.set(&[1, 1], true);
        let out = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(1),
            0,
            EdgeCondition::Background,
        )
        .unwrap();
        assert!(out.get(&[2, 2]));
        assert!(!out.get(&[5, 5]));
        assert_eq!(out.count_foreground(), 4);
    }

    #[test]
    fn test_iteration_limit_bounds_growth() {
        let mut mask = BinaryImage::new(&[1, 9]).unwrap();
        rect(&mut mask, 0, 1, 0, 9);
        let mut seed = BinaryImage::new(&[1, 9]).unwrap();
        seed.set(&[0, 0], true);
        let out = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(1),
            3,
            EdgeCondition::Background,
        )
        .unwrap();
        // Seed pixel plus three propagation steps along the line.
        assert_eq!(out.count_foreground(), 4);
        assert!(out.get(&[0, 3]));
        assert!(!out.get(&[0, 4]));
    }

    #[test]
    fn test_empty_seed_background_edge_is_empty() {
        let mut mask = BinaryImage::new(&[5, 5]).unwrap();
        rect(&mut mask, 0, 5, 0, 5);
        let out = binary_propagation(
            None,
            &mask,
            Connectivity::Fixed(1),
            0,
            EdgeCondition::Background,
        )
        .unwrap();
        assert_eq!(out.count_foreground(), 0);
    }

    #[test]
    fn test_empty_seed_object_edge_floods_from_border() {
        let mut mask = BinaryImage::new(&[5, 5]).unwrap();
        rect(&mut mask, 0, 5, 0, 5);
        let out = binary_propagation(
            None,
            &mask,
            Connectivity::Fixed(1),
            0,
            EdgeCondition::Object,
        )
        .unwrap();
        assert!(out.equals(&mask));
    }

    #[test]
    fn test_seed_outside_mask_clipped() {
        let mut mask = BinaryImage::new(&[5, 5]).unwrap();
        rect(&mut mask, 2, 4, 2, 4);
        let mut seed = BinaryImage::new(&[5, 5]).unwrap();
        seed.set(&[0, 0], true);
        let out = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(2),
            0,
            EdgeCondition::Background,
        )
        .unwrap();
        // The stray seed is not inside the mask and not adjacent to it.
        assert_eq!(out.count_foreground(), 0);
    }

    #[test]
    fn test_edge_objects_remove() {
        let mut img = BinaryImage::new(&[7, 7]).unwrap();
        // Component touching the top edge and an interior component.
        rect(&mut img, 0, 3, 2, 4);
        rect(&mut img, 4, 6, 4, 6);
        let out = edge_objects_remove(&img, Connectivity::Fixed(2)).unwrap();
        assert!(!out.get(&[0, 2]));
        assert!(!out.get(&[2, 3]));
        assert!(out.get(&[4, 4]));
        assert_eq!(out.count_foreground(), 4);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let mask = BinaryImage::new(&[4, 4]).unwrap();
        let seed = BinaryImage::new(&[4, 5]).unwrap();
        assert!(
            binary_propagation(
                Some(&seed),
                &mask,
                Connectivity::Fixed(1),
                0,
                EdgeCondition::Background,
            )
            .is_err()
        );
    }

    #[test]
    fn test_3d_propagation() {
        let mut mask = BinaryImage::new(&[3, 3, 5]).unwrap();
        for x in 0..5 {
            mask.set(&[1, 1, x], true);
        }
        let mut seed = BinaryImage::new(&[3, 3, 5]).unwrap();
        seed.set(&[1, 1, 0], true);
        let out = binary_propagation(
            Some(&seed),
            &mask,
            Connectivity::Fixed(3),
            0,
            EdgeCondition::Background,
        )
        .unwrap();
        assert!(out.equals(&mask));
    }
}
