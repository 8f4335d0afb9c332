//! Neighbor counting and majority voting
//!
//! A scanline filter: for each pixel, count the foreground pixels among
//! its neighbors. The image is walked line by line along the dimension
//! with the smallest stride magnitude; a line is flagged up front when
//! it touches the image border in any other dimension. Positions on
//! unflagged lines away from the line ends take the unchecked path and
//! never test neighbor coordinates. Out-of-image neighbors contribute
//! according to the edge condition.

use crate::error::MorphResult;
use crate::neighborhood::NeighborList;
use crate::propagation::EdgeCondition;
use ndbin_core::{BinaryImage, CountImage, SAMPLE_BIT};

/// Which pixels receive a count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    /// Count neighbors of foreground pixels only; background pixels
    /// output zero and the center does not contribute.
    #[default]
    Foreground,
    /// Count neighbors of every pixel, adding the center pixel's own
    /// foreground value to its count.
    All,
}

/// Count foreground neighbors of each pixel.
///
/// Counts range over `[0, t]` in `Foreground` mode and `[0, t + 1]` in
/// `All` mode, where `t` is the neighbor table size for the requested
/// connectivity.
pub fn count_neighbors(
    input: &BinaryImage,
    connectivity: usize,
    mode: CountMode,
    edge: EdgeCondition,
) -> MorphResult<CountImage> {
    let list = NeighborList::new(connectivity, input.strides())?;
    let outside = u32::from(edge.outside_value());

    let ndims = input.dimensionality();
    let dim = (0..ndims)
        .min_by_key(|&d| input.stride(d).unsigned_abs())
        .expect("image has at least one dimension");
    let n = input.size(dim);
    let stride = input.stride(dim);
    let sizes: Vec<usize> = input.sizes().to_vec();

    let mut out = CountImage::new(&sizes)?;
    let mut coords = vec![0usize; ndims];
    for line in input.lines(dim) {
        let line_on_border = line
            .coords
            .iter()
            .enumerate()
            .any(|(d, &c)| d != dim && (c == 0 || c == sizes[d] - 1));
        let mut src = line.offset as isize;
        let mut dst = out.offset_of(&line.coords) as isize;
        let out_stride = out.stride(dim);
        for i in 0..n {
            let center = input.data()[src as usize] & SAMPLE_BIT != 0;
            let mut count = 0u32;
            if mode == CountMode::All || center {
                let checked = line_on_border || i == 0 || i == n - 1;
                if checked {
                    coords.copy_from_slice(&line.coords);
                    coords[dim] = i;
                    for k in 0..list.len() {
                        if list.in_image(k, &coords, &sizes) {
                            let nb = (src + list.neighbor(k).offset()) as usize;
                            count += u32::from(input.data()[nb] & SAMPLE_BIT);
                        } else {
                            count += outside;
                        }
                    }
                } else {
                    for neighbor in list.iter() {
                        let nb = (src + neighbor.offset()) as usize;
                        count += u32::from(input.data()[nb] & SAMPLE_BIT);
                    }
                }
                if mode == CountMode::All {
                    count += u32::from(center);
                }
            }
            out.data_mut()[dst as usize] = count;
            src += stride;
            dst += out_stride;
        }
    }
    Ok(out)
}

/// Majority vote: foreground where more than half of the neighborhood
/// (neighbors plus center) is foreground.
pub fn majority_vote(
    input: &BinaryImage,
    connectivity: usize,
    edge: EdgeCondition,
) -> MorphResult<BinaryImage> {
    let list = NeighborList::new(connectivity, input.strides())?;
    let threshold = (list.len() as u32 + 1) / 2;
    let counts = count_neighbors(input, connectivity, CountMode::All, edge)?;

    let mut out = BinaryImage::new(input.sizes())?;
    let dim = out.dimensionality() - 1;
    let n = out.size(dim);
    let c_stride = counts.stride(dim);
    let o_stride = out.stride(dim);
    for line in counts.lines(dim) {
        let mut src = line.offset as isize;
        let mut dst = out.offset_of(&line.coords) as isize;
        for _ in 0..n {
            out.data_mut()[dst as usize] =
                if counts.data()[src as usize] > threshold { SAMPLE_BIT } else { 0 };
            src += c_stride;
            dst += o_stride;
        }
    }
    Ok(out)
}
