//! Border marking
//!
//! Marks the outer shell of an image in a chosen status-bit plane. The
//! propagation loops test this single bit instead of comparing
//! coordinates, so only genuine border pixels ever pay for an in-image
//! check; interior pixels dereference their neighbor offsets directly.

use crate::bits::{self, PixelBit};
use ndbin_core::BinaryImage;

/// Set `bit` on every pixel touching the outer shell and clear it on
/// every interior pixel.
pub fn mark_border(image: &mut BinaryImage, bit: PixelBit) {
    apply_to_shell(image, bit, true);
}

/// Clear `bit` within the outer shell, leaving interior pixels untouched.
pub fn clear_border(image: &mut BinaryImage, bit: PixelBit) {
    apply_to_shell(image, bit, false);
}

fn apply_to_shell(image: &mut BinaryImage, bit: PixelBit, mark: bool) {
    let ndims = image.dimensionality();
    let dim = ndims - 1;
    let n = image.size(dim);
    let stride = image.stride(dim);
    let sizes: Vec<usize> = image.sizes().to_vec();
    for line in image.lines(dim) {
        let on_shell = line
            .coords
            .iter()
            .enumerate()
            .any(|(d, &c)| d != dim && (c == 0 || c == sizes[d] - 1));
        let data = image.data_mut();
        let mut off = line.offset as isize;
        for i in 0..n {
            let byte = &mut data[off as usize];
            if on_shell || i == 0 || i == n - 1 {
                if mark {
                    bits::set(byte, bit);
                } else {
                    bits::clear(byte, bit);
                }
            } else if mark {
                bits::clear(byte, bit);
            }
            off += stride;
        }
    }
}
