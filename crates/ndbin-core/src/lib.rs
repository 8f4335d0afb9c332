//! ndbin-core - Core data structures for N-dimensional binary image analysis
//!
//! This crate provides the image containers shared by the ndbin crates:
//!
//! - [`Image`]: an N-dimensional sample array described by a size vector,
//!   a signed stride vector and an origin offset, supporting axis reversal
//!   and cropping without copying
//! - [`BinaryImage`]: one status byte per pixel, logical sample in bit 0,
//!   with pixelwise boolean algebra, counting and comparison
//! - [`CountImage`]: integer output of neighbor-counting filters
//! - [`CoordsComputer`]: recovery of pixel coordinates from buffer offsets
//! - border padding and extraction ([`Image::pad`] / [`Image::unpad`])

mod binary;
mod error;
mod image;

pub use binary::{BinaryImage, CountImage, SAMPLE_BIT};
pub use error::{CoreError, Result};
pub use image::{CoordsComputer, Image, Line, LineWalker};
