//! ndbin - N-dimensional binary image analysis
//!
//! Boolean images of arbitrary dimensionality with queue-driven binary
//! morphology: dilation, erosion, opening and closing, geodesic
//! reconstruction, hit-or-miss transforms, topology-preserving thinning
//! and thickening, and neighbor-counting filters.
//!
//! # Example
//!
//! ```
//! use ndbin::BinaryImage;
//! use ndbin::morph::{Connectivity, EdgeCondition, binary_dilation};
//!
//! let mut img = BinaryImage::new(&[32, 32]).unwrap();
//! img.set(&[16, 16], true);
//! let grown = binary_dilation(
//!     &img,
//!     Connectivity::Fixed(2),
//!     1,
//!     EdgeCondition::Background,
//! )
//! .unwrap();
//! assert_eq!(grown.count_foreground(), 9);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use ndbin_core::*;

// Re-export the morphology engine as a module
pub use ndbin_morph as morph;
