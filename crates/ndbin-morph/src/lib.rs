//! ndbin-morph - Binary morphology propagation engine
//!
//! This crate provides queue-driven binary morphology over N-dimensional
//! boolean images:
//!
//! - Breadth-first dilation, erosion, opening and closing with
//!   configurable edge conditions and alternating connectivity
//! - Seeded conditional propagation (geodesic reconstruction) and
//!   edge-object removal
//! - Ternary hit-or-miss intervals with 45/90/180-degree rotation
//!   generation
//! - Sup- and inf-generating operators and their unions/intersections
//! - Iterative thinning and thickening over interval arrays, plus a
//!   queue-driven 2-D specialization with a precomputed topology table
//! - Neighbor counting and majority voting
//! - Morphological sequence strings for chaining operations

pub mod bits;
pub mod border;
pub mod count;
mod error;
pub mod hitmiss;
pub mod interval;
pub mod interval_sets;
pub mod neighborhood;
pub mod propagation;
mod queue;
pub mod reconstruction;
pub mod sequence;
pub mod thin2d;
pub mod thinning;

pub use error::{MorphError, MorphResult};

// Re-export the propagation core
pub use propagation::{
    EdgeCondition, OpeningEdge, binary_closing, binary_dilation, binary_erosion, binary_opening,
};

// Re-export seeded propagation
pub use reconstruction::{binary_propagation, edge_objects_remove};

// Re-export intervals and the generating operators
pub use hitmiss::{
    Expansion, inf_generating, intersection_inf_generating, sup_generating, union_sup_generating,
};
pub use interval::{Interval, IntervalElement, RotationOrder, invert_interval_array};
pub use interval_sets::{
    boundary_pixel_intervals, branch_pixel_intervals, end_pixel_intervals,
    homotopic_end_pixel_intervals, homotopic_thickening_intervals, homotopic_thinning_intervals,
    single_pixel_interval,
};

// Re-export thinning and thickening
pub use thin2d::{EndPixelCondition, conditional_thickening_2d, conditional_thinning_2d};
pub use thinning::{binary_thickening, binary_thinning, homotopic_thinning};

// Re-export counting filters
pub use count::{CountMode, count_neighbors, majority_vote};

// Re-export neighborhood machinery
pub use neighborhood::{Connectivity, NeighborList};

// Re-export sequence operations
pub use sequence::{MorphOp, MorphSequence, morph_sequence};
