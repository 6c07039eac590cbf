//! Shape related types: the runtime [Shape] of a dense row-major array and
//! the [AxisOrder] that says how its axes get rearranged.
//!
//! Example orders at rank 4:
//! ```rust
//! # use ndperm::shapes::*;
//! let full = AxisOrder::try_new(4, &[2, 3, 0, 1]).unwrap();
//! // Naming only the axes that move completes the rest in place:
//! let partial = AxisOrder::try_new(4, &[1, 0]).unwrap();
//! assert_eq!(partial.axes(), &[1, 0, 2, 3]);
//! // An empty order is the identity:
//! assert!(AxisOrder::try_new(4, &[]).unwrap().is_identity());
//! # assert!(!full.is_identity());
//! ```

mod axes;
mod shape;

pub use axes::AxisOrder;
pub use shape::Shape;
