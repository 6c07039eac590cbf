//! # ndperm
//!
//! Runtime n-dimensional axis permutation over dense row-major arrays.
//!
//! Rank, shape, and axis order are all plain run-time values, so one code
//! path serves every rank; there is no per-rank specialization anywhere.
//! The work splits in two:
//!
//! 1. **Planning**: [shapes::AxisOrder] completes and validates a possibly
//!    partial user order and decides, once, whether any data has to move at
//!    all. [tensor_ops::PermutePlan] binds an order to a concrete
//!    [shapes::Shape], precomputing the stride tables index translation
//!    runs on.
//! 2. **Execution**: [tensor_ops::PermuteKernel] applies a plan to flat
//!    buffers with pure integer index arithmetic, element-exact for any
//!    [dtypes::Dtype], in either direction: forward for data, backward for
//!    gradients flowing the other way.
//!
//! [tensor_ops::Permute] is the stateful op tying both together across
//! passes; [tensor_ops::PermuteTo] is the one-shot method on tensors.
//!
//! ```rust
//! use ndperm::prelude::*;
//!
//! let dev: Cpu = Default::default();
//! let t = dev.tensor_from_vec((0..24).map(|i| i as f32).collect(), [2, 3, 4]);
//!
//! // Name only the axes that move: (1, 0) completes to (1, 0, 2).
//! let r = t.permute(&[1, 0]);
//! assert_eq!(r.shape().dims(), &[3, 2, 4]);
//!
//! // No order change means no copy, just another handle on the storage.
//! let same = t.permute(&[]);
//! assert!(same.shares_data_with(&t));
//! ```
//!
//! Amortized use sizes buffers off [tensor_ops::Permute::reshape] and runs
//! [tensor_ops::Permute::forward] / [tensor_ops::Permute::backward] once
//! per pass, reusing the plan until the shape actually changes.

pub mod dtypes;
pub mod shapes;
pub mod tensor;
pub mod tensor_ops;

pub mod prelude {
    pub use crate::dtypes::*;
    pub use crate::shapes::*;
    pub use crate::tensor::*;
    pub use crate::tensor_ops::*;
}

#[cfg(test)]
pub(crate) mod tests {
    pub type TestDevice = crate::tensor::Cpu;
    pub type TestDtype = f32;
}
