//! The permutation op: plan with [Permute], run it across passes, or go
//! through [PermuteTo] for one-shot use.

mod permute_to;

pub use permute_to::{Permute, PermuteKernel, PermutePlan, PermuteTo};
