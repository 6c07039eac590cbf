//! The [Tensor] struct, the [Cpu] device it allocates on, and the [Error]
//! type shared by everything fallible in this crate.
//!
//! At a high level a tensor consists of only three parts
//! 1. A [UniqueId] to tell tensors (and aliases of the same buffer) apart
//! 2. A flat row-major buffer shared behind a [std::sync::Arc]
//! 3. A [Shape](crate::shapes::Shape) describing the extents of each axis
//!
//! # Creating tensors
//!
//! Devices construct tensors from existing data, zeros, or a distribution:
//!
//! ```rust
//! # use ndperm::prelude::*;
//! let dev: Cpu = Default::default();
//! let t = dev.tensor_from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], [2, 3]);
//! let z: Tensor<f32> = dev.zeros_like([2, 3]);
//! let r: Tensor<f32> = dev.sample_like([2, 3], rand_distr::StandardNormal);
//! # assert_eq!(t.shape().num_elements(), 6);
//! # assert_eq!(z.as_vec(), [0.0; 6]);
//! # assert_eq!(r.shape().dims(), &[2, 3]);
//! ```

mod cpu;
mod error;
mod storage_traits;
mod tensor;
mod unique_id;

pub use cpu::Cpu;
pub use error::Error;
pub use storage_traits::{SampleTensor, Storage, TensorFromVec, ZerosTensor};
pub use tensor::Tensor;
pub use unique_id::UniqueId;
