use rand::distributions::Distribution;
use std::vec::Vec;

use crate::shapes::Shape;

use super::{Error, Tensor};

/// Something that can store the flat element buffers tensors are built on.
///
/// This is the seam a data-parallel device would implement; the planning
/// side of the crate never looks past it.
pub trait Storage<E>: 'static + std::fmt::Debug + Default + Clone {
    /// Generic storage type
    type Vec: 'static + std::fmt::Debug + Clone + Send + Sync;

    /// Allocates a zero-filled gradient buffer the same length as `storage`.
    fn try_alloc_grad(&self, storage: &Self::Vec) -> Result<Self::Vec, Error> {
        self.try_alloc_len(self.len(storage))
    }

    fn try_alloc_len(&self, len: usize) -> Result<Self::Vec, Error>;

    fn tensor_to_vec(&self, tensor: &Tensor<E, Self>) -> Vec<E>;

    fn len(&self, v: &Self::Vec) -> usize;
}

/// Enables constructing tensors from flat buffers.
pub trait TensorFromVec<E>: Storage<E> {
    fn tensor_from_vec(&self, src: Vec<E>, shape: impl Into<Shape>) -> Tensor<E, Self> {
        self.try_tensor_from_vec(src, shape).unwrap()
    }

    /// Fails with [Error::WrongNumElements] when `src.len()` is not the
    /// shape's element count.
    fn try_tensor_from_vec(
        &self,
        src: Vec<E>,
        shape: impl Into<Shape>,
    ) -> Result<Tensor<E, Self>, Error>;
}

/// Enables zero-filled tensor allocation.
pub trait ZerosTensor<E>: Storage<E> {
    fn zeros_like(&self, shape: impl Into<Shape>) -> Tensor<E, Self> {
        self.try_zeros_like(shape).unwrap()
    }

    fn try_zeros_like(&self, shape: impl Into<Shape>) -> Result<Tensor<E, Self>, Error>;
}

/// Enables sampling tensors from a [Distribution], e.g.
/// [rand_distr::Standard] or [rand_distr::StandardNormal].
pub trait SampleTensor<E>: Storage<E> {
    fn sample_like<Dist: Distribution<E>>(
        &self,
        shape: impl Into<Shape>,
        distr: Dist,
    ) -> Tensor<E, Self> {
        self.try_sample_like(shape, distr).unwrap()
    }

    fn try_sample_like<Dist: Distribution<E>>(
        &self,
        shape: impl Into<Shape>,
        distr: Dist,
    ) -> Result<Tensor<E, Self>, Error>;
}
