use std::sync::Arc;

use crate::shapes::Shape;

use super::cpu::Cpu;
use super::storage_traits::Storage;
use super::unique_id::{unique_id, UniqueId};

/// A dense array of `E` with a runtime [Shape], stored flat in row-major
/// order on device `D`.
///
/// The buffer lives behind an [Arc], so cloning a tensor never copies the
/// elements. Ops lean on this: when a transform turns out to be a no-op they
/// hand back an alias of the same storage instead of a fresh allocation, and
/// [Tensor::shares_data_with] makes that observable.
#[derive(Debug, Clone)]
pub struct Tensor<E, D: Storage<E> = Cpu> {
    pub(crate) id: UniqueId,
    pub(crate) data: Arc<D::Vec>,
    pub(crate) shape: Shape,
    pub(crate) device: D,
}

impl<E, D: Storage<E>> Tensor<E, D> {
    pub(crate) fn from_parts(device: &D, data: Arc<D::Vec>, shape: Shape) -> Self {
        Self {
            id: unique_id(),
            data,
            shape,
            device: device.clone(),
        }
    }

    #[inline]
    pub fn id(&self) -> UniqueId {
        self.id
    }

    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Copies the flat buffer out into a plain [Vec].
    pub fn as_vec(&self) -> Vec<E> {
        self.device.tensor_to_vec(self)
    }

    /// True when both tensors are views over the same underlying storage,
    /// e.g. the two sides of an identity permutation. Mutating through one
    /// side would be visible through the other.
    pub fn shares_data_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}
