use rand::{distributions::Distribution, Rng};
use std::{sync::Arc, vec::Vec};

use crate::dtypes::Unit;
use crate::shapes::Shape;
use crate::tensor::storage_traits::{SampleTensor, Storage, TensorFromVec, ZerosTensor};
use crate::tensor::{Error, Tensor};

use super::Cpu;

impl Cpu {
    #[inline]
    pub(crate) fn try_alloc_elem<E: Unit>(&self, numel: usize, elem: E) -> Result<Vec<E>, Error> {
        let mut data: Vec<E> = Vec::new();
        data.try_reserve(numel).map_err(|_| Error::OutOfMemory)?;
        data.resize(numel, elem);
        Ok(data)
    }
}

impl<E: Unit> Storage<E> for Cpu {
    type Vec = Vec<E>;

    fn try_alloc_len(&self, len: usize) -> Result<Self::Vec, Error> {
        self.try_alloc_elem(len, Default::default())
    }

    fn tensor_to_vec(&self, tensor: &Tensor<E, Self>) -> Vec<E> {
        tensor.data.as_ref().clone()
    }

    fn len(&self, v: &Self::Vec) -> usize {
        v.len()
    }
}

impl<E: Unit> TensorFromVec<E> for Cpu {
    fn try_tensor_from_vec(
        &self,
        src: Vec<E>,
        shape: impl Into<Shape>,
    ) -> Result<Tensor<E, Self>, Error> {
        let shape = shape.into();
        if src.len() != shape.num_elements() {
            return Err(Error::WrongNumElements);
        }
        Ok(Tensor::from_parts(self, Arc::new(src), shape))
    }
}

impl<E: Unit> ZerosTensor<E> for Cpu {
    fn try_zeros_like(&self, shape: impl Into<Shape>) -> Result<Tensor<E, Self>, Error> {
        let shape = shape.into();
        let data = self.try_alloc_elem(shape.num_elements(), Default::default())?;
        Ok(Tensor::from_parts(self, Arc::new(data), shape))
    }
}

impl<E: Unit> SampleTensor<E> for Cpu {
    fn try_sample_like<Dist: Distribution<E>>(
        &self,
        shape: impl Into<Shape>,
        distr: Dist,
    ) -> Result<Tensor<E, Self>, Error> {
        let shape = shape.into();
        let mut data = self.try_alloc_elem(shape.num_elements(), Default::default())?;
        {
            let mut rng = self.rng.lock().unwrap();
            for e in data.iter_mut() {
                *e = rng.sample(&distr);
            }
        }
        Ok(Tensor::from_parts(self, Arc::new(data), shape))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_from_vec_checks_len() {
        let dev: Cpu = Default::default();
        assert_eq!(
            dev.try_tensor_from_vec(vec![0.0f32; 5], [2, 3]).err(),
            Some(Error::WrongNumElements)
        );
        let t = dev.tensor_from_vec(vec![0.0f32; 6], [2, 3]);
        assert_eq!(t.shape().dims(), &[2, 3]);
    }

    #[test]
    fn test_zeros_like() {
        let dev: Cpu = Default::default();
        let t: Tensor<f64> = dev.zeros_like([3, 4]);
        assert_eq!(t.as_vec(), vec![0.0; 12]);
    }

    #[test]
    fn test_sampling_is_seeded() {
        let a: Cpu = Default::default();
        let b: Cpu = Default::default();
        let ta: Tensor<f32> = a.sample_like([2, 3], rand_distr::Standard);
        let tb: Tensor<f32> = b.sample_like([2, 3], rand_distr::Standard);
        assert_eq!(ta.as_vec(), tb.as_vec());
    }
}
