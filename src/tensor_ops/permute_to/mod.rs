mod cpu_kernel;

use std::sync::Arc;

use crate::dtypes::Dtype;
use crate::shapes::{AxisOrder, Shape};
use crate::tensor::{Cpu, Error, Storage, Tensor};

/// Implemented by storage devices that can run a planned permutation over
/// preallocated flat buffers.
///
/// Both directions drive the same index translation: each output flat index
/// is decomposed against the plan's output strides and re-encoded against
/// the source strides of the axes the order points at. `forward` gathers
/// (`out[i] = inp[old]`), `backward` scatters the permuted gradient back
/// (`grad_inp[old] += grad_out[i]`). Neither allocates; buffer lengths are
/// checked against [PermutePlan::count] and anything else about the plan is
/// trusted.
pub trait PermuteKernel<E: Dtype>: Storage<E> {
    fn forward(
        &self,
        plan: &PermutePlan,
        inp: &Self::Vec,
        out: &mut Self::Vec,
    ) -> Result<(), Error>;

    fn backward(
        &self,
        plan: &PermutePlan,
        grad_inp: &mut Self::Vec,
        grad_out: &Self::Vec,
    ) -> Result<(), Error>;
}

/// Stride tables binding an [AxisOrder] to one concrete input shape.
///
/// Built once per shape and shared read-only by every kernel launch until
/// the shape changes. Holds the shape it was computed for so callers can
/// tell when it has gone stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutePlan {
    order: AxisOrder,
    shape: Shape,
    out_shape: Shape,
    old_strides: Vec<usize>,
    new_strides: Vec<usize>,
}

impl PermutePlan {
    /// Computes output shape and both stride tables for `shape`.
    ///
    /// Fails with [Error::WrongRank] when `shape` has a different number of
    /// axes than `order` covers. Extents must be positive; a zero extent is
    /// a bug in the caller's shape bookkeeping and panics.
    pub fn try_new(order: &AxisOrder, shape: &Shape) -> Result<Self, Error> {
        if shape.num_dims() != order.rank() {
            return Err(Error::WrongRank {
                expected: order.rank(),
                found: shape.num_dims(),
            });
        }
        for i in 0..shape.num_dims() {
            assert!(shape[i] > 0, "axis {i} of {shape:?} has a zero extent");
        }
        let out_shape = order.permute_shape(shape);
        Ok(Self {
            old_strides: shape.strides(),
            new_strides: out_shape.strides(),
            order: order.clone(),
            shape: shape.clone(),
            out_shape,
        })
    }

    /// The number of elements a buffer on either side of the kernel must
    /// hold.
    #[inline]
    pub fn count(&self) -> usize {
        self.out_shape.num_elements()
    }

    #[inline]
    pub fn order(&self) -> &AxisOrder {
        &self.order
    }

    /// The input shape this plan was computed for.
    #[inline]
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    pub fn out_shape(&self) -> &Shape {
        &self.out_shape
    }
}

/// Axis permutation with plan reuse; the stateful op a host wires into its
/// graph.
///
/// Configure once with [Permute::try_new], rebind to a concrete shape with
/// [Permute::reshape] whenever it changes, then run [Permute::forward] and
/// [Permute::backward] once per pass. When the completed order is the
/// identity, both directions alias the argument's storage instead of moving
/// any data.
#[derive(Debug, Clone)]
pub struct Permute<D = Cpu> {
    device: D,
    order: AxisOrder,
    plan: Option<PermutePlan>,
}

impl<D: Default> Permute<D> {
    /// Validates and completes `user_order` for arrays of `rank` axes.
    pub fn try_new(rank: usize, user_order: &[isize]) -> Result<Self, Error> {
        Self::try_new_in(Default::default(), rank, user_order)
    }
}

impl<D> Permute<D> {
    pub fn try_new_in(device: D, rank: usize, user_order: &[isize]) -> Result<Self, Error> {
        Ok(Self {
            device,
            order: AxisOrder::try_new(rank, user_order)?,
            plan: None,
        })
    }

    #[inline]
    pub fn order(&self) -> &AxisOrder {
        &self.order
    }

    /// Recomputes the stride tables for `shape` and returns the output
    /// shape, for the host to size its output buffers by. A plan already
    /// built for an equal shape is kept as is.
    pub fn reshape(&mut self, shape: &Shape) -> Result<Shape, Error> {
        if let Some(plan) = &self.plan {
            if plan.shape() == shape {
                return Ok(plan.out_shape().clone());
            }
        }
        let plan = PermutePlan::try_new(&self.order, shape)?;
        let out_shape = plan.out_shape().clone();
        self.plan = Some(plan);
        Ok(out_shape)
    }

    /// Permutes `inp` into a new tensor of the permuted shape.
    ///
    /// With an identity order this returns an alias of `inp`'s storage and
    /// never touches the kernel.
    pub fn forward<E: Dtype>(&self, inp: &Tensor<E, D>) -> Result<Tensor<E, D>, Error>
    where
        D: PermuteKernel<E>,
    {
        if inp.shape().num_dims() != self.order.rank() {
            return Err(Error::WrongRank {
                expected: self.order.rank(),
                found: inp.shape().num_dims(),
            });
        }
        if self.order.is_identity() {
            // Share the data to save memory.
            return Ok(Tensor::from_parts(
                &self.device,
                inp.data.clone(),
                inp.shape.clone(),
            ));
        }
        let transient;
        let plan = match &self.plan {
            Some(plan) if plan.shape() == inp.shape() => plan,
            _ => {
                transient = PermutePlan::try_new(&self.order, inp.shape())?;
                &transient
            }
        };
        let mut out = self.device.try_alloc_len(plan.count())?;
        self.device.forward(plan, &inp.data, &mut out)?;
        Ok(Tensor::from_parts(
            &self.device,
            Arc::new(out),
            plan.out_shape().clone(),
        ))
    }

    /// Scatters a gradient of the *output* layout back into a gradient of
    /// the input layout, exactly undoing what [Permute::forward] did to the
    /// data.
    ///
    /// With an identity order this returns an alias of `grad_out`'s storage.
    pub fn backward<E: Dtype>(&self, grad_out: &Tensor<E, D>) -> Result<Tensor<E, D>, Error>
    where
        D: PermuteKernel<E>,
    {
        if grad_out.shape().num_dims() != self.order.rank() {
            return Err(Error::WrongRank {
                expected: self.order.rank(),
                found: grad_out.shape().num_dims(),
            });
        }
        if self.order.is_identity() {
            // Share the diff to save memory.
            return Ok(Tensor::from_parts(
                &self.device,
                grad_out.data.clone(),
                grad_out.shape.clone(),
            ));
        }
        let transient;
        let plan = match &self.plan {
            Some(plan) if plan.out_shape() == grad_out.shape() => plan,
            _ => {
                let shape = self.order.unpermute_shape(grad_out.shape());
                transient = PermutePlan::try_new(&self.order, &shape)?;
                &transient
            }
        };
        let mut grad_inp = self.device.try_alloc_grad(&grad_out.data)?;
        self.device.backward(plan, &mut grad_inp, &grad_out.data)?;
        Ok(Tensor::from_parts(
            &self.device,
            Arc::new(grad_inp),
            plan.shape().clone(),
        ))
    }
}

/// One-shot permutation for tensors, planning on the fly.
///
/// `order` may name only the axes that move; the rest keep their relative
/// positions. An empty order is the identity and aliases the input.
///
/// ```rust
/// # use ndperm::prelude::*;
/// # let dev: Cpu = Default::default();
/// let t = dev.tensor_from_vec((0..24).map(|i| i as f32).collect(), [2, 3, 4]);
/// let r = t.permute(&[2, 0, 1]);
/// assert_eq!(r.shape().dims(), &[4, 2, 3]);
/// ```
pub trait PermuteTo: Sized {
    fn permute(&self, order: &[isize]) -> Self {
        self.try_permute(order).unwrap()
    }
    fn try_permute(&self, order: &[isize]) -> Result<Self, Error>;
}

impl<E: Dtype, D: PermuteKernel<E>> PermuteTo for Tensor<E, D> {
    fn try_permute(&self, order: &[isize]) -> Result<Self, Error> {
        let op = Permute::try_new_in(self.device.clone(), self.shape().num_dims(), order)?;
        op.forward(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::Shape;
    use crate::tensor::{SampleTensor, TensorFromVec};
    use crate::tests::{TestDevice, TestDtype};
    use num_traits::NumCast;

    fn arange(dev: &TestDevice, shape: impl Into<Shape>) -> Tensor<TestDtype> {
        let shape = shape.into();
        let data = (0..shape.num_elements())
            .map(|i| <TestDtype as NumCast>::from(i).unwrap())
            .collect();
        dev.tensor_from_vec(data, shape)
    }

    #[test]
    fn test_permute_2d() {
        let dev: TestDevice = Default::default();
        let t = arange(&dev, [2, 3]);
        let r = t.permute(&[1, 0]);
        assert_eq!(r.shape().dims(), &[3, 2]);
        let t_data = t.as_vec();
        let r_data = r.as_vec();
        for i in 0..2 {
            for j in 0..3 {
                assert_eq!(r_data[j * 2 + i], t_data[i * 3 + j]);
            }
        }
    }

    #[test]
    fn test_permute_3d() {
        let dev: TestDevice = Default::default();
        let t: Tensor<TestDtype> = dev.sample_like([3, 5, 7], rand_distr::StandardNormal);
        let r = t.permute(&[1, 2, 0]);
        assert_eq!(r.shape().dims(), &[5, 7, 3]);
        let t_data = t.as_vec();
        let r_data = r.as_vec();
        for i in 0..3 {
            for j in 0..5 {
                for k in 0..7 {
                    assert_eq!(r_data[(j * 7 + k) * 3 + i], t_data[(i * 5 + j) * 7 + k]);
                }
            }
        }
    }

    #[test]
    fn test_permute_4d_with_partial_order() {
        let dev: TestDevice = Default::default();
        let t = arange(&dev, [2, 3, 4, 5]);
        // only the first two axes are named; (1, 0) completes to (1, 0, 2, 3)
        let r = t.permute(&[1, 0]);
        assert_eq!(r.shape().dims(), &[3, 2, 4, 5]);
        let t_data = t.as_vec();
        let r_data = r.as_vec();
        for a in 0..2 {
            for b in 0..3 {
                for c in 0..4 {
                    for d in 0..5 {
                        let old = ((a * 3 + b) * 4 + c) * 5 + d;
                        let new = ((b * 2 + a) * 4 + c) * 5 + d;
                        assert_eq!(r_data[new], t_data[old]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_double_transpose_is_identity() {
        let dev: TestDevice = Default::default();
        let t: Tensor<TestDtype> = dev.sample_like([4, 9], rand_distr::StandardNormal);
        let r = t.permute(&[1, 0]).permute(&[1, 0]);
        assert_eq!(r.as_vec(), t.as_vec());
    }

    #[test]
    fn test_identity_shares_data() {
        let dev: TestDevice = Default::default();
        let t = arange(&dev, [2, 3, 4]);

        let aliased = t.permute(&[]);
        assert!(aliased.shares_data_with(&t));
        assert_eq!(aliased.shape(), t.shape());
        // fresh handle, same storage
        assert_ne!(aliased.id(), t.id());

        let aliased = t.permute(&[0, 1, 2]);
        assert!(aliased.shares_data_with(&t));

        let moved = t.permute(&[0, 2, 1]);
        assert!(!moved.shares_data_with(&t));
    }

    #[test]
    fn test_identity_backward_shares_diff() {
        let dev: TestDevice = Default::default();
        let op: Permute = Permute::try_new(3, &[0, 1, 2]).unwrap();
        let grad_out: Tensor<TestDtype> = dev.sample_like([2, 3, 4], rand_distr::StandardNormal);
        let grad_inp = op.backward(&grad_out).unwrap();
        assert!(grad_inp.shares_data_with(&grad_out));
    }

    #[test]
    fn test_backward_undoes_forward() {
        let dev: TestDevice = Default::default();
        let mut op: Permute = Permute::try_new(3, &[2, 0, 1]).unwrap();
        let out_shape = op.reshape(&Shape::from([2, 3, 4])).unwrap();
        assert_eq!(out_shape.dims(), &[4, 2, 3]);

        let x = arange(&dev, [2, 3, 4]);
        let y = op.forward(&x).unwrap();
        assert_eq!(y.shape(), &out_shape);
        let restored = op.backward(&y).unwrap();
        assert_eq!(restored.shape(), x.shape());
        assert_eq!(restored.as_vec(), x.as_vec());
    }

    #[test]
    fn test_forward_undoes_backward() {
        let dev: TestDevice = Default::default();
        let op: Permute = Permute::try_new(4, &[3, 1, 0, 2]).unwrap();
        let y: Tensor<TestDtype> = dev.sample_like([5, 3, 2, 4], rand_distr::StandardNormal);
        let x = op.backward(&y).unwrap();
        let roundtrip = op.forward(&x).unwrap();
        assert_eq!(roundtrip.shape(), y.shape());
        assert_eq!(roundtrip.as_vec(), y.as_vec());
    }

    #[test]
    fn test_plan_is_reused_until_shape_changes() {
        let dev: TestDevice = Default::default();
        let mut op: Permute = Permute::try_new(2, &[1, 0]).unwrap();
        assert_eq!(op.reshape(&Shape::from([2, 3])).unwrap().dims(), &[3, 2]);
        assert_eq!(op.reshape(&Shape::from([2, 3])).unwrap().dims(), &[3, 2]);
        // variable leading extent, same order
        assert_eq!(op.reshape(&Shape::from([7, 3])).unwrap().dims(), &[3, 7]);

        let t = arange(&dev, [7, 3]);
        let r = op.forward(&t).unwrap();
        assert_eq!(r.shape().dims(), &[3, 7]);
    }

    #[test]
    fn test_wrong_rank_is_rejected() {
        let dev: TestDevice = Default::default();
        let mut op: Permute = Permute::try_new(3, &[1, 0]).unwrap();
        assert_eq!(
            op.reshape(&Shape::from([2, 3])),
            Err(Error::WrongRank {
                expected: 3,
                found: 2
            })
        );
        let t = arange(&dev, [2, 3]);
        assert!(op.forward(&t).is_err());
        assert!(op.backward(&t).is_err());
    }

    #[test]
    fn test_configuration_errors_propagate() {
        assert_eq!(
            Permute::<TestDevice>::try_new(2, &[0, 0]).err(),
            Some(Error::DuplicateAxis { axis: 0 })
        );
        assert_eq!(
            Permute::<TestDevice>::try_new(2, &[3]).err(),
            Some(Error::AxisOutOfRange { axis: 3, rank: 2 })
        );
    }
}
