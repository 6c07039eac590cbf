use crate::dtypes::Dtype;
use crate::tensor::{Cpu, Error};

use super::{PermuteKernel, PermutePlan};

/// Walks every output flat index and hands `f` the matching source flat
/// index. The same looping logic serves both directions; only what the
/// caller does with the index pair differs.
///
/// `i` is peeled apart against the output strides, most significant axis
/// first, and each digit is re-weighted by the source stride of the axis the
/// order maps that position to.
fn permuted_loop(plan: &PermutePlan, f: &mut impl FnMut(usize, usize)) {
    let order = plan.order.axes();
    let rank = order.len();
    for i in 0..plan.count() {
        let mut old_idx = 0;
        let mut idx = i;
        for j in 0..rank {
            old_idx += (idx / plan.new_strides[j]) * plan.old_strides[order[j]];
            idx %= plan.new_strides[j];
        }
        f(old_idx, i);
    }
}

impl<E: Dtype> PermuteKernel<E> for Cpu {
    fn forward(
        &self,
        plan: &PermutePlan,
        inp: &Self::Vec,
        out: &mut Self::Vec,
    ) -> Result<(), Error> {
        if inp.len() != plan.count() || out.len() != plan.count() {
            return Err(Error::WrongNumElements);
        }
        permuted_loop(plan, &mut |old_idx, new_idx| out[new_idx] = inp[old_idx]);
        Ok(())
    }

    fn backward(
        &self,
        plan: &PermutePlan,
        grad_inp: &mut Self::Vec,
        grad_out: &Self::Vec,
    ) -> Result<(), Error> {
        if grad_inp.len() != plan.count() || grad_out.len() != plan.count() {
            return Err(Error::WrongNumElements);
        }
        permuted_loop(plan, &mut |old_idx, new_idx| grad_inp[old_idx] += grad_out[new_idx]);
        Ok(())
    }
}
