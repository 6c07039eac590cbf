use super::Shape;
use crate::tensor::Error;

/// A complete ordering of an array's axes: axis `j` of the permuted array is
/// axis `axes()[j]` of the source.
///
/// Built from a possibly partial user order. Axes the user does not mention
/// are appended in ascending order, so callers name only the axes that move:
/// `(1, 0)` at rank 4 completes to `(1, 0, 2, 3)`. Whether any movement is
/// needed at all is decided here, once, and cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisOrder {
    order: Vec<usize>,
    need_permute: bool,
}

impl AxisOrder {
    /// Validates `user_order` against `rank` and completes it.
    ///
    /// Every entry must satisfy `0 <= axis < rank`
    /// ([Error::AxisOutOfRange]) and appear at most once
    /// ([Error::DuplicateAxis]).
    pub fn try_new(rank: usize, user_order: &[isize]) -> Result<Self, Error> {
        let mut order = Vec::with_capacity(rank);
        for &axis in user_order {
            if axis < 0 || axis as usize >= rank {
                return Err(Error::AxisOutOfRange { axis, rank });
            }
            if order.contains(&(axis as usize)) {
                return Err(Error::DuplicateAxis { axis });
            }
            order.push(axis as usize);
        }
        for axis in 0..rank {
            if !order.contains(&axis) {
                order.push(axis);
            }
        }
        // A failure here is a bug in the completion above, not bad input.
        assert_eq!(
            order.len(),
            rank,
            "completed axis order {order:?} does not cover rank {rank}"
        );
        let need_permute = order.iter().enumerate().any(|(i, &axis)| axis != i);
        Ok(Self {
            order,
            need_permute,
        })
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.order.len()
    }

    /// For each output axis, the source axis that supplies it.
    #[inline]
    pub fn axes(&self) -> &[usize] {
        &self.order
    }

    /// True when the completed order is `(0, 1, ..., rank-1)` and the
    /// permuted array is element-for-element the source array.
    #[inline]
    pub fn is_identity(&self) -> bool {
        !self.need_permute
    }

    /// The permuted shape: `out[j] = shape[axes()[j]]`.
    pub fn permute_shape(&self, shape: &Shape) -> Shape {
        debug_assert_eq!(shape.num_dims(), self.rank());
        Shape::new(self.order.iter().map(|&axis| shape[axis]).collect::<Vec<_>>())
    }

    /// Recovers the source shape from a permuted one; the inverse of
    /// [AxisOrder::permute_shape].
    pub fn unpermute_shape(&self, out_shape: &Shape) -> Shape {
        debug_assert_eq!(out_shape.num_dims(), self.rank());
        let mut dims = vec![0; self.rank()];
        for (j, &axis) in self.order.iter().enumerate() {
            dims[axis] = out_shape[j];
        }
        Shape::new(dims)
    }
}
