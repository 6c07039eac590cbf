/// Represents the different errors that can occur when creating tensors or
/// configuring and launching the permutation kernels.
///
/// The configuration variants carry the offending value so the caller can
/// fix the configuration without guessing.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Device is out of memory
    OutOfMemory,
    /// A buffer holds a different number of elements than its shape (or the
    /// active plan) calls for.
    WrongNumElements,
    /// An axis in a user-specified order was negative or `>= rank`.
    AxisOutOfRange { axis: isize, rank: usize },
    /// An axis appeared more than once in a user-specified order.
    DuplicateAxis { axis: isize },
    /// A shape's rank does not match the rank the order was configured for.
    WrongRank { expected: usize, found: usize },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for Error {}
