//! Binary operations trait.

use crate::error::Result;
use crate::ops::BinaryOp;
use crate::runtime::Runtime;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

/// Element-wise binary operations writing into a caller-provided output.
///
/// The output decides everything about the result: its shape is the
/// iteration shape, its dtype is the computation dtype and its device is the
/// device the work runs on. Inputs are broadcast to the output shape, and
/// inputs of another dtype are converted to the output dtype first.
///
/// A call either writes every output element or, on error, none of them.
///
/// # Example
///
/// ```
/// use elemr::prelude::*;
///
/// let device = CpuDevice::new();
/// let client = CpuRuntime::default_client(&device);
///
/// let a = Tensor::<CpuRuntime>::from_slice(&[7i32, -7, 7, -7], &[4], &device)?;
/// let b = Tensor::<CpuRuntime>::from_slice(&[2i32, 2, -2, -2], &[4], &device)?;
/// let out = Tensor::<CpuRuntime>::zeros(&[4], DType::I32, &device)?;
///
/// client.floor_divide(&a, &b, &out)?;
/// assert_eq!(out.to_vec::<i32>()?, [3, -4, -4, 3]);
/// # Ok::<(), elemr::error::Error>(())
/// ```
pub trait BinaryOps<R: Runtime> {
    /// `out = op(a, b)`
    ///
    /// # Errors
    /// - `DeviceMismatch` if `a`, `b` and `out` are not on one device
    /// - `BroadcastError` if an input does not broadcast to `out`, or `out`
    ///   is itself a broadcast view
    /// - `UnsupportedDType` if `op` is not defined for `out.dtype()`
    fn binary_op(&self, op: BinaryOp, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>)
    -> Result<()>;

    /// `out = op(a, scalar)`
    fn binary_op_scalar(
        &self,
        op: BinaryOp,
        a: &Tensor<R>,
        scalar: Scalar,
        out: &Tensor<R>,
    ) -> Result<()>;

    /// `out = op(scalar, b)`
    fn scalar_binary_op(
        &self,
        op: BinaryOp,
        scalar: Scalar,
        b: &Tensor<R>,
        out: &Tensor<R>,
    ) -> Result<()>;

    /// `out = a + b`
    fn add(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::Add, a, b, out)
    }

    /// `out = a - b`
    fn subtract(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::Subtract, a, b, out)
    }

    /// `out = a * b`
    fn multiply(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::Multiply, a, b, out)
    }

    /// `out = a / b`
    ///
    /// Integer division by zero writes 0.
    fn divide(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::Divide, a, b, out)
    }

    /// `out = floor(a / b)`
    ///
    /// Integer division by zero writes 0.
    fn floor_divide(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::FloorDivide, a, b, out)
    }

    /// `out = a & b`, integral dtypes only
    fn bitwise_and(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::BitwiseAnd, a, b, out)
    }

    /// `out = a | b`, integral dtypes only
    fn bitwise_or(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::BitwiseOr, a, b, out)
    }

    /// `out = a ^ b`, integral dtypes only
    fn bitwise_xor(&self, a: &Tensor<R>, b: &Tensor<R>, out: &Tensor<R>) -> Result<()> {
        self.binary_op(BinaryOp::BitwiseXor, a, b, out)
    }
}
