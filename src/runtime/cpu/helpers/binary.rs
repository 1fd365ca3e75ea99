//! Shared shell of every CPU binary kernel
//!
//! All (operation, operand pattern) pairs run through the same steps:
//!
//! 1. every array operand must be on the output's device
//! 2. the output must be writable and every array input must broadcast to it
//! 3. the operation must accept the output dtype
//! 4. inputs of another dtype are converted to the output dtype
//! 5. the output dtype is dispatched once; a scalar operand is converted once
//! 6. the elementwise iterator applies the primitive
//!
//! Steps 1-3 only inspect metadata, so a rejected call never writes `out`.

use super::super::kernels::elementwise::{elementwise_binary, elementwise_unary};
use super::super::{CpuClient, CpuRuntime};
use super::{cast_impl, read_view, write_view};
use crate::dtype::Element;
use crate::error::{Error, Result};
use crate::ops::primitives::{IntegralPrimitive, NumericPrimitive};
use crate::ops::{BinaryOp, BinaryOperands, broadcast_shape};
use crate::runtime::Device;
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use crate::{dispatch_integral_dtype, dispatch_numeric_dtype};

/// Operands after validation: cast to the output dtype and broadcast to
/// the output shape
enum Prepared {
    ArrayArray(Tensor<CpuRuntime>, Tensor<CpuRuntime>),
    ArrayScalar(Tensor<CpuRuntime>, Scalar),
    ScalarArray(Scalar, Tensor<CpuRuntime>),
}

/// Binary kernel for a primitive defined on every numeric dtype
pub fn numeric_binary_impl<P: NumericPrimitive>(
    client: &CpuClient,
    op: BinaryOp,
    operands: BinaryOperands<'_, CpuRuntime>,
    out: &Tensor<CpuRuntime>,
) -> Result<()> {
    let prepared = prepare(client, op, operands, out)?;
    dispatch_numeric_dtype!(out.dtype(), T => {
        run_typed::<T, _>(client, prepared, out, P::apply::<T>)
    }, op.name())
}

/// Binary kernel for a primitive defined on integral dtypes only
pub fn integral_binary_impl<P: IntegralPrimitive>(
    client: &CpuClient,
    op: BinaryOp,
    operands: BinaryOperands<'_, CpuRuntime>,
    out: &Tensor<CpuRuntime>,
) -> Result<()> {
    let prepared = prepare(client, op, operands, out)?;
    dispatch_integral_dtype!(out.dtype(), T => {
        run_typed::<T, _>(client, prepared, out, P::apply::<T>)
    }, op.name())
}

fn prepare(
    client: &CpuClient,
    op: BinaryOp,
    operands: BinaryOperands<'_, CpuRuntime>,
    out: &Tensor<CpuRuntime>,
) -> Result<Prepared> {
    for input in operands.arrays() {
        if !input.device().is_same(out.device()) {
            return Err(Error::device_mismatch(
                input.device().name(),
                out.device().name(),
            ));
        }
    }

    if out.layout().has_broadcast_dims() {
        return Err(Error::broadcast(out.shape(), out.shape()));
    }
    // an input fits when broadcasting it against the output leaves the
    // output shape unchanged
    for input in operands.arrays() {
        if broadcast_shape(input.shape(), out.shape()).as_deref() != Some(out.shape()) {
            return Err(Error::broadcast(input.shape(), out.shape()));
        }
    }

    let dtype = out.dtype();
    op.supported_dtypes().check(dtype, op.name())?;

    log::trace!(
        "{}{} dtype={} numel={}",
        op.kernel_name(),
        operands.pattern().suffix(),
        dtype,
        out.numel()
    );

    let conform = |t: &Tensor<CpuRuntime>| -> Result<Tensor<CpuRuntime>> {
        cast_impl(client, t, dtype)?.broadcast_to(out.shape())
    };

    Ok(match operands {
        BinaryOperands::ArrayArray(a, b) => Prepared::ArrayArray(conform(a)?, conform(b)?),
        BinaryOperands::ArrayScalar(a, s) => Prepared::ArrayScalar(conform(a)?, s),
        BinaryOperands::ScalarArray(s, b) => Prepared::ScalarArray(s, conform(b)?),
    })
}

fn run_typed<T, F>(
    client: &CpuClient,
    prepared: Prepared,
    out: &Tensor<CpuRuntime>,
    primitive: F,
) -> Result<()>
where
    T: Element,
    F: Fn(T, T) -> T + Sync,
{
    debug_assert_eq!(out.dtype(), T::DTYPE);

    // SAFETY: every tensor below has dtype T (checked or cast in prepare);
    // the output has no broadcast dimensions
    unsafe {
        match prepared {
            Prepared::ArrayArray(a, b) => elementwise_binary(
                client,
                |_, x: T, y: T, o: &mut T| *o = primitive(x, y),
                read_view::<T>(&a),
                read_view::<T>(&b),
                write_view::<T>(out),
            ),
            Prepared::ArrayScalar(a, s) => {
                let s: T = s.to();
                elementwise_unary(
                    client,
                    |_, x: T, o: &mut T| *o = primitive(x, s),
                    read_view::<T>(&a),
                    write_view::<T>(out),
                )
            }
            Prepared::ScalarArray(s, b) => {
                let s: T = s.to();
                elementwise_unary(
                    client,
                    |_, x: T, o: &mut T| *o = primitive(s, x),
                    read_view::<T>(&b),
                    write_view::<T>(out),
                )
            }
        }
    }
}

