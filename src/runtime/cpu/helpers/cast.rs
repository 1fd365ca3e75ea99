//! Dtype conversion for CPU tensors

use super::super::kernels::elementwise::elementwise_unary;
use super::super::{CpuClient, CpuRuntime};
use super::{read_view, write_view};
use crate::dispatch_dtype;
use crate::dtype::{DType, Element};
use crate::error::Result;
use crate::tensor::Tensor;

/// Convert `a` into a new contiguous tensor of `dtype`
///
/// Returns a shared view when the dtype already matches.
pub fn cast_impl(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    dtype: DType,
) -> Result<Tensor<CpuRuntime>> {
    if a.dtype() == dtype {
        return Ok(a.clone());
    }

    let out = Tensor::<CpuRuntime>::empty(a.shape(), dtype, a.device())?;
    log::debug!(
        "cast {:?} {} -> {} ({} elements)",
        a.shape(),
        a.dtype(),
        dtype,
        a.numel()
    );

    dispatch_dtype!(a.dtype(), S => {
        dispatch_dtype!(dtype, D => {
            cast_typed::<S, D>(client, a, &out)
        })
    })?;

    Ok(out)
}

fn cast_typed<S: Element, D: Element>(
    client: &CpuClient,
    a: &Tensor<CpuRuntime>,
    out: &Tensor<CpuRuntime>,
) -> Result<()> {
    // SAFETY: dtypes were resolved by dispatch; `out` is freshly allocated
    unsafe {
        elementwise_unary(
            client,
            |_, x: S, o: &mut D| *o = D::cast_from(x),
            read_view::<S>(a),
            write_view::<D>(out),
        )
    }
}
