//! Common test utilities
#![allow(dead_code)]

use elemr::dtype::{DType, Element};
use elemr::runtime::cpu::{CpuClient, CpuDevice, CpuRuntime, ParallelismConfig};
use elemr::runtime::Runtime;
use elemr::tensor::Tensor;

/// Route `log` output through the test harness
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Create a CPU client and device for testing
pub fn create_cpu_client() -> (CpuClient, CpuDevice) {
    init_logging();
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    (client, device)
}

/// CPU client that parallelizes anything longer than `chunk` elements
pub fn create_parallel_client(threads: usize, chunk: usize) -> (CpuClient, CpuDevice) {
    let (client, device) = create_cpu_client();
    let client = client
        .with_parallelism(ParallelismConfig::new(Some(threads), Some(chunk)))
        .expect("thread pool");
    (client, device)
}

/// Contiguous tensor from host data
pub fn tensor<T: Element>(data: &[T], shape: &[usize], device: &CpuDevice) -> Tensor<CpuRuntime> {
    Tensor::<CpuRuntime>::from_slice(data, shape, device).expect("from_slice")
}

/// Zeroed output tensor
pub fn output(shape: &[usize], dtype: DType, device: &CpuDevice) -> Tensor<CpuRuntime> {
    Tensor::<CpuRuntime>::zeros(shape, dtype, device).expect("zeros")
}

/// Assert two f64 slices are close within tolerance
///
/// Uses the formula: |a - b| <= atol + rtol * |b|
pub fn assert_allclose_f64(a: &[f64], b: &[f64], rtol: f64, atol: f64, msg: &str) {
    assert_eq!(a.len(), b.len(), "{}: length mismatch", msg);
    for (i, (x, y)) in a.iter().zip(b.iter()).enumerate() {
        if x.is_nan() && y.is_nan() {
            continue;
        }
        if x.is_infinite() || y.is_infinite() {
            assert_eq!(x, y, "{}: element {} differs", msg, i);
            continue;
        }
        let diff = (x - y).abs();
        let tol = atol + rtol * y.abs();
        assert!(
            diff <= tol,
            "{}: element {} differs: {} vs {} (diff={}, tol={})",
            msg,
            i,
            x,
            y,
            diff,
            tol
        );
    }
}

/// Returns (rtol, atol) tolerance pair for a given dtype
pub fn tolerance_for_dtype(dtype: DType) -> (f64, f64) {
    match dtype {
        DType::F64 => (1e-12, 1e-14),
        DType::F32 => (1e-5, 1e-6),
        DType::F16 => (1e-2, 1e-2),
        _ => (0.0, 0.0),
    }
}

/// Read any tensor back as f64 values
pub fn to_f64_vec(t: &Tensor<CpuRuntime>) -> Vec<f64> {
    fn read<T: Element>(t: &Tensor<CpuRuntime>) -> Vec<f64> {
        t.to_vec::<T>()
            .expect("to_vec")
            .into_iter()
            .map(Element::to_f64)
            .collect()
    }
    match t.dtype() {
        DType::F64 => read::<f64>(t),
        DType::F32 => read::<f32>(t),
        DType::F16 => read::<half::f16>(t),
        DType::I64 => read::<i64>(t),
        DType::I32 => read::<i32>(t),
        DType::I16 => read::<i16>(t),
        DType::I8 => read::<i8>(t),
        DType::U8 => read::<u8>(t),
    }
}

/// Build a tensor of `dtype` from f64 values, converting with the scalar rule
pub fn tensor_from_f64(
    values: &[f64],
    shape: &[usize],
    dtype: DType,
    device: &CpuDevice,
) -> Tensor<CpuRuntime> {
    fn build<T: Element>(values: &[f64], shape: &[usize], device: &CpuDevice) -> Tensor<CpuRuntime> {
        let data: Vec<T> = values.iter().map(|&v| T::cast_from(v)).collect();
        tensor(&data, shape, device)
    }
    match dtype {
        DType::F64 => build::<f64>(values, shape, device),
        DType::F32 => build::<f32>(values, shape, device),
        DType::F16 => build::<half::f16>(values, shape, device),
        DType::I64 => build::<i64>(values, shape, device),
        DType::I32 => build::<i32>(values, shape, device),
        DType::I16 => build::<i16>(values, shape, device),
        DType::I8 => build::<i8>(values, shape, device),
        DType::U8 => build::<u8>(values, shape, device),
    }
}
