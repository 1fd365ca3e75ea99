//! Integration tests for CPU runtime
//!
//! These tests verify the public API of the CPU runtime implementation.

use elemr::dtype::DType;
use elemr::error::Error;
use elemr::runtime::cpu::{CpuDevice, CpuRuntime, ParallelismConfig};
use elemr::runtime::{Device, Runtime, RuntimeClient};
use elemr::tensor::Tensor;

#[test]
fn test_allocate_deallocate() {
    let device = CpuDevice::new();
    let ptr = CpuRuntime::allocate(1024, &device).unwrap();
    assert_ne!(ptr, 0);
    assert_eq!(ptr % 64, 0);
    CpuRuntime::deallocate(ptr, 1024, &device);
}

#[test]
fn test_allocation_is_zeroed() {
    let device = CpuDevice::new();
    let ptr = CpuRuntime::allocate(32, &device).unwrap();
    let mut bytes = [0xffu8; 32];
    CpuRuntime::copy_from_device(ptr, &mut bytes, &device).unwrap();
    assert_eq!(bytes, [0u8; 32]);
    CpuRuntime::deallocate(ptr, 32, &device);
}

#[test]
fn test_copy_roundtrip() {
    let device = CpuDevice::new();
    let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6, 7, 8];

    let ptr = CpuRuntime::allocate(data.len(), &device).unwrap();
    CpuRuntime::copy_to_device(&data, ptr, &device).unwrap();

    let mut result = vec![0u8; data.len()];
    CpuRuntime::copy_from_device(ptr, &mut result, &device).unwrap();

    assert_eq!(data, result);

    CpuRuntime::deallocate(ptr, data.len(), &device);
}

#[test]
fn test_copy_strided_transposes() {
    let device = CpuDevice::new();
    let data: Vec<u8> = vec![1, 2, 3, 4, 5, 6];

    let src = CpuRuntime::allocate(data.len(), &device).unwrap();
    let dst = CpuRuntime::allocate(data.len(), &device).unwrap();
    CpuRuntime::copy_to_device(&data, src, &device).unwrap();

    // [2, 3] row-major read as its [3, 2] transpose
    CpuRuntime::copy_strided(src, 0, dst, &[3, 2], &[1, 3], 1, &device).unwrap();

    let mut result = vec![0u8; data.len()];
    CpuRuntime::copy_from_device(dst, &mut result, &device).unwrap();
    assert_eq!(result, [1, 4, 2, 5, 3, 6]);

    CpuRuntime::deallocate(src, data.len(), &device);
    CpuRuntime::deallocate(dst, data.len(), &device);
}

#[test]
fn test_zero_allocation() {
    let device = CpuDevice::new();
    let ptr = CpuRuntime::allocate(0, &device).unwrap();
    assert_eq!(ptr, 0);
    CpuRuntime::deallocate(ptr, 0, &device); // Should not panic
}

#[test]
fn test_devices() {
    let a = CpuDevice::new();
    let b = CpuDevice::with_index(1);
    assert_eq!(a.name(), "cpu:0");
    assert_eq!(b.name(), "cpu:1");
    assert!(a.is_same(&CpuRuntime::default_device()));
    assert!(!a.is_same(&b));
}

#[test]
fn test_client() {
    let device = CpuDevice::new();
    let client = CpuRuntime::default_client(&device);
    assert!(client.device().is_same(&device));
    client.synchronize();
}

#[test]
fn test_parallelism_config_validation() {
    let client = CpuRuntime::default_client(&CpuDevice::new());

    let err = client
        .clone()
        .with_parallelism(ParallelismConfig::new(Some(0), None))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = client
        .clone()
        .with_parallelism(ParallelismConfig::new(None, Some(0)))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let tuned = client
        .with_parallelism(ParallelismConfig::new(Some(2), Some(128)))
        .unwrap();
    assert_eq!(tuned.parallelism().num_threads, Some(2));
    assert_eq!(tuned.parallelism().chunk_size, Some(128));
}

// ===== Tensor views =====

#[test]
fn test_tensor_from_slice() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1i16, 2, 3, 4, 5, 6], &[2, 3], &device).unwrap();
    assert_eq!(t.shape(), &[2, 3]);
    assert_eq!(t.strides(), &[3, 1]);
    assert_eq!(t.dtype(), DType::I16);
    assert!(t.is_contiguous());

    let err = Tensor::<CpuRuntime>::from_slice(&[1i16, 2, 3], &[2, 2], &device).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
}

#[test]
fn test_tensor_full_scalar() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::full_scalar(&[3], DType::U8, 300, &device).unwrap();
    // integers narrow by two's-complement truncation
    assert_eq!(t.to_vec::<u8>().unwrap(), [44, 44, 44]);

    let t = Tensor::<CpuRuntime>::full_scalar(&[2], DType::F32, 0.5, &device).unwrap();
    assert_eq!(t.to_vec::<f32>().unwrap(), [0.5, 0.5]);
}

#[test]
fn test_tensor_transpose_and_contiguous() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0], &[2, 3], &device)
        .unwrap();

    let tt = t.transpose(0, -1).unwrap();
    assert_eq!(tt.shape(), &[3, 2]);
    assert!(!tt.is_contiguous());
    assert_eq!(tt.to_vec::<f64>().unwrap(), [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);

    let dense = tt.contiguous().unwrap();
    assert!(dense.is_contiguous());
    assert_ne!(dense.storage().ptr(), t.storage().ptr());

    assert!(matches!(
        t.transpose(0, 2),
        Err(Error::InvalidDimension { dim: 2, ndim: 2 })
    ));
}

#[test]
fn test_tensor_reshape() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1i32, 2, 3, 4, 5, 6], &[2, 3], &device).unwrap();

    let r = t.reshape(&[3, 2]).unwrap();
    assert_eq!(r.to_vec::<i32>().unwrap(), [1, 2, 3, 4, 5, 6]);
    assert!(matches!(t.reshape(&[4]), Err(Error::ShapeMismatch { .. })));
    assert!(matches!(
        t.transpose(0, 1).unwrap().reshape(&[6]),
        Err(Error::NotContiguous)
    ));
}

#[test]
fn test_tensor_narrow() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1u8, 2, 3, 4, 5, 6], &[2, 3], &device).unwrap();

    let n = t.narrow(-1, 1, 2).unwrap();
    assert_eq!(n.shape(), &[2, 2]);
    assert_eq!(n.offset(), 1);
    assert_eq!(n.to_vec::<u8>().unwrap(), [2, 3, 5, 6]);

    assert!(matches!(
        t.narrow(1, 2, 2),
        Err(Error::InvalidArgument { arg: "length", .. })
    ));
}

#[test]
fn test_tensor_broadcast_to() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::from_slice(&[1i64, 2], &[2, 1], &device).unwrap();

    let b = t.broadcast_to(&[2, 3]).unwrap();
    assert_eq!(b.strides(), &[1, 0]);
    assert!(b.layout().has_broadcast_dims());
    assert_eq!(b.to_vec::<i64>().unwrap(), [1, 1, 1, 2, 2, 2]);

    assert!(matches!(
        t.broadcast_to(&[3, 3]),
        Err(Error::BroadcastError { .. })
    ));
}

#[test]
fn test_tensor_to_vec_dtype_check() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::zeros(&[2], DType::F32, &device).unwrap();
    assert!(matches!(
        t.to_vec::<f64>(),
        Err(Error::InvalidArgument { arg: "T", .. })
    ));
}

#[test]
fn test_storage_shared_between_views() {
    let device = CpuDevice::new();
    let t = Tensor::<CpuRuntime>::zeros(&[4, 4], DType::I8, &device).unwrap();
    let view = t.narrow(0, 1, 2).unwrap();
    assert_eq!(t.storage().ref_count(), 2);
    drop(view);
    assert_eq!(t.storage().ref_count(), 1);
}

// ===== Size limits =====

#[test]
fn test_oversized_tensors_are_rejected() {
    let device = CpuDevice::new();

    // 2^62 elements fit in usize, their 2^65 bytes do not
    let err = Tensor::<CpuRuntime>::zeros(&[1usize << 62], DType::I64, &device).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "len", .. }));

    // element count itself overflows
    let err = Tensor::<CpuRuntime>::empty(&[1usize << 32, 1 << 32], DType::U8, &device)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "shape", .. }));

    // addressable byte count, larger than any allocation
    let err = Tensor::<CpuRuntime>::zeros(&[1usize << 59], DType::I64, &device).unwrap_err();
    assert!(matches!(err, Error::OutOfMemory { .. }));

    let err = Tensor::<CpuRuntime>::full_scalar(&[1usize << 62], DType::F32, 1.0, &device)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));

    let err = Tensor::<CpuRuntime>::from_slice(&[1u8], &[1usize << 32, 1 << 32], &device)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "shape", .. }));
}

#[test]
fn test_empty_shapes_with_huge_extents_are_rejected() {
    let device = CpuDevice::new();
    let err = Tensor::<CpuRuntime>::zeros(&[0, 1usize << 40, 1 << 40], DType::I8, &device)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "shape", .. }));

    let empty = Tensor::<CpuRuntime>::zeros(&[0], DType::I64, &device).unwrap();
    assert!(matches!(
        empty.reshape(&[0, 1usize << 40, 1 << 40]),
        Err(Error::InvalidArgument { arg: "shape", .. })
    ));
}

#[test]
fn test_views_cannot_outgrow_usize() {
    let device = CpuDevice::new();
    let one = Tensor::<CpuRuntime>::from_slice(&[3i32], &[1, 1], &device).unwrap();
    assert!(matches!(
        one.broadcast_to(&[1usize << 32, 1 << 32]),
        Err(Error::InvalidArgument { arg: "shape", .. })
    ));

    // a large but addressable broadcast view stays valid
    let wide = one.broadcast_to(&[1usize << 20, 1 << 20]).unwrap();
    assert_eq!(wide.numel(), 1 << 40);
}
