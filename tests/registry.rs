//! Integration tests for the CPU kernel registry

mod common;

use common::{create_cpu_client, output, tensor};
use elemr::dtype::DType;
use elemr::error::Error;
use elemr::ops::{BinaryOp, BinaryOperands, OperandPattern};
use elemr::runtime::cpu::cpu_kernels;
use elemr::runtime::KernelKey;
use elemr::scalar::Scalar;
use std::thread;

const NAMES: [&str; 24] = [
    "Add",
    "AddArrayScalar",
    "AddScalarArray",
    "Subtract",
    "SubtractArrayScalar",
    "SubtractScalarArray",
    "Multiply",
    "MultiplyArrayScalar",
    "MultiplyScalarArray",
    "Divide",
    "DivideArrayScalar",
    "DivideScalarArray",
    "FloorDivide",
    "FloorDivideArrayScalar",
    "FloorDivideScalarArray",
    "BitwiseAnd",
    "BitwiseAndArrayScalar",
    "BitwiseAndScalarArray",
    "BitwiseOr",
    "BitwiseOrArrayScalar",
    "BitwiseOrScalarArray",
    "BitwiseXor",
    "BitwiseXorArrayScalar",
    "BitwiseXorScalarArray",
];

#[test]
fn test_every_kernel_has_a_name() {
    let registry = cpu_kernels();
    assert_eq!(registry.len(), NAMES.len());

    for name in NAMES {
        let kernel = registry.get_by_name(name).unwrap();
        assert_eq!(kernel.key().name(), name);
    }
}

#[test]
fn test_unknown_name() {
    let err = cpu_kernels().get_by_name("Power").err().unwrap();
    match err {
        Error::KernelNotFound { name, backend } => {
            assert_eq!(name, "Power");
            assert_eq!(backend, "cpu");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(cpu_kernels().get_by_name("add").is_err());
}

#[test]
fn test_call_through_registry() {
    let (client, device) = create_cpu_client();
    let a = tensor(&[7i32, -7], &[2], &device);
    let out = output(&[2], DType::I32, &device);

    let kernel = cpu_kernels().get_by_name("FloorDivideArrayScalar").unwrap();
    kernel
        .call(&client, BinaryOperands::ArrayScalar(&a, Scalar::from(2)), &out)
        .unwrap();
    assert_eq!(out.to_vec::<i32>().unwrap(), [3, -4]);

    let kernel = cpu_kernels()
        .get(KernelKey::new(BinaryOp::Subtract, OperandPattern::ScalarArray))
        .unwrap();
    kernel
        .call(&client, BinaryOperands::ScalarArray(Scalar::from(1), &a), &out)
        .unwrap();
    assert_eq!(out.to_vec::<i32>().unwrap(), [-6, 8]);
}

#[test]
fn test_kernel_rejects_other_patterns() {
    let (client, device) = create_cpu_client();
    let a = tensor(&[1.0f32], &[1], &device);
    let out = tensor(&[4.0f32], &[1], &device);

    let kernel = cpu_kernels().get_by_name("Add").unwrap();
    let err = kernel
        .call(&client, BinaryOperands::ArrayScalar(&a, Scalar::from(1.0)), &out)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { arg: "operands", .. }));
    assert_eq!(out.to_vec::<f32>().unwrap(), [4.0]);
}

#[test]
fn test_concurrent_lookups_and_calls() {
    let handles: Vec<_> = (0..8)
        .map(|t| {
            thread::spawn(move || {
                let (client, device) = create_cpu_client();
                let a = tensor(&[t as i64; 16], &[16], &device);
                let out = output(&[16], DType::I64, &device);

                for name in NAMES.iter().filter(|n| n.ends_with("ArrayScalar")) {
                    let kernel = cpu_kernels().get_by_name(name).unwrap();
                    kernel
                        .call(&client, BinaryOperands::ArrayScalar(&a, Scalar::from(1)), &out)
                        .unwrap();
                }
                // last kernel run was BitwiseXorArrayScalar
                assert_eq!(out.to_vec::<i64>().unwrap(), [t as i64 ^ 1; 16]);
                cpu_kernels() as *const _ as usize
            })
        })
        .collect();

    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|w| w[0] == w[1]));
}
