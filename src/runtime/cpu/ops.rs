//! BinaryOps and TypeConversionOps implementations for CPU runtime

use super::helpers::cast_impl;
use super::registry::cpu_kernels;
use super::{CpuClient, CpuRuntime};
use crate::dtype::DType;
use crate::error::Result;
use crate::ops::{BinaryOp, BinaryOperands, BinaryOps, TypeConversionOps};
use crate::runtime::KernelKey;
use crate::scalar::Scalar;
use crate::tensor::Tensor;

impl CpuClient {
    fn run_binary(
        &self,
        op: BinaryOp,
        operands: BinaryOperands<'_, CpuRuntime>,
        out: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        let key = KernelKey::new(op, operands.pattern());
        cpu_kernels().get(key)?.call(self, operands, out)
    }
}

impl BinaryOps<CpuRuntime> for CpuClient {
    fn binary_op(
        &self,
        op: BinaryOp,
        a: &Tensor<CpuRuntime>,
        b: &Tensor<CpuRuntime>,
        out: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        self.run_binary(op, BinaryOperands::ArrayArray(a, b), out)
    }

    fn binary_op_scalar(
        &self,
        op: BinaryOp,
        a: &Tensor<CpuRuntime>,
        scalar: Scalar,
        out: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        self.run_binary(op, BinaryOperands::ArrayScalar(a, scalar), out)
    }

    fn scalar_binary_op(
        &self,
        op: BinaryOp,
        scalar: Scalar,
        b: &Tensor<CpuRuntime>,
        out: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        self.run_binary(op, BinaryOperands::ScalarArray(scalar, b), out)
    }
}

impl TypeConversionOps<CpuRuntime> for CpuClient {
    fn cast(&self, a: &Tensor<CpuRuntime>, dtype: DType) -> Result<Tensor<CpuRuntime>> {
        cast_impl(self, a, dtype)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OperandPattern;
    use crate::runtime::{CpuDevice, Runtime};

    #[test]
    fn test_array_scalar_patterns() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);
        let a = Tensor::<CpuRuntime>::from_slice(&[7i32, -7], &[2], &device).unwrap();
        let out = Tensor::<CpuRuntime>::zeros(&[2], DType::I32, &device).unwrap();

        client
            .binary_op_scalar(BinaryOp::FloorDivide, &a, Scalar::from(2), &out)
            .unwrap();
        assert_eq!(out.to_vec::<i32>().unwrap(), [3, -4]);

        client
            .scalar_binary_op(BinaryOp::FloorDivide, Scalar::from(20), &a, &out)
            .unwrap();
        assert_eq!(out.to_vec::<i32>().unwrap(), [2, -3]);
    }

    #[test]
    fn test_kernel_key_matches_pattern() {
        let device = CpuDevice::new();
        let client = CpuRuntime::default_client(&device);
        let a = Tensor::<CpuRuntime>::from_slice(&[1u8], &[1], &device).unwrap();
        let out = Tensor::<CpuRuntime>::zeros(&[1], DType::U8, &device).unwrap();
        let kernel = cpu_kernels()
            .get(KernelKey::new(BinaryOp::Add, OperandPattern::ArrayScalar))
            .unwrap();
        assert!(
            kernel
                .call(&client, BinaryOperands::ArrayArray(&a, &a), &out)
                .is_err()
        );
        kernel
            .call(&client, BinaryOperands::ArrayScalar(&a, Scalar::Int(4)), &out)
            .unwrap();
        assert_eq!(out.to_vec::<u8>().unwrap(), [5]);
    }
}
