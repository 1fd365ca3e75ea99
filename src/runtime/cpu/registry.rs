//! Process-wide registry of CPU binary kernels

use super::helpers::{integral_binary_impl, numeric_binary_impl};
use super::{CpuClient, CpuRuntime};
use crate::error::{Error, Result};
use crate::ops::primitives::{
    AddPrimitive, BitwiseAndPrimitive, BitwiseOrPrimitive, BitwiseXorPrimitive, DividePrimitive,
    FloorDividePrimitive, MultiplyPrimitive, SubtractPrimitive,
};
use crate::ops::{BinaryOp, BinaryOperands, OperandPattern};
use crate::runtime::{BinaryKernel, KernelKey, KernelRegistry};
use crate::tensor::Tensor;
use std::sync::{Arc, OnceLock};

type KernelFn = fn(
    &CpuClient,
    BinaryOp,
    BinaryOperands<'_, CpuRuntime>,
    &Tensor<CpuRuntime>,
) -> Result<()>;

/// One (operation, pattern) entry backed by the shared kernel shell
struct CpuBinaryKernel {
    key: KernelKey,
    run: KernelFn,
}

impl BinaryKernel<CpuRuntime> for CpuBinaryKernel {
    fn key(&self) -> KernelKey {
        self.key
    }

    fn call(
        &self,
        client: &CpuClient,
        operands: BinaryOperands<'_, CpuRuntime>,
        out: &Tensor<CpuRuntime>,
    ) -> Result<()> {
        if operands.pattern() != self.key.pattern {
            return Err(Error::invalid_argument(
                "operands",
                format!(
                    "kernel {} expects {:?} operands, got {:?}",
                    self.key,
                    self.key.pattern,
                    operands.pattern()
                ),
            ));
        }
        (self.run)(client, self.key.op, operands, out)
    }
}

fn kernel_fn(op: BinaryOp) -> KernelFn {
    match op {
        BinaryOp::Add => numeric_binary_impl::<AddPrimitive>,
        BinaryOp::Subtract => numeric_binary_impl::<SubtractPrimitive>,
        BinaryOp::Multiply => numeric_binary_impl::<MultiplyPrimitive>,
        BinaryOp::Divide => numeric_binary_impl::<DividePrimitive>,
        BinaryOp::FloorDivide => numeric_binary_impl::<FloorDividePrimitive>,
        BinaryOp::BitwiseAnd => integral_binary_impl::<BitwiseAndPrimitive>,
        BinaryOp::BitwiseOr => integral_binary_impl::<BitwiseOrPrimitive>,
        BinaryOp::BitwiseXor => integral_binary_impl::<BitwiseXorPrimitive>,
    }
}

fn build() -> KernelRegistry<CpuRuntime> {
    let mut registry = KernelRegistry::new();
    for op in BinaryOp::ALL {
        for pattern in OperandPattern::ALL {
            registry.register(Arc::new(CpuBinaryKernel {
                key: KernelKey::new(op, pattern),
                run: kernel_fn(op),
            }));
        }
    }
    log::debug!("registered {} CPU binary kernels", registry.len());
    registry
}

/// The CPU kernel registry, built on first use
pub fn cpu_kernels() -> &'static KernelRegistry<CpuRuntime> {
    static CPU_KERNELS: OnceLock<KernelRegistry<CpuRuntime>> = OnceLock::new();
    CPU_KERNELS.get_or_init(build)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pair_registered() {
        let registry = cpu_kernels();
        assert_eq!(registry.len(), BinaryOp::ALL.len() * OperandPattern::ALL.len());
        for op in BinaryOp::ALL {
            for pattern in OperandPattern::ALL {
                assert!(registry.contains(KernelKey::new(op, pattern)));
            }
        }
    }

    #[test]
    fn test_registry_is_shared() {
        assert!(std::ptr::eq(cpu_kernels(), cpu_kernels()));
    }
}
