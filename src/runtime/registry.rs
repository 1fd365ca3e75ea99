//! Kernel registry: binary kernels keyed by operation and operand pattern

use crate::error::{Error, Result};
use crate::ops::{BinaryOp, BinaryOperands, OperandPattern};
use crate::runtime::Runtime;
use crate::tensor::Tensor;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Identifies one registered kernel
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct KernelKey {
    /// Operation
    pub op: BinaryOp,
    /// Which operands are arrays
    pub pattern: OperandPattern,
}

impl KernelKey {
    /// Key for `op` with `pattern`
    pub const fn new(op: BinaryOp, pattern: OperandPattern) -> Self {
        Self { op, pattern }
    }

    /// Canonical name, e.g. `"FloorDivideScalarArray"`
    pub fn name(&self) -> String {
        format!("{}{}", self.op.kernel_name(), self.pattern.suffix())
    }
}

impl fmt::Display for KernelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.kernel_name(), self.pattern.suffix())
    }
}

/// A binary kernel for one backend
///
/// Kernels hold no mutable state, so one instance serves every thread.
pub trait BinaryKernel<R: Runtime>: Send + Sync {
    /// Key this kernel is registered under
    fn key(&self) -> KernelKey;

    /// Run the kernel, writing into `out`
    fn call(&self, client: &R::Client, operands: BinaryOperands<'_, R>, out: &Tensor<R>)
    -> Result<()>;
}

/// Lookup table from [`KernelKey`] (or its name) to kernel
///
/// Populated once, then only read.
pub struct KernelRegistry<R: Runtime> {
    kernels: HashMap<KernelKey, Arc<dyn BinaryKernel<R>>>,
    names: HashMap<String, KernelKey>,
}

impl<R: Runtime> KernelRegistry<R> {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            kernels: HashMap::new(),
            names: HashMap::new(),
        }
    }

    /// Register a kernel, returning the one it replaces
    pub fn register(&mut self, kernel: Arc<dyn BinaryKernel<R>>) -> Option<Arc<dyn BinaryKernel<R>>> {
        let key = kernel.key();
        self.names.insert(key.name(), key);
        self.kernels.insert(key, kernel)
    }

    /// Kernel registered for `key`
    pub fn get(&self, key: KernelKey) -> Result<&dyn BinaryKernel<R>> {
        self.kernels
            .get(&key)
            .map(|k| k.as_ref())
            .ok_or_else(|| Error::KernelNotFound {
                name: key.name(),
                backend: R::name(),
            })
    }

    /// Kernel registered under a canonical name
    pub fn get_by_name(&self, name: &str) -> Result<&dyn BinaryKernel<R>> {
        match self.names.get(name) {
            Some(&key) => self.get(key),
            None => Err(Error::KernelNotFound {
                name: name.to_string(),
                backend: R::name(),
            }),
        }
    }

    /// Check if a kernel is registered for `key`
    pub fn contains(&self, key: KernelKey) -> bool {
        self.kernels.contains_key(&key)
    }

    /// Number of registered kernels
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Check if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    /// Registered keys, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = KernelKey> + '_ {
        self.kernels.keys().copied()
    }
}

impl<R: Runtime> Default for KernelRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Runtime> fmt::Debug for KernelRegistry<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.names.keys().collect();
        names.sort();
        f.debug_struct("KernelRegistry")
            .field("backend", &R::name())
            .field("kernels", &names)
            .finish()
    }
}
