//! CPU client and parallelism configuration

use super::device::CpuDevice;
use super::runtime::CpuRuntime;
use crate::error::{Error, Result};
use crate::runtime::RuntimeClient;
#[cfg(feature = "rayon")]
use std::sync::Arc;

/// Element count below which kernels stay on the calling thread
pub const DEFAULT_CHUNK_SIZE: usize = 32 * 1024;

/// Parallel execution settings for CPU kernels
///
/// Ignored when the crate is built without the `rayon` feature.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ParallelismConfig {
    /// Worker count; `None` uses rayon's global pool
    pub num_threads: Option<usize>,
    /// Minimum elements per task, and the serial threshold;
    /// `None` uses [`DEFAULT_CHUNK_SIZE`]
    pub chunk_size: Option<usize>,
}

impl ParallelismConfig {
    /// Settings with explicit thread count and chunk size
    pub const fn new(num_threads: Option<usize>, chunk_size: Option<usize>) -> Self {
        Self {
            num_threads,
            chunk_size,
        }
    }
}

/// CPU client for operation dispatch
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    parallelism: ParallelismConfig,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Client with default parallelism
    pub fn new(device: CpuDevice) -> Self {
        Self {
            device,
            parallelism: ParallelismConfig::default(),
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Replace the parallelism settings
    ///
    /// A `num_threads` value builds a dedicated thread pool for this client.
    pub fn with_parallelism(mut self, config: ParallelismConfig) -> Result<Self> {
        if config.num_threads == Some(0) {
            return Err(Error::invalid_argument("num_threads", "must be at least 1"));
        }
        if config.chunk_size == Some(0) {
            return Err(Error::invalid_argument("chunk_size", "must be at least 1"));
        }

        #[cfg(feature = "rayon")]
        {
            self.pool = match config.num_threads {
                Some(n) => {
                    let pool = rayon::ThreadPoolBuilder::new()
                        .num_threads(n)
                        .thread_name(|i| format!("elemr-cpu-{i}"))
                        .build()
                        .map_err(|e| Error::Backend(format!("failed to build thread pool: {e}")))?;
                    log::debug!("built CPU thread pool with {n} threads");
                    Some(Arc::new(pool))
                }
                None => None,
            };
        }

        self.parallelism = config;
        Ok(self)
    }

    /// Current parallelism settings
    pub fn parallelism(&self) -> ParallelismConfig {
        self.parallelism
    }

    /// Minimum number of elements handed to one parallel task
    #[inline]
    pub(crate) fn rayon_min_len(&self) -> usize {
        self.parallelism.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    /// Run `op` inside this client's thread pool, if it has one
    #[cfg(feature = "rayon")]
    pub(crate) fn install_parallelism<OP, T>(&self, op: OP) -> T
    where
        OP: FnOnce() -> T + Send,
        T: Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // CPU operations are synchronous
    }
}
