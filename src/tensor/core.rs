//! Core Tensor type

use super::storage::byte_size;
use super::{Layout, Storage, checked_elem_count};
use crate::dtype::{DType, Element};
use crate::error::{Error, Result};
use crate::runtime::{Device, Runtime};
use crate::scalar::Scalar;
use std::fmt;

/// N-dimensional strided view onto device memory
///
/// A `Tensor` is reference-counted [`Storage`] plus a [`Layout`]. View
/// operations (`transpose`, `narrow`, `reshape`, `broadcast_to`) return new
/// tensors sharing the same storage.
///
/// Kernels write through `&Tensor`: an output tensor is a handle to memory,
/// not exclusively borrowed data. Callers must not run two operations that
/// write overlapping memory at the same time.
///
/// # Example
///
/// ```
/// use elemr::prelude::*;
///
/// let device = CpuDevice::new();
/// let a = Tensor::<CpuRuntime>::from_slice(&[1.0f32, 2.0, 3.0, 4.0], &[2, 2], &device)?;
/// let t = a.transpose(0, 1)?;
/// assert_eq!(t.to_vec::<f32>()?, [1.0, 3.0, 2.0, 4.0]);
/// # Ok::<(), elemr::error::Error>(())
/// ```
pub struct Tensor<R: Runtime> {
    storage: Storage<R>,
    layout: Layout,
}

impl<R: Runtime> Tensor<R> {
    /// Copy host data into a new contiguous tensor
    ///
    /// Fails with `ShapeMismatch` if `data.len()` is not the product of `shape`.
    pub fn from_slice<T: Element>(data: &[T], shape: &[usize], device: &R::Device) -> Result<Self> {
        let expected_len = element_count(shape)?;
        if data.len() != expected_len {
            return Err(Error::ShapeMismatch {
                expected: shape.to_vec(),
                got: vec![data.len()],
            });
        }

        Ok(Self {
            storage: Storage::from_slice(data, device)?,
            layout: Layout::contiguous(shape),
        })
    }

    /// Allocate a contiguous tensor
    ///
    /// Runtimes hand out zeroed memory, so this is equivalent to [`Self::zeros`].
    pub fn empty(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        let len = element_count(shape)?;
        Ok(Self {
            storage: Storage::new(len, dtype, device)?,
            layout: Layout::contiguous(shape),
        })
    }

    /// Allocate a contiguous tensor filled with zeros
    pub fn zeros(shape: &[usize], dtype: DType, device: &R::Device) -> Result<Self> {
        Self::empty(shape, dtype, device)
    }

    /// Allocate a contiguous tensor filled with `value` converted to `dtype`
    pub fn full_scalar(
        shape: &[usize],
        dtype: DType,
        value: impl Into<Scalar>,
        device: &R::Device,
    ) -> Result<Self> {
        let value = value.into();
        let len = element_count(shape)?;
        let bytes = byte_size(len, dtype)?;
        crate::dispatch_dtype!(dtype, T => {
            let mut data = Vec::new();
            data.try_reserve_exact(len)
                .map_err(|_| Error::OutOfMemory { size: bytes })?;
            data.resize(len, value.to::<T>());
            Self::from_slice(&data, shape, device)
        })
    }

    // ===== Accessors =====

    /// Underlying storage
    #[inline]
    pub fn storage(&self) -> &Storage<R> {
        &self.storage
    }

    /// Layout of this view
    #[inline]
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    /// Strides, in elements
    #[inline]
    pub fn strides(&self) -> &[isize] {
        self.layout.strides()
    }

    /// Element offset of the view into its storage
    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset()
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.layout.ndim()
    }

    /// Number of logical elements
    #[inline]
    pub fn numel(&self) -> usize {
        self.layout.elem_count()
    }

    /// Element type
    #[inline]
    pub fn dtype(&self) -> DType {
        self.storage.dtype()
    }

    /// Device holding the storage
    #[inline]
    pub fn device(&self) -> &R::Device {
        self.storage.device()
    }

    /// True if the view is dense and row-major
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.is_contiguous()
    }

    /// Device address of the view's first element
    #[inline]
    pub(crate) fn data_ptr(&self) -> u64 {
        self.storage.ptr() + (self.layout.offset() * self.dtype().size_in_bytes()) as u64
    }

    // ===== Views =====

    fn with_layout(&self, layout: Layout) -> Self {
        Self {
            storage: self.storage.clone(),
            layout,
        }
    }

    /// Swap two dimensions
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Result<Self> {
        let ndim = self.ndim();
        let bad = if self.layout.normalize_dim(dim0).is_none() { dim0 } else { dim1 };
        let layout = self
            .layout
            .transpose(dim0, dim1)
            .ok_or(Error::InvalidDimension { dim: bad, ndim })?;
        Ok(self.with_layout(layout))
    }

    /// Reinterpret a dense view with a new shape
    pub fn reshape(&self, shape: &[usize]) -> Result<Self> {
        if element_count(shape)? != self.numel() {
            return Err(Error::shape_mismatch(shape, self.shape()));
        }
        let layout = self
            .layout
            .reshape(shape)
            .ok_or(Error::NotContiguous)?;
        Ok(self.with_layout(layout))
    }

    /// Restrict dimension `dim` to `start..start + length`
    pub fn narrow(&self, dim: isize, start: usize, length: usize) -> Result<Self> {
        let idx = self
            .layout
            .normalize_dim(dim)
            .ok_or(Error::InvalidDimension {
                dim,
                ndim: self.ndim(),
            })?;
        let layout = self
            .layout
            .narrow(dim, start, length)
            .ok_or_else(|| {
                Error::invalid_argument(
                    "length",
                    format!(
                        "range {start}..{} exceeds dimension {idx} of size {}",
                        start.saturating_add(length),
                        self.shape()[idx]
                    ),
                )
            })?;
        Ok(self.with_layout(layout))
    }

    /// Broadcast to `shape` (stride 0 along stretched dimensions)
    pub fn broadcast_to(&self, shape: &[usize]) -> Result<Self> {
        element_count(shape)?;
        let layout = self
            .layout
            .broadcast_to(shape)
            .ok_or_else(|| Error::broadcast(self.shape(), shape))?;
        Ok(self.with_layout(layout))
    }

    // ===== Copies =====

    /// Dense row-major copy, or a shared view if already dense
    pub fn contiguous(&self) -> Result<Self> {
        if self.is_contiguous() {
            return Ok(self.clone());
        }

        let dtype = self.dtype();
        let device = self.device();
        let storage = Storage::new(self.numel(), dtype, device)?;
        let elem_size = dtype.size_in_bytes();
        R::copy_strided(
            self.storage.ptr(),
            self.layout.offset() * elem_size,
            storage.ptr(),
            self.shape(),
            self.strides(),
            elem_size,
            device,
        )?;

        Ok(Self {
            storage,
            layout: Layout::contiguous(self.shape()),
        })
    }

    /// Copy the logical elements to the host, in row-major order
    ///
    /// `T` must match the tensor's dtype.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if T::DTYPE != self.dtype() {
            return Err(Error::invalid_argument(
                "T",
                format!("tensor holds {}, requested {}", self.dtype(), T::DTYPE),
            ));
        }
        if !self.is_contiguous() {
            return self.contiguous()?.to_vec();
        }

        let mut out = vec![T::zeroed(); self.numel()];
        if !out.is_empty() {
            R::copy_from_device(
                self.data_ptr(),
                bytemuck::cast_slice_mut(&mut out),
                self.device(),
            )?;
        }
        Ok(out)
    }
}

/// Element count of a caller-supplied shape
fn element_count(shape: &[usize]) -> Result<usize> {
    checked_elem_count(shape).ok_or_else(|| {
        Error::invalid_argument("shape", format!("{shape:?} has too many elements"))
    })
}

impl<R: Runtime> Clone for Tensor<R> {
    /// Shares storage
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            layout: self.layout.clone(),
        }
    }
}

impl<R: Runtime> fmt::Debug for Tensor<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape())
            .field("strides", &self.strides())
            .field("offset", &self.offset())
            .field("dtype", &self.dtype())
            .field("device", &self.device().name())
            .finish()
    }
}
