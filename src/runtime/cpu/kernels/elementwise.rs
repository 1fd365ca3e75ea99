//! Strided elementwise iteration
//!
//! The iterator visits every logical index of the output shape once, in
//! row-major order, and hands the functor the elements at that index:
//! `f(linear_index, inputs..., &mut out_element)`.
//!
//! Offsets are updated incrementally as the multi-index advances, so the
//! per-element cost does not grow with rank. When every operand is dense the
//! multi-index is skipped entirely and the linear index is the offset.
//!
//! With the `rayon` feature the linear range is split into disjoint chunks of
//! at least `ParallelismConfig::chunk_size` elements; each chunk is walked by
//! one task. Writable views may not contain broadcast dimensions, so no two
//! chunks ever write the same element.

use crate::error::{Error, Result};
use crate::runtime::cpu::CpuClient;
use crate::tensor::is_row_major;
use smallvec::SmallVec;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Read-only strided view over elements of type `T`
///
/// `ptr` addresses the element at multi-index `[0, ..., 0]`.
#[derive(Debug)]
pub struct StridedView<'a, T> {
    ptr: *const T,
    shape: &'a [usize],
    strides: &'a [isize],
}

impl<T> Clone for StridedView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StridedView<'_, T> {}

impl<'a, T> StridedView<'a, T> {
    /// # Safety
    ///
    /// For every in-bounds multi-index `i`, `ptr.offset(sum(i[d] * strides[d]))`
    /// must be valid for reads of `T` for the lifetime of the view.
    pub unsafe fn new(ptr: *const T, shape: &'a [usize], strides: &'a [isize]) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            ptr,
            shape,
            strides,
        }
    }

    /// Logical shape
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// Strides, in elements
    pub fn strides(&self) -> &'a [isize] {
        self.strides
    }

    /// True if the view is dense and row-major
    pub fn is_contiguous(&self) -> bool {
        is_row_major(self.shape, self.strides)
    }
}

/// Writable strided view over elements of type `T`
#[derive(Debug)]
pub struct StridedViewMut<'a, T> {
    ptr: *mut T,
    shape: &'a [usize],
    strides: &'a [isize],
}

impl<'a, T> StridedViewMut<'a, T> {
    /// # Safety
    ///
    /// Same as [`StridedView::new`], for writes. No other thread may access
    /// the viewed elements while the view is in use.
    pub unsafe fn new(ptr: *mut T, shape: &'a [usize], strides: &'a [isize]) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            ptr,
            shape,
            strides,
        }
    }

    /// Logical shape
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// True if the view is dense and row-major
    pub fn is_contiguous(&self) -> bool {
        is_row_major(self.shape, self.strides)
    }

    fn check_writable(&self) -> Result<()> {
        let broadcast = self
            .shape
            .iter()
            .zip(self.strides)
            .any(|(&dim, &stride)| stride == 0 && dim > 1);
        if broadcast {
            return Err(Error::invalid_argument(
                "out",
                format!(
                    "output view {:?} with strides {:?} repeats elements",
                    self.shape, self.strides
                ),
            ));
        }
        Ok(())
    }
}

fn check_shape(out: &[usize], input: &[usize]) -> Result<()> {
    if out != input {
        return Err(Error::shape_mismatch(out, input));
    }
    Ok(())
}

/// Apply `f` to every element of `x`, writing into `out`
///
/// `out` may alias `x` when both views have the same layout.
pub fn elementwise_unary<A, O, F>(
    client: &CpuClient,
    f: F,
    x: StridedView<'_, A>,
    out: StridedViewMut<'_, O>,
) -> Result<()>
where
    A: Copy,
    F: Fn(usize, A, &mut O) + Sync,
{
    check_shape(out.shape, x.shape)?;
    out.check_writable()?;

    let contiguous = x.is_contiguous() && out.is_contiguous();
    let x_addr = x.ptr as usize;
    let out_addr = out.ptr as usize;

    for_each_offset(
        client,
        out.shape,
        [x.strides, out.strides],
        contiguous,
        |i, [xo, oo]| {
            // SAFETY: offsets come from in-bounds multi-indices of views
            // whose constructors guarantee validity; chunks are disjoint
            unsafe {
                let value = *(x_addr as *const A).offset(xo);
                f(i, value, &mut *(out_addr as *mut O).offset(oo));
            }
        },
    );
    Ok(())
}

/// Apply `f` to every pair of elements of `x1` and `x2`, writing into `out`
///
/// Inputs must already have the output's shape; broadcast inputs are
/// expressed with stride-0 dimensions. `out` may alias an input that has
/// the same layout.
pub fn elementwise_binary<A, B, O, F>(
    client: &CpuClient,
    f: F,
    x1: StridedView<'_, A>,
    x2: StridedView<'_, B>,
    out: StridedViewMut<'_, O>,
) -> Result<()>
where
    A: Copy,
    B: Copy,
    F: Fn(usize, A, B, &mut O) + Sync,
{
    check_shape(out.shape, x1.shape)?;
    check_shape(out.shape, x2.shape)?;
    out.check_writable()?;

    let contiguous = x1.is_contiguous() && x2.is_contiguous() && out.is_contiguous();
    let x1_addr = x1.ptr as usize;
    let x2_addr = x2.ptr as usize;
    let out_addr = out.ptr as usize;

    for_each_offset(
        client,
        out.shape,
        [x1.strides, x2.strides, out.strides],
        contiguous,
        |i, [o1, o2, oo]| {
            // SAFETY: see elementwise_unary
            unsafe {
                let a = *(x1_addr as *const A).offset(o1);
                let b = *(x2_addr as *const B).offset(o2);
                f(i, a, b, &mut *(out_addr as *mut O).offset(oo));
            }
        },
    );
    Ok(())
}

/// Call `visit(linear_index, offsets)` for every index of `shape`
fn for_each_offset<const N: usize, V>(
    client: &CpuClient,
    shape: &[usize],
    strides: [&[isize]; N],
    contiguous: bool,
    visit: V,
) where
    V: Fn(usize, [isize; N]) + Sync,
{
    let numel: usize = shape.iter().product();
    if numel == 0 {
        return;
    }

    let run = |start: usize, end: usize| {
        if contiguous {
            for i in start..end {
                visit(i, [i as isize; N]);
            }
        } else {
            walk_strided(shape, strides, start, end, &visit);
        }
    };

    #[cfg(feature = "rayon")]
    {
        let chunk = client.rayon_min_len();
        if numel > chunk {
            let chunks = numel.div_ceil(chunk);
            client.install_parallelism(|| {
                (0..chunks).into_par_iter().for_each(|c| {
                    let start = c * chunk;
                    run(start, (start + chunk).min(numel));
                });
            });
            return;
        }
    }

    #[cfg(not(feature = "rayon"))]
    let _ = client;

    run(0, numel);
}

/// Walk linear indices `start..end` of `shape` with incremental offsets
fn walk_strided<const N: usize>(
    shape: &[usize],
    strides: [&[isize]; N],
    start: usize,
    end: usize,
    mut visit: impl FnMut(usize, [isize; N]),
) {
    if start >= end {
        return;
    }

    let ndim = shape.len();
    let mut indices: SmallVec<[usize; 8]> = SmallVec::from_elem(0, ndim);
    let mut offsets = [0isize; N];

    // Unravel the starting index
    let mut rem = start;
    for dim in (0..ndim).rev() {
        let idx = rem % shape[dim];
        rem /= shape[dim];
        indices[dim] = idx;
        for (off, s) in offsets.iter_mut().zip(&strides) {
            *off += idx as isize * s[dim];
        }
    }

    for linear in start..end {
        visit(linear, offsets);

        for dim in (0..ndim).rev() {
            indices[dim] += 1;
            for (off, s) in offsets.iter_mut().zip(&strides) {
                *off += s[dim];
            }
            if indices[dim] < shape[dim] {
                break;
            }
            indices[dim] = 0;
            for (off, s) in offsets.iter_mut().zip(&strides) {
                *off -= shape[dim] as isize * s[dim];
            }
        }
    }
}
