//! Layout: shape, strides and offset of a strided view

use smallvec::SmallVec;
use std::fmt;

/// Most arrays have 4 or fewer dimensions, so these stay on the stack
const STACK_DIMS: usize = 4;

/// Extent along each dimension
pub type Shape = SmallVec<[usize; STACK_DIMS]>;

/// Element distance between neighbours along each dimension
///
/// Strides are in ELEMENTS, not bytes. A stride of 0 marks a broadcast
/// dimension: every index along it maps to the same element.
pub type Strides = SmallVec<[isize; STACK_DIMS]>;

/// Memory layout of a strided view
///
/// Address of the element at `[i0, ..., in]`:
/// `offset + i0 * strides[0] + ... + in * strides[n]`
#[derive(Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Strides,
    offset: usize,
}

impl Layout {
    /// Row-major layout for `shape`, starting at element 0
    ///
    /// # Example
    /// ```
    /// use elemr::tensor::Layout;
    /// let layout = Layout::contiguous(&[2, 3, 4]);
    /// assert_eq!(layout.strides(), &[12, 4, 1]);
    /// ```
    pub fn contiguous(shape: &[usize]) -> Self {
        Self {
            shape: shape.iter().copied().collect(),
            strides: row_major_strides(shape),
            offset: 0,
        }
    }

    /// Layout with explicit shape, strides and offset
    pub fn new(shape: Shape, strides: Strides, offset: usize) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            shape,
            strides,
            offset,
        }
    }

    /// Shape
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Strides, in elements
    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Element offset of the first element
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of dimensions
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Number of logical elements
    #[inline]
    pub fn elem_count(&self) -> usize {
        self.shape.iter().product()
    }

    /// True if elements are laid out densely in row-major order
    ///
    /// The offset is not considered: a narrowed row block is still dense.
    /// Strides of extent-1 dimensions never matter.
    pub fn is_contiguous(&self) -> bool {
        is_row_major(&self.shape, &self.strides)
    }

    /// True if some dimension repeats a single element (stride 0, extent > 1)
    pub fn has_broadcast_dims(&self) -> bool {
        self.shape
            .iter()
            .zip(self.strides.iter())
            .any(|(&dim, &stride)| stride == 0 && dim > 1)
    }

    /// Resolve a possibly negative dimension index
    pub fn normalize_dim(&self, d: isize) -> Option<usize> {
        let ndim = self.ndim() as isize;
        let idx = if d < 0 { ndim + d } else { d };
        (0..ndim).contains(&idx).then_some(idx as usize)
    }

    /// Storage element index for a multi-index, if in bounds
    pub fn index(&self, indices: &[usize]) -> Option<usize> {
        if indices.len() != self.ndim() {
            return None;
        }
        let mut linear = self.offset as isize;
        for ((&idx, &dim), &stride) in indices.iter().zip(&self.shape).zip(&self.strides) {
            if idx >= dim {
                return None;
            }
            linear += idx as isize * stride;
        }
        Some(linear as usize)
    }

    /// Swap two dimensions
    pub fn transpose(&self, dim0: isize, dim1: isize) -> Option<Self> {
        let d0 = self.normalize_dim(dim0)?;
        let d1 = self.normalize_dim(dim1)?;
        let mut layout = self.clone();
        layout.shape.swap(d0, d1);
        layout.strides.swap(d0, d1);
        Some(layout)
    }

    /// Reinterpret a dense view with a new shape of equal element count
    pub fn reshape(&self, new_shape: &[usize]) -> Option<Self> {
        if !self.is_contiguous() {
            return None;
        }
        if new_shape.iter().product::<usize>() != self.elem_count() {
            return None;
        }
        let mut layout = Self::contiguous(new_shape);
        layout.offset = self.offset;
        Some(layout)
    }

    /// Restrict dimension `dim` to `start..start + length`
    pub fn narrow(&self, dim: isize, start: usize, length: usize) -> Option<Self> {
        let d = self.normalize_dim(dim)?;
        if start.checked_add(length)? > self.shape[d] {
            return None;
        }
        let mut layout = self.clone();
        layout.shape[d] = length;
        if length > 0 {
            let shifted = self.offset as isize + start as isize * self.strides[d];
            layout.offset = usize::try_from(shifted).ok()?;
        }
        Some(layout)
    }

    /// Broadcast view onto `target`
    ///
    /// Leading dimensions are added and extent-1 dimensions stretched, both
    /// with stride 0. Returns None when the shapes are incompatible.
    pub fn broadcast_to(&self, target: &[usize]) -> Option<Self> {
        if target.len() < self.ndim() {
            return None;
        }
        let pad = target.len() - self.ndim();
        let mut shape: Shape = target.iter().copied().collect();
        let mut strides: Strides = SmallVec::from_elem(0, target.len());

        for (i, (&s, &st)) in self.shape.iter().zip(self.strides.iter()).enumerate() {
            let t = target[pad + i];
            if s == t {
                strides[pad + i] = st;
            } else if s != 1 {
                return None;
            }
            shape[pad + i] = t;
        }

        Some(Self::new(shape, strides, self.offset))
    }
}

/// True if `strides` are the dense row-major strides of `shape`
///
/// Strides of extent-1 dimensions are ignored.
pub(crate) fn is_row_major(shape: &[usize], strides: &[isize]) -> bool {
    let mut expected = 1isize;
    for (&dim, &stride) in shape.iter().zip(strides).rev() {
        if dim != 1 && stride != expected {
            return false;
        }
        expected *= dim as isize;
    }
    true
}

/// Number of elements of `shape`
///
/// `None` if the product of the nonzero extents exceeds `isize::MAX`, so
/// row-major strides of an accepted shape never overflow.
pub(crate) fn checked_elem_count(shape: &[usize]) -> Option<usize> {
    let mut extent = 1usize;
    for &dim in shape.iter().filter(|&&d| d != 0) {
        extent = extent
            .checked_mul(dim)
            .filter(|&n| n <= isize::MAX as usize)?;
    }
    Some(if shape.contains(&0) { 0 } else { extent })
}

/// Row-major strides for `shape`
fn row_major_strides(shape: &[usize]) -> Strides {
    let mut strides: Strides = SmallVec::from_elem(0, shape.len());
    let mut acc = 1isize;
    for (stride, &dim) in strides.iter_mut().zip(shape).rev() {
        *stride = acc;
        acc *= dim as isize;
    }
    strides
}

impl fmt::Debug for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layout {{ shape: {:?}, strides: {:?}, offset: {} }}",
            self.shape.as_slice(),
            self.strides.as_slice(),
            self.offset
        )
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.shape.as_slice())
    }
}
