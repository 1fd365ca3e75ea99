//! Scalar operand values
//!
//! A `Scalar` is the untyped right- or left-hand side of an array/scalar
//! kernel. It carries its value in the widest type of its category and is
//! converted to the kernel's element type exactly once per call.

use crate::dtype::Element;
use std::fmt;

/// Category of a scalar value
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    /// Signed or unsigned integer
    Integral,
    /// Floating point
    Floating,
}

/// A single numeric value with no device affinity
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Integer value, carried as i64
    Int(i64),
    /// Floating point value, carried as f64
    Float(f64),
}

impl Scalar {
    /// Category of this value
    #[inline]
    pub const fn kind(self) -> ScalarKind {
        match self {
            Self::Int(_) => ScalarKind::Integral,
            Self::Float(_) => ScalarKind::Floating,
        }
    }

    /// Convert to a concrete element type
    ///
    /// See [`Element`] for the narrowing rule.
    #[inline]
    pub fn to<T: Element>(self) -> T {
        T::from_scalar(self)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v:?}"),
        }
    }
}

macro_rules! impl_from_int {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Scalar {
                #[inline]
                fn from(v: $t) -> Self {
                    Scalar::Int(v as i64)
                }
            }
        )*
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<f32> for Scalar {
    #[inline]
    fn from(v: f32) -> Self {
        Scalar::Float(v as f64)
    }
}

impl From<f64> for Scalar {
    #[inline]
    fn from(v: f64) -> Self {
        Scalar::Float(v)
    }
}

impl From<half::f16> for Scalar {
    #[inline]
    fn from(v: half::f16) -> Self {
        Scalar::Float(v.to_f64())
    }
}
