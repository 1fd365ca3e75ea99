//! Element trait for mapping Rust types to DType

use super::DType;
use crate::scalar::Scalar;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;

/// Trait for types that can be elements of a tensor
///
/// This trait connects Rust's type system to elemr's runtime dtype system.
/// It is implemented for `i8`, `i16`, `i32`, `i64`, `u8`, `half::f16`, `f32`
/// and `f64`.
///
/// Conversions go through [`Scalar`], which carries integers as `i64` and
/// floats as `f64`. The same rule is used for scalar operands and for
/// array casts, so both paths agree value for value:
///
/// - int -> int: two's-complement truncation or extension
/// - int -> float: nearest representable value
/// - float -> int: truncation toward zero, saturating, NaN maps to 0
/// - float -> float: round to nearest
pub trait Element:
    Copy + Send + Sync + Pod + Zeroable + Debug + PartialEq + PartialOrd + 'static
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Widen into the scalar carrier for this type's category
    fn to_scalar(self) -> Scalar;

    /// Convert a scalar into this type
    fn from_scalar(value: Scalar) -> Self;

    /// Convert to f64 (lossy for 64-bit integers)
    fn to_f64(self) -> f64;

    /// Convert from another element type using the scalar conversion rule
    #[inline]
    fn cast_from<S: Element>(value: S) -> Self {
        Self::from_scalar(value.to_scalar())
    }
}

macro_rules! impl_int_element {
    ($($t:ty => $dtype:ident),* $(,)?) => {
        $(
            impl Element for $t {
                const DTYPE: DType = DType::$dtype;

                #[inline]
                fn to_scalar(self) -> Scalar {
                    Scalar::Int(self as i64)
                }

                #[inline]
                fn from_scalar(value: Scalar) -> Self {
                    match value {
                        Scalar::Int(v) => v as $t,
                        Scalar::Float(v) => v as $t,
                    }
                }

                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_int_element!(
    i64 => I64,
    i32 => I32,
    i16 => I16,
    i8 => I8,
    u8 => U8,
);

impl Element for f64 {
    const DTYPE: DType = DType::F64;

    #[inline]
    fn to_scalar(self) -> Scalar {
        Scalar::Float(self)
    }

    #[inline]
    fn from_scalar(value: Scalar) -> Self {
        match value {
            Scalar::Int(v) => v as f64,
            Scalar::Float(v) => v,
        }
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self
    }
}

impl Element for f32 {
    const DTYPE: DType = DType::F32;

    #[inline]
    fn to_scalar(self) -> Scalar {
        Scalar::Float(self as f64)
    }

    #[inline]
    fn from_scalar(value: Scalar) -> Self {
        match value {
            Scalar::Int(v) => v as f32,
            Scalar::Float(v) => v as f32,
        }
    }

    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }
}

// ============================================================================
// Half-precision floating point
// ============================================================================

impl Element for half::f16 {
    const DTYPE: DType = DType::F16;

    #[inline]
    fn to_scalar(self) -> Scalar {
        Scalar::Float(self.to_f64())
    }

    #[inline]
    fn from_scalar(value: Scalar) -> Self {
        match value {
            Scalar::Int(v) => half::f16::from_f64(v as f64),
            Scalar::Float(v) => half::f16::from_f64(v),
        }
    }

    #[inline]
    fn to_f64(self) -> f64 {
        half::f16::to_f64(self)
    }
}
