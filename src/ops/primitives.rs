//! Per-type arithmetic primitives
//!
//! Every binary kernel bottoms out in one of the functions here. They are
//! plain, inlinable functions of two values of the same concrete type; all
//! category-specific semantics live in this file:
//!
//! | Category | add/sub/mul | divide        | floor_divide                    |
//! |----------|-------------|---------------|---------------------------------|
//! | signed   | wrapping    | `y == 0 -> 0` | floor of quotient, `y == 0 -> 0`|
//! | unsigned | wrapping    | `y == 0 -> 0` | truncating, `y == 0 -> 0`       |
//! | float    | IEEE 754    | IEEE 754      | fmod-corrected quotient         |
//!
//! Integer division by zero yields 0 instead of trapping.

use crate::dtype::Element;
use half::f16;
use num_traits::{Float, PrimInt, Signed, Unsigned, WrappingAdd, WrappingMul, WrappingSub};

/// Arithmetic defined for every element type
pub trait ArithmeticElement: Element {
    /// x + y
    fn add(x: Self, y: Self) -> Self;
    /// x - y
    fn subtract(x: Self, y: Self) -> Self;
    /// x * y
    fn multiply(x: Self, y: Self) -> Self;
    /// x / y
    fn divide(x: Self, y: Self) -> Self;
    /// floor(x / y)
    fn floor_divide(x: Self, y: Self) -> Self;
}

/// Bitwise operations, defined for integral element types only
pub trait IntegralElement: ArithmeticElement {
    /// x & y
    fn bitwise_and(x: Self, y: Self) -> Self;
    /// x | y
    fn bitwise_or(x: Self, y: Self) -> Self;
    /// x ^ y
    fn bitwise_xor(x: Self, y: Self) -> Self;
}

// ============================================================================
// Generic helpers
// ============================================================================

/// Truncating integer division; 0 on division by zero, wraps on `MIN / -1`
#[inline]
fn divide_int<T: PrimInt>(x: T, y: T) -> T {
    if y.is_zero() {
        return T::zero();
    }
    // checked_div only fails here for MIN / -1, whose wrapped result is MIN
    x.checked_div(&y).unwrap_or(x)
}

/// Floor division for signed integers
#[inline]
pub(crate) fn floor_divide_signed<T: PrimInt + Signed>(x: T, y: T) -> T {
    if y.is_zero() {
        return T::zero();
    }
    match x.checked_div(&y) {
        Some(quot) => {
            let rem = x % y;
            if !rem.is_zero() && rem.is_negative() != y.is_negative() {
                quot - T::one()
            } else {
                quot
            }
        }
        // MIN / -1 has no remainder and wraps to MIN
        None => x,
    }
}

/// Floor division for unsigned integers (floor and truncation coincide)
#[inline]
pub(crate) fn floor_divide_unsigned<T: PrimInt + Unsigned>(x: T, y: T) -> T {
    if y.is_zero() {
        return T::zero();
    }
    x / y
}

/// Floor division for floats
///
/// `(x - fmod(x, y)) / y`, minus one when the remainder and divisor have
/// opposite signs. Division by zero follows IEEE 754 (NaN from fmod).
#[inline]
pub(crate) fn floor_divide_float<T: Float>(x: T, y: T) -> T {
    let rem = x % y;
    let zero = T::zero();
    let quot = (x - rem) / y;
    if (rem < zero && y > zero) || (rem > zero && y < zero) {
        quot - T::one()
    } else {
        quot
    }
}

// ============================================================================
// Implementations
// ============================================================================

macro_rules! impl_wrapping_arith {
    () => {
        #[inline]
        fn add(x: Self, y: Self) -> Self {
            WrappingAdd::wrapping_add(&x, &y)
        }

        #[inline]
        fn subtract(x: Self, y: Self) -> Self {
            WrappingSub::wrapping_sub(&x, &y)
        }

        #[inline]
        fn multiply(x: Self, y: Self) -> Self {
            WrappingMul::wrapping_mul(&x, &y)
        }

        #[inline]
        fn divide(x: Self, y: Self) -> Self {
            divide_int(x, y)
        }
    };
}

macro_rules! impl_integral_bitwise {
    ($($t:ty),*) => {
        $(
            impl IntegralElement for $t {
                #[inline]
                fn bitwise_and(x: Self, y: Self) -> Self {
                    x & y
                }

                #[inline]
                fn bitwise_or(x: Self, y: Self) -> Self {
                    x | y
                }

                #[inline]
                fn bitwise_xor(x: Self, y: Self) -> Self {
                    x ^ y
                }
            }
        )*
    };
}

impl ArithmeticElement for i64 {
    impl_wrapping_arith!();

    #[inline]
    fn floor_divide(x: Self, y: Self) -> Self {
        floor_divide_signed(x, y)
    }
}

impl ArithmeticElement for i32 {
    impl_wrapping_arith!();

    #[inline]
    fn floor_divide(x: Self, y: Self) -> Self {
        floor_divide_signed(x, y)
    }
}

// Narrow signed types go through i32 and narrow back
impl ArithmeticElement for i16 {
    impl_wrapping_arith!();

    #[inline]
    fn floor_divide(x: Self, y: Self) -> Self {
        floor_divide_signed(x as i32, y as i32) as i16
    }
}

impl ArithmeticElement for i8 {
    impl_wrapping_arith!();

    #[inline]
    fn floor_divide(x: Self, y: Self) -> Self {
        floor_divide_signed(x as i32, y as i32) as i8
    }
}

impl ArithmeticElement for u8 {
    impl_wrapping_arith!();

    #[inline]
    fn floor_divide(x: Self, y: Self) -> Self {
        floor_divide_unsigned(x, y)
    }
}

impl_integral_bitwise!(i64, i32, i16, i8, u8);

macro_rules! impl_float_arith {
    ($($t:ty),*) => {
        $(
            impl ArithmeticElement for $t {
                #[inline]
                fn add(x: Self, y: Self) -> Self {
                    x + y
                }

                #[inline]
                fn subtract(x: Self, y: Self) -> Self {
                    x - y
                }

                #[inline]
                fn multiply(x: Self, y: Self) -> Self {
                    x * y
                }

                #[inline]
                fn divide(x: Self, y: Self) -> Self {
                    x / y
                }

                #[inline]
                fn floor_divide(x: Self, y: Self) -> Self {
                    floor_divide_float(x, y)
                }
            }
        )*
    };
}

impl_float_arith!(f32, f64);

impl ArithmeticElement for f16 {
    #[inline]
    fn add(x: Self, y: Self) -> Self {
        x + y
    }

    #[inline]
    fn subtract(x: Self, y: Self) -> Self {
        x - y
    }

    #[inline]
    fn multiply(x: Self, y: Self) -> Self {
        x * y
    }

    #[inline]
    fn divide(x: Self, y: Self) -> Self {
        x / y
    }

    #[inline]
    fn floor_divide(x: Self, y: Self) -> Self {
        f16::from_f32(floor_divide_float(x.to_f32(), y.to_f32()))
    }
}

// ============================================================================
// Primitive selectors
// ============================================================================

/// A binary primitive usable with any element type
///
/// Implemented by zero-sized markers so a kernel shell can be instantiated
/// per primitive and per element type, leaving nothing to decide per element.
pub trait NumericPrimitive: Send + Sync + 'static {
    /// Apply the primitive to one pair of elements
    fn apply<T: ArithmeticElement>(x: T, y: T) -> T;
}

/// A binary primitive usable with integral element types only
pub trait IntegralPrimitive: Send + Sync + 'static {
    /// Apply the primitive to one pair of elements
    fn apply<T: IntegralElement>(x: T, y: T) -> T;
}

macro_rules! numeric_primitive {
    ($name:ident, $method:ident) => {
        #[doc = concat!("Selects `ArithmeticElement::", stringify!($method), "`")]
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $name;

        impl NumericPrimitive for $name {
            #[inline(always)]
            fn apply<T: ArithmeticElement>(x: T, y: T) -> T {
                T::$method(x, y)
            }
        }
    };
}

macro_rules! integral_primitive {
    ($name:ident, $method:ident) => {
        #[doc = concat!("Selects `IntegralElement::", stringify!($method), "`")]
        #[derive(Copy, Clone, Debug, Default)]
        pub struct $name;

        impl IntegralPrimitive for $name {
            #[inline(always)]
            fn apply<T: IntegralElement>(x: T, y: T) -> T {
                T::$method(x, y)
            }
        }
    };
}

numeric_primitive!(AddPrimitive, add);
numeric_primitive!(SubtractPrimitive, subtract);
numeric_primitive!(MultiplyPrimitive, multiply);
numeric_primitive!(DividePrimitive, divide);
numeric_primitive!(FloorDividePrimitive, floor_divide);
integral_primitive!(BitwiseAndPrimitive, bitwise_and);
integral_primitive!(BitwiseOrPrimitive, bitwise_or);
integral_primitive!(BitwiseXorPrimitive, bitwise_xor);
