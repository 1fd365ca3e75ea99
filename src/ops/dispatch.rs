//! DType dispatch macros
//!
//! These macros turn a runtime `DType` into a concrete Rust type. The body
//! is compiled once per arm with `$T` bound to that arm's type, so it must
//! type-check for every type the macro can bind:
//!
//! | Macro                      | Binds                               |
//! |----------------------------|-------------------------------------|
//! | `dispatch_dtype!`          | every dtype                         |
//! | `dispatch_numeric_dtype!`  | `DTypeSet::NUMERIC`                 |
//! | `dispatch_integral_dtype!` | `DTypeSet::INTEGRAL`                |
//!
//! Dtypes outside a restricted macro's category make the enclosing function
//! return `Error::UnsupportedDType` with `$error_op` as the operation name, so
//! those macros may only be used in functions returning
//! `crate::error::Result`.
//!
//! # Usage
//!
//! ```ignore
//! fn elem_size(dtype: DType) -> usize {
//!     dispatch_dtype!(dtype, T => { std::mem::size_of::<T>() })
//! }
//!
//! fn bit_width(dtype: DType) -> Result<usize> {
//!     dispatch_integral_dtype!(dtype, T => { Ok(std::mem::size_of::<T>() * 8) }, "bit_width")
//! }
//! ```

/// Dispatch over every dtype
///
/// Cannot fail, so unlike the restricted variants it takes no operation name.
#[macro_export]
macro_rules! dispatch_dtype {
    ($dtype:expr, $T:ident => $body:block) => {{
        match $dtype {
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F16 => {
                type $T = half::f16;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
        }
    }};
}

/// Dispatch over the dtypes on which arithmetic is defined
#[macro_export]
macro_rules! dispatch_numeric_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {{
        let dtype: $crate::dtype::DType = $dtype;
        $crate::dtype::DTypeSet::NUMERIC.check(dtype, $error_op)?;
        $crate::dispatch_dtype!(dtype, $T => $body)
    }};
}

/// Dispatch over integral dtypes only
#[macro_export]
macro_rules! dispatch_integral_dtype {
    ($dtype:expr, $T:ident => $body:block, $error_op:expr) => {{
        let dtype: $crate::dtype::DType = $dtype;
        match dtype {
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            _ => {
                return Err($crate::error::Error::UnsupportedDType {
                    dtype,
                    op: $error_op,
                })
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    use crate::dtype::{DType, Element};
    use crate::error::{Error, Result};

    fn dtype_of_binding(dtype: DType) -> DType {
        dispatch_dtype!(dtype, T => { T::DTYPE })
    }

    fn integral_size(dtype: DType) -> Result<usize> {
        dispatch_integral_dtype!(dtype, T => { Ok(std::mem::size_of::<T>()) }, "integral_size")
    }

    #[test]
    fn test_dispatch_binds_matching_type() {
        for dt in DType::ALL {
            assert_eq!(dtype_of_binding(dt), dt);
        }
    }

    #[test]
    fn test_dispatch_integral() {
        assert_eq!(integral_size(DType::I16).unwrap(), 2);
        assert_eq!(integral_size(DType::U8).unwrap(), 1);
        assert!(matches!(
            integral_size(DType::F32),
            Err(Error::UnsupportedDType {
                dtype: DType::F32,
                op: "integral_size"
            })
        ));
    }
}
