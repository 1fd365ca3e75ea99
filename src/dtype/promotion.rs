//! Type promotion rules for binary operations
//!
//! Kernels never choose their output dtype; these helpers are for callers
//! that need to pre-allocate an output of the right type.

use super::DType;
use crate::scalar::ScalarKind;

/// Promote two dtypes to a common dtype for binary operations
///
/// Follows NumPy-like promotion rules:
/// - Floats always win over integers
/// - Larger types win over smaller types
/// - Signed wins over unsigned when mixing
pub fn promote(lhs: DType, rhs: DType) -> DType {
    use DType::*;

    if lhs == rhs {
        return lhs;
    }

    // Promotion priority (higher = wins)
    let priority = |dt: DType| -> u8 {
        match dt {
            F64 => 100,
            F32 => 90,
            F16 => 80,
            I64 => 65,
            I32 => 55,
            I16 => 45,
            I8 => 35,
            U8 => 30,
        }
    };

    // Mixing signed and unsigned: i8 cannot hold u8, every wider signed type can
    if lhs.is_signed_int() && rhs.is_unsigned_int() {
        return match lhs {
            I8 => I16,
            other => other,
        };
    }
    if rhs.is_signed_int() && lhs.is_unsigned_int() {
        return promote(rhs, lhs);
    }

    if priority(lhs) >= priority(rhs) {
        lhs
    } else {
        rhs
    }
}

/// Result dtype of an array/scalar operation
///
/// An integral scalar never widens the array dtype. A floating scalar keeps a
/// floating array dtype and turns an integral array into the default float
/// type (F32).
pub fn result_type_scalar(array: DType, scalar: ScalarKind) -> DType {
    match scalar {
        ScalarKind::Integral => array,
        ScalarKind::Floating if array.is_float() => array,
        ScalarKind::Floating => DType::F32,
    }
}
