//! Binary operation vocabulary and broadcasting helpers

use crate::dtype::DTypeSet;
use crate::runtime::Runtime;
use crate::scalar::Scalar;
use crate::tensor::Tensor;
use std::fmt;

/// Compute the output shape for binary operations with broadcasting
///
/// Returns None if the shapes are incompatible for broadcasting.
pub fn broadcast_shape(a: &[usize], b: &[usize]) -> Option<Vec<usize>> {
    let ndim = a.len().max(b.len());
    let dim_at = |s: &[usize], i: usize| if i < s.len() { s[s.len() - 1 - i] } else { 1 };

    let mut result: Vec<usize> = (0..ndim)
        .map(|i| match (dim_at(a, i), dim_at(b, i)) {
            (x, y) if x == y => Some(x),
            (1, y) => Some(y),
            (x, 1) => Some(x),
            _ => None,
        })
        .collect::<Option<_>>()?;

    result.reverse();
    Some(result)
}

/// Binary elementwise operation
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// x + y
    Add,
    /// x - y
    Subtract,
    /// x * y
    Multiply,
    /// x / y
    Divide,
    /// floor(x / y)
    FloorDivide,
    /// x & y
    BitwiseAnd,
    /// x | y
    BitwiseOr,
    /// x ^ y
    BitwiseXor,
}

impl BinaryOp {
    /// Every binary operation
    pub const ALL: [BinaryOp; 8] = [
        BinaryOp::Add,
        BinaryOp::Subtract,
        BinaryOp::Multiply,
        BinaryOp::Divide,
        BinaryOp::FloorDivide,
        BinaryOp::BitwiseAnd,
        BinaryOp::BitwiseOr,
        BinaryOp::BitwiseXor,
    ];

    /// Name used in error messages, e.g. `"floor_divide"`
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::FloorDivide => "floor_divide",
            Self::BitwiseAnd => "bitwise_and",
            Self::BitwiseOr => "bitwise_or",
            Self::BitwiseXor => "bitwise_xor",
        }
    }

    /// Stem of the registered kernel name, e.g. `"FloorDivide"`
    pub const fn kernel_name(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Subtract => "Subtract",
            Self::Multiply => "Multiply",
            Self::Divide => "Divide",
            Self::FloorDivide => "FloorDivide",
            Self::BitwiseAnd => "BitwiseAnd",
            Self::BitwiseOr => "BitwiseOr",
            Self::BitwiseXor => "BitwiseXor",
        }
    }

    /// Dtypes the operation accepts
    pub const fn supported_dtypes(self) -> DTypeSet {
        match self {
            Self::Add | Self::Multiply => DTypeSet::ALL,
            Self::Subtract | Self::Divide | Self::FloorDivide => DTypeSet::NUMERIC,
            Self::BitwiseAnd | Self::BitwiseOr | Self::BitwiseXor => DTypeSet::INTEGRAL,
        }
    }

    /// True if `op(x, y) == op(y, x)` for every pair of elements
    pub const fn is_commutative(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Multiply | Self::BitwiseAnd | Self::BitwiseOr | Self::BitwiseXor
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which operands of a binary operation are arrays
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OperandPattern {
    /// `op(array, array)`
    ArrayArray,
    /// `op(array, scalar)`
    ArrayScalar,
    /// `op(scalar, array)`
    ScalarArray,
}

impl OperandPattern {
    /// Every operand pattern
    pub const ALL: [OperandPattern; 3] = [
        OperandPattern::ArrayArray,
        OperandPattern::ArrayScalar,
        OperandPattern::ScalarArray,
    ];

    /// Suffix appended to the operation's kernel name
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::ArrayArray => "",
            Self::ArrayScalar => "ArrayScalar",
            Self::ScalarArray => "ScalarArray",
        }
    }
}

/// Arguments of a binary kernel call
#[derive(Debug)]
pub enum BinaryOperands<'a, R: Runtime> {
    /// Two array inputs
    ArrayArray(&'a Tensor<R>, &'a Tensor<R>),
    /// Array on the left, scalar on the right
    ArrayScalar(&'a Tensor<R>, Scalar),
    /// Scalar on the left, array on the right
    ScalarArray(Scalar, &'a Tensor<R>),
}

impl<'a, R: Runtime> BinaryOperands<'a, R> {
    /// Pattern these operands match
    pub fn pattern(&self) -> OperandPattern {
        match self {
            Self::ArrayArray(..) => OperandPattern::ArrayArray,
            Self::ArrayScalar(..) => OperandPattern::ArrayScalar,
            Self::ScalarArray(..) => OperandPattern::ScalarArray,
        }
    }

    /// Array operands, left to right
    pub fn arrays(&self) -> impl Iterator<Item = &'a Tensor<R>> {
        let (first, second) = match *self {
            Self::ArrayArray(a, b) => (Some(a), Some(b)),
            Self::ArrayScalar(a, _) | Self::ScalarArray(_, a) => (Some(a), None),
        };
        first.into_iter().chain(second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::DType;

    #[test]
    fn test_broadcast_shape() {
        assert_eq!(broadcast_shape(&[3, 1], &[1, 4]), Some(vec![3, 4]));
        assert_eq!(broadcast_shape(&[2, 3, 4], &[4]), Some(vec![2, 3, 4]));
        assert_eq!(broadcast_shape(&[], &[5]), Some(vec![5]));
        assert_eq!(broadcast_shape(&[3], &[4]), None);
    }

    #[test]
    fn test_op_capabilities() {
        assert!(BinaryOp::Add.supported_dtypes().contains(DType::F16));
        assert!(BinaryOp::FloorDivide.supported_dtypes().contains(DType::U8));
        assert!(!BinaryOp::BitwiseXor.supported_dtypes().contains(DType::F64));
        assert!(BinaryOp::BitwiseXor.is_commutative());
        assert!(!BinaryOp::FloorDivide.is_commutative());
    }

    #[test]
    fn test_names() {
        assert_eq!(BinaryOp::FloorDivide.to_string(), "floor_divide");
        assert_eq!(BinaryOp::BitwiseAnd.kernel_name(), "BitwiseAnd");
        assert_eq!(OperandPattern::ScalarArray.suffix(), "ScalarArray");
    }
}
