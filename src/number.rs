//! The rational arithmetic core. All cross-kind numeric arithmetic and
//! ordering funnels through an exact arbitrary-precision rational
//! intermediate, so `Int + Float64` never silently truncates and mixed-kind
//! ordering is transitive.

use std::cmp::Ordering;
use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};

use crate::arith::{ArithOp, Arithmetic};
use crate::cmp::Ordered;
use crate::expr::{box_expr_from, box_value_from, BoxExpr, Expr};
use crate::rewrite::Pipeline;
use crate::scalar::{Float64, Int64, Uint64};
use crate::value::{BoxValue, Kind, Primitive, Value};
use crate::{Error, Result};

/// Numeric interchange: any value kind that can express itself as an exact
/// rational participates in arithmetic and ordering with every other
/// numeric kind.
pub trait Number: Value {
    fn to_rational(&self) -> BigRational;
}

/// Compare two numbers by their exact rational forms. Never approximates
/// through floating point, so the induced order is total and transitive
/// across mixed kinds.
pub fn cmp_numbers(left: &dyn Number, right: &dyn Number) -> Ordering {
    left.to_rational().cmp(&right.to_rational())
}

/// Apply one exact arithmetic operation between a number and another value.
/// The right operand must also be a number; the exact result is demoted to
/// the narrowest lossless kind before it is returned.
pub(crate) fn rational_op(left: &dyn Number, op: ArithOp, right: &dyn Value) -> Result<BoxValue> {
    let right = right
        .as_number()
        .ok_or_else(|| Error::type_mismatch(op.verb(), left, right))?;
    let a = left.to_rational();
    let b = right.to_rational();
    let result = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => {
            if b.is_zero() {
                return Err(Error::DivisionByZero);
            }
            a / b
        }
    };
    Ok(demote(result))
}

/// Convert an exact rational to the narrowest built-in kind that represents
/// it losslessly: integral and fits i64, then fits u64, then exactly
/// representable as f64, else it stays rational.
pub fn demote(r: BigRational) -> BoxValue {
    if r.is_integer() {
        let n = r.numer();
        if let Some(i) = n.to_i64() {
            return Box::new(Int64(i));
        }
        if let Some(u) = n.to_u64() {
            return Box::new(Uint64(u));
        }
    }
    if let Some(f) = r.to_f64() {
        if f.is_finite() && BigRational::from_float(f).as_ref() == Some(&r) {
            return Box::new(Float64(f));
        }
    }
    Box::new(Rational(r))
}

pub(crate) fn int_rational(i: impl Into<BigInt>) -> BigRational {
    BigRational::from_integer(i.into())
}

/// Non-finite floats have no rational form; they collapse to zero.
pub(crate) fn float_rational(f: f64) -> BigRational {
    BigRational::from_float(f).unwrap_or_else(BigRational::zero)
}

/// An exact arbitrary-precision fraction value. Arithmetic results only
/// surface as `Rational` when no narrower kind holds them exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Rational(pub BigRational);

impl Rational {
    pub fn new(numer: i64, denom: i64) -> Self {
        Rational(BigRational::new(numer.into(), denom.into()))
    }

    /// The narrowest lossless rendition of this value.
    pub fn demoted(&self) -> BoxValue {
        demote(self.0.clone())
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Expr for Rational {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        pipeline.apply(Box::new(self.clone()))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        Ok(self.clone_value())
    }

    fn as_value(&self) -> Option<&dyn Value> {
        Some(self)
    }
}

impl Value for Rational {
    fn unpack(&self) -> Primitive {
        Primitive::Rational(self.0.clone())
    }

    fn clone_value(&self) -> BoxValue {
        Box::new(self.clone())
    }

    fn kind(&self) -> Kind {
        Kind::Rational
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_number(&self) -> Option<&dyn Number> {
        Some(self)
    }

    fn as_arithmetic(&self) -> Option<&dyn Arithmetic> {
        Some(self)
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }
}

impl Number for Rational {
    fn to_rational(&self) -> BigRational {
        self.0.clone()
    }
}

impl Arithmetic for Rational {
    fn add_value(&self, right: &dyn Value) -> Result<BoxValue> {
        rational_op(self, ArithOp::Add, right)
    }

    fn subtract_value(&self, right: &dyn Value) -> Result<BoxValue> {
        rational_op(self, ArithOp::Sub, right)
    }

    fn multiply_value(&self, right: &dyn Value) -> Result<BoxValue> {
        rational_op(self, ArithOp::Mul, right)
    }

    fn divide_value(&self, right: &dyn Value) -> Result<BoxValue> {
        rational_op(self, ArithOp::Div, right)
    }
}

impl Ordered for Rational {
    fn cmp_value(&self, other: &dyn Value) -> Result<Ordering> {
        match other.as_number() {
            Some(n) => Ok(cmp_numbers(self, n)),
            None => Err(Error::not_comparable(self, other)),
        }
    }
}

box_expr_from!(Rational);
box_value_from!(Rational);

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use num_traits::One;

    fn big(digits: &str) -> BigInt {
        digits.parse().unwrap()
    }

    #[test]
    fn integral_results_demote_to_int64_first() {
        let v = demote(BigRational::from_integer(2.into()));
        assert_eq!(v.kind(), Kind::Int64);
        assert_eq!(v.unpack(), Primitive::Int64(2));
    }

    #[test]
    fn past_i64_max_demotes_to_uint64() {
        let just_past = BigInt::from(i64::MAX) + BigInt::one();
        let v = demote(BigRational::from_integer(just_past));
        assert_eq!(v.kind(), Kind::Uint64);
        assert_eq!(v.unpack(), Primitive::Uint64(i64::MAX as u64 + 1));
    }

    #[test]
    fn past_u64_max_demotes_to_float64_only_when_exact() {
        // 2^64 is a power of two, exactly representable as f64.
        let two_to_64 = BigInt::one() << 64usize;
        let v = demote(BigRational::from_integer(two_to_64));
        assert_eq!(v.kind(), Kind::Float64);
        assert_eq!(v.unpack(), Primitive::Float64(18446744073709551616.0));

        // 2^64 + 1 is not; it must stay rational.
        let off_by_one = (BigInt::one() << 64usize) + BigInt::one();
        let v = demote(BigRational::from_integer(off_by_one.clone()));
        assert_eq!(v.kind(), Kind::Rational);
        assert_eq!(
            v.unpack(),
            Primitive::Rational(BigRational::from_integer(off_by_one))
        );
    }

    #[test]
    fn exact_binary_fractions_demote_to_float64() {
        let v = demote(BigRational::new(1.into(), 2.into()));
        assert_eq!(v.kind(), Kind::Float64);
        assert_eq!(v.unpack(), Primitive::Float64(0.5));
    }

    #[test]
    fn inexact_fractions_stay_rational() {
        let v = demote(BigRational::new(1.into(), 3.into()));
        assert_eq!(v.kind(), Kind::Rational);
    }

    #[test]
    fn huge_integers_survive_demotion_unchanged() {
        let n = big("123456789012345678901234567890123456789");
        let v = demote(BigRational::from_integer(n.clone()));
        assert_eq!(v.kind(), Kind::Rational);
        assert_eq!(v.unpack(), Primitive::Rational(BigRational::from_integer(n)));
    }

    #[test]
    fn division_by_zero_is_typed() {
        let one = Rational::new(1, 1);
        let zero = Rational::new(0, 1);
        let err = one.divide_value(&zero).unwrap_err();
        assert!(matches!(err, Error::DivisionByZero));
    }

    #[test]
    fn rational_orders_against_numbers_exactly() {
        let third = Rational::new(1, 3);
        let nearly = Float64(0.333333333333333);
        assert_eq!(third.cmp_value(&nearly).unwrap(), Ordering::Greater);
    }
}
