//! End-to-end comparison behavior: the operator table, exact mixed-kind
//! ordering, the symmetric fallback, and the last-resort identity rule.

use std::cmp::Ordering;
use std::fmt;

use num_rational::BigRational;
use num_traits::Zero;
use ratexpr::{
    compare, Arith, BoxExpr, BoxValue, Compare, Dynamic, Error, Expr, Float64, Int, Int64, Kind,
    Number, Ordered, Pipeline, Primitive, Rational, Result, Str, Value,
};

#[test]
fn operator_table_reads_the_ordering_correctly() {
    assert!(Compare::eq(Int(1), Float64(1.0)).eval_bool().unwrap());
    assert!(Compare::ne(Int(1), Int(2)).eval_bool().unwrap());
    assert!(Compare::lt(Int(1), Int(2)).eval_bool().unwrap());
    assert!(Compare::le(Int(2), Int(2)).eval_bool().unwrap());
    assert!(Compare::gt(Int(3), Int(2)).eval_bool().unwrap());
    assert!(Compare::ge(Int(2), Int(2)).eval_bool().unwrap());
    assert!(!Compare::lt(Int(2), Int(2)).eval_bool().unwrap());
    assert!(!Compare::eq(Int(1), Int(2)).eval_bool().unwrap());
}

#[test]
fn comparison_evaluates_operands_first() {
    let cmp = Compare::eq(Arith::add(Int(2), Int(2)), Int64(4));
    assert!(cmp.eval_bool().unwrap());
}

#[test]
fn ordering_against_floats_is_exact() {
    // 0.1f64 rounds to slightly above 1/10, and the engine must see it.
    assert!(Compare::lt(Rational::new(1, 10), Float64(0.1))
        .eval_bool()
        .unwrap());
    assert!(Compare::gt(Float64(0.1), Rational::new(1, 10))
        .eval_bool()
        .unwrap());
}

#[test]
fn exact_quotients_order_between_their_neighbors() {
    let fifteenth = || Arith::div(Int(1), Int(15));
    assert!(Compare::lt(fifteenth(), Rational::new(1, 10))
        .eval_bool()
        .unwrap());
    assert!(Compare::gt(fifteenth(), Rational::new(1, 25))
        .eval_bool()
        .unwrap());
    assert!(Compare::eq(fifteenth(), Rational::new(1, 15))
        .eval_bool()
        .unwrap());
}

#[test]
fn comparison_results_are_boolean_values() {
    let cmp = Compare::le(Int(1), Int(2));
    assert_eq!(cmp.eval().unwrap(), Primitive::Bool(true));
}

/// A host-side temperature that knows how to order itself against engine
/// numbers, but which engine numbers know nothing about.
#[derive(Debug, Clone, PartialEq)]
struct Celsius(f64);

impl Celsius {
    fn degrees_rational(&self) -> BigRational {
        BigRational::from_float(self.0).unwrap_or_else(BigRational::zero)
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}C", self.0)
    }
}

impl Expr for Celsius {
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

impl Value for Celsius {
    fn unpack(&self) -> Primitive {
        Primitive::Float64(self.0)
    }

    fn clone_value(&self) -> BoxValue {
        Box::new(self.clone())
    }

    fn kind(&self) -> Kind {
        Kind::Dynamic
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }
}

impl From<Celsius> for BoxExpr {
    fn from(c: Celsius) -> BoxExpr {
        Box::new(c)
    }
}

impl Ordered for Celsius {
    fn cmp_value(&self, other: &dyn Value) -> Result<Ordering> {
        match other.as_number() {
            Some(n) => Ok(self.degrees_rational().cmp(&n.to_rational())),
            None => Err(Error::not_comparable(self, other)),
        }
    }
}

#[test]
fn one_sided_ordering_works_from_either_operand_position() {
    // Celsius on the left orders directly.
    assert_eq!(
        compare(&Celsius(20.0), &Int(25)).unwrap(),
        Ordering::Less
    );
    // Celsius on the right: the number's own ordering fails, the engine
    // swaps operands and reverses the Celsius verdict.
    assert_eq!(
        compare(&Int(25), &Celsius(20.0)).unwrap(),
        Ordering::Greater
    );
    assert!(Compare::gt(Int(25), Celsius(20.0)).eval_bool().unwrap());
}

#[test]
fn unordered_values_compare_equal_only_to_themselves() {
    // Dynamic hosts expose no ordering at all; the identical reference
    // still compares equal as a last resort.
    let d = Dynamic::null();
    assert_eq!(compare(&d, &d).unwrap(), Ordering::Equal);

    // Two distinct unordered values do not.
    let other = Dynamic::null();
    let err = compare(&d, &other).unwrap_err();
    assert!(matches!(err, Error::NotComparable { .. }));
}

#[test]
fn failed_comparisons_keep_both_underlying_causes() {
    let err = compare(&Str::new("one"), &Int(1)).unwrap_err();
    let Error::NotComparable {
        primary, secondary, ..
    } = err
    else {
        panic!("expected NotComparable, got {err:?}");
    };
    assert!(primary.is_some());
    assert!(secondary.is_some());
}

#[test]
fn comparisons_render_infix() {
    let cmp = Compare::ge(Arith::add(Int(1), Int(1)), Int(2));
    assert_eq!(cmp.to_string(), "(1 + 1) >= 2");
}
