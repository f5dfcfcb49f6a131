//! End-to-end arithmetic behavior: exactness, demotion, and typed failures.

use num_rational::BigRational;
use ratexpr::{Arith, Error, Expr, Int, Int64, Primitive, Str, Uint64};

#[test]
fn one_third_times_three_is_exactly_one() {
    let expr = Arith::mul(Arith::div(Int(1), Int(3)), Int(3));
    assert_eq!(expr.eval().unwrap(), Primitive::Int64(1));
}

#[test]
fn inexact_quotients_stay_rational() {
    let expr = Arith::div(Int(1), Int(15));
    assert_eq!(
        expr.eval().unwrap(),
        Primitive::Rational(BigRational::new(1.into(), 15.into()))
    );
}

#[test]
fn sums_of_fifteenths_accumulate_exactly() {
    // 1/15 + 1/15 + ... five times is exactly 1/3; floating point would
    // have drifted by now.
    let fifteenth = || Arith::div(Int(1), Int(15));
    let sum = Arith::add(
        fifteenth(),
        Arith::add(
            fifteenth(),
            Arith::add(fifteenth(), Arith::add(fifteenth(), fifteenth())),
        ),
    );
    assert_eq!(
        sum.eval().unwrap(),
        Primitive::Rational(BigRational::new(1.into(), 3.into()))
    );
}

#[test]
fn mixed_kind_arithmetic_demotes_to_narrowest_exact_kind() {
    let expr = Arith::add(Int(1), 0.5f64);
    assert_eq!(expr.eval().unwrap(), Primitive::Float64(1.5));

    let expr = Arith::add(Int(2), Int(2));
    assert_eq!(expr.eval().unwrap(), Primitive::Int64(4));

    let expr = Arith::div(Int64(6), Int(3));
    assert_eq!(expr.eval().unwrap(), Primitive::Int64(2));
}

#[test]
fn results_grow_past_native_integer_range() {
    // u64::MAX + 1 is 2^64: too big for u64, but a power of two, so it is
    // exactly representable as f64.
    let expr = Arith::add(Uint64(u64::MAX), Int(1));
    assert_eq!(
        expr.eval().unwrap(),
        Primitive::Float64(18446744073709551616.0)
    );
}

#[test]
fn division_by_zero_is_a_typed_error() {
    let expr = Arith::div(Int(1), Int(0));
    let err = expr.eval().unwrap_err();
    assert!(matches!(err, Error::DivisionByZero));
}

#[test]
fn non_numeric_left_operand_is_a_type_mismatch() {
    let expr = Arith::add(Str::new("a"), Int(1));
    let err = expr.eval().unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
    let message = err.to_string();
    assert!(message.contains("add"), "message: {message}");
    assert!(message.contains("\"a\""), "message: {message}");
}

#[test]
fn non_numeric_right_operand_is_a_type_mismatch() {
    let expr = Arith::mul(Int(2), Str::new("b"));
    let err = expr.eval().unwrap_err();
    assert!(matches!(err, Error::TypeMismatch { .. }));
}

#[test]
fn nested_trees_render_with_parentheses() {
    let expr = Arith::mul(Arith::add(Int(1), Int(2)), Int(3));
    assert_eq!(expr.to_string(), "(1 + 2) * 3");
}
