//! The built-in scalar wrappers: `Bool`, `Str`, and the numeric kinds.
//!
//! Numeric arithmetic is never performed in native width; every numeric
//! kind converts both operands to exact rationals and delegates to the
//! rational core, so mixed-kind operations keep uniform precision.

use std::cmp::Ordering;
use std::fmt;

use num_rational::BigRational;

use crate::arith::{ArithOp, Arithmetic};
use crate::cmp::Ordered;
use crate::expr::{box_expr_from, box_value_from, BoxExpr, Expr};
use crate::number::{cmp_numbers, float_rational, int_rational, rational_op, Number};
use crate::rewrite::Pipeline;
use crate::value::{BoxValue, Kind, Primitive, Value};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bool(pub bool);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Str(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int(pub i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Int64(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Uint64(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float32(pub f32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Float64(pub f64);

/// Stamp the shared `Expr`/`Value`/`Number`/`Arithmetic`/`Ordered` impls
/// for one numeric wrapper. Only the conversion into the exact rational
/// interchange form differs between the kinds.
macro_rules! numeric_kind {
    ($name:ident, $kind:ident, $prim:ident, $to_rational:expr) => {
        impl Expr for $name {
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

        impl Value for $name {
            fn unpack(&self) -> Primitive {
                Primitive::$prim(self.0)
            }

            fn clone_value(&self) -> BoxValue {
                Box::new(self.clone())
            }

            fn kind(&self) -> Kind {
                Kind::$kind
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

        impl Number for $name {
            fn to_rational(&self) -> BigRational {
                ($to_rational)(self.0)
            }
        }

        impl Arithmetic for $name {
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

        impl Ordered for $name {
            fn cmp_value(&self, other: &dyn Value) -> Result<Ordering> {
                match other.as_number() {
                    Some(n) => Ok(cmp_numbers(self, n)),
                    None => Err(Error::not_comparable(self, other)),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        box_expr_from!($name);
        box_value_from!($name);
    };
}

numeric_kind!(Int, Int, Int, |v: i32| int_rational(v));
numeric_kind!(Int64, Int64, Int64, |v: i64| int_rational(v));
numeric_kind!(Uint64, Uint64, Uint64, |v: u64| int_rational(v));
numeric_kind!(Float32, Float32, Float32, |v: f32| float_rational(f64::from(v)));
numeric_kind!(Float64, Float64, Float64, |v: f64| float_rational(v));

impl Expr for Bool {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        pipeline.apply(Box::new(*self))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        Ok(self.clone_value())
    }

    fn as_value(&self) -> Option<&dyn Value> {
        Some(self)
    }
}

impl Value for Bool {
    fn unpack(&self) -> Primitive {
        Primitive::Bool(self.0)
    }

    fn clone_value(&self) -> BoxValue {
        Box::new(*self)
    }

    fn kind(&self) -> Kind {
        Kind::Bool
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }
}

// Best-effort same-kind ordering: false sorts before true, so aggregate
// comparison can recurse into boolean elements.
impl Ordered for Bool {
    fn cmp_value(&self, other: &dyn Value) -> Result<Ordering> {
        match other.as_any().downcast_ref::<Bool>() {
            Some(b) => Ok(self.0.cmp(&b.0)),
            None => Err(Error::not_comparable(self, other)),
        }
    }
}

impl fmt::Display for Bool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Str {
    pub fn new(s: impl Into<String>) -> Self {
        Str(s.into())
    }
}

impl Expr for Str {
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

impl Value for Str {
    fn unpack(&self) -> Primitive {
        Primitive::Str(self.0.clone())
    }

    fn clone_value(&self) -> BoxValue {
        Box::new(self.clone())
    }

    fn kind(&self) -> Kind {
        Kind::Str
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }
}

// Best-effort same-kind ordering, lexicographic by scalar value.
impl Ordered for Str {
    fn cmp_value(&self, other: &dyn Value) -> Result<Ordering> {
        match other.as_any().downcast_ref::<Str>() {
            Some(s) => Ok(self.0.cmp(&s.0)),
            None => Err(Error::not_comparable(self, other)),
        }
    }
}

impl fmt::Display for Str {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

box_expr_from!(Bool, Str);
box_value_from!(Bool, Str);
