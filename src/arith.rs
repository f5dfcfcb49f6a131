//! Binary arithmetic over expression operands.

use std::fmt;

use crate::expr::{stringify, BoxExpr, Expr};
use crate::rewrite::Pipeline;
use crate::value::{BoxValue, Value};
use crate::{Error, Result};

/// The four exact arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn verb(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "subtract",
            ArithOp::Mul => "multiply",
            ArithOp::Div => "divide",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
        }
    }
}

/// The arithmetic capability: a value kind that can combine itself with
/// another value. The left operand of an [`Arith`] node must expose this;
/// what it accepts on the right is its own business.
pub trait Arithmetic {
    fn add_value(&self, right: &dyn Value) -> Result<BoxValue>;
    fn subtract_value(&self, right: &dyn Value) -> Result<BoxValue>;
    fn multiply_value(&self, right: &dyn Value) -> Result<BoxValue>;
    fn divide_value(&self, right: &dyn Value) -> Result<BoxValue>;
}

/// A binary arithmetic expression node.
#[derive(Debug)]
pub struct Arith {
    op: ArithOp,
    left: BoxExpr,
    right: BoxExpr,
}

impl Arith {
    pub fn new(op: ArithOp, left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Arith {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn add(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Arith::new(ArithOp::Add, left, right)
    }

    pub fn sub(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Arith::new(ArithOp::Sub, left, right)
    }

    pub fn mul(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Arith::new(ArithOp::Mul, left, right)
    }

    pub fn div(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Arith::new(ArithOp::Div, left, right)
    }

    pub fn op(&self) -> ArithOp {
        self.op
    }

    pub fn left(&self) -> &dyn Expr {
        &*self.left
    }

    pub fn right(&self) -> &dyn Expr {
        &*self.right
    }
}

impl Expr for Arith {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        let copied = Arith {
            op: self.op,
            left: self.left.copy(pipeline),
            right: self.right.copy(pipeline),
        };
        pipeline.apply(Box::new(copied))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        let left = self.left.eval_value()?;
        let right = self.right.eval_value()?;
        let arithmetic = left
            .as_arithmetic()
            .ok_or_else(|| Error::type_mismatch(self.op.verb(), &*left, &*right))?;
        match self.op {
            ArithOp::Add => arithmetic.add_value(&*right),
            ArithOp::Sub => arithmetic.subtract_value(&*right),
            ArithOp::Mul => arithmetic.multiply_value(&*right),
            ArithOp::Div => arithmetic.divide_value(&*right),
        }
    }

    fn operands(&self) -> Vec<&dyn Expr> {
        vec![&*self.left, &*self.right]
    }
}

impl fmt::Display for Arith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            stringify(&*self.left, true),
            self.op.symbol(),
            stringify(&*self.right, true)
        )
    }
}

crate::expr::box_expr_from!(Arith);
