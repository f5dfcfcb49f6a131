use std::fmt;

use crate::rewrite::Pipeline;
use crate::value::{truthy, BoxValue, Primitive, Value, Var};
use crate::Result;

/// A boxed expression tree node.
pub type BoxExpr = Box<dyn Expr>;

/// Any node of an expression tree: a constant value, a variable, or an
/// operator over child expressions.
///
/// Capability lookup happens at runtime through the `as_*` probes rather
/// than a fixed type hierarchy: a node advertises what it can do by
/// returning `Some` from the matching probe, and operators check for the
/// capability they need when they evaluate.
pub trait Expr: fmt::Debug + fmt::Display {
    /// Deep-copy this node, feeding every rebuilt node through `pipeline`.
    /// Operands are copied (and transformed) before the node itself, so a
    /// transform never observes a shared subtree. An empty pipeline is an
    /// identity deep copy.
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr;

    /// Evaluate the expression into a host primitive.
    fn eval(&self) -> Result<Primitive> {
        Ok(self.eval_value()?.unpack())
    }

    /// Evaluate the expression into an engine value, skipping the
    /// primitive round-trip when composing operations.
    fn eval_value(&self) -> Result<BoxValue>;

    /// Evaluate under truthiness coercion.
    fn eval_bool(&self) -> Result<bool> {
        Ok(truthy(&self.eval()?))
    }

    /// Child expressions; empty for terminals.
    fn operands(&self) -> Vec<&dyn Expr> {
        Vec::new()
    }

    fn as_value(&self) -> Option<&dyn Value> {
        None
    }

    fn as_var(&self) -> Option<&Var> {
        None
    }
}

/// True if the expression is a leaf of the tree (a value or a variable).
pub fn is_terminal(e: &dyn Expr) -> bool {
    e.as_value().is_some() || e.as_var().is_some()
}

/// True if the expression is a constant: a value that is not a variable.
pub fn is_const(e: &dyn Expr) -> bool {
    e.as_value().is_some() && e.as_var().is_none()
}

/// Render an expression for embedding inside a larger rendering, wrapping
/// non-constant subexpressions in parentheses.
pub fn stringify(e: &dyn Expr, inner: bool) -> String {
    let s = e.to_string();
    if !inner || is_const(e) {
        s
    } else {
        format!("({s})")
    }
}

macro_rules! box_expr_from {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for crate::expr::BoxExpr {
            fn from(e: $ty) -> crate::expr::BoxExpr {
                Box::new(e)
            }
        }
    )*};
}

macro_rules! box_value_from {
    ($($ty:ty),* $(,)?) => {$(
        impl From<$ty> for crate::value::BoxValue {
            fn from(v: $ty) -> crate::value::BoxValue {
                Box::new(v)
            }
        }
    )*};
}

pub(crate) use box_expr_from;
pub(crate) use box_value_from;
