//! The comparison engine and the comparison operator node.

use std::cmp::Ordering;
use std::fmt;

use log::warn;

use crate::expr::{stringify, BoxExpr, Expr};
use crate::rewrite::Pipeline;
use crate::scalar::Bool;
use crate::value::{BoxValue, Value};
use crate::{Error, Result};

/// The ordering capability: a value kind that can place itself relative to
/// another value. `Less`/`Equal`/`Greater` follow the usual sign
/// convention. Implementations may be one-sided; the engine's symmetric
/// fallback makes them usable in either operand position.
pub trait Ordered {
    fn cmp_value(&self, other: &dyn Value) -> Result<Ordering>;
}

/// Compare two expressions.
///
/// Both are resolved to values first. The left value's ordering capability
/// is tried first; if it is missing or fails, the right value's is tried
/// with the result reversed. A fallback success after a primary failure is
/// authoritative: the primary failure is demoted to a log diagnostic. If
/// both attempts fail and `left` and `right` are the identical reference,
/// the expressions are deemed equal; otherwise the comparison fails with
/// both underlying errors attached.
pub fn compare(left: &dyn Expr, right: &dyn Expr) -> Result<Ordering> {
    let lv = left.eval_value()?;
    let rv = right.eval_value()?;

    let primary = match lv.as_ordered() {
        Some(ordered) => match ordered.cmp_value(&*rv) {
            Ok(ordering) => return Ok(ordering),
            Err(err) => Some(err),
        },
        None => None,
    };
    let secondary = match rv.as_ordered() {
        Some(ordered) => match ordered.cmp_value(&*lv) {
            Ok(ordering) => {
                if let Some(err) = &primary {
                    warn!(
                        "comparing {rv} to {lv} succeeded after {lv} to {rv} failed: {err}"
                    );
                }
                return Ok(ordering.reverse());
            }
            Err(err) => Some(err),
        },
        None => None,
    };

    // Degenerate same-object shortcut, kept deliberately narrow: it only
    // applies to the very references handed in, after both ordering
    // attempts have failed.
    if same_reference(left, right) {
        return Ok(Ordering::Equal);
    }

    Err(Error::NotComparable {
        left: lv.to_string(),
        right: rv.to_string(),
        primary: primary.map(Box::new),
        secondary: secondary.map(Box::new),
    })
}

fn same_reference(a: &dyn Expr, b: &dyn Expr) -> bool {
    std::ptr::eq(a as *const dyn Expr as *const u8, b as *const dyn Expr as *const u8)
}

/// The six comparison operators, each a different reading of the sign
/// returned by [`compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
        }
    }

    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            CmpOp::Eq => ordering == Ordering::Equal,
            CmpOp::Ne => ordering != Ordering::Equal,
            CmpOp::Gt => ordering == Ordering::Greater,
            CmpOp::Ge => ordering != Ordering::Less,
            CmpOp::Lt => ordering == Ordering::Less,
            CmpOp::Le => ordering != Ordering::Greater,
        }
    }
}

/// A binary comparison expression node.
#[derive(Debug)]
pub struct Compare {
    op: CmpOp,
    left: BoxExpr,
    right: BoxExpr,
}

impl Compare {
    pub fn new(op: CmpOp, left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Compare {
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn eq(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Compare::new(CmpOp::Eq, left, right)
    }

    pub fn ne(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Compare::new(CmpOp::Ne, left, right)
    }

    pub fn gt(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Compare::new(CmpOp::Gt, left, right)
    }

    pub fn ge(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Compare::new(CmpOp::Ge, left, right)
    }

    pub fn lt(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Compare::new(CmpOp::Lt, left, right)
    }

    pub fn le(left: impl Into<BoxExpr>, right: impl Into<BoxExpr>) -> Self {
        Compare::new(CmpOp::Le, left, right)
    }

    pub fn op(&self) -> CmpOp {
        self.op
    }

    pub fn left(&self) -> &dyn Expr {
        &*self.left
    }

    pub fn right(&self) -> &dyn Expr {
        &*self.right
    }
}

impl Expr for Compare {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        let copied = Compare {
            op: self.op,
            left: self.left.copy(pipeline),
            right: self.right.copy(pipeline),
        };
        pipeline.apply(Box::new(copied))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        Ok(Box::new(Bool(self.eval_bool()?)))
    }

    fn eval_bool(&self) -> Result<bool> {
        let ordering = compare(&*self.left, &*self.right)?;
        Ok(self.op.holds(ordering))
    }

    fn operands(&self) -> Vec<&dyn Expr> {
        vec![&*self.left, &*self.right]
    }
}

impl fmt::Display for Compare {
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

crate::expr::box_expr_from!(Compare);
