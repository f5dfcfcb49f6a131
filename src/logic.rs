//! Boolean combinators: negation and the short-circuit conjunction and
//! disjunction aggregates. All three coerce their operands through
//! truthiness, so any evaluable expression can participate.

use std::fmt;

use crate::expr::{stringify, BoxExpr, Expr};
use crate::rewrite::Pipeline;
use crate::scalar::Bool;
use crate::value::BoxValue;
use crate::{Error, Result};

/// Logical negation of one operand's truthiness.
#[derive(Debug)]
pub struct Not(BoxExpr);

impl Not {
    pub fn new(operand: impl Into<BoxExpr>) -> Self {
        Not(operand.into())
    }

    pub fn operand(&self) -> &dyn Expr {
        &*self.0
    }
}

impl Expr for Not {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        pipeline.apply(Box::new(Not(self.0.copy(pipeline))))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        Ok(Box::new(Bool(self.eval_bool()?)))
    }

    fn eval_bool(&self) -> Result<bool> {
        let truth = self
            .0
            .eval_bool()
            .map_err(|err| Error::wrap(format!("negating {}", self.0), err))?;
        Ok(!truth)
    }

    fn operands(&self) -> Vec<&dyn Expr> {
        vec![&*self.0]
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", stringify(&*self.0, true))
    }
}

/// Conjunction over any number of operands. Evaluation is left to right
/// and stops at the first false operand; with no operands the result is
/// vacuously true.
#[derive(Debug)]
pub struct All(Vec<BoxExpr>);

impl All {
    pub fn new(operands: impl IntoIterator<Item = BoxExpr>) -> Self {
        All(operands.into_iter().collect())
    }
}

impl Expr for All {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        let copied = self.0.iter().map(|e| e.copy(pipeline)).collect();
        pipeline.apply(Box::new(All(copied)))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        Ok(Box::new(Bool(self.eval_bool()?)))
    }

    fn eval_bool(&self) -> Result<bool> {
        for (i, operand) in self.0.iter().enumerate() {
            let truth = operand
                .eval_bool()
                .map_err(|err| Error::wrap(format!("operand {i} of {self}"), err))?;
            if !truth {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn operands(&self) -> Vec<&dyn Expr> {
        self.0.iter().map(|e| &**e).collect()
    }
}

impl fmt::Display for All {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all(")?;
        for (i, operand) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{operand}")?;
        }
        write!(f, ")")
    }
}

/// Disjunction over any number of operands. Evaluation is left to right
/// and stops at the first true operand; with no operands the result is
/// vacuously false.
#[derive(Debug)]
pub struct Any(Vec<BoxExpr>);

impl Any {
    pub fn new(operands: impl IntoIterator<Item = BoxExpr>) -> Self {
        Any(operands.into_iter().collect())
    }
}

impl Expr for Any {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        let copied = self.0.iter().map(|e| e.copy(pipeline)).collect();
        pipeline.apply(Box::new(Any(copied)))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        Ok(Box::new(Bool(self.eval_bool()?)))
    }

    fn eval_bool(&self) -> Result<bool> {
        for (i, operand) in self.0.iter().enumerate() {
            let truth = operand
                .eval_bool()
                .map_err(|err| Error::wrap(format!("operand {i} of {self}"), err))?;
            if truth {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn operands(&self) -> Vec<&dyn Expr> {
        self.0.iter().map(|e| &**e).collect()
    }
}

impl fmt::Display for Any {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "any(")?;
        for (i, operand) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{operand}")?;
        }
        write!(f, ")")
    }
}

crate::expr::box_expr_from!(Not, All, Any);
