//! Named attribute access on values.

use std::fmt;

use crate::expr::{stringify, BoxExpr, Expr};
use crate::rewrite::Pipeline;
use crate::value::{BoxValue, Value};
use crate::{Error, Result};

/// The attribute-read capability.
pub trait AttrGet {
    fn get_attr(&self, name: &str) -> Result<BoxValue>;
}

/// The attribute-write capability. Values are immutable, so writable
/// attributes belong to host-backed values with interior mutability.
pub trait AttrSet {
    fn set_attr(&self, name: &str, value: BoxValue) -> Result<()>;
}

/// Read a named attribute from a value, failing when the value does not
/// expose attributes at all.
pub fn get_attr_value(value: &dyn Value, name: &str) -> Result<BoxValue> {
    match value.as_attr_get() {
        Some(attrs) => attrs.get_attr(name),
        None => Err(Error::NoSuchAttribute {
            value: value.to_string(),
            name: name.to_string(),
        }),
    }
}

/// Write a named attribute on a value, failing when the value does not
/// accept attribute writes at all.
pub fn set_attr_value(target: &dyn Value, name: &str, value: BoxValue) -> Result<()> {
    match target.as_attr_set() {
        Some(attrs) => attrs.set_attr(name, value),
        None => Err(Error::NoSuchAttribute {
            value: target.to_string(),
            name: name.to_string(),
        }),
    }
}

/// An attribute-access expression node: evaluate the base, then read the
/// named attribute from the resulting value.
#[derive(Debug)]
pub struct Attr {
    base: BoxExpr,
    name: String,
}

impl Attr {
    pub fn new(base: impl Into<BoxExpr>, name: impl Into<String>) -> Self {
        Attr {
            base: base.into(),
            name: name.into(),
        }
    }

    pub fn base(&self) -> &dyn Expr {
        &*self.base
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Expr for Attr {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        let copied = Attr {
            base: self.base.copy(pipeline),
            name: self.name.clone(),
        };
        pipeline.apply(Box::new(copied))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        let base = self.base.eval_value()?;
        get_attr_value(&*base, &self.name)
    }

    fn operands(&self) -> Vec<&dyn Expr> {
        vec![&*self.base]
    }
}

impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", stringify(&*self.base, true), self.name)
    }
}

crate::expr::box_expr_from!(Attr);
