//! Ordered collections: the `Set` expression node and the `ValueSet`
//! value kind it evaluates to.

use std::cmp::Ordering;
use std::fmt;

use crate::cmp::{compare, Ordered};
use crate::expr::{box_expr_from, box_value_from, BoxExpr, Expr};
use crate::rewrite::Pipeline;
use crate::value::{BoxValue, Kind, Primitive, Value};
use crate::{Error, Result};

/// An expression node holding a sequence of element expressions. Evaluation
/// resolves every element left to right into a [`ValueSet`].
#[derive(Debug)]
pub struct Set(pub Vec<BoxExpr>);

impl Set {
    pub fn new(elements: impl IntoIterator<Item = BoxExpr>) -> Self {
        Set(elements.into_iter().collect())
    }
}

impl Expr for Set {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        let copied = self.0.iter().map(|e| e.copy(pipeline)).collect();
        pipeline.apply(Box::new(Set(copied)))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        let mut values = Vec::with_capacity(self.0.len());
        for (i, element) in self.0.iter().enumerate() {
            let value = element
                .eval_value()
                .map_err(|err| Error::wrap(format!("element {i} of {self}"), err))?;
            values.push(value);
        }
        Ok(Box::new(ValueSet(values)))
    }

    fn operands(&self) -> Vec<&dyn Expr> {
        self.0.iter().map(|e| &**e).collect()
    }
}

impl fmt::Display for Set {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{element}")?;
        }
        f.write_str("]")
    }
}

/// A fully evaluated sequence of values.
#[derive(Debug)]
pub struct ValueSet(pub Vec<BoxValue>);

impl ValueSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&dyn Value> {
        self.0.get(index).map(|v| &**v)
    }
}

impl Clone for ValueSet {
    fn clone(&self) -> Self {
        ValueSet(self.0.iter().map(|v| v.clone_value()).collect())
    }
}

impl fmt::Display for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}

impl Expr for ValueSet {
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

impl Value for ValueSet {
    fn unpack(&self) -> Primitive {
        Primitive::Seq(self.0.iter().map(|v| v.unpack()).collect())
    }

    fn clone_value(&self) -> BoxValue {
        Box::new(self.clone())
    }

    fn kind(&self) -> Kind {
        Kind::Seq
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        Some(self)
    }
}

// Element-wise lexicographic ordering over the common prefix, recursing
// through the engine comparison so mixed numeric kinds inside a sequence
// still order exactly. Sequences whose common prefixes match are equal
// regardless of length.
impl Ordered for ValueSet {
    fn cmp_value(&self, other: &dyn Value) -> Result<Ordering> {
        let other = other
            .as_any()
            .downcast_ref::<ValueSet>()
            .ok_or_else(|| Error::not_comparable(self, other))?;
        for (i, (a, b)) in self.0.iter().zip(&other.0).enumerate() {
            let ordering = compare(&**a, &**b).map_err(|err| {
                Error::wrap(format!("comparing element {i} of {self} to {other}"), err)
            })?;
            if ordering != Ordering::Equal {
                return Ok(ordering);
            }
        }
        Ok(Ordering::Equal)
    }
}

box_expr_from!(Set, ValueSet);
box_value_from!(ValueSet);
