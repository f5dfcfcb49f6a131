//! The host-object bridge. Types defined outside the engine opt into
//! evaluation by implementing [`Host`]; the engine wraps them in the
//! [`Dynamic`] value kind and routes attribute reads to host fields and
//! zero-argument behaviors.

use std::any::Any;
use std::fmt;

use thiserror::Error;

use crate::attr::AttrGet;
use crate::expr::{box_expr_from, box_value_from, BoxExpr, Expr};
use crate::rewrite::Pipeline;
use crate::value::{value_of, BoxValue, Kind, Primitive, Value};
use crate::{Error, Result};

/// Failures a host object can report back across the bridge. The engine
/// translates these into its own error taxonomy at the call site.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("unknown behavior {behavior:?} on {type_name}")]
    UnknownBehavior {
        type_name: String,
        behavior: String,
    },

    #[error("behavior {behavior:?} on {type_name} takes {expected} arguments, got {actual}")]
    InvalidArity {
        type_name: String,
        behavior: String,
        expected: usize,
        actual: usize,
    },

    #[error("{0}")]
    Failed(String),
}

/// A host type bridged into the engine. The default method bodies describe
/// an object with no fields and no behaviors; implementations override what
/// they support.
pub trait Host: fmt::Debug {
    /// Host-side name of the underlying type, used in diagnostics.
    fn type_name(&self) -> &'static str;

    /// Read a named field, or `None` when no such field exists. Attribute
    /// resolution consults fields before behaviors.
    fn field(&self, _name: &str) -> Option<Primitive> {
        None
    }

    /// Invoke a named behavior with primitive arguments.
    fn call(
        &self,
        behavior: &str,
        _args: &[Primitive],
    ) -> std::result::Result<Primitive, HostError> {
        Err(HostError::UnknownBehavior {
            type_name: self.type_name().to_string(),
            behavior: behavior.to_string(),
        })
    }

    /// True when the object is its type's zero value; drives truthiness.
    fn is_zero(&self) -> bool {
        false
    }

    fn clone_boxed(&self) -> Box<dyn Host>;

    fn as_any(&self) -> &dyn Any;
}

/// An owned, clonable handle to a host object.
#[derive(Debug)]
pub struct HostObj(Box<dyn Host>);

impl HostObj {
    pub fn new(host: impl Host + 'static) -> Self {
        HostObj(Box::new(host))
    }

    pub fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    pub fn field(&self, name: &str) -> Option<Primitive> {
        self.0.field(name)
    }

    pub fn call(
        &self,
        behavior: &str,
        args: &[Primitive],
    ) -> std::result::Result<Primitive, HostError> {
        self.0.call(behavior, args)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Borrow the underlying host object as its concrete type.
    pub fn downcast_ref<T: Host + 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl Clone for HostObj {
    fn clone(&self) -> Self {
        HostObj(self.0.clone_boxed())
    }
}

// Hosts are opaque to the engine, so equality is structural only as far as
// the host's own debug rendering goes.
impl PartialEq for HostObj {
    fn eq(&self, other: &Self) -> bool {
        self.type_name() == other.type_name()
            && format!("{:?}", self.0) == format!("{:?}", other.0)
    }
}

impl fmt::Display for HostObj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{:?}]", self.type_name(), self.0)
    }
}

/// The absent host object: no fields, no behaviors, zero for truthiness.
/// `Kind::Dynamic`'s zero value and the engine form of `Primitive::Nil`.
#[derive(Debug, Clone)]
pub struct NullHost;

impl Host for NullHost {
    fn type_name(&self) -> &'static str {
        "Null"
    }

    fn is_zero(&self) -> bool {
        true
    }

    fn clone_boxed(&self) -> Box<dyn Host> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The value kind wrapping a host object.
#[derive(Debug, Clone)]
pub struct Dynamic(HostObj);

impl Dynamic {
    pub fn new(host: impl Host + 'static) -> Self {
        Dynamic(HostObj::new(host))
    }

    pub fn from_obj(obj: HostObj) -> Self {
        Dynamic(obj)
    }

    pub fn null() -> Self {
        Dynamic(HostObj::new(NullHost))
    }

    pub fn obj(&self) -> &HostObj {
        &self.0
    }
}

impl fmt::Display for Dynamic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Expr for Dynamic {
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

impl Value for Dynamic {
    fn unpack(&self) -> Primitive {
        if self.0.is_zero() && self.0.type_name() == "Null" {
            Primitive::Nil
        } else {
            Primitive::Host(self.0.clone())
        }
    }

    fn clone_value(&self) -> BoxValue {
        Box::new(self.clone())
    }

    fn kind(&self) -> Kind {
        Kind::Dynamic
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_attr_get(&self) -> Option<&dyn AttrGet> {
        Some(self)
    }
}

impl AttrGet for Dynamic {
    fn get_attr(&self, name: &str) -> Result<BoxValue> {
        if let Some(p) = self.0.field(name) {
            return Ok(value_of(p));
        }
        match self.0.call(name, &[]) {
            Ok(p) => Ok(value_of(p)),
            Err(HostError::UnknownBehavior { .. }) => Err(Error::NoSuchAttribute {
                value: self.to_string(),
                name: name.to_string(),
            }),
            Err(HostError::InvalidArity {
                type_name,
                behavior,
                expected,
                actual,
            }) => Err(Error::MalformedArity {
                type_name,
                behavior,
                detail: format!("takes {expected} arguments, got {actual}"),
            }),
            Err(err @ HostError::Failed(_)) => Err(Error::wrap(
                format!("reading attribute {name:?} of {self}"),
                err,
            )),
        }
    }
}

box_expr_from!(Dynamic);
box_value_from!(Dynamic);
