//! The value model: the `Value` trait with its capability probes, the
//! closed set of built-in kinds, host-facing primitives, and the mutable
//! variable cell.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use num_rational::BigRational;
use num_traits::Zero;

use crate::arith::Arithmetic;
use crate::attr::{AttrGet, AttrSet};
use crate::cmp::Ordered;
use crate::dynamic::{Dynamic, HostObj};
use crate::expr::{box_expr_from, box_value_from, BoxExpr, Expr};
use crate::number::{Number, Rational};
use crate::rewrite::Pipeline;
use crate::scalar::{Bool, Float32, Float64, Int, Int64, Str, Uint64};
use crate::set::ValueSet;
use crate::{Error, Result};

/// A boxed engine value.
pub type BoxValue = Box<dyn Value>;

/// An expression that is already a value. Evaluating a value never
/// recurses; `eval_value` hands back a clone of the value itself.
///
/// The `as_*` methods are the capability probes: a kind opts into
/// arithmetic, ordering, numeric interchange, or attribute access by
/// overriding the matching probe to return `Some(self)`. Everything else
/// stays `None` and the relevant operators fail with a typed error.
pub trait Value: Expr {
    /// Unpack the value into a host primitive.
    fn unpack(&self) -> Primitive;

    fn clone_value(&self) -> BoxValue;

    fn kind(&self) -> Kind;

    fn as_any(&self) -> &dyn std::any::Any;

    fn as_number(&self) -> Option<&dyn Number> {
        None
    }

    fn as_arithmetic(&self) -> Option<&dyn Arithmetic> {
        None
    }

    fn as_ordered(&self) -> Option<&dyn Ordered> {
        None
    }

    fn as_attr_get(&self) -> Option<&dyn AttrGet> {
        None
    }

    fn as_attr_set(&self) -> Option<&dyn AttrSet> {
        None
    }
}

/// The built-in value kinds. One `Kind` per kind of value; `zero` and
/// `new_var` are the factories the engine offers for each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Int,
    Int64,
    Uint64,
    Float32,
    Float64,
    Str,
    Rational,
    Seq,
    Dynamic,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Bool => "Bool",
            Kind::Int => "Int",
            Kind::Int64 => "Int64",
            Kind::Uint64 => "Uint64",
            Kind::Float32 => "Float32",
            Kind::Float64 => "Float64",
            Kind::Str => "Str",
            Kind::Rational => "Rational",
            Kind::Seq => "Seq",
            Kind::Dynamic => "Dynamic",
        }
    }

    /// A fresh zero value of this kind. Every call allocates independently;
    /// zero values never share backing storage.
    pub fn zero(self) -> BoxValue {
        match self {
            Kind::Bool => Box::new(Bool(false)),
            Kind::Int => Box::new(Int(0)),
            Kind::Int64 => Box::new(Int64(0)),
            Kind::Uint64 => Box::new(Uint64(0)),
            Kind::Float32 => Box::new(Float32(0.0)),
            Kind::Float64 => Box::new(Float64(0.0)),
            Kind::Str => Box::new(Str(String::new())),
            Kind::Rational => Box::new(Rational(BigRational::zero())),
            Kind::Seq => Box::new(ValueSet(Vec::new())),
            Kind::Dynamic => Box::new(Dynamic::null()),
        }
    }

    /// A fresh variable of this kind, initialized to the kind's zero.
    pub fn new_var(self) -> Var {
        Var::new(self)
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A host-facing primitive: what an expression evaluates to when the
/// caller asks for plain data instead of an engine value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Nil,
    Bool(bool),
    Int(i32),
    Int64(i64),
    Uint64(u64),
    Float32(f32),
    Float64(f64),
    Str(String),
    Rational(BigRational),
    Seq(Vec<Primitive>),
    Host(HostObj),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Nil => f.write_str("nil"),
            Primitive::Bool(b) => write!(f, "{b}"),
            Primitive::Int(i) => write!(f, "{i}"),
            Primitive::Int64(i) => write!(f, "{i}"),
            Primitive::Uint64(u) => write!(f, "{u}"),
            Primitive::Float32(x) => write!(f, "{x}"),
            Primitive::Float64(x) => write!(f, "{x}"),
            Primitive::Str(s) => write!(f, "{s:?}"),
            Primitive::Rational(r) => write!(f, "{r}"),
            Primitive::Seq(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Primitive::Host(obj) => write!(f, "{obj}"),
        }
    }
}

/// Truthiness coercion: the generic primitive-to-bool rule used by `Not`
/// and any future conditional.
pub fn truthy(p: &Primitive) -> bool {
    match p {
        Primitive::Nil => false,
        Primitive::Bool(b) => *b,
        Primitive::Int(i) => *i != 0,
        Primitive::Int64(i) => *i != 0,
        Primitive::Uint64(u) => *u != 0,
        Primitive::Float32(x) => *x != 0.0,
        Primitive::Float64(x) => *x != 0.0,
        Primitive::Str(s) => !s.is_empty(),
        Primitive::Rational(r) => !r.is_zero(),
        Primitive::Seq(items) => !items.is_empty(),
        Primitive::Host(obj) => !obj.is_zero(),
    }
}

/// Expression-level truthiness: an expression is truthy iff it is a
/// constant (a value, not a variable) whose unpacked primitive is truthy.
pub fn truthy_expr(e: &dyn Expr) -> bool {
    if e.as_var().is_some() {
        return false;
    }
    match e.as_value() {
        Some(v) => truthy(&v.unpack()),
        None => false,
    }
}

/// Wrap a host primitive in the matching built-in value kind.
pub fn value_of(p: Primitive) -> BoxValue {
    match p {
        Primitive::Nil => Box::new(Dynamic::null()),
        Primitive::Bool(b) => Box::new(Bool(b)),
        Primitive::Int(i) => Box::new(Int(i)),
        Primitive::Int64(i) => Box::new(Int64(i)),
        Primitive::Uint64(u) => Box::new(Uint64(u)),
        Primitive::Float32(x) => Box::new(Float32(x)),
        Primitive::Float64(x) => Box::new(Float64(x)),
        Primitive::Str(s) => Box::new(Str(s)),
        Primitive::Rational(r) => Box::new(Rational(r)),
        Primitive::Seq(items) => Box::new(ValueSet(items.into_iter().map(value_of).collect())),
        Primitive::Host(obj) => Box::new(Dynamic::from_obj(obj)),
    }
}

/// A mutable single-slot holder for a value of one kind.
///
/// Cloning a `Var` shares the slot: the clone and the original see the same
/// binding, which is what lets a variable appear at several places in a
/// tree (and in copies of the tree) while remaining a single binding.
/// The cell is deliberately `Rc`-based; sharing one variable across threads
/// is not supported.
pub struct Var {
    kind: Kind,
    slot: Rc<RefCell<Option<BoxValue>>>,
}

impl Var {
    /// A variable bound to the kind's zero value.
    pub fn new(kind: Kind) -> Self {
        Var {
            kind,
            slot: Rc::new(RefCell::new(Some(kind.zero()))),
        }
    }

    /// A variable with no binding yet; reading it fails with
    /// [`Error::NilReference`] until a value is assigned.
    pub fn unbound(kind: Kind) -> Self {
        Var {
            kind,
            slot: Rc::new(RefCell::new(None)),
        }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// A snapshot of the current value.
    pub fn get(&self) -> Result<BoxValue> {
        self.slot
            .borrow()
            .as_ref()
            .map(|v| v.clone_value())
            .ok_or(Error::NilReference { kind: self.kind })
    }

    /// Replace the binding. Exact-kind assignment is always accepted;
    /// Float32 widens into a Float64 variable and Int into an Int64
    /// variable (converted on store); Dynamic variables accept anything.
    /// Everything else is a `TypeMismatch`.
    pub fn set(&self, value: BoxValue) -> Result<()> {
        let stored = match (self.kind, value.kind()) {
            (expected, actual) if expected == actual => value,
            (Kind::Dynamic, _) => value,
            (Kind::Float64, Kind::Float32) => match value.unpack() {
                Primitive::Float32(x) => Box::new(Float64(f64::from(x))),
                _ => value,
            },
            (Kind::Int64, Kind::Int) => match value.unpack() {
                Primitive::Int(i) => Box::new(Int64(i64::from(i))),
                _ => value,
            },
            _ => {
                return Err(Error::type_mismatch(
                    "assign",
                    &*value,
                    format!("{} variable", self.kind),
                ))
            }
        };
        *self.slot.borrow_mut() = Some(stored);
        Ok(())
    }
}

impl Clone for Var {
    fn clone(&self) -> Self {
        Var {
            kind: self.kind,
            slot: Rc::clone(&self.slot),
        }
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("kind", &self.kind)
            .field("value", &*self.slot.borrow())
            .finish()
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.slot.borrow() {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "<unset {}>", self.kind),
        }
    }
}

impl Expr for Var {
    fn copy(&self, pipeline: &Pipeline) -> BoxExpr {
        pipeline.apply(Box::new(self.clone()))
    }

    fn eval_value(&self) -> Result<BoxValue> {
        self.get()
    }

    fn as_var(&self) -> Option<&Var> {
        Some(self)
    }
}

box_expr_from!(Var);

impl From<BoxValue> for BoxExpr {
    fn from(v: BoxValue) -> BoxExpr {
        v
    }
}

macro_rules! primitive_from {
    ($($native:ty => $wrapper:ident),* $(,)?) => {$(
        impl From<$native> for BoxValue {
            fn from(v: $native) -> BoxValue {
                Box::new($wrapper(v.into()))
            }
        }
        impl From<$native> for BoxExpr {
            fn from(v: $native) -> BoxExpr {
                Box::new($wrapper(v.into()))
            }
        }
    )*};
}

primitive_from! {
    bool => Bool,
    i32 => Int,
    i64 => Int64,
    u64 => Uint64,
    f32 => Float32,
    f64 => Float64,
    String => Str,
}

impl From<&str> for BoxValue {
    fn from(v: &str) -> BoxValue {
        Box::new(Str(v.to_owned()))
    }
}

impl From<&str> for BoxExpr {
    fn from(v: &str) -> BoxExpr {
        Box::new(Str(v.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmp::compare;

    #[test]
    fn truthiness_table() {
        assert!(!truthy(&Primitive::Nil));
        assert!(truthy(&Primitive::Bool(true)));
        assert!(!truthy(&Primitive::Bool(false)));
        assert!(!truthy(&Primitive::Int(0)));
        assert!(truthy(&Primitive::Int(-3)));
        assert!(!truthy(&Primitive::Float64(0.0)));
        assert!(truthy(&Primitive::Float64(0.5)));
        assert!(!truthy(&Primitive::Str(String::new())));
        assert!(truthy(&Primitive::Str("x".into())));
        assert!(!truthy(&Primitive::Seq(vec![])));
        assert!(truthy(&Primitive::Seq(vec![Primitive::Int(0)])));
    }

    #[test]
    fn var_is_not_truthy_even_when_bound_true() {
        let var = Kind::Bool.new_var();
        var.set(true.into()).unwrap();
        assert!(!truthy_expr(&var));
        assert!(truthy_expr(&Bool(true)));
    }

    #[test]
    fn var_accepts_exact_kind() {
        let var = Kind::Int.new_var();
        var.set(Int(7).into()).unwrap();
        assert_eq!(var.get().unwrap().unpack(), Primitive::Int(7));
    }

    #[test]
    fn var_widens_int_into_int64() {
        let var = Kind::Int64.new_var();
        var.set(Int(7).into()).unwrap();
        assert_eq!(var.get().unwrap().unpack(), Primitive::Int64(7));
    }

    #[test]
    fn var_widens_float32_into_float64() {
        let var = Kind::Float64.new_var();
        var.set(Float32(1.5).into()).unwrap();
        assert_eq!(var.get().unwrap().unpack(), Primitive::Float64(1.5));
    }

    #[test]
    fn var_rejects_incompatible_kind() {
        let var = Kind::Int.new_var();
        let err = var.set(Str("x".into()).into()).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
        // The rejected assignment leaves the old binding intact.
        assert_eq!(var.get().unwrap().unpack(), Primitive::Int(0));
    }

    #[test]
    fn narrowing_is_rejected() {
        let var = Kind::Int.new_var();
        let err = var.set(Int64(7).into()).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn unbound_var_read_is_nil_reference() {
        let var = Var::unbound(Kind::Int);
        let err = var.get().unwrap_err();
        assert!(matches!(err, Error::NilReference { kind: Kind::Int }));
    }

    #[test]
    fn dynamic_var_accepts_anything() {
        let var = Kind::Dynamic.new_var();
        var.set(Int(1).into()).unwrap();
        var.set(Str("s".into()).into()).unwrap();
        assert_eq!(var.get().unwrap().unpack(), Primitive::Str("s".into()));
    }

    #[test]
    fn zero_values_are_equal_but_independent() {
        for kind in [
            Kind::Bool,
            Kind::Int,
            Kind::Int64,
            Kind::Uint64,
            Kind::Float32,
            Kind::Float64,
            Kind::Str,
            Kind::Rational,
            Kind::Seq,
        ] {
            let a = kind.zero();
            let b = kind.zero();
            assert_eq!(a.unpack(), b.unpack(), "zero mismatch for {kind}");
            assert!(
                !std::ptr::eq(&*a as *const _ as *const u8, &*b as *const _ as *const u8),
                "{kind} zeros share storage"
            );
        }
        // Numeric zeros also compare equal through the engine.
        let a = Kind::Int.zero();
        let b = Kind::Int.zero();
        assert_eq!(
            compare(&*a, &*b).unwrap(),
            std::cmp::Ordering::Equal
        );
    }
}
