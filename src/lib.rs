//! An embeddable typed-expression engine.
//!
//! Expressions are trees of boxed [`Expr`] nodes: constant values,
//! mutable [`Var`] bindings, and operator nodes for arithmetic,
//! comparison, boolean logic, attribute access, and sequences. Numeric
//! work funnels through an exact arbitrary-precision rational core, so
//! mixed-kind arithmetic and ordering never lose precision; results are
//! demoted back to the narrowest lossless built-in kind. Host types join
//! in by implementing the [`Host`] bridge.
//!
//! ```
//! use ratexpr::{Arith, Compare, Kind};
//! use ratexpr::expr::Expr;
//!
//! // (x + 1) > 3, with x bound to 5.
//! let x = Kind::Int64.new_var();
//! x.set(5i64.into()).unwrap();
//! let cmp = Compare::gt(Arith::add(x.clone(), 1i64), 3i64);
//! assert!(cmp.eval_bool().unwrap());
//! ```

pub mod arith;
pub mod attr;
pub mod cmp;
pub mod dynamic;
pub mod error;
pub mod expr;
pub mod logic;
pub mod number;
pub mod rewrite;
pub mod scalar;
pub mod set;
pub mod value;

pub use arith::{Arith, ArithOp, Arithmetic};
pub use attr::{get_attr_value, set_attr_value, Attr, AttrGet, AttrSet};
pub use cmp::{compare, CmpOp, Compare, Ordered};
pub use dynamic::{Dynamic, Host, HostError, HostObj};
pub use error::{Error, Result};
pub use expr::{BoxExpr, Expr};
pub use logic::{All, Any, Not};
pub use number::{Number, Rational};
pub use rewrite::{simplify, Pipeline, Transform};
pub use scalar::{Bool, Float32, Float64, Int, Int64, Str, Uint64};
pub use set::{Set, ValueSet};
pub use value::{truthy, truthy_expr, value_of, BoxValue, Kind, Primitive, Value, Var};
