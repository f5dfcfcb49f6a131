use thiserror::Error;

use crate::value::Kind;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the engine can raise. Errors are ordinary values returned
/// to the immediate caller; nothing in the crate panics on bad operands.
#[derive(Error, Debug)]
pub enum Error {
    /// An operand or assignment is incompatible with the required capability
    /// or variable kind.
    #[error("cannot {op} {value} to {target}")]
    TypeMismatch {
        op: &'static str,
        value: String,
        target: String,
    },

    /// Neither operand could order itself against the other, directly or by
    /// the symmetric fallback. Both underlying failures are retained when
    /// they exist: `primary` from the left-to-right attempt, `secondary`
    /// from the swapped attempt.
    #[error("cannot compare {left} to {right}")]
    NotComparable {
        left: String,
        right: String,
        #[source]
        primary: Option<Box<Error>>,
        secondary: Option<Box<Error>>,
    },

    /// Zero denominator in exact division.
    #[error("division by zero")]
    DivisionByZero,

    /// No field or behavior with the requested name.
    #[error("{value} has no attribute {name:?}")]
    NoSuchAttribute { value: String, name: String },

    /// A variable was read before any value was assigned to it.
    #[error("{kind} variable read before assignment")]
    NilReference { kind: Kind },

    /// A host behavior was invoked through the bridge with an argument or
    /// result shape the bridge cannot interpret.
    #[error("behavior {behavior:?} of {type_name} has a malformed shape: {detail}")]
    MalformedArity {
        type_name: String,
        behavior: String,
        detail: String,
    },

    /// A failure annotated with extra context, e.g. the operand position
    /// inside a composite evaluation.
    #[error("{context}")]
    Wrapped {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Attach context to an underlying failure.
    pub fn wrap(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Error::Wrapped {
            context: context.into(),
            source: Box::new(source),
        }
    }

    pub fn not_comparable(left: impl ToString, right: impl ToString) -> Self {
        Error::NotComparable {
            left: left.to_string(),
            right: right.to_string(),
            primary: None,
            secondary: None,
        }
    }

    pub fn type_mismatch(op: &'static str, value: impl ToString, target: impl ToString) -> Self {
        Error::TypeMismatch {
            op,
            value: value.to_string(),
            target: target.to_string(),
        }
    }
}
