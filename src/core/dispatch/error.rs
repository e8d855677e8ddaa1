//! Dispatch error types.
//!
//! Every failure raised below the dispatcher is one of these variants. The
//! dispatcher turns them into failure envelopes, so none of them can reach the
//! transport as a crash.

use std::fmt;

use thiserror::Error;

use super::registry::OperationKind;

/// Errors that can occur while registering or invoking an operation.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No operation with this name is registered for the kind.
    #[error("Unknown {kind}: {name}")]
    UnknownOperation { kind: OperationKind, name: String },

    /// An operation with this name is already registered for the kind.
    #[error("Duplicate {kind} name: {name}")]
    DuplicateName { kind: OperationKind, name: String },

    /// A schema descriptor broke one of its construction rules.
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// One or more arguments failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The handler rejected its input at runtime (e.g. division by zero).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// A credential needed for an external call is not configured.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// The remote provider failed or returned unusable data.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// An internal invariant was violated.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DispatchError {
    /// Create a new "unknown operation" error.
    pub fn unknown(kind: OperationKind, name: impl Into<String>) -> Self {
        Self::UnknownOperation {
            kind,
            name: name.into(),
        }
    }

    /// Create a new "duplicate name" error.
    pub fn duplicate(kind: OperationKind, name: impl Into<String>) -> Self {
        Self::DuplicateName {
            kind,
            name: name.into(),
        }
    }

    /// Create a new "invalid schema" error.
    pub fn invalid_schema(msg: impl Into<String>) -> Self {
        Self::InvalidSchema(msg.into())
    }

    /// Create a new "invalid operation" error.
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    /// Create a new "missing credential" error.
    pub fn missing_credential(msg: impl Into<String>) -> Self {
        Self::MissingCredential(msg.into())
    }

    /// Create a new "upstream" error.
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short machine-readable tag for logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::DuplicateName { .. } => "duplicate_name",
            Self::InvalidSchema(_) => "invalid_schema",
            Self::Validation(_) => "validation",
            Self::InvalidOperation(_) => "invalid_operation",
            Self::MissingCredential(_) => "missing_credential",
            Self::Upstream(_) => "upstream",
            Self::Internal(_) => "internal",
        }
    }
}

/// Aggregated argument validation failure.
///
/// Holds every problem found in one pass so a client can fix all of them in a
/// single round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<FieldIssue>) -> Self {
        Self { issues }
    }

    /// All field problems, in schema declaration order.
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Names of the offending fields.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid arguments: ")?;
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// A single offending field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: FieldProblem,
}

/// What is wrong with a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldProblem {
    /// A required field was not supplied.
    Missing,

    /// The value has the wrong JSON type.
    WrongKind { expected: &'static str },

    /// The value is not a member of the enumerated set.
    NotAllowed { allowed: Vec<String> },
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            FieldProblem::Missing => write!(f, "'{}' is required", self.field),
            FieldProblem::WrongKind { expected } => {
                write!(f, "'{}' must be a {}", self.field, expected)
            }
            FieldProblem::NotAllowed { allowed } => write!(
                f,
                "'{}' must be one of [{}]",
                self.field,
                allowed.join(", ")
            ),
        }
    }
}
