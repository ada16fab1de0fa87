use crate::grid::Index;
use crate::solver::SolveStatus;
use thiserror::Error;

/// Broad category of a [`MimosaError`].
///
/// Configuration and assembly errors are raised before any solve is attempted and
/// are never recovered from. Solver errors carry the terminal status reported by the
/// solver; re-running with different options is left to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Assembly,
    Solver,
    Io,
}

/// Error type for building, solving and exporting a model.
#[derive(Error, Debug)]
pub enum MimosaError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Invalid value for option `{option}`: {details}")]
    InvalidOption { option: String, details: String },
    #[error("Unknown variant `{variant}` for component slot `{slot}`")]
    UnknownVariant { slot: String, variant: String },
    #[error("Component slot `{slot}` is filled by both `{first}` and `{second}`")]
    DuplicateSlot {
        slot: String,
        first: String,
        second: String,
    },
    #[error("`{name}` declared by `{component}` is already declared by `{existing}`")]
    NameCollision {
        name: String,
        component: String,
        existing: String,
    },
    #[error("Constraint `{name}` from `{component}` is already defined by `{existing}`")]
    DuplicateConstraint {
        name: String,
        component: String,
        existing: String,
    },
    #[error("Model has no objective. Exactly one component must provide it")]
    MissingObjective,
    #[error("Objective provided by both `{first}` and `{second}`")]
    MultipleObjectives { first: String, second: String },
    #[error("Unit error for `{context}`: {details}")]
    Unit { context: String, details: String },

    #[error("Component `{component}` references undeclared name `{name}`")]
    UndeclaredName { component: String, name: String },
    #[error("`{name}` requested by `{component}` as {expected}, but it is declared as {actual}")]
    ShapeMismatch {
        name: String,
        component: String,
        expected: String,
        actual: String,
    },
    #[error("Malformed constraint `{constraint}` from `{component}` at {index:?}: {details}")]
    MalformedConstraint {
        constraint: String,
        component: String,
        index: Index,
        details: String,
    },
    #[error("Variable `{variable}` follows a time recurrence but has no initial-period equality at {index:?}")]
    UnanchoredRecurrence { variable: String, index: Index },

    #[error("Solver `{solver}` terminated with status {status}: {message}")]
    Solver {
        solver: String,
        status: SolveStatus,
        message: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialisation error: {0}")]
    Serialisation(String),
}

impl MimosaError {
    /// The category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MimosaError::Configuration(_)
            | MimosaError::InvalidOption { .. }
            | MimosaError::UnknownVariant { .. }
            | MimosaError::DuplicateSlot { .. }
            | MimosaError::NameCollision { .. }
            | MimosaError::DuplicateConstraint { .. }
            | MimosaError::MissingObjective
            | MimosaError::MultipleObjectives { .. }
            | MimosaError::Unit { .. } => ErrorKind::Configuration,
            MimosaError::UndeclaredName { .. }
            | MimosaError::ShapeMismatch { .. }
            | MimosaError::MalformedConstraint { .. }
            | MimosaError::UnanchoredRecurrence { .. } => ErrorKind::Assembly,
            MimosaError::Solver { .. } => ErrorKind::Solver,
            MimosaError::Io(_) | MimosaError::Serialisation(_) => ErrorKind::Io,
        }
    }

    /// Shorthand for [`MimosaError::InvalidOption`].
    pub fn invalid_option(option: impl Into<String>, details: impl ToString) -> Self {
        MimosaError::InvalidOption {
            option: option.into(),
            details: details.to_string(),
        }
    }
}

/// Convenience type for `Result<T, MimosaError>`.
pub type MimosaResult<T> = Result<T, MimosaError>;
