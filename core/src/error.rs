use ruleql::{Arity, Operator, RuleError, TypeTag};
use thiserror::Error;

use crate::value::ValueType;

/// Taxonomy category of a [`BuildError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnknownField,
    InvalidValue,
    UnsupportedOperator,
    Arity,
    InvalidGroup,
    MalformedRule,
    TypeMismatch,
}

/// Why a rule tree could not be compiled. Any error fails the whole tree.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum BuildError {
    #[error("Unknown field '{path}': {reason}")]
    UnknownField { path: String, reason: String },
    #[error("Invalid value '{value}' for {type_tag} condition on '{field}'")]
    InvalidValue { field: String, value: String, type_tag: TypeTag },
    #[error("Unsupported operator '{operator}': {reason}")]
    UnsupportedOperator { operator: String, reason: String },
    #[error("Operator '{operator}' on '{field}' expects {expected}, got {found}")]
    Arity { field: String, operator: Operator, expected: Arity, found: usize },
    #[error("Invalid group: {0}")]
    InvalidGroup(String),
    #[error("Malformed rule: {0}")]
    MalformedRule(String),
    #[error("A {type_tag} condition cannot be applied to '{field}' of type {actual}")]
    TypeMismatch { field: String, type_tag: TypeTag, actual: ValueType },
}

impl BuildError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BuildError::UnknownField { .. } => ErrorKind::UnknownField,
            BuildError::InvalidValue { .. } => ErrorKind::InvalidValue,
            BuildError::UnsupportedOperator { .. } => ErrorKind::UnsupportedOperator,
            BuildError::Arity { .. } => ErrorKind::Arity,
            BuildError::InvalidGroup(_) => ErrorKind::InvalidGroup,
            BuildError::MalformedRule(_) => ErrorKind::MalformedRule,
            BuildError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
        }
    }
}

impl From<RuleError> for BuildError {
    fn from(err: RuleError) -> Self {
        match err {
            RuleError::UnsupportedOperator(operator) => {
                BuildError::UnsupportedOperator { operator, reason: "not a recognized operator".to_string() }
            }
            RuleError::UnknownType(type_tag) => BuildError::MalformedRule(format!("unknown type '{}'", type_tag)),
            RuleError::InvalidGroup(message) => BuildError::InvalidGroup(message),
            RuleError::MalformedRule(message) => BuildError::MalformedRule(message),
            RuleError::InvalidPath { path, message } => BuildError::UnknownField { path, reason: message },
        }
    }
}
