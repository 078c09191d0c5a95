use thiserror::Error;

/// Errors raised while normalizing a wire rule tree or parsing a field path
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RuleError {
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("Invalid group: {0}")]
    InvalidGroup(String),
    #[error("Malformed rule: {0}")]
    MalformedRule(String),
    #[error("Invalid field path '{path}': {message}")]
    InvalidPath { path: String, message: String },
}
