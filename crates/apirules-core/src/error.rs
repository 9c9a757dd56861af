//! Unified Error Model
//!
//! Expected validation failures are reported through
//! [`ValidationResults`](crate::results::ValidationResults); these variants
//! cover misuse and configuration problems only.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RulesError {
    #[error("CONFIG/{0}")]
    ConfigError(String),

    #[error("CONFIG/PARSE: {0}")]
    ParseError(String),

    #[error("PARAM/UNKNOWN: no parameter named '{0}' is registered")]
    UnknownParameter(String),

    #[error("PARAM/DUPLICATE: parameter '{0}' is already registered")]
    DuplicateParameter(String),
}

pub type Result<T> = std::result::Result<T, RulesError>;
