//! Typed errors for the resolver engine
//!
//! Errors fall into two groups that never mix:
//!
//! - Construction-time errors ([`DuplicateResolverError`], [`ConfigError`]) are
//!   returned by the call that builds the registry or loads the configuration.
//! - Field-level errors ([`FieldError`]) are produced while executing an
//!   operation. They never escape `execute`; they are recorded on the response
//!   with the path of the field that caused them.
//!
//! # Example
//!
//! ```rust,ignore
//! use resolvent::prelude::*;
//!
//! match Registry::merge(vec![users, admin]) {
//!     Ok(registry) => println!("{} resolvers", registry.len()),
//!     Err(DuplicateResolverError { type_name, field_name }) => {
//!         eprintln!("{}.{} is defined twice", type_name, field_name);
//!     }
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

// =============================================================================
// Registry Errors
// =============================================================================

/// The same `(type, field)` coordinate was given two different resolvers
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Duplicate resolver for {type_name}.{field_name}")]
pub struct DuplicateResolverError {
    pub type_name: String,
    pub field_name: String,
}

impl DuplicateResolverError {
    pub fn new(type_name: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            field_name: field_name.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        "DUPLICATE_RESOLVER"
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors raised while loading an [`ExecutorConfig`](crate::config::ExecutorConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration could not be parsed
    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    /// A key holds a value outside of its allowed range
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ConfigError::ParseError { .. } => "CONFIG_PARSE_ERROR",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Errors local to one executed field
///
/// Each of these nulls the slot of the field it is attached to. When that
/// slot is non-null the null bubbles to the nearest nullable ancestor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    /// The resolver failed, or its pending value was rejected
    #[error("{message}")]
    ResolverFailure { message: String },

    /// A non-null position resolved to null or undefined
    #[error("Cannot return null for non-nullable field {type_name}.{field_name}.")]
    NonNullViolation {
        type_name: String,
        field_name: String,
    },

    /// The resolved value's shape contradicts the declared list/non-list type
    #[error("Expected {expected} for field {type_name}.{field_name}, found {found}.")]
    TypeMismatch {
        type_name: String,
        field_name: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl FieldError {
    /// Build a resolver failure from any error, keeping the full cause chain
    pub fn resolver_failure(err: &anyhow::Error) -> Self {
        FieldError::ResolverFailure {
            message: format!("{:#}", err),
        }
    }

    pub fn error_code(&self) -> ErrorCode {
        match self {
            FieldError::ResolverFailure { .. } => ErrorCode::ResolverFailure,
            FieldError::NonNullViolation { .. } => ErrorCode::NonNullViolation,
            FieldError::TypeMismatch { .. } => ErrorCode::TypeMismatch,
        }
    }
}

/// Machine-readable code attached to every response error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ResolverFailure,
    NonNullViolation,
    TypeMismatch,
    ContextFailure,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ResolverFailure => "RESOLVER_FAILURE",
            ErrorCode::NonNullViolation => "NON_NULL_VIOLATION",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::ContextFailure => "CONTEXT_FAILURE",
        }
    }
}
