//! Error types for the Workforce Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while deriving and persisting
//! compensation, attendance, performance and leave records.

use thiserror::Error;

/// The main error type for the Workforce Engine.
///
/// All service operations return this error type, making it easy
/// to map failures consistently onto HTTP responses.
///
/// # Example
///
/// ```
/// use workforce_engine::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "month".to_string(),
///     message: "must be between 1 and 12".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid field 'month': must be between 1 and 12");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// An input field was missing or out of range.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The offending field.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The write would duplicate an existing record or violate a state rule.
    #[error("Conflict on {entity}: {message}")]
    Conflict {
        /// The kind of record involved (e.g. "attendance").
        entity: String,
        /// A description of the conflict.
        message: String,
    },

    /// No record exists with the given identifier.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: String,
        /// The identifier that was not found.
        id: String,
    },

    /// The acting user's role does not allow the operation.
    #[error("Forbidden: {action} requires the hr or admin role")]
    Forbidden {
        /// The operation that was attempted.
        action: String,
    },

    /// The employee directory could not be reached.
    #[error("Employee directory unavailable: {message}")]
    DirectoryUnavailable {
        /// A description of the failure.
        message: String,
    },

    /// The record store failed for a reason other than a constraint.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::Conflict`] error.
    pub fn conflict(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Conflict {
            entity: entity.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::Forbidden`] error.
    pub fn forbidden(action: impl Into<String>) -> Self {
        Self::Forbidden {
            action: action.into(),
        }
    }

    /// Shorthand for a [`EngineError::NotFound`] error.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
