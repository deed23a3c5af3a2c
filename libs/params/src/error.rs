//! # Parameter Error Types
//!
//! Errors raised while resolving parameters against override sources. The
//! constant table itself cannot fail; everything here comes from reading,
//! expanding or validating an override.

use std::path::PathBuf;

use thiserror::Error;

/// Parameter resolution errors
#[derive(Error, Debug)]
pub enum ParamError {
    /// Logical name is not one of the known parameters
    #[error("Unknown parameter: {0}")]
    UnknownParam(String),

    /// Lookup key is not in the parameter table
    #[error("Unknown parameter key: {0}")]
    UnknownKey(String),

    /// Override given as something other than `key=value`
    #[error("Invalid assignment '{0}': expected key=value")]
    InvalidAssignment(String),

    #[error("Parameter {key} resolved to an empty value")]
    EmptyValue { key: String },

    /// Topic or action name is not a valid graph name
    #[error("Parameter {key} has invalid value '{value}': {reason}")]
    InvalidName {
        key: String,
        value: String,
        reason: &'static str,
    },

    /// Parameter file holds a non-string value for a known key
    #[error("Parameter {key} in {location} must be a string, found {found}")]
    NotAString {
        key: String,
        location: String,
        found: String,
    },

    #[error("Environment variable {var} is not valid unicode")]
    NonUnicodeEnv { var: String },

    /// `$VAR` expansion failed
    #[error("Failed to expand parameter {key}: {reason}")]
    Expansion { key: String, reason: String },

    /// Override file could not be read or parsed
    #[error("Parameter file {path:?}: {reason}")]
    File { path: PathBuf, reason: String },

    /// Layered configuration build or lookup failure
    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    /// Requester and responder do not share the same action contract
    #[error("Action magic mismatch: expected '{expected}', got '{received}' (indicates: {diagnosis})")]
    MagicMismatch {
        expected: String,
        received: String,
        diagnosis: &'static str,
    },
}

/// Result type alias for parameter operations
pub type Result<T> = std::result::Result<T, ParamError>;
