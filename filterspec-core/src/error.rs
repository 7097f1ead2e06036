//! Error types for specification building and filter query creation.
//!
//! Every error carries an [`ErrorCode`] for programmatic handling.
//!
//! # Error Codes
//!
//! Error codes follow a pattern: F{category}{number}
//! - 1xxx: Configuration errors (duplicate handlers, unknown fields)
//! - 2xxx: Mapping errors (unhandled filter fields)
//! - 3xxx: Type errors (incompatible filter and model fields)
//! - 4xxx: Fragment creation errors (per-field failures, handler and backend errors)
//! - 5xxx: Validation errors
//! - 7xxx: Options loading errors
//!
//! ```rust
//! use filterspec_core::{ErrorCode, SpecError};
//!
//! let err = SpecError::configuration("UserFilter", "field 'name' is already handled");
//! assert_eq!(err.code(), ErrorCode::InvalidConfiguration);
//! assert_eq!(err.code().code(), "F1001");
//! ```

use std::fmt;
use thiserror::Error;

use crate::value::FieldType;

/// Result type for specification operations.
pub type SpecResult<T> = Result<T, SpecError>;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Configuration errors (1xxx)
    /// Invalid specification configuration (F1001).
    InvalidConfiguration = 1001,
    /// Handler marker not present in the pipeline (F1002).
    HandlerNotFound = 1002,
    /// Model field referenced by an explicit handler does not exist (F1003).
    UnknownModelField = 1003,

    // Mapping errors (2xxx)
    /// Filter fields are not mapped to model fields (F2001).
    UnhandledFields = 2001,

    // Type errors (3xxx)
    /// Filter value type is not assignable to the model field type (F3001).
    TypeMismatch = 3001,
    /// Filter instance is not of the type the specification expects (F3002).
    FilterTypeMismatch = 3002,

    // Fragment creation errors (4xxx)
    /// Fragment creation for a single field failed (F4001).
    FieldFailed = 4001,
    /// A filter handler failed (F4002).
    HandlerFailed = 4002,
    /// The backend refused to build a fragment (F4003).
    BackendFailed = 4003,

    // Validation errors (5xxx)
    /// One or more specifications failed validation (F5001).
    ValidationFailed = 5001,

    // Options errors (7xxx)
    /// Options file could not be read (F7001).
    OptionsIo = 7001,
    /// Options file could not be parsed (F7002).
    OptionsParse = 7002,
}

impl ErrorCode {
    /// Get the error code string (e.g., "F1001").
    pub fn code(&self) -> String {
        format!("F{}", *self as u16)
    }

    /// Get a short description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidConfiguration => "Invalid specification configuration",
            Self::HandlerNotFound => "Filter handler not found in pipeline",
            Self::UnknownModelField => "Unknown model field",
            Self::UnhandledFields => "Filter fields are not mapped",
            Self::TypeMismatch => "Incompatible filter and model field types",
            Self::FilterTypeMismatch => "Unexpected filter type",
            Self::FieldFailed => "Unable to create field fragment",
            Self::HandlerFailed => "Filter handler failed",
            Self::BackendFailed => "Backend failed to build fragment",
            Self::ValidationFailed => "Specification validation failed",
            Self::OptionsIo => "Unable to read options",
            Self::OptionsParse => "Unable to parse options",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors raised while configuring specifications or creating filter queries.
#[derive(Error, Debug)]
pub enum SpecError {
    /// A specification was configured inconsistently. Raised at construction time.
    #[error("invalid configuration for filter '{filter}': {message}")]
    Configuration {
        /// The filter type being configured.
        filter: String,
        /// What went wrong.
        message: String,
    },

    /// `add_before` / `add_after` referenced a handler that is not registered.
    #[error("unable to find filter handler '{0}' in pipeline")]
    HandlerNotFound(&'static str),

    /// An explicit handler referenced a model field that does not exist.
    #[error("model '{model}' has no field '{field}'")]
    UnknownModelField {
        /// The model type.
        model: String,
        /// The missing field name.
        field: String,
    },

    /// Filter fields are neither convention-mapped nor explicitly handled.
    #[error(
        "filter '{filter}' properties '{}' are not mapped to entity '{model}' fields",
        .fields.join(",")
    )]
    UnhandledFields {
        /// The filter type.
        filter: String,
        /// The model type.
        model: String,
        /// The offending filter field names.
        fields: Vec<String>,
    },

    /// A filter field's value type is not assignable to its model field type.
    #[error(
        "filter field '{filter_field}' of type '{filter_type}' does not match model field '{model_field}' of type '{model_type}'"
    )]
    TypeMismatch {
        /// The filter field name.
        filter_field: String,
        /// The resolved filter element type.
        filter_type: FieldType,
        /// The model field name.
        model_field: String,
        /// The model field type.
        model_type: FieldType,
    },

    /// A type-erased query was given a filter of the wrong type.
    #[error("specification '{specification}' expects filter '{expected}'")]
    FilterTypeMismatch {
        /// The specification name.
        specification: String,
        /// The expected filter type.
        expected: &'static str,
    },

    /// Building one field's fragment failed; wraps the underlying cause.
    #[error(
        "unable to create filter {specification} for property: {field}, model field: {model_path} ({source})"
    )]
    Field {
        /// The specification name.
        specification: String,
        /// The filter field name.
        field: String,
        /// The model field path, or `(explicit)` for explicit handlers.
        model_path: String,
        /// The original error.
        #[source]
        source: Box<SpecError>,
    },

    /// A filter handler or explicit field handler failed.
    #[error("handler '{handler}' failed: {message}")]
    Handler {
        /// The handler name.
        handler: String,
        /// What went wrong.
        message: String,
    },

    /// The backend could not express a fragment.
    #[error("{backend} backend error: {message}")]
    Backend {
        /// The backend name.
        backend: &'static str,
        /// What went wrong.
        message: String,
    },

    /// Aggregate of every specification that failed validation.
    #[error("{} specification(s) failed validation: {}", .0.len(), join_errors(.0))]
    Validation(Vec<SpecError>),

    /// Options file could not be read.
    #[error("unable to read options file '{path}': {source}")]
    Io {
        /// The file path.
        path: String,
        /// The IO error.
        #[source]
        source: std::io::Error,
    },

    /// Options file could not be parsed.
    #[error("unable to parse options: {0}")]
    Toml(#[from] toml::de::Error),
}

fn join_errors(errors: &[SpecError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl SpecError {
    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Configuration { .. } => ErrorCode::InvalidConfiguration,
            Self::HandlerNotFound(_) => ErrorCode::HandlerNotFound,
            Self::UnknownModelField { .. } => ErrorCode::UnknownModelField,
            Self::UnhandledFields { .. } => ErrorCode::UnhandledFields,
            Self::TypeMismatch { .. } => ErrorCode::TypeMismatch,
            Self::FilterTypeMismatch { .. } => ErrorCode::FilterTypeMismatch,
            Self::Field { .. } => ErrorCode::FieldFailed,
            Self::Handler { .. } => ErrorCode::HandlerFailed,
            Self::Backend { .. } => ErrorCode::BackendFailed,
            Self::Validation(_) => ErrorCode::ValidationFailed,
            Self::Io { .. } => ErrorCode::OptionsIo,
            Self::Toml(_) => ErrorCode::OptionsParse,
        }
    }

    // ============== Constructor Functions ==============

    /// Create a configuration error.
    pub fn configuration(filter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            filter: filter.into(),
            message: message.into(),
        }
    }

    /// Create an unknown model field error.
    pub fn unknown_model_field(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownModelField {
            model: model.into(),
            field: field.into(),
        }
    }

    /// Create a handler error.
    pub fn handler(handler: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Handler {
            handler: handler.into(),
            message: message.into(),
        }
    }

    /// Create a backend error.
    pub fn backend(backend: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            backend,
            message: message.into(),
        }
    }

    /// Wrap an error raised while building one field's fragment.
    ///
    /// Errors that are already wrapped are returned unchanged so nested
    /// explicit handlers do not stack annotations.
    pub fn in_field(
        self,
        specification: impl Into<String>,
        field: impl Into<String>,
        model_path: impl Into<String>,
    ) -> Self {
        if matches!(self, Self::Field { .. }) {
            return self;
        }
        Self::Field {
            specification: specification.into(),
            field: field.into(),
            model_path: model_path.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, following per-field wrappers.
    pub fn root_cause(&self) -> &SpecError {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Check if this is a configuration-time error.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::HandlerNotFound(_) | Self::UnknownModelField { .. }
        )
    }

    /// Check if this error reports unmapped filter fields.
    pub fn is_unhandled_fields(&self) -> bool {
        matches!(self.root_cause(), Self::UnhandledFields { .. })
    }

    /// Check if this error reports an incompatible field type.
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self.root_cause(), Self::TypeMismatch { .. })
    }
}
