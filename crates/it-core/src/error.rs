//! Core error types for issuetrack
//!
//! Every library crate reports failures through [`ItError`]; the binary wraps
//! it with `anyhow` context at the edges.

use std::collections::HashMap;
use thiserror::Error;

/// Core error type for all issuetrack operations
#[derive(Error, Debug)]
pub enum ItError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Request to {path} failed with HTTP {status}: {message}")]
    Http {
        status: u16,
        path: String,
        message: String,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Validation errors collection, keyed by field
#[derive(Debug, Default, Clone)]
pub struct ValidationErrors {
    /// Field-specific errors: field_name -> Vec<error_messages>
    pub errors: HashMap<String, Vec<String>>,
    /// Base errors not tied to a specific field
    pub base_errors: Vec<String>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn add_base(&mut self, message: impl Into<String>) {
        self.base_errors.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.base_errors.is_empty()
    }

    /// Check if there are errors for a specific field
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Get errors for a specific field
    pub fn get(&self, field: &str) -> Option<&Vec<String>> {
        self.errors.get(field)
    }

    pub fn full_messages(&self) -> Vec<String> {
        let mut messages = self.base_errors.clone();
        let mut fields: Vec<_> = self.errors.iter().collect();
        fields.sort_by(|a, b| a.0.cmp(b.0));
        for (field, field_messages) in fields {
            for msg in field_messages {
                messages.push(format!("{} {}", field, msg));
            }
        }
        messages
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut errors = ValidationErrors::new();
        collect_validator_errors(&mut errors, None, &err);
        errors
    }
}

/// Flatten nested validator errors into dotted field names ("api.base_url")
fn collect_validator_errors(
    into: &mut ValidationErrors,
    prefix: Option<&str>,
    err: &validator::ValidationErrors,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in err.errors() {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, field),
            None => field.to_string(),
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for e in field_errors {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("is invalid ({})", e.code));
                    into.add(name.clone(), message);
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                collect_validator_errors(into, Some(&name), nested);
            }
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    let item = format!("{}[{}]", name, index);
                    collect_validator_errors(into, Some(&item), nested);
                }
            }
        }
    }
}

impl ItError {
    /// Stable code for structured logs
    pub fn error_code(&self) -> &'static str {
        match self {
            ItError::NotFound { .. } => "not_found",
            ItError::Unauthorized { .. } => "unauthorized",
            ItError::Forbidden { .. } => "forbidden",
            ItError::Validation(_) => "validation_failed",
            ItError::Http { .. } => "http_error",
            ItError::Transport(_) => "transport_error",
            ItError::Decode(_) => "decode_error",
            ItError::Config(_) => "configuration_error",
            ItError::Session(_) => "session_error",
            ItError::Internal(_) => "internal_error",
        }
    }

    /// Build an error from a non-success HTTP response
    pub fn from_status(status: u16, path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        let message = message.into();
        match status {
            401 => ItError::Unauthorized { message },
            403 => ItError::Forbidden { message },
            404 => ItError::NotFound {
                entity: "resource",
                field: "path",
                value: path,
            },
            _ => ItError::Http {
                status,
                path,
                message,
            },
        }
    }
}
