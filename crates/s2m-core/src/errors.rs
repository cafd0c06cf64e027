//! Structured error types shared across the S2M statistics crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`S2mError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (file names, counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for report processing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum S2mError {
    /// Configuration loading and argument errors.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Filesystem errors (listing, reading, creating files).
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Filenames that cannot be mapped to a parameter family.
    #[error("classification error: {0}")]
    Classification(ErrorInfo),
    /// Passage-count measurement or uniformity failures.
    #[error("consistency error: {0}")]
    Consistency(ErrorInfo),
    /// Replicate set construction errors.
    #[error("grouping error: {0}")]
    Grouping(ErrorInfo),
    /// Malformed numeric cells or rows in report bodies.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Statistics artifact emission errors.
    #[error("emit error: {0}")]
    Emit(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl S2mError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            S2mError::Config(info)
            | S2mError::Io(info)
            | S2mError::Classification(info)
            | S2mError::Consistency(info)
            | S2mError::Grouping(info)
            | S2mError::Parse(info)
            | S2mError::Emit(info) => info,
        }
    }

    /// Wraps a [`std::io::Error`] raised while touching `path`.
    pub fn io(code: &str, path: impl Display, err: impl Display) -> Self {
        S2mError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.to_string()),
        )
    }
}
