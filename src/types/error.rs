//! Unified Error Type System
//!
//! Centralized error types for the CLI shell and the sample/config loaders.
//!
//! Analyzers themselves never fail on data quality: unparseable colors are
//! dropped, empty inputs yield defaults. Errors only arise at the edges
//! (reading sample files, loading configuration, parsing selectors).

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Coarse error categories, mapped to process exit codes by the binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input could not be decoded
    Input,
    /// Configuration is invalid
    Config,
    /// A file could not be read or written
    Io,
    /// Internal failure (task join, selector engine)
    Internal,
}

impl ErrorCategory {
    /// sysexits(3) style exit status
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Input => 65,
            Self::Config => 78,
            Self::Io => 74,
            Self::Internal => 70,
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Input => write!(f, "INPUT"),
            Self::Config => write!(f, "CONFIG"),
            Self::Io => write!(f, "IO"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum TokenError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid samples in {path}: {message}")]
    InvalidSamples { path: String, message: String },

    #[error("Invalid selector '{selector}': {reason}")]
    Selector { selector: String, reason: String },

    #[error("Extraction task failed: {0}")]
    Join(String),

    #[error("{context}: {message}")]
    Context { context: String, message: String },
}

pub type Result<T> = std::result::Result<T, TokenError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl TokenError {
    /// Create a selector parse error
    pub fn selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Selector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Create a sample validation error
    pub fn invalid_samples(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSamples {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Category used for the process exit code
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Json(_) | Self::Yaml(_) | Self::InvalidSamples { .. } => ErrorCategory::Input,
            Self::Config(_) => ErrorCategory::Config,
            Self::Io(_) | Self::Context { .. } => ErrorCategory::Io,
            Self::Selector { .. } | Self::Join(_) => ErrorCategory::Internal,
        }
    }
}

impl From<tokio::task::JoinError> for TokenError {
    fn from(err: tokio::task::JoinError) -> Self {
        TokenError::Join(err.to_string())
    }
}

/// Context extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn with_context<C: Into<String>>(self, context: C) -> Result<T>;

    /// Add context using a closure (lazy evaluation)
    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: std::error::Error + Send + Sync + 'static> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<C: Into<String>>(self, context: C) -> Result<T> {
        self.map_err(|e| TokenError::Context {
            context: context.into(),
            message: e.to_string(),
        })
    }

    fn with_context_fn<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| TokenError::Context {
            context: f().into(),
            message: e.to_string(),
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
