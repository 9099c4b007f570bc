//! errors.rs - Custom error types for the docredact-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use thiserror::Error;

/// Result alias used by the engine and the rule compiler.
pub type Result<T> = std::result::Result<T, RedactError>;

/// This enum represents all possible error types in the `docredact-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RedactError {
    #[error("Failed to compile path pattern '{0}': {1}")]
    RuleCompilationError(String, regex::Error),

    #[error("Path pattern '{0}': length ({1}) exceeds maximum allowed ({2})")]
    PatternLengthExceeded(String, usize, usize),

    #[error("Failed to compile {0} rule(s):\n{1}")]
    CompilationFailed(usize, String),

    /// Traversal went deeper than the context's nesting limit.
    #[error("Document nesting exceeds the limit of {limit} levels at path '{path}'")]
    DepthExceeded { path: String, limit: usize },

    #[error("Rule configuration is invalid:\n{0}")]
    ConfigValidation(String),
}
