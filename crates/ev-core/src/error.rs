//! Core error type.
//!
//! `ev-spatial` and `ev-output` define their own error enums and wrap
//! `CoreError` as one variant.

use thiserror::Error;

/// Errors produced by `ev-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `ev-core`.
pub type CoreResult<T> = Result<T, CoreError>;
