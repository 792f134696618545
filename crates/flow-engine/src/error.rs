//! Error types for the flow engine

use thiserror::Error;

/// Result type alias using RuleError
pub type Result<T> = std::result::Result<T, RuleError>;

/// Validation failures raised when registering user compatibility rules
///
/// Both variants are synchronous, user-facing rejections; nothing here is
/// retried. The evaluator itself never fails: an unknown pair evaluates to
/// the `error` level as a value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleError {
    /// User rule collides with a protected default pair
    #[error("cannot overwrite protected default rule: {from} -> {to}")]
    Conflict { from: String, to: String },

    /// User rule result is 'ok', rejected under current policy
    #[error("unsafe coercion \"{rule}\" cannot be marked 'ok'; use 'warn' or 'error'")]
    UnsafeOk { rule: String },
}
