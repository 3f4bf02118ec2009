use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors raised while driving the browser, probing links or writing the report
#[derive(Debug, Error)]
pub enum AuditError {
    /// The browser could not be launched
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Attaching to a running browser failed
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// The page could not be loaded
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// A required element never showed up within the wait bound
    #[error("Element '{selector}' did not appear within {timeout_ms}ms")]
    ElementTimeout { selector: String, timeout_ms: u128 },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Reading from or clicking an element failed (stale node, detached frame, ...)
    #[error("Element interaction failed: {0}")]
    ElementInteraction(String),

    #[error("Script evaluation failed: {0}")]
    EvaluationFailed(String),

    /// HTTP request-level failure (timeout, DNS, refused connection)
    #[error("{0}")]
    Request(String),

    /// A currency label carried no parenthetical code
    #[error("No currency code in label '{0}'")]
    CurrencyLabel(String),

    /// Baseline and post-activation price captures do not line up
    #[error("Price snapshot length mismatch: {baseline} before, {post} after")]
    SnapshotMismatch { baseline: usize, post: usize },

    #[error("Failed to read report {path}: {reason}")]
    ReportRead { path: PathBuf, reason: String },

    #[error("Failed to write report {path}: {reason}")]
    ReportWrite { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
