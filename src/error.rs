//! Error types produced by task execution.
//!
//! [`TaskError`] is the single failure taxonomy of the harness:
//!
//! - [`TaskError::Timeout`] — the deadline fired before the task completed.
//! - [`TaskError::Panicked`] — the task terminated abnormally (panicked) and
//!   the panic was converted to a value at the isolation boundary.
//! - [`TaskError::Fail`] — the task completed but reported a domain failure.
//! - [`TaskError::Canceled`] — the task acknowledged cooperative cancellation.
//!
//! All variants are terminal, typed outcomes delivered through `Result` —
//! never raised as uncaught faults. Helper methods (`as_label`, `as_message`)
//! produce stable strings for logs and metrics.

use std::any::Any;
use std::time::Duration;

use thiserror::Error;

/// # Failures of a single task execution.
///
/// Every harness operation returns exactly one outcome per call; these are
/// the failing ones.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// The deadline fired before the task completed; the task was abandoned.
    #[error("deadline {deadline:?} exceeded before completion")]
    Timeout {
        /// The deadline that was exceeded.
        deadline: Duration,
    },

    /// The task terminated abnormally (panic caught at its isolation boundary).
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },

    /// The task completed but reported a domain failure.
    #[error("task failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The task observed cancellation and exited early.
    #[error("task canceled")]
    Canceled,
}

impl TaskError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use taskrace::TaskError;
    ///
    /// let err = TaskError::Timeout { deadline: Duration::from_secs(9) };
    /// assert_eq!(err.as_label(), "task_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Timeout { .. } => "task_timeout",
            TaskError::Panicked { .. } => "task_panicked",
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
        }
    }

    /// Returns a human-readable message with details about the failure.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Timeout { deadline } => format!("timeout: {deadline:?}"),
            TaskError::Panicked { message } => format!("panic: {message}"),
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "canceled".to_string(),
        }
    }

    /// Converts a caught panic payload into [`TaskError::Panicked`].
    ///
    /// Extracts the conventional `&str` / `String` panic payloads; anything
    /// else is rendered as an opaque message.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        TaskError::Panicked {
            message: panic_message(payload),
        }
    }
}

/// Renders a caught panic payload as text (`&str` / `String` payloads pass
/// through, anything else becomes an opaque message).
pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked with non-string payload".to_string()
    }
}
