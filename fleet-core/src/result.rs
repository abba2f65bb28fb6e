//! # Action results
//!
//! Every server operation in the fleet layer reports its outcome through
//! `ActionResult<T>`: a tagged success/failure envelope with a closed set
//! of error codes. Core goals:
//! - the most specific applicable code is always selected
//! - anticipated failures propagate unchanged up the call chain
//! - `INTERNAL` stays generic for the caller while the raw error is logged
//!   with enough context (operation, user, tenant) to diagnose

use serde::Serialize;
use serde_json::{json, Value};

/// Closed error taxonomy for action failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Validation,
    NotFound,
    Unauthorized,
    Forbidden,
    Conflict,
    Internal,
}

impl ErrorCode {
    /// Wire name, e.g. "UNAUTHORIZED".
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Validation => "VALIDATION",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// A failed action outcome: a code from the closed taxonomy, a message
/// safe to show to the caller, and optionally per-field detail for
/// validation failures.
#[derive(Debug, Clone)]
pub struct ActionError {
    pub code: ErrorCode,
    pub message: String,
    pub fields: Option<Value>,
}

impl ActionError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    // ---- Constructors, one per code ----

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, msg)
    }
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, msg)
    }
    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, msg)
    }
    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, msg)
    }
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, msg)
    }
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// Convert an unexpected infrastructure error at the operation
    /// boundary: log the raw error with its context, surface a generic
    /// message. Raw detail must never reach the caller.
    pub fn internal_from(
        err: &anyhow::Error,
        operation: &str,
        user_id: Option<&str>,
        tenant_id: Option<&str>,
    ) -> Self {
        tracing::error!(
            operation,
            user_id = user_id.unwrap_or("-"),
            tenant_id = tenant_id.unwrap_or("-"),
            error = %err,
            "unexpected failure"
        );
        Self::internal("Something went wrong, please try again")
    }
}

/// Uniform success/failure envelope for server operations.
///
/// Exactly one variant is ever populated; consumers match exhaustively.
#[derive(Debug, Clone)]
pub enum ActionResult<T> {
    Success(T),
    Failure(ActionError),
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        ActionResult::Success(data)
    }

    pub fn fail(error: ActionError) -> Self {
        ActionResult::Failure(error)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ActionResult::Success(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ActionResult<U> {
        match self {
            ActionResult::Success(v) => ActionResult::Success(f(v)),
            ActionResult::Failure(e) => ActionResult::Failure(e),
        }
    }

    /// Carry a failure into a result of another type, unchanged.
    ///
    /// This is the propagation rule of the protocol: an operation that
    /// receives a failure from `require_auth()` or a similar check
    /// returns it as-is, never re-wrapped.
    pub fn pass_failure<U>(self) -> Result<T, ActionResult<U>> {
        match self {
            ActionResult::Success(v) => Ok(v),
            ActionResult::Failure(e) => Err(ActionResult::Failure(e)),
        }
    }

    pub fn into_result(self) -> Result<T, ActionError> {
        match self {
            ActionResult::Success(v) => Ok(v),
            ActionResult::Failure(e) => Err(e),
        }
    }
}

impl<T> From<ActionError> for ActionResult<T> {
    fn from(error: ActionError) -> Self {
        ActionResult::Failure(error)
    }
}

impl<T: Serialize> ActionResult<T> {
    /// Wire payload:
    /// `{"success": true, "data": ...}` or
    /// `{"success": false, "error": ..., "code": ...}`.
    pub fn to_json(&self) -> Value {
        match self {
            ActionResult::Success(data) => json!({
                "success": true,
                "data": data,
            }),
            ActionResult::Failure(e) => {
                let mut base = json!({
                    "success": false,
                    "error": e.message,
                    "code": e.code.as_str(),
                });
                if let Some(fields) = &e.fields {
                    base["fields"] = fields.clone();
                }
                base
            }
        }
    }
}

/// Convenience helper for bailing out of an operation with a failure.
#[macro_export]
macro_rules! bail_action {
    ($ctor:ident, $msg:expr) => {
        return $crate::result::ActionResult::Failure($crate::result::ActionError::$ctor($msg))
    };
    ($ctor:ident, $fmt:expr, $($arg:tt)*) => {
        return $crate::result::ActionResult::Failure(
            $crate::result::ActionError::$ctor(format!($fmt, $($arg)*)),
        )
    };
}
