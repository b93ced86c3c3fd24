//! The uniform response envelope.
//!
//! Every business operation answers with the same `{message, data, params}`
//! shape, regardless of outcome. `data` is non-null iff the operation
//! produced records; `message` always states the actual outcome. Clients are
//! expected to check `data`, not the HTTP status: business failures keep a
//! 200 status, only authentication failures use a distinct transport status.

use serde::Serialize;
use serde_json::Value;

/// Fixed outcome messages.
///
/// Kept in one place so handlers and tests agree on the exact strings.
pub mod messages {
    /// The operation produced data.
    pub const SUCCESS: &str = "success";

    /// The engine could not complete the operation.
    pub const FAILED: &str = "failed";

    /// The operation completed but matched no records.
    pub const EMPTY: &str = "empty result";

    /// Schema-valid but semantically invalid parameters.
    pub const INVALID_PARAMS: &str = "parameters invalid";

    /// Token check passed.
    pub const VERIFIED: &str = "verified";

    /// Token check failed.
    pub const VERIFY_FAILED: &str = "verification failed";
}

/// The uniform success/failure response wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope {
    /// Outcome message, one of the fixed strings in [`messages`]
    pub message: String,

    /// Payload: a single record, a list of records, or null
    pub data: Option<Value>,

    /// Echo of the validated request parameters
    pub params: Value,
}

impl Envelope {
    /// Successful outcome carrying data.
    pub fn success(params: Value, data: Value) -> Self {
        Self {
            message: messages::SUCCESS.to_string(),
            data: Some(data),
            params,
        }
    }

    /// The engine could not complete the request.
    pub fn failure(params: Value) -> Self {
        Self {
            message: messages::FAILED.to_string(),
            data: None,
            params,
        }
    }

    /// Well-formed request that matched no records. A success, not a failure.
    pub fn empty(params: Value) -> Self {
        Self {
            message: messages::EMPTY.to_string(),
            data: None,
            params,
        }
    }

    /// Schema-valid but semantically invalid parameters.
    pub fn invalid_params(params: Value) -> Self {
        Self {
            message: messages::INVALID_PARAMS.to_string(),
            data: None,
            params,
        }
    }

    /// Token check passed.
    pub fn verified() -> Self {
        Self {
            message: messages::VERIFIED.to_string(),
            data: None,
            params: Value::Null,
        }
    }

    /// Token check failed.
    pub fn verification_failed() -> Self {
        Self {
            message: messages::VERIFY_FAILED.to_string(),
            data: None,
            params: Value::Null,
        }
    }

    /// Override the default message while keeping the outcome shape.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whether the envelope carries data.
    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}

/// Serialize a validated request for the `params` echo.
///
/// Serialization of the request schemas cannot fail in practice; a null echo
/// is still a well-formed envelope if it somehow does.
pub fn params_of<T: Serialize>(request: &T) -> Value {
    serde_json::to_value(request).unwrap_or(Value::Null)
}
