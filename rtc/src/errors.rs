use serde::Serialize;
use thiserror::Error;

/// Per-callout failure kinds.
///
/// Every kind is non-fatal to the surrounding ad flow: a failed callout is
/// reported as a structured record in the result list, never thrown.
/// Analytics consumers depend on the serialized names, so the wire format is
/// SCREAMING_SNAKE_CASE and must stay stable.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CalloutError {
    #[error("referenced vendor is not in the registry")]
    UnknownVendor,

    #[error("expanded URL failed the secure-url check")]
    InsecureUrl,

    #[error("expanded URL duplicates an already accepted callout")]
    DuplicateUrl,

    #[error("maximum number of callouts exceeded")]
    MaxCalloutsExceeded,

    #[error("response body is not valid JSON")]
    MalformedJsonResponse,

    #[error("network failure or timeout")]
    NetworkFailure,
}

impl CalloutError {
    /// Stable name, also used as a metric tag value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CalloutError::UnknownVendor => "UNKNOWN_VENDOR",
            CalloutError::InsecureUrl => "INSECURE_URL",
            CalloutError::DuplicateUrl => "DUPLICATE_URL",
            CalloutError::MaxCalloutsExceeded => "MAX_CALLOUTS_EXCEEDED",
            CalloutError::MalformedJsonResponse => "MALFORMED_JSON_RESPONSE",
            CalloutError::NetworkFailure => "NETWORK_FAILURE",
        }
    }
}
