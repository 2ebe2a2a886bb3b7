//! Response classification
//!
//! Every body the API returns is parsed once at the JSON boundary into an
//! [`ApiResponse`]: either the expected success value or an [`ErrorPayload`].
//! Code past this point never inspects untyped JSON for error shapes again.

use crate::error::{SdkError, SdkResult};
use crate::models::{Data, ErrorPayload};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Returns `true` iff the value is an object with a numeric `status`, a string
/// `message` and an array `links`.
///
/// Extra fields (such as the `errors` list of a rejected run submission) do
/// not prevent detection.
pub fn is_error_payload(value: &Value) -> bool {
    value.as_object().map_or(false, |obj| {
        obj.get("status").map_or(false, Value::is_number)
            && obj.get("message").map_or(false, Value::is_string)
            && obj.get("links").map_or(false, Value::is_array)
    })
}

/// A classified API answer
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    /// Success payload of the expected shape
    Success(T),
    /// Error payload reported by the service
    Error(ErrorPayload),
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Classify a parsed JSON body.
    ///
    /// Error payloads are recognized before any attempt to read the value as
    /// `T`, so a success type that happens to accept the error shape never
    /// swallows a service error.
    pub fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        if let Some(payload) = ErrorPayload::from_json(&value) {
            return Ok(ApiResponse::Error(payload));
        }

        serde_json::from_value(value).map(ApiResponse::Success)
    }
}

impl<T> ApiResponse<T> {
    /// Convert into a result, raising the error payload as a service error
    pub fn into_result(self) -> SdkResult<T> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Error(payload) => Err(SdkError::from(payload)),
        }
    }

    /// Whether the service reported an error
    pub fn is_error(&self) -> bool {
        matches!(self, ApiResponse::Error(_))
    }
}

/// Strip one level of `{ "data": ... }` envelope
pub fn unwrap<T>(envelope: Data<T>) -> T {
    envelope.into_inner()
}
