//! Provider response structures.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Verification result returned by the provider.
///
/// The `data` payload holds the provider's OCR/verification output. Its
/// shape is owned by the provider and passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResponse {
    /// Whether the slip was verified successfully
    pub success: bool,

    /// Optional provider-defined status code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Optional provider-defined message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Opaque verification/OCR payload, shape owned by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Optional request identifier for tracing
    #[serde(default, rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}
