//! Bugzilla JSON-RPC envelope types.
//!
//! Bugzilla's legacy JSON-RPC endpoint speaks version 1.1: one envelope
//! per POST, errors carried in-band as an `error` member. The dashboard
//! flag query nests its payload one level deeper than the RPC result
//! (`result.result.requestee`).

use reviewbar_core::CheckError;
use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Bugzilla deployment host.
pub const BUGZILLA_HOST: &str = "bugzilla.mozilla.org";

/// JSON-RPC endpoint.
pub(crate) const RPC_ENDPOINT: &str = "https://bugzilla.mozilla.org/jsonrpc.cgi";

/// Dashboard flag-query method.
const FLAG_QUERY_METHOD: &str = "MyDashboard.run_flag_query";

/// JSON-RPC protocol version.
const RPC_VERSION: &str = "1.1";

/// Flag type that counts as a pending review.
const REVIEW_FLAG_TYPE: &str = "review";

// ============================================================================
// Request
// ============================================================================

/// A `MyDashboard.run_flag_query` request envelope.
#[derive(Debug, Serialize)]
pub struct FlagQueryRequest<'a> {
    /// Request id, unique per call.
    pub id: u32,
    /// RPC method name.
    pub method: &'a str,
    /// Method parameters.
    pub params: FlagQueryParams<'a>,
    /// JSON-RPC version.
    pub version: &'a str,
}

/// Parameters for the flag query.
#[derive(Debug, Serialize)]
pub struct FlagQueryParams<'a> {
    /// Bugzilla API key.
    pub api_key: &'a str,
    /// Which side of the flag to query; `requestee` means flags waiting
    /// on the signed-in user.
    #[serde(rename = "type")]
    pub request_type: &'a str,
}

impl<'a> FlagQueryRequest<'a> {
    /// Builds a requestee flag query.
    pub fn new(id: u32, api_key: &'a str) -> Self {
        Self {
            id,
            method: FLAG_QUERY_METHOD,
            params: FlagQueryParams {
                api_key,
                request_type: "requestee",
            },
            version: RPC_VERSION,
        }
    }
}

// ============================================================================
// Response
// ============================================================================

/// A flag-query response envelope.
#[derive(Debug, Deserialize)]
pub struct FlagQueryResponse {
    /// RPC result, absent on error.
    #[serde(default)]
    pub result: Option<FlagQueryResult>,
    /// In-band RPC error, absent on success.
    #[serde(default)]
    pub error: Option<RpcError>,
}

/// In-band JSON-RPC error payload.
#[derive(Debug, Deserialize)]
pub struct RpcError {
    /// Numeric error code.
    #[serde(default)]
    pub code: Option<i64>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Outer result wrapper.
#[derive(Debug, Deserialize)]
pub struct FlagQueryResult {
    /// The method's own result object.
    #[serde(default)]
    pub result: Option<RequesteeFlags>,
}

/// Flag lists keyed by query type.
#[derive(Debug, Deserialize)]
pub struct RequesteeFlags {
    /// Flags waiting on the signed-in user.
    #[serde(default)]
    pub requestee: Vec<FlagRecord>,
}

/// One flag record. Only the flag type matters here; everything else the
/// server sends is ignored.
#[derive(Debug, Deserialize)]
pub struct FlagRecord {
    /// Flag type name (`review`, `needinfo`, `feedback`, ...).
    #[serde(rename = "type", default)]
    pub flag_type: Option<String>,
}

// ============================================================================
// Extraction
// ============================================================================

/// Extracts the pending-review count from a flag-query response.
pub fn count_review_flags(response: &FlagQueryResponse) -> Result<u64, CheckError> {
    if let Some(err) = &response.error {
        let message = err
            .message
            .clone()
            .unwrap_or_else(|| format!("error code {}", err.code.unwrap_or(-1)));
        return Err(CheckError::Provider(message));
    }

    let flags = response
        .result
        .as_ref()
        .and_then(|r| r.result.as_ref())
        .ok_or_else(|| CheckError::Parse("missing result.result in response".to_string()))?;

    let count = flags
        .requestee
        .iter()
        .filter(|f| f.flag_type.as_deref() == Some(REVIEW_FLAG_TYPE))
        .count() as u64;

    Ok(count)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_envelope_shape() {
        let req = FlagQueryRequest::new(7, "key123");
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["method"], "MyDashboard.run_flag_query");
        assert_eq!(json["version"], "1.1");
        assert_eq!(json["params"]["api_key"], "key123");
        assert_eq!(json["params"]["type"], "requestee");
    }

    #[test]
    fn test_counts_only_review_flags() {
        let json = r#"{
            "result": {
                "result": {
                    "requestee": [
                        {"type": "review"},
                        {"type": "needinfo"},
                        {"type": "review"}
                    ]
                }
            }
        }"#;

        let response: FlagQueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(count_review_flags(&response).unwrap(), 2);
    }

    #[test]
    fn test_empty_requestee_is_zero() {
        let json = r#"{"result": {"result": {"requestee": []}}}"#;
        let response: FlagQueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(count_review_flags(&response).unwrap(), 0);
    }

    #[test]
    fn test_missing_requestee_defaults_empty() {
        let json = r#"{"result": {"result": {}}}"#;
        let response: FlagQueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(count_review_flags(&response).unwrap(), 0);
    }

    #[test]
    fn test_error_payload_is_provider_error() {
        let json = r#"{"error": {"code": 306, "message": "invalid API key"}}"#;
        let response: FlagQueryResponse = serde_json::from_str(json).unwrap();

        let err = count_review_flags(&response).unwrap_err();
        assert_eq!(err.kind(), "provider");
        assert!(err.to_string().contains("invalid API key"));
    }

    #[test]
    fn test_error_without_message_uses_code() {
        let json = r#"{"error": {"code": 410}}"#;
        let response: FlagQueryResponse = serde_json::from_str(json).unwrap();

        let err = count_review_flags(&response).unwrap_err();
        assert!(err.to_string().contains("410"));
    }

    #[test]
    fn test_missing_result_is_parse_error() {
        let json = r#"{}"#;
        let response: FlagQueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(count_review_flags(&response).unwrap_err().kind(), "parse");
    }

    #[test]
    fn test_untyped_flags_not_counted() {
        let json = r#"{"result": {"result": {"requestee": [{}, {"type": "review"}]}}}"#;
        let response: FlagQueryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(count_review_flags(&response).unwrap(), 1);
    }
}
