//! HTTP client for the event check-in service.
//!
//! This module provides:
//!
//! - `VerifyClient`: reqwest wrapper bound to the configured base URL
//! - `VerifyOutcome`: the service's verdict on a scanned record
//! - `VerifyError`: how a verification round-trip can fail
//!
//! The service owns all verification logic; the client's job is limited to
//! shipping the parsed record to `POST {base_url}/scanner` and classifying
//! what comes back. Fields missing from the record are omitted from the
//! request body so the service sees them as absent rather than null.

use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::payload::ScanRecord;

/// User agent for service requests
const USER_AGENT: &str = concat!("Turnstile/", env!("CARGO_PKG_VERSION"));

/// Path of the verification endpoint under the base URL
const SCANNER_PATH: &str = "scanner";

/// Errors that can occur during a verification round-trip
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service returned {0}")]
    Status(StatusCode),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Request body for the verification endpoint.
/// Unset fields are omitted entirely, not serialized as null.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    event_id: Option<&'a str>,
}

impl<'a> VerifyRequest<'a> {
    fn from_record(record: &'a ScanRecord) -> Self {
        Self {
            name: record.name.as_deref(),
            event_id: record.event_id.as_deref(),
        }
    }
}

/// The service's verdict on one scanned record.
/// Unknown response fields are tolerated; only `success` is required.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyOutcome {
    /// Whether the record was accepted for event entry
    pub success: bool,
    /// Optional human-readable detail from the service
    #[serde(default)]
    pub message: Option<String>,
}

/// Check-in service client
#[derive(Clone)]
pub struct VerifyClient {
    client: reqwest::Client,
    base_url: String,
}

impl VerifyClient {
    /// Create a client bound to the given service base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, VerifyError> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Submit a scanned record for verification.
    ///
    /// Returns the service's verdict, or a `VerifyError` when the request
    /// cannot complete: transport failure, non-2xx status, or a body that
    /// does not decode to `{ "success": bool, ... }`.
    pub async fn verify(&self, record: &ScanRecord) -> Result<VerifyOutcome, VerifyError> {
        let url = self.endpoint(SCANNER_PATH);
        tracing::debug!("Submitting scan to {}", url);

        let response = self
            .client
            .post(&url)
            .json(&VerifyRequest::from_record(record))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::Status(status));
        }

        let body = response.text().await?;
        let outcome: VerifyOutcome = serde_json::from_str(&body)
            .map_err(|e| VerifyError::MalformedResponse(e.to_string()))?;

        tracing::info!(
            "Verification result: success={} message={:?}",
            outcome.success,
            outcome.message
        );
        Ok(outcome)
    }

    /// Probe the service base URL and report round-trip latency.
    ///
    /// Any HTTP response counts as reachable; only transport failures are
    /// errors. Backs the Test Connection action.
    pub async fn ping(&self) -> Result<Duration, VerifyError> {
        let start = Instant::now();
        let response = self.client.get(&self.base_url).send().await?;
        let elapsed = start.elapsed();

        tracing::info!(
            "Service reachable: {} in {}ms",
            response.status(),
            elapsed.as_millis()
        );
        Ok(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_slashes() {
        let client = VerifyClient::new("https://checkin.example.com/").unwrap();
        assert_eq!(
            client.endpoint("scanner"),
            "https://checkin.example.com/scanner"
        );

        let client = VerifyClient::new("https://checkin.example.com").unwrap();
        assert_eq!(
            client.endpoint("/scanner"),
            "https://checkin.example.com/scanner"
        );
    }

    #[test]
    fn test_request_body_omits_unset_fields() {
        let record = ScanRecord {
            name: Some("Jane Doe".to_string()),
            event_id: None,
        };
        let body = serde_json::to_value(VerifyRequest::from_record(&record)).unwrap();

        assert_eq!(body["name"], "Jane Doe");
        assert!(body.get("eventId").is_none());

        let empty = ScanRecord::default();
        let body = serde_json::to_value(VerifyRequest::from_record(&empty)).unwrap();
        assert_eq!(body, serde_json::json!({}));
    }

    #[test]
    fn test_request_body_uses_camel_case_event_id() {
        let record = ScanRecord {
            name: None,
            event_id: Some("EVT-42".to_string()),
        };
        let body = serde_json::to_value(VerifyRequest::from_record(&record)).unwrap();
        assert_eq!(body["eventId"], "EVT-42");
    }

    #[test]
    fn test_outcome_tolerates_extra_fields() {
        let outcome: VerifyOutcome =
            serde_json::from_str(r#"{"success": true, "attendee": "Jane", "seat": 12}"#).unwrap();
        assert!(outcome.success);
        assert!(outcome.message.is_none());

        let outcome: VerifyOutcome =
            serde_json::from_str(r#"{"success": false, "message": "unknown event"}"#).unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("unknown event"));
    }

    #[test]
    fn test_outcome_requires_success_flag() {
        assert!(serde_json::from_str::<VerifyOutcome>(r#"{"verified": true}"#).is_err());
        assert!(serde_json::from_str::<VerifyOutcome>("not json").is_err());
    }
}
