//! Scan session state machine.
//!
//! One tagged phase replaces the pile of booleans a scan UI tends to grow
//! (scanner active, loading, result shown): exactly one phase is active at
//! any time, and every transition is an explicit method on `SessionState`.
//!
//! Invariants:
//! - the camera decoder is running if and only if the phase is `Scanning`;
//! - at most one verification request is in flight, guaranteed because the
//!   decoder (the only trigger) is stopped before the request is spawned.

use std::time::Duration;

use chrono::{DateTime, Local};
use eframe::egui;
use futures::FutureExt;
use tokio::task::JoinHandle;

use crate::payload::{ScanRecord, parse_scan_payload};
use crate::scanner::{DecoderConfig, DecoderHandle, ScanEvent};
use crate::state::StateEvent;
use crate::verify::{VerifyClient, VerifyError, VerifyOutcome};

/// Where the session currently is in the scan lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Camera decoder active, waiting for a QR payload
    #[default]
    Scanning,
    /// Payload captured, verification request in flight
    Verifying,
    /// The service accepted the scan
    Accepted,
    /// The service rejected the scan
    Rejected,
    /// The scan could not be completed (transport, camera, or task failure)
    Failed,
}

impl Phase {
    /// Terminal phases offer the "scan again" recovery path
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Accepted | Phase::Rejected | Phase::Failed)
    }
}

/// Scan session state
pub struct SessionState {
    /// Current lifecycle phase
    pub phase: Phase,
    /// Raw decoded payload of the current scan
    pub raw_payload: Option<String>,
    /// Fields parsed out of the payload
    pub record: Option<ScanRecord>,
    /// Verdict from the verification service
    pub outcome: Option<VerifyOutcome>,
    /// When the payload was decoded
    pub scanned_at: Option<DateTime<Local>>,
    /// Failure detail for the `Failed` phase
    pub error: Option<String>,
    /// Running camera decoder (present exactly while `Scanning`)
    decoder: Option<DecoderHandle>,
    /// In-flight verification round-trip
    verify_task: Option<JoinHandle<Result<VerifyOutcome, VerifyError>>>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Scanning,
            raw_payload: None,
            record: None,
            outcome: None,
            scanned_at: None,
            error: None,
            decoder: None,
            verify_task: None,
        }
    }
}

impl SessionState {
    /// Whether the camera decoder is currently running
    pub fn decoder_active(&self) -> bool {
        self.decoder.is_some()
    }

    /// Whether the running decoder's backend can drive a torch
    pub fn torch_available(&self) -> bool {
        self.decoder
            .as_ref()
            .map(|d| d.supports_torch())
            .unwrap_or(false)
    }

    /// Construct the decoder and enter the `Scanning` phase.
    pub fn start_scanning(&mut self, config: &DecoderConfig) -> Vec<StateEvent> {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.stop();
        }

        self.decoder = Some(DecoderHandle::start(config.clone()));
        self.phase = Phase::Scanning;

        vec![StateEvent::StatusMessage("Scanning...".to_string())]
    }

    /// Discard the previous scan and return to `Scanning`.
    pub fn scan_again(&mut self, config: &DecoderConfig) -> Vec<StateEvent> {
        self.reset();
        let mut events = self.start_scanning(config);
        events.push(StateEvent::LogInfo("Scan restarted by user".to_string()));
        events
    }

    /// Clear the scan record, outcome, and error from the previous scan.
    pub fn reset(&mut self) {
        self.raw_payload = None;
        self.record = None;
        self.outcome = None;
        self.scanned_at = None;
        self.error = None;
        self.phase = Phase::Scanning;

        if let Some(task) = self.verify_task.take() {
            task.abort();
        }
    }

    /// Stop the decoder and abandon any in-flight verification.
    /// Called on view teardown; must never fail.
    pub fn shutdown(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.stop();
        }
        if let Some(task) = self.verify_task.take() {
            task.abort();
        }
    }

    /// A payload was decoded: stop the decoder (releasing the camera), parse
    /// the payload, and move to `Verifying`.
    ///
    /// Returns the record to verify, or `None` when the event is stale — a
    /// decoder may emit again before the stop lands, and only the first
    /// decode of a session may transition.
    pub fn on_decoded(&mut self, text: String) -> Option<ScanRecord> {
        if self.phase != Phase::Scanning {
            tracing::debug!("Ignoring decode event outside the scanning phase");
            return None;
        }

        if let Some(mut decoder) = self.decoder.take() {
            decoder.stop();
        }

        let record = parse_scan_payload(&text);
        if record.is_empty() {
            // Lenient by design: the service is still asked, with both
            // fields absent from the request body.
            tracing::warn!("Decoded payload carried no recognized fields");
        }

        self.raw_payload = Some(text);
        self.record = Some(record.clone());
        self.scanned_at = Some(Local::now());
        self.phase = Phase::Verifying;

        Some(record)
    }

    /// An unreadable frame: logged and ignored, the decoder keeps running.
    pub fn on_decode_noise(&mut self, message: &str) {
        tracing::debug!("QR code no match: {}", message);
    }

    /// The decoder cannot continue. Terminal failure with the usual
    /// "scan again" recovery.
    pub fn on_decoder_fault(&mut self, message: String) -> Vec<StateEvent> {
        if self.phase != Phase::Scanning {
            // A fault queued behind a successful decode is moot.
            tracing::debug!("Ignoring decoder fault outside the scanning phase: {}", message);
            return Vec::new();
        }

        if let Some(mut decoder) = self.decoder.take() {
            decoder.stop();
        }

        self.phase = Phase::Failed;
        self.error = Some(message.clone());

        vec![
            StateEvent::LogError(format!("Decoder fault: {}", message)),
            StateEvent::StatusMessage("Scan failed. Try again.".to_string()),
        ]
    }

    /// Spawn the verification round-trip for a decoded record.
    pub fn begin_verification(&mut self, client: &VerifyClient, record: ScanRecord) {
        if self.verify_task.is_some() {
            // Unreachable while the decoder-stops-before-verify ordering
            // holds; refuse a second round-trip regardless.
            tracing::warn!("Verification already in flight, ignoring new request");
            return;
        }

        let client = client.clone();
        self.verify_task = Some(tokio::spawn(async move { client.verify(&record).await }));
    }

    /// Apply the result of a verification round-trip.
    pub fn apply_verify_result(
        &mut self,
        result: Result<VerifyOutcome, VerifyError>,
    ) -> Vec<StateEvent> {
        match result {
            Ok(outcome) => {
                let (phase, status) = if outcome.success {
                    (Phase::Accepted, "Scan successful!")
                } else {
                    (Phase::Rejected, "Verification failed")
                };
                self.phase = phase;
                self.outcome = Some(outcome);

                vec![
                    StateEvent::LogInfo(format!("Verification finished: {}", status)),
                    StateEvent::StatusMessage(status.to_string()),
                ]
            }
            Err(e) => {
                self.phase = Phase::Failed;
                self.error = Some(e.to_string());

                // Internally distinguished in the log; the user gets the
                // same generic failure state either way.
                vec![
                    StateEvent::LogError(format!("Verification failed: {}", e)),
                    StateEvent::StatusMessage("Scan failed. Try again.".to_string()),
                ]
            }
        }
    }

    /// Per-frame poll: drain decoder events, then check the verification
    /// task. Returns events for the app to apply.
    pub fn poll(&mut self, ctx: &egui::Context, client: &VerifyClient) -> Vec<StateEvent> {
        let mut events = Vec::new();

        let mut pending = Vec::new();
        if let Some(decoder) = self.decoder.as_mut() {
            while let Some(event) = decoder.try_next() {
                pending.push(event);
            }
        }

        for event in pending {
            match event {
                ScanEvent::Decoded(text) => {
                    if let Some(record) = self.on_decoded(text) {
                        events.push(StateEvent::StatusMessage("Verifying scan...".to_string()));
                        self.begin_verification(client, record);
                    }
                }
                ScanEvent::Noise(message) => self.on_decode_noise(&message),
                ScanEvent::Fault(message) => events.extend(self.on_decoder_fault(message)),
            }
        }

        if let Some(task) = &mut self.verify_task {
            if task.is_finished() {
                let task = self.verify_task.take().unwrap();
                match task.now_or_never() {
                    Some(Ok(result)) => events.extend(self.apply_verify_result(result)),
                    Some(Err(e)) => {
                        self.phase = Phase::Failed;
                        self.error = Some(e.to_string());
                        events.push(StateEvent::LogError(format!(
                            "Verification task panicked: {}",
                            e
                        )));
                        events.push(StateEvent::StatusMessage(
                            "Scan failed. Try again.".to_string(),
                        ));
                    }
                    None => {
                        // Shouldn't happen since we checked is_finished()
                        tracing::warn!("Task not ready despite is_finished()");
                    }
                }
            } else {
                ctx.request_repaint();
            }
        }

        // Decoder events arrive without user input; keep the loop ticking
        // while the camera is live.
        if self.phase == Phase::Scanning {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepted() -> Result<VerifyOutcome, VerifyError> {
        Ok(VerifyOutcome {
            success: true,
            message: None,
        })
    }

    fn rejected() -> Result<VerifyOutcome, VerifyError> {
        Ok(VerifyOutcome {
            success: false,
            message: Some("not on the list".to_string()),
        })
    }

    #[test]
    fn test_decode_moves_to_verifying_exactly_once() {
        let mut session = SessionState::default();
        assert_eq!(session.phase, Phase::Scanning);

        let record = session.on_decoded("Name: Jane Doe\nEvent Id: EVT-42".to_string());
        assert_eq!(session.phase, Phase::Verifying);
        let record = record.expect("first decode must produce a record");
        assert_eq!(record.name.as_deref(), Some("Jane Doe"));
        assert_eq!(record.event_id.as_deref(), Some("EVT-42"));

        // A second decode event for the same session is stale.
        assert!(session.on_decoded("Name: Someone Else".to_string()).is_none());
        assert_eq!(session.phase, Phase::Verifying);
        assert_eq!(
            session.record.as_ref().unwrap().name.as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn test_garbage_payload_still_verifies() {
        let mut session = SessionState::default();

        let record = session.on_decoded("Garbage QR".to_string()).unwrap();
        assert!(record.is_empty());
        assert_eq!(session.phase, Phase::Verifying);
        assert_eq!(session.raw_payload.as_deref(), Some("Garbage QR"));
    }

    #[test]
    fn test_success_response_is_accepted() {
        let mut session = SessionState::default();
        session.on_decoded("Name: Jane".to_string());

        session.apply_verify_result(accepted());
        assert_eq!(session.phase, Phase::Accepted);
        assert!(session.outcome.as_ref().unwrap().success);
    }

    #[test]
    fn test_failure_response_is_rejected() {
        let mut session = SessionState::default();
        session.on_decoded("Name: Jane".to_string());

        session.apply_verify_result(rejected());
        assert_eq!(session.phase, Phase::Rejected);
        assert_eq!(
            session.outcome.as_ref().unwrap().message.as_deref(),
            Some("not on the list")
        );
    }

    #[test]
    fn test_transport_error_is_failed() {
        let mut session = SessionState::default();
        session.on_decoded("Name: Jane".to_string());

        session.apply_verify_result(Err(VerifyError::MalformedResponse(
            "expected value".to_string(),
        )));
        assert_eq!(session.phase, Phase::Failed);
        assert!(session.outcome.is_none());
        assert!(session.error.as_deref().unwrap().contains("expected value"));
    }

    #[test]
    fn test_noise_does_not_change_phase() {
        let mut session = SessionState::default();
        session.on_decode_noise("no QR code in frame");
        assert_eq!(session.phase, Phase::Scanning);
        assert!(session.raw_payload.is_none());
    }

    #[test]
    fn test_decoder_fault_is_failed() {
        let mut session = SessionState::default();
        let events = session.on_decoder_fault("camera unavailable".to_string());
        assert_eq!(session.phase, Phase::Failed);
        assert!(!events.is_empty());
        assert!(session.error.as_deref().unwrap().contains("camera"));
    }

    #[test]
    fn test_reset_clears_previous_scan() {
        let mut session = SessionState::default();
        session.on_decoded("Name: Jane".to_string());
        session.apply_verify_result(rejected());
        assert!(session.phase.is_terminal());

        session.reset();
        assert_eq!(session.phase, Phase::Scanning);
        assert!(session.raw_payload.is_none());
        assert!(session.record.is_none());
        assert!(session.outcome.is_none());
        assert!(session.scanned_at.is_none());
        assert!(session.error.is_none());
    }

    #[test]
    fn test_terminal_phases() {
        assert!(!Phase::Scanning.is_terminal());
        assert!(!Phase::Verifying.is_terminal());
        assert!(Phase::Accepted.is_terminal());
        assert!(Phase::Rejected.is_terminal());
        assert!(Phase::Failed.is_terminal());
    }
}
