//! Camera-based QR decoding behind a message-passing boundary.
//!
//! The decoder is treated as a black-box event source: `DecoderHandle::start`
//! spawns a capture thread that owns the camera device exclusively and
//! reports everything it sees as `ScanEvent`s over a channel. The session
//! controller drains that channel; it never touches frames or devices.
//!
//! Frame capture and QR detection are delegated to external libraries
//! (`nokhwa` and `rqrr`); this module only paces, crops, and routes.

mod camera;

pub use camera::list_cameras;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised inside the capture loop
#[derive(Error, Debug)]
pub enum DecoderError {
    #[error("camera unavailable: {0}")]
    Camera(#[from] nokhwa::NokhwaError),
}

/// Events emitted by a running decoder
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// A QR payload was decoded from a camera frame
    Decoded(String),
    /// A frame was captured but yielded no readable QR code
    Noise(String),
    /// The decoder can no longer run (camera unopenable or lost)
    Fault(String),
}

/// Decoder configuration, derived from `[scanner]` user settings
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Capture device index
    pub camera_index: u32,
    /// Frame sampling rate
    pub frames_per_second: u32,
    /// Side length of the centered square region scanned for QR codes
    pub scan_region: u32,
}

/// A capture device visible to the decoder
#[derive(Debug, Clone)]
pub struct CameraDevice {
    pub index: u32,
    pub name: String,
}

/// Handle to a running camera decoder.
///
/// Dropping the handle stops the capture thread, so tearing down the view
/// can never leak the camera device.
pub struct DecoderHandle {
    stop: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
    events: mpsc::UnboundedReceiver<ScanEvent>,
}

impl DecoderHandle {
    /// Start a decoder on its own capture thread.
    ///
    /// Construction itself cannot fail: camera problems surface as a
    /// `ScanEvent::Fault` from the thread instead.
    pub fn start(config: DecoderConfig) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let stop = Arc::new(AtomicBool::new(false));

        tracing::info!(
            "Starting decoder: camera {} at {} fps, {}px scan region",
            config.camera_index,
            config.frames_per_second,
            config.scan_region
        );

        let thread_tx = events_tx.clone();
        let thread_stop = Arc::clone(&stop);
        let thread = std::thread::Builder::new()
            .name("qr-decoder".into())
            .spawn(move || camera::run_capture_loop(config, thread_stop, thread_tx));

        let thread = match thread {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("Failed to spawn decoder thread: {}", e);
                let _ = events_tx.send(ScanEvent::Fault(format!(
                    "decoder thread unavailable: {e}"
                )));
                None
            }
        };

        Self {
            stop,
            thread,
            events,
        }
    }

    /// Next pending event, if any. Non-blocking.
    pub fn try_next(&mut self) -> Option<ScanEvent> {
        self.events.try_recv().ok()
    }

    /// Whether the capture backend can drive a torch/flashlight.
    /// Desktop backends (v4l2, AVFoundation, MSMF) expose no torch control.
    pub fn supports_torch(&self) -> bool {
        false
    }

    /// Stop the capture thread and release the camera.
    ///
    /// Join failures are logged and swallowed: a release problem must never
    /// block the state transition that requested the stop.
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread.take() {
            if let Err(e) = handle.join() {
                tracing::warn!("Decoder thread did not shut down cleanly: {:?}", e);
            }
        }
    }
}

impl Drop for DecoderHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
