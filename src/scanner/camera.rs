//! The capture loop: frames in, `ScanEvent`s out.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::{Buffer, Camera};
use tokio::sync::mpsc::UnboundedSender;

use super::{CameraDevice, DecoderConfig, DecoderError, ScanEvent};

/// Consecutive frame-grab failures tolerated before the decoder gives up
const MAX_FRAME_FAILURES: u32 = 10;

/// Enumerate capture devices for the settings picker.
///
/// Enumeration failures are not fatal: the scanner falls back to the
/// configured index, so this only logs and returns an empty list.
pub fn list_cameras() -> Vec<CameraDevice> {
    let Some(backend) = nokhwa::native_api_backend() else {
        tracing::warn!("No native camera backend available");
        return Vec::new();
    };

    match nokhwa::query(backend) {
        Ok(devices) => devices
            .iter()
            .enumerate()
            .map(|(position, info)| CameraDevice {
                index: match info.index() {
                    CameraIndex::Index(n) => *n,
                    CameraIndex::String(_) => position as u32,
                },
                name: info.human_name(),
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Camera enumeration failed: {}", e);
            Vec::new()
        }
    }
}

/// Body of the decoder thread.
///
/// Opens the configured camera, samples frames at the configured rate, and
/// emits one `ScanEvent` per frame until the stop flag is raised. The
/// camera is released on the way out no matter how the loop ends.
pub(crate) fn run_capture_loop(
    config: DecoderConfig,
    stop: Arc<AtomicBool>,
    events: UnboundedSender<ScanEvent>,
) {
    let mut camera = match open_camera(config.camera_index) {
        Ok(camera) => camera,
        Err(e) => {
            tracing::error!("Failed to open camera {}: {}", config.camera_index, e);
            let _ = events.send(ScanEvent::Fault(e.to_string()));
            return;
        }
    };

    let frame_interval = Duration::from_millis(1000 / u64::from(config.frames_per_second.max(1)));
    let mut consecutive_failures = 0u32;

    while !stop.load(Ordering::Relaxed) {
        let frame_started = Instant::now();

        match camera.frame() {
            Ok(buffer) => {
                consecutive_failures = 0;
                let event = match scan_frame(&buffer, config.scan_region) {
                    Ok(text) => ScanEvent::Decoded(text),
                    Err(noise) => ScanEvent::Noise(noise),
                };
                if events.send(event).is_err() {
                    // Receiver gone: the session no longer wants frames.
                    break;
                }
            }
            Err(e) => {
                consecutive_failures += 1;
                tracing::debug!(
                    "Frame grab failed ({}/{}): {}",
                    consecutive_failures,
                    MAX_FRAME_FAILURES,
                    e
                );
                if consecutive_failures >= MAX_FRAME_FAILURES {
                    let _ = events.send(ScanEvent::Fault(format!("camera stopped delivering frames: {e}")));
                    break;
                }
            }
        }

        if let Some(remaining) = frame_interval.checked_sub(frame_started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    release_camera(&mut camera);
}

fn open_camera(index: u32) -> Result<Camera, DecoderError> {
    // AVFoundation requires an explicit permission prompt before first use.
    #[cfg(target_os = "macos")]
    nokhwa::nokhwa_initialize(|granted| {
        tracing::info!("Camera permission granted: {}", granted);
    });

    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
    let mut camera = Camera::new(CameraIndex::Index(index), requested)?;
    camera.open_stream()?;

    tracing::info!(
        "Camera {} open: {:?} at {:?}",
        index,
        camera.resolution(),
        camera.frame_rate()
    );
    Ok(camera)
}

/// Release the device. Failures are reported, never propagated: a stuck
/// driver must not take the UI down with it.
fn release_camera(camera: &mut Camera) {
    if let Err(e) = camera.stop_stream() {
        tracing::warn!("Failed to release camera stream: {}", e);
    } else {
        tracing::debug!("Camera stream released");
    }
}

/// Decode one frame. `Ok` carries the QR payload text, `Err` the reason the
/// frame yielded nothing (ordinary noise while scanning).
fn scan_frame(buffer: &Buffer, scan_region: u32) -> Result<String, String> {
    let frame = buffer
        .decode_image::<RgbFormat>()
        .map_err(|e| format!("frame conversion failed: {e}"))?;

    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let rgb = frame.as_raw();
    if width == 0 || height == 0 || rgb.len() < width * height * 3 {
        return Err("empty frame".to_string());
    }

    // Scan a centered square region; QR codes at the frame edge are not
    // worth the extra detection cost at 10 fps.
    let side = (scan_region as usize).min(width).min(height);
    let x0 = (width - side) / 2;
    let y0 = (height - side) / 2;

    let mut luma = vec![0u8; side * side];
    for y in 0..side {
        for x in 0..side {
            let px = ((y0 + y) * width + (x0 + x)) * 3;
            let (r, g, b) = (rgb[px] as u32, rgb[px + 1] as u32, rgb[px + 2] as u32);
            luma[y * side + x] = ((r * 299 + g * 587 + b * 114) / 1000) as u8;
        }
    }

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(side, side, |x, y| {
        luma[y * side + x]
    });

    let grids = prepared.detect_grids();
    if grids.is_empty() {
        return Err("no QR code in frame".to_string());
    }

    // Decode the first grid that yields a payload.
    let mut last_error = String::new();
    for grid in &grids {
        match grid.decode() {
            Ok((_meta, content)) => {
                tracing::info!("Decoded QR payload ({} bytes)", content.len());
                return Ok(content);
            }
            Err(e) => last_error = e.to_string(),
        }
    }
    Err(format!("QR detected but undecodable: {last_error}"))
}
