//! One capture cycle: tune → capture → mode switch → annotate → publish →
//! archive → upload.
//!
//! Every stage is failure-isolated: a failing stage is logged with context
//! and the remaining stages still run, so a transient annotation or upload
//! problem never costs the sequence a frame.

use crate::annotate;
use crate::session::Session;
use crate::uploader::Uploader;
use lapse_core::{archive, metering, CaptureStamp};
use lapse_hw::CameraControl;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
enum CaptureStageError {
    #[error("camera: {0}")]
    Camera(#[from] lapse_hw::CameraError),
    #[error("image: {0}")]
    Image(#[from] image::ImageError),
}

/// Run one full cycle. Never fails the caller; per-stage outcomes live in
/// the log.
pub async fn run_cycle<C: CameraControl>(session: &mut Session<C>, uploader: &Uploader) {
    let stamp = CaptureStamp::now();
    let shot_path = stamp.capture_path(&session.cfg.root);
    tracing::info!(path = %shot_path.display(), "capture cycle started");

    // Let auto-exposure settle and remember what it chose.
    let mut latest_speed = None;
    match session
        .tuner
        .settle(&mut session.camera, session.mode.mode())
        .await
    {
        Ok(settings) => {
            session
                .history
                .exposure_speed
                .push(f64::from(settings.exposure_speed));
            session.history.awb_gains.push(settings.awb_gains);
            latest_speed = Some(settings.exposure_speed);
        }
        Err(e) => tracing::warn!(error = %e, "exposure tuning failed"),
    }

    // Grab, decode, and persist the frame.
    if let Err(e) = capture_stage(session, &shot_path) {
        tracing::warn!(error = %e, path = %shot_path.display(), "capture failed");
    }

    // Re-evaluate day/night with the fresh reading.
    if let Some(speed) = latest_speed {
        session.mode.observe(speed);
    }

    // Timestamp overlay; the saved file survives a failed annotation.
    if let Err(e) = annotate::overlay_timestamp(&shot_path, &stamp.label()).await {
        tracing::warn!(error = %e, "timestamp annotation failed");
    }

    // Publish as the canonical latest image.
    let latest = session.cfg.latest_path();
    if let Err(e) = std::fs::copy(&shot_path, &latest) {
        tracing::warn!(error = %e, "failed to update latest image");
    }

    // Noon snapshot, kept per day.
    if let Some(dst) = archive::noon_archive(&session.cfg.root, stamp.time()) {
        match std::fs::copy(&shot_path, &dst) {
            Ok(_) => tracing::info!(path = %dst.display(), "archived noon capture"),
            Err(e) => tracing::warn!(error = %e, path = %dst.display(), "noon archive failed"),
        }
    }

    // The rolling video closed out overnight covers the previous day.
    if let Some(dst) = archive::video_archive(&session.cfg.root, stamp.time()) {
        match std::fs::copy(&session.cfg.video_source, &dst) {
            Ok(_) => tracing::info!(path = %dst.display(), "archived daily video"),
            Err(e) => tracing::warn!(error = %e, path = %dst.display(), "video archive failed"),
        }
    }

    // Optional remote delivery of the latest image.
    if session.cfg.upload {
        if let Err(e) = uploader.upload(&latest).await {
            tracing::warn!(error = %e, "upload failed");
        }
    }

    tracing::info!("capture cycle finished");
}

/// Startup warm-up: a few tuning passes with throwaway captures, so the
/// history window is seeded and auto-exposure has settled before the first
/// timestamped frame.
pub async fn run_warmup<C: CameraControl>(session: &mut Session<C>) {
    let total = session.cfg.warmup_passes;
    for pass in 1..=total {
        tracing::info!(pass, total, "warm-up tuning pass");
        let speed = match session
            .tuner
            .settle(&mut session.camera, session.mode.mode())
            .await
        {
            Ok(settings) => {
                session
                    .history
                    .exposure_speed
                    .push(f64::from(settings.exposure_speed));
                session.history.awb_gains.push(settings.awb_gains);
                Some(settings.exposure_speed)
            }
            Err(e) => {
                tracing::warn!(error = %e, "warm-up tuning failed");
                None
            }
        };

        let warmup_path = session.cfg.warmup_path();
        if let Err(e) = capture_stage(session, &warmup_path) {
            tracing::warn!(error = %e, "warm-up capture failed");
        }

        if let Some(speed) = speed {
            session.mode.observe(speed);
        }
    }
}

/// Capture a frame at the configured output size, decode it, save it to
/// `path`, and meter scene brightness when configured.
fn capture_stage<C: CameraControl>(
    session: &mut Session<C>,
    path: &Path,
) -> Result<(), CaptureStageError> {
    let jpeg = session.camera.capture_jpeg(session.cfg.output_size)?;
    let image = image::load_from_memory(&jpeg)?;
    image.save(path)?;

    if let Some(zone) = session.cfg.metering {
        let brightness = metering::brightness(&image, zone);
        session.history.brightness.push(brightness);
        let average = session.history.brightness.average().unwrap_or(brightness);
        tracing::info!(brightness, average, zone = ?zone, "scene brightness");
    }

    Ok(())
}
