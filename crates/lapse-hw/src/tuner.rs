//! Auto-exposure convergence.
//!
//! Auto-exposure settles asynchronously on the sensor: after the controls
//! are handed back to automatic, the reported exposure speed wanders for a
//! few frames before stabilizing. The tuner polls the reading at a fixed
//! cadence until it repeats, with a budget so an unresponsive sensor cannot
//! stall the capture cycle indefinitely.

use crate::camera::{CameraControl, CameraError};
use lapse_core::{ExposureMode, WbGains};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
const DEFAULT_MAX_POLLS: u32 = 5;

/// Settings snapshot reported once the sensor settles or the poll budget
/// runs out.
#[derive(Debug, Clone, Copy)]
pub struct AutoSettings {
    /// Last observed exposure speed, µs.
    pub exposure_speed: u32,
    pub awb_gains: WbGains,
    pub analog_gain: f64,
    pub digital_gain: f64,
    pub resolution: (u32, u32),
    /// False when the poll budget ran out first; the reading is then
    /// best-effort, not an error.
    pub converged: bool,
    /// Exposure-speed samples taken before returning.
    pub polls: u32,
}

#[derive(Debug, Clone)]
pub struct ExposureTuner {
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl Default for ExposureTuner {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

impl ExposureTuner {
    /// Put the camera into fully automatic operation under `mode`, then
    /// poll until two consecutive exposure-speed readings are equal and
    /// nonzero, or the budget is spent, whichever comes first.
    pub async fn settle<C: CameraControl>(
        &self,
        camera: &mut C,
        mode: ExposureMode,
    ) -> Result<AutoSettings, CameraError> {
        camera.set_auto_iso()?;
        camera.set_auto_shutter()?;
        camera.set_exposure_mode(mode)?;
        camera.set_auto_white_balance()?;

        let mut last: Option<u32> = None;
        let mut reading = 0u32;
        let mut polls = 0u32;
        let mut converged = false;
        while polls < self.max_polls {
            reading = camera.exposure_speed()?;
            polls += 1;
            if last == Some(reading) && reading != 0 {
                converged = true;
                break;
            }
            tracing::debug!(reading, polls, "waiting for auto-exposure to settle");
            last = Some(reading);
            if polls < self.max_polls {
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        let settings = AutoSettings {
            exposure_speed: reading,
            awb_gains: camera.awb_gains()?,
            analog_gain: camera.analog_gain()?,
            digital_gain: camera.digital_gain()?,
            resolution: camera.resolution(),
            converged,
            polls,
        };

        tracing::info!(
            exposure_speed = settings.exposure_speed,
            awb_red = settings.awb_gains.red,
            awb_blue = settings.awb_gains.blue,
            analog_gain = settings.analog_gain,
            digital_gain = settings.digital_gain,
            width = settings.resolution.0,
            height = settings.resolution.1,
            converged = settings.converged,
            "automatic settings"
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimCamera;
    use lapse_core::SensorPreset;

    fn fast_tuner() -> ExposureTuner {
        ExposureTuner {
            poll_interval: Duration::ZERO,
            max_polls: 5,
        }
    }

    fn camera_with(script: Vec<u32>) -> SimCamera {
        SimCamera::new(SensorPreset::DAYTIME).with_exposure_script(script)
    }

    #[tokio::test]
    async fn test_repeated_reading_converges_after_two_samples() {
        let mut cam = camera_with(vec![100, 100]);
        let settings = fast_tuner()
            .settle(&mut cam, ExposureMode::Auto)
            .await
            .unwrap();
        assert!(settings.converged);
        assert_eq!(settings.polls, 2);
        assert_eq!(settings.exposure_speed, 100);
    }

    #[tokio::test]
    async fn test_never_repeating_reading_bails_after_five() {
        let mut cam = camera_with(vec![10, 20, 30, 40, 50]);
        let settings = fast_tuner()
            .settle(&mut cam, ExposureMode::Auto)
            .await
            .unwrap();
        assert!(!settings.converged);
        assert_eq!(settings.polls, 5);
        // Best-effort: the fifth (last) sample is returned.
        assert_eq!(settings.exposure_speed, 50);
    }

    #[tokio::test]
    async fn test_zero_readings_never_satisfy_convergence() {
        let mut cam = camera_with(vec![0, 0, 0, 0, 0]);
        let settings = fast_tuner()
            .settle(&mut cam, ExposureMode::Auto)
            .await
            .unwrap();
        assert!(!settings.converged);
        assert_eq!(settings.polls, 5);
        assert_eq!(settings.exposure_speed, 0);
    }

    #[tokio::test]
    async fn test_settling_ramp_converges_mid_budget() {
        let mut cam = camera_with(vec![0, 31_000, 33_000, 33_000]);
        let settings = fast_tuner()
            .settle(&mut cam, ExposureMode::Auto)
            .await
            .unwrap();
        assert!(settings.converged);
        assert_eq!(settings.polls, 4);
        assert_eq!(settings.exposure_speed, 33_000);
    }
}
