//! Deterministic synthetic camera backend.
//!
//! Stands in for real hardware in development and tests: renders a gradient
//! test pattern at the requested output size and reports a scriptable
//! exposure-speed sequence, so the controller's convergence and mode-switch
//! behavior can be exercised without a sensor.

use crate::camera::{CameraControl, CameraError};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use lapse_core::{ExposureMode, SensorPreset, WbGains};
use std::io::Cursor;

pub struct SimCamera {
    preset: SensorPreset,
    exposure_mode: ExposureMode,
    auto_iso: bool,
    auto_shutter: bool,
    auto_awb: bool,
    exposure_script: Vec<u32>,
    script_pos: usize,
    frames_captured: u64,
}

impl SimCamera {
    /// Native image-port resolution of the simulated sensor.
    pub const NATIVE_RESOLUTION: (u32, u32) = (2592, 1944);

    /// Exposure speed reported once the script is exhausted (µs).
    const SETTLED_EXPOSURE_US: u32 = 33_000;

    pub fn new(preset: SensorPreset) -> Self {
        Self {
            preset,
            exposure_mode: ExposureMode::Auto,
            auto_iso: false,
            auto_shutter: false,
            auto_awb: false,
            // One zero reading first: auto-exposure has not produced a
            // frame yet right after the controls go automatic.
            exposure_script: vec![0],
            script_pos: 0,
            frames_captured: 0,
        }
    }

    /// Replace the scripted exposure-speed readings. Once the script is
    /// exhausted the camera reports a settled constant.
    pub fn with_exposure_script(mut self, script: Vec<u32>) -> Self {
        self.exposure_script = script;
        self.script_pos = 0;
        self
    }

    pub fn preset(&self) -> SensorPreset {
        self.preset
    }

    pub fn exposure_mode(&self) -> ExposureMode {
        self.exposure_mode
    }

    /// Frames captured so far.
    pub fn frames_captured(&self) -> u64 {
        self.frames_captured
    }

    /// True once iso, shutter, and white balance have all been handed back
    /// to the sensor.
    pub fn is_fully_automatic(&self) -> bool {
        self.auto_iso && self.auto_shutter && self.auto_awb
    }

    fn next_exposure(&mut self) -> u32 {
        match self.exposure_script.get(self.script_pos) {
            Some(&value) => {
                self.script_pos += 1;
                value
            }
            None => Self::SETTLED_EXPOSURE_US,
        }
    }
}

impl CameraControl for SimCamera {
    fn set_auto_iso(&mut self) -> Result<(), CameraError> {
        self.auto_iso = true;
        Ok(())
    }

    fn set_auto_shutter(&mut self) -> Result<(), CameraError> {
        self.auto_shutter = true;
        Ok(())
    }

    fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<(), CameraError> {
        self.exposure_mode = mode;
        Ok(())
    }

    fn set_auto_white_balance(&mut self) -> Result<(), CameraError> {
        self.auto_awb = true;
        Ok(())
    }

    fn exposure_speed(&mut self) -> Result<u32, CameraError> {
        Ok(self.next_exposure())
    }

    fn awb_gains(&mut self) -> Result<WbGains, CameraError> {
        Ok(WbGains {
            red: 1.8,
            blue: 1.4,
        })
    }

    fn analog_gain(&mut self) -> Result<f64, CameraError> {
        Ok(8.0)
    }

    fn digital_gain(&mut self) -> Result<f64, CameraError> {
        Ok(1.0)
    }

    fn resolution(&self) -> (u32, u32) {
        Self::NATIVE_RESOLUTION
    }

    fn capture_jpeg(&mut self, output: (u32, u32)) -> Result<Vec<u8>, CameraError> {
        let (width, height) = output;
        if width == 0 || height == 0 {
            return Err(CameraError::CaptureFailed(format!(
                "invalid output size {width}x{height}"
            )));
        }

        self.frames_captured += 1;
        let tint = (self.frames_captured % 256) as u8;
        let pattern = RgbImage::from_fn(width, height, |x, y| {
            let lx = (x * 255 / width) as u8;
            let ly = (y * 255 / height) as u8;
            Rgb([lx, ly, tint])
        });

        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(pattern)
            .write_to(&mut buf, ImageFormat::Jpeg)
            .map_err(|e| CameraError::CaptureFailed(format!("jpeg encode failed: {e}")))?;
        Ok(buf.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_produces_decodable_jpeg_at_requested_size() {
        let mut cam = SimCamera::new(SensorPreset::DAYTIME);
        let jpeg = cam.capture_jpeg((160, 120)).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 160);
        assert_eq!(decoded.height(), 120);
        assert_eq!(cam.frames_captured(), 1);
    }

    #[test]
    fn test_capture_rejects_zero_size() {
        let mut cam = SimCamera::new(SensorPreset::DAYTIME);
        assert!(cam.capture_jpeg((0, 120)).is_err());
    }

    #[test]
    fn test_exposure_script_then_settled_constant() {
        let mut cam = SimCamera::new(SensorPreset::DAYTIME).with_exposure_script(vec![5, 7]);
        assert_eq!(cam.exposure_speed().unwrap(), 5);
        assert_eq!(cam.exposure_speed().unwrap(), 7);
        assert_eq!(cam.exposure_speed().unwrap(), SimCamera::SETTLED_EXPOSURE_US);
        assert_eq!(cam.exposure_speed().unwrap(), SimCamera::SETTLED_EXPOSURE_US);
    }

    #[test]
    fn test_controls_latch_automatic_state() {
        let mut cam = SimCamera::new(SensorPreset::LOW_LIGHT);
        assert!(!cam.is_fully_automatic());
        cam.set_auto_iso().unwrap();
        cam.set_auto_shutter().unwrap();
        cam.set_auto_white_balance().unwrap();
        cam.set_exposure_mode(ExposureMode::Night).unwrap();
        assert!(cam.is_fully_automatic());
        assert_eq!(cam.exposure_mode(), ExposureMode::Night);
        assert_eq!(cam.preset(), SensorPreset::LOW_LIGHT);
    }
}
