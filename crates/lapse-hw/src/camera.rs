//! The camera driver seam.

use lapse_core::{ExposureMode, WbGains};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CameraError {
    #[error("device not found: {0}")]
    DeviceNotFound(String),
    #[error("control write failed: {0}")]
    ControlFailed(String),
    #[error("capture failed: {0}")]
    CaptureFailed(String),
    #[error("device busy")]
    DeviceBusy,
}

/// Control surface of a fixed camera.
///
/// The capture loop only ever talks to this trait; hardware backends (and
/// the in-tree [`SimCamera`](crate::sim::SimCamera)) implement it. Reads
/// take `&mut self` because most drivers go through a mutable device
/// handle even for register reads.
pub trait CameraControl {
    /// Hand iso selection back to the sensor.
    fn set_auto_iso(&mut self) -> Result<(), CameraError>;

    /// Hand shutter-speed selection back to the sensor.
    fn set_auto_shutter(&mut self) -> Result<(), CameraError>;

    /// Select the exposure program.
    fn set_exposure_mode(&mut self, mode: ExposureMode) -> Result<(), CameraError>;

    /// Enable automatic white balance.
    fn set_auto_white_balance(&mut self) -> Result<(), CameraError>;

    /// Effective shutter duration the sensor is currently using, in
    /// microseconds. Zero means auto-exposure has not produced a frame yet.
    fn exposure_speed(&mut self) -> Result<u32, CameraError>;

    /// Current automatic white-balance gains.
    fn awb_gains(&mut self) -> Result<WbGains, CameraError>;

    fn analog_gain(&mut self) -> Result<f64, CameraError>;

    fn digital_gain(&mut self) -> Result<f64, CameraError>;

    /// Native image-port resolution.
    fn resolution(&self) -> (u32, u32);

    /// Capture one JPEG frame, hardware-scaled to the `output` resolution.
    fn capture_jpeg(&mut self, output: (u32, u32)) -> Result<Vec<u8>, CameraError>;
}
