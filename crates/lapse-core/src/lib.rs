//! lapse-core — Domain logic for the timelapse capture controller.
//!
//! Pure bookkeeping and policy: bounded settings history, day/night
//! exposure hysteresis, capture timestamps with the on-disk filename
//! convention, time-of-day archive triggers, and scene brightness metering.

pub mod archive;
pub mod history;
pub mod metering;
pub mod mode;
pub mod stamp;
pub mod types;

pub use history::SettingsHistory;
pub use metering::MeterZone;
pub use mode::ModeSwitch;
pub use stamp::CaptureStamp;
pub use types::{ExposureMode, SensorPreset, WbGains};
