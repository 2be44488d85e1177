use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A configuration string that did not name a known variant.
#[derive(Debug, Error)]
#[error("unrecognized {what}: {value:?}")]
pub struct ParseError {
    pub(crate) what: &'static str,
    pub(crate) value: String,
}

/// Camera exposure program, selected by the day/night switch.
///
/// `Auto` is the daytime program; `Night` trades frame rate for longer
/// shutter times in low light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExposureMode {
    #[default]
    Auto,
    Night,
}

impl ExposureMode {
    /// The string the camera driver expects for this program.
    pub fn as_str(self) -> &'static str {
        match self {
            ExposureMode::Auto => "auto",
            ExposureMode::Night => "night",
        }
    }
}

impl fmt::Display for ExposureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExposureMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ExposureMode::Auto),
            "night" => Ok(ExposureMode::Night),
            other => Err(ParseError {
                what: "exposure mode",
                value: other.to_string(),
            }),
        }
    }
}

/// Red/blue gain pair reported by the camera's automatic white balance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WbGains {
    pub red: f64,
    pub blue: f64,
}

/// Sensor mode / frame-rate pairing.
///
/// The sensor mode bounds the achievable frame rates, and the frame rate in
/// turn caps the longest shutter time the sensor will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorPreset {
    pub mode: u8,
    pub framerate: u32,
}

impl SensorPreset {
    /// Sensor mode 2: frame rates 1–15 fps.
    pub const DAYTIME: Self = Self { mode: 2, framerate: 1 };
    /// Sensor mode 3: sub-1 fps frame rates, longest shutter times.
    pub const LOW_LIGHT: Self = Self { mode: 3, framerate: 1 };
}

impl Default for SensorPreset {
    fn default() -> Self {
        Self::DAYTIME
    }
}

impl FromStr for SensorPreset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daytime" => Ok(Self::DAYTIME),
            "low-light" => Ok(Self::LOW_LIGHT),
            other => Err(ParseError {
                what: "sensor preset",
                value: other.to_string(),
            }),
        }
    }
}
