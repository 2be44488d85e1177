//! Daemon configuration: CLI flags layered over an optional TOML file
//! layered over defaults.

use clap::Parser;
use lapse_core::{ExposureMode, MeterZone, SensorPreset};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_ROOT: &str = "captures";
const DEFAULT_INTERVAL_SECS: u64 = 60;
const DEFAULT_UPLOAD_HOST: &str = "webcam.wunderground.com";
const DEFAULT_OUTPUT_SIZE: (u32, u32) = (1440, 1080);
const DEFAULT_WARMUP_PASSES: u32 = 3;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error(transparent)]
    Invalid(#[from] lapse_core::types::ParseError),
    #[error("capture interval must be at least 1 second")]
    ZeroInterval,
}

/// Unattended long-duration timelapse capture daemon.
#[derive(Debug, Parser)]
#[command(name = "lapsed", version, about = "Timelapse capture daemon")]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Capture root directory.
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Seconds between captures.
    #[arg(long)]
    pub interval: Option<u64>,

    /// Upload the canonical latest image after each cycle.
    #[arg(long)]
    pub upload: bool,

    /// Initial exposure mode: "auto" or "night".
    #[arg(long)]
    pub exposure_mode: Option<ExposureMode>,

    /// Sensor preset: "daytime" or "low-light".
    #[arg(long)]
    pub sensor_preset: Option<SensorPreset>,

    /// Meter scene brightness each cycle: "full" or "center".
    #[arg(long)]
    pub metering: Option<MeterZone>,

    /// Run one capture cycle and exit.
    #[arg(long)]
    pub oneshot: bool,
}

/// In-tree camera backends. Hardware drivers implement
/// `lapse_hw::CameraControl` out of tree and slot in here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraBackend {
    #[default]
    Sim,
}

/// The optional TOML file; every field falls back to a default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    root: Option<PathBuf>,
    interval_secs: Option<u64>,
    upload: Option<bool>,
    upload_host: Option<String>,
    credential_file: Option<PathBuf>,
    exposure_mode: Option<ExposureMode>,
    sensor_preset: Option<String>,
    output_size: Option<(u32, u32)>,
    metering: Option<MeterZone>,
    warmup_passes: Option<u32>,
    video_source: Option<PathBuf>,
    camera: Option<CameraBackend>,
}

/// Fully resolved daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub interval_secs: u64,
    pub upload: bool,
    pub upload_host: String,
    pub credential_file: PathBuf,
    pub initial_mode: ExposureMode,
    pub preset: SensorPreset,
    pub output_size: (u32, u32),
    pub metering: Option<MeterZone>,
    pub warmup_passes: u32,
    /// Rolling video the post-midnight trigger archives.
    pub video_source: PathBuf,
    pub backend: CameraBackend,
}

impl Config {
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = match &cli.config {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                toml::from_str::<FileConfig>(&contents).map_err(|source| ConfigError::Parse {
                    path: path.clone(),
                    source,
                })?
            }
            None => FileConfig::default(),
        };

        let root = cli
            .root
            .clone()
            .or(file.root)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT));

        let interval_secs = cli
            .interval
            .or(file.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS);
        if interval_secs == 0 {
            return Err(ConfigError::ZeroInterval);
        }

        let preset = match (cli.sensor_preset, file.sensor_preset) {
            (Some(preset), _) => preset,
            (None, Some(name)) => name.parse()?,
            (None, None) => SensorPreset::default(),
        };

        let video_source = file
            .video_source
            .unwrap_or_else(|| root.join("timelapse.mp4"));

        Ok(Self {
            interval_secs,
            upload: cli.upload || file.upload.unwrap_or(false),
            upload_host: file
                .upload_host
                .unwrap_or_else(|| DEFAULT_UPLOAD_HOST.to_string()),
            credential_file: file
                .credential_file
                .unwrap_or_else(default_credential_file),
            initial_mode: cli
                .exposure_mode
                .or(file.exposure_mode)
                .unwrap_or_default(),
            preset,
            output_size: file.output_size.unwrap_or(DEFAULT_OUTPUT_SIZE),
            metering: cli.metering.or(file.metering),
            warmup_passes: file.warmup_passes.unwrap_or(DEFAULT_WARMUP_PASSES),
            video_source,
            backend: file.camera.unwrap_or_default(),
            root,
        })
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// The canonical, continuously overwritten latest image.
    pub fn latest_path(&self) -> PathBuf {
        self.root.join("image.jpg")
    }

    /// Throwaway target for startup warm-up captures.
    pub fn warmup_path(&self) -> PathBuf {
        self.root.join("warmup.jpg")
    }
}

/// `$XDG_CONFIG_HOME/lapse/ftp-credentials`, with the usual HOME fallback.
fn default_credential_file() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        })
        .join("lapse")
        .join("ftp-credentials")
}
