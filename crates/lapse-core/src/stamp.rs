//! Capture timestamps and the on-disk filename convention.
//!
//! Every cycle derives one `CaptureStamp` from its wall-clock time and
//! reuses it for the saved filename, the annotation label, and the archive
//! triggers, so all of a cycle's outputs agree on the moment of capture.

use chrono::{Local, NaiveDateTime, Timelike};
use std::path::{Path, PathBuf};

/// A capture moment: local wall-clock time at second precision plus the
/// zone label it was taken in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureStamp {
    time: NaiveDateTime,
    zone: String,
}

impl CaptureStamp {
    /// Stamp the current local time.
    pub fn now() -> Self {
        let now = Local::now();
        Self::new(now.naive_local(), now.format("%Z").to_string())
    }

    /// Build a stamp from parts. Sub-second precision is dropped and the
    /// zone label is made filename-safe (offset zones like `+09:00` carry a
    /// colon).
    pub fn new(time: NaiveDateTime, zone: impl Into<String>) -> Self {
        Self {
            time: time.with_nanosecond(0).unwrap_or(time),
            zone: zone.into().replace(':', ""),
        }
    }

    pub fn time(&self) -> NaiveDateTime {
        self.time
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// `YYYY-MM-DD HH:MM:SS ZONE`, the string drawn onto the image.
    pub fn label(&self) -> String {
        format!("{} {}", self.time.format("%Y-%m-%d %H:%M:%S"), self.zone)
    }

    /// `YYYYMMDD_HHMMSS_ZONE`, the per-cycle file stem.
    pub fn file_stem(&self) -> String {
        format!("{}_{}", self.time.format("%Y%m%d_%H%M%S"), self.zone)
    }

    /// Full path of this cycle's timestamped capture under `root`.
    pub fn capture_path(&self, root: &Path) -> PathBuf {
        root.join(format!("{}.jpg", self.file_stem()))
    }

    /// Parse a file stem produced by [`file_stem`](Self::file_stem).
    pub fn parse_stem(stem: &str) -> Option<Self> {
        let mut parts = stem.splitn(3, '_');
        let date = parts.next()?;
        let time = parts.next()?;
        let zone = parts.next()?;
        if zone.is_empty() {
            return None;
        }
        let time = NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y%m%d %H%M%S").ok()?;
        Some(Self {
            time,
            zone: zone.to_string(),
        })
    }
}
