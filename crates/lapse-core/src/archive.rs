//! Time-of-day archive triggers and their derived paths.
//!
//! Both triggers compare exact hour/minute equality against the cycle's own
//! stamp. A cycle that is skipped or delayed past its trigger minute simply
//! misses the archive for that day; there is no catch-up.

use chrono::{Days, NaiveDateTime, Timelike};
use std::path::{Path, PathBuf};

/// Per-day noon snapshots, keyed by the capture's own date.
pub const NOON_DIR: &str = "noon_images";
/// Per-day rolled-up videos, keyed by the day they cover.
pub const VIDEO_DIR: &str = "daily_videos";

/// Noon trigger: fires at exactly 12:00 local time. Returns the archive
/// path the capture should additionally be copied to.
pub fn noon_archive(root: &Path, time: NaiveDateTime) -> Option<PathBuf> {
    if time.hour() != 12 || time.minute() != 0 {
        return None;
    }
    Some(
        root.join(NOON_DIR)
            .join(format!("{}_noon.jpg", time.format("%Y%m%d"))),
    )
}

/// Video rollover trigger: fires at exactly 00:45 local time. The rolling
/// video closed out overnight covers the *previous* calendar day, so the
/// archive path is keyed by that date.
pub fn video_archive(root: &Path, time: NaiveDateTime) -> Option<PathBuf> {
    if time.hour() != 0 || time.minute() != 45 {
        return None;
    }
    let previous_day = time.date().checked_sub_days(Days::new(1))?;
    Some(
        root.join(VIDEO_DIR)
            .join(format!("{}.mp4", previous_day.format("%Y%m%d"))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_noon_trigger_uses_capture_date() {
        let root = Path::new("/srv/timelapse");
        let path = noon_archive(root, at(2025, 6, 15, 12, 0, 0)).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/srv/timelapse/noon_images/20250615_noon.jpg")
        );
    }

    #[test]
    fn test_noon_trigger_exact_minute_only() {
        let root = Path::new("/srv/timelapse");
        assert!(noon_archive(root, at(2025, 6, 15, 12, 1, 0)).is_none());
        assert!(noon_archive(root, at(2025, 6, 15, 11, 59, 59)).is_none());
        // Any second within the trigger minute fires.
        assert!(noon_archive(root, at(2025, 6, 15, 12, 0, 30)).is_some());
    }

    #[test]
    fn test_video_trigger_keys_previous_day() {
        let root = Path::new("/srv/timelapse");
        let path = video_archive(root, at(2025, 6, 16, 0, 45, 0)).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/srv/timelapse/daily_videos/20250615.mp4")
        );
    }

    #[test]
    fn test_video_trigger_crosses_month_boundary() {
        let root = Path::new("/srv/timelapse");
        let path = video_archive(root, at(2025, 7, 1, 0, 45, 0)).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/srv/timelapse/daily_videos/20250630.mp4")
        );
    }

    #[test]
    fn test_video_trigger_exact_minute_only() {
        let root = Path::new("/srv/timelapse");
        assert!(video_archive(root, at(2025, 6, 16, 0, 44, 0)).is_none());
        assert!(video_archive(root, at(2025, 6, 16, 1, 45, 0)).is_none());
    }
}
