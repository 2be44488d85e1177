//! Day/night exposure mode selection with hysteresis.
//!
//! A long reported exposure speed means the sensor is starved for light;
//! past the threshold the camera is moved to its night program. The flip is
//! only allowed from the opposite state, so a single reading hovering near
//! the threshold cannot toggle the mode back and forth.

use crate::types::ExposureMode;

/// Exposure-speed threshold (µs) separating the day and night programs.
pub const NIGHT_THRESHOLD_US: u32 = 62_000;

/// One hysteresis step. Strict inequalities: a reading exactly at the
/// threshold never causes a transition.
pub fn step(current: ExposureMode, exposure_speed: u32) -> ExposureMode {
    match current {
        ExposureMode::Auto if exposure_speed > NIGHT_THRESHOLD_US => ExposureMode::Night,
        ExposureMode::Night if exposure_speed < NIGHT_THRESHOLD_US => ExposureMode::Auto,
        unchanged => unchanged,
    }
}

/// The two-state machine the capture loop re-evaluates after each tuning
/// pass. Lives for the process lifetime; there is no terminal state.
#[derive(Debug)]
pub struct ModeSwitch {
    mode: ExposureMode,
}

impl ModeSwitch {
    pub fn new(initial: ExposureMode) -> Self {
        Self { mode: initial }
    }

    pub fn mode(&self) -> ExposureMode {
        self.mode
    }

    /// Feed a fresh exposure-speed reading and return the (possibly new)
    /// mode. Transitions are logged; no-ops are silent.
    pub fn observe(&mut self, exposure_speed: u32) -> ExposureMode {
        let next = step(self.mode, exposure_speed);
        if next != self.mode {
            tracing::info!(from = %self.mode, to = %next, exposure_speed, "exposure mode transition");
            self.mode = next;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_flips_to_night_above_threshold() {
        let mut switch = ModeSwitch::new(ExposureMode::Auto);
        assert_eq!(switch.observe(70_000), ExposureMode::Night);
    }

    #[test]
    fn test_night_reading_in_night_is_no_op() {
        let mut switch = ModeSwitch::new(ExposureMode::Night);
        assert_eq!(switch.observe(70_000), ExposureMode::Night);
    }

    #[test]
    fn test_night_flips_back_to_auto_below_threshold() {
        let mut switch = ModeSwitch::new(ExposureMode::Night);
        assert_eq!(switch.observe(50_000), ExposureMode::Auto);
    }

    #[test]
    fn test_full_day_night_sequence() {
        let mut switch = ModeSwitch::new(ExposureMode::Auto);
        assert_eq!(switch.observe(70_000), ExposureMode::Night);
        assert_eq!(switch.observe(70_000), ExposureMode::Night);
        assert_eq!(switch.observe(50_000), ExposureMode::Auto);
    }

    #[test]
    fn test_exact_threshold_never_transitions() {
        assert_eq!(
            step(ExposureMode::Auto, NIGHT_THRESHOLD_US),
            ExposureMode::Auto
        );
        assert_eq!(
            step(ExposureMode::Night, NIGHT_THRESHOLD_US),
            ExposureMode::Night
        );
    }
}
