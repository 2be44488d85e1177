//! Long-lived capture session state.

use crate::config::Config;
use lapse_core::{ModeSwitch, SettingsHistory};
use lapse_hw::{CameraControl, ExposureTuner};

/// Everything a capture cycle reads and mutates, consolidated into one
/// value. The guard admits a single cycle at a time, and the worker is the
/// sole owner, so no further locking is needed.
pub struct Session<C: CameraControl> {
    pub cfg: Config,
    pub camera: C,
    pub mode: ModeSwitch,
    pub history: SettingsHistory,
    pub tuner: ExposureTuner,
}

impl<C: CameraControl> Session<C> {
    pub fn new(cfg: Config, camera: C) -> Self {
        let mode = ModeSwitch::new(cfg.initial_mode);
        Self {
            cfg,
            camera,
            mode,
            history: SettingsHistory::new(),
            tuner: ExposureTuner::default(),
        }
    }
}
