//! Bounded FIFO windows over recent camera readings.
//!
//! The capture loop feeds each cycle's automatic settings into these windows
//! so that setting changes can be judged against a short running average
//! rather than a single noisy reading.

use crate::types::WbGains;
use std::collections::VecDeque;

/// How many samples each window retains.
pub const HISTORY_CAP: usize = 5;

/// Bounded FIFO of scalar samples with a running-average query.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    samples: VecDeque<f64>,
}

impl SampleWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample, evicting the oldest once past capacity.
    pub fn push(&mut self, value: f64) {
        self.samples.push_back(value);
        if self.samples.len() > HISTORY_CAP {
            self.samples.pop_front();
        }
    }

    /// Arithmetic mean over the current contents; `None` when empty.
    pub fn average(&self) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.samples.iter().sum::<f64>() / self.samples.len() as f64)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

/// Bounded FIFO of white-balance gain pairs, averaged component-wise.
#[derive(Debug, Clone, Default)]
pub struct GainWindow {
    samples: VecDeque<WbGains>,
}

impl GainWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, gains: WbGains) {
        self.samples.push_back(gains);
        if self.samples.len() > HISTORY_CAP {
            self.samples.pop_front();
        }
    }

    /// Component-wise mean; `None` when empty.
    pub fn average(&self) -> Option<WbGains> {
        if self.samples.is_empty() {
            return None;
        }
        let n = self.samples.len() as f64;
        Some(WbGains {
            red: self.samples.iter().map(|g| g.red).sum::<f64>() / n,
            blue: self.samples.iter().map(|g| g.blue).sum::<f64>() / n,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The three windows the capture loop maintains.
///
/// Brightness is only fed when scene metering is enabled, so its window may
/// stay empty for the life of the process.
#[derive(Debug, Clone, Default)]
pub struct SettingsHistory {
    pub exposure_speed: SampleWindow,
    pub awb_gains: GainWindow,
    pub brightness: SampleWindow,
}

impl SettingsHistory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_caps_at_five() {
        let mut w = SampleWindow::new();
        for v in 1..=6 {
            w.push(v as f64);
        }
        assert_eq!(w.len(), HISTORY_CAP);
        // Oldest of the six is gone; the five most recent remain in order.
        let contents: Vec<f64> = w.iter().collect();
        assert_eq!(contents, vec![2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_window_average() {
        let mut w = SampleWindow::new();
        w.push(10.0);
        w.push(20.0);
        assert_eq!(w.average(), Some(15.0));
    }

    #[test]
    fn test_empty_window_average_is_none() {
        assert_eq!(SampleWindow::new().average(), None);
        assert_eq!(GainWindow::new().average(), None);
    }

    #[test]
    fn test_gain_window_component_wise_average() {
        let mut w = GainWindow::new();
        w.push(WbGains { red: 1.0, blue: 2.0 });
        w.push(WbGains { red: 3.0, blue: 4.0 });
        let avg = w.average().unwrap();
        assert_eq!(avg.red, 2.0);
        assert_eq!(avg.blue, 3.0);
    }

    #[test]
    fn test_gain_window_caps_at_five() {
        let mut w = GainWindow::new();
        for i in 0..7 {
            w.push(WbGains {
                red: i as f64,
                blue: 0.0,
            });
        }
        assert_eq!(w.len(), HISTORY_CAP);
        // Oldest two evicted: mean of 2..=6 is 4.
        assert_eq!(w.average().unwrap().red, 4.0);
    }
}
