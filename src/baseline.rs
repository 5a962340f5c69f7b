//! Baseline profile construction
//!
//! The engine itself never learns: it scores a (sample, baseline) pair and
//! forgets both. This module is the collaborator-side convenience that folds
//! trusted samples into a rolling-window profile — running means for the
//! continuous signals, most recent digests for device and location.

use crate::error::ScoreError;
use crate::types::{BaselineProfile, BehaviorSample};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of trusted sessions in the rolling window
pub const DEFAULT_BASELINE_WINDOW: usize = 5;

/// Rolling-window builder for a user's baseline profile.
///
/// Push only samples from sessions the decision layer trusted; a denied
/// attempt folded into the baseline would drift the profile toward the
/// imposter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineBuilder {
    samples: VecDeque<BehaviorSample>,
    window_size: usize,
}

impl Default for BaselineBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE_WINDOW)
    }
}

impl BaselineBuilder {
    /// Create a builder with the given window size
    pub fn new(window_size: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(window_size),
            window_size: window_size.max(1),
        }
    }

    /// Fold a trusted sample into the window, evicting the oldest if full
    pub fn push(&mut self, sample: BehaviorSample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.window_size {
            self.samples.pop_front();
        }
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Build the current baseline profile, or `None` for a brand-new user.
    ///
    /// Continuous signals average across the window. The most recent sample
    /// supplies the expected device and location digests.
    pub fn profile(&self) -> Option<BaselineProfile> {
        let newest = self.samples.back()?;
        let n = self.samples.len() as f64;

        let mean = |f: fn(&BehaviorSample) -> f64| -> f64 {
            self.samples.iter().map(f).sum::<f64>() / n
        };

        Some(BaselineProfile {
            typing_speed: mean(|s| s.typing_speed),
            key_hold_time: mean(|s| s.key_hold_time),
            mouse_velocity: mean(|s| s.mouse_velocity),
            click_interval: mean(|s| s.click_interval),
            scroll_depth: mean(|s| s.scroll_depth),
            network_latency: mean(|s| s.network_latency),
            device_hash: Some(newest.device_hash.clone()),
            location_hash: Some(newest.location_hash.clone()),
            time_of_day: mean(|s| s.time_of_day as f64),
        })
    }

    /// Load builder state from JSON
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        serde_json::from_str(json).map_err(ScoreError::JsonError)
    }

    /// Serialize builder state to JSON
    pub fn to_json(&self) -> Result<String, ScoreError> {
        serde_json::to_string(self).map_err(ScoreError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn make_sample(typing_speed: f64, device: &str) -> BehaviorSample {
        BehaviorSample {
            typing_speed,
            key_hold_time: 110.0,
            mouse_velocity: 400.0,
            click_interval: 600.0,
            scroll_depth: 0.60,
            network_latency: 80.0,
            device_hash: device.to_string(),
            location_hash: "loc-1".to_string(),
            time_of_day: 14,
            observed_at: None,
        }
    }

    #[test]
    fn test_empty_builder_has_no_profile() {
        let builder = BaselineBuilder::default();
        assert!(builder.profile().is_none());
        assert!(builder.is_empty());
    }

    #[test]
    fn test_running_mean() {
        let mut builder = BaselineBuilder::new(5);
        for speed in [3.0, 4.0, 5.0] {
            builder.push(make_sample(speed, "dev-1"));
        }

        let profile = builder.profile().unwrap();
        assert_eq!(profile.typing_speed, 4.0);
        assert_eq!(profile.time_of_day, 14.0);
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_window_eviction() {
        let mut builder = BaselineBuilder::new(3);
        for speed in [1.0, 2.0, 3.0, 4.0, 5.0] {
            builder.push(make_sample(speed, "dev-1"));
        }

        assert_eq!(builder.len(), 3);
        // Only 3, 4, 5 remain
        assert_eq!(builder.profile().unwrap().typing_speed, 4.0);
    }

    #[test]
    fn test_most_recent_hashes_win() {
        let mut builder = BaselineBuilder::new(5);
        builder.push(make_sample(4.0, "old-device"));
        builder.push(make_sample(4.0, "new-device"));

        let profile = builder.profile().unwrap();
        assert_eq!(profile.device_hash.as_deref(), Some("new-device"));
    }

    #[test]
    fn test_builder_json_round_trip() {
        let mut builder = BaselineBuilder::new(5);
        builder.push(make_sample(4.2, "dev-1"));

        let json = builder.to_json().unwrap();
        let loaded = BaselineBuilder::from_json(&json).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(
            builder.profile().unwrap().typing_speed,
            loaded.profile().unwrap().typing_speed
        );
    }
}
