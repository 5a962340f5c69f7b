//! Engine configuration
//!
//! The nine-signal rule table is data, not code: weights, caps, and deviation
//! tolerances live in an ordered list of [`SignalSpec`] records so a deployment
//! can tune them without touching scoring logic. The default table is the
//! reference budget summing to 100 points.

use crate::error::ScoreError;
use crate::types::Signal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default maximum tolerated relative deviation for deviation signals.
/// A 100% deviation from baseline zeroes the signal.
pub const DEFAULT_D_MAX: f64 = 1.0;

/// Default network latency cap in milliseconds. Latency at or below the cap
/// earns full credit; above it, credit degrades linearly to zero at 2x the cap.
pub const DEFAULT_LATENCY_CAP_MS: f64 = 300.0;

/// Floor applied to zero baselines before division.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Scoring policy for a single signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SignalKind {
    /// Partial credit falling off linearly with relative deviation
    Deviation { d_max: f64 },
    /// Full credit at or below the cap, linear falloff above it
    HardCap { cap_ms: f64 },
    /// Full or zero credit based on exact digest equality
    BinaryMatch,
    /// Credit proportional to circular closeness on the 24-hour clock
    CircularProximity,
}

/// One row of the rule table: a signal, its point weight, and how it scores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSpec {
    pub signal: Signal,
    pub weight: f64,
    #[serde(flatten)]
    pub kind: SignalKind,
}

/// Policy for binary-match signals whose baseline digest is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingHashPolicy {
    /// Absent baseline counts as a mismatch: zero points. Conservative
    /// default; a brand-new device costs its full weight on first use.
    #[default]
    ZeroPoints,
    /// Absent-hash weights are removed from the denominator and the total is
    /// rescaled back to the 100-point scale.
    Rescale,
}

/// Full engine configuration: the rule table plus cross-cutting knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ordered rule table, one spec per signal
    pub specs: Vec<SignalSpec>,
    /// How to treat binary signals with no stored baseline digest
    #[serde(default)]
    pub missing_hash_policy: MissingHashPolicy,
    /// Division floor for zero baselines
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
}

fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            specs: vec![
                SignalSpec {
                    signal: Signal::TypingSpeed,
                    weight: 15.0,
                    kind: SignalKind::Deviation { d_max: DEFAULT_D_MAX },
                },
                SignalSpec {
                    signal: Signal::KeyHoldTime,
                    weight: 15.0,
                    kind: SignalKind::Deviation { d_max: DEFAULT_D_MAX },
                },
                SignalSpec {
                    signal: Signal::MouseVelocity,
                    weight: 10.0,
                    kind: SignalKind::Deviation { d_max: DEFAULT_D_MAX },
                },
                SignalSpec {
                    signal: Signal::ClickInterval,
                    weight: 10.0,
                    kind: SignalKind::Deviation { d_max: DEFAULT_D_MAX },
                },
                SignalSpec {
                    signal: Signal::ScrollDepth,
                    weight: 10.0,
                    kind: SignalKind::Deviation { d_max: DEFAULT_D_MAX },
                },
                SignalSpec {
                    signal: Signal::NetworkLatency,
                    weight: 10.0,
                    kind: SignalKind::HardCap {
                        cap_ms: DEFAULT_LATENCY_CAP_MS,
                    },
                },
                SignalSpec {
                    signal: Signal::DeviceHash,
                    weight: 15.0,
                    kind: SignalKind::BinaryMatch,
                },
                SignalSpec {
                    signal: Signal::LocationHash,
                    weight: 10.0,
                    kind: SignalKind::BinaryMatch,
                },
                SignalSpec {
                    signal: Signal::TimeOfDay,
                    weight: 5.0,
                    kind: SignalKind::CircularProximity,
                },
            ],
            missing_hash_policy: MissingHashPolicy::ZeroPoints,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl EngineConfig {
    /// Check the rule table for deployment mistakes.
    ///
    /// The engine itself clamps its way past a bad table, so this is an
    /// opt-in check for callers and the CLI rather than a scoring-time gate.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.specs.is_empty() {
            return Err(ScoreError::ConfigError("rule table is empty".to_string()));
        }

        let mut seen = BTreeSet::new();
        for spec in &self.specs {
            if !seen.insert(spec.signal) {
                return Err(ScoreError::ConfigError(format!(
                    "duplicate spec for signal {}",
                    spec.signal.as_str()
                )));
            }
            if !spec.weight.is_finite() || spec.weight < 0.0 {
                return Err(ScoreError::ConfigError(format!(
                    "weight for {} must be a non-negative finite number",
                    spec.signal.as_str()
                )));
            }
            match spec.kind {
                SignalKind::Deviation { d_max } if !(d_max > 0.0) => {
                    return Err(ScoreError::ConfigError(format!(
                        "d_max for {} must be positive",
                        spec.signal.as_str()
                    )));
                }
                SignalKind::HardCap { cap_ms } if !(cap_ms > 0.0) => {
                    return Err(ScoreError::ConfigError(format!(
                        "cap_ms for {} must be positive",
                        spec.signal.as_str()
                    )));
                }
                _ => {}
            }
        }

        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(ScoreError::ConfigError(
                "epsilon must be a positive finite number".to_string(),
            ));
        }

        let total_weight: f64 = self.specs.iter().map(|s| s.weight).sum();
        if (total_weight - 100.0).abs() > 1e-9 {
            return Err(ScoreError::ConfigError(format!(
                "signal weights must sum to 100, got {total_weight}"
            )));
        }

        Ok(())
    }

    /// Sum of all signal weights in the table
    pub fn total_weight(&self) -> f64 {
        self.specs.iter().map(|s| s.weight).sum()
    }

    /// Load a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Serialize the configuration to JSON
    pub fn to_json(&self) -> Result<String, ScoreError> {
        serde_json::to_string_pretty(self).map_err(ScoreError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_table_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.specs.len(), 9);
        assert_eq!(config.total_weight(), 100.0);
    }

    #[test]
    fn test_validate_rejects_bad_weight_sum() {
        let mut config = EngineConfig::default();
        config.specs[0].weight = 20.0;
        assert!(matches!(config.validate(), Err(ScoreError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_duplicate_signal() {
        let mut config = EngineConfig::default();
        config.specs[1].signal = Signal::TypingSpeed;
        assert!(matches!(config.validate(), Err(ScoreError::ConfigError(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_d_max() {
        let mut config = EngineConfig::default();
        config.specs[0].kind = SignalKind::Deviation { d_max: 0.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = EngineConfig::default();
        let json = config.to_json().unwrap();
        let loaded = EngineConfig::from_json(&json).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_spec_kind_serializes_with_tag() {
        let spec = SignalSpec {
            signal: Signal::NetworkLatency,
            weight: 10.0,
            kind: SignalKind::HardCap { cap_ms: 300.0 },
        };
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"kind\":\"hard_cap\""));
        assert!(json.contains("\"cap_ms\":300.0"));
    }
}
