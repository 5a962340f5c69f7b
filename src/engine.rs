//! Trust scoring engine
//!
//! This module is the core of Veriscore: a pure, stateless function that
//! compares one login attempt's behavioral signals against the user's stored
//! baseline and emits a bounded trust score with per-signal sub-scores.
//!
//! Scoring policies:
//! - Deviation signals earn partial credit falling off linearly with relative
//!   deviation from baseline.
//! - Network latency is hard-capped: full credit at or below the cap, linear
//!   falloff above it.
//! - Device and location digests are all-or-nothing equality checks.
//! - Time of day is scored by circular distance on the 24-hour clock, so a
//!   23:00 login is two hours from a 01:00 baseline, not twenty-two.

use crate::config::{EngineConfig, MissingHashPolicy, SignalKind};
use crate::error::ScoreError;
use crate::types::{BaselineProfile, BehaviorSample, ScoreResult, Signal};
use std::collections::BTreeMap;

/// Score a login attempt against a baseline profile.
///
/// Pure and order-independent: no I/O, no mutation, no state across calls.
/// Identical inputs always produce identical results. Fails only on
/// structurally invalid input; extreme-but-valid behavior is absorbed by
/// floors and clamps.
pub fn score(
    sample: &BehaviorSample,
    baseline: &BaselineProfile,
    config: &EngineConfig,
) -> Result<ScoreResult, ScoreError> {
    sample.validate()?;
    baseline.validate()?;

    let mut sub_scores = BTreeMap::new();
    let mut matched_flags = BTreeMap::new();
    let mut awarded = 0.0;
    let mut total_weight = 0.0;
    // Weight removed from the denominator under the rescale policy when a
    // binary signal has no stored baseline digest.
    let mut excluded_weight = 0.0;

    for spec in &config.specs {
        total_weight += spec.weight;
        let points = match spec.kind {
            SignalKind::Deviation { d_max } => {
                let (current, base) = continuous_pair(spec.signal, sample, baseline);
                deviation_points(current, base, d_max, spec.weight, config.epsilon)
            }
            SignalKind::HardCap { cap_ms } => {
                let (current, _) = continuous_pair(spec.signal, sample, baseline);
                hard_cap_points(current, cap_ms, spec.weight)
            }
            SignalKind::BinaryMatch => {
                let (current, base) = hash_pair(spec.signal, sample, baseline);
                let matched = base.map(|b| b == current).unwrap_or(false);
                matched_flags.insert(spec.signal, matched);

                if base.is_none()
                    && config.missing_hash_policy == MissingHashPolicy::Rescale
                {
                    // Excluded from the denominator entirely
                    excluded_weight += spec.weight;
                    sub_scores.insert(spec.signal, 0.0);
                    continue;
                }
                if matched {
                    spec.weight
                } else {
                    0.0
                }
            }
            SignalKind::CircularProximity => {
                circular_points(sample.time_of_day as f64, baseline.time_of_day, spec.weight)
            }
        };

        sub_scores.insert(spec.signal, points);
        awarded += points;
    }

    // Rescale the remaining weights back up if any were excluded.
    let active_weight = total_weight - excluded_weight;
    let raw_total = if excluded_weight > 0.0 && active_weight > 0.0 {
        awarded * total_weight / active_weight
    } else {
        awarded
    };

    // Final clamp defends against rule tables that don't sum to 100.
    let total = raw_total.clamp(0.0, 100.0).round() as u8;

    Ok(ScoreResult {
        total,
        sub_scores,
        matched_flags,
    })
}

/// Partial credit for a continuous signal, falling off linearly with relative
/// deviation. The epsilon floor keeps a zero baseline from producing NaN.
fn deviation_points(current: f64, baseline: f64, d_max: f64, weight: f64, epsilon: f64) -> f64 {
    let deviation = (current - baseline).abs() / baseline.max(epsilon);
    let ratio = (1.0 - deviation / d_max).max(0.0);
    (weight * ratio).clamp(0.0, weight)
}

/// Full credit at or below the cap, linear falloff to zero at twice the cap.
/// Latency below the cap is network noise, not a behavioral signal.
fn hard_cap_points(current: f64, cap: f64, weight: f64) -> f64 {
    if current <= cap {
        return weight;
    }
    let ratio = (1.0 - (current - cap) / cap).max(0.0);
    (weight * ratio).clamp(0.0, weight)
}

/// Credit proportional to circular closeness of the login hour to the
/// baseline hour. Maximum distance on a 24-hour clock is 12 hours.
fn circular_points(current_hour: f64, baseline_hour: f64, weight: f64) -> f64 {
    let dist = circular_hour_distance(current_hour, baseline_hour);
    (weight * (1.0 - dist / 12.0)).clamp(0.0, weight)
}

/// Minimal distance between two hours going either way around the clock.
pub(crate) fn circular_hour_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(24.0 - diff)
}

fn continuous_pair(
    signal: Signal,
    sample: &BehaviorSample,
    baseline: &BaselineProfile,
) -> (f64, f64) {
    match signal {
        Signal::TypingSpeed => (sample.typing_speed, baseline.typing_speed),
        Signal::KeyHoldTime => (sample.key_hold_time, baseline.key_hold_time),
        Signal::MouseVelocity => (sample.mouse_velocity, baseline.mouse_velocity),
        Signal::ClickInterval => (sample.click_interval, baseline.click_interval),
        Signal::ScrollDepth => (sample.scroll_depth, baseline.scroll_depth),
        Signal::NetworkLatency => (sample.network_latency, baseline.network_latency),
        // Binary and circular signals never reach this lookup
        Signal::DeviceHash | Signal::LocationHash => (0.0, 0.0),
        Signal::TimeOfDay => (sample.time_of_day as f64, baseline.time_of_day),
    }
}

fn hash_pair<'a>(
    signal: Signal,
    sample: &'a BehaviorSample,
    baseline: &'a BaselineProfile,
) -> (&'a str, Option<&'a str>) {
    match signal {
        Signal::DeviceHash => (&sample.device_hash, baseline.device_hash.as_deref()),
        Signal::LocationHash => (&sample.location_hash, baseline.location_hash.as_deref()),
        _ => ("", None),
    }
}
