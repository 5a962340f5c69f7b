//! Core types for the Veriscore engine
//!
//! This module defines the data structures that cross the scoring boundary:
//! the observed behavior sample, the stored baseline profile, and the score
//! result returned to the auth decision layer.

use crate::error::ScoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Behavioral signal identifier.
///
/// Serializes to the lower_snake_case wire name used in collector payloads.
/// `Ord` is derived so sub-score maps iterate (and serialize) in a stable
/// order, which keeps identical scoring calls byte-identical on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    TypingSpeed,
    KeyHoldTime,
    MouseVelocity,
    ClickInterval,
    ScrollDepth,
    NetworkLatency,
    DeviceHash,
    LocationHash,
    TimeOfDay,
}

impl Signal {
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::TypingSpeed => "typing_speed",
            Signal::KeyHoldTime => "key_hold_time",
            Signal::MouseVelocity => "mouse_velocity",
            Signal::ClickInterval => "click_interval",
            Signal::ScrollDepth => "scroll_depth",
            Signal::NetworkLatency => "network_latency",
            Signal::DeviceHash => "device_hash",
            Signal::LocationHash => "location_hash",
            Signal::TimeOfDay => "time_of_day",
        }
    }
}

/// Behavioral signals observed during a single login attempt.
///
/// Produced by the browser-side collector (out of scope) as an
/// already-computed feature vector. Hash fields are opaque equality tokens;
/// the engine never decodes or validates their provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSample {
    /// Typing speed in characters per second
    pub typing_speed: f64,
    /// Average key hold time in milliseconds
    pub key_hold_time: f64,
    /// Mouse velocity in pixels per second
    pub mouse_velocity: f64,
    /// Average click interval in milliseconds
    pub click_interval: f64,
    /// Scroll depth as a fraction of page height (0-1)
    pub scroll_depth: f64,
    /// Network round-trip latency in milliseconds
    pub network_latency: f64,
    /// Device fingerprint digest (opaque, equality-only)
    pub device_hash: String,
    /// Location digest (opaque, equality-only)
    pub location_hash: String,
    /// Local hour of the attempt (0-23)
    pub time_of_day: u8,
    /// When the collector captured the sample (provenance only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_at: Option<DateTime<Utc>>,
}

impl BehaviorSample {
    /// Validate that the sample is structurally well-formed.
    ///
    /// Rejects non-finite or negative numerics, scroll depth outside [0, 1],
    /// and hours outside [0, 23]. Empty hashes are allowed (they simply never
    /// match) since hash provenance belongs to the collection layer.
    pub fn validate(&self) -> Result<(), ScoreError> {
        check_non_negative("typing_speed", self.typing_speed)?;
        check_non_negative("key_hold_time", self.key_hold_time)?;
        check_non_negative("mouse_velocity", self.mouse_velocity)?;
        check_non_negative("click_interval", self.click_interval)?;
        check_range("scroll_depth", self.scroll_depth, 0.0, 1.0)?;
        check_non_negative("network_latency", self.network_latency)?;

        if self.time_of_day > 23 {
            return Err(ScoreError::OutOfRange {
                field: "time_of_day",
                value: self.time_of_day as f64,
                min: 0.0,
                max: 23.0,
            });
        }
        Ok(())
    }
}

/// Historical central tendencies for a user's behavioral signals.
///
/// Continuous fields hold running means over recent trusted sessions.
/// Hash fields are either the canonical digest or absent; absent means the
/// device/location has never been recorded, and the corresponding binary
/// signal scores zero under the default policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineProfile {
    pub typing_speed: f64,
    pub key_hold_time: f64,
    pub mouse_velocity: f64,
    pub click_interval: f64,
    pub scroll_depth: f64,
    pub network_latency: f64,
    /// Canonical device digest, if one has been recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_hash: Option<String>,
    /// Canonical location digest, if one has been recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_hash: Option<String>,
    /// Mean login hour (0-24, fractional since it averages whole hours)
    pub time_of_day: f64,
}

impl BaselineProfile {
    /// Validate that every required numeric field is finite and in range.
    pub fn validate(&self) -> Result<(), ScoreError> {
        check_non_negative("typing_speed", self.typing_speed)?;
        check_non_negative("key_hold_time", self.key_hold_time)?;
        check_non_negative("mouse_velocity", self.mouse_velocity)?;
        check_non_negative("click_interval", self.click_interval)?;
        check_range("scroll_depth", self.scroll_depth, 0.0, 1.0)?;
        check_non_negative("network_latency", self.network_latency)?;
        check_range("time_of_day", self.time_of_day, 0.0, 24.0)?;
        Ok(())
    }

    /// Load a profile from JSON
    pub fn from_json(json: &str) -> Result<Self, ScoreError> {
        let profile: Self = serde_json::from_str(json)?;
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize the profile to JSON
    pub fn to_json(&self) -> Result<String, ScoreError> {
        serde_json::to_string(self).map_err(ScoreError::JsonError)
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ScoreError> {
    if !value.is_finite() {
        return Err(ScoreError::NonFiniteField { field, value });
    }
    if value < 0.0 {
        return Err(ScoreError::NegativeField { field, value });
    }
    Ok(())
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), ScoreError> {
    if !value.is_finite() {
        return Err(ScoreError::NonFiniteField { field, value });
    }
    if value < min || value > max {
        return Err(ScoreError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Result of scoring one login attempt.
///
/// Constructed fresh per call, immutable, never retained by the engine.
/// `sub_scores` and `matched_flags` are always populated so the decision
/// layer can explain a denial signal by signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Aggregate trust score (0-100)
    pub total: u8,
    /// Points awarded per signal (each <= that signal's weight)
    pub sub_scores: BTreeMap<Signal, f64>,
    /// Equality outcome for the binary-match signals
    pub matched_flags: BTreeMap<Signal, bool>,
}
