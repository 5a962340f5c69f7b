//! Veriscore - Behavioral trust scoring engine for passwordless authentication
//!
//! Veriscore compares the behavioral signals observed during a login attempt
//! (typing, pointer, network, device/location, and time-of-day) against the
//! user's stored baseline profile and emits a bounded trust score in [0, 100]
//! plus per-signal sub-scores for auditing.
//!
//! The engine is a pure function of `(sample, baseline, config)`: no I/O, no
//! mutation, no state across calls. Telemetry collection, profile storage,
//! and session issuance are the hosting layer's business.

pub mod baseline;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod report;
pub mod types;

pub use baseline::BaselineBuilder;
pub use config::{EngineConfig, MissingHashPolicy, SignalKind, SignalSpec};
pub use decision::{Action, AuthDecision, DecisionPolicy};
pub use engine::score;
pub use error::ScoreError;
pub use report::{ReportEncoder, ScoreReport};
pub use types::{BaselineProfile, BehaviorSample, ScoreResult, Signal};

/// Engine version embedded in audit reports
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for audit reports
pub const PRODUCER_NAME: &str = "veriscore";
