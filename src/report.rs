//! Audit report encoding
//!
//! Wraps a score result and decision in a versioned JSON payload with
//! producer and timing metadata, for audit trails and downstream
//! explainability. The engine never logs or persists; the hosting layer
//! decides what to do with the report.

use crate::decision::AuthDecision;
use crate::error::ScoreError;
use crate::types::{BehaviorSample, ScoreResult};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0";

/// Producer metadata stamped on every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// One scored login attempt, packaged for auditing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreReport {
    pub report_version: String,
    pub producer: ReportProducer,
    /// When the collector captured the sample, if it said
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_at_utc: Option<String>,
    pub computed_at_utc: String,
    pub result: ScoreResult,
    pub decision: AuthDecision,
}

/// Encoder producing audit reports with a stable instance ID
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create an encoder with a fresh instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Package a score result and decision into a report
    pub fn encode(
        &self,
        sample: &BehaviorSample,
        result: ScoreResult,
        decision: AuthDecision,
    ) -> ScoreReport {
        ScoreReport {
            report_version: REPORT_VERSION.to_string(),
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: ENGINE_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            observed_at_utc: sample.observed_at.map(|t| t.to_rfc3339()),
            computed_at_utc: Utc::now().to_rfc3339(),
            result,
            decision,
        }
    }

    /// Encode straight to JSON
    pub fn encode_to_json(
        &self,
        sample: &BehaviorSample,
        result: ScoreResult,
        decision: AuthDecision,
        pretty: bool,
    ) -> Result<String, ScoreError> {
        let report = self.encode(sample, result, decision);
        let json = if pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        };
        json.map_err(ScoreError::JsonError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::decision::{Action, DecisionPolicy};
    use crate::engine::score;
    use crate::types::BaselineProfile;
    use pretty_assertions::assert_eq;

    fn scored_attempt() -> (BehaviorSample, ScoreResult, AuthDecision) {
        let sample = BehaviorSample {
            typing_speed: 4.0,
            key_hold_time: 110.0,
            mouse_velocity: 400.0,
            click_interval: 600.0,
            scroll_depth: 0.60,
            network_latency: 80.0,
            device_hash: "a3f1c2".to_string(),
            location_hash: "9c2b77".to_string(),
            time_of_day: 14,
            observed_at: Some(Utc::now()),
        };
        let baseline = BaselineProfile {
            typing_speed: 4.0,
            key_hold_time: 110.0,
            mouse_velocity: 400.0,
            click_interval: 600.0,
            scroll_depth: 0.60,
            network_latency: 80.0,
            device_hash: Some("a3f1c2".to_string()),
            location_hash: Some("9c2b77".to_string()),
            time_of_day: 14.0,
        };
        let result = score(&sample, &baseline, &EngineConfig::default()).unwrap();
        let decision = DecisionPolicy::default().evaluate(&result);
        (sample, result, decision)
    }

    #[test]
    fn test_report_carries_producer_and_decision() {
        let (sample, result, decision) = scored_attempt();
        let encoder = ReportEncoder::with_instance_id("test-instance".to_string());

        let report = encoder.encode(&sample, result, decision);

        assert_eq!(report.report_version, REPORT_VERSION);
        assert_eq!(report.producer.name, PRODUCER_NAME);
        assert_eq!(report.producer.instance_id, "test-instance");
        assert_eq!(report.decision.action, Action::Grant);
        assert_eq!(report.result.total, 100);
        assert!(report.observed_at_utc.is_some());
    }

    #[test]
    fn test_report_json_shape() {
        let (sample, result, decision) = scored_attempt();
        let encoder = ReportEncoder::new();

        let json = encoder
            .encode_to_json(&sample, result, decision, false)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["report_version"], "1.0");
        assert_eq!(value["decision"]["action"], "grant");
        assert_eq!(value["decision"]["trust_score"], 100);
        assert_eq!(value["decision"]["threshold"], 60);
        assert_eq!(value["result"]["sub_scores"]["device_hash"], 15.0);
        assert_eq!(value["result"]["matched_flags"]["location_hash"], true);
    }
}
