//! Accept/deny policy
//!
//! Thin layer over the engine output: compares the trust score against a
//! configured threshold. Kept separate from scoring so a deployment can swap
//! thresholds (or the whole scorer) without touching the other.

use crate::types::ScoreResult;
use serde::{Deserialize, Serialize};

/// Default trust score required to grant access
pub const DEFAULT_THRESHOLD: u8 = 60;

/// Outcome of the threshold comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Grant,
    Deny,
}

/// Threshold policy applied to score results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Minimum trust score that still grants access (inclusive)
    pub threshold: u8,
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Decision handed back to the hosting auth layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthDecision {
    pub action: Action,
    pub trust_score: u8,
    pub threshold: u8,
}

impl DecisionPolicy {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }

    /// Compare a score result against the threshold. Meeting the threshold
    /// exactly grants access.
    pub fn evaluate(&self, result: &ScoreResult) -> AuthDecision {
        let action = if result.total >= self.threshold {
            Action::Grant
        } else {
            Action::Deny
        };
        AuthDecision {
            action,
            trust_score: result.total,
            threshold: self.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn result_with_total(total: u8) -> ScoreResult {
        ScoreResult {
            total,
            sub_scores: BTreeMap::new(),
            matched_flags: BTreeMap::new(),
        }
    }

    #[test]
    fn test_threshold_is_inclusive_on_the_accept_side() {
        let policy = DecisionPolicy::default();

        assert_eq!(policy.evaluate(&result_with_total(60)).action, Action::Grant);
        assert_eq!(policy.evaluate(&result_with_total(59)).action, Action::Deny);
        assert_eq!(policy.evaluate(&result_with_total(100)).action, Action::Grant);
        assert_eq!(policy.evaluate(&result_with_total(0)).action, Action::Deny);
    }

    #[test]
    fn test_decision_echoes_score_and_threshold() {
        let policy = DecisionPolicy::new(75);
        let decision = policy.evaluate(&result_with_total(74));

        assert_eq!(decision.action, Action::Deny);
        assert_eq!(decision.trust_score, 74);
        assert_eq!(decision.threshold, 75);
    }

    #[test]
    fn test_action_serialization() {
        assert_eq!(serde_json::to_string(&Action::Grant).unwrap(), "\"grant\"");
        assert_eq!(serde_json::to_string(&Action::Deny).unwrap(), "\"deny\"");
    }
}
