mod config;
mod input;
mod policy;
mod reasons;
mod rules;

#[cfg(test)]
mod tests;

pub use config::{
    AmountThresholds, CategoricalWeights, DecisionCutoffs, RiskConfig, RiskConfigError,
    ScoreOverrides, ScoreWeights, DEFAULT_PRODUCT_TYPE,
};
pub use input::{NormalizedTransaction, TransactionInput};
pub use policy::Decision;
pub use reasons::{Reason, ReasonLog, REASON_SEPARATOR};
pub use rules::{HARD_BLOCK_REASON, HARD_BLOCK_SCORE};

use policy::decide_outcome;
use rules::RuleOutcome;
use serde::Serialize;
use tracing::debug;

/// Stateless evaluator bound to one immutable configuration. Safe to share
/// across threads; every call is independent of every other.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    config: RiskConfig,
}

impl RiskEngine {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    pub fn evaluate(&self, input: &TransactionInput) -> DecisionResult {
        evaluate(input, &self.config)
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}

/// Decision, score and audit trail for one transaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecisionResult {
    pub decision: Decision,
    pub risk_score: i32,
    pub reasons: ReasonLog,
}

/// Normalizes `input` and runs the rule set against it.
pub fn evaluate(input: &TransactionInput, config: &RiskConfig) -> DecisionResult {
    evaluate_normalized(&input.normalize(), config)
}

pub fn evaluate_normalized(txn: &NormalizedTransaction, config: &RiskConfig) -> DecisionResult {
    let result = match rules::score_transaction(txn, config) {
        RuleOutcome::HardBlock(reasons) => DecisionResult {
            decision: Decision::Rejected,
            risk_score: HARD_BLOCK_SCORE,
            reasons,
        },
        RuleOutcome::Scored(ledger) => {
            let risk_score = ledger.score();
            DecisionResult {
                decision: decide_outcome(risk_score, &config.score_to_decision),
                risk_score,
                reasons: ledger.into_reasons(),
            }
        }
    };

    debug!(
        decision = %result.decision,
        risk_score = result.risk_score,
        reasons = result.reasons.len(),
        "transaction scored"
    );
    result
}
