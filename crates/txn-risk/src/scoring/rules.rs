use super::config::RiskConfig;
use super::input::NormalizedTransaction;
use super::reasons::{format_amount, Reason, ReasonLog};

/// Token emitted when the hard block short-circuits evaluation.
pub const HARD_BLOCK_REASON: &str = "hard_block:chargebacks>=2+ip_high";
/// Score reported for hard-blocked transactions.
pub const HARD_BLOCK_SCORE: i32 = 100;

const FREQUENCY_BUFFER_MIN_TXN_30D: i64 = 3;
const FREQUENCY_BUFFER_POINTS: i32 = -1;

pub(crate) enum RuleOutcome {
    HardBlock(ReasonLog),
    Scored(ScoreLedger),
}

/// Running score plus the reasons that produced it.
#[derive(Debug, Default)]
pub(crate) struct ScoreLedger {
    score: i32,
    reasons: ReasonLog,
}

impl ScoreLedger {
    /// Applies a signed delta; zero-point matches leave no trace.
    fn add(&mut self, points: i32, label: impl Into<String>) {
        if points == 0 {
            return;
        }
        self.score = self.score.saturating_add(points);
        self.reasons.push(Reason::scored(label, points));
    }

    pub(crate) fn score(&self) -> i32 {
        self.score
    }

    pub(crate) fn into_reasons(self) -> ReasonLog {
        self.reasons
    }
}

pub(crate) fn score_transaction(txn: &NormalizedTransaction, config: &RiskConfig) -> RuleOutcome {
    if is_hard_blocked(txn, config) {
        let mut reasons = ReasonLog::default();
        reasons.push(Reason::fixed(HARD_BLOCK_REASON));
        return RuleOutcome::HardBlock(reasons);
    }

    let weights = &config.score_weights;
    let mut ledger = ScoreLedger::default();

    let categorical = [
        ("ip_risk", &weights.ip_risk, &txn.ip_risk),
        ("email_risk", &weights.email_risk, &txn.email_risk),
        (
            "device_fingerprint_risk",
            &weights.device_fingerprint_risk,
            &txn.device_fingerprint_risk,
        ),
        ("user_reputation", &weights.user_reputation, &txn.user_reputation),
    ];
    for (field, table, value) in categorical {
        ledger.add(table.points_for(value), format!("{field}:{value}"));
    }

    if is_night(txn.hour) {
        ledger.add(weights.night_hour, format!("night_hour:{}", txn.hour));
    }

    if !txn.bin_country.is_empty()
        && !txn.ip_country.is_empty()
        && txn.bin_country != txn.ip_country
    {
        ledger.add(
            weights.geo_mismatch,
            format!("geo_mismatch:{}!={}", txn.bin_country, txn.ip_country),
        );
    }

    let threshold = config.amount_thresholds.threshold_for(&txn.product_type);
    if txn.amount_mxn >= threshold {
        ledger.add(
            weights.high_amount,
            format!(
                "high_amount:{}:{}",
                txn.product_type,
                format_amount(txn.amount_mxn)
            ),
        );
        if txn.user_reputation == "new" {
            ledger.add(weights.new_user_high_amount, "new_user_high_amount");
        }
    }

    if txn.latency_ms >= config.latency_ms_extreme {
        ledger.add(
            weights.latency_extreme,
            format!("latency_extreme:{}ms", txn.latency_ms),
        );
    }

    // Reads the score accumulated by every rule above.
    if matches!(txn.user_reputation.as_str(), "trusted" | "recurrent")
        && txn.customer_txn_30d >= FREQUENCY_BUFFER_MIN_TXN_30D
        && ledger.score() > 0
    {
        ledger.add(FREQUENCY_BUFFER_POINTS, "frequency_buffer");
    }

    RuleOutcome::Scored(ledger)
}

fn is_hard_blocked(txn: &NormalizedTransaction, config: &RiskConfig) -> bool {
    txn.chargeback_count >= config.chargeback_hard_block && txn.ip_risk == "high"
}

fn is_night(hour: i64) -> bool {
    hour >= 22 || hour <= 5
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_skips_zero_point_contributions() {
        let mut ledger = ScoreLedger::default();
        ledger.add(0, "ip_risk:low");
        ledger.add(2, "geo_mismatch:US!=MX");
        ledger.add(-2, "user_reputation:trusted");

        assert_eq!(ledger.score(), 0);
        assert_eq!(
            ledger.into_reasons().to_string(),
            "geo_mismatch:US!=MX(+2);user_reputation:trusted(-2)"
        );
    }

    #[test]
    fn night_window_wraps_midnight() {
        assert!(is_night(22));
        assert!(is_night(0));
        assert!(is_night(5));
        assert!(!is_night(6));
        assert!(!is_night(21));
    }
}
