use crate::scoring::{NormalizedTransaction, RiskConfig, RiskEngine};

pub(super) fn engine() -> RiskEngine {
    RiskEngine::new(RiskConfig::default())
}

/// Daytime, domestic, low-risk transaction from a new user that trips no rule.
pub(super) fn quiet_transaction() -> NormalizedTransaction {
    NormalizedTransaction {
        chargeback_count: 0,
        ip_risk: "low".to_string(),
        email_risk: "low".to_string(),
        device_fingerprint_risk: "low".to_string(),
        user_reputation: "new".to_string(),
        hour: 14,
        bin_country: "MX".to_string(),
        ip_country: "MX".to_string(),
        amount_mxn: 100.0,
        product_type: "digital".to_string(),
        latency_ms: 100,
        customer_txn_30d: 0,
    }
}

pub(super) fn tokens(txn: &NormalizedTransaction) -> Vec<String> {
    crate::scoring::evaluate_normalized(txn, engine().config())
        .reasons
        .tokens()
}
