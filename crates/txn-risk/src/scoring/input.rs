use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

use super::config::DEFAULT_PRODUCT_TYPE;

/// Transaction attributes as they arrive at the boundary. Every field is
/// optional and may hold any JSON value; [`TransactionInput::normalize`]
/// turns it into a typed record without ever failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionInput {
    pub chargeback_count: Option<Value>,
    pub ip_risk: Option<Value>,
    pub email_risk: Option<Value>,
    pub device_fingerprint_risk: Option<Value>,
    pub user_reputation: Option<Value>,
    pub hour: Option<Value>,
    pub bin_country: Option<Value>,
    pub ip_country: Option<Value>,
    pub amount_mxn: Option<Value>,
    pub product_type: Option<Value>,
    pub latency_ms: Option<Value>,
    pub customer_txn_30d: Option<Value>,
}

impl TransactionInput {
    /// Builds an input from textual `(column, cell)` pairs such as a CSV row.
    /// Empty cells count as absent; unknown columns are ignored.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut input = Self::default();
        for (column, cell) in fields {
            if cell.is_empty() {
                continue;
            }
            if let Some(slot) = input.slot_mut(column) {
                *slot = Some(Value::String(cell.to_string()));
            }
        }
        input
    }

    fn slot_mut(&mut self, column: &str) -> Option<&mut Option<Value>> {
        let slot = match column {
            "chargeback_count" => &mut self.chargeback_count,
            "ip_risk" => &mut self.ip_risk,
            "email_risk" => &mut self.email_risk,
            "device_fingerprint_risk" => &mut self.device_fingerprint_risk,
            "user_reputation" => &mut self.user_reputation,
            "hour" => &mut self.hour,
            "bin_country" => &mut self.bin_country,
            "ip_country" => &mut self.ip_country,
            "amount_mxn" => &mut self.amount_mxn,
            "product_type" => &mut self.product_type,
            "latency_ms" => &mut self.latency_ms,
            "customer_txn_30d" => &mut self.customer_txn_30d,
            _ => return None,
        };
        Some(slot)
    }

    pub fn normalize(&self) -> NormalizedTransaction {
        NormalizedTransaction {
            chargeback_count: int_or(self.chargeback_count.as_ref(), 0),
            ip_risk: lower_or(self.ip_risk.as_ref(), "low"),
            email_risk: lower_or(self.email_risk.as_ref(), "low"),
            device_fingerprint_risk: lower_or(self.device_fingerprint_risk.as_ref(), "low"),
            user_reputation: lower_or(self.user_reputation.as_ref(), "new"),
            hour: int_or(self.hour.as_ref(), 12),
            bin_country: upper_or(self.bin_country.as_ref(), ""),
            ip_country: upper_or(self.ip_country.as_ref(), ""),
            amount_mxn: float_or(self.amount_mxn.as_ref(), 0.0),
            product_type: lower_or(self.product_type.as_ref(), DEFAULT_PRODUCT_TYPE),
            latency_ms: int_or(self.latency_ms.as_ref(), 0),
            customer_txn_30d: int_or(self.customer_txn_30d.as_ref(), 0),
        }
    }
}

/// Strictly typed transaction record consumed by the rule evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub chargeback_count: i64,
    pub ip_risk: String,
    pub email_risk: String,
    pub device_fingerprint_risk: String,
    pub user_reputation: String,
    pub hour: i64,
    pub bin_country: String,
    pub ip_country: String,
    pub amount_mxn: f64,
    pub product_type: String,
    pub latency_ms: i64,
    pub customer_txn_30d: i64,
}

impl Default for NormalizedTransaction {
    fn default() -> Self {
        TransactionInput::default().normalize()
    }
}

fn stringify(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn lower_or(value: Option<&Value>, default: &str) -> String {
    stringify(value)
        .unwrap_or_else(|| default.to_string())
        .to_lowercase()
}

fn upper_or(value: Option<&Value>, default: &str) -> String {
    stringify(value)
        .unwrap_or_else(|| default.to_string())
        .to_uppercase()
}

fn int_or(value: Option<&Value>, default: i64) -> i64 {
    let parsed = match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate)),
        Some(Value::Bool(flag)) => Some(i64::from(*flag)),
        Some(Value::String(text)) => strip_digit_separators(text.trim()).and_then(|text| {
            text.parse::<i64>()
                .ok()
                .or_else(|| text.parse::<f64>().ok().and_then(truncate))
        }),
        _ => None,
    };
    parsed.unwrap_or(default)
}

fn float_or(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        Some(Value::String(text)) => {
            strip_digit_separators(text.trim()).and_then(|text| text.parse::<f64>().ok())
        }
        _ => None,
    };
    parsed.unwrap_or(default)
}

/// Drops `_` separators that sit between two digits (`1_000` -> `1000`).
/// Any other underscore makes the text unparseable.
fn strip_digit_separators(text: &str) -> Option<Cow<'_, str>> {
    if !text.contains('_') {
        return Some(Cow::Borrowed(text));
    }

    let bytes = text.as_bytes();
    let separated = bytes.iter().enumerate().all(|(index, byte)| {
        *byte != b'_'
            || (index > 0
                && bytes[index - 1].is_ascii_digit()
                && bytes.get(index + 1).is_some_and(u8::is_ascii_digit))
    });

    separated.then(|| Cow::Owned(text.replace('_', "")))
}

fn truncate(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_take_documented_defaults() {
        let txn = TransactionInput::default().normalize();

        assert_eq!(txn.chargeback_count, 0);
        assert_eq!(txn.ip_risk, "low");
        assert_eq!(txn.email_risk, "low");
        assert_eq!(txn.device_fingerprint_risk, "low");
        assert_eq!(txn.user_reputation, "new");
        assert_eq!(txn.hour, 12);
        assert_eq!(txn.bin_country, "");
        assert_eq!(txn.ip_country, "");
        assert_eq!(txn.amount_mxn, 0.0);
        assert_eq!(txn.product_type, "_default");
        assert_eq!(txn.latency_ms, 0);
        assert_eq!(txn.customer_txn_30d, 0);
    }

    #[test]
    fn unparseable_numbers_fall_back_to_defaults() {
        let input: TransactionInput = serde_json::from_value(json!({
            "hour": "late",
            "amount_mxn": "lots",
            "latency_ms": [1, 2],
            "chargeback_count": null,
        }))
        .expect("any json shape deserializes");

        let txn = input.normalize();
        assert_eq!(txn.hour, 12);
        assert_eq!(txn.amount_mxn, 0.0);
        assert_eq!(txn.latency_ms, 0);
        assert_eq!(txn.chargeback_count, 0);
    }

    #[test]
    fn numeric_fields_accept_strings_floats_and_booleans() {
        let input: TransactionInput = serde_json::from_value(json!({
            "hour": " 23 ",
            "latency_ms": 2600.9,
            "chargeback_count": true,
            "customer_txn_30d": "5.0",
            "amount_mxn": "4500.5",
        }))
        .expect("deserializes");

        let txn = input.normalize();
        assert_eq!(txn.hour, 23);
        assert_eq!(txn.latency_ms, 2600);
        assert_eq!(txn.chargeback_count, 1);
        assert_eq!(txn.customer_txn_30d, 5);
        assert_eq!(txn.amount_mxn, 4500.5);
    }

    #[test]
    fn numeric_strings_accept_digit_separators() {
        let input: TransactionInput = serde_json::from_value(json!({
            "amount_mxn": "1_000",
            "latency_ms": "2_600.5",
            "customer_txn_30d": "1_2",
        }))
        .expect("deserializes");

        let txn = input.normalize();
        assert_eq!(txn.amount_mxn, 1000.0);
        assert_eq!(txn.latency_ms, 2600);
        assert_eq!(txn.customer_txn_30d, 12);
    }

    #[test]
    fn misplaced_separators_fall_back_to_defaults() {
        let input: TransactionInput = serde_json::from_value(json!({
            "amount_mxn": "_1000",
            "latency_ms": "1__000",
            "customer_txn_30d": "12_",
            "hour": "1_.5",
        }))
        .expect("deserializes");

        let txn = input.normalize();
        assert_eq!(txn.amount_mxn, 0.0);
        assert_eq!(txn.latency_ms, 0);
        assert_eq!(txn.customer_txn_30d, 0);
        assert_eq!(txn.hour, 12);
    }

    #[test]
    fn strings_are_case_folded_and_coerced() {
        let input: TransactionInput = serde_json::from_value(json!({
            "ip_risk": "HIGH",
            "user_reputation": "Trusted",
            "bin_country": "us",
            "ip_country": "Mx",
            "product_type": 42,
        }))
        .expect("deserializes");

        let txn = input.normalize();
        assert_eq!(txn.ip_risk, "high");
        assert_eq!(txn.user_reputation, "trusted");
        assert_eq!(txn.bin_country, "US");
        assert_eq!(txn.ip_country, "MX");
        assert_eq!(txn.product_type, "42");
    }

    #[test]
    fn text_fields_skip_empty_cells_and_unknown_columns() {
        let input = TransactionInput::from_fields([
            ("transaction_id", "7"),
            ("hour", "3"),
            ("ip_risk", ""),
            ("bin_country", "mx"),
        ]);

        let txn = input.normalize();
        assert_eq!(txn.hour, 3);
        assert_eq!(txn.ip_risk, "low");
        assert_eq!(txn.bin_country, "MX");
    }
}
