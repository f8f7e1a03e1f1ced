use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;
use tracing::warn;

/// Key of the amount threshold used when a product type is not configured.
pub const DEFAULT_PRODUCT_TYPE: &str = "_default";

/// Construction-time failures. The evaluator assumes a well-formed
/// configuration, so every check happens here instead of during scoring.
#[derive(Debug, thiserror::Error)]
pub enum RiskConfigError {
    #[error("amount_thresholds must contain a `_default` entry")]
    MissingDefaultThreshold,
    #[error("amount threshold for `{product_type}` must be a finite number")]
    NonFiniteThreshold { product_type: String },
    #[error("reject_at ({reject_at}) must be greater than review_at ({review_at})")]
    InvertedCutoffs { reject_at: i32, review_at: i32 },
    #[error("invalid risk configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable scoring configuration shared by every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RiskConfig {
    pub amount_thresholds: AmountThresholds,
    pub latency_ms_extreme: i64,
    pub chargeback_hard_block: i64,
    pub score_weights: ScoreWeights,
    pub score_to_decision: DecisionCutoffs,
}

impl RiskConfig {
    /// Parses a JSON document shaped like the serialized configuration and
    /// validates it. Every key is required.
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self, RiskConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, RiskConfigError> {
        Self::from_json_reader(raw.as_bytes())
    }

    /// Substitutes whichever decision cutoffs were supplied.
    pub fn with_overrides(mut self, overrides: ScoreOverrides) -> Self {
        if let Some(reject_at) = overrides.reject_at {
            self.score_to_decision.reject_at = reject_at;
        }
        if let Some(review_at) = overrides.review_at {
            self.score_to_decision.review_at = review_at;
        }
        self
    }

    pub fn validate(&self) -> Result<(), RiskConfigError> {
        let DecisionCutoffs {
            reject_at,
            review_at,
        } = self.score_to_decision;
        if reject_at <= review_at {
            return Err(RiskConfigError::InvertedCutoffs {
                reject_at,
                review_at,
            });
        }
        Ok(())
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            amount_thresholds: AmountThresholds::default(),
            latency_ms_extreme: 2500,
            chargeback_hard_block: 2,
            score_weights: ScoreWeights::default(),
            score_to_decision: DecisionCutoffs::default(),
        }
    }
}

/// Per-product amount thresholds with a mandatory `_default` fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, f64>", into = "BTreeMap<String, f64>")]
pub struct AmountThresholds {
    by_product: BTreeMap<String, f64>,
    fallback: f64,
}

impl AmountThresholds {
    pub fn new(by_product: BTreeMap<String, f64>) -> Result<Self, RiskConfigError> {
        let non_finite = by_product.iter().find(|(_, value)| !value.is_finite());
        if let Some((product_type, _)) = non_finite {
            return Err(RiskConfigError::NonFiniteThreshold {
                product_type: product_type.clone(),
            });
        }

        let fallback = by_product
            .get(DEFAULT_PRODUCT_TYPE)
            .copied()
            .ok_or(RiskConfigError::MissingDefaultThreshold)?;

        Ok(Self {
            by_product,
            fallback,
        })
    }

    /// Threshold for `product_type`, or the `_default` entry when the product
    /// type is not configured.
    pub fn threshold_for(&self, product_type: &str) -> f64 {
        self.by_product
            .get(product_type)
            .copied()
            .unwrap_or(self.fallback)
    }
}

impl Default for AmountThresholds {
    fn default() -> Self {
        let by_product = BTreeMap::from([
            ("digital".to_string(), 2500.0),
            ("physical".to_string(), 6000.0),
            ("subscription".to_string(), 1500.0),
            (DEFAULT_PRODUCT_TYPE.to_string(), 4000.0),
        ]);
        Self {
            by_product,
            fallback: 4000.0,
        }
    }
}

impl TryFrom<BTreeMap<String, f64>> for AmountThresholds {
    type Error = RiskConfigError;

    fn try_from(value: BTreeMap<String, f64>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AmountThresholds> for BTreeMap<String, f64> {
    fn from(value: AmountThresholds) -> Self {
        value.by_product
    }
}

/// Label -> points table. Labels that are not listed score 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoricalWeights(BTreeMap<String, i32>);

impl CategoricalWeights {
    pub fn points_for(&self, label: &str) -> i32 {
        self.0.get(label).copied().unwrap_or(0)
    }
}

impl<const N: usize> From<[(&str, i32); N]> for CategoricalWeights {
    fn from(entries: [(&str, i32); N]) -> Self {
        Self(
            entries
                .into_iter()
                .map(|(label, points)| (label.to_string(), points))
                .collect(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoreWeights {
    pub ip_risk: CategoricalWeights,
    pub email_risk: CategoricalWeights,
    pub device_fingerprint_risk: CategoricalWeights,
    pub user_reputation: CategoricalWeights,
    pub night_hour: i32,
    pub geo_mismatch: i32,
    pub high_amount: i32,
    pub latency_extreme: i32,
    pub new_user_high_amount: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ip_risk: [("low", 0), ("medium", 2), ("high", 4)].into(),
            email_risk: [("low", 0), ("medium", 1), ("high", 3), ("new_domain", 2)].into(),
            device_fingerprint_risk: [("low", 0), ("medium", 2), ("high", 4)].into(),
            user_reputation: [
                ("trusted", -2),
                ("recurrent", -1),
                ("new", 0),
                ("high_risk", 4),
            ]
            .into(),
            night_hour: 1,
            geo_mismatch: 2,
            high_amount: 2,
            latency_extreme: 2,
            new_user_high_amount: 2,
        }
    }
}

/// Score cutoffs; `reject_at` must stay above `review_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecisionCutoffs {
    pub reject_at: i32,
    pub review_at: i32,
}

impl Default for DecisionCutoffs {
    fn default() -> Self {
        Self {
            reject_at: 10,
            review_at: 4,
        }
    }
}

/// Externally tuned decision cutoffs. Values that do not parse as integers
/// are dropped so a bad tuning input never stops the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreOverrides {
    pub reject_at: Option<i32>,
    pub review_at: Option<i32>,
}

impl ScoreOverrides {
    pub fn parse(reject_at: Option<&str>, review_at: Option<&str>) -> Self {
        Self {
            reject_at: parse_cutoff("reject_at", reject_at),
            review_at: parse_cutoff("review_at", review_at),
        }
    }
}

fn parse_cutoff(name: &'static str, raw: Option<&str>) -> Option<i32> {
    let raw = raw?;
    match raw.trim().parse::<i32>() {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(cutoff = name, value = raw, error = %err, "ignoring unparseable cutoff override");
            None
        }
    }
}
