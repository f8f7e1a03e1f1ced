use super::config::DecisionCutoffs;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a scored transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Accepted,
    InReview,
    Rejected,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accepted => "ACCEPTED",
            Decision::InReview => "IN_REVIEW",
            Decision::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step function from final score to decision. Scores are never clamped, so
/// anything below `review_at` (negative included) is accepted.
pub(crate) fn decide_outcome(score: i32, cutoffs: &DecisionCutoffs) -> Decision {
    if score >= cutoffs.reject_at {
        Decision::Rejected
    } else if score >= cutoffs.review_at {
        Decision::InReview
    } else {
        Decision::Accepted
    }
}
