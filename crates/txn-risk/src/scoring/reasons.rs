use serde::{Serialize, Serializer};
use std::fmt;

/// Separator used when the reason log is rendered as a single string.
pub const REASON_SEPARATOR: char = ';';

/// One audit entry: which rule fired and how many points it contributed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reason {
    label: String,
    points: Option<i32>,
}

impl Reason {
    pub(crate) fn scored(label: impl Into<String>, points: i32) -> Self {
        Self {
            label: label.into(),
            points: Some(points),
        }
    }

    /// A reason without a point delta, used by the hard block.
    pub(crate) fn fixed(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            points: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> Option<i32> {
        self.points
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.points {
            // Negative numerals already carry their sign.
            Some(points) if points >= 0 => write!(f, "{}(+{})", self.label, points),
            Some(points) => write!(f, "{}({})", self.label, points),
            None => f.write_str(&self.label),
        }
    }
}

/// Append-only, ordered log of reasons for a single evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReasonLog(Vec<Reason>);

impl ReasonLog {
    pub(crate) fn push(&mut self, reason: Reason) {
        self.0.push(reason);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reason> {
        self.0.iter()
    }

    /// Rendered tokens in evaluation order, e.g. `night_hour:23(+1)`.
    pub fn tokens(&self) -> Vec<String> {
        self.0.iter().map(Reason::to_string).collect()
    }

    /// Whether any rendered token equals `token` exactly.
    pub fn contains(&self, token: &str) -> bool {
        self.0.iter().any(|reason| reason.to_string() == token)
    }
}

impl<'a> IntoIterator for &'a ReasonLog {
    type Item = &'a Reason;
    type IntoIter = std::slice::Iter<'a, Reason>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Display for ReasonLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, reason) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "{REASON_SEPARATOR}")?;
            }
            write!(f, "{reason}")?;
        }
        Ok(())
    }
}

impl Serialize for ReasonLog {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Renders an amount the way it appears inside reason tokens: shortest
/// round-trip form that always keeps a fractional part (`6000.0`, `4500.5`).
/// Magnitudes below `1e-4` or from `1e16` up switch to exponent form with a
/// signed, two-digit exponent (`1e+16`, `1.5e-05`).
pub(crate) fn format_amount(amount: f64) -> String {
    let magnitude = amount.abs();
    if !amount.is_finite() || amount == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return format!("{amount:?}");
    }

    let scientific = format!("{amount:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => scientific,
    }
}
