//! Money input accepted from forms
//!
//! Amounts arrive either as JSON numbers or as strings typed by a human
//! (`"100,000"`, `"1 500 000"`, `"250_000"`). Only commas, underscores and
//! whitespace are treated as group separators; `.` is always the decimal point.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    /// Parse into a finite number. Returns `None` for empty or malformed text.
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.is_finite().then_some(*n),
            Self::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| *c != ',' && *c != '_' && !c.is_whitespace())
                    .collect();
                if cleaned.is_empty() {
                    return None;
                }
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }
}

impl From<f64> for AmountInput {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}
