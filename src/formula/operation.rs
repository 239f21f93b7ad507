//! Operation catalog
//!
//! Named generators that turn two band ids into a formula string.
//! The generated string still has to pass the validator before a layer
//! accepts it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A formula generator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "formula", rename_all = "snake_case")]
pub enum Operation {
    /// `(a - b) / (a + b)`
    NormalizedDifference,
    /// `a / b`
    Ratio,
    /// `a - b`
    Difference,
    /// A user-supplied formula, returned as is
    Custom(String),
}

impl Operation {
    /// Produce the formula for bands `a` and `b`
    ///
    /// `Custom` ignores both bands.
    pub fn formula(&self, a: &str, b: &str) -> String {
        match self {
            Operation::NormalizedDifference => format!("({a} - {b}) / ({a} + {b})"),
            Operation::Ratio => format!("{a} / {b}"),
            Operation::Difference => format!("{a} - {b}"),
            Operation::Custom(formula) => formula.clone(),
        }
    }

    /// Build an operation from its kind, supplying the text for `Custom`
    pub fn from_kind(kind: OperationKind, custom_formula: Option<&str>) -> Self {
        match kind {
            OperationKind::NormalizedDifference => Operation::NormalizedDifference,
            OperationKind::Ratio => Operation::Ratio,
            OperationKind::Difference => Operation::Difference,
            OperationKind::Custom => Operation::Custom(custom_formula.unwrap_or_default().to_string()),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::NormalizedDifference => OperationKind::NormalizedDifference,
            Operation::Ratio => OperationKind::Ratio,
            Operation::Difference => OperationKind::Difference,
            Operation::Custom(_) => OperationKind::Custom,
        }
    }

    /// Whether the generator reads the two band ids
    pub fn uses_bands(&self) -> bool {
        !matches!(self, Operation::Custom(_))
    }
}

/// Operation selector without the custom payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    NormalizedDifference,
    Ratio,
    Difference,
    Custom,
}

impl OperationKind {
    pub const ALL: &'static [OperationKind] = &[
        OperationKind::NormalizedDifference,
        OperationKind::Ratio,
        OperationKind::Difference,
        OperationKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::NormalizedDifference => "normalized_difference",
            OperationKind::Ratio => "ratio",
            OperationKind::Difference => "difference",
            OperationKind::Custom => "custom",
        }
    }

    /// Human-readable name
    pub fn label(&self) -> &'static str {
        match self {
            OperationKind::NormalizedDifference => "Normalized Difference",
            OperationKind::Ratio => "Simple Ratio",
            OperationKind::Difference => "Difference",
            OperationKind::Custom => "Custom Formula",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OperationKind::NormalizedDifference => "Standard formula for normalized indices",
            OperationKind::Ratio => "Plain division between two bands",
            OperationKind::Difference => "Plain subtraction between two bands",
            OperationKind::Custom => "Write your own formula",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "normalized_difference" | "nd" => Ok(OperationKind::NormalizedDifference),
            "ratio" => Ok(OperationKind::Ratio),
            "difference" | "diff" => Ok(OperationKind::Difference),
            "custom" => Ok(OperationKind::Custom),
            other => Err(format!(
                "unknown operation '{}' (expected one of: normalized_difference, ratio, difference, custom)",
                other
            )),
        }
    }
}
