//! Band-math expression validator
//!
//! Checks a formula string for well-formedness and for references to
//! bands outside an allowed set. Rules run in a fixed order and every
//! applicable rule reports, so the caller can show the whole list at once.
//! Only an empty formula stops the run early.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use log::debug;
use serde::{Deserialize, Serialize};

use super::lexer::{scan, Scanned, Token};

/// A single problem found in a formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormulaError {
    /// Nothing but whitespace
    EmptyFormula,
    /// Characters outside the band-math alphabet, de-duplicated
    IllegalCharacter { characters: Vec<char> },
    /// Band tokens missing from the allowed set, in order of first use
    UnknownBand { tokens: Vec<String> },
    /// `(` and `)` counts differ
    UnbalancedParentheses { open: usize, close: usize },
}

impl FormulaError {
    /// Stable tag for display layers and logs
    pub fn code(&self) -> &'static str {
        match self {
            FormulaError::EmptyFormula => "EMPTY_FORMULA",
            FormulaError::IllegalCharacter { .. } => "ILLEGAL_CHARACTER",
            FormulaError::UnknownBand { .. } => "UNKNOWN_BAND",
            FormulaError::UnbalancedParentheses { .. } => "UNBALANCED_PARENTHESES",
        }
    }
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::EmptyFormula => write!(f, "formula is empty"),
            FormulaError::IllegalCharacter { characters } => {
                let listed: Vec<String> = characters.iter().map(|c| format!("'{}'", c)).collect();
                write!(f, "illegal characters: {}", listed.join(", "))
            }
            FormulaError::UnknownBand { tokens } => {
                write!(f, "unknown bands: {}", tokens.join(", "))
            }
            FormulaError::UnbalancedParentheses { open, close } => write!(
                f,
                "unbalanced parentheses: {} opening, {} closing",
                open, close
            ),
        }
    }
}

/// Outcome of validating one formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True iff `errors` is empty
    pub is_valid: bool,
    /// Every rule that failed, in rule order
    pub errors: Vec<FormulaError>,
    /// Allowed bands the formula references, even when it is invalid
    pub used_bands: BTreeSet<String>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<FormulaError>, used_bands: BTreeSet<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            used_bands,
        }
    }

    /// Find the first error with the given code
    pub fn error(&self, code: &str) -> Option<&FormulaError> {
        self.errors.iter().find(|e| e.code() == code)
    }
}

/// Validate `formula` against the set of band ids it may reference
///
/// Never fails: every problem is an entry in the returned error list.
pub fn validate(formula: &str, allowed_bands: &BTreeSet<String>) -> ValidationResult {
    if formula.trim().is_empty() {
        debug!("Rejected empty formula");
        return ValidationResult::from_parts(vec![FormulaError::EmptyFormula], BTreeSet::new());
    }

    let scanned = scan(formula);
    let mut errors = Vec::new();

    let mut illegal: Vec<char> = Vec::new();
    // a rejected span can still hold allowed characters (a lone `B`)
    let mut push_illegal = |span: &Range<usize>| {
        let chars = formula
            .char_indices()
            .filter(|(at, _)| span.contains(at))
            .map(|(_, c)| c);
        for c in chars {
            if !is_formula_char(c) && !illegal.contains(&c) {
                illegal.push(c);
            }
        }
    };

    let mut used_bands = BTreeSet::new();
    let mut unknown: Vec<String> = Vec::new();

    for (i, item) in scanned.iter().enumerate() {
        match item {
            Scanned::Illegal(span) => push_illegal(span),
            Scanned::Token(Token::Function(_), span) => {
                // a bare function name is just letters
                let called = matches!(scanned.get(i + 1), Some(Scanned::Token(Token::LParen, _)));
                if !called {
                    push_illegal(span);
                }
            }
            Scanned::Token(Token::Band(band), _) => {
                if allowed_bands.contains(band) {
                    used_bands.insert(band.clone());
                } else if !unknown.contains(band) {
                    unknown.push(band.clone());
                }
            }
            Scanned::Token(..) => {}
        }
    }

    if !illegal.is_empty() {
        errors.push(FormulaError::IllegalCharacter {
            characters: illegal,
        });
    }

    if !unknown.is_empty() {
        errors.push(FormulaError::UnknownBand { tokens: unknown });
    }

    let open = formula.chars().filter(|&c| c == '(').count();
    let close = formula.chars().filter(|&c| c == ')').count();
    if open != close {
        errors.push(FormulaError::UnbalancedParentheses { open, close });
    }

    let result = ValidationResult::from_parts(errors, used_bands);
    debug!(
        "Validated formula '{}': valid={} errors={}",
        formula,
        result.is_valid,
        result.errors.len()
    );
    result
}

/// Characters a formula may contain outside of function names
fn is_formula_char(c: char) -> bool {
    c == 'B' || c.is_ascii_digit() || c.is_whitespace() || "+-*/().".contains(c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bands(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_valid_ndvi() {
        let result = validate("(B8 - B4) / (B8 + B4)", &bands(&["B4", "B8"]));
        assert_eq!(
            result,
            ValidationResult {
                is_valid: true,
                errors: vec![],
                used_bands: bands(&["B4", "B8"]),
            }
        );
    }

    #[test]
    fn test_unknown_band_and_unbalanced() {
        let result = validate("(B8 - B99) / (B8 + B4", &bands(&["B4", "B8"]));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec![
                FormulaError::UnknownBand {
                    tokens: vec!["B99".to_string()]
                },
                FormulaError::UnbalancedParentheses { open: 2, close: 1 },
            ]
        );
        assert_eq!(result.used_bands, bands(&["B4", "B8"]));
    }

    #[test]
    fn test_empty_formula_stops_early() {
        let result = validate("   \t", &bands(&["B4"]));
        assert_eq!(result.errors, vec![FormulaError::EmptyFormula]);
        assert!(!result.is_valid);
        assert!(result.used_bands.is_empty());
    }

    #[test]
    fn test_unknown_band_reported_once() {
        let result = validate("B99 + B99 * B7 - B99", &bands(&["B4"]));
        assert_eq!(
            result.errors,
            vec![FormulaError::UnknownBand {
                tokens: vec!["B99".to_string(), "B7".to_string()]
            }]
        );
    }

    #[test]
    fn test_illegal_characters_are_collected() {
        let result = validate("B8 ^ B4 % 2 ^ 3", &bands(&["B4", "B8"]));
        assert_eq!(
            result.errors,
            vec![FormulaError::IllegalCharacter {
                characters: vec!['^', '%']
            }]
        );
        assert_eq!(result.used_bands, bands(&["B4", "B8"]));
    }

    #[test]
    fn test_sqrt_needs_parenthesis() {
        let allowed = bands(&["B4", "B8"]);
        assert!(validate("sqrt(B8 * B4)", &allowed).is_valid);
        assert!(validate("abs (B8 - B4)", &allowed).is_valid);

        let bare = validate("sqrt", &allowed);
        assert_eq!(
            bare.errors,
            vec![FormulaError::IllegalCharacter {
                characters: vec!['s', 'q', 'r', 't']
            }]
        );
    }

    #[test]
    fn test_decimal_constants() {
        let result = validate("((B8 - B4) / (B8 + B4 + 0.5)) * 1.5", &bands(&["B4", "B8"]));
        assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn test_lone_band_letter_is_not_illegal() {
        let result = validate("B + B8", &bands(&["B8"]));
        assert!(result.error("ILLEGAL_CHARACTER").is_none());
        assert_eq!(result.used_bands, bands(&["B8"]));

        let lowercase = validate("b8 + B8", &bands(&["B8"]));
        assert_eq!(
            lowercase.errors,
            vec![FormulaError::IllegalCharacter {
                characters: vec!['b']
            }]
        );
    }

    #[test]
    fn test_error_lookup_by_code() {
        let result = validate("(B8", &bands(&["B8"]));
        assert!(result.error("UNBALANCED_PARENTHESES").is_some());
        assert!(result.error("UNKNOWN_BAND").is_none());
    }
}
