//! Band-math formulas
//!
//! - Scanner for band references and arithmetic tokens
//! - Validator reporting every rule a formula breaks
//! - Operation catalog generating formulas from two bands

mod lexer;
mod operation;
mod validator;

pub use lexer::is_band_token;
pub use operation::{Operation, OperationKind};
pub use validator::{validate, FormulaError, ValidationResult};
