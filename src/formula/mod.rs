pub mod parse;
pub mod validate;

pub use validate::{validate, MAX_FORMULA_LENGTH};

use crate::errors::FormulaError;

/// evaluate a restricted arithmetic formula over named numeric variables
///
/// runs the validation pass first, then a recursive-descent parse that
/// resolves identifiers against `variables`. division by zero yields a
/// non-finite f64 which callers must screen before using the result.
pub fn evaluate(formula: &str, variables: &[(&str, f64)]) -> Result<f64, FormulaError> {
    validate(formula)?;
    parse::Parser::new(formula, variables).parse()
}
