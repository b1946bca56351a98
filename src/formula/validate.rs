use crate::errors::FormulaError;

/// maximum accepted formula length in bytes
pub const MAX_FORMULA_LENGTH: usize = 200;

/// substrings rejected case-insensitively before any parsing; the grammar
/// already excludes executable syntax, this guards identifier collisions
const FORBIDDEN_PATTERNS: [&str; 6] = ["eval", "function", "import", "require", "process", "exec"];

fn allowed_char(c: char) -> bool {
    matches!(c,
        '0'..='9' | 'a'..='z' | 'A'..='Z'
        | '+' | '-' | '*' | '/' | '(' | ')' | '.' | ' ' | '_')
}

/// validation pass over a raw formula; must run before any evaluation
pub fn validate(formula: &str) -> Result<(), FormulaError> {
    if formula.len() > MAX_FORMULA_LENGTH {
        return Err(FormulaError::Validation {
            reason: format!(
                "formula is {} bytes, maximum is {MAX_FORMULA_LENGTH}",
                formula.len()
            ),
        });
    }

    if let Some(c) = formula.chars().find(|c| !allowed_char(*c)) {
        return Err(FormulaError::Validation {
            reason: format!("character {c:?} is not allowed"),
        });
    }

    let lowered = formula.to_ascii_lowercase();
    for pattern in FORBIDDEN_PATTERNS {
        if lowered.contains(pattern) {
            return Err(FormulaError::Validation {
                reason: format!("forbidden pattern {pattern:?}"),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_arithmetic() {
        assert!(validate("grossWages * 0.015 + (hoursWorked / 4)").is_ok());
    }

    #[test]
    fn test_rejects_over_length() {
        let ok = "1".repeat(MAX_FORMULA_LENGTH);
        assert!(validate(&ok).is_ok());

        let too_long = "1".repeat(MAX_FORMULA_LENGTH + 1);
        assert!(validate(&too_long).is_err());
    }

    #[test]
    fn test_rejects_disallowed_characters() {
        for bad in ["a;b", "x[1]", "1%2", "a=b", "1,2", "1\n2", "x!","é"] {
            assert!(validate(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_rejects_forbidden_patterns_case_insensitive() {
        for bad in ["EVAL", "Function", "ImPoRt", "REQUIRE", "Process", "eXec"] {
            assert!(validate(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn test_forbidden_inside_identifier() {
        // substring containment, not whole-word matching
        assert!(validate("reprocessing + 1").is_err());
    }
}
