use crate::errors::FormulaError;

/// recursive-descent parser over the restricted arithmetic grammar:
///
/// ```text
/// expr   := term (('+' | '-') term)*
/// term   := factor (('*' | '/') factor)*
/// factor := '-' factor | '(' expr ')' | number | identifier
/// ```
///
/// identifiers are lexed whole and resolved against the variable map, which
/// gives word-boundary substitution semantics: a variable name that is a
/// prefix of a longer identifier never matches. only the space character is
/// skippable between tokens.
pub struct Parser<'a> {
    src: &'a [u8],
    pos: usize,
    variables: &'a [(&'a str, f64)],
}

impl<'a> Parser<'a> {
    pub fn new(src: &'a str, variables: &'a [(&'a str, f64)]) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            variables,
        }
    }

    /// parse the whole input; trailing tokens are an error
    pub fn parse(mut self) -> Result<f64, FormulaError> {
        let value = self.expr()?;
        self.skip_spaces();
        match self.peek() {
            None => Ok(value),
            Some(c) => Err(self.error(format!("unexpected character {:?}", c as char))),
        }
    }

    fn expr(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.term()?;
        loop {
            self.skip_spaces();
            match self.peek() {
                Some(b'+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(b'-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, FormulaError> {
        let mut value = self.factor()?;
        loop {
            self.skip_spaces();
            match self.peek() {
                Some(b'*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some(b'/') => {
                    self.pos += 1;
                    // division by zero intentionally produces a non-finite
                    // value; the rule calculator screens for it
                    value /= self.factor()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, FormulaError> {
        self.skip_spaces();
        match self.peek() {
            Some(b'-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some(b'(') => {
                self.pos += 1;
                let value = self.expr()?;
                self.skip_spaces();
                if self.peek() == Some(b')') {
                    self.pos += 1;
                    Ok(value)
                } else {
                    Err(self.error("expected closing parenthesis".to_string()))
                }
            }
            Some(c) if c.is_ascii_digit() || c == b'.' => self.number(),
            Some(c) if c.is_ascii_alphabetic() || c == b'_' => self.identifier(),
            Some(c) => Err(self.error(format!("unexpected character {:?}", c as char))),
            None => Err(self.error("unexpected end of formula".to_string())),
        }
    }

    fn number(&mut self) -> Result<f64, FormulaError> {
        let start = self.pos;
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            match c {
                b'0'..=b'9' => self.pos += 1,
                b'.' if !seen_dot => {
                    seen_dot = true;
                    self.pos += 1;
                }
                _ => break,
            }
        }

        // the token only spans ASCII bytes, so the slice is valid utf-8
        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        text.parse::<f64>().map_err(|_| FormulaError::Parse {
            position: start,
            message: format!("invalid number {text:?}"),
        })
    }

    fn identifier(&mut self) -> Result<f64, FormulaError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }

        let name = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or_default();
        self.variables
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| *v)
            .ok_or_else(|| FormulaError::Parse {
                position: start,
                message: format!("unknown variable {name:?}"),
            })
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_spaces(&mut self) {
        while self.peek() == Some(b' ') {
            self.pos += 1;
        }
    }

    fn error(&self, message: String) -> FormulaError {
        FormulaError::Parse {
            position: self.pos,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str, vars: &[(&str, f64)]) -> Result<f64, FormulaError> {
        Parser::new(src, vars).parse()
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("2 + 3 * 4 - 6 / 2", &[]).unwrap(), 11.0);
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(eval("20 - 5 - 3", &[]).unwrap(), 12.0);
        assert_eq!(eval("24 / 4 / 2", &[]).unwrap(), 3.0);
    }

    #[test]
    fn test_nested_parens() {
        assert_eq!(eval("((1 + 2) * (3 + 4))", &[]).unwrap(), 21.0);
    }

    #[test]
    fn test_unary_minus_chains() {
        assert_eq!(eval("--5", &[]).unwrap(), 5.0);
        assert_eq!(eval("-(2 + 3)", &[]).unwrap(), -5.0);
    }

    #[test]
    fn test_decimal_numbers() {
        assert_eq!(eval("0.5 + .25", &[]).unwrap(), 0.75);
    }

    #[test]
    fn test_two_dots_rejected() {
        assert!(eval("1.2.3", &[]).is_err());
    }

    #[test]
    fn test_adjacent_values_rejected() {
        assert!(eval("1 2", &[]).is_err());
        let vars = [("a", 1.0), ("b", 2.0)];
        assert!(eval("a b", &vars).is_err());
    }

    #[test]
    fn test_unbalanced_parens() {
        assert!(eval("(1 + 2", &[]).is_err());
        assert!(eval("1 + 2)", &[]).is_err());
    }

    #[test]
    fn test_identifier_resolution() {
        let vars = [("rate", 0.02), ("rate_cap", 0.5)];
        assert_eq!(eval("rate * 100", &vars).unwrap(), 2.0);
        assert_eq!(eval("rate_cap * 2", &vars).unwrap(), 1.0);
    }

    #[test]
    fn test_error_positions() {
        match eval("1 + @", &[]) {
            Err(FormulaError::Parse { position, .. }) => assert_eq!(position, 4),
            other => panic!("expected parse error, got {other:?}"),
        }
    }
}
