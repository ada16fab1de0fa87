//! Unit string parser.
//!
//! Accepts the usual spellings of compound units:
//!
//! - Exponents: `m^2`, `m**2`
//! - Multiplication: `USD tC`, `USD*tC`
//! - Division: `USD/tCO2`, `GtCO2 per yr`, `tCO2 yr^-1`
//!
//! # Grammar
//!
//! ```text
//! unit_expr  = term (('/' | 'per') term)*
//! term       = factor (('*' | ' ') factor)*
//! factor     = '(' unit_expr ')' | symbol (('^' | '**') exponent)?
//! symbol     = [a-zA-Z_$%0-9]+ (must start with a letter, '$' or '%')
//! exponent   = '-'? [0-9]+
//! ```
//!
//! A bare `1` is the dimensionless unit, so `1/yr` is accepted.

use super::dimension::Dimension;
use super::registry::UNIT_REGISTRY;
use super::UnitError;
use std::collections::BTreeMap;
use std::fmt;

/// A unit as a product of registered symbols raised to integer powers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedUnit {
    components: BTreeMap<String, i32>,
}

impl ParsedUnit {
    pub fn dimensionless() -> Self {
        Self::default()
    }

    fn symbol(symbol: &str) -> Self {
        Self {
            components: BTreeMap::from([(symbol.to_string(), 1)]),
        }
    }

    pub fn parse(input: &str) -> Result<Self, UnitError> {
        let input = input.trim();
        if input.is_empty() || input == "1" || input == "-" {
            return Ok(Self::dimensionless());
        }
        let mut parser = Parser {
            chars: input.chars().collect(),
            pos: 0,
        };
        let unit = parser.expression()?;
        parser.skip_whitespace();
        match parser.peek() {
            None => Ok(unit),
            Some(c) => Err(UnitError::UnexpectedChar(c)),
        }
    }

    pub fn components(&self) -> &BTreeMap<String, i32> {
        &self.components
    }

    /// Dimension of the unit. Fails on unregistered symbols.
    pub fn dimension(&self) -> Result<Dimension, UnitError> {
        self.components
            .iter()
            .try_fold(Dimension::DIMENSIONLESS, |acc, (symbol, &exp)| {
                let info = UNIT_REGISTRY
                    .lookup(symbol)
                    .ok_or_else(|| UnitError::UnknownUnit(symbol.clone()))?;
                Ok(acc + info.dimension.pow(exp as i8))
            })
    }

    /// Factor converting a value in this unit into base units.
    pub fn factor(&self) -> Result<f64, UnitError> {
        self.components.iter().try_fold(1.0, |acc, (symbol, &exp)| {
            let info = UNIT_REGISTRY
                .lookup(symbol)
                .ok_or_else(|| UnitError::UnknownUnit(symbol.clone()))?;
            Ok(acc * info.factor.powi(exp))
        })
    }

    fn combine(mut self, other: Self, sign: i32) -> Self {
        for (symbol, exp) in other.components {
            *self.components.entry(symbol).or_insert(0) += sign * exp;
        }
        self.components.retain(|_, exp| *exp != 0);
        self
    }

    fn pow(mut self, exp: i32) -> Self {
        self.components.values_mut().for_each(|e| *e *= exp);
        self.components.retain(|_, e| *e != 0);
        self
    }
}

impl fmt::Display for ParsedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return write!(f, "1");
        }
        let parts: Vec<String> = self
            .components
            .iter()
            .map(|(s, e)| match e {
                1 => s.clone(),
                e => format!("{s}^{e}"),
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        let end = self.pos + keyword.len();
        end <= self.chars.len()
            && self.chars[self.pos..end].iter().copied().eq(keyword.chars())
            && self.chars.get(end).map_or(true, |c| c.is_whitespace())
    }

    fn is_symbol_start(c: char) -> bool {
        c.is_alphabetic() || c == '$' || c == '%' || c == '1'
    }

    fn is_symbol_char(c: char) -> bool {
        c.is_alphanumeric() || c == '_' || c == '$' || c == '%'
    }

    fn expression(&mut self) -> Result<ParsedUnit, UnitError> {
        let mut result = self.term()?;
        loop {
            self.skip_whitespace();
            if self.peek() == Some('/') {
                self.pos += 1;
            } else if self.at_keyword("per") {
                self.pos += 3;
            } else {
                return Ok(result);
            }
            let divisor = self.term()?;
            result = result.combine(divisor, -1);
        }
    }

    fn term(&mut self) -> Result<ParsedUnit, UnitError> {
        let mut result = self.factor()?;
        loop {
            let checkpoint = self.pos;
            self.skip_whitespace();
            match self.peek() {
                Some('*') if self.chars.get(self.pos + 1) != Some(&'*') => {
                    self.pos += 1;
                }
                Some(c) if (Self::is_symbol_start(c) || c == '(') && !self.at_keyword("per") => {}
                _ => {
                    self.pos = checkpoint;
                    return Ok(result);
                }
            }
            let factor = self.factor()?;
            result = result.combine(factor, 1);
        }
    }

    fn factor(&mut self) -> Result<ParsedUnit, UnitError> {
        self.skip_whitespace();
        let base = match self.peek() {
            Some('(') => {
                self.pos += 1;
                let inner = self.expression()?;
                self.skip_whitespace();
                if self.peek() != Some(')') {
                    return Err(UnitError::Syntax("missing closing parenthesis".into()));
                }
                self.pos += 1;
                inner
            }
            Some(c) if Self::is_symbol_start(c) => {
                let start = self.pos;
                while self.peek().is_some_and(Self::is_symbol_char) {
                    self.pos += 1;
                }
                let symbol: String = self.chars[start..self.pos].iter().collect();
                if symbol == "1" {
                    ParsedUnit::dimensionless()
                } else {
                    ParsedUnit::symbol(&symbol)
                }
            }
            Some(c) => return Err(UnitError::UnexpectedChar(c)),
            None => return Err(UnitError::Syntax("unexpected end of unit".into())),
        };

        self.skip_whitespace();
        if self.peek() == Some('^') {
            self.pos += 1;
        } else if self.peek() == Some('*') && self.chars.get(self.pos + 1) == Some(&'*') {
            self.pos += 2;
        } else {
            return Ok(base);
        }
        self.skip_whitespace();
        let start = self.pos;
        if self.peek() == Some('-') {
            self.pos += 1;
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        let exp: i32 = text
            .parse()
            .map_err(|_| UnitError::InvalidExponent(text.clone()))?;
        Ok(base.pow(exp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(input: &str) -> Vec<(String, i32)> {
        ParsedUnit::parse(input)
            .unwrap()
            .components()
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect()
    }

    #[test]
    fn equivalent_spellings() {
        let expected = vec![("GtCO2".to_string(), 1), ("yr".to_string(), -1)];
        assert_eq!(components("GtCO2/yr"), expected);
        assert_eq!(components("GtCO2 / yr"), expected);
        assert_eq!(components("GtCO2 per yr"), expected);
        assert_eq!(components("GtCO2 yr^-1"), expected);
        assert_eq!(components("GtCO2 yr**-1"), expected);
    }

    #[test]
    fn compound_units() {
        assert_eq!(
            components("USD/(tCO2*yr)"),
            vec![
                ("USD".to_string(), 1),
                ("tCO2".to_string(), -1),
                ("yr".to_string(), -1)
            ]
        );
        assert_eq!(components("1/yr"), vec![("yr".to_string(), -1)]);
        assert!(components("m/m").is_empty());
    }

    #[test]
    fn errors() {
        assert!(matches!(
            ParsedUnit::parse("GtCO2 / "),
            Err(UnitError::Syntax(_))
        ));
        assert!(matches!(
            ParsedUnit::parse("m^x"),
            Err(UnitError::InvalidExponent(_))
        ));
        assert!(matches!(
            ParsedUnit::parse("(m"),
            Err(UnitError::Syntax(_))
        ));
        assert!(matches!(
            ParsedUnit::parse("furlong").unwrap().dimension(),
            Err(UnitError::UnknownUnit(_))
        ));
    }
}
