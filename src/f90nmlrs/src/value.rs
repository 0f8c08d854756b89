// f90nmlrs/src/value.rs

//! Core FortranValue enum and conversions from literal tokens.

use crate::error::{F90nmlError, Result};
use crate::scanner::{Token, TokenType};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Represents a Fortran value that can appear in a namelist.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FortranValue {
    /// Integer value
    Integer(i64),

    /// Real (floating-point) value
    Real(f64),

    /// Complex value (real, imaginary), serialized as `{"re": .., "im": ..}`
    #[serde(serialize_with = "serialize_complex")]
    Complex(f64, f64),

    /// Logical (boolean) value
    Logical(bool),

    /// Character string
    Character(String),

    /// Array of values, first element at Fortran index 1
    Array(Vec<FortranValue>),

    /// Derived type components
    DerivedType(BTreeMap<String, FortranValue>),

    /// Null/unset value
    Null,
}

impl FortranValue {
    /// Get the type name as a string.
    pub fn type_name(&self) -> &'static str {
        match self {
            FortranValue::Integer(_) => "integer",
            FortranValue::Real(_) => "real",
            FortranValue::Complex(_, _) => "complex",
            FortranValue::Logical(_) => "logical",
            FortranValue::Character(_) => "character",
            FortranValue::Array(_) => "array",
            FortranValue::DerivedType(_) => "derived_type",
            FortranValue::Null => "null",
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, FortranValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FortranValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Reals and integers both read as f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FortranValue::Real(f) => Some(*f),
            FortranValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FortranValue::Logical(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FortranValue::Character(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[FortranValue]> {
        match self {
            FortranValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_derived(&self) -> Option<&BTreeMap<String, FortranValue>> {
        match self {
            FortranValue::DerivedType(fields) => Some(fields),
            _ => None,
        }
    }

    /// Build a value from a list of parsed items: nothing is null, one item
    /// is a scalar, more is an array.
    pub fn from_items(mut items: Vec<FortranValue>) -> Self {
        match items.len() {
            0 => FortranValue::Null,
            1 => items.remove(0),
            _ => FortranValue::Array(items),
        }
    }

    /// Turn this slot into an array in place and return its elements.
    /// A scalar becomes the first element; null becomes an empty array.
    pub(crate) fn make_array(&mut self) -> &mut Vec<FortranValue> {
        if !matches!(self, FortranValue::Array(_)) {
            let previous = std::mem::replace(self, FortranValue::Array(Vec::new()));
            if let FortranValue::Array(items) = self {
                if !previous.is_null() {
                    items.push(previous);
                }
            }
        }
        match self {
            FortranValue::Array(items) => items,
            _ => unreachable!("slot was just converted to an array"),
        }
    }

    /// Turn this slot into a derived type in place and return its components.
    pub(crate) fn make_derived(&mut self) -> &mut BTreeMap<String, FortranValue> {
        if !matches!(self, FortranValue::DerivedType(_)) {
            *self = FortranValue::DerivedType(BTreeMap::new());
        }
        match self {
            FortranValue::DerivedType(fields) => fields,
            _ => unreachable!("slot was just converted to a derived type"),
        }
    }

    /// Convert a single literal token into a value.
    pub fn from_token(token: &Token, variable: &str) -> Result<Self> {
        let invalid = |expected: &str| F90nmlError::InvalidValue {
            variable: variable.to_string(),
            value: token.lexeme.clone(),
            expected_type: expected.to_string(),
        };

        match token.token_type {
            TokenType::Integer => strip_kind(&token.lexeme)
                .trim_start_matches('+')
                .parse::<i64>()
                .map(FortranValue::Integer)
                .map_err(|_| invalid("integer")),
            TokenType::Real => parse_real(&token.lexeme)
                .map(FortranValue::Real)
                .ok_or_else(|| invalid("real")),
            TokenType::Logical => parse_logical(&token.lexeme)
                .map(FortranValue::Logical)
                .ok_or_else(|| invalid("logical")),
            TokenType::String => Ok(FortranValue::Character(token.lexeme.clone())),
            // Bare words: T/F style logicals, anything else is an undelimited string
            TokenType::Identifier => Ok(parse_logical(&token.lexeme)
                .map(FortranValue::Logical)
                .unwrap_or_else(|| FortranValue::Character(token.lexeme.clone()))),
            _ => Err(invalid("literal")),
        }
    }
}

fn strip_kind(lexeme: &str) -> &str {
    match lexeme.find('_') {
        Some(pos) => &lexeme[..pos],
        None => lexeme,
    }
}

/// Parse a real literal, accepting Fortran `d` exponents and kind suffixes.
pub fn parse_real(lexeme: &str) -> Option<f64> {
    let normalized = strip_kind(lexeme)
        .trim_start_matches('+')
        .replace(['d', 'D'], "e");
    normalized.parse::<f64>().ok()
}

/// Parse a logical literal (`.true.`, `.t.`, `T`, `false`, ...).
pub fn parse_logical(lexeme: &str) -> Option<bool> {
    let lower = lexeme.to_ascii_lowercase();
    match lower.as_str() {
        "t" | "true" => Some(true),
        "f" | "false" => Some(false),
        _ if lower.starts_with(".t") => Some(true),
        _ if lower.starts_with(".f") => Some(false),
        _ => None,
    }
}

/// A map keeps the two parts apart from array values, whose order may be ignored.
fn serialize_complex<S: Serializer>(
    re: &f64,
    im: &f64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(2))?;
    map.serialize_entry("re", re)?;
    map.serialize_entry("im", im)?;
    map.end()
}

impl fmt::Display for FortranValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FortranValue::Integer(i) => write!(f, "{}", i),
            FortranValue::Real(r) => write!(f, "{:?}", r),
            FortranValue::Complex(re, im) => write!(f, "({:?}, {:?})", re, im),
            FortranValue::Logical(true) => write!(f, ".true."),
            FortranValue::Logical(false) => write!(f, ".false."),
            FortranValue::Character(s) => write!(f, "'{}'", s.replace('\'', "''")),
            FortranValue::Array(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.to_string()).collect();
                write!(f, "{}", parts.join(", "))
            }
            FortranValue::DerivedType(fields) => {
                let parts: Vec<String> = fields
                    .iter()
                    .map(|(name, value)| format!("%{} = {}", name, value))
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
            FortranValue::Null => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(token_type: TokenType, lexeme: &str) -> Token {
        Token::new(token_type, lexeme.to_string(), 1, 1)
    }

    #[test]
    fn test_parse_real_variants() {
        assert_eq!(parse_real("1.5d2"), Some(150.0));
        assert_eq!(parse_real("+.25"), Some(0.25));
        assert_eq!(parse_real("3.0_8"), Some(3.0));
        assert_eq!(parse_real("1.e-3"), Some(0.001));
        assert_eq!(parse_real("abc"), None);
    }

    #[test]
    fn test_parse_logical_variants() {
        assert_eq!(parse_logical(".TRUE."), Some(true));
        assert_eq!(parse_logical(".f."), Some(false));
        assert_eq!(parse_logical("T"), Some(true));
        assert_eq!(parse_logical("false"), Some(false));
        assert_eq!(parse_logical("maybe"), None);
    }

    #[test]
    fn test_identifier_token_becomes_string_or_logical() {
        let value = FortranValue::from_token(&token(TokenType::Identifier, "F"), "x").unwrap();
        assert_eq!(value, FortranValue::Logical(false));

        let value =
            FortranValue::from_token(&token(TokenType::Identifier, "netcdf"), "x").unwrap();
        assert_eq!(value, FortranValue::Character("netcdf".to_string()));
    }

    #[test]
    fn test_integer_with_kind() {
        let value =
            FortranValue::from_token(&token(TokenType::Integer, "42_int64"), "n").unwrap();
        assert_eq!(value, FortranValue::Integer(42));
    }

    #[test]
    fn test_make_array_keeps_scalar() {
        let mut slot = FortranValue::Integer(1);
        slot.make_array().push(FortranValue::Integer(2));
        assert_eq!(
            slot,
            FortranValue::Array(vec![FortranValue::Integer(1), FortranValue::Integer(2)])
        );

        let mut empty = FortranValue::Null;
        assert!(empty.make_array().is_empty());
    }

    #[test]
    fn test_from_items() {
        assert_eq!(FortranValue::from_items(vec![]), FortranValue::Null);
        assert_eq!(
            FortranValue::from_items(vec![FortranValue::Logical(true)]),
            FortranValue::Logical(true)
        );
        assert!(FortranValue::from_items(vec![FortranValue::Null, FortranValue::Null])
            .as_array()
            .is_some());
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_complex_serializes_as_parts() {
        let json = serde_json::to_value(FortranValue::Complex(1.0, -2.5)).unwrap();
        assert_eq!(json, serde_json::json!({"re": 1.0, "im": -2.5}));

        let nested = serde_json::to_value(FortranValue::Array(vec![
            FortranValue::Complex(0.0, 1.0),
            FortranValue::Integer(3),
        ]))
        .unwrap();
        assert_eq!(nested[0]["im"], serde_json::json!(1.0));
    }
}
