// f90nmlrs/src/scanner/token.rs

//! Token types and structures for Fortran namelist lexical analysis.

use std::fmt;

/// A token in the Fortran namelist.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type of token
    pub token_type: TokenType,
    /// The text of the token. String literals hold their unquoted content.
    pub lexeme: String,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, line: usize, column: usize) -> Self {
        Self {
            token_type,
            lexeme,
            line,
            column,
        }
    }

    /// Check whether this token can start a value in a value list.
    pub fn starts_value(&self) -> bool {
        matches!(
            self.token_type,
            TokenType::Integer
                | TokenType::Real
                | TokenType::Logical
                | TokenType::String
                | TokenType::Identifier
                | TokenType::LeftParen
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self.token_type, self.lexeme)
    }
}

/// Types of tokens that can appear in a Fortran namelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    /// Namelist group start (& or $)
    GroupStart,
    /// Namelist group end (/)
    GroupEnd,
    /// Assignment operator (=)
    Assign,
    /// Comma separator (,)
    Comma,
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Colon (:)
    Colon,
    /// Percent sign (%)
    Percent,
    /// Repeat operator (*)
    Star,
    /// Identifier (variable names, group names)
    Identifier,
    /// Integer literal
    Integer,
    /// Real number literal
    Real,
    /// Logical literal (.true., .false.)
    Logical,
    /// String literal
    String,
    /// End of file
    Eof,
}
