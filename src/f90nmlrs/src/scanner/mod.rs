// f90nmlrs/src/scanner/mod.rs

//! Lexical scanner for Fortran namelist files.

pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenType};

use crate::error::Result;

/// Convenience function to scan a string into tokens.
pub fn scan(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).scan_all()
}
