// f90nmlrs/src/scanner/lexer.rs

//! Low-level lexical analysis for Fortran namelist tokens.

use super::token::{Token, TokenType};
use crate::error::{F90nmlError, Result};

/// Low-level lexer for Fortran namelist tokens.
///
/// Whitespace and comments are consumed between tokens and never emitted.
/// Text outside `&group ... /` blocks is skipped up to the next group marker.
pub struct Lexer {
    input: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
    comment_tokens: Vec<char>,
    in_group: bool,
    after_group_start: bool,
}

impl Lexer {
    /// Create a new lexer for the given input.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
            comment_tokens: vec!['!'],
            in_group: false,
            after_group_start: false,
        }
    }

    /// Set comment tokens (default: ['!']).
    pub fn with_comment_tokens(mut self, tokens: Vec<char>) -> Self {
        self.comment_tokens = tokens;
        self
    }

    /// Scan every token of the input, ending with an `Eof` token.
    pub fn scan_all(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token()?;
            let is_eof = token.token_type == TokenType::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Scan the next token.
    pub fn scan_token(&mut self) -> Result<Token> {
        if self.in_group {
            self.skip_whitespace_and_comments();
        } else {
            self.skip_outside_groups();
        }

        let token = self.next_token()?;
        match token.token_type {
            TokenType::GroupStart => self.in_group = true,
            TokenType::GroupEnd => self.in_group = false,
            // &end and $end close the group they appear in
            TokenType::Identifier
                if self.after_group_start && token.lexeme.eq_ignore_ascii_case("end") =>
            {
                self.in_group = false
            }
            _ => {}
        }
        self.after_group_start = token.token_type == TokenType::GroupStart;
        Ok(token)
    }

    fn next_token(&mut self) -> Result<Token> {
        let line = self.line;
        let column = self.column;

        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenType::Eof, String::new(), line, column));
        };

        let single = match c {
            '&' | '$' => Some(TokenType::GroupStart),
            '/' => Some(TokenType::GroupEnd),
            '=' => Some(TokenType::Assign),
            ',' => Some(TokenType::Comma),
            '(' => Some(TokenType::LeftParen),
            ')' => Some(TokenType::RightParen),
            ':' => Some(TokenType::Colon),
            '%' => Some(TokenType::Percent),
            '*' => Some(TokenType::Star),
            _ => None,
        };
        if let Some(token_type) = single {
            self.advance();
            return Ok(Token::new(token_type, c.to_string(), line, column));
        }

        match c {
            '\'' | '"' => self.scan_string(c, line, column),
            '+' | '-' => self.scan_signed_number(line, column),
            '.' => self.scan_dot(line, column),
            _ if c.is_ascii_digit() => self.scan_number(self.current, line, column),
            _ if c.is_ascii_alphabetic() || c == '_' => Ok(self.scan_identifier(line, column)),
            _ => Err(F90nmlError::parse_error(
                &format!("Unexpected character '{}'", c),
                line,
                column,
            )),
        }
    }

    fn skip_outside_groups(&mut self) {
        loop {
            self.skip_whitespace_and_comments();
            match self.peek() {
                None | Some('&') | Some('$') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if self.comment_tokens.contains(&c) {
                while let Some(c) = self.peek() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn scan_string(&mut self, quote: char, line: usize, column: usize) -> Result<Token> {
        self.advance(); // opening quote
        let mut content = String::new();

        loop {
            match self.peek() {
                None => {
                    return Err(F90nmlError::parse_error(
                        "Unterminated string literal",
                        line,
                        column,
                    ))
                }
                Some(c) if c == quote => {
                    self.advance();
                    // A doubled quote is an escaped quote character
                    if self.peek() == Some(quote) {
                        self.advance();
                        content.push(quote);
                    } else {
                        break;
                    }
                }
                Some(c) => {
                    self.advance();
                    content.push(c);
                }
            }
        }

        Ok(Token::new(TokenType::String, content, line, column))
    }

    fn scan_signed_number(&mut self, line: usize, column: usize) -> Result<Token> {
        let start = self.current;
        let starts_number = match self.peek_at(1) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };

        if !starts_number {
            return Err(F90nmlError::parse_error(
                "Sign must be followed by a number",
                line,
                column,
            ));
        }

        self.advance(); // sign
        self.scan_number(start, line, column)
    }

    fn scan_dot(&mut self, line: usize, column: usize) -> Result<Token> {
        if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            return self.scan_number(self.current, line, column);
        }

        // Logical literal: '.' followed by T or F, then any letters, optional closing '.'
        let start = self.current;
        self.advance();
        while self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            self.advance();
        }
        if self.peek() == Some('.') {
            self.advance();
        }

        let lexeme = self.lexeme_from(start);
        match lexeme.chars().nth(1).map(|c| c.to_ascii_lowercase()) {
            Some('t') | Some('f') => Ok(Token::new(TokenType::Logical, lexeme, line, column)),
            _ => Err(F90nmlError::parse_error(
                &format!("Invalid logical literal '{}'", lexeme),
                line,
                column,
            )),
        }
    }

    /// Scan an integer or real literal. `start` points at the sign, first digit, or dot.
    fn scan_number(&mut self, start: usize, line: usize, column: usize) -> Result<Token> {
        let mut is_real = false;

        self.consume_digits();

        if self.peek() == Some('.') {
            is_real = true;
            self.advance();
            self.consume_digits();
        }

        if self.peek().is_some_and(|c| matches!(c, 'e' | 'E' | 'd' | 'D')) {
            let exponent_follows = match self.peek_at(1) {
                Some(c) if c.is_ascii_digit() => true,
                Some('+') | Some('-') => self.peek_at(2).is_some_and(|c| c.is_ascii_digit()),
                _ => false,
            };
            if exponent_follows {
                is_real = true;
                self.advance(); // exponent marker
                if self.peek().is_some_and(|c| c == '+' || c == '-') {
                    self.advance();
                }
                self.consume_digits();
            }
        }

        // Kind parameter, e.g. 1.0_8 or 2_real64
        if self.peek() == Some('_') {
            self.advance();
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.advance();
            }
        }

        let lexeme = self.lexeme_from(start);
        if lexeme == "." || lexeme == "+." || lexeme == "-." {
            return Err(F90nmlError::parse_error(
                &format!("Invalid number '{}'", lexeme),
                line,
                column,
            ));
        }

        let token_type = if is_real {
            TokenType::Real
        } else {
            TokenType::Integer
        };
        Ok(Token::new(token_type, lexeme, line, column))
    }

    fn scan_identifier(&mut self, line: usize, column: usize) -> Token {
        let start = self.current;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.advance();
        }
        Token::new(TokenType::Identifier, self.lexeme_from(start), line, column)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.input[start..self.current].iter().collect()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.current).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.current + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.input.get(self.current).copied()?;
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }
}
