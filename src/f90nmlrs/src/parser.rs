// f90nmlrs/src/parser.rs

//! Recursive-descent parser turning namelist tokens into a [`Namelist`].

use crate::error::{F90nmlError, Result};
use crate::namelist::{Namelist, NamelistGroup};
use crate::scanner::{Lexer, Token, TokenType};
use crate::value::FortranValue;

/// Largest array a single assignment may build or a repeat count may expand to.
const MAX_ITEMS: usize = 1 << 24;

/// One component of an assignment target, e.g. `obs(2)` in `obs(2)%lat = 1.0`.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    name: String,
    index: Option<Index>,
}

/// A one-dimensional array position, stored zero-based.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Index {
    start: usize,
    stride: usize,
}

/// Parser over a fully scanned token stream.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

impl Parser {
    /// Create a new parser for the given input.
    pub fn new(input: &str) -> Result<Self> {
        let tokens = Lexer::new(input).scan_all()?;
        Ok(Self { tokens, current: 0 })
    }

    /// Parse the input and return a namelist. Text outside of groups is ignored.
    pub fn parse(&mut self) -> Result<Namelist> {
        let mut namelist = Namelist::new();

        while !self.is_at_end() {
            if self.check(TokenType::GroupStart) {
                self.advance();
                let name = self.expect_identifier("Expected group name after '&'")?;
                if name.eq_ignore_ascii_case("end") {
                    continue;
                }
                let group = self.parse_group()?;
                namelist.push_group(&name, group);
            } else {
                self.advance();
            }
        }

        Ok(namelist)
    }

    fn parse_group(&mut self) -> Result<NamelistGroup> {
        let mut group = NamelistGroup::new();

        loop {
            let token = self.peek().clone();
            match token.token_type {
                TokenType::GroupEnd => {
                    self.advance();
                    break;
                }
                TokenType::GroupStart => {
                    // &end / $end terminators
                    self.advance();
                    let name = self.expect_identifier("Expected 'end' after '&'")?;
                    if !name.eq_ignore_ascii_case("end") {
                        return Err(F90nmlError::parse_error(
                            &format!("Group '{}' opened before previous group ended", name),
                            token.line,
                            token.column,
                        ));
                    }
                    break;
                }
                TokenType::Identifier => self.parse_assignment(&mut group)?,
                TokenType::Comma => {
                    self.advance();
                }
                TokenType::Eof => return Err(F90nmlError::UnexpectedEof),
                _ => {
                    return Err(F90nmlError::parse_error(
                        &format!("Expected variable name, found '{}'", token.lexeme),
                        token.line,
                        token.column,
                    ))
                }
            }
        }

        Ok(group)
    }

    fn parse_assignment(&mut self, group: &mut NamelistGroup) -> Result<()> {
        let segments = self.parse_target()?;
        self.expect(TokenType::Assign, "Expected '=' after variable name")?;

        let Some((head, rest)) = segments.split_first() else {
            return Err(F90nmlError::UnexpectedEof);
        };
        let values = self.parse_value_list(&head.name)?;

        assign(group.slot_mut(&head.name), &head.name, head.index, rest, values)
    }

    fn parse_target(&mut self) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();

        loop {
            let name = self.expect_identifier("Expected variable name")?.to_lowercase();
            let index = if self.check(TokenType::LeftParen) {
                Some(self.parse_index(&name)?)
            } else {
                None
            };
            segments.push(Segment { name, index });

            if self.check(TokenType::Percent) {
                self.advance();
            } else {
                break;
            }
        }

        Ok(segments)
    }

    /// Parse `(i)`, `(i:j)`, `(i:j:k)` or `(:)`. Indices are 1-based in the file.
    fn parse_index(&mut self, variable: &str) -> Result<Index> {
        self.advance(); // '('

        let mut parts: Vec<Option<i64>> = vec![None];
        let mut text = String::from("(");

        loop {
            let token = self.advance().clone();
            text.push_str(&token.lexeme);
            match token.token_type {
                TokenType::RightParen => break,
                TokenType::Colon => parts.push(None),
                TokenType::Integer => {
                    let value = token.lexeme.parse::<i64>().map_err(|_| F90nmlError::InvalidIndex {
                        variable: variable.to_string(),
                        index: token.lexeme.clone(),
                        message: "index is not an integer".to_string(),
                    })?;
                    if let Some(last) = parts.last_mut() {
                        *last = Some(value);
                    }
                }
                TokenType::Comma => {
                    return Err(F90nmlError::InvalidIndex {
                        variable: variable.to_string(),
                        index: text,
                        message: "multidimensional indices are not supported".to_string(),
                    })
                }
                TokenType::Eof => return Err(F90nmlError::UnexpectedEof),
                _ => {
                    return Err(F90nmlError::parse_error(
                        &format!("Unexpected '{}' in index of '{}'", token.lexeme, variable),
                        token.line,
                        token.column,
                    ))
                }
            }
        }

        let start = parts[0].unwrap_or(1);
        let stride = parts.get(2).copied().flatten().unwrap_or(1);
        if start < 1 || stride < 1 {
            return Err(F90nmlError::InvalidIndex {
                variable: variable.to_string(),
                index: text,
                message: "start and stride must be positive".to_string(),
            });
        }

        Ok(Index {
            start: (start - 1) as usize,
            stride: stride as usize,
        })
    }

    fn parse_value_list(&mut self, variable: &str) -> Result<Vec<FortranValue>> {
        let mut items = Vec::new();
        let mut after_separator = true;

        loop {
            let token = self.peek().clone();
            match token.token_type {
                TokenType::Comma => {
                    self.advance();
                    // Consecutive separators leave a null in between
                    if after_separator {
                        items.push(FortranValue::Null);
                    }
                    after_separator = true;
                }
                TokenType::GroupEnd | TokenType::GroupStart | TokenType::Eof => break,
                TokenType::Identifier if self.starts_assignment() => break,
                TokenType::Integer if self.peek_type_at(1) == Some(TokenType::Star) => {
                    self.advance();
                    self.advance();
                    let count = token
                        .lexeme
                        .parse::<usize>()
                        .ok()
                        .filter(|count| {
                            items
                                .len()
                                .checked_add(*count)
                                .is_some_and(|total| total <= MAX_ITEMS)
                        })
                        .ok_or_else(|| F90nmlError::InvalidValue {
                            variable: variable.to_string(),
                            value: token.lexeme.clone(),
                            expected_type: format!("repeat count of at most {}", MAX_ITEMS),
                        })?;
                    let value = if self.next_is_value() {
                        self.parse_single_value(variable)?
                    } else {
                        FortranValue::Null
                    };
                    items.extend(std::iter::repeat(value).take(count));
                    after_separator = false;
                }
                _ if token.starts_value() => {
                    items.push(self.parse_single_value(variable)?);
                    after_separator = false;
                }
                _ => {
                    return Err(F90nmlError::parse_error(
                        &format!("Unexpected '{}' in value of '{}'", token.lexeme, variable),
                        token.line,
                        token.column,
                    ))
                }
            }
        }

        Ok(items)
    }

    fn parse_single_value(&mut self, variable: &str) -> Result<FortranValue> {
        if self.check(TokenType::LeftParen) {
            return self.parse_complex(variable);
        }
        let token = self.advance().clone();
        FortranValue::from_token(&token, variable)
    }

    fn parse_complex(&mut self, variable: &str) -> Result<FortranValue> {
        self.advance(); // '('
        let real = self.expect_number(variable)?;
        self.expect(TokenType::Comma, "Expected ',' in complex literal")?;
        let imag = self.expect_number(variable)?;
        self.expect(TokenType::RightParen, "Expected ')' closing complex literal")?;
        Ok(FortranValue::Complex(real, imag))
    }

    fn expect_number(&mut self, variable: &str) -> Result<f64> {
        let token = self.advance().clone();
        FortranValue::from_token(&token, variable)
            .ok()
            .and_then(|value| value.as_f64())
            .ok_or_else(|| F90nmlError::InvalidValue {
                variable: variable.to_string(),
                value: token.lexeme.clone(),
                expected_type: "complex component".to_string(),
            })
    }

    /// An identifier followed by `=`, `(` or `%` begins the next assignment.
    fn starts_assignment(&self) -> bool {
        matches!(
            self.peek_type_at(1),
            Some(TokenType::Assign | TokenType::LeftParen | TokenType::Percent)
        )
    }

    fn next_is_value(&self) -> bool {
        let token = self.peek();
        token.starts_value() && !(token.token_type == TokenType::Identifier && self.starts_assignment())
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> Result<()> {
        let token = self.peek();
        if token.token_type == token_type {
            self.advance();
            Ok(())
        } else if token.token_type == TokenType::Eof {
            Err(F90nmlError::UnexpectedEof)
        } else {
            Err(F90nmlError::parse_error(message, token.line, token.column))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<String> {
        let token = self.peek();
        match token.token_type {
            TokenType::Identifier => {
                let name = token.lexeme.clone();
                self.advance();
                Ok(name)
            }
            TokenType::Eof => Err(F90nmlError::UnexpectedEof),
            _ => Err(F90nmlError::parse_error(message, token.line, token.column)),
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.peek().token_type == token_type
    }

    fn is_at_end(&self) -> bool {
        self.peek().token_type == TokenType::Eof
    }

    fn peek(&self) -> &Token {
        // The scanner always terminates the stream with an Eof token
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn peek_type_at(&self, offset: usize) -> Option<TokenType> {
        self.tokens.get(self.current + offset).map(|t| t.token_type)
    }

    /// Consume the current token and return it. Eof is never consumed.
    fn advance(&mut self) -> &Token {
        let index = self.current.min(self.tokens.len() - 1);
        if !self.is_at_end() {
            self.current += 1;
        }
        &self.tokens[index]
    }
}

/// Write `values` into `slot`, following the remaining target path.
fn assign(
    slot: &mut FortranValue,
    variable: &str,
    index: Option<Index>,
    rest: &[Segment],
    values: Vec<FortranValue>,
) -> Result<()> {
    match index {
        Some(index) => {
            let items = slot.make_array();
            if rest.is_empty() {
                for (offset, value) in values.into_iter().enumerate() {
                    let pos = position(variable, index, offset)?;
                    if items.len() <= pos {
                        items.resize(pos + 1, FortranValue::Null);
                    }
                    items[pos] = value;
                }
                Ok(())
            } else {
                let pos = position(variable, index, 0)?;
                if items.len() <= pos {
                    items.resize(pos + 1, FortranValue::Null);
                }
                assign_component(&mut items[pos], rest, values)
            }
        }
        None if rest.is_empty() => {
            *slot = FortranValue::from_items(values);
            Ok(())
        }
        None => assign_component(slot, rest, values),
    }
}

/// Zero-based array position of the `offset`-th value written through `index`.
fn position(variable: &str, index: Index, offset: usize) -> Result<usize> {
    offset
        .checked_mul(index.stride)
        .and_then(|step| step.checked_add(index.start))
        .filter(|pos| *pos < MAX_ITEMS)
        .ok_or_else(|| F90nmlError::InvalidIndex {
            variable: variable.to_string(),
            index: format!("{}", index.start + 1),
            message: format!("array position exceeds {} elements", MAX_ITEMS),
        })
}

fn assign_component(slot: &mut FortranValue, rest: &[Segment], values: Vec<FortranValue>) -> Result<()> {
    let Some((head, tail)) = rest.split_first() else {
        return Ok(());
    };
    let child = slot
        .make_derived()
        .entry(head.name.clone())
        .or_insert(FortranValue::Null);
    assign(child, &head.name, head.index, tail, values)
}
