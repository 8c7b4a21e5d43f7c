// Minnow - A single-pass compiler for a small imperative language
// Copyright (C) 2026  Marcel Joachim Kloubert <marcel@kloubert.dev>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Number scanning for the lexer.
//!
//! This module handles scanning of number literals including:
//! - Decimal numbers
//! - Hexadecimal numbers (0x prefix)
//! - Binary numbers (0b prefix)

use super::helpers::LexerHelpers;
use super::tokens::{Token, TokenCategory, TokenKind};
use super::Lexer;
use crate::error::{CompileError, ErrorCode};

/// Trait for number scanning operations.
pub trait NumberScanner<'source> {
    /// Scan a number literal starting at the current digit.
    fn scan_number(&mut self) -> Result<Token, CompileError>;
}

impl<'source> NumberScanner<'source> for Lexer<'source> {
    fn scan_number(&mut self) -> Result<Token, CompileError> {
        let start = self.position;
        let line = self.line;

        let radix = match (self.peek(), self.peek_next()) {
            (Some('0'), Some('x' | 'X')) => 16,
            (Some('0'), Some('b' | 'B')) => 2,
            _ => 10,
        };
        if radix != 10 {
            self.advance();
            self.advance();
        }

        let digits_start = self.position;
        while let Some(c) = self.peek() {
            if c.is_digit(radix) {
                self.advance();
            } else {
                break;
            }
        }
        let has_digits = self.position > digits_start;

        // A literal glued to a word ("12abc", "0b102") is malformed
        if !has_digits || self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            while self
                .peek()
                .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                self.advance();
            }
            return Err(CompileError::new(
                ErrorCode::InvalidNumber,
                format!(
                    "invalid number literal '{}'",
                    &self.source[start..self.position]
                ),
                self.span_from(start, line),
            ));
        }

        let token = self.token_from(start, line, TokenKind::Number, TokenCategory::Literal);
        if parse_number_literal(&token.text).is_none() {
            return Err(CompileError::new(
                ErrorCode::NumberTooLarge,
                format!("number literal {} is too large", token.text),
                token.span,
            )
            .with_hint(format!("the largest value is {}", i64::MAX)));
        }
        Ok(token)
    }
}

/// Parse the text of a number token.
///
/// Returns `None` when the value does not fit an `i64`.
pub fn parse_number_literal(text: &str) -> Option<i64> {
    let (digits, radix) = match text.get(..2) {
        Some("0x" | "0X") => (&text[2..], 16),
        Some("0b" | "0B") => (&text[2..], 2),
        _ => (text, 10),
    };
    i64::from_str_radix(digits, radix).ok()
}
