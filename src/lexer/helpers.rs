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

//! Lexer helper methods for character navigation and span creation.
//!
//! This module provides utility methods for the lexer including:
//! - Character stream navigation (peek, peek_next, advance)
//! - Position and line tracking
//! - Span and token creation

use super::tokens::{Token, TokenCategory, TokenKind};
use super::Lexer;
use crate::error::Span;

/// Trait for lexer helper operations.
pub trait LexerHelpers<'source> {
    /// Check if we've reached the end of the source.
    fn is_at_end(&self) -> bool;

    /// Peek at the current character without advancing.
    fn peek(&self) -> Option<char>;

    /// Peek at the next character without advancing.
    fn peek_next(&self) -> Option<char>;

    /// Get the unscanned remainder of the source.
    fn rest(&self) -> &'source str;

    /// Advance to the next character and return it.
    fn advance(&mut self) -> Option<char>;

    /// Advance over `count` bytes of plain text.
    fn advance_by(&mut self, count: usize);

    /// Create a span from a start position and its line to the current position.
    fn span_from(&self, start: usize, line: usize) -> Span;

    /// Create a token whose text is the source slice from `start`.
    fn token_from(&self, start: usize, line: usize, kind: TokenKind, category: TokenCategory)
        -> Token;
}

impl<'source> LexerHelpers<'source> for Lexer<'source> {
    fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_next(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    fn rest(&self) -> &'source str {
        &self.source[self.position..]
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, count: usize) {
        let end = (self.position + count).min(self.source.len());
        while self.position < end {
            if self.advance().is_none() {
                break;
            }
        }
    }

    fn span_from(&self, start: usize, line: usize) -> Span {
        Span::new(start, self.position, line)
    }

    fn token_from(
        &self,
        start: usize,
        line: usize,
        kind: TokenKind,
        category: TokenCategory,
    ) -> Token {
        Token::new(
            &self.source[start..self.position],
            kind,
            category,
            self.span_from(start, line),
        )
    }
}
