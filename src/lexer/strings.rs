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

//! String literal scanning for the lexer.
//!
//! Strings have no escape sequences: everything up to the next `"` on the
//! same line is the literal's text.

use super::helpers::LexerHelpers;
use super::tokens::{Token, TokenCategory, TokenKind};
use super::Lexer;
use crate::error::{CompileError, ErrorCode};

/// Trait for string scanning operations.
pub trait StringScanner<'source> {
    /// Scan a string literal.
    fn scan_string(&mut self) -> Result<Token, CompileError>;
}

impl<'source> StringScanner<'source> for Lexer<'source> {
    fn scan_string(&mut self) -> Result<Token, CompileError> {
        let start = self.position;
        let line = self.line;
        self.advance(); // consume opening "

        let text_start = self.position;
        loop {
            match self.peek() {
                None | Some('\n') => {
                    return Err(CompileError::new(
                        ErrorCode::UnterminatedString,
                        "unterminated string literal",
                        self.span_from(start, line),
                    )
                    .with_hint("strings must be closed on the line they start"));
                }
                Some('"') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let text = &self.source[text_start..self.position];
        self.advance(); // consume closing "

        Ok(Token::new(
            text,
            TokenKind::StringLiteral,
            TokenCategory::Literal,
            self.span_from(start, line),
        ))
    }
}
