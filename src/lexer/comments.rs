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

//! Comment scanning for the lexer.
//!
//! Plain comments are discarded. Pass-through comments (`/*-- ... */` and
//! `//-- ...`) keep their text so it can be copied into the listing.

use super::helpers::LexerHelpers;
use super::tokens::{TokenEntry, TokenKind};
use super::Lexer;
use crate::error::{CompileError, ErrorCode};

/// Trait for comment scanning operations.
pub trait CommentScanner<'source> {
    /// Consume a comment whose opener is at the cursor.
    fn skip_comment(&mut self, opener: &TokenEntry) -> Result<(), CompileError>;
}

impl<'source> CommentScanner<'source> for Lexer<'source> {
    fn skip_comment(&mut self, opener: &TokenEntry) -> Result<(), CompileError> {
        let start = self.position;
        let line = self.line;
        self.advance_by(opener.text.len());
        let body_start = self.position;

        let body = match opener.kind {
            TokenKind::LineComment | TokenKind::PassThroughLineComment => {
                while self.peek().is_some_and(|c| c != '\n') {
                    self.advance();
                }
                &self.source[body_start..self.position]
            }
            _ => {
                let Some(close) = self.rest().find("*/") else {
                    self.advance_by(self.rest().len());
                    return Err(CompileError::new(
                        ErrorCode::UnterminatedComment,
                        "unterminated block comment",
                        self.span_from(start, line),
                    )
                    .with_hint("close the comment with '*/'"));
                };
                self.advance_by(close);
                let body = &self.source[body_start..self.position];
                self.advance_by(2);
                body
            }
        };

        match opener.kind {
            TokenKind::PassThroughBlockComment => {
                let text = body.trim();
                let text = text.strip_suffix("--").unwrap_or(text).trim_end();
                self.comments.push(text.to_string());
            }
            TokenKind::PassThroughLineComment => {
                self.comments.push(body.trim().to_string());
            }
            _ => {}
        }
        Ok(())
    }
}
