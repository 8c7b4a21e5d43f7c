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

//! Operator and punctuation scanning for the lexer.

use super::helpers::LexerHelpers;
use super::tokens::{lookup_special, Token, TokenCategory, TokenEntry, TokenKind};
use super::Lexer;

/// The result of scanning a special sequence.
#[derive(Debug)]
pub enum Special {
    /// An operator or punctuation token.
    Token(Token),
    /// A comment opener; the comment itself is still unconsumed.
    Comment(&'static TokenEntry),
}

/// Trait for operator scanning operations.
pub trait OperatorScanner<'source> {
    /// Scan the longest special sequence at the cursor.
    ///
    /// A character that starts no table entry becomes an `Invalid` token.
    fn scan_special(&mut self) -> Special;
}

impl<'source> OperatorScanner<'source> for Lexer<'source> {
    fn scan_special(&mut self) -> Special {
        let start = self.position;
        let line = self.line;

        match lookup_special(self.rest()) {
            Some(entry) if entry.category == TokenCategory::Comment => Special::Comment(entry),
            Some(entry) => {
                self.advance_by(entry.text.len());
                Special::Token(self.token_from(start, line, entry.kind, entry.category))
            }
            None => {
                self.advance();
                Special::Token(self.token_from(
                    start,
                    line,
                    TokenKind::Invalid,
                    TokenCategory::Invalid,
                ))
            }
        }
    }
}
