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

//! One-token lookahead stream consumed by the parser.

use super::tokens::{Token, TokenKind};
use super::Lexer;
use crate::error::{CompileError, ErrorCode};

/// A token stream with one token of lookahead.
///
/// Pass-through comments found while scanning the lookahead are held back
/// until that token is matched, so they reach the listing next to the code
/// generated for the constructs around them.
pub struct Tokenizer<'source> {
    lexer: Lexer<'source>,
    lookahead: Token,
    /// Comments that precede the current lookahead.
    pending: Vec<String>,
    /// Comments released by matches and not yet taken.
    ready: Vec<String>,
}

impl<'source> Tokenizer<'source> {
    /// Create a tokenizer and scan the first token.
    pub fn new(source: &'source str) -> Result<Self, CompileError> {
        let mut lexer = Lexer::new(source);
        let lookahead = checked(lexer.next_token()?)?;
        let pending = lexer.take_comments();
        Ok(Self {
            lexer,
            lookahead,
            pending,
            ready: Vec::new(),
        })
    }

    /// Peek at the current token without consuming it.
    pub fn lookahead(&self) -> &Token {
        &self.lookahead
    }

    /// Consume and return the current token.
    ///
    /// When `expected` is given, the current token must be of that kind.
    pub fn match_token(&mut self, expected: Option<TokenKind>) -> Result<Token, CompileError> {
        if let Some(kind) = expected {
            if self.lookahead.kind != kind {
                return Err(CompileError::new(
                    ErrorCode::UnexpectedToken,
                    format!("expected {}, found {}", kind, self.lookahead),
                    self.lookahead.span,
                ));
            }
        }

        let next = checked(self.lexer.next_token()?)?;
        self.ready.append(&mut self.pending);
        self.pending = self.lexer.take_comments();
        Ok(std::mem::replace(&mut self.lookahead, next))
    }

    /// Take the comments released by the matches so far.
    pub fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.ready)
    }

    /// Release every held-back comment, including those before the lookahead.
    pub fn flush_comments(&mut self) -> Vec<String> {
        self.ready.append(&mut self.pending);
        self.take_comments()
    }
}

/// Reject characters that start no token.
fn checked(token: Token) -> Result<Token, CompileError> {
    if token.kind == TokenKind::Invalid {
        return Err(CompileError::new(
            ErrorCode::InvalidCharacter,
            format!("unrecognized character '{}'", token.text),
            token.span,
        ));
    }
    Ok(token)
}
