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

//! Parser helper methods for token stream navigation and error handling.
//!
//! This module provides utility methods for the parser including:
//! - Lookahead inspection (lookahead, check)
//! - Token matching and expectation, releasing pass-through comments
//! - Error creation and instruction emission

use super::Parser;
use crate::codegen::Instruction;
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::{Token, TokenCategory, TokenKind};

/// Trait for parser helper operations.
pub trait ParserHelpers<'source> {
    /// Peek at the current token without consuming it.
    fn lookahead(&self) -> &Token;

    /// Get the span of the current token.
    fn lookahead_span(&self) -> Span;

    /// Check if the current token has the given kind.
    fn check(&self, kind: TokenKind) -> bool;

    /// Check if the current token belongs to the given category.
    fn check_category(&self, category: TokenCategory) -> bool;

    /// Consume the current token, optionally requiring its kind.
    ///
    /// Pass-through comments released by the match are copied to the output.
    fn match_token(&mut self, expected: Option<TokenKind>) -> Result<Token, CompileError>;

    /// Consume the current token if it has the given kind.
    fn accept(&mut self, kind: TokenKind) -> Result<bool, CompileError>;

    /// Expect the current token to have the given kind, or return an error.
    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, CompileError>;

    /// Expect an identifier and return its name.
    fn expect_identifier(&mut self, message: &str) -> Result<Token, CompileError>;

    /// Create an error at the current token.
    fn error(&self, code: ErrorCode, message: impl Into<String>) -> CompileError;

    /// Emit one instruction.
    fn emit(&mut self, instruction: Instruction);
}

impl<'source> ParserHelpers<'source> for Parser<'source> {
    fn lookahead(&self) -> &Token {
        self.tokens.lookahead()
    }

    fn lookahead_span(&self) -> Span {
        self.tokens.lookahead().span
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.lookahead().kind == kind
    }

    fn check_category(&self, category: TokenCategory) -> bool {
        self.lookahead().category == category
    }

    fn match_token(&mut self, expected: Option<TokenKind>) -> Result<Token, CompileError> {
        let token = self.tokens.match_token(expected)?;
        for comment in self.tokens.take_comments() {
            self.emitter.comment(&comment);
        }
        Ok(token)
    }

    fn accept(&mut self, kind: TokenKind) -> Result<bool, CompileError> {
        if self.check(kind) {
            self.match_token(None)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Result<Token, CompileError> {
        if self.check(kind) {
            self.match_token(None)
        } else {
            Err(self.error(
                ErrorCode::UnexpectedToken,
                format!("{}, found {}", message, self.lookahead()),
            ))
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Result<Token, CompileError> {
        self.expect(TokenKind::Identifier, message)
    }

    fn error(&self, code: ErrorCode, message: impl Into<String>) -> CompileError {
        CompileError::new(code, message, self.lookahead_span())
    }

    fn emit(&mut self, instruction: Instruction) {
        self.emitter.emit(instruction);
    }
}
