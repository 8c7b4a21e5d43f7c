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

//! Lexer module for the Minnow compiler.
//!
//! This module tokenizes Minnow source code into a stream of tokens.
//! It handles:
//! - Keywords and identifiers
//! - Number literals (decimal, hex with 0x, binary with 0b)
//! - String literals
//! - Operators and punctuation (longest match against the token table)
//! - Comments, including pass-through comments kept for the listing
//!
//! [`Tokenizer`] wraps the lexer with the one-token lookahead the parser
//! consumes.

mod comments;
mod helpers;
mod identifiers;
mod numbers;
mod operators;
mod strings;
mod tokenizer;
mod tokens;

pub use numbers::parse_number_literal;
pub use tokenizer::Tokenizer;
pub use tokens::{
    entry_for, lookup_keyword, lookup_special, Token, TokenCategory, TokenEntry, TokenKind,
    TOKEN_TABLE,
};

use crate::error::CompileError;
use comments::CommentScanner;
use helpers::LexerHelpers;
use identifiers::{is_identifier_start, IdentifierScanner};
use numbers::NumberScanner;
use operators::{OperatorScanner, Special};
use strings::StringScanner;

/// The lexer state for tokenizing source code.
pub struct Lexer<'source> {
    /// The source code being tokenized.
    source: &'source str,
    /// Current byte position in the source.
    position: usize,
    /// Current line number (1-indexed).
    line: usize,
    /// Pass-through comment text not yet taken by the consumer.
    comments: Vec<String>,
}

impl<'source> Lexer<'source> {
    /// Create a new lexer for the given source code.
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            position: 0,
            line: 1,
            comments: Vec::new(),
        }
    }

    /// Get the current line number.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Take the pass-through comments scanned so far.
    pub fn take_comments(&mut self) -> Vec<String> {
        std::mem::take(&mut self.comments)
    }

    /// Get the next token from the source.
    ///
    /// Whitespace and comments between tokens are consumed. At the end of the
    /// source this keeps returning `EndOfInput`.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        loop {
            self.skip_whitespace();

            let Some(c) = self.peek() else {
                let span = self.span_from(self.position, self.line);
                return Ok(Token::end_of_input(span));
            };

            if c.is_ascii_digit() {
                return self.scan_number();
            }
            if is_identifier_start(c) {
                return Ok(self.scan_identifier());
            }
            if c == '"' {
                return self.scan_string();
            }

            match self.scan_special() {
                Special::Token(token) => return Ok(token),
                Special::Comment(opener) => self.skip_comment(opener)?,
            }
        }
    }

    /// Tokenize the entire source, excluding the final `EndOfInput`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token.kind == TokenKind::EndOfInput {
                return Ok(tokens);
            }
            tokens.push(token);
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.advance();
        }
    }
}

/// Tokenize source code into a vector of tokens.
pub fn tokenize(source: &str) -> Result<Vec<Token>, CompileError> {
    Lexer::new(source).tokenize()
}
