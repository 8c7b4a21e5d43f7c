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

//! Identifier and keyword scanning for the lexer.

use super::helpers::LexerHelpers;
use super::tokens::{lookup_keyword, Token, TokenCategory, TokenKind};
use super::Lexer;

/// Trait for identifier scanning operations.
pub trait IdentifierScanner<'source> {
    /// Scan an identifier or keyword.
    fn scan_identifier(&mut self) -> Token;
}

impl<'source> IdentifierScanner<'source> for Lexer<'source> {
    fn scan_identifier(&mut self) -> Token {
        let start = self.position;
        let line = self.line;

        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        match lookup_keyword(&self.source[start..self.position]) {
            Some(entry) => self.token_from(start, line, entry.kind, entry.category),
            None => self.token_from(start, line, TokenKind::Identifier, TokenCategory::Identifier),
        }
    }
}

/// Check if a character can start an identifier.
pub fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_need_whole_word() {
        let mut lexer = Lexer::new("printer");
        let token = lexer.scan_identifier();
        assert_eq!(token.kind, TokenKind::Identifier);
        assert_eq!(token.text, "printer");

        let mut lexer = Lexer::new("println(");
        assert_eq!(lexer.scan_identifier().kind, TokenKind::Println);
    }

    #[test]
    fn test_identifier_with_digits() {
        let mut lexer = Lexer::new("_tmp2 x");
        let token = lexer.scan_identifier();
        assert_eq!(token.text, "_tmp2");
        assert_eq!(token.category, TokenCategory::Identifier);
    }
}
