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

//! Token definitions for the Minnow language.
//!
//! Keywords, operators, punctuation and comment openers all live in one
//! fixed table. Keywords are found by exact match on a scanned word; special
//! sequences by the longest table entry that prefixes the input.

use crate::error::Span;
use std::fmt;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structure keywords
    Program,
    EndProgram,
    Main,
    Var,
    Function,
    Return,

    // Control flow keywords
    If,
    Else,
    While,
    Repeat,
    Until,
    For,
    To,
    Down,
    Step,
    Break,
    Continue,

    // I/O and builtins
    Print,
    Println,
    Read,
    Addr,

    // Logical keywords
    And,
    Or,
    Not,
    True,
    False,

    // Scope modifiers
    Global,
    Package,
    External,

    // Type keywords
    Int,
    Byte,
    String,
    Pointer,
    Void,

    // Arithmetic and bitwise operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    ShiftLeft,
    ShiftRight,
    Ampersand,
    Pipe,
    Caret,
    Tilde,

    // Assignment and comparison
    Assign,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Comma,
    Semicolon,
    Colon,

    // Comment openers (never reach the parser)
    BlockComment,
    PassThroughBlockComment,
    LineComment,
    PassThroughLineComment,

    // Everything else
    Identifier,
    Number,
    StringLiteral,
    EndOfInput,
    Invalid,
}

/// Groups of tokens the parser dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Statement and declaration keywords.
    Keyword,
    /// Scope modifiers (`global`, `package`, `external`).
    ScopeModifier,
    /// Type names, including `void`.
    TypeName,
    /// `+ - | ^`
    Additive,
    /// `* / % << >> &`
    Multiplicative,
    /// `== != < <= > >=`
    Relational,
    /// `or`
    BooleanOr,
    /// `and`
    BooleanAnd,
    /// `not` and `~`
    Unary,
    /// `true` and `false`
    BooleanLiteral,
    /// Tokens that close a statement list: `}`, `endprogram` and end of input.
    BlockEnd,
    /// Comment openers.
    Comment,
    /// Brackets, separators and `=`.
    Punctuation,
    /// Number and string literals.
    Literal,
    /// User-defined names.
    Identifier,
    /// Characters that start no token.
    Invalid,
}

/// One row of the token table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenEntry {
    pub text: &'static str,
    pub kind: TokenKind,
    pub category: TokenCategory,
}

const fn entry(text: &'static str, kind: TokenKind, category: TokenCategory) -> TokenEntry {
    TokenEntry {
        text,
        kind,
        category,
    }
}

use TokenCategory as C;
use TokenKind as K;

/// Every keyword, operator, punctuation mark and comment opener.
pub const TOKEN_TABLE: &[TokenEntry] = &[
    entry("program", K::Program, C::Keyword),
    entry("endprogram", K::EndProgram, C::BlockEnd),
    entry("main", K::Main, C::Keyword),
    entry("var", K::Var, C::Keyword),
    entry("function", K::Function, C::Keyword),
    entry("return", K::Return, C::Keyword),
    entry("if", K::If, C::Keyword),
    entry("else", K::Else, C::Keyword),
    entry("while", K::While, C::Keyword),
    entry("repeat", K::Repeat, C::Keyword),
    entry("until", K::Until, C::Keyword),
    entry("for", K::For, C::Keyword),
    entry("to", K::To, C::Keyword),
    entry("down", K::Down, C::Keyword),
    entry("step", K::Step, C::Keyword),
    entry("break", K::Break, C::Keyword),
    entry("continue", K::Continue, C::Keyword),
    entry("print", K::Print, C::Keyword),
    entry("println", K::Println, C::Keyword),
    entry("read", K::Read, C::Keyword),
    entry("addr", K::Addr, C::Keyword),
    entry("and", K::And, C::BooleanAnd),
    entry("or", K::Or, C::BooleanOr),
    entry("not", K::Not, C::Unary),
    entry("true", K::True, C::BooleanLiteral),
    entry("false", K::False, C::BooleanLiteral),
    entry("global", K::Global, C::ScopeModifier),
    entry("package", K::Package, C::ScopeModifier),
    entry("external", K::External, C::ScopeModifier),
    entry("int", K::Int, C::TypeName),
    entry("byte", K::Byte, C::TypeName),
    entry("string", K::String, C::TypeName),
    entry("pointer", K::Pointer, C::TypeName),
    entry("void", K::Void, C::TypeName),
    entry("+", K::Plus, C::Additive),
    entry("-", K::Minus, C::Additive),
    entry("|", K::Pipe, C::Additive),
    entry("^", K::Caret, C::Additive),
    entry("*", K::Star, C::Multiplicative),
    entry("/", K::Slash, C::Multiplicative),
    entry("%", K::Percent, C::Multiplicative),
    entry("<<", K::ShiftLeft, C::Multiplicative),
    entry(">>", K::ShiftRight, C::Multiplicative),
    entry("&", K::Ampersand, C::Multiplicative),
    entry("~", K::Tilde, C::Unary),
    entry("=", K::Assign, C::Punctuation),
    entry("==", K::EqualEqual, C::Relational),
    entry("!=", K::BangEqual, C::Relational),
    entry("<", K::Less, C::Relational),
    entry("<=", K::LessEqual, C::Relational),
    entry(">", K::Greater, C::Relational),
    entry(">=", K::GreaterEqual, C::Relational),
    entry("(", K::LeftParen, C::Punctuation),
    entry(")", K::RightParen, C::Punctuation),
    entry("[", K::LeftBracket, C::Punctuation),
    entry("]", K::RightBracket, C::Punctuation),
    entry("{", K::LeftBrace, C::Punctuation),
    entry("}", K::RightBrace, C::BlockEnd),
    entry(",", K::Comma, C::Punctuation),
    entry(";", K::Semicolon, C::Punctuation),
    entry(":", K::Colon, C::Punctuation),
    entry("/*", K::BlockComment, C::Comment),
    entry("/*--", K::PassThroughBlockComment, C::Comment),
    entry("//", K::LineComment, C::Comment),
    entry("//--", K::PassThroughLineComment, C::Comment),
];

/// Look up a scanned word in the keyword part of the table.
pub fn lookup_keyword(word: &str) -> Option<&'static TokenEntry> {
    TOKEN_TABLE
        .iter()
        .find(|e| e.text == word && e.text.starts_with(|c: char| c.is_ascii_alphabetic()))
}

/// Find the longest special sequence that prefixes `input`.
pub fn lookup_special(input: &str) -> Option<&'static TokenEntry> {
    TOKEN_TABLE
        .iter()
        .filter(|e| !e.text.starts_with(|c: char| c.is_ascii_alphabetic()))
        .filter(|e| input.starts_with(e.text))
        .max_by_key(|e| e.text.len())
}

/// Get the table entry for a fixed-text kind.
pub fn entry_for(kind: TokenKind) -> Option<&'static TokenEntry> {
    TOKEN_TABLE.iter().find(|e| e.kind == kind)
}

impl TokenKind {
    /// Get a human-readable name for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            TokenKind::Identifier => "identifier".to_string(),
            TokenKind::Number => "number".to_string(),
            TokenKind::StringLiteral => "string literal".to_string(),
            TokenKind::EndOfInput => "end of input".to_string(),
            TokenKind::Invalid => "invalid character".to_string(),
            kind => match entry_for(*kind) {
                Some(e) => format!("'{}'", e.text),
                None => format!("{:?}", kind),
            },
        }
    }

    /// Check if this kind names a type.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            TokenKind::Int | TokenKind::Byte | TokenKind::String | TokenKind::Pointer
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// A scanned token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Source text; for string literals the text between the quotes.
    pub text: String,
    pub kind: TokenKind,
    pub category: TokenCategory,
    pub span: Span,
}

impl Token {
    /// Create a token.
    pub fn new(
        text: impl Into<String>,
        kind: TokenKind,
        category: TokenCategory,
        span: Span,
    ) -> Self {
        Self {
            text: text.into(),
            kind,
            category,
            span,
        }
    }

    /// Create the end-of-input token.
    pub fn end_of_input(span: Span) -> Self {
        Self::new("", TokenKind::EndOfInput, TokenCategory::BlockEnd, span)
    }

    /// Get the value of a number token.
    pub fn number(&self) -> Option<i64> {
        if self.kind != TokenKind::Number {
            return None;
        }
        super::numbers::parse_number_literal(&self.text)
    }

    /// Describe this token for a diagnostic.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EndOfInput => "end of input".to_string(),
            TokenKind::StringLiteral => format!("string \"{}\"", self.text),
            TokenKind::Identifier => format!("identifier '{}'", self.text),
            TokenKind::Number => format!("number {}", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
