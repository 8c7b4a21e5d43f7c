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

//! Error types for the Minnow compiler.
//!
//! Every diagnostic belongs to one of four kinds (lexical, syntax,
//! declaration, type). Compilation stops at the first error, and the plain
//! rendering of an error is always the single line `line <N>: <message>`.

use ariadne::{Config, Label, Report, ReportKind, Source};
use std::ops::Range;
use thiserror::Error;

/// A source span representing a range in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Line of the start offset (1-indexed)
    pub line: usize,
}

impl Span {
    /// Create a new span.
    pub fn new(start: usize, end: usize, line: usize) -> Self {
        Self { start, end, line }
    }

    /// Get the length of this span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Check if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Merge two spans into one that covers both.
    ///
    /// The line of the earlier span is kept.
    pub fn merge(&self, other: &Span) -> Span {
        let line = if self.start <= other.start {
            self.line
        } else {
            other.line
        };
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line,
        }
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// The four diagnostic families of the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed characters, literals or comments.
    Lexical,
    /// A token other than the one the grammar requires.
    Syntax,
    /// Missing, duplicate or misused identifiers.
    Declaration,
    /// Operand, operation or assignment type mismatches.
    Type,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::Lexical => "lexical error",
            ErrorKind::Syntax => "syntax error",
            ErrorKind::Declaration => "declaration error",
            ErrorKind::Type => "type error",
        };
        f.write_str(name)
    }
}

/// Error codes for the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexical errors (E001-E029)
    InvalidCharacter,
    UnterminatedString,
    UnterminatedComment,
    InvalidNumber,
    NumberTooLarge,

    // Syntax errors (E100-E149)
    UnexpectedToken,
    ExpectedDeclaration,
    ExpectedStatement,
    ExpectedExpression,
    ExpectedType,
    InvalidArraySize,
    BreakOutsideLoop,
    ContinueOutsideLoop,

    // Declaration errors (E200-E229)
    UndefinedIdentifier,
    AlreadyDeclared,
    NotAssignable,
    NotAVariable,
    NotAFunction,
    WrongNumberOfArguments,
    ArgumentTypeMismatch,
    TooManyParameters,
    MissingReturnStatement,
    ReturnOutsideFunction,

    // Type errors (E230-E259)
    IncompatibleTypes,
    NotAPointer,
    IndexMustBeInteger,
    CannotIndexNonArray,
    ArrayRequiresIndex,
    ReturnTypeMismatch,
    InvalidInitializer,
    InvalidParameterType,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl ErrorCode {
    /// Get the numeric code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            // Lexical errors
            ErrorCode::InvalidCharacter => "E001",
            ErrorCode::UnterminatedString => "E010",
            ErrorCode::UnterminatedComment => "E011",
            ErrorCode::InvalidNumber => "E020",
            ErrorCode::NumberTooLarge => "E021",

            // Syntax errors
            ErrorCode::UnexpectedToken => "E100",
            ErrorCode::ExpectedDeclaration => "E101",
            ErrorCode::ExpectedStatement => "E102",
            ErrorCode::ExpectedExpression => "E103",
            ErrorCode::ExpectedType => "E106",
            ErrorCode::InvalidArraySize => "E123",
            ErrorCode::BreakOutsideLoop => "E144",
            ErrorCode::ContinueOutsideLoop => "E145",

            // Declaration errors
            ErrorCode::UndefinedIdentifier => "E200",
            ErrorCode::AlreadyDeclared => "E201",
            ErrorCode::NotAssignable => "E202",
            ErrorCode::NotAVariable => "E203",
            ErrorCode::NotAFunction => "E204",
            ErrorCode::WrongNumberOfArguments => "E222",
            ErrorCode::ArgumentTypeMismatch => "E223",
            ErrorCode::TooManyParameters => "E224",
            ErrorCode::MissingReturnStatement => "E225",
            ErrorCode::ReturnOutsideFunction => "E226",

            // Type errors
            ErrorCode::IncompatibleTypes => "E230",
            ErrorCode::NotAPointer => "E231",
            ErrorCode::IndexMustBeInteger => "E232",
            ErrorCode::CannotIndexNonArray => "E233",
            ErrorCode::ArrayRequiresIndex => "E234",
            ErrorCode::ReturnTypeMismatch => "E235",
            ErrorCode::InvalidInitializer => "E236",
            ErrorCode::InvalidParameterType => "E237",
        }
    }

    /// Get the diagnostic family this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::InvalidCharacter
            | ErrorCode::UnterminatedString
            | ErrorCode::UnterminatedComment
            | ErrorCode::InvalidNumber
            | ErrorCode::NumberTooLarge => ErrorKind::Lexical,

            ErrorCode::UnexpectedToken
            | ErrorCode::ExpectedDeclaration
            | ErrorCode::ExpectedStatement
            | ErrorCode::ExpectedExpression
            | ErrorCode::ExpectedType
            | ErrorCode::InvalidArraySize
            | ErrorCode::BreakOutsideLoop
            | ErrorCode::ContinueOutsideLoop => ErrorKind::Syntax,

            ErrorCode::UndefinedIdentifier
            | ErrorCode::AlreadyDeclared
            | ErrorCode::NotAssignable
            | ErrorCode::NotAVariable
            | ErrorCode::NotAFunction
            | ErrorCode::WrongNumberOfArguments
            | ErrorCode::ArgumentTypeMismatch
            | ErrorCode::TooManyParameters
            | ErrorCode::MissingReturnStatement
            | ErrorCode::ReturnOutsideFunction => ErrorKind::Declaration,

            ErrorCode::IncompatibleTypes
            | ErrorCode::NotAPointer
            | ErrorCode::IndexMustBeInteger
            | ErrorCode::CannotIndexNonArray
            | ErrorCode::ArrayRequiresIndex
            | ErrorCode::ReturnTypeMismatch
            | ErrorCode::InvalidInitializer
            | ErrorCode::InvalidParameterType => ErrorKind::Type,
        }
    }
}

/// A compiler error with source location.
#[derive(Debug, Clone, Error)]
#[error("line {}: {message}", span.line)]
pub struct CompileError {
    /// The error code.
    pub code: ErrorCode,
    /// The error message.
    pub message: String,
    /// The source span where the error occurred.
    pub span: Span,
    /// Optional hint for fixing the error.
    pub hint: Option<String>,
}

impl CompileError {
    /// Create a new compile error.
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            hint: None,
        }
    }

    /// Add a hint to this error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// Get the error code string.
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the diagnostic family of this error.
    pub fn kind(&self) -> ErrorKind {
        self.code.kind()
    }

    /// Get the line the error was reported on.
    pub fn line(&self) -> usize {
        self.span.line
    }
}

/// Result type for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;

/// Format an error as the single diagnostic line written to the error stream.
pub fn format_error(error: &CompileError) -> String {
    format!("{}\n", error)
}

/// Render an error as a multi-line report with the offending source excerpt.
pub fn render_report(error: &CompileError, source: &str, filename: Option<&str>) -> String {
    let filename = filename.unwrap_or("<input>");
    let start = error.span.start.min(source.len());
    let end = error.span.end.clamp(start, source.len());

    let label = Label::new((filename, start..end)).with_message(error.kind().to_string());

    let mut report = Report::build(ReportKind::Error, filename, start)
        .with_config(Config::default().with_color(false))
        .with_code(error.code_str())
        .with_message(format!("line {}: {}", error.line(), error.message))
        .with_label(label);
    if let Some(hint) = &error.hint {
        report = report.with_help(hint);
    }

    let mut buffer = Vec::new();
    if report
        .finish()
        .write((filename, Source::from(source.to_string())), &mut buffer)
        .is_err()
    {
        return format_error(error);
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
