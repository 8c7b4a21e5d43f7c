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

//! Type parsing for the parser.
//!
//! This module handles parsing of type annotations including:
//! - Scalar types (int, byte, string, pointer)
//! - Array types with a fixed element count
//! - Parameter and return types

use super::helpers::ParserHelpers;
use super::Parser;
use crate::error::{CompileError, ErrorCode};
use crate::lexer::TokenKind;
use crate::types::DataType;

/// Largest element count of an array.
pub const MAX_ARRAY_LENGTH: i64 = 1 << 24;

/// A parsed type annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeSpec {
    pub data_type: DataType,
    /// Element count for arrays, 1 otherwise.
    pub count: usize,
}

/// Trait for type parsing operations.
pub trait TypeParser<'source> {
    /// Parse a variable type, including arrays.
    fn parse_type(&mut self) -> Result<TypeSpec, CompileError>;

    /// Parse a parameter type (scalars only).
    fn parse_param_type(&mut self) -> Result<DataType, CompileError>;

    /// Parse a function return type (scalars or `void`).
    fn parse_return_type(&mut self) -> Result<DataType, CompileError>;
}

impl<'source> TypeParser<'source> for Parser<'source> {
    fn parse_type(&mut self) -> Result<TypeSpec, CompileError> {
        let data_type = match self.lookahead().kind {
            TokenKind::Int => DataType::Int,
            TokenKind::Byte => DataType::Byte,
            TokenKind::String => DataType::String,
            TokenKind::Pointer => DataType::Pointer,
            _ => {
                return Err(self.error(
                    ErrorCode::ExpectedType,
                    format!("expected type, found {}", self.lookahead()),
                ))
            }
        };
        self.match_token(None)?;

        if !self.check(TokenKind::LeftBracket) {
            return Ok(TypeSpec {
                data_type,
                count: 1,
            });
        }

        let Some(array_type) = data_type.array_of() else {
            return Err(self.error(
                ErrorCode::ExpectedType,
                format!("arrays of {} are not supported", data_type),
            ));
        };
        self.match_token(None)?;

        let size = self.expect(TokenKind::Number, "expected array size")?;
        let count = size.number().unwrap_or(0);
        if !(1..=MAX_ARRAY_LENGTH).contains(&count) {
            return Err(CompileError::new(
                ErrorCode::InvalidArraySize,
                format!(
                    "array size must be between 1 and {}, found {}",
                    MAX_ARRAY_LENGTH, size.text
                ),
                size.span,
            ));
        }
        self.expect(TokenKind::RightBracket, "expected ']' after array size")?;

        Ok(TypeSpec {
            data_type: array_type,
            count: count as usize,
        })
    }

    fn parse_param_type(&mut self) -> Result<DataType, CompileError> {
        let span = self.lookahead_span();
        let spec = self.parse_type()?;
        if spec.data_type.is_array() {
            return Err(CompileError::new(
                ErrorCode::InvalidParameterType,
                "array parameters are not supported; pass a pointer instead",
                span.merge(&self.lookahead_span()),
            ));
        }
        Ok(spec.data_type)
    }

    fn parse_return_type(&mut self) -> Result<DataType, CompileError> {
        if self.accept(TokenKind::Void)? {
            return Ok(DataType::Void);
        }
        self.parse_param_type()
    }
}
