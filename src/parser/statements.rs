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

//! Statement parsing for the parser.
//!
//! This module provides statement parsing functionality:
//! - Statement dispatch
//! - Assignments to scalars, array elements and dereferenced pointers
//! - Call statements
//! - print, println and read

use super::blocks::BlockParser;
use super::control_flow::ControlFlowParser;
use super::declarations::DeclarationParser;
use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::Parser;
use crate::codegen::{Instruction, Location};
use crate::context::{width_of, IdentifierDeclaration, LoopLabels};
use crate::error::{CompileError, ErrorCode, Span};
use crate::lexer::{Token, TokenKind};
use crate::types::{DataType, Operation};

/// Extension trait for statement parsing.
pub trait StatementParser<'source> {
    /// Parse a statement.
    ///
    /// `block_id` names the innermost open block; `loop_labels` are the jump
    /// targets of the innermost enclosing loop.
    fn parse_statement(
        &mut self,
        block_id: &str,
        loop_labels: Option<&LoopLabels>,
    ) -> Result<(), CompileError>;

    /// Parse the body statement of an `if` or a loop.
    fn parse_body(
        &mut self,
        block_id: &str,
        loop_labels: Option<&LoopLabels>,
    ) -> Result<(), CompileError>;

    /// Parse a statement starting with an identifier.
    fn parse_identifier_statement(&mut self) -> Result<(), CompileError>;

    /// Parse an assignment through a pointer: `[p] = value;`
    fn parse_indirect_assignment(&mut self) -> Result<(), CompileError>;

    /// Parse a `print` or `println` statement.
    fn parse_print(&mut self) -> Result<(), CompileError>;

    /// Parse a `read` statement.
    fn parse_read(&mut self) -> Result<(), CompileError>;

    /// Store the accumulator into a scalar variable.
    fn store_to(&mut self, name: &str) -> Result<(), CompileError>;
}

impl<'source> StatementParser<'source> for Parser<'source> {
    fn parse_statement(
        &mut self,
        block_id: &str,
        loop_labels: Option<&LoopLabels>,
    ) -> Result<(), CompileError> {
        let is_return = self.check(TokenKind::Return);

        match self.lookahead().kind {
            TokenKind::LeftBrace => self.parse_block(loop_labels)?,
            TokenKind::Var => self.parse_local_var(block_id)?,
            TokenKind::If => self.parse_if(block_id, loop_labels)?,
            TokenKind::While => self.parse_while(block_id)?,
            TokenKind::Repeat => self.parse_repeat(block_id)?,
            TokenKind::For => self.parse_for(block_id)?,
            TokenKind::Break => self.parse_break(loop_labels)?,
            TokenKind::Continue => self.parse_continue(loop_labels)?,
            TokenKind::Return => self.parse_return()?,
            TokenKind::Print | TokenKind::Println => self.parse_print()?,
            TokenKind::Read => self.parse_read()?,
            TokenKind::Identifier => self.parse_identifier_statement()?,
            TokenKind::LeftBracket => self.parse_indirect_assignment()?,
            TokenKind::Semicolon => {
                self.match_token(None)?;
            }
            _ => {
                return Err(self.error(
                    ErrorCode::ExpectedStatement,
                    format!("expected statement, found {}", self.lookahead()),
                ))
            }
        }

        self.function.last_was_return = is_return;
        Ok(())
    }

    fn parse_body(
        &mut self,
        block_id: &str,
        loop_labels: Option<&LoopLabels>,
    ) -> Result<(), CompileError> {
        if self.check(TokenKind::Var) {
            return Err(self.error(
                ErrorCode::ExpectedStatement,
                "a declaration cannot be the body of a control statement; wrap it in '{ }'",
            ));
        }
        self.parse_statement(block_id, loop_labels)
    }

    fn parse_identifier_statement(&mut self) -> Result<(), CompileError> {
        let name = self.expect_identifier("expected identifier")?;
        let declaration = self.context.lookup(&name.text, name.span)?.clone();

        if declaration.is_function() {
            if !self.check(TokenKind::LeftParen) {
                return Err(CompileError::new(
                    ErrorCode::NotAVariable,
                    format!("'{}' is a function and cannot be assigned", name.text),
                    name.span,
                ));
            }
            self.parse_call(&name)?;
            self.expect(TokenKind::Semicolon, "expected ';' after function call")?;
            return Ok(());
        }
        if self.check(TokenKind::LeftParen) {
            return Err(CompileError::new(
                ErrorCode::NotAFunction,
                format!("'{}' is a variable, not a function", name.text),
                name.span,
            ));
        }
        if !declaration.assignable {
            return Err(not_assignable(&name));
        }

        if self.check(TokenKind::LeftBracket) {
            self.parse_element_assignment(&name, &declaration)?;
        } else {
            if declaration.data_type.is_array() {
                return Err(CompileError::new(
                    ErrorCode::ArrayRequiresIndex,
                    format!("array '{}' can only be assigned element by element", name.text),
                    name.span,
                ));
            }
            self.expect(
                TokenKind::Assign,
                &format!("expected '=' after '{}'", name.text),
            )?;
            let value_span = self.lookahead_span();
            let value_type = self.parse_bool_expr()?;
            self.context.compatibility.check(
                declaration.data_type,
                value_type,
                Operation::Assign,
                value_span,
            )?;
            self.store_to(&name.text)?;
        }

        self.expect(TokenKind::Semicolon, "expected ';' after assignment")?;
        Ok(())
    }

    fn parse_indirect_assignment(&mut self) -> Result<(), CompileError> {
        self.expect(TokenKind::LeftBracket, "expected '['")?;
        let pointer_span = self.lookahead_span();
        let pointer_type = self.parse_bool_expr()?;
        if pointer_type != DataType::Pointer {
            return Err(not_a_pointer(pointer_type, pointer_span));
        }
        self.expect(TokenKind::RightBracket, "expected ']' after pointer expression")?;
        self.emit(Instruction::SaveAccumulator);

        self.expect(TokenKind::Assign, "expected '=' after pointer target")?;
        let value_span = self.lookahead_span();
        let value_type = self.parse_bool_expr()?;
        self.context.compatibility.check(
            DataType::Int,
            value_type,
            Operation::Assign,
            value_span,
        )?;
        self.emit(Instruction::StoreIndirect);

        self.expect(TokenKind::Semicolon, "expected ';' after assignment")?;
        Ok(())
    }

    fn parse_print(&mut self) -> Result<(), CompileError> {
        let keyword = self.match_token(None)?;
        let newline = keyword.kind == TokenKind::Println;

        if !(newline && self.check(TokenKind::Semicolon)) {
            loop {
                let span = self.lookahead_span();
                let value_type = self.parse_bool_expr()?;
                self.context.compatibility.check(
                    value_type,
                    DataType::None,
                    Operation::Print,
                    span,
                )?;
                if value_type == DataType::String {
                    self.emit(Instruction::PrintString);
                } else {
                    self.emit(Instruction::PrintInt);
                }
                if !self.accept(TokenKind::Comma)? {
                    break;
                }
            }
        }
        if newline {
            self.emit(Instruction::PrintNewline);
        }

        self.expect(
            TokenKind::Semicolon,
            &format!("expected ';' after {}", keyword.kind),
        )?;
        Ok(())
    }

    fn parse_read(&mut self) -> Result<(), CompileError> {
        self.expect(TokenKind::Read, "expected 'read'")?;
        let name = self.expect_identifier("expected variable name after 'read'")?;
        let declaration = self.context.lookup(&name.text, name.span)?.clone();

        if declaration.is_function() {
            return Err(CompileError::new(
                ErrorCode::NotAVariable,
                format!("cannot read into function '{}'", name.text),
                name.span,
            ));
        }
        if !declaration.assignable {
            return Err(not_assignable(&name));
        }
        if declaration.data_type.is_array() {
            return Err(CompileError::new(
                ErrorCode::ArrayRequiresIndex,
                format!("cannot read into the whole array '{}'", name.text),
                name.span,
            ));
        }
        self.context.compatibility.check(
            declaration.data_type,
            DataType::None,
            Operation::Read,
            name.span,
        )?;

        let location = self.location(&name)?;
        if declaration.data_type == DataType::String {
            self.emit(Instruction::ReadString {
                location,
                capacity: declaration.size,
            });
            self.mark_initialized(&name.text);
        } else {
            self.emit(Instruction::ReadInt);
            self.store_to(&name.text)?;
        }

        self.expect(TokenKind::Semicolon, "expected ';' after read")?;
        Ok(())
    }

    fn store_to(&mut self, name: &str) -> Result<(), CompileError> {
        let span = self.lookahead_span();
        let declaration = self.context.lookup(name, span)?.clone();
        let Some(location) = self.context.location_of(name) else {
            return Err(CompileError::new(
                ErrorCode::NotAVariable,
                format!("'{}' is not a variable", name),
                span,
            ));
        };

        if declaration.data_type == DataType::String {
            self.emit(Instruction::AssignString {
                location,
                capacity: declaration.size,
            });
        } else {
            self.emit(Instruction::StoreVariable {
                location,
                width: width_of(declaration.data_type),
            });
        }
        self.mark_initialized(name);
        Ok(())
    }
}

impl<'source> Parser<'source> {
    /// Parse `[index] = value` after an array name.
    fn parse_element_assignment(
        &mut self,
        name: &Token,
        declaration: &IdentifierDeclaration,
    ) -> Result<(), CompileError> {
        let Some(element_type) = declaration.data_type.element_type() else {
            return Err(CompileError::new(
                ErrorCode::CannotIndexNonArray,
                format!("'{}' of type {} cannot be indexed", name.text, declaration.data_type),
                name.span,
            ));
        };
        let location = self.location(name)?;

        self.expect(TokenKind::LeftBracket, "expected '['")?;
        self.parse_index()?;
        self.expect(TokenKind::RightBracket, "expected ']' after index")?;
        self.emit(Instruction::SaveAccumulator);

        self.expect(TokenKind::Assign, "expected '=' after array element")?;
        let value_span = self.lookahead_span();
        let value_type = self.parse_bool_expr()?;
        self.context.compatibility.check(
            element_type,
            value_type,
            Operation::Assign,
            value_span,
        )?;
        self.emit(Instruction::PopIndex);
        self.emit(Instruction::StoreElement {
            location,
            width: width_of(declaration.data_type),
        });
        self.mark_initialized(&name.text);
        Ok(())
    }

    /// Get the storage location of a variable named by a token.
    pub(crate) fn location(&self, name: &Token) -> Result<Location, CompileError> {
        self.context.location_of(&name.text).ok_or_else(|| {
            CompileError::new(
                ErrorCode::NotAVariable,
                format!("'{}' is not a variable", name.text),
                name.span,
            )
        })
    }

    /// Record that a variable has been given a value.
    pub(crate) fn mark_initialized(&mut self, name: &str) {
        if let Some(declaration) = self.context.declarations.get_mut(name) {
            declaration.initialized = true;
        }
    }
}

fn not_assignable(name: &Token) -> CompileError {
    CompileError::new(
        ErrorCode::NotAssignable,
        format!("'{}' is read-only and cannot be assigned", name.text),
        name.span,
    )
    .with_hint("parameters and loop counters are read-only; copy the value into a local")
}

/// Build the error for dereferencing a non-pointer.
pub(crate) fn not_a_pointer(found: DataType, span: Span) -> CompileError {
    CompileError::new(
        ErrorCode::NotAPointer,
        format!("only pointers can be dereferenced, found {}", found),
        span,
    )
}
