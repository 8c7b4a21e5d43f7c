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

//! Declaration parsing for the parser.
//!
//! This module handles:
//! - Top-level declaration lists with scope modifiers
//! - Global, package-global and external variables
//! - Local variables inside blocks
//! - Function declarations, parameter binding and external signatures

use super::blocks::BlockParser;
use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::statements::StatementParser;
use super::types::{TypeParser, TypeSpec};
use super::Parser;
use crate::codegen::{Instruction, StaticInit, TransferKind};
use crate::context::{
    width_of, FunctionSignature, FunctionState, IdentifierDeclaration, Scope,
};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::{TokenCategory, TokenKind};
use crate::types::{DataType, Operation};
use log::debug;

/// Trait for declaration parsing operations.
pub trait DeclarationParser<'source> {
    /// Parse the top-level declarations up to `main`.
    fn parse_declarations(&mut self) -> Result<(), CompileError>;

    /// Parse a top-level variable declaration with the given scope.
    fn parse_global_var(&mut self, scope: Scope) -> Result<(), CompileError>;

    /// Parse a local variable declaration inside a block.
    fn parse_local_var(&mut self, block_id: &str) -> Result<(), CompileError>;

    /// Parse a function declaration with the given scope.
    fn parse_function(&mut self, scope: Scope) -> Result<(), CompileError>;
}

impl<'source> DeclarationParser<'source> for Parser<'source> {
    fn parse_declarations(&mut self) -> Result<(), CompileError> {
        loop {
            let scope = match self.lookahead().kind {
                TokenKind::Main => return Ok(()),
                TokenKind::Global => Scope::Global,
                TokenKind::Package => Scope::PackageGlobal,
                TokenKind::External => Scope::External,
                TokenKind::Var | TokenKind::Function => Scope::Global,
                _ => {
                    return Err(self.error(
                        ErrorCode::ExpectedDeclaration,
                        format!("expected declaration or 'main', found {}", self.lookahead()),
                    ))
                }
            };
            if self.check_category(TokenCategory::ScopeModifier) {
                self.match_token(None)?;
            }

            match self.lookahead().kind {
                TokenKind::Var => self.parse_global_var(scope)?,
                TokenKind::Function => self.parse_function(scope)?,
                _ => {
                    return Err(self.error(
                        ErrorCode::ExpectedDeclaration,
                        format!(
                            "expected 'var' or 'function' after '{}', found {}",
                            scope,
                            self.lookahead()
                        ),
                    ))
                }
            }
        }
    }

    fn parse_global_var(&mut self, scope: Scope) -> Result<(), CompileError> {
        self.expect(TokenKind::Var, "expected 'var'")?;
        let name = self.expect_identifier("expected variable name after 'var'")?;
        self.expect(TokenKind::Colon, "expected ':' after variable name")?;
        let spec = self.parse_type()?;
        let size = self.context.storage_size(spec.data_type, spec.count);

        let init = if self.check(TokenKind::Assign) {
            let assign_span = self.lookahead_span();
            self.match_token(None)?;
            if scope == Scope::External || spec.data_type.is_array() {
                return Err(CompileError::new(
                    ErrorCode::InvalidInitializer,
                    format!("'{}' cannot have an initializer", name.text),
                    assign_span,
                ));
            }
            self.parse_literal_initializer(spec)?
        } else {
            StaticInit::Zero
        };
        self.accept(TokenKind::Semicolon)?;

        let declaration = IdentifierDeclaration::global(spec.data_type, size, scope);
        self.context.declare(&name.text, declaration, name.span)?;
        debug!(
            "declared {} variable '{}' of type {} ({} bytes)",
            scope, name.text, spec.data_type, size
        );

        if scope != Scope::External {
            self.emit(Instruction::DeclareStatic {
                symbol: name.text,
                size,
                init,
                exported: scope.is_exported(),
            });
        }
        Ok(())
    }

    fn parse_local_var(&mut self, block_id: &str) -> Result<(), CompileError> {
        self.expect(TokenKind::Var, "expected 'var'")?;
        let name = self.expect_identifier("expected variable name after 'var'")?;
        self.expect(TokenKind::Colon, "expected ':' after variable name")?;
        let spec = self.parse_type()?;
        let size = self.context.storage_size(spec.data_type, spec.count);

        // The initializer is evaluated before the name exists
        let initialized = if self.check(TokenKind::Assign) {
            let assign_span = self.lookahead_span();
            self.match_token(None)?;
            if spec.data_type.is_array() {
                return Err(CompileError::new(
                    ErrorCode::InvalidInitializer,
                    format!("array '{}' cannot have an initializer", name.text),
                    assign_span,
                ));
            }
            let value_span = self.lookahead_span();
            let value_type = self.parse_bool_expr()?;
            self.context.compatibility.check(
                spec.data_type,
                value_type,
                Operation::Assign,
                value_span,
            )?;
            true
        } else {
            false
        };
        self.accept(TokenKind::Semicolon)?;

        let footprint = self.context.footprint(size);
        let offset = self.function.allocate(footprint);
        self.emit(Instruction::AllocateStack(footprint));

        let mut declaration = IdentifierDeclaration::local(spec.data_type, size, offset);
        declaration.initialized = initialized;
        self.context.declare(&name.text, declaration, name.span)?;
        self.context.block_locals.record(block_id, &name.text);
        debug!(
            "declared local '{}' of type {} at frame offset {}",
            name.text, spec.data_type, offset
        );

        if initialized {
            self.store_to(&name.text)?;
        }
        Ok(())
    }

    fn parse_function(&mut self, scope: Scope) -> Result<(), CompileError> {
        self.expect(TokenKind::Function, "expected 'function'")?;
        let name = self.expect_identifier("expected function name after 'function'")?;
        self.expect(TokenKind::LeftParen, "expected '(' after function name")?;

        let mut params = Vec::new();
        let mut param_tokens = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let param = self.expect_identifier("expected parameter name")?;
                self.expect(TokenKind::Colon, "expected ':' after parameter name")?;
                let data_type = self.parse_param_type()?;
                params.push((param.text.clone(), data_type));
                param_tokens.push(param);
                if !self.accept(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RightParen, "expected ')' after parameters")?;
        self.expect(TokenKind::Colon, "expected ':' before return type")?;
        let return_type = self.parse_return_type()?;

        let max_params = self.emitter.target().max_params;
        if params.len() > max_params {
            return Err(CompileError::new(
                ErrorCode::TooManyParameters,
                format!(
                    "function '{}' has {} parameters, the target allows at most {}",
                    name.text,
                    params.len(),
                    max_params
                ),
                name.span,
            ));
        }

        // Recorded before the body so recursive calls type-check
        self.context.declare(
            &name.text,
            IdentifierDeclaration::function(return_type, scope),
            name.span,
        )?;
        self.context.signatures.insert(
            &name.text,
            FunctionSignature {
                params: params.clone(),
                return_type,
                scope,
            },
        );
        debug!(
            "declared {} function '{}' with {} parameter(s) returning {}",
            scope,
            name.text,
            params.len(),
            return_type
        );

        if scope == Scope::External {
            self.expect(
                TokenKind::Semicolon,
                "expected ';' after external function signature",
            )?;
            return Ok(());
        }
        if !self.check(TokenKind::LeftBrace) {
            return Err(self.error(
                ErrorCode::UnexpectedToken,
                format!(
                    "expected '{{' to start the body of '{}', found {}",
                    name.text,
                    self.lookahead()
                ),
            ));
        }

        let outer = std::mem::replace(
            &mut self.function,
            FunctionState::function(&name.text, return_type),
        );
        self.emit(Instruction::FunctionPrologue {
            name: name.text.clone(),
            exported: scope.is_exported(),
        });

        // Every parameter gets a read-only frame slot
        let mut slots = Vec::with_capacity(params.len());
        let mut frame_bytes = 0;
        for (_, data_type) in &params {
            let size = self.context.storage_size(*data_type, 1);
            let footprint = self.context.footprint(size);
            frame_bytes += footprint;
            slots.push((size, self.function.allocate(footprint)));
        }
        if frame_bytes > 0 {
            self.emit(Instruction::AllocateStack(frame_bytes));
        }
        for (index, ((param_name, data_type), (size, offset))) in
            params.iter().zip(slots.iter()).enumerate()
        {
            let kind = if *data_type == DataType::String {
                TransferKind::String { capacity: *size }
            } else {
                TransferKind::Value(width_of(*data_type))
            };
            let source = self.emitter.target().param_location(index);
            self.emit(Instruction::TransferParameter {
                source,
                offset: *offset,
                kind,
            });
            self.context.declare(
                param_name,
                IdentifierDeclaration::read_only(*data_type, *size, *offset),
                param_tokens[index].span,
            )?;
        }

        self.parse_block(None)?;

        for (param_name, _) in &params {
            self.context.declarations.remove(param_name);
        }
        if return_type != DataType::Void && !self.function.has_return {
            return Err(CompileError::new(
                ErrorCode::MissingReturnStatement,
                format!("function '{}' must return a value of type {}", name.text, return_type),
                name.span,
            ));
        }
        self.emit(Instruction::FunctionEpilogue {
            name: name.text.clone(),
        });
        debug!("finished function '{}'", name.text);

        self.function = outer;
        Ok(())
    }
}

impl<'source> Parser<'source> {
    /// Parse a literal top-level initializer and check it against the target type.
    fn parse_literal_initializer(&mut self, spec: TypeSpec) -> Result<StaticInit, CompileError> {
        let span = self.lookahead_span();
        let (init, value_type) = match self.lookahead().kind {
            TokenKind::Number => {
                let token = self.match_token(None)?;
                (StaticInit::Int(token.number().unwrap_or(0)), DataType::Int)
            }
            TokenKind::Minus => {
                self.match_token(None)?;
                let token = self.expect(TokenKind::Number, "expected number after '-'")?;
                (StaticInit::Int(-token.number().unwrap_or(0)), DataType::Int)
            }
            TokenKind::True => {
                self.match_token(None)?;
                (StaticInit::Int(1), DataType::Int)
            }
            TokenKind::False => {
                self.match_token(None)?;
                (StaticInit::Int(0), DataType::Int)
            }
            TokenKind::StringLiteral => {
                let token = self.match_token(None)?;
                (StaticInit::Str(token.text), DataType::String)
            }
            _ => {
                return Err(self.error(
                    ErrorCode::InvalidInitializer,
                    format!(
                        "global initializers must be literals, found {}",
                        self.lookahead()
                    ),
                ))
            }
        };
        self.context
            .compatibility
            .check(spec.data_type, value_type, Operation::Assign, span)?;
        Ok(init)
    }
}
