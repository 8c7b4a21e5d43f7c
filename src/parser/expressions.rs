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

//! Expression parsing for the parser.
//!
//! The grammar is a precedence ladder, outermost first:
//! - boolean expression: terms joined by `or`
//! - boolean term: not-factors joined by `and`
//! - not-factor: optional `not` before a boolean factor
//! - relation: expression, optionally compared with another
//! - expression: terms joined by `+ - | ^`
//! - term: signed factor, then factors joined by `* / % << >> &`
//! - signed factor: optional `+ - ~` before a factor
//! - factor: parentheses, literals, variables, calls, `addr(x)`, `[p]`
//!
//! Every level emits code as it goes and returns the type of the value it
//! left in the accumulator. A binary operator saves its left operand, parses
//! the right one, asks the compatibility matrix and only then emits.

use super::helpers::ParserHelpers;
use super::statements::not_a_pointer;
use super::Parser;
use crate::codegen::{Instruction, Location};
use crate::context::width_of;
use crate::error::{CompileError, ErrorCode};
use crate::lexer::{Token, TokenCategory, TokenKind};
use crate::types::{DataType, Operation};
use log::warn;

/// Extension trait for expression parsing.
pub trait ExpressionParser<'source> {
    /// Parse a boolean expression (`or` level).
    fn parse_bool_expr(&mut self) -> Result<DataType, CompileError>;

    /// Parse a boolean term (`and` level).
    fn parse_bool_term(&mut self) -> Result<DataType, CompileError>;

    /// Parse an optionally negated boolean factor.
    fn parse_not_factor(&mut self) -> Result<DataType, CompileError>;

    /// Parse a relation: an expression optionally compared with another.
    fn parse_relation(&mut self) -> Result<DataType, CompileError>;

    /// Parse an additive expression.
    fn parse_expression(&mut self) -> Result<DataType, CompileError>;

    /// Parse a multiplicative term.
    fn parse_term(&mut self) -> Result<DataType, CompileError>;

    /// Parse a factor with an optional unary sign.
    fn parse_signed_factor(&mut self) -> Result<DataType, CompileError>;

    /// Parse a factor.
    fn parse_factor(&mut self) -> Result<DataType, CompileError>;

    /// Parse an array index expression, leaving it in the accumulator.
    fn parse_index(&mut self) -> Result<(), CompileError>;

    /// Parse the argument list of a call to `name` and emit the call.
    fn parse_call(&mut self, name: &Token) -> Result<DataType, CompileError>;
}

impl<'source> ExpressionParser<'source> for Parser<'source> {
    fn parse_bool_expr(&mut self) -> Result<DataType, CompileError> {
        let mut left = self.parse_bool_term()?;
        while self.check_category(TokenCategory::BooleanOr) {
            left = self.binary(left, Operation::BoolOr, Self::parse_bool_term)?;
        }
        Ok(left)
    }

    fn parse_bool_term(&mut self) -> Result<DataType, CompileError> {
        let mut left = self.parse_not_factor()?;
        while self.check_category(TokenCategory::BooleanAnd) {
            left = self.binary(left, Operation::BoolAnd, Self::parse_not_factor)?;
        }
        Ok(left)
    }

    fn parse_not_factor(&mut self) -> Result<DataType, CompileError> {
        if !self.check(TokenKind::Not) {
            return self.parse_relation();
        }
        self.match_token(None)?;
        let span = self.lookahead_span();
        let operand = self.parse_relation()?;
        self.context
            .compatibility
            .check(operand, DataType::None, Operation::BoolNot, span)?;
        self.emit(Instruction::BooleanNot);
        Ok(DataType::Int)
    }

    fn parse_relation(&mut self) -> Result<DataType, CompileError> {
        let left = self.parse_expression()?;
        if !self.check_category(TokenCategory::Relational) {
            return Ok(left);
        }
        let op = match self.lookahead().kind {
            TokenKind::EqualEqual => Operation::Eq,
            TokenKind::BangEqual => Operation::Ne,
            TokenKind::Less => Operation::Lt,
            TokenKind::LessEqual => Operation::Le,
            TokenKind::Greater => Operation::Gt,
            _ => Operation::Ge,
        };
        self.binary(left, op, Self::parse_expression)
    }

    fn parse_expression(&mut self) -> Result<DataType, CompileError> {
        let mut left = self.parse_term()?;
        while self.check_category(TokenCategory::Additive) {
            let op = match self.lookahead().kind {
                TokenKind::Plus => Operation::Add,
                TokenKind::Minus => Operation::Sub,
                TokenKind::Pipe => Operation::Or,
                _ => Operation::Xor,
            };
            left = self.binary(left, op, Self::parse_term)?;
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<DataType, CompileError> {
        let mut left = self.parse_signed_factor()?;
        while self.check_category(TokenCategory::Multiplicative) {
            let op = match self.lookahead().kind {
                TokenKind::Star => Operation::Mul,
                TokenKind::Slash => Operation::Div,
                TokenKind::Percent => Operation::Mod,
                TokenKind::ShiftLeft => Operation::Shl,
                TokenKind::ShiftRight => Operation::Shr,
                _ => Operation::And,
            };
            left = self.binary(left, op, Self::parse_factor)?;
        }
        Ok(left)
    }

    fn parse_signed_factor(&mut self) -> Result<DataType, CompileError> {
        let (op, instruction) = match self.lookahead().kind {
            TokenKind::Plus => (Operation::Add, None),
            TokenKind::Minus => (Operation::Negate, Some(Instruction::Negate)),
            TokenKind::Tilde => (Operation::Complement, Some(Instruction::Not)),
            _ => return self.parse_factor(),
        };
        self.match_token(None)?;

        // A negative literal is a single constant
        if op == Operation::Negate && self.check(TokenKind::Number) {
            let token = self.match_token(None)?;
            let value = token.number().unwrap_or(0);
            self.emit(Instruction::SetAccumulator(value.wrapping_neg()));
            return Ok(DataType::Int);
        }

        let span = self.lookahead_span();
        let operand = self.parse_factor()?;
        self.context
            .compatibility
            .check(operand, DataType::None, op, span)?;
        if let Some(instruction) = instruction {
            self.emit(instruction);
        }
        Ok(operand.normalized())
    }

    fn parse_factor(&mut self) -> Result<DataType, CompileError> {
        match self.lookahead().kind {
            TokenKind::LeftParen => {
                self.match_token(None)?;
                let inner = self.parse_bool_expr()?;
                self.expect(TokenKind::RightParen, "expected ')' after expression")?;
                Ok(inner)
            }
            TokenKind::Number => {
                let token = self.match_token(None)?;
                match token.number().unwrap_or(0) {
                    0 => self.emit(Instruction::Clear),
                    value => self.emit(Instruction::SetAccumulator(value)),
                }
                Ok(DataType::Int)
            }
            TokenKind::True | TokenKind::False => {
                let token = self.match_token(None)?;
                if token.kind == TokenKind::True {
                    self.emit(Instruction::SetAccumulator(1));
                } else {
                    self.emit(Instruction::Clear);
                }
                Ok(DataType::Int)
            }
            TokenKind::StringLiteral => {
                let token = self.match_token(None)?;
                let symbol = self.context.strings.intern(&token.text);
                self.emit(Instruction::LoadAddress {
                    location: Location::Static(symbol),
                });
                Ok(DataType::String)
            }
            TokenKind::Addr => {
                self.match_token(None)?;
                self.expect(TokenKind::LeftParen, "expected '(' after 'addr'")?;
                let name = self.expect_identifier("expected variable name in 'addr'")?;
                let declaration = self.context.lookup(&name.text, name.span)?;
                if declaration.is_function() {
                    return Err(CompileError::new(
                        ErrorCode::NotAVariable,
                        format!("cannot take the address of function '{}'", name.text),
                        name.span,
                    ));
                }
                let location = self.location(&name)?;
                self.emit(Instruction::LoadAddress { location });
                self.expect(TokenKind::RightParen, "expected ')' after 'addr' operand")?;
                Ok(DataType::Pointer)
            }
            TokenKind::LeftBracket => {
                self.match_token(None)?;
                let span = self.lookahead_span();
                let inner = self.parse_bool_expr()?;
                if inner != DataType::Pointer {
                    return Err(not_a_pointer(inner, span));
                }
                self.expect(TokenKind::RightBracket, "expected ']' after pointer expression")?;
                self.emit(Instruction::LoadIndirect);
                Ok(DataType::Int)
            }
            TokenKind::Identifier => {
                let name = self.match_token(None)?;
                self.parse_identifier_factor(&name)
            }
            _ => Err(self.error(
                ErrorCode::ExpectedExpression,
                format!("expected expression, found {}", self.lookahead()),
            )),
        }
    }

    fn parse_index(&mut self) -> Result<(), CompileError> {
        let span = self.lookahead_span();
        let index_type = self.parse_bool_expr()?;
        if index_type.normalized() != DataType::Int {
            return Err(CompileError::new(
                ErrorCode::IndexMustBeInteger,
                format!("array index must be an int, found {}", index_type),
                span,
            ));
        }
        Ok(())
    }

    fn parse_call(&mut self, name: &Token) -> Result<DataType, CompileError> {
        let Some(signature) = self.context.signatures.get(&name.text).cloned() else {
            return Err(CompileError::new(
                ErrorCode::NotAFunction,
                format!("'{}' is not a function", name.text),
                name.span,
            ));
        };

        self.expect(
            TokenKind::LeftParen,
            &format!("expected '(' after '{}'", name.text),
        )?;
        let mut count = 0;
        if !self.check(TokenKind::RightParen) {
            loop {
                let span = self.lookahead_span();
                let arg_type = self.parse_bool_expr()?;
                if let Some((param, param_type)) = signature.params.get(count) {
                    let compatible = self.context.compatibility.check(
                        *param_type,
                        arg_type,
                        Operation::Assign,
                        span,
                    );
                    if compatible.is_err() {
                        return Err(CompileError::new(
                            ErrorCode::ArgumentTypeMismatch,
                            format!(
                                "argument {} ('{}') of '{}' must be {}, found {}",
                                count + 1,
                                param,
                                name.text,
                                param_type,
                                arg_type
                            ),
                            span,
                        ));
                    }
                }
                self.emit(Instruction::SaveAccumulator);
                count += 1;
                if !self.accept(TokenKind::Comma)? {
                    break;
                }
            }
        }
        let close = self.expect(TokenKind::RightParen, "expected ')' after arguments")?;

        if count != signature.arity() {
            return Err(CompileError::new(
                ErrorCode::WrongNumberOfArguments,
                format!(
                    "'{}' expects {} argument(s), found {}",
                    name.text,
                    signature.arity(),
                    count
                ),
                name.span.merge(&close.span),
            ));
        }

        let stack_args = self.emitter.target().stack_args(count);
        self.emit(Instruction::PrepareCall { stack_args });
        for index in (0..count).rev() {
            self.emit(Instruction::LoadParameter(index));
        }
        self.emit(Instruction::Call(name.text.clone()));
        self.emit(Instruction::FinishCall { stack_args });
        Ok(signature.return_type)
    }
}

impl<'source> Parser<'source> {
    /// Save the left operand, parse the right one with `next` and fold them.
    fn binary(
        &mut self,
        left: DataType,
        op: Operation,
        next: fn(&mut Self) -> Result<DataType, CompileError>,
    ) -> Result<DataType, CompileError> {
        if left == DataType::String {
            self.emit(Instruction::SaveString);
        } else {
            self.emit(Instruction::SaveAccumulator);
        }
        let operator = self.match_token(None)?;
        let right = next(self)?;
        self.context
            .compatibility
            .check(left, right, op, operator.span)?;

        let strings = left == DataType::String;
        let instruction = match op {
            Operation::Add if strings => Instruction::AddString,
            Operation::Eq if strings => Instruction::CompareStringEq,
            Operation::Ne if strings => Instruction::CompareStringNe,
            Operation::Add => Instruction::Add,
            Operation::Sub => Instruction::Sub,
            Operation::Mul => Instruction::Mul,
            Operation::Div => Instruction::Div,
            Operation::Mod => Instruction::Mod,
            Operation::Shl => Instruction::Shl,
            Operation::Shr => Instruction::Shr,
            Operation::Or => Instruction::Or,
            Operation::Xor => Instruction::Xor,
            Operation::And => Instruction::And,
            Operation::Eq => Instruction::CompareEq,
            Operation::Ne => Instruction::CompareNe,
            Operation::Lt => Instruction::CompareLt,
            Operation::Le => Instruction::CompareLe,
            Operation::Gt => Instruction::CompareGt,
            Operation::Ge => Instruction::CompareGe,
            Operation::BoolOr => Instruction::BooleanOr,
            _ => Instruction::BooleanAnd,
        };
        self.emit(instruction);
        Ok(op.result_type(left, right))
    }

    /// Parse a variable read, element read or call after its name.
    fn parse_identifier_factor(&mut self, name: &Token) -> Result<DataType, CompileError> {
        let declaration = self.context.lookup(&name.text, name.span)?.clone();
        if declaration.is_function() {
            return self.parse_call(name);
        }
        if self.check(TokenKind::LeftParen) {
            return Err(CompileError::new(
                ErrorCode::NotAFunction,
                format!("'{}' is a variable, not a function", name.text),
                name.span,
            ));
        }
        if !declaration.initialized {
            warn!(
                "line {}: '{}' may be used before it is assigned",
                name.span.line, name.text
            );
        }

        let location = self.location(name)?;
        let data_type = declaration.data_type;

        if let Some(element_type) = data_type.element_type() {
            if !self.check(TokenKind::LeftBracket) {
                return Err(CompileError::new(
                    ErrorCode::ArrayRequiresIndex,
                    format!("array '{}' must be indexed", name.text),
                    name.span,
                ));
            }
            self.match_token(None)?;
            self.parse_index()?;
            self.expect(TokenKind::RightBracket, "expected ']' after index")?;
            self.emit(Instruction::StashIndex);
            self.emit(Instruction::LoadElement {
                location,
                width: width_of(data_type),
            });
            return Ok(element_type);
        }

        if self.check(TokenKind::LeftBracket) {
            return Err(CompileError::new(
                ErrorCode::CannotIndexNonArray,
                format!("'{}' of type {} cannot be indexed", name.text, data_type),
                name.span,
            ));
        }

        if data_type == DataType::String {
            self.emit(Instruction::LoadAddress { location });
        } else {
            self.emit(Instruction::LoadVariable {
                location,
                width: width_of(data_type),
            });
        }
        Ok(data_type)
    }
}
