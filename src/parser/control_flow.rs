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

//! Control flow statement parsing for the parser.
//!
//! This module provides control flow statement parsing:
//! - If/else statements
//! - While and repeat-until loops
//! - Counting for loops with optional `down` and `step`
//! - break, continue and return
//!
//! Every loop creates exactly two labels, an entry and an exit, and passes
//! them down to its body so `break` and `continue` can reach them.

use super::expressions::ExpressionParser;
use super::helpers::ParserHelpers;
use super::statements::StatementParser;
use super::Parser;
use crate::codegen::{Instruction, Location, Width};
use crate::context::{IdentifierDeclaration, LoopLabels};
use crate::error::{CompileError, ErrorCode};
use crate::lexer::TokenKind;
use crate::types::{DataType, Operation};

/// Extension trait for control flow parsing.
pub trait ControlFlowParser<'source> {
    /// Parse an if statement.
    fn parse_if(
        &mut self,
        block_id: &str,
        loop_labels: Option<&LoopLabels>,
    ) -> Result<(), CompileError>;

    /// Parse a while loop.
    fn parse_while(&mut self, block_id: &str) -> Result<(), CompileError>;

    /// Parse a repeat-until loop.
    fn parse_repeat(&mut self, block_id: &str) -> Result<(), CompileError>;

    /// Parse a for loop.
    fn parse_for(&mut self, block_id: &str) -> Result<(), CompileError>;

    /// Parse a break statement.
    fn parse_break(&mut self, loop_labels: Option<&LoopLabels>) -> Result<(), CompileError>;

    /// Parse a continue statement.
    fn parse_continue(&mut self, loop_labels: Option<&LoopLabels>) -> Result<(), CompileError>;

    /// Parse a return statement.
    fn parse_return(&mut self) -> Result<(), CompileError>;

    /// Parse a parenthesised condition, leaving its value in the accumulator.
    fn parse_condition(&mut self) -> Result<(), CompileError>;
}

impl<'source> ControlFlowParser<'source> for Parser<'source> {
    fn parse_if(
        &mut self,
        block_id: &str,
        loop_labels: Option<&LoopLabels>,
    ) -> Result<(), CompileError> {
        self.expect(TokenKind::If, "expected 'if'")?;
        let else_label = self.function.labels.make_label();

        self.parse_condition()?;
        self.emit(Instruction::JumpIfFalse(else_label.clone()));
        self.parse_body(block_id, loop_labels)?;

        if self.accept(TokenKind::Else)? {
            let end_label = self.function.labels.make_label();
            self.emit(Instruction::Jump(end_label.clone()));
            self.emit(Instruction::Label(else_label));
            self.parse_body(block_id, loop_labels)?;
            self.emit(Instruction::Label(end_label));
        } else {
            self.emit(Instruction::Label(else_label));
        }
        Ok(())
    }

    fn parse_while(&mut self, block_id: &str) -> Result<(), CompileError> {
        self.expect(TokenKind::While, "expected 'while'")?;
        let labels = self.new_loop();

        self.emit(Instruction::Label(labels.entry.clone()));
        self.parse_condition()?;
        self.emit(Instruction::JumpIfFalse(labels.exit.clone()));
        self.parse_body(block_id, Some(&labels))?;
        self.emit(Instruction::Jump(labels.entry.clone()));
        self.emit(Instruction::Label(labels.exit));
        Ok(())
    }

    fn parse_repeat(&mut self, block_id: &str) -> Result<(), CompileError> {
        self.expect(TokenKind::Repeat, "expected 'repeat'")?;
        let labels = self.new_loop();

        self.emit(Instruction::Label(labels.entry.clone()));
        self.parse_body(block_id, Some(&labels))?;
        self.expect(TokenKind::Until, "expected 'until' after repeat body")?;
        self.parse_condition()?;
        self.emit(Instruction::JumpIfFalse(labels.entry.clone()));
        self.emit(Instruction::Label(labels.exit));
        self.expect(TokenKind::Semicolon, "expected ';' after until condition")?;
        Ok(())
    }

    fn parse_for(&mut self, block_id: &str) -> Result<(), CompileError> {
        self.expect(TokenKind::For, "expected 'for'")?;
        self.expect(TokenKind::LeftParen, "expected '(' after 'for'")?;
        let counter = self.expect_identifier("expected loop variable")?;
        if self.context.declarations.contains(&counter.text) {
            return Err(CompileError::new(
                ErrorCode::AlreadyDeclared,
                format!("loop variable '{}' is already declared", counter.text),
                counter.span,
            )
            .with_hint("the loop declares its own counter; pick an unused name"));
        }
        self.expect(TokenKind::Assign, "expected '=' after loop variable")?;

        let word = self.context.target.word_size;
        let counter_slot = self.push_loop_slot()?;

        let down = self.accept(TokenKind::Down)?;
        self.expect(TokenKind::To, "expected 'to' in for loop")?;
        let limit_slot = self.push_loop_slot()?;

        let explicit_step = self.accept(TokenKind::Step)?;
        let step_slot = if explicit_step {
            self.push_loop_slot()?
        } else {
            self.emit(Instruction::SetAccumulator(1));
            self.store_loop_slot()
        };
        self.expect(TokenKind::RightParen, "expected ')' after for loop header")?;

        self.context.declare(
            &counter.text,
            IdentifierDeclaration::read_only(DataType::Int, word, counter_slot),
            counter.span,
        )?;

        let counter_location = Location::Frame(counter_slot);
        let step_location = Location::Frame(step_slot);
        let limit_location = Location::Frame(limit_slot);

        // Step back once so the first adjustment yields the start value
        self.emit_step(&counter_location, &step_location, explicit_step, !down);

        let labels = self.new_loop();
        self.emit(Instruction::Label(labels.entry.clone()));
        self.emit_step(&counter_location, &step_location, explicit_step, down);
        self.emit(Instruction::SaveAccumulator);
        self.emit(Instruction::LoadVariable {
            location: limit_location,
            width: Width::Word,
        });
        self.emit(if down {
            Instruction::CompareGe
        } else {
            Instruction::CompareLe
        });
        self.emit(Instruction::JumpIfFalse(labels.exit.clone()));

        self.parse_body(block_id, Some(&labels))?;
        self.emit(Instruction::Jump(labels.entry.clone()));
        self.emit(Instruction::Label(labels.exit));

        self.context.declarations.remove(&counter.text);
        self.emit(Instruction::ReleaseStack(3 * word));
        self.function.release(3 * word);
        Ok(())
    }

    fn parse_break(&mut self, loop_labels: Option<&LoopLabels>) -> Result<(), CompileError> {
        let Some(labels) = loop_labels else {
            return Err(self.error(ErrorCode::BreakOutsideLoop, "'break' outside of a loop"));
        };
        self.match_token(None)?;
        self.leave_loop_scope(labels);
        self.emit(Instruction::Jump(labels.exit.clone()));
        self.expect(TokenKind::Semicolon, "expected ';' after 'break'")?;
        Ok(())
    }

    fn parse_continue(&mut self, loop_labels: Option<&LoopLabels>) -> Result<(), CompileError> {
        let Some(labels) = loop_labels else {
            return Err(self.error(
                ErrorCode::ContinueOutsideLoop,
                "'continue' outside of a loop",
            ));
        };
        self.match_token(None)?;
        self.leave_loop_scope(labels);
        self.emit(Instruction::Jump(labels.entry.clone()));
        self.expect(TokenKind::Semicolon, "expected ';' after 'continue'")?;
        Ok(())
    }

    fn parse_return(&mut self) -> Result<(), CompileError> {
        let keyword = self.expect(TokenKind::Return, "expected 'return'")?;
        let Some(return_type) = self.function.return_type else {
            return Err(CompileError::new(
                ErrorCode::ReturnOutsideFunction,
                "'return' is only allowed inside a function",
                keyword.span,
            ));
        };

        if return_type == DataType::Void {
            if !self.check(TokenKind::Semicolon) {
                return Err(self.error(
                    ErrorCode::ReturnTypeMismatch,
                    format!("function '{}' returns no value", self.function.name),
                ));
            }
        } else {
            let span = self.lookahead_span();
            if self.check(TokenKind::Semicolon) {
                return Err(CompileError::new(
                    ErrorCode::ReturnTypeMismatch,
                    format!(
                        "function '{}' must return a value of type {}",
                        self.function.name, return_type
                    ),
                    keyword.span,
                ));
            }
            let value_type = self.parse_bool_expr()?;
            if value_type.normalized() != return_type.normalized() {
                return Err(CompileError::new(
                    ErrorCode::ReturnTypeMismatch,
                    format!(
                        "function '{}' returns {}, found {}",
                        self.function.name, return_type, value_type
                    ),
                    span,
                ));
            }
            if return_type == DataType::String {
                self.emit(Instruction::KeepString);
            }
        }

        self.emit(Instruction::Return);
        self.function.has_return = true;
        self.expect(TokenKind::Semicolon, "expected ';' after return")?;
        Ok(())
    }

    fn parse_condition(&mut self) -> Result<(), CompileError> {
        self.expect(TokenKind::LeftParen, "expected '(' before condition")?;
        let span = self.lookahead_span();
        let condition_type = self.parse_bool_expr()?;
        self.context.compatibility.check(
            condition_type,
            DataType::None,
            Operation::BoolNot,
            span,
        )?;
        self.expect(TokenKind::RightParen, "expected ')' after condition")?;
        Ok(())
    }
}

impl<'source> Parser<'source> {
    /// Create the entry and exit labels of a new loop.
    fn new_loop(&mut self) -> LoopLabels {
        LoopLabels {
            entry: self.function.labels.make_label(),
            exit: self.function.labels.make_label(),
            frame_size: self.function.frame_size,
        }
    }

    /// Evaluate an int expression into a fresh hidden loop slot.
    fn push_loop_slot(&mut self) -> Result<i64, CompileError> {
        let span = self.lookahead_span();
        let value_type = self.parse_bool_expr()?;
        self.context
            .compatibility
            .check(DataType::Int, value_type, Operation::Assign, span)?;
        Ok(self.store_loop_slot())
    }

    /// Move the accumulator into a fresh hidden loop slot.
    fn store_loop_slot(&mut self) -> i64 {
        let word = self.context.target.word_size;
        let offset = self.function.allocate(word);
        self.emit(Instruction::AllocateStack(word));
        self.emit(Instruction::StoreVariable {
            location: Location::Frame(offset),
            width: Width::Word,
        });
        offset
    }

    /// Move the loop counter one step, leaving the new value in the accumulator.
    fn emit_step(&mut self, counter: &Location, step: &Location, explicit: bool, down: bool) {
        self.emit(Instruction::LoadVariable {
            location: counter.clone(),
            width: Width::Word,
        });
        if explicit {
            self.emit(Instruction::SaveAccumulator);
            self.emit(Instruction::LoadVariable {
                location: step.clone(),
                width: Width::Word,
            });
            self.emit(if down {
                Instruction::Sub
            } else {
                Instruction::Add
            });
        } else if down {
            self.emit(Instruction::Decrement);
        } else {
            self.emit(Instruction::Increment);
        }
        self.emit(Instruction::StoreVariable {
            location: counter.clone(),
            width: Width::Word,
        });
    }

    /// Release locals declared inside a loop before jumping out of it.
    fn leave_loop_scope(&mut self, labels: &LoopLabels) {
        let extra = self.function.frame_size.saturating_sub(labels.frame_size);
        if extra > 0 {
            self.emit(Instruction::ReleaseStack(extra));
        }
    }
}
