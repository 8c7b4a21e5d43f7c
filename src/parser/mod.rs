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

//! Parser module for the Minnow compiler.
//!
//! The parser is single-pass: it pulls tokens through a one-token lookahead
//! [`Tokenizer`], checks declarations and types as it goes, and emits
//! virtual-ISA instructions straight to the [`Emitter`]. There is no syntax
//! tree.
//!
//! # Module Structure
//!
//! - `blocks` - Block parsing and block-local release (BlockParser trait)
//! - `control_flow` - if/while/repeat/for, break/continue, return (ControlFlowParser trait)
//! - `declarations` - Global, local and function declarations (DeclarationParser trait)
//! - `expressions` - The expression precedence ladder and calls (ExpressionParser trait)
//! - `helpers` - Token stream navigation and error handling (ParserHelpers trait)
//! - `statements` - Statement parsing (StatementParser trait)
//! - `types` - Type parsing (TypeParser trait)

// Submodules
pub mod blocks;
pub mod control_flow;
pub mod declarations;
pub mod expressions;
pub mod helpers;
pub mod statements;
pub mod types;

// Internal imports from submodules
use blocks::BlockParser;
use declarations::DeclarationParser;
use helpers::ParserHelpers;

use crate::codegen::{Backend, Emitter, Instruction};
use crate::context::{CompilationContext, FunctionState};
use crate::error::CompileError;
use crate::lexer::{TokenKind, Tokenizer};
use crate::CompileOptions;
use log::debug;

/// The parser state.
pub struct Parser<'source> {
    /// The token stream with one token of lookahead.
    pub(crate) tokens: Tokenizer<'source>,
    /// Declarations, signatures, string pool and the type oracle.
    pub(crate) context: CompilationContext,
    /// Instruction sink.
    pub(crate) emitter: Emitter,
    /// State of the function (or main block) being compiled.
    pub(crate) function: FunctionState,
}

impl<'source> Parser<'source> {
    /// Create a parser for `source` that emits through `backend`.
    ///
    /// Fails if the very first token is malformed.
    pub fn new(
        source: &'source str,
        backend: Box<dyn Backend>,
        options: CompileOptions,
    ) -> Result<Self, CompileError> {
        let emitter = Emitter::new(backend);
        let context = CompilationContext::new(emitter.target().clone(), options);
        Ok(Self {
            tokens: Tokenizer::new(source)?,
            context,
            emitter,
            function: FunctionState::main(),
        })
    }

    // ========================================
    // Program Parsing
    // ========================================

    /// Parse and compile the complete program.
    pub fn parse_program(&mut self) -> Result<(), CompileError> {
        self.expect(TokenKind::Program, "expected 'program' at start of source")?;
        // Consuming the name scans past the comments that follow it
        if self.check(TokenKind::Identifier) {
            let name = self.lookahead().text.clone();
            debug!("compiling program '{}'", name);
            self.emit(Instruction::ProgramStart { name });
        }
        self.expect_identifier("expected program name after 'program'")?;

        self.parse_declarations()?;

        self.expect(TokenKind::Main, "expected 'main'")?;
        self.function = FunctionState::main();
        self.emit(Instruction::MainEntry);
        self.parse_block(None)?;
        self.emit(Instruction::MainExit);

        for entry in self.context.strings.flush() {
            self.emit(Instruction::DeclareString {
                symbol: entry.symbol,
                text: entry.text,
            });
        }

        self.expect(TokenKind::EndProgram, "expected 'endprogram' after main block")?;
        self.match_token(Some(TokenKind::EndOfInput))?;

        for comment in self.tokens.flush_comments() {
            self.emitter.comment(&comment);
        }
        self.emit(Instruction::ProgramEnd);
        Ok(())
    }

    /// Consume the parser, returning the listing, the instruction stream and
    /// the final compilation context.
    pub fn into_output(self) -> (String, Vec<Instruction>, CompilationContext) {
        let (listing, instructions) = self.emitter.finish();
        (listing, instructions, self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Location, VirtualBackend, Width};
    use crate::context::{DeclKind, IdentifierDeclaration, Storage};
    use crate::error::{ErrorCode, Span};
    use crate::types::DataType;
    use pretty_assertions::assert_eq;

    /// Helper to compile source code and return the instruction stream.
    fn compile_source(source: &str) -> Result<Vec<Instruction>, CompileError> {
        let mut parser = Parser::new(
            source,
            Box::new(VirtualBackend::new()),
            CompileOptions::default(),
        )?;
        parser.parse_program()?;
        let (_, instructions, _) = parser.into_output();
        Ok(instructions)
    }

    fn compile_main(body: &str) -> Result<Vec<Instruction>, CompileError> {
        compile_source(&format!("program t\nmain {{\n{}\n}}\nendprogram\n", body))
    }

    fn error_code(source: &str) -> ErrorCode {
        compile_source(source).unwrap_err().code
    }

    fn count(instructions: &[Instruction], wanted: &Instruction) -> usize {
        instructions.iter().filter(|i| *i == wanted).count()
    }

    // ========================================
    // Program Structure Tests
    // ========================================

    #[test]
    fn test_empty_program() {
        let instructions = compile_source("program empty main { } endprogram").unwrap();
        assert_eq!(
            instructions,
            vec![
                Instruction::ProgramStart {
                    name: "empty".to_string()
                },
                Instruction::MainEntry,
                Instruction::MainExit,
                Instruction::ProgramEnd,
            ]
        );
    }

    #[test]
    fn test_missing_program_keyword() {
        assert_eq!(error_code("main { } endprogram"), ErrorCode::UnexpectedToken);
    }

    #[test]
    fn test_trailing_tokens_after_endprogram() {
        assert_eq!(
            error_code("program t main { } endprogram x"),
            ErrorCode::UnexpectedToken
        );
    }

    #[test]
    fn test_end_to_end_sample() {
        let mut parser = Parser::new(
            "program p var x: int = 5 main { print x + 1; } endprogram",
            Box::new(VirtualBackend::new()),
            CompileOptions::default(),
        )
        .unwrap();
        parser.parse_program().unwrap();
        let (_, instructions, context) = parser.into_output();

        let x = context.declarations.get("x").unwrap();
        assert_eq!(x.kind, DeclKind::Variable);
        assert_eq!(x.data_type, DataType::Int);
        assert_eq!(x.storage, Storage::StaticResident);
        assert_eq!(context.declarations.len(), 1);

        assert_eq!(count(&instructions, &Instruction::SaveAccumulator), 1);
        assert_eq!(count(&instructions, &Instruction::Add), 1);
        let add = instructions
            .iter()
            .position(|i| *i == Instruction::Add)
            .unwrap();
        // An Int result is printed as a number
        assert_eq!(instructions[add + 1], Instruction::PrintInt);
    }

    #[test]
    fn test_end_to_end_global_and_addition() {
        let instructions =
            compile_source("program p\nvar x : int\nmain { x = 1 + 2; }\nendprogram").unwrap();

        let statics: Vec<_> = instructions
            .iter()
            .filter(|i| matches!(i, Instruction::DeclareStatic { .. }))
            .collect();
        assert_eq!(statics.len(), 1);
        assert_eq!(count(&instructions, &Instruction::SaveAccumulator), 1);
        assert_eq!(count(&instructions, &Instruction::Add), 1);
        assert!(instructions.contains(&Instruction::StoreVariable {
            location: Location::Static("x".to_string()),
            width: Width::Word,
        }));
    }

    // ========================================
    // Expression Tests
    // ========================================

    #[test]
    fn test_precedence_multiplication_before_addition() {
        let instructions = compile_main("var x : int = 1 + 2 * 3;").unwrap();
        let ops: Vec<_> = instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Add | Instruction::Mul))
            .collect();
        assert_eq!(ops, vec![&Instruction::Mul, &Instruction::Add]);
    }

    #[test]
    fn test_negative_literal_is_folded() {
        let instructions = compile_main("var x : int = -5;").unwrap();
        assert!(instructions.contains(&Instruction::SetAccumulator(-5)));
        assert!(!instructions.contains(&Instruction::Negate));
    }

    #[test]
    fn test_zero_literal_clears() {
        let instructions = compile_main("var x : int = 0;").unwrap();
        assert!(instructions.contains(&Instruction::Clear));
    }

    #[test]
    fn test_string_concatenation_uses_string_ops() {
        let instructions = compile_main("var s : string = \"a\" + \"b\";").unwrap();
        assert_eq!(count(&instructions, &Instruction::SaveString), 1);
        assert_eq!(count(&instructions, &Instruction::AddString), 1);
    }

    #[test]
    fn test_string_minus_int_rejected() {
        assert_eq!(
            compile_main("var s : string = \"a\" - 1;").unwrap_err().code,
            ErrorCode::IncompatibleTypes
        );
    }

    #[test]
    fn test_identical_strings_share_one_constant() {
        let instructions = compile_main("print \"hi\"; print \"hi\"; print \"ho\";").unwrap();
        let strings: Vec<_> = instructions
            .iter()
            .filter(|i| matches!(i, Instruction::DeclareString { .. }))
            .collect();
        assert_eq!(strings.len(), 2);
    }

    // ========================================
    // Scope Tests
    // ========================================

    #[test]
    fn test_local_released_at_block_end() {
        let instructions = compile_main("{ var a : int; a = 1; }").unwrap();
        assert!(instructions.contains(&Instruction::AllocateStack(8)));
        assert!(instructions.contains(&Instruction::ReleaseStack(8)));
    }

    #[test]
    fn test_local_not_visible_after_block() {
        assert_eq!(
            compile_main("{ var a : int; } a = 1;").unwrap_err().code,
            ErrorCode::UndefinedIdentifier
        );
    }

    #[test]
    fn test_name_reusable_after_block() {
        assert!(compile_main("{ var a : int; } { var a : byte; }").is_ok());
    }

    #[test]
    fn test_shadowing_rejected() {
        let source = "program t\nvar a : int\nmain { var a : int; }\nendprogram";
        assert_eq!(error_code(source), ErrorCode::AlreadyDeclared);
    }

    // ========================================
    // Function Tests
    // ========================================

    #[test]
    fn test_function_call_protocol() {
        let source = "program t\n\
                      function add(a : int, b : int) : int { return a + b; }\n\
                      main { print add(1, 2); }\n\
                      endprogram";
        let instructions = compile_source(source).unwrap();
        let call_at = instructions
            .iter()
            .position(|i| *i == Instruction::Call("add".to_string()))
            .unwrap();
        assert_eq!(
            &instructions[call_at - 3..=call_at + 1],
            &[
                Instruction::PrepareCall { stack_args: 0 },
                Instruction::LoadParameter(1),
                Instruction::LoadParameter(0),
                Instruction::Call("add".to_string()),
                Instruction::FinishCall { stack_args: 0 },
            ]
        );
    }

    #[test]
    fn test_parameter_is_read_only() {
        let source = "program t\n\
                      function f(a : int) : void { a = 1; }\n\
                      main { f(1); }\n\
                      endprogram";
        assert_eq!(error_code(source), ErrorCode::NotAssignable);
    }

    #[test]
    fn test_parameter_is_writable_through_its_address() {
        let source = "program t\n\
                      function f(a : int) : int { [addr(a)] = 9; return a; }\n\
                      main { print f(1); }\n\
                      endprogram";
        let instructions = compile_source(source).unwrap();
        assert!(instructions.contains(&Instruction::StoreIndirect));
    }

    #[test]
    fn test_string_function_keeps_its_result() {
        let source = "program t\n\
                      function echo(s : string) : string { return s; }\n\
                      main { print echo(\"x\"); }\n\
                      endprogram";
        let instructions = compile_source(source).unwrap();
        let keep = instructions
            .iter()
            .position(|i| *i == Instruction::KeepString)
            .unwrap();
        assert_eq!(instructions[keep + 1], Instruction::Return);
        assert_eq!(count(&instructions, &Instruction::KeepString), 1);
    }

    #[test]
    fn test_int_function_does_not_keep_strings() {
        let source = "program t\n\
                      function one() : int { return 1; }\n\
                      main { print one(); }\n\
                      endprogram";
        let instructions = compile_source(source).unwrap();
        assert_eq!(count(&instructions, &Instruction::KeepString), 0);
    }

    #[test]
    fn test_missing_return() {
        let source = "program t\nfunction f() : int { }\nmain { }\nendprogram";
        assert_eq!(error_code(source), ErrorCode::MissingReturnStatement);
    }

    #[test]
    fn test_wrong_argument_count() {
        let source = "program t\n\
                      function f(a : int) : void { }\n\
                      main { f(1, 2); }\n\
                      endprogram";
        assert_eq!(error_code(source), ErrorCode::WrongNumberOfArguments);
    }

    #[test]
    fn test_return_in_main_rejected() {
        assert_eq!(
            compile_main("return;").unwrap_err().code,
            ErrorCode::ReturnOutsideFunction
        );
    }

    // ========================================
    // Control Flow Tests
    // ========================================

    #[test]
    fn test_while_emits_two_labels() {
        let instructions = compile_main("var i : int = 0; while (i < 3) { i = i + 1; }").unwrap();
        let labels = instructions
            .iter()
            .filter(|i| matches!(i, Instruction::Label(_)))
            .count();
        assert_eq!(labels, 2);
    }

    #[test]
    fn test_break_outside_loop() {
        assert_eq!(
            compile_main("break;").unwrap_err().code,
            ErrorCode::BreakOutsideLoop
        );
    }

    #[test]
    fn test_for_counter_is_scoped_to_loop() {
        assert_eq!(
            compile_main("for (i = 1 to 3) print i; i = 0;")
                .unwrap_err()
                .code,
            ErrorCode::UndefinedIdentifier
        );
    }

    // ========================================
    // Pointer Tests
    // ========================================

    #[test]
    fn test_indirect_store_through_addr() {
        let instructions = compile_main("var x : int; [addr(x)] = 7;").unwrap();
        assert!(instructions.contains(&Instruction::StoreIndirect));
    }

    #[test]
    fn test_dereference_requires_pointer() {
        assert_eq!(
            compile_main("var x : int; var y : int = [x];")
                .unwrap_err()
                .code,
            ErrorCode::NotAPointer
        );
    }

    #[test]
    fn test_pointer_arithmetic_type() {
        let source = "program t\nvar p : pointer\nvar x : int\nmain { p = addr(x) + 8; }\nendprogram";
        assert!(compile_source(source).is_ok());
    }

    // ========================================
    // Scope Tests
    // ========================================

    #[test]
    fn test_nested_block_restores_declarations() {
        let mut parser = Parser::new(
            "{ var inner : int; { var deeper : byte; inner = 2; } inner = 1; }",
            Box::new(VirtualBackend::new()),
            CompileOptions::default(),
        )
        .unwrap();
        let offset = parser.function.allocate(8);
        parser
            .context
            .declare(
                "outer",
                IdentifierDeclaration::local(DataType::Int, 8, offset),
                Span::default(),
            )
            .unwrap();
        let before = parser.context.declarations.names();

        parser.parse_block(None).unwrap();

        assert_eq!(parser.context.declarations.names(), before);
        assert!(parser.context.declarations.contains("outer"));
        assert!(!parser.context.declarations.contains("inner"));
        assert!(!parser.context.declarations.contains("deeper"));
    }

    // ========================================
    // Pass-through Comments
    // ========================================

    #[test]
    fn test_pass_through_comment_in_listing() {
        let mut parser = Parser::new(
            "program t\n//-- hello listing\nmain { }\nendprogram",
            Box::new(VirtualBackend::new()),
            CompileOptions::default(),
        )
        .unwrap();
        parser.parse_program().unwrap();
        let (listing, _, _) = parser.into_output();
        assert!(listing.starts_with(".program t\n; hello listing\n"));
    }
}
