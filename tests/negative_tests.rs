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

//! Negative/Error tests for the Minnow compiler.
//!
//! These tests verify that the compiler rejects invalid programs with the
//! right error code, error category and line number.

use minnow::{compile, ErrorCode, ErrorKind};
use test_case::test_case;

/// Wrap declarations and a main body into a complete program.
fn program(declarations: &str, body: &str) -> String {
    format!(
        "program t\n{}\nmain {{\n{}\n}}\nendprogram\n",
        declarations, body
    )
}

fn compile_error(source: &str) -> minnow::CompileError {
    match compile(source) {
        Ok(_) => panic!("Expected compile error for:\n{}", source),
        Err(e) => e,
    }
}

// ============================================================================
// Lexical Errors
// ============================================================================

#[test_case("var x : int = 1 @ 2;", ErrorCode::InvalidCharacter; "at_sign")]
#[test_case("var x : int = 1 # 2;", ErrorCode::InvalidCharacter; "hash")]
#[test_case("var x : int = $1;", ErrorCode::InvalidCharacter; "dollar")]
#[test_case("print \"abc;", ErrorCode::UnterminatedString; "string_runs_into_newline")]
#[test_case("/* never closed", ErrorCode::UnterminatedComment; "block_comment")]
#[test_case("var x : int = 12ab;", ErrorCode::InvalidNumber; "digits_glued_to_word")]
#[test_case("var x : int = 0x;", ErrorCode::InvalidNumber; "hex_without_digits")]
#[test_case("var x : int = 0b102;", ErrorCode::InvalidNumber; "binary_with_two")]
#[test_case("var x : int = 99999999999999999999;", ErrorCode::NumberTooLarge; "overflow")]
fn test_lexical_errors(body: &str, expected: ErrorCode) {
    let err = compile_error(&program("", body));
    assert_eq!(err.code, expected);
    assert_eq!(err.kind(), ErrorKind::Lexical);
}

#[test]
fn test_unterminated_string_at_end_of_input() {
    let err = compile_error("program t main { print \"abc");
    assert_eq!(err.code, ErrorCode::UnterminatedString);
}

// ============================================================================
// Syntax Errors
// ============================================================================

#[test_case("", "var x : int = (1 + 2;", ErrorCode::UnexpectedToken; "missing_paren")]
#[test_case("", "print 1", ErrorCode::UnexpectedToken; "missing_semicolon")]
#[test_case("int x", "", ErrorCode::ExpectedDeclaration; "type_without_var")]
#[test_case("global", "", ErrorCode::ExpectedDeclaration; "dangling_scope_modifier")]
#[test_case("", "else print 1;", ErrorCode::ExpectedStatement; "else_without_if")]
#[test_case("", "if (1) var y : int;", ErrorCode::ExpectedStatement; "declaration_as_body")]
#[test_case("", "print ;", ErrorCode::ExpectedExpression; "print_nothing")]
#[test_case("", "var x : int = * 3;", ErrorCode::ExpectedExpression; "leading_star")]
#[test_case("", "var x : float;", ErrorCode::ExpectedType; "unknown_type")]
#[test_case("", "var a : int[0];", ErrorCode::InvalidArraySize; "zero_length_array")]
#[test_case("", "var a : byte[99999999];", ErrorCode::InvalidArraySize; "huge_array")]
#[test_case("", "var a : string[4];", ErrorCode::ExpectedType; "string_array")]
#[test_case("", "break;", ErrorCode::BreakOutsideLoop; "break_in_main")]
#[test_case("", "continue;", ErrorCode::ContinueOutsideLoop; "continue_in_main")]
fn test_syntax_errors(declarations: &str, body: &str, expected: ErrorCode) {
    let err = compile_error(&program(declarations, body));
    assert_eq!(err.code, expected);
    assert_eq!(err.kind(), ErrorKind::Syntax);
}

#[test]
fn test_missing_endprogram() {
    let err = compile_error("program t main { }");
    assert_eq!(err.code, ErrorCode::UnexpectedToken);
}

// ============================================================================
// Declaration Errors
// ============================================================================

const F_INT: &str = "function f(a : int) : void { }";

#[test_case("", "y = 1;", ErrorCode::UndefinedIdentifier; "undeclared_assignment")]
#[test_case("", "print y;", ErrorCode::UndefinedIdentifier; "undeclared_read")]
#[test_case("", "var x : int; var x : int;", ErrorCode::AlreadyDeclared; "duplicate_local")]
#[test_case("var g : int", "var g : byte;", ErrorCode::AlreadyDeclared; "local_shadows_global")]
#[test_case("var g : int", "for (g = 1 to 2) ;", ErrorCode::AlreadyDeclared; "for_counter_exists")]
#[test_case("function f(a : int) : void { a = 1; }", "f(1);", ErrorCode::NotAssignable; "parameter")]
#[test_case("", "for (i = 1 to 3) i = 5;", ErrorCode::NotAssignable; "for_counter")]
#[test_case(F_INT, "f = 1;", ErrorCode::NotAVariable; "assign_to_function")]
#[test_case(F_INT, "read f;", ErrorCode::NotAVariable; "read_into_function")]
#[test_case(F_INT, "var p : pointer = addr(f);", ErrorCode::NotAVariable; "address_of_function")]
#[test_case("", "var x : int; x(1);", ErrorCode::NotAFunction; "call_variable")]
#[test_case("", "var x : int; print x();", ErrorCode::NotAFunction; "call_variable_in_expression")]
#[test_case(F_INT, "f();", ErrorCode::WrongNumberOfArguments; "too_few_arguments")]
#[test_case(F_INT, "f(1, 2);", ErrorCode::WrongNumberOfArguments; "too_many_arguments")]
#[test_case(F_INT, "f(\"s\");", ErrorCode::ArgumentTypeMismatch; "string_for_int")]
#[test_case(
    "function f(a : int, b : int, c : int, d : int, e : int, g : int, h : int, i : int, j : int) : void { }",
    "",
    ErrorCode::TooManyParameters;
    "nine_parameters"
)]
#[test_case("function f() : int { }", "", ErrorCode::MissingReturnStatement; "missing_return")]
#[test_case("", "return;", ErrorCode::ReturnOutsideFunction; "return_in_main")]
fn test_declaration_errors(declarations: &str, body: &str, expected: ErrorCode) {
    let err = compile_error(&program(declarations, body));
    assert_eq!(err.code, expected);
    assert_eq!(err.kind(), ErrorKind::Declaration);
}

// ============================================================================
// Type Errors
// ============================================================================

#[test_case("", "var s : string = \"a\" - \"b\";", ErrorCode::IncompatibleTypes; "string_minus_string")]
#[test_case("", "var x : int = \"a\";", ErrorCode::IncompatibleTypes; "string_into_int")]
#[test_case("", "var s : string = \"a\"; s = s * 2;", ErrorCode::IncompatibleTypes; "string_times_int")]
#[test_case("", "var p : pointer; var x : int = 1 - p;", ErrorCode::IncompatibleTypes; "int_minus_pointer")]
#[test_case("", "if (\"a\") print 1;", ErrorCode::IncompatibleTypes; "string_condition")]
#[test_case("", "var x : int; [x] = 1;", ErrorCode::NotAPointer; "store_through_int")]
#[test_case("", "var x : int; print [x];", ErrorCode::NotAPointer; "load_through_int")]
#[test_case("", "var a : int[3]; a[\"s\"] = 1;", ErrorCode::IndexMustBeInteger; "string_index")]
#[test_case("", "var x : int; x[0] = 1;", ErrorCode::CannotIndexNonArray; "index_scalar")]
#[test_case("", "var x : int; print x[0];", ErrorCode::CannotIndexNonArray; "read_indexed_scalar")]
#[test_case("", "var a : int[3]; a = 1;", ErrorCode::ArrayRequiresIndex; "assign_whole_array")]
#[test_case("", "var a : int[3]; print a;", ErrorCode::ArrayRequiresIndex; "read_whole_array")]
#[test_case("function f() : int { return \"s\"; }", "", ErrorCode::ReturnTypeMismatch; "string_for_int")]
#[test_case("function f() : void { return 1; }", "", ErrorCode::ReturnTypeMismatch; "value_from_void")]
#[test_case("function f() : int { return; }", "", ErrorCode::ReturnTypeMismatch; "no_value_from_int")]
#[test_case("var a : int[3] = 1", "", ErrorCode::InvalidInitializer; "array_initializer")]
#[test_case("external var e : int = 1", "", ErrorCode::InvalidInitializer; "external_initializer")]
#[test_case("var x : int = y", "", ErrorCode::InvalidInitializer; "non_literal_initializer")]
#[test_case("", "var a : int[2] = 1;", ErrorCode::InvalidInitializer; "local_array_initializer")]
#[test_case("function f(a : int[3]) : void { }", "", ErrorCode::InvalidParameterType; "array_parameter")]
fn test_type_errors(declarations: &str, body: &str, expected: ErrorCode) {
    let err = compile_error(&program(declarations, body));
    assert_eq!(err.code, expected);
    assert_eq!(err.kind(), ErrorKind::Type);
}

// ============================================================================
// Error Reporting
// ============================================================================

#[test]
fn test_error_names_the_line() {
    let source = "program t\nmain {\n\n  y = 1;\n}\nendprogram\n";
    let err = compile_error(source);
    assert_eq!(err.line(), 4);
    assert_eq!(err.to_string(), "line 4: undeclared identifier 'y'");
}

#[test]
fn test_first_error_wins() {
    let source = program("", "a = 1;\nb = 2;");
    let err = compile_error(&source);
    assert!(err.message.contains("'a'"));
}

#[test]
fn test_error_codes_are_stable() {
    assert_eq!(ErrorCode::InvalidCharacter.code(), "E001");
    assert_eq!(ErrorCode::UnexpectedToken.code(), "E100");
    assert_eq!(ErrorCode::UndefinedIdentifier.code(), "E200");
    assert_eq!(ErrorCode::IncompatibleTypes.code(), "E230");
}
