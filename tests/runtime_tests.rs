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

//! Runtime tests for the Minnow compiler.
//!
//! These tests compile programs and run them on the reference machine,
//! checking what they print.

use minnow::codegen::Width;
use minnow::{compile, compile_with, CompileOptions, MachineError, VirtualBackend};
use pretty_assertions::assert_eq;
use std::io::Cursor;

/// Compile and run a complete program with the given standard input.
fn run_program(source: &str, input: &str) -> Result<String, MachineError> {
    let compilation = compile(source).unwrap_or_else(|e| panic!("Compile error: {}", e));
    let mut machine = compilation.machine()?;
    let mut output = Vec::new();
    machine.run(&mut Cursor::new(input.as_bytes()), &mut output)?;
    Ok(String::from_utf8(output).unwrap())
}

/// Run a main body without declarations.
fn run_main(body: &str) -> String {
    run_program(&format!("program t\nmain {{\n{}\n}}\nendprogram\n", body), "").unwrap()
}

/// Run a program with declarations.
fn run_with(declarations: &str, body: &str) -> String {
    let source = format!(
        "program t\n{}\nmain {{\n{}\n}}\nendprogram\n",
        declarations, body
    );
    run_program(&source, "").unwrap()
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_precedence_and_negative_literals() {
    assert_eq!(run_main("print 2 + 3 * 4 - -1;"), "15");
}

#[test]
fn test_bitwise_and_shift() {
    assert_eq!(run_main("print 1 << 4 | 3, \" \", 12 & 10, \" \", 12 ^ 10, \" \", ~0;"), "19 8 6 -1");
}

#[test]
fn test_boolean_operators() {
    assert_eq!(
        run_main("print (1 < 2) and not (2 < 1), (1 > 2) or false, not 5;"),
        "100"
    );
}

#[test]
fn test_division_and_remainder() {
    assert_eq!(run_main("print 17 / 5, \" \", 17 % 5, \" \", -17 / 5;"), "3 2 -3");
}

#[test]
fn test_division_by_zero_is_a_runtime_error() {
    let result = run_program(
        "program t main { var z : int = 0; print 1 / z; } endprogram",
        "",
    );
    assert!(matches!(result, Err(MachineError::DivisionByZero)));
}

// ============================================================================
// Variables
// ============================================================================

#[test]
fn test_global_initializers() {
    let output = run_with(
        "var g : int = -3\nvar s : string = \"hey\"\nvar t : int = true",
        "print g, s, t;",
    );
    assert_eq!(output, "-3hey1");
}

#[test]
fn test_global_holds_its_value_after_the_run() {
    let compilation =
        compile("program t\nvar g : int\nvar b : byte = 3\nmain { g = 6 * 7; }\nendprogram").unwrap();
    let mut machine = compilation.machine().unwrap();
    let mut output = Vec::new();
    machine.run(&mut Cursor::new(&b""[..]), &mut output).unwrap();
    assert!(output.is_empty());

    let memory = machine.memory();
    let g = machine.static_address("g").unwrap();
    let b = machine.static_address("b").unwrap();
    assert_eq!(memory.read(g, Width::Word).unwrap(), 42);
    assert_eq!(memory.read(b, Width::Byte).unwrap(), 3);
    assert_eq!(machine.static_address("missing"), None);
}

#[test]
fn test_globals_start_at_zero() {
    assert_eq!(run_with("var g : int", "print g;"), "0");
}

#[test]
fn test_byte_truncates() {
    assert_eq!(run_main("var b : byte = 300; print b;"), "44");
}

#[test]
fn test_arrays() {
    let body = "var a : int[4];\n\
                for (i = 0 to 3) a[i] = i * i;\n\
                print a[0] + a[1] + a[2] + a[3];";
    assert_eq!(run_main(body), "14");
}

#[test]
fn test_byte_arrays() {
    let body = "var b : byte[3]; b[0] = 255; b[1] = 256; b[2] = 7; print b[0], \",\", b[1], \",\", b[2];";
    assert_eq!(run_main(body), "255,0,7");
}

// ============================================================================
// Control Flow
// ============================================================================

#[test]
fn test_if_else() {
    assert_eq!(
        run_main("var x : int = 5; if (x > 3) print \"big\"; else print \"small\";"),
        "big"
    );
    assert_eq!(
        run_main("var x : int = 1; if (x > 3) print \"big\"; else print \"small\";"),
        "small"
    );
}

#[test]
fn test_for_loop_counts_up() {
    assert_eq!(run_main("for (i = 1 to 3) print i;"), "123");
}

#[test]
fn test_for_loop_with_empty_range_runs_zero_times() {
    assert_eq!(run_main("for (i = 5 to 1) print i; print \"done\";"), "done");
}

#[test]
fn test_for_loop_counts_down() {
    assert_eq!(run_main("for (i = 3 down to 1) print i;"), "321");
}

#[test]
fn test_for_loop_with_step() {
    assert_eq!(run_main("for (i = 0 to 10 step 5) print i, \" \";"), "0 5 10 ");
    assert_eq!(run_main("for (i = 10 down to 0 step 4) print i, \" \";"), "10 6 2 ");
}

#[test]
fn test_for_limit_evaluated_once() {
    let body = "var n : int = 3;\nfor (i = 1 to n) { n = 10; print i; }";
    assert_eq!(run_main(body), "123");
}

#[test]
fn test_while_with_break() {
    let body = "var i : int = 0;\nwhile (true) { i = i + 1; if (i == 5) break; }\nprint i;";
    assert_eq!(run_main(body), "5");
}

#[test]
fn test_continue_releases_loop_locals() {
    let body = "for (i = 1 to 5) { var t : int = i % 2; if (t == 0) continue; print i; }";
    assert_eq!(run_main(body), "135");
}

#[test]
fn test_break_out_of_nested_block_keeps_stack_balanced() {
    let body = "var total : int = 0;\n\
                for (round = 1 to 50) {\n\
                  var i : int = 0;\n\
                  while (1) { var a : int[8]; i = i + 1; if (i > 3) break; }\n\
                  total = total + i;\n\
                }\n\
                print total;";
    assert_eq!(run_main(body), "200");
}

#[test]
fn test_repeat_until() {
    let body = "var i : int = 0;\nrepeat { i = i + 1; } until (i >= 3);\nprint i;";
    assert_eq!(run_main(body), "3");
}

#[test]
fn test_repeat_body_runs_once() {
    assert_eq!(run_main("repeat print \"x\"; until (1);"), "x");
}

// ============================================================================
// Functions
// ============================================================================

#[test]
fn test_recursion() {
    let declarations = "function fact(n : int) : int {\n\
                          if (n <= 1) return 1;\n\
                          return n * fact(n - 1);\n\
                        }";
    assert_eq!(run_with(declarations, "print fact(10);"), "3628800");
}

#[test]
fn test_stack_parameters() {
    let declarations = "function sum6(a : int, b : int, c : int, d : int, e : int, f : int) : int {\n\
                          return a + 2 * b + 3 * c + 4 * d + 5 * e + 6 * f;\n\
                        }";
    assert_eq!(run_with(declarations, "print sum6(1, 2, 3, 4, 5, 6);"), "91");
}

#[test]
fn test_nested_calls_as_arguments() {
    let declarations = "function add(a : int, b : int) : int { return a + b; }";
    assert_eq!(run_with(declarations, "print add(add(1, 2), add(3, 4));"), "10");
}

#[test]
fn test_string_parameter_is_copied() {
    let declarations = "function greet(name : string) : void { print \"hi \", name; }";
    assert_eq!(run_with(declarations, "greet(\"a\" + \"b\");"), "hi ab");
}

#[test]
fn test_returned_string_initializes_a_local() {
    let declarations = "function echo(s : string) : string { return s; }";
    let body = "var t : string = echo(\"hello\"); print \"[\", t, \"]\";";
    assert_eq!(run_with(declarations, body), "[hello]");
}

#[test]
fn test_returned_string_passed_as_argument() {
    let declarations = "function echo(s : string) : string { return s; }\n\
                        function show(s : string) : void { print \"[\", s, \"]\"; }";
    assert_eq!(run_with(declarations, "show(echo(\"hello\"));"), "[hello]");
}

#[test]
fn test_returned_strings_concatenate() {
    let declarations = "function echo(s : string) : string { return s; }\n\
                        function wrap(s : string) : string { var w : string = \"<\" + s + \">\"; return w; }";
    let body = "print echo(\"a\") + echo(\"b\"), \" \", wrap(echo(\"c\"));";
    assert_eq!(run_with(declarations, body), "ab <c>");
}

#[test]
fn test_parameters_do_not_leak_between_calls() {
    let declarations = "var calls : int\n\
                        function count(amount : int) : void { calls = calls + amount; }";
    assert_eq!(run_with(declarations, "count(2); count(3); print calls;"), "5");
}

#[test]
fn test_void_function_falls_off_the_end() {
    let declarations = "function hello() : void { print \"hello\"; }";
    assert_eq!(run_with(declarations, "hello(); hello();"), "hellohello");
}

#[test]
fn test_external_function_is_unresolved_at_run_time() {
    let source = "program t\nexternal function ext(a : int) : int;\nmain { print ext(1); }\nendprogram";
    let result = run_program(source, "");
    assert!(matches!(result, Err(MachineError::UnresolvedSymbol(name)) if name == "ext"));
}

// ============================================================================
// Pointers
// ============================================================================

#[test]
fn test_store_through_address() {
    assert_eq!(run_main("var x : int; [addr(x)] = 7; print x;"), "7");
}

#[test]
fn test_store_through_parameter_address() {
    let declarations = "function f(a : int) : int { [addr(a)] = 9; return a; }";
    assert_eq!(run_with(declarations, "print f(1);"), "9");
}

#[test]
fn test_load_through_pointer() {
    let body = "var x : int = 41; var p : pointer = addr(x); print [p] + 1;";
    assert_eq!(run_main(body), "42");
}

#[test]
fn test_pointer_arithmetic_walks_array() {
    let body = "var a : int[3]; var p : pointer = addr(a) + 8; [p] = 5; print a[1];";
    assert_eq!(run_main(body), "5");
}

#[test]
fn test_pointer_difference() {
    let body = "var a : int[4]; print (addr(a) + 24) - addr(a);";
    assert_eq!(run_main(body), "24");
}

// ============================================================================
// Strings
// ============================================================================

#[test]
fn test_string_concatenation() {
    assert_eq!(
        run_main("var s : string = \"ab\"; s = s + \"cd\"; println s;"),
        "abcd\n"
    );
}

#[test]
fn test_nested_concatenation() {
    let body = "var a : string = \"x\"; print a + (\"y\" + (\"z\" + a)), \"|\", (a + a) + a;";
    assert_eq!(run_main(body), "xyzx|xxx");
}

#[test]
fn test_string_comparison() {
    let body = "var s : string = \"abc\";\n\
                if (s == \"abc\") print \"eq\";\n\
                if (s != \"abd\") print \"ne\";";
    assert_eq!(run_main(body), "eqne");
}

#[test]
fn test_string_truncated_to_buffer_size() {
    let source = "program t main { var s : string = \"hello\"; print s; } endprogram";
    let options = CompileOptions::default().with_string_buffer_size(4);
    let compilation = compile_with(source, Box::new(VirtualBackend::new()), options).unwrap();
    let mut machine = compilation.machine().unwrap();
    let mut output = Vec::new();
    machine.run(&mut std::io::empty(), &mut output).unwrap();
    assert_eq!(output, b"hel");
}

// ============================================================================
// Input
// ============================================================================

#[test]
fn test_read_int() {
    let source = "program t main { var x : int; read x; print x * 2; } endprogram";
    assert_eq!(run_program(source, "21\n").unwrap(), "42");
}

#[test]
fn test_read_string() {
    let source = "program t main { var n : string; read n; println \"hi \" + n; } endprogram";
    assert_eq!(run_program(source, "bob\n").unwrap(), "hi bob\n");
}

#[test]
fn test_read_int_rejects_text() {
    let source = "program t main { var x : int; read x; } endprogram";
    let result = run_program(source, "abc\n");
    assert!(matches!(result, Err(MachineError::InvalidInput(_))));
}
