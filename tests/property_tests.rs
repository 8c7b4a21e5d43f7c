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

//! Property-based tests for the Minnow compiler.
//!
//! These tests verify invariants that should hold for all inputs, using
//! proptest for random input generation.

use minnow::lexer::{self, lookup_special, TokenCategory, TOKEN_TABLE};
use minnow::{compile, Instruction};
use proptest::prelude::*;
use std::collections::HashSet;

fn run(source: &str) -> String {
    let compilation = compile(source).expect("program should compile");
    let mut machine = compilation.machine().expect("program should load");
    let mut output = Vec::new();
    machine
        .run(&mut std::io::empty(), &mut output)
        .expect("program should run");
    String::from_utf8(output).expect("output should be UTF-8")
}

// ============================================================================
// Lexer Property Tests
// ============================================================================

proptest! {
    /// Property: The lexer never panics on arbitrary input.
    #[test]
    fn prop_lexer_never_panics(source in "\\PC{0,200}") {
        let _ = lexer::tokenize(&source);
    }

    /// Property: Token spans are ordered and inside the source.
    #[test]
    fn prop_lexer_spans_in_bounds(source in "[a-z0-9_ +\\-*/=<>!(){};:\\n]{0,200}") {
        if let Ok(tokens) = lexer::tokenize(&source) {
            let mut previous_end = 0;
            for token in &tokens {
                prop_assert!(token.span.start >= previous_end);
                prop_assert!(token.span.start <= token.span.end);
                prop_assert!(token.span.end <= source.len());
                previous_end = token.span.end;
            }
        }
    }

    /// Property: The special-sequence lookup always takes the longest match.
    #[test]
    fn prop_longest_special_match(input in "[-+*/%<>=!&|^~()\\[\\]{},;:]{1,6}") {
        if let Some(entry) = lookup_special(&input) {
            prop_assert!(input.starts_with(entry.text));
            for other in TOKEN_TABLE.iter() {
                if other.category != TokenCategory::Keyword && input.starts_with(other.text) {
                    prop_assert!(other.text.len() <= entry.text.len());
                }
            }
        }
    }

    /// Property: A word always scans as one token with its full text.
    #[test]
    fn prop_identifiers_scan_whole(name in "[a-z_][a-z0-9_]{0,12}") {
        let tokens = lexer::tokenize(&name).unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].text, &name);
    }
}

// ============================================================================
// Compiler Property Tests
// ============================================================================

proptest! {
    /// Property: The compiler never panics on token soup.
    #[test]
    fn prop_compiler_never_panics(
        body in prop::collection::vec(
            prop::sample::select(vec![
                "x", "=", "1", "+", ";", "(", ")", "{", "}", "while", "if", "else",
                "var", ":", "int", "string", "\"s\"", "[", "]", "addr", "print",
                "for", "to", "down", "step", "break", "return", "not", "and",
            ]),
            0..40,
        )
    ) {
        let source = format!("program t main {{ {} }} endprogram", body.join(" "));
        let _ = compile(&source);
    }

    /// Property: Every generated label is unique and every jump target exists.
    #[test]
    fn prop_labels_unique(depth in 1usize..6, siblings in 1usize..4) {
        let mut body = String::new();
        for _ in 0..siblings {
            for _ in 0..depth {
                body.push_str("while (1) { if (0) { break; } else { ");
            }
            body.push_str("print 1;");
            for _ in 0..depth {
                body.push_str(" } }");
            }
        }
        let source = format!("program t main {{ {} }} endprogram", body);
        let compilation = compile(&source).unwrap();

        let mut labels = HashSet::new();
        for instruction in &compilation.instructions {
            if let Instruction::Label(label) = instruction {
                prop_assert!(labels.insert(label.clone()), "duplicate label {}", label);
            }
        }
        for instruction in &compilation.instructions {
            if let Instruction::Jump(target) | Instruction::JumpIfFalse(target) = instruction {
                prop_assert!(labels.contains(target), "undefined label {}", target);
            }
        }
    }

    /// Property: Each distinct string literal is stored exactly once.
    #[test]
    fn prop_string_literals_deduplicated(
        texts in prop::collection::vec("[a-c]{0,2}", 1..12)
    ) {
        let body: String = texts
            .iter()
            .map(|text| format!("print \"{}\";", text))
            .collect();
        let source = format!("program t main {{ {} }} endprogram", body);
        let compilation = compile(&source).unwrap();

        let declared: Vec<_> = compilation
            .instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::DeclareString { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect();
        let distinct: HashSet<_> = texts.iter().cloned().collect();
        prop_assert_eq!(declared.len(), distinct.len());
    }

    /// Property: A block releases exactly the stack space its locals took.
    #[test]
    fn prop_block_releases_its_locals(ints in 0usize..5, bytes in 0usize..5) {
        let mut body = String::from("{ ");
        for i in 0..ints {
            body.push_str(&format!("var i{} : int; ", i));
        }
        for b in 0..bytes {
            body.push_str(&format!("var b{} : byte; ", b));
        }
        body.push('}');
        let source = format!("program t main {{ {} }} endprogram", body);
        let compilation = compile(&source).unwrap();

        let allocated: usize = compilation
            .instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::AllocateStack(n) => Some(*n),
                _ => None,
            })
            .sum();
        let released: usize = compilation
            .instructions
            .iter()
            .filter_map(|i| match i {
                Instruction::ReleaseStack(n) => Some(*n),
                _ => None,
            })
            .sum();
        prop_assert_eq!(allocated, released);
        prop_assert_eq!(allocated, (ints + bytes) * 8);
        prop_assert!(compilation.context.declarations.is_empty());
    }

    /// Property: Compiled arithmetic agrees with wrapping machine arithmetic.
    #[test]
    fn prop_arithmetic_matches(a in 0i64..1000, b in 0i64..1000, c in 1i64..1000) {
        let source = format!(
            "program t main {{ print {} + {} * {} - {} / {} % 7; }} endprogram",
            a, b, c, a, c
        );
        let expected = a + b * c - a / c % 7;
        prop_assert_eq!(run(&source), expected.to_string());
    }

    /// Property: Number literals of every radix denote the same value.
    #[test]
    fn prop_number_radixes_agree(n in 0i64..=i64::MAX) {
        let source = format!(
            "program t main {{ print {} == 0x{:x}, {} == 0b{:b}; }} endprogram",
            n, n, n, n
        );
        prop_assert_eq!(run(&source), "11");
    }
}

// ============================================================================
// Type Oracle
// ============================================================================

#[test]
fn test_oracle_is_not_symmetric() {
    use minnow::types::{CompatibilityMatrix, DataType, Operation};

    let matrix = CompatibilityMatrix::default();
    assert!(matrix.lookup(DataType::Pointer, DataType::Int, Operation::Add));
    assert!(!matrix.lookup(DataType::Int, DataType::Pointer, Operation::Add));
}
