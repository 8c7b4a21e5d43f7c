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

//! Data types and the type-compatibility oracle.
//!
//! Every operator, assignment and I/O statement in the grammar is gated by
//! [`CompatibilityMatrix::check`]. The matrix is an explicit table keyed by
//! `(left, right, operation)`; it never infers symmetry.

use crate::error::{CompileError, ErrorCode, Span};
use std::collections::HashMap;
use std::fmt;

/// A type in the Minnow language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// Machine-word signed integer.
    Int,
    /// Unsigned 8-bit integer.
    Byte,
    /// Fixed-capacity text buffer.
    String,
    /// Raw memory address.
    Pointer,
    /// Fixed-size array of ints.
    IntArray,
    /// Fixed-size array of bytes.
    ByteArray,
    /// Return type of functions without a value.
    Void,
    /// No operand.
    None,
}

impl DataType {
    /// Get a human-readable name for this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Byte => "byte",
            DataType::String => "string",
            DataType::Pointer => "pointer",
            DataType::IntArray => "int[]",
            DataType::ByteArray => "byte[]",
            DataType::Void => "void",
            DataType::None => "none",
        }
    }

    /// Bytes and arrays behave as ints once loaded into the accumulator.
    pub fn normalized(&self) -> DataType {
        match self {
            DataType::Byte | DataType::IntArray | DataType::ByteArray => DataType::Int,
            other => *other,
        }
    }

    /// Check if this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, DataType::IntArray | DataType::ByteArray)
    }

    /// Get the element type if this is an array.
    pub fn element_type(&self) -> Option<DataType> {
        match self {
            DataType::IntArray => Some(DataType::Int),
            DataType::ByteArray => Some(DataType::Byte),
            _ => None,
        }
    }

    /// Get the array type holding elements of this type.
    pub fn array_of(&self) -> Option<DataType> {
        match self {
            DataType::Int => Some(DataType::IntArray),
            DataType::Byte => Some(DataType::ByteArray),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation gated by the compatibility matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Or,
    Xor,
    And,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    BoolOr,
    BoolAnd,
    BoolNot,
    Negate,
    Complement,
    Assign,
    Print,
    Read,
    /// Wildcard entry consulted when the specific operation is absent.
    AllOps,
}

impl Operation {
    /// Get the name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Add => "'+'",
            Operation::Sub => "'-'",
            Operation::Mul => "'*'",
            Operation::Div => "'/'",
            Operation::Mod => "'%'",
            Operation::Shl => "'<<'",
            Operation::Shr => "'>>'",
            Operation::Or => "'|'",
            Operation::Xor => "'^'",
            Operation::And => "'&'",
            Operation::Eq => "'=='",
            Operation::Ne => "'!='",
            Operation::Lt => "'<'",
            Operation::Le => "'<='",
            Operation::Gt => "'>'",
            Operation::Ge => "'>='",
            Operation::BoolOr => "'or'",
            Operation::BoolAnd => "'and'",
            Operation::BoolNot => "'not'",
            Operation::Negate => "negation",
            Operation::Complement => "'~'",
            Operation::Assign => "assignment",
            Operation::Print => "print",
            Operation::Read => "read",
            Operation::AllOps => "any operation",
        }
    }

    /// Check if this operation is a comparison.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operation::Eq
                | Operation::Ne
                | Operation::Lt
                | Operation::Le
                | Operation::Gt
                | Operation::Ge
        )
    }

    /// Get the type of the value a legal binary operation leaves behind.
    pub fn result_type(&self, left: DataType, right: DataType) -> DataType {
        let (left, right) = (left.normalized(), right.normalized());
        if self.is_comparison() {
            return DataType::Int;
        }
        match (self, left, right) {
            (Operation::Add | Operation::Sub, DataType::Pointer, DataType::Int) => {
                DataType::Pointer
            }
            (Operation::Add, DataType::String, DataType::String) => DataType::String,
            _ => DataType::Int,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Table of legal `(left, right, operation)` combinations.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    entries: HashMap<(DataType, DataType, Operation), bool>,
}

impl CompatibilityMatrix {
    /// Create an empty matrix that rejects everything.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace an entry.
    pub fn allow(&mut self, left: DataType, right: DataType, op: Operation) {
        self.entries.insert((left, right, op), true);
    }

    /// Explicitly reject a combination, overriding a wildcard entry.
    pub fn deny(&mut self, left: DataType, right: DataType, op: Operation) {
        self.entries.insert((left, right, op), false);
    }

    /// Look up the raw table without normalisation.
    ///
    /// The specific operation is tried first, then the `AllOps` wildcard.
    pub fn lookup(&self, left: DataType, right: DataType, op: Operation) -> bool {
        self.entries
            .get(&(left, right, op))
            .or_else(|| self.entries.get(&(left, right, Operation::AllOps)))
            .copied()
            .unwrap_or(false)
    }

    /// Check that an operation is legal for the given operand types.
    ///
    /// Bytes and arrays are normalised to `Int` first. Pass
    /// [`DataType::None`] as `right` for unary operations.
    pub fn check(
        &self,
        left: DataType,
        right: DataType,
        op: Operation,
        span: Span,
    ) -> Result<(), CompileError> {
        if self.lookup(left.normalized(), right.normalized(), op) {
            return Ok(());
        }

        let message = if right == DataType::None {
            format!("{} is not allowed for type {}", op, left)
        } else {
            format!("{} is not allowed between types {} and {}", op, left, right)
        };
        Err(CompileError::new(ErrorCode::IncompatibleTypes, message, span))
    }
}

impl Default for CompatibilityMatrix {
    fn default() -> Self {
        use DataType::{Int, Pointer, String};
        use Operation::*;

        let mut matrix = Self::empty();

        matrix.allow(Int, Int, AllOps);
        matrix.allow(Int, DataType::None, AllOps);

        for op in [Add, Eq, Ne, Assign] {
            matrix.allow(String, String, op);
        }
        for op in [Print, Read] {
            matrix.allow(String, DataType::None, op);
        }

        for op in [Add, Sub, Eq, Ne, Assign] {
            matrix.allow(Pointer, Int, op);
        }
        for op in [Sub, Eq, Ne, Lt, Le, Gt, Ge, Assign] {
            matrix.allow(Pointer, Pointer, op);
        }
        matrix.allow(Pointer, DataType::None, Print);

        matrix
    }
}
