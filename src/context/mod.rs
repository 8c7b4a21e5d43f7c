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

//! Compilation state shared by every parser component.
//!
//! Everything that outlives a single construct lives in one
//! [`CompilationContext`] value created per compilation:
//! - The declaration table and function signatures
//! - The string-constant pool
//! - The per-block local-variable lists
//! - The type-compatibility matrix
//! - The target description and compile options
//!
//! Per-function state ([`FunctionState`]) is kept separately by the parser.

mod blocks;
mod declaration;
mod function;
mod labels;
mod signatures;
mod strings;
mod table;

pub use blocks::BlockLocals;
pub use declaration::{DeclKind, IdentifierDeclaration, Scope, Storage};
pub use function::FunctionState;
pub use labels::{LabelGenerator, LoopLabels};
pub use signatures::{FunctionSignature, SignatureTable};
pub use strings::{PooledString, StringPool};
pub use table::DeclarationTable;

use crate::codegen::{Location, TargetInfo, Width};
use crate::error::{CompileError, ErrorCode, Span};
use crate::types::{CompatibilityMatrix, DataType};
use crate::CompileOptions;

/// State of one compilation.
#[derive(Debug, Clone)]
pub struct CompilationContext {
    pub declarations: DeclarationTable,
    pub signatures: SignatureTable,
    pub strings: StringPool,
    pub block_locals: BlockLocals,
    pub compatibility: CompatibilityMatrix,
    pub target: TargetInfo,
    pub options: CompileOptions,
}

impl CompilationContext {
    /// Create a fresh context.
    pub fn new(target: TargetInfo, options: CompileOptions) -> Self {
        Self {
            declarations: DeclarationTable::new(),
            signatures: SignatureTable::new(),
            strings: StringPool::new(),
            block_locals: BlockLocals::new(),
            compatibility: CompatibilityMatrix::default(),
            target,
            options,
        }
    }

    /// Get the storage size in bytes of a value of the given type.
    ///
    /// `count` is the element count for arrays.
    pub fn storage_size(&self, data_type: DataType, count: usize) -> usize {
        let word = self.target.word_size;
        match data_type {
            DataType::Int | DataType::Pointer => word,
            DataType::Byte => 1,
            DataType::String => self.options.string_buffer_size,
            DataType::IntArray => count * word,
            DataType::ByteArray => count,
            DataType::Void | DataType::None => 0,
        }
    }

    /// Round a storage size up to whole words for the stack.
    pub fn footprint(&self, size: usize) -> usize {
        let word = self.target.word_size;
        size.div_ceil(word) * word
    }

    /// Insert a declaration, rejecting a name that is already in use.
    pub fn declare(
        &mut self,
        name: &str,
        declaration: IdentifierDeclaration,
        span: Span,
    ) -> Result<(), CompileError> {
        let kind = declaration.kind;
        self.declarations.insert(name, declaration).map_err(|existing| {
            let what = match existing.kind {
                DeclKind::Variable => "variable",
                DeclKind::Function => "function",
            };
            CompileError::new(
                ErrorCode::AlreadyDeclared,
                format!("'{}' is already declared as a {}", name, what),
                span,
            )
            .with_hint(match kind {
                DeclKind::Variable => "names cannot be shadowed; pick another name",
                DeclKind::Function => "function names must be unique",
            })
        })
    }

    /// Look up a declaration, failing if the name is unknown.
    pub fn lookup(&self, name: &str, span: Span) -> Result<&IdentifierDeclaration, CompileError> {
        self.declarations.get(name).ok_or_else(|| {
            CompileError::new(
                ErrorCode::UndefinedIdentifier,
                format!("undeclared identifier '{}'", name),
                span,
            )
        })
    }

    /// Get the storage location of a declared variable.
    pub fn location_of(&self, name: &str) -> Option<Location> {
        let declaration = self.declarations.get(name)?;
        if !declaration.is_variable() {
            return None;
        }
        Some(match declaration.storage {
            Storage::StackResident => Location::Frame(declaration.frame_offset),
            Storage::StaticResident => Location::Static(name.to_string()),
        })
    }
}

/// Get the memory width a scalar or array element of this type occupies.
pub fn width_of(data_type: DataType) -> Width {
    match data_type {
        DataType::Byte | DataType::ByteArray => Width::Byte,
        _ => Width::Word,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Backend, VirtualBackend};

    fn context() -> CompilationContext {
        CompilationContext::new(VirtualBackend::new().target(), CompileOptions::default())
    }

    #[test]
    fn test_storage_sizes() {
        let ctx = context();
        assert_eq!(ctx.storage_size(DataType::Int, 1), 8);
        assert_eq!(ctx.storage_size(DataType::Byte, 1), 1);
        assert_eq!(ctx.storage_size(DataType::String, 1), 128);
        assert_eq!(ctx.storage_size(DataType::IntArray, 4), 32);
        assert_eq!(ctx.storage_size(DataType::ByteArray, 5), 5);
        assert_eq!(ctx.footprint(5), 8);
        assert_eq!(ctx.footprint(16), 16);
        assert_eq!(ctx.footprint(1), 8);
    }

    #[test]
    fn test_declare_and_lookup() {
        let mut ctx = context();
        let span = Span::new(0, 1, 3);
        ctx.declare(
            "x",
            IdentifierDeclaration::global(DataType::Int, 8, Scope::Global),
            span,
        )
        .unwrap();

        let err = ctx
            .declare("x", IdentifierDeclaration::local(DataType::Int, 8, -8), span)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AlreadyDeclared);
        assert_eq!(err.to_string(), "line 3: 'x' is already declared as a variable");

        let err = ctx.lookup("y", span).unwrap_err();
        assert_eq!(err.code, ErrorCode::UndefinedIdentifier);
        assert_eq!(ctx.location_of("x"), Some(Location::Static("x".to_string())));
    }

    #[test]
    fn test_frame_locations() {
        let mut ctx = context();
        ctx.declare(
            "t",
            IdentifierDeclaration::local(DataType::Int, 8, -16),
            Span::default(),
        )
        .unwrap();
        assert_eq!(ctx.location_of("t"), Some(Location::Frame(-16)));
        assert_eq!(width_of(DataType::ByteArray), Width::Byte);
        assert_eq!(width_of(DataType::Pointer), Width::Word);
    }
}
