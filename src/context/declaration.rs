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

//! Identifier declarations.
//!
//! One [`IdentifierDeclaration`] describes a variable or a function: its
//! type, where it lives, whether it may be assigned and whether it has been
//! given a value yet.

use crate::types::DataType;
use std::fmt;

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclKind {
    Variable,
    Function,
}

/// Where a variable's storage lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// In the current function's frame, addressed relative to the frame base.
    StackResident,
    /// In static storage, addressed by symbol.
    StaticResident,
}

/// Scope kinds a declaration can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Stack-resident, released at the end of its block.
    Local,
    /// Static storage visible in this compilation unit.
    Global,
    /// Global storage whose symbol is exported.
    PackageGlobal,
    /// Declared here, storage supplied elsewhere.
    External,
}

impl Scope {
    /// Check if symbols of this scope are exported.
    pub fn is_exported(&self) -> bool {
        matches!(self, Scope::PackageGlobal)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Scope::Local => "local",
            Scope::Global => "global",
            Scope::PackageGlobal => "package",
            Scope::External => "external",
        };
        f.write_str(name)
    }
}

/// Declaration table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierDeclaration {
    pub kind: DeclKind,
    /// Variable type, or return type for functions.
    pub data_type: DataType,
    pub initialized: bool,
    /// Storage size in bytes.
    pub size: usize,
    pub storage: Storage,
    /// Offset from the frame base; only meaningful for stack-resident storage.
    pub frame_offset: i64,
    pub assignable: bool,
    pub scope: Scope,
}

impl IdentifierDeclaration {
    /// Create a static-resident variable.
    pub fn global(data_type: DataType, size: usize, scope: Scope) -> Self {
        Self {
            kind: DeclKind::Variable,
            data_type,
            // Static storage is zero-filled
            initialized: true,
            size,
            storage: Storage::StaticResident,
            frame_offset: 0,
            assignable: true,
            scope,
        }
    }

    /// Create a stack-resident variable at the given frame offset.
    pub fn local(data_type: DataType, size: usize, frame_offset: i64) -> Self {
        Self {
            kind: DeclKind::Variable,
            data_type,
            initialized: false,
            size,
            storage: Storage::StackResident,
            frame_offset,
            assignable: true,
            scope: Scope::Local,
        }
    }

    /// Create a read-only stack-resident binding, such as a parameter.
    pub fn read_only(data_type: DataType, size: usize, frame_offset: i64) -> Self {
        Self {
            initialized: true,
            assignable: false,
            ..Self::local(data_type, size, frame_offset)
        }
    }

    /// Create a function declaration.
    pub fn function(return_type: DataType, scope: Scope) -> Self {
        Self {
            kind: DeclKind::Function,
            data_type: return_type,
            initialized: true,
            size: 0,
            storage: Storage::StaticResident,
            frame_offset: 0,
            assignable: false,
            scope,
        }
    }

    /// Check if this declares a variable.
    pub fn is_variable(&self) -> bool {
        self.kind == DeclKind::Variable
    }

    /// Check if this declares a function.
    pub fn is_function(&self) -> bool {
        self.kind == DeclKind::Function
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        let global = IdentifierDeclaration::global(DataType::Int, 8, Scope::PackageGlobal);
        assert!(global.initialized);
        assert!(global.scope.is_exported());
        assert_eq!(global.storage, Storage::StaticResident);

        let local = IdentifierDeclaration::local(DataType::Byte, 1, -8);
        assert!(!local.initialized);
        assert!(local.assignable);
        assert_eq!(local.frame_offset, -8);

        let param = IdentifierDeclaration::read_only(DataType::Int, 8, -16);
        assert!(param.initialized);
        assert!(!param.assignable);
        assert_eq!(param.storage, Storage::StackResident);

        let function = IdentifierDeclaration::function(DataType::Void, Scope::Global);
        assert!(function.is_function());
        assert!(!function.is_variable());
    }
}
