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

//! Function signatures, recorded when a function is declared and consulted
//! at every call site.

use super::declaration::Scope;
use crate::types::DataType;
use std::collections::HashMap;

/// A function's parameter list and return type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    /// Ordered `(name, type)` pairs.
    pub params: Vec<(String, DataType)>,
    pub return_type: DataType,
    pub scope: Scope,
}

impl FunctionSignature {
    /// Get the number of parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Mapping from function name to signature.
#[derive(Debug, Default, Clone)]
pub struct SignatureTable {
    entries: HashMap<String, FunctionSignature>,
}

impl SignatureTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a signature, replacing any previous one.
    pub fn insert(&mut self, name: &str, signature: FunctionSignature) {
        self.entries.insert(name.to_string(), signature);
    }

    /// Look up a signature.
    pub fn get(&self, name: &str) -> Option<&FunctionSignature> {
        self.entries.get(name)
    }

    /// Get the number of recorded functions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no function has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
