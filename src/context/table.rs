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

//! The declaration table.
//!
//! A single flat map covers the whole active scope chain: globals stay for
//! the whole compilation, locals and parameters are removed again when
//! their block or function ends. Names never shadow each other.

use super::declaration::IdentifierDeclaration;
use std::collections::{BTreeSet, HashMap};

/// Mapping from identifier name to its declaration.
#[derive(Debug, Default, Clone)]
pub struct DeclarationTable {
    entries: HashMap<String, IdentifierDeclaration>,
}

impl DeclarationTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration.
    ///
    /// Fails with the existing declaration if the name is already taken.
    pub fn insert(
        &mut self,
        name: &str,
        declaration: IdentifierDeclaration,
    ) -> Result<(), IdentifierDeclaration> {
        if let Some(existing) = self.entries.get(name) {
            return Err(existing.clone());
        }
        self.entries.insert(name.to_string(), declaration);
        Ok(())
    }

    /// Look up a declaration.
    pub fn get(&self, name: &str) -> Option<&IdentifierDeclaration> {
        self.entries.get(name)
    }

    /// Look up a declaration (mutable).
    pub fn get_mut(&mut self, name: &str) -> Option<&mut IdentifierDeclaration> {
        self.entries.get_mut(name)
    }

    /// Remove a declaration, returning it.
    pub fn remove(&mut self, name: &str) -> Option<IdentifierDeclaration> {
        self.entries.remove(name)
    }

    /// Check if a name is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Get the set of declared names.
    pub fn names(&self) -> BTreeSet<String> {
        self.entries.keys().cloned().collect()
    }

    /// Get the number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
