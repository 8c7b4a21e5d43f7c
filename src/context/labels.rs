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

//! Label generation for jump targets and block ids.
//!
//! Each function (and `main`) owns a generator seeded with its name, so
//! labels are unique across the program without a global counter. The `.`
//! separator cannot occur in identifiers, which keeps generated names apart
//! from user symbols.

/// Per-function generator of fresh labels and block ids.
#[derive(Debug, Clone)]
pub struct LabelGenerator {
    prefix: String,
    next_label: usize,
    next_block: usize,
}

impl LabelGenerator {
    /// Create a generator for the given function name.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next_label: 0,
            next_block: 0,
        }
    }

    /// Get the prefix of this generator.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Generate a fresh jump label.
    pub fn make_label(&mut self) -> String {
        let label = format!("{}.L{}", self.prefix, self.next_label);
        self.next_label += 1;
        label
    }

    /// Generate a fresh block id.
    pub fn make_block_id(&mut self) -> String {
        let id = format!("{}.B{}", self.prefix, self.next_block);
        self.next_block += 1;
        id
    }
}

/// Jump targets of the innermost enclosing loop, for break/continue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopLabels {
    /// Target of `continue`.
    pub entry: String,
    /// Target of `break`.
    pub exit: String,
    /// Frame size when the loop started; anything above it is released
    /// before jumping out.
    pub frame_size: usize,
}
