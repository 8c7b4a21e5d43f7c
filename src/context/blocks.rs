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

//! Locals declared directly in each open block.

use std::collections::HashMap;

/// Mapping from block id to the names declared directly in that block.
#[derive(Debug, Default, Clone)]
pub struct BlockLocals {
    blocks: HashMap<String, Vec<String>>,
}

impl BlockLocals {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a block.
    pub fn open(&mut self, block: &str) {
        self.blocks.insert(block.to_string(), Vec::new());
    }

    /// Record a name declared in a block.
    pub fn record(&mut self, block: &str, name: &str) {
        self.blocks
            .entry(block.to_string())
            .or_default()
            .push(name.to_string());
    }

    /// Stop tracking a block, returning its names in declaration order.
    pub fn close(&mut self, block: &str) -> Vec<String> {
        self.blocks.remove(block).unwrap_or_default()
    }

    /// Get the names declared so far in a block.
    pub fn names(&self, block: &str) -> &[String] {
        self.blocks.get(block).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Get the number of open blocks.
    pub fn open_blocks(&self) -> usize {
        self.blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_lifecycle() {
        let mut locals = BlockLocals::new();
        locals.open("main.B0");
        locals.record("main.B0", "a");
        locals.record("main.B0", "b");
        locals.open("main.B1");
        assert_eq!(locals.names("main.B0"), ["a", "b"]);
        assert_eq!(locals.open_blocks(), 2);

        assert!(locals.close("main.B1").is_empty());
        assert_eq!(locals.close("main.B0"), vec!["a", "b"]);
        assert_eq!(locals.open_blocks(), 0);
    }
}
