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

//! String-constant pool.

use log::debug;

/// A pooled string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PooledString {
    pub symbol: String,
    pub text: String,
}

/// Deduplicating pool of string literals.
///
/// Identical text maps to one symbol. Entries are emitted once, after the
/// program body.
#[derive(Debug, Default, Clone)]
pub struct StringPool {
    entries: Vec<PooledString>,
    next_id: usize,
}

impl StringPool {
    /// Create an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the symbol for a literal, adding it if it is new.
    pub fn intern(&mut self, text: &str) -> String {
        if let Some(existing) = self.entries.iter().find(|e| e.text == text) {
            return existing.symbol.clone();
        }

        let symbol = format!("str.{}", self.next_id);
        self.next_id += 1;
        debug!("pooled string literal {:?} as {}", text, symbol);
        self.entries.push(PooledString {
            symbol: symbol.clone(),
            text: text.to_string(),
        });
        symbol
    }

    /// Remove and return every entry for emission.
    ///
    /// Symbol numbering continues, so later literals never reuse a name.
    pub fn flush(&mut self) -> Vec<PooledString> {
        std::mem::take(&mut self.entries)
    }

    /// Get the number of pooled literals.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the pool is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut pool = StringPool::new();
        let a = pool.intern("hello");
        let b = pool.intern("world");
        let c = pool.intern("hello");
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_flush_keeps_numbering() {
        let mut pool = StringPool::new();
        assert_eq!(pool.intern("a"), "str.0");
        let flushed = pool.flush();
        assert_eq!(flushed.len(), 1);
        assert!(pool.is_empty());
        assert_eq!(pool.intern("b"), "str.1");
    }
}
