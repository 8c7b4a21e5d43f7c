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

//! Text formatting shared by all backends.

/// An assembly-style listing under construction.
#[derive(Debug, Default, Clone)]
pub struct Listing {
    text: String,
}

impl Listing {
    /// Create an empty listing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a label on its own line.
    pub fn label(&mut self, name: &str) {
        self.text.push_str(name);
        self.text.push_str(":\n");
    }

    /// Write a tab-indented instruction.
    pub fn instruction(&mut self, text: &str) {
        self.text.push('\t');
        self.text.push_str(text);
        self.text.push('\n');
    }

    /// Write an unindented assembler directive.
    pub fn directive(&mut self, text: &str) {
        self.text.push_str(text);
        self.text.push('\n');
    }

    /// Write a comment, one listing line per line of text.
    pub fn comment(&mut self, prefix: &str, text: &str) {
        for line in text.lines() {
            let line = line.trim();
            self.text.push_str(prefix);
            if !line.is_empty() {
                self.text.push(' ');
                self.text.push_str(line);
            }
            self.text.push('\n');
        }
    }

    /// Write an empty line.
    pub fn blank(&mut self) {
        self.text.push('\n');
    }

    /// Get the listing text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the listing and return its text.
    pub fn into_string(self) -> String {
        self.text
    }
}
