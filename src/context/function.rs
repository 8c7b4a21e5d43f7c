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

//! Per-function compilation state.

use super::labels::LabelGenerator;
use crate::types::DataType;

/// State of the function (or `main`) currently being compiled.
#[derive(Debug, Clone)]
pub struct FunctionState {
    pub name: String,
    pub labels: LabelGenerator,
    /// Declared return type; `None` while compiling `main`.
    pub return_type: Option<DataType>,
    /// Whether any `return` has been compiled.
    pub has_return: bool,
    /// Whether the most recent statement was a `return`.
    pub last_was_return: bool,
    /// Bytes currently allocated in the frame.
    pub frame_size: usize,
}

impl FunctionState {
    /// Create the state for `main`.
    pub fn main() -> Self {
        Self::new("main", None)
    }

    /// Create the state for a function.
    pub fn function(name: &str, return_type: DataType) -> Self {
        Self::new(name, Some(return_type))
    }

    fn new(name: &str, return_type: Option<DataType>) -> Self {
        Self {
            name: name.to_string(),
            labels: LabelGenerator::new(name),
            return_type,
            has_return: false,
            last_was_return: false,
            frame_size: 0,
        }
    }

    /// Check if this state belongs to `main`.
    pub fn is_main(&self) -> bool {
        self.return_type.is_none()
    }

    /// Reserve frame space and return the offset of its lowest byte.
    pub fn allocate(&mut self, bytes: usize) -> i64 {
        self.frame_size += bytes;
        -(self.frame_size as i64)
    }

    /// Give frame space back.
    pub fn release(&mut self, bytes: usize) {
        self.frame_size = self.frame_size.saturating_sub(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_allocation() {
        let mut state = FunctionState::function("f", DataType::Int);
        assert!(!state.is_main());
        assert_eq!(state.allocate(8), -8);
        assert_eq!(state.allocate(16), -24);
        state.release(16);
        assert_eq!(state.frame_size, 8);
        assert_eq!(state.allocate(8), -16);
    }

    #[test]
    fn test_main_state() {
        let mut state = FunctionState::main();
        assert!(state.is_main());
        assert_eq!(state.labels.make_label(), "main.L0");
    }
}
