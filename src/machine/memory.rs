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

//! Flat byte memory of the reference machine.

use super::MachineError;
use crate::codegen::Width;

/// Byte-addressed memory with little-endian words.
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: Vec<u8>,
    word_size: usize,
}

impl Memory {
    /// Create zeroed memory of `size` bytes.
    pub fn new(size: usize, word_size: usize) -> Self {
        Self {
            bytes: vec![0; size],
            word_size,
        }
    }

    /// Total size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Get the number of bytes an access of `width` touches.
    pub fn width_bytes(&self, width: Width) -> usize {
        match width {
            Width::Byte => 1,
            Width::Word => self.word_size,
        }
    }

    fn range(&self, address: i64, len: usize) -> Result<std::ops::Range<usize>, MachineError> {
        let fault = MachineError::MemoryFault { address };
        let start = usize::try_from(address).map_err(|_| fault)?;
        match start.checked_add(len) {
            Some(end) if end <= self.bytes.len() => Ok(start..end),
            _ => Err(MachineError::MemoryFault { address }),
        }
    }

    /// Read a value. Words are sign-extended, bytes zero-extended.
    pub fn read(&self, address: i64, width: Width) -> Result<i64, MachineError> {
        let range = self.range(address, self.width_bytes(width))?;
        let slice = &self.bytes[range];
        if width == Width::Byte {
            return Ok(i64::from(slice[0]));
        }
        let mut raw = [0u8; 8];
        raw[..slice.len()].copy_from_slice(slice);
        let value = i64::from_le_bytes(raw);
        let unused = 64 - 8 * slice.len() as u32;
        Ok(if unused == 0 {
            value
        } else {
            (value << unused) >> unused
        })
    }

    /// Write a value, truncating it to the access width.
    pub fn write(&mut self, address: i64, width: Width, value: i64) -> Result<(), MachineError> {
        let range = self.range(address, self.width_bytes(width))?;
        let len = range.len();
        self.bytes[range].copy_from_slice(&value.to_le_bytes()[..len]);
        Ok(())
    }

    /// Zero `len` bytes from `address`.
    pub fn clear(&mut self, address: i64, len: usize) -> Result<(), MachineError> {
        let range = self.range(address, len)?;
        self.bytes[range].fill(0);
        Ok(())
    }

    /// Read the NUL-terminated text at `address`.
    pub fn read_str(&self, address: i64) -> Result<Vec<u8>, MachineError> {
        let start = self.range(address, 0)?.start;
        let rest = &self.bytes[start..];
        match rest.iter().position(|byte| *byte == 0) {
            Some(end) => Ok(rest[..end].to_vec()),
            None => Err(MachineError::MemoryFault { address }),
        }
    }

    /// Write `text` as a NUL-terminated string into a buffer of `capacity`
    /// bytes, truncating it to fit.
    pub fn write_str(
        &mut self,
        address: i64,
        text: &[u8],
        capacity: usize,
    ) -> Result<(), MachineError> {
        if capacity == 0 {
            return Ok(());
        }
        let len = text.len().min(capacity - 1);
        let range = self.range(address, len + 1)?;
        let start = range.start;
        self.bytes[start..start + len].copy_from_slice(&text[..len]);
        self.bytes[start + len] = 0;
        Ok(())
    }
}
