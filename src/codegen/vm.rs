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

//! The canonical backend: renders the virtual ISA as mnemonic text.

use super::isa::Instruction;
use super::listing::Listing;
use super::{Backend, TargetInfo};

/// Backend that writes the virtual instruction set as-is.
#[derive(Debug, Default, Clone)]
pub struct VirtualBackend;

impl VirtualBackend {
    /// Create a new virtual backend.
    pub fn new() -> Self {
        Self
    }
}

impl Backend for VirtualBackend {
    fn target(&self) -> TargetInfo {
        TargetInfo {
            name: "vm",
            word_size: 8,
            register_params: 4,
            max_params: 8,
            spill_base: 0,
            comment_prefix: ";",
        }
    }

    fn lower(&mut self, instruction: &Instruction, listing: &mut Listing) {
        match instruction {
            Instruction::ProgramStart { .. } | Instruction::DeclareString { .. } => {
                listing.directive(&instruction.to_string());
            }
            Instruction::ProgramEnd => {
                listing.blank();
                listing.directive(&instruction.to_string());
            }
            Instruction::DeclareStatic { symbol, exported, .. } => {
                if *exported {
                    listing.directive(&format!(".export {}", symbol));
                }
                listing.directive(&instruction.to_string());
            }
            Instruction::MainEntry => {
                listing.blank();
                listing.label("main");
                listing.instruction(&instruction.to_string());
            }
            Instruction::FunctionPrologue { name, exported } => {
                listing.blank();
                if *exported {
                    listing.directive(&format!(".export {}", name));
                }
                listing.label(name);
                listing.instruction(&instruction.to_string());
            }
            Instruction::Label(label) => listing.label(label),
            _ => listing.instruction(&instruction.to_string()),
        }
    }
}
