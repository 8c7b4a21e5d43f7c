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

//! Code generation for the Minnow compiler.
//!
//! The parser drives code generation directly, one virtual instruction at a
//! time. This module defines:
//! - The virtual instruction set ([`Instruction`])
//! - The narrow [`Backend`] trait concrete targets implement
//! - Shared listing formatting ([`Listing`])
//! - The [`Emitter`] the parser talks to
//! - The canonical [`VirtualBackend`]

mod isa;
mod listing;
mod vm;

pub use isa::{Instruction, Location, ParamLocation, StaticInit, TransferKind, Width};
pub use listing::Listing;
pub use vm::VirtualBackend;

/// Target constants a backend declares and the parser reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetInfo {
    /// Short target name, as used on the command line.
    pub name: &'static str,
    /// Size of `int` and `pointer` in bytes.
    pub word_size: usize,
    /// Number of parameters passed in input registers.
    pub register_params: usize,
    /// Maximum number of parameters of a function.
    pub max_params: usize,
    /// Offset of the first spilled parameter from the callee's frame base.
    pub spill_base: i64,
    /// Line-comment marker of the listing syntax.
    pub comment_prefix: &'static str,
}

impl TargetInfo {
    /// Get where the parameter with the given index travels.
    pub fn param_location(&self, index: usize) -> ParamLocation {
        if index < self.register_params {
            ParamLocation::Register(index)
        } else {
            let slot = (index - self.register_params) * self.word_size;
            ParamLocation::Stack {
                offset: self.spill_base + slot as i64,
            }
        }
    }

    /// Get the number of arguments a call with `count` arguments spills.
    pub fn stack_args(&self, count: usize) -> usize {
        count.saturating_sub(self.register_params)
    }
}

/// A concrete realization of the virtual instruction set.
pub trait Backend {
    /// Get the target constants of this backend.
    fn target(&self) -> TargetInfo;

    /// Append the target code for one instruction to the listing.
    fn lower(&mut self, instruction: &Instruction, listing: &mut Listing);
}

/// Names accepted by [`backend_for`].
pub const TARGETS: &[&str] = &["vm"];

/// Create the backend registered under `name`.
pub fn backend_for(name: &str) -> Option<Box<dyn Backend>> {
    match name {
        "vm" => Some(Box::new(VirtualBackend::new())),
        _ => None,
    }
}

/// The code sink the parser emits into.
///
/// Forwards every instruction to the backend and records it, so the program
/// can be inspected or executed after compilation.
pub struct Emitter {
    backend: Box<dyn Backend>,
    target: TargetInfo,
    listing: Listing,
    program: Vec<Instruction>,
}

impl Emitter {
    /// Create an emitter for the given backend.
    pub fn new(backend: Box<dyn Backend>) -> Self {
        let target = backend.target();
        Self {
            backend,
            target,
            listing: Listing::new(),
            program: Vec::new(),
        }
    }

    /// Get the target constants of the backend.
    pub fn target(&self) -> &TargetInfo {
        &self.target
    }

    /// Emit one instruction.
    pub fn emit(&mut self, instruction: Instruction) {
        self.backend.lower(&instruction, &mut self.listing);
        self.program.push(instruction);
    }

    /// Copy a pass-through comment into the listing.
    pub fn comment(&mut self, text: &str) {
        self.listing.comment(self.target.comment_prefix, text);
    }

    /// Finish emission, returning the listing text and the instructions.
    pub fn finish(self) -> (String, Vec<Instruction>) {
        (self.listing.into_string(), self.program)
    }
}
