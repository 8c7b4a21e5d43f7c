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

//! Errors raised while executing a program on the reference machine.

use std::io;
use thiserror::Error;

/// Errors that can occur while loading or running a program.
#[derive(Debug, Error)]
pub enum MachineError {
    /// The program contains no `main` entry.
    #[error("program has no main entry")]
    NoEntry,

    /// A jump targets a label that is not defined.
    #[error("unknown label '{0}'")]
    UnknownLabel(String),

    /// A call or memory access names a symbol with no storage or body.
    #[error("unresolved symbol '{0}'")]
    UnresolvedSymbol(String),

    /// The frame stack, save stack or call stack is exhausted.
    #[error("stack overflow ({0})")]
    StackOverflow(&'static str),

    /// An access fell outside machine memory.
    #[error("memory fault at address {address}")]
    MemoryFault { address: i64 },

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The step budget ran out before the program halted.
    #[error("step limit of {0} instructions exceeded")]
    StepLimit(u64),

    /// `read` received input that does not fit the target variable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
