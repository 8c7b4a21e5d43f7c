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

//! Minnow Compiler Library
//!
//! This library compiles Minnow source code in a single pass into a program
//! for a virtual accumulator machine, and provides a reference machine to
//! run the result.
//!
//! # Modules
//!
//! - [`error`] - Error types and error reporting
//! - [`lexer`] - Tokenization of source code
//! - [`types`] - Data types and the type-compatibility matrix
//! - [`context`] - Declarations, scopes, string pool and labels
//! - [`codegen`] - The virtual instruction set and its backends
//! - [`parser`] - The single-pass parser and code generator
//! - [`machine`] - Reference machine for compiled programs
//!
//! # Example
//!
//! ```no_run
//! let source = r#"
//! program hello
//! main {
//!     println "Hello, World!";
//! }
//! endprogram
//! "#;
//!
//! let compilation = minnow::compile(source).unwrap();
//! print!("{}", compilation.listing);
//! ```

pub mod codegen;
pub mod context;
pub mod error;
pub mod lexer;
pub mod machine;
pub mod parser;
pub mod types;

// Re-export commonly used types
pub use codegen::{Backend, Instruction, TargetInfo, VirtualBackend};
pub use error::{format_error, render_report, CompileError, ErrorCode, ErrorKind, Result, Span};
pub use lexer::Token;
pub use machine::{Machine, MachineError};
pub use types::DataType;

use context::CompilationContext;
use parser::Parser;

/// The version of the Minnow compiler.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of the compiler.
pub const NAME: &str = "Minnow";

/// Default capacity of a string variable in bytes, including the terminator.
pub const DEFAULT_STRING_BUFFER_SIZE: usize = 128;

/// Smallest accepted string capacity.
pub const MIN_STRING_BUFFER_SIZE: usize = 2;

/// Largest accepted string capacity.
pub const MAX_STRING_BUFFER_SIZE: usize = 64 * 1024;

/// Options that change how a program is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileOptions {
    /// Capacity of every string variable, including the terminator.
    pub string_buffer_size: usize,
}

impl CompileOptions {
    /// Set the string capacity, clamped to the accepted range.
    pub fn with_string_buffer_size(mut self, size: usize) -> Self {
        self.string_buffer_size = size.clamp(MIN_STRING_BUFFER_SIZE, MAX_STRING_BUFFER_SIZE);
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            string_buffer_size: DEFAULT_STRING_BUFFER_SIZE,
        }
    }
}

/// The result of a successful compilation.
#[derive(Debug)]
pub struct Compilation {
    /// Target code text produced by the backend.
    pub listing: String,
    /// The emitted instruction stream.
    pub instructions: Vec<Instruction>,
    /// Final compilation state (globals, signatures, target).
    pub context: CompilationContext,
}

impl Compilation {
    /// Load the compiled program into a reference machine.
    pub fn machine(&self) -> std::result::Result<Machine, MachineError> {
        Machine::new(self.instructions.clone(), self.context.target.clone())
    }
}

/// Compile source code for the virtual machine with default options.
///
/// # Example
///
/// ```no_run
/// let source = "program p\nvar x : int\nmain { x = 1 + 2; }\nendprogram\n";
///
/// match minnow::compile(source) {
///     Ok(compilation) => println!("{} instructions", compilation.instructions.len()),
///     Err(e) => eprintln!("Compilation error: {}", e),
/// }
/// ```
pub fn compile(source: &str) -> Result<Compilation> {
    compile_with(
        source,
        Box::new(VirtualBackend::new()),
        CompileOptions::default(),
    )
}

/// Compile source code through `backend` with the given options.
///
/// Compilation stops at the first error.
pub fn compile_with(
    source: &str,
    backend: Box<dyn Backend>,
    options: CompileOptions,
) -> Result<Compilation> {
    let options = options.with_string_buffer_size(options.string_buffer_size);
    let mut parser = Parser::new(source, backend, options)?;
    parser.parse_program()?;
    let (listing, instructions, context) = parser.into_output();
    Ok(Compilation {
        listing,
        instructions,
        context,
    })
}
