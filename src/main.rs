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

//! Minnow Compiler CLI
//!
//! Compiles a Minnow source file into a virtual-machine listing, and can run
//! the result on the reference machine.

use clap::{ArgAction, Parser};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use minnow::codegen::{backend_for, TARGETS};
use minnow::error::{format_error, render_report};
use minnow::{CompileOptions, Machine, DEFAULT_STRING_BUFFER_SIZE};

/// Minnow - A single-pass compiler for a small imperative language
#[derive(Parser, Debug)]
#[command(name = "minnow")]
#[command(version)]
#[command(about = "A single-pass compiler for a small imperative language")]
#[command(long_about = r#"
Minnow compiles a source file in a single pass into a listing for a
virtual accumulator machine.

Without -o and without --run the listing is written to stdout.

Example usage:
  minnow hello.mnw
  minnow hello.mnw -o hello.vm
  minnow hello.mnw --run
  minnow hello.mnw --string-buffer-size 256 --pretty
"#)]
struct Cli {
    /// Source file to compile
    input: PathBuf,

    /// Write the listing to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Code generation target
    #[arg(long, default_value = "vm")]
    target: String,

    /// Capacity of string variables in bytes, including the terminator
    #[arg(long, default_value_t = DEFAULT_STRING_BUFFER_SIZE)]
    string_buffer_size: usize,

    /// Run the compiled program on the reference machine
    #[arg(short, long)]
    run: bool,

    /// Render errors as annotated source reports
    #[arg(long)]
    pretty: bool,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Warning: Cannot install logger: {}", e);
    }

    let Some(backend) = backend_for(&cli.target) else {
        eprintln!(
            "Error: Unknown target '{}'. Available targets: {}",
            cli.target,
            TARGETS.join(", ")
        );
        return ExitCode::from(2);
    };

    let source = match std::fs::read_to_string(&cli.input) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Cannot read {}: {}", cli.input.display(), e);
            return ExitCode::from(3);
        }
    };
    info!("compiling {}", cli.input.display());

    let options = CompileOptions::default().with_string_buffer_size(cli.string_buffer_size);
    let compilation = match minnow::compile_with(&source, backend, options) {
        Ok(compilation) => compilation,
        Err(e) => {
            if cli.pretty {
                let filename = cli.input.file_name().and_then(|s| s.to_str());
                eprint!("{}", render_report(&e, &source, filename));
            } else {
                eprint!("{}", format_error(&e));
            }
            return ExitCode::from(1);
        }
    };
    info!(
        "generated {} instructions for target '{}'",
        compilation.instructions.len(),
        compilation.context.target.name
    );

    match &cli.output {
        Some(path) => {
            if let Err(e) = std::fs::write(path, &compilation.listing) {
                eprintln!("Error: Cannot write {}: {}", path.display(), e);
                return ExitCode::from(3);
            }
            info!("wrote {}", path.display());
        }
        None if !cli.run => {
            let mut stdout = io::stdout().lock();
            if let Err(e) = stdout.write_all(compilation.listing.as_bytes()) {
                eprintln!("Error: Cannot write listing: {}", e);
                return ExitCode::from(3);
            }
        }
        None => {}
    }

    if cli.run {
        let mut machine = match Machine::new(
            compilation.instructions,
            compilation.context.target.clone(),
        ) {
            Ok(machine) => machine,
            Err(e) => {
                eprintln!("Runtime error: {}", e);
                return ExitCode::from(4);
            }
        };
        let mut input = io::stdin().lock();
        let mut output = io::stdout().lock();
        if let Err(e) = machine.run(&mut input, &mut output) {
            let _ = output.flush();
            eprintln!("Runtime error: {}", e);
            return ExitCode::from(4);
        }
        if let Err(e) = output.flush() {
            eprintln!("Error: Cannot write output: {}", e);
            return ExitCode::from(3);
        }
        info!("program finished after {} steps", machine.steps());
    }

    ExitCode::SUCCESS
}
