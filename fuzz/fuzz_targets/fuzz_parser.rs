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

//! Fuzz target for the Minnow parser.
//!
//! Random fragments are placed inside a valid program skeleton so the
//! fuzzer spends its time in declarations and statements instead of
//! failing on the `program` header.
//!
//! Run with:
//!   cargo +nightly fuzz run fuzz_parser
//!
//! Run for a specific duration:
//!   cargo +nightly fuzz run fuzz_parser -- -max_total_time=60

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Fragments<'a> {
    declarations: &'a str,
    body: &'a str,
}

fuzz_target!(|fragments: Fragments| {
    let source = format!(
        "program fuzz\n{}\nmain {{\n{}\n}}\nendprogram\n",
        fragments.declarations, fragments.body
    );
    // Should never panic, only return Ok or Err
    let _ = minnow::compile(&source);
});
