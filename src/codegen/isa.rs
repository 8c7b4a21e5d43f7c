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

//! The virtual instruction set.
//!
//! An accumulator machine with an explicit save stack for binary-operation
//! operands. Binary operations pop their left operand from the save stack
//! and take their right operand from the accumulator; the result replaces
//! the accumulator. String values travel through the accumulator as the
//! address of their text.

use std::fmt;

/// Where a variable lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Location {
    /// Static storage, addressed by symbol.
    Static(String),
    /// Offset from the current frame base.
    Frame(i64),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Static(symbol) => f.write_str(symbol),
            Location::Frame(offset) if *offset < 0 => write!(f, "[fp-{}]", -offset),
            Location::Frame(offset) => write!(f, "[fp+{}]", offset),
        }
    }
}

/// Memory access width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    fn suffix(&self) -> &'static str {
        match self {
            Width::Byte => "b",
            Width::Word => "w",
        }
    }
}

/// Initial contents of static storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticInit {
    Zero,
    Int(i64),
    Str(String),
}

/// Where a parameter travels between caller and callee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamLocation {
    /// Parameter input register.
    Register(usize),
    /// Caller-established stack area, at an offset from the callee's frame base.
    Stack { offset: i64 },
}

impl fmt::Display for ParamLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamLocation::Register(index) => write!(f, "r{}", index),
            ParamLocation::Stack { offset } => write!(f, "[fp+{}]", offset),
        }
    }
}

/// How a parameter is copied into its frame slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferKind {
    /// Copy the value itself.
    Value(Width),
    /// Copy the text the value points at into a buffer of this capacity.
    String { capacity: usize },
}

/// A virtual machine instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    // Program structure
    ProgramStart { name: String },
    ProgramEnd,
    MainEntry,
    MainExit,
    FunctionPrologue { name: String, exported: bool },
    FunctionEpilogue { name: String },
    Return,
    TransferParameter {
        source: ParamLocation,
        offset: i64,
        kind: TransferKind,
    },

    // Storage
    DeclareStatic {
        symbol: String,
        size: usize,
        init: StaticInit,
        exported: bool,
    },
    DeclareString { symbol: String, text: String },
    AllocateStack(usize),
    ReleaseStack(usize),

    // Accumulator
    SetAccumulator(i64),
    Clear,
    Increment,
    Decrement,
    Negate,
    Not,
    SaveAccumulator,

    // Binary operations (left popped, right in the accumulator)
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shl,
    Shr,
    Or,
    Xor,
    And,
    CompareEq,
    CompareNe,
    CompareLt,
    CompareLe,
    CompareGt,
    CompareGe,
    BooleanOr,
    BooleanAnd,
    BooleanNot,

    // Memory
    LoadVariable { location: Location, width: Width },
    LoadElement { location: Location, width: Width },
    LoadAddress { location: Location },
    LoadIndirect,
    StoreVariable { location: Location, width: Width },
    StoreElement { location: Location, width: Width },
    StoreIndirect,
    StashIndex,
    PopIndex,

    // Control flow
    Label(String),
    Jump(String),
    JumpIfFalse(String),

    // Calls
    PrepareCall { stack_args: usize },
    LoadParameter(usize),
    Call(String),
    FinishCall { stack_args: usize },

    // Strings
    SaveString,
    AddString,
    /// Copy the string in the accumulator into a scratch buffer owned by
    /// the caller, so it outlives the returning frame.
    KeepString,
    CompareStringEq,
    CompareStringNe,
    AssignString { location: Location, capacity: usize },
    PrintString,
    ReadString { location: Location, capacity: usize },

    // I/O
    PrintInt,
    PrintNewline,
    ReadInt,
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match self {
            ProgramStart { name } => write!(f, ".program {}", name),
            ProgramEnd => f.write_str(".endprogram"),
            MainEntry => f.write_str("enter main"),
            MainExit => f.write_str("halt"),
            FunctionPrologue { name, .. } => write!(f, "enter {}", name),
            FunctionEpilogue { .. } => f.write_str("leave"),
            Return => f.write_str("ret"),
            TransferParameter {
                source,
                offset,
                kind,
            } => {
                let slot = Location::Frame(*offset);
                match kind {
                    TransferKind::Value(width) => {
                        write!(f, "arg.{} {}, {}", width.suffix(), source, slot)
                    }
                    TransferKind::String { capacity } => {
                        write!(f, "arg.str {}, {}, {}", source, slot, capacity)
                    }
                }
            }
            DeclareStatic {
                symbol, size, init, ..
            } => {
                write!(f, ".static {} {}", symbol, size)?;
                match init {
                    StaticInit::Zero => Ok(()),
                    StaticInit::Int(value) => write!(f, " = {}", value),
                    StaticInit::Str(text) => write!(f, " = \"{}\"", text),
                }
            }
            DeclareString { symbol, text } => write!(f, ".string {} \"{}\"", symbol, text),
            AllocateStack(bytes) => write!(f, "alloc {}", bytes),
            ReleaseStack(bytes) => write!(f, "release {}", bytes),
            SetAccumulator(value) => write!(f, "set {}", value),
            Clear => f.write_str("clear"),
            Increment => f.write_str("inc"),
            Decrement => f.write_str("dec"),
            Negate => f.write_str("neg"),
            Not => f.write_str("not"),
            SaveAccumulator => f.write_str("push"),
            Add => f.write_str("add"),
            Sub => f.write_str("sub"),
            Mul => f.write_str("mul"),
            Div => f.write_str("div"),
            Mod => f.write_str("mod"),
            Shl => f.write_str("shl"),
            Shr => f.write_str("shr"),
            Or => f.write_str("or"),
            Xor => f.write_str("xor"),
            And => f.write_str("and"),
            CompareEq => f.write_str("cmp.eq"),
            CompareNe => f.write_str("cmp.ne"),
            CompareLt => f.write_str("cmp.lt"),
            CompareLe => f.write_str("cmp.le"),
            CompareGt => f.write_str("cmp.gt"),
            CompareGe => f.write_str("cmp.ge"),
            BooleanOr => f.write_str("bool.or"),
            BooleanAnd => f.write_str("bool.and"),
            BooleanNot => f.write_str("bool.not"),
            LoadVariable { location, width } => write!(f, "load.{} {}", width.suffix(), location),
            LoadElement { location, width } => {
                write!(f, "load.{} {}[idx]", width.suffix(), location)
            }
            LoadAddress { location } => write!(f, "lea {}", location),
            LoadIndirect => f.write_str("load.w [acc]"),
            StoreVariable { location, width } => {
                write!(f, "store.{} {}", width.suffix(), location)
            }
            StoreElement { location, width } => {
                write!(f, "store.{} {}[idx]", width.suffix(), location)
            }
            StoreIndirect => f.write_str("store.w [pop]"),
            StashIndex => f.write_str("idx acc"),
            PopIndex => f.write_str("idx pop"),
            Label(label) => write!(f, "{}:", label),
            Jump(label) => write!(f, "jump {}", label),
            JumpIfFalse(label) => write!(f, "jump.false {}", label),
            PrepareCall { stack_args } => write!(f, "call.prep {}", stack_args),
            LoadParameter(index) => write!(f, "param {}", index),
            Call(name) => write!(f, "call {}", name),
            FinishCall { stack_args } => write!(f, "call.done {}", stack_args),
            SaveString => f.write_str("str.push"),
            AddString => f.write_str("str.add"),
            KeepString => f.write_str("str.keep"),
            CompareStringEq => f.write_str("str.eq"),
            CompareStringNe => f.write_str("str.ne"),
            AssignString { location, capacity } => {
                write!(f, "str.store {}, {}", location, capacity)
            }
            PrintString => f.write_str("print.str"),
            ReadString { location, capacity } => write!(f, "read.str {}, {}", location, capacity),
            PrintInt => f.write_str("print.int"),
            PrintNewline => f.write_str("print.nl"),
            ReadInt => f.write_str("read.int"),
        }
    }
}
