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

//! Reference machine for the virtual instruction set.
//!
//! The machine executes the instruction stream recorded by the emitter. It
//! is what the `--run` flag and the run-time tests use; it is not meant to
//! be fast.
//!
//! Memory is one flat byte array:
//!
//! ```text
//! 0        word     statics ...   scratch buffers ...   stack (grows down) top
//! | guard  | globals, string constants | SaveString temporaries | frames   |
//! ```
//!
//! The save stack (operands of binary operations) and the call stack
//! (return addresses and saved frame bases) live outside memory.

mod error;
mod memory;

pub use error::MachineError;
pub use memory::Memory;

use crate::codegen::{
    Instruction, Location, ParamLocation, StaticInit, TargetInfo, TransferKind, Width,
};
use crate::lexer::parse_number_literal;
use log::debug;
use std::collections::HashMap;
use std::io::{BufRead, Write};

/// Default number of instructions a run may execute.
pub const DEFAULT_MAX_STEPS: u64 = 10_000_000;

/// Default size of the frame stack in bytes.
pub const DEFAULT_STACK_SIZE: usize = 256 * 1024;

/// Smallest capacity of a string scratch buffer.
const MIN_SCRATCH_CAPACITY: usize = 256;

/// Maximum depth of the save stack.
const SAVE_STACK_LIMIT: usize = 256;

/// Maximum depth of the call stack.
const CALL_STACK_LIMIT: usize = 4096;

/// A saved caller context.
#[derive(Debug, Clone, Copy)]
struct Frame {
    return_pc: usize,
    fp: i64,
}

/// The reference machine.
pub struct Machine {
    program: Vec<Instruction>,
    target: TargetInfo,
    memory: Memory,

    labels: HashMap<String, usize>,
    functions: HashMap<String, usize>,
    statics: HashMap<String, i64>,
    entry: usize,

    scratch_base: i64,
    scratch_capacity: usize,
    stack_limit: i64,
    stack_top: i64,

    acc: i64,
    index: i64,
    registers: Vec<i64>,
    save_stack: Vec<i64>,
    call_stack: Vec<Frame>,
    sp: i64,
    fp: i64,
    pc: usize,

    max_steps: u64,
    steps: u64,
}

impl Machine {
    /// Load a program, resolving labels, function entries and static storage.
    pub fn new(program: Vec<Instruction>, target: TargetInfo) -> Result<Self, MachineError> {
        Self::with_stack_size(program, target, DEFAULT_STACK_SIZE)
    }

    /// Load a program with a frame stack of `stack_size` bytes.
    pub fn with_stack_size(
        program: Vec<Instruction>,
        target: TargetInfo,
        stack_size: usize,
    ) -> Result<Self, MachineError> {
        let word = target.word_size;
        let mut labels = HashMap::new();
        let mut functions = HashMap::new();
        let mut static_layout = Vec::new();
        let mut entry = None;
        let mut scratch_capacity = MIN_SCRATCH_CAPACITY;

        // Address 0 stays unused so a zero pointer never aliases a variable
        let mut next_static = word;

        for (pc, instruction) in program.iter().enumerate() {
            match instruction {
                Instruction::Label(label) => {
                    labels.insert(label.clone(), pc);
                }
                Instruction::FunctionPrologue { name, .. } => {
                    functions.insert(name.clone(), pc);
                }
                Instruction::MainEntry => entry = Some(pc),
                Instruction::DeclareStatic { symbol, size, init, .. } => {
                    static_layout.push((symbol.clone(), next_static, init.clone(), *size));
                    next_static += size.div_ceil(word).max(1) * word;
                }
                Instruction::DeclareString { symbol, text } => {
                    let init = StaticInit::Str(text.clone());
                    let size = text.len() + 1;
                    static_layout.push((symbol.clone(), next_static, init, size));
                    next_static += size.div_ceil(word) * word;
                }
                Instruction::AssignString { capacity, .. }
                | Instruction::ReadString { capacity, .. }
                | Instruction::TransferParameter {
                    kind: TransferKind::String { capacity },
                    ..
                } => {
                    scratch_capacity = scratch_capacity.max(capacity * 2);
                }
                _ => {}
            }
        }
        let entry = entry.ok_or(MachineError::NoEntry)?;

        let scratch_base = next_static as i64;
        let stack_limit = scratch_base + (SAVE_STACK_LIMIT * scratch_capacity) as i64;
        let stack_top = stack_limit + stack_size as i64;
        let mut memory = Memory::new(stack_top as usize, word);

        let mut statics = HashMap::new();
        for (symbol, address, init, size) in static_layout {
            let address = address as i64;
            match init {
                StaticInit::Zero => {}
                StaticInit::Int(value) => {
                    let width = if size == 1 { Width::Byte } else { Width::Word };
                    memory.write(address, width, value)?;
                }
                StaticInit::Str(text) => memory.write_str(address, text.as_bytes(), size)?,
            }
            statics.insert(symbol, address);
        }
        debug!(
            "loaded {} instructions, {} statics, {} bytes of memory",
            program.len(),
            statics.len(),
            memory.size()
        );

        Ok(Self {
            registers: vec![0; target.register_params],
            program,
            target,
            memory,
            labels,
            functions,
            statics,
            entry,
            scratch_base,
            scratch_capacity,
            stack_limit,
            stack_top,
            acc: 0,
            index: 0,
            save_stack: Vec::new(),
            call_stack: Vec::new(),
            sp: stack_top,
            fp: stack_top,
            pc: entry,
            max_steps: DEFAULT_MAX_STEPS,
            steps: 0,
        })
    }

    /// Set the number of instructions a run may execute.
    pub fn set_max_steps(&mut self, max_steps: u64) {
        self.max_steps = max_steps;
    }

    /// Get the number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Get the machine memory.
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Get the address of a static symbol.
    pub fn static_address(&self, symbol: &str) -> Option<i64> {
        self.statics.get(symbol).copied()
    }

    /// Run from `main` until it halts.
    pub fn run(
        &mut self,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<(), MachineError> {
        self.pc = self.entry;
        self.sp = self.stack_top;
        self.fp = self.stack_top;
        self.steps = 0;
        self.save_stack.clear();
        self.call_stack.clear();

        loop {
            if self.steps >= self.max_steps {
                return Err(MachineError::StepLimit(self.max_steps));
            }
            self.steps += 1;

            let Some(instruction) = self.program.get(self.pc).cloned() else {
                return Err(MachineError::MemoryFault {
                    address: self.pc as i64,
                });
            };
            self.pc += 1;
            if !self.step(&instruction, input, output)? {
                break;
            }
        }
        output.flush()?;
        debug!("halted after {} steps", self.steps);
        Ok(())
    }

    /// Execute one instruction. Returns `false` once the program halts.
    fn step(
        &mut self,
        instruction: &Instruction,
        input: &mut dyn BufRead,
        output: &mut dyn Write,
    ) -> Result<bool, MachineError> {
        use Instruction::*;

        match instruction {
            ProgramStart { .. } | ProgramEnd | DeclareStatic { .. } | DeclareString { .. } => {}
            Label(_) => {}
            MainEntry => {
                self.sp = self.stack_top;
                self.fp = self.stack_top;
            }
            MainExit => return Ok(false),
            FunctionPrologue { .. } => {}
            FunctionEpilogue { .. } | Return => self.return_from_call()?,
            TransferParameter { source, offset, kind } => {
                let value = match source {
                    ParamLocation::Register(index) => self.registers[*index],
                    ParamLocation::Stack { offset } => {
                        self.memory.read(self.fp + offset, Width::Word)?
                    }
                };
                let target = self.fp + offset;
                match kind {
                    TransferKind::Value(width) => self.memory.write(target, *width, value)?,
                    TransferKind::String { capacity } => {
                        let text = self.memory.read_str(value)?;
                        self.memory.write_str(target, &text, *capacity)?;
                    }
                }
            }

            AllocateStack(bytes) => {
                let sp = self.sp - *bytes as i64;
                if sp < self.stack_limit {
                    return Err(MachineError::StackOverflow("frame stack"));
                }
                self.memory.clear(sp, *bytes)?;
                self.sp = sp;
            }
            ReleaseStack(bytes) => self.sp += *bytes as i64,

            SetAccumulator(value) => self.acc = *value,
            Clear => self.acc = 0,
            Increment => self.acc = self.acc.wrapping_add(1),
            Decrement => self.acc = self.acc.wrapping_sub(1),
            Negate => self.acc = self.acc.wrapping_neg(),
            Not => self.acc = !self.acc,
            SaveAccumulator => self.push(self.acc)?,

            Add | Sub | Mul | Div | Mod | Shl | Shr | Or | Xor | And | CompareEq | CompareNe
            | CompareLt | CompareLe | CompareGt | CompareGe | BooleanOr | BooleanAnd => {
                let left = self.pop()?;
                self.acc = binary(instruction, left, self.acc)?;
            }
            BooleanNot => self.acc = i64::from(self.acc == 0),

            LoadVariable { location, width } => {
                let address = self.address_of(location)?;
                self.acc = self.memory.read(address, *width)?;
            }
            LoadElement { location, width } => {
                let address = self.element_address(location, *width)?;
                self.acc = self.memory.read(address, *width)?;
            }
            LoadAddress { location } => self.acc = self.address_of(location)?,
            LoadIndirect => self.acc = self.memory.read(self.acc, Width::Word)?,
            StoreVariable { location, width } => {
                let address = self.address_of(location)?;
                self.memory.write(address, *width, self.acc)?;
            }
            StoreElement { location, width } => {
                let address = self.element_address(location, *width)?;
                self.memory.write(address, *width, self.acc)?;
            }
            StoreIndirect => {
                let address = self.pop()?;
                self.memory.write(address, Width::Word, self.acc)?;
            }
            StashIndex => self.index = self.acc,
            PopIndex => self.index = self.pop()?,

            Jump(label) => self.pc = self.label(label)?,
            JumpIfFalse(label) => {
                if self.acc == 0 {
                    self.pc = self.label(label)?;
                }
            }

            PrepareCall { stack_args } => {
                let sp = self.sp - (stack_args * self.target.word_size) as i64;
                if sp < self.stack_limit {
                    return Err(MachineError::StackOverflow("frame stack"));
                }
                self.sp = sp;
            }
            LoadParameter(index) => {
                let value = self.pop()?;
                match self.target.param_location(*index) {
                    ParamLocation::Register(register) => self.registers[register] = value,
                    ParamLocation::Stack { offset } => {
                        let address = self.sp + offset;
                        self.memory.write(address, Width::Word, value)?;
                    }
                }
            }
            Call(name) => {
                let Some(&entry) = self.functions.get(name) else {
                    return Err(MachineError::UnresolvedSymbol(name.clone()));
                };
                if self.call_stack.len() >= CALL_STACK_LIMIT {
                    return Err(MachineError::StackOverflow("call stack"));
                }
                self.call_stack.push(Frame {
                    return_pc: self.pc,
                    fp: self.fp,
                });
                self.fp = self.sp;
                self.pc = entry + 1;
            }
            FinishCall { stack_args } => {
                self.sp += (stack_args * self.target.word_size) as i64;
            }

            SaveString => {
                let text = self.memory.read_str(self.acc)?;
                let buffer = self.scratch_buffer()?;
                self.memory.write_str(buffer, &text, self.scratch_capacity)?;
                self.push(buffer)?;
            }
            AddString => {
                let left = self.pop()?;
                let mut text = self.memory.read_str(left)?;
                text.extend(self.memory.read_str(self.acc)?);
                let buffer = self.scratch_buffer()?;
                self.memory.write_str(buffer, &text, self.scratch_capacity)?;
                self.acc = buffer;
            }
            KeepString => {
                // The caller's pending operands sit below the current depth
                let text = self.memory.read_str(self.acc)?;
                let buffer = self.scratch_buffer()?;
                self.memory.write_str(buffer, &text, self.scratch_capacity)?;
                self.acc = buffer;
            }
            CompareStringEq | CompareStringNe => {
                let left = self.pop()?;
                let equal = self.memory.read_str(left)? == self.memory.read_str(self.acc)?;
                self.acc = i64::from(equal == matches!(instruction, CompareStringEq));
            }
            AssignString { location, capacity } => {
                let text = self.memory.read_str(self.acc)?;
                let address = self.address_of(location)?;
                self.memory.write_str(address, &text, *capacity)?;
            }
            PrintString => {
                let text = self.memory.read_str(self.acc)?;
                output.write_all(&text)?;
            }
            ReadString { location, capacity } => {
                let line = read_line(input)?.unwrap_or_default();
                let address = self.address_of(location)?;
                self.memory.write_str(address, line.as_bytes(), *capacity)?;
            }

            PrintInt => write!(output, "{}", self.acc)?,
            PrintNewline => writeln!(output)?,
            ReadInt => {
                let Some(line) = read_line(input)? else {
                    return Err(MachineError::InvalidInput("unexpected end of input".to_string()));
                };
                let text = line.trim();
                self.acc = parse_number_literal(text).ok_or_else(|| {
                    MachineError::InvalidInput(format!("'{}' is not a number", text))
                })?;
            }
        }
        Ok(true)
    }

    fn push(&mut self, value: i64) -> Result<(), MachineError> {
        if self.save_stack.len() >= SAVE_STACK_LIMIT {
            return Err(MachineError::StackOverflow("save stack"));
        }
        self.save_stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<i64, MachineError> {
        self.save_stack
            .pop()
            .ok_or(MachineError::StackOverflow("save stack underflow"))
    }

    /// Get the scratch buffer that belongs to the current save-stack depth.
    ///
    /// A temporary string saved at depth `n` stays alive until the save stack
    /// drops below `n`, so nested expressions never overwrite each other.
    fn scratch_buffer(&self) -> Result<i64, MachineError> {
        let depth = self.save_stack.len();
        if depth >= SAVE_STACK_LIMIT {
            return Err(MachineError::StackOverflow("string scratch"));
        }
        Ok(self.scratch_base + (depth * self.scratch_capacity) as i64)
    }

    fn return_from_call(&mut self) -> Result<(), MachineError> {
        let frame = self
            .call_stack
            .pop()
            .ok_or(MachineError::StackOverflow("call stack underflow"))?;
        self.sp = self.fp;
        self.fp = frame.fp;
        self.pc = frame.return_pc;
        Ok(())
    }

    fn label(&self, label: &str) -> Result<usize, MachineError> {
        self.labels
            .get(label)
            .copied()
            .ok_or_else(|| MachineError::UnknownLabel(label.to_string()))
    }

    fn address_of(&self, location: &Location) -> Result<i64, MachineError> {
        match location {
            Location::Static(symbol) => self
                .statics
                .get(symbol)
                .copied()
                .ok_or_else(|| MachineError::UnresolvedSymbol(symbol.clone())),
            Location::Frame(offset) => Ok(self.fp + offset),
        }
    }

    fn element_address(&self, location: &Location, width: Width) -> Result<i64, MachineError> {
        let base = self.address_of(location)?;
        let stride = self.memory.width_bytes(width) as i64;
        Ok(base.wrapping_add(self.index.wrapping_mul(stride)))
    }
}

/// Apply a binary instruction to `left` (popped) and `right` (accumulator).
fn binary(instruction: &Instruction, left: i64, right: i64) -> Result<i64, MachineError> {
    use Instruction::*;

    Ok(match instruction {
        Add => left.wrapping_add(right),
        Sub => left.wrapping_sub(right),
        Mul => left.wrapping_mul(right),
        Div | Mod if right == 0 => return Err(MachineError::DivisionByZero),
        Div => left.wrapping_div(right),
        Mod => left.wrapping_rem(right),
        Shl => left.wrapping_shl(right as u32),
        Shr => left.wrapping_shr(right as u32),
        Or => left | right,
        Xor => left ^ right,
        And => left & right,
        CompareEq => i64::from(left == right),
        CompareNe => i64::from(left != right),
        CompareLt => i64::from(left < right),
        CompareLe => i64::from(left <= right),
        CompareGt => i64::from(left > right),
        CompareGe => i64::from(left >= right),
        BooleanOr => i64::from(left != 0 || right != 0),
        BooleanAnd => i64::from(left != 0 && right != 0),
        _ => right,
    })
}

/// Read one line without its line terminator. `None` at end of input.
fn read_line(input: &mut dyn BufRead) -> Result<Option<String>, MachineError> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Some(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::{Backend, VirtualBackend};

    fn target() -> TargetInfo {
        VirtualBackend::new().target()
    }

    fn run(program: Vec<Instruction>) -> Result<String, MachineError> {
        let mut machine = Machine::new(program, target())?;
        let mut output = Vec::new();
        machine.run(&mut std::io::empty(), &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    #[test]
    fn test_no_entry() {
        assert!(matches!(
            Machine::new(vec![Instruction::ProgramEnd], target()),
            Err(MachineError::NoEntry)
        ));
    }

    #[test]
    fn test_binary_pops_left_operand() {
        let output = run(vec![
            Instruction::MainEntry,
            Instruction::SetAccumulator(10),
            Instruction::SaveAccumulator,
            Instruction::SetAccumulator(3),
            Instruction::Sub,
            Instruction::PrintInt,
            Instruction::MainExit,
        ])
        .unwrap();
        assert_eq!(output, "7");
    }

    #[test]
    fn test_division_by_zero() {
        let result = run(vec![
            Instruction::MainEntry,
            Instruction::SetAccumulator(1),
            Instruction::SaveAccumulator,
            Instruction::Clear,
            Instruction::Div,
            Instruction::MainExit,
        ]);
        assert!(matches!(result, Err(MachineError::DivisionByZero)));
    }

    #[test]
    fn test_unknown_label() {
        let result = run(vec![
            Instruction::MainEntry,
            Instruction::Jump("nowhere".to_string()),
        ]);
        assert!(matches!(result, Err(MachineError::UnknownLabel(label)) if label == "nowhere"));
    }

    #[test]
    fn test_step_limit() {
        let mut machine = Machine::new(
            vec![
                Instruction::MainEntry,
                Instruction::Label("spin".to_string()),
                Instruction::Jump("spin".to_string()),
            ],
            target(),
        )
        .unwrap();
        machine.set_max_steps(100);
        let result = machine.run(&mut std::io::empty(), &mut Vec::new());
        assert!(matches!(result, Err(MachineError::StepLimit(100))));
    }

    #[test]
    fn test_static_string_printed() {
        let output = run(vec![
            Instruction::DeclareString {
                symbol: "str.0".to_string(),
                text: "hi".to_string(),
            },
            Instruction::MainEntry,
            Instruction::LoadAddress {
                location: Location::Static("str.0".to_string()),
            },
            Instruction::PrintString,
            Instruction::MainExit,
        ])
        .unwrap();
        assert_eq!(output, "hi");
    }

    #[test]
    fn test_unresolved_external_call() {
        let result = run(vec![
            Instruction::MainEntry,
            Instruction::PrepareCall { stack_args: 0 },
            Instruction::Call("missing".to_string()),
        ]);
        assert!(matches!(result, Err(MachineError::UnresolvedSymbol(name)) if name == "missing"));
    }
}
