use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// The machine addresses this many words of memory.
pub const CAPACITY: usize = 1024;

const OP_LOAD: u8 = 0x00;
const OP_ADD: u8 = 0x01;
const OP_SUB: u8 = 0x02;
const OP_HALT: u8 = 0x03;

/// Represents complete machine state during runtime.
///
/// Memory cells and instructions share one word type: an instruction carries
/// its opcode in the high byte and a 24-bit unsigned operand in the low
/// bytes. The accumulator is the only register besides the program counter.
pub struct Cpu {
    /// Word-addressed memory, zeroed at construction.
    mem: Box<[i32; CAPACITY]>,
    /// Program counter. `CAPACITY` is the halted sentinel.
    pc: usize,
    /// Accumulator
    acc: i32,
    /// Words occupied by the loaded image.
    loaded: usize,
}

#[derive(Debug)]
pub enum CpuError {
    /// `step` was called on a halted machine.
    NotRunning,
    /// The object file could not be opened or read.
    SourceUnavailable { path: PathBuf, source: io::Error },
    /// A trace line could not be written.
    Io(io::Error),
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            mem: Box::new([0; CAPACITY]),
            pc: 0,
            acc: 0,
            loaded: 0,
        }
    }

    /// Load an object file into the memory prefix.
    ///
    /// Every four consecutive bytes form one little-endian word; a trailing
    /// group of 1-3 bytes is discarded. Loading stops once `CAPACITY` words
    /// are placed or the file is exhausted. Returns the number of words
    /// loaded. `pc` and the accumulator are left untouched.
    pub fn load(&mut self, path: &Path) -> Result<usize, CpuError> {
        let bytes = fs::read(path).map_err(|source| CpuError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.load_bytes(&bytes))
    }

    /// In-memory variant of [`Cpu::load`].
    pub fn load_bytes(&mut self, bytes: &[u8]) -> usize {
        let mut count = 0;
        for (cell, word) in self.mem.iter_mut().zip(bytes.chunks_exact(4)) {
            *cell = i32::from_le_bytes([word[0], word[1], word[2], word[3]]);
            count += 1;
        }
        self.loaded = count;
        count
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn acc(&self) -> i32 {
        self.acc
    }

    pub fn is_halted(&self) -> bool {
        self.pc == CAPACITY
    }

    /// Read a memory cell.
    ///
    /// Panics if `addr` is not below `CAPACITY`.
    pub fn read(&self, addr: usize) -> i32 {
        self.mem[addr]
    }

    /// Decode and execute the instruction at `pc`, writing one trace line.
    ///
    /// An opcode outside the table is not fatal: arbitrary object bytes are
    /// expected to contain junk. It is traced and skipped.
    pub fn step(&mut self, out: &mut dyn Write) -> Result<(), CpuError> {
        if self.is_halted() {
            return Err(CpuError::NotRunning);
        }
        let instr = self.mem[self.pc] as u32;
        let opcode = (instr >> 24) as u8;
        let operand = instr & 0x00FF_FFFF;
        // pc moves before the instruction takes effect
        self.pc += 1;
        match opcode {
            OP_LOAD => {
                self.acc = operand as i32;
                writeln!(out, "Loaded {operand} into accumulator")?;
            }
            OP_ADD => {
                self.acc = self.acc.wrapping_add(operand as i32);
                writeln!(out, "Added {operand} to accumulator")?;
            }
            OP_SUB => {
                self.acc = self.acc.wrapping_sub(operand as i32);
                writeln!(out, "Subtracted {operand} from accumulator")?;
            }
            OP_HALT => {
                self.pc = CAPACITY;
                writeln!(out, "Halted execution")?;
            }
            _ => writeln!(out, "Unknown opcode {opcode}")?,
        }
        Ok(())
    }

    /// Execute the loaded image and return the final accumulator.
    ///
    /// Walking off the end of the image halts the machine without a trace
    /// line; the cells past the image are zeroed and would otherwise decode
    /// as an endless stream of `LOAD 0`. Returns immediately on a machine
    /// that has already halted.
    pub fn run(&mut self, out: &mut dyn Write) -> Result<i32, CpuError> {
        while self.pc < self.loaded {
            self.step(out)?;
        }
        self.pc = CAPACITY;
        Ok(self.acc)
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotRunning => write!(f, "cannot step a halted machine"),
            Self::SourceUnavailable { path, source } => {
                write!(f, "unable to open object file `{}`: {}", path.display(), source)
            }
            Self::Io(err) => write!(f, "failed to write trace line: {}", err),
        }
    }
}

impl std::error::Error for CpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SourceUnavailable { source, .. } | Self::Io(source) => Some(source),
            Self::NotRunning => None,
        }
    }
}

impl From<io::Error> for CpuError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}
