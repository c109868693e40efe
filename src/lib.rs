// Pipeline stages
mod preproc;
pub use preproc::preprocess;
mod toolchain;
pub use toolchain::{emit_assembly, emit_object};
mod dump;
pub use dump::{dump_object, dump_text};

// Emulation
mod cpu;
pub use cpu::{Cpu, CpuError, CAPACITY};

mod error;

pub mod env;

/// Delimiter line separating artifact dumps on standard output.
pub const OUTPUT_DELIMITER: &str = "##OUTPUT##";
