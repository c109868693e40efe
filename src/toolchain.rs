//! Thin wrappers over the external compiler and assembler.
//!
//! Both tools inherit this process's stdio and only their exit status is
//! inspected; the produced artifacts are picked up from the filesystem
//! afterwards.

use std::path::Path;
use std::process::Command;

use miette::Result;

use crate::{env, error};

/// Compile `source` to assembly at `asm` with the external C compiler.
pub fn emit_assembly(source: &Path, asm: &Path) -> Result<()> {
    let cc = env::cc();
    let status = Command::new(&cc)
        .arg("-S")
        .arg("-o")
        .arg(asm)
        .arg(source)
        .status()
        .map_err(|err| error::tool_missing(&cc, err))?;
    if !status.success() {
        return Err(error::tool_failed(&cc, status));
    }
    Ok(())
}

/// Assemble `asm` into an object file at `obj` with the external assembler.
pub fn emit_object(asm: &Path, obj: &Path) -> Result<()> {
    let assembler = env::assembler();
    let status = Command::new(&assembler)
        .arg("-o")
        .arg(obj)
        .arg(asm)
        .status()
        .map_err(|err| error::tool_missing(&assembler, err))?;
    if !status.success() {
        return Err(error::tool_failed(&assembler, status));
    }
    Ok(())
}
