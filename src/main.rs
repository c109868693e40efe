use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use miette::{IntoDiagnostic, Result};

use ccpu::{Cpu, OUTPUT_DELIMITER};

/// ccpu is a didactic C-to-CPU pipeline: it preprocesses a C source file,
/// hands it to an external compiler and assembler, and loads the resulting
/// object bytes into a tiny accumulator machine.
///
/// Each intermediate artifact is echoed to stdout, bracketed by `##OUTPUT##`
/// delimiter lines for an outer harness; progress goes to stderr.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// C source file to push through the pipeline
    input: PathBuf,
    /// Destination for preprocessed text, later overwritten with compiler assembly
    assembly: PathBuf,
    /// Destination for the assembled object file
    object: PathBuf,
    /// Execute the loaded image instead of only reporting the initial accumulator
    #[arg(short = 'x', long)]
    execute: bool,
}

fn main() -> Result<()> {
    use MsgColor::*;
    let args = Args::parse();
    ccpu::env::init();

    let stdout = io::stdout().lock();
    let mut out = BufWriter::new(stdout);

    file_message(Green, "Preprocessing", &args.input);
    ccpu::preprocess(&args.input, &args.assembly)?;
    let at_line_start = ccpu::dump_text(&args.assembly, &mut out)?;
    delimiter(&mut out, at_line_start)?;

    file_message(Green, "Compiling", &args.input);
    ccpu::emit_assembly(&args.input, &args.assembly)?;
    let at_line_start = ccpu::dump_text(&args.assembly, &mut out)?;
    delimiter(&mut out, at_line_start)?;

    file_message(Green, "Assembling", &args.assembly);
    ccpu::emit_object(&args.assembly, &args.object)?;
    let at_line_start = ccpu::dump_object(&args.object, &mut out)?;
    delimiter(&mut out, at_line_start)?;

    message(Green, "Loading", "object into machine memory");
    let mut cpu = Cpu::new();
    let words = cpu.load(&args.object).into_diagnostic()?;
    message(Green, "Loaded", &format!("{words} words"));

    let result = if args.execute {
        message(Green, "Running", "loaded image");
        cpu.run(&mut out).into_diagnostic()?
    } else {
        cpu.acc()
    };

    writeln!(out, "Result in accumulator: {result}").into_diagnostic()?;
    // The final delimiter carries no trailing newline.
    write!(out, "{OUTPUT_DELIMITER}").into_diagnostic()?;
    out.flush().into_diagnostic()?;

    file_message(Green, "Completed", &args.input);
    Ok(())
}

/// Print a delimiter on its own line, breaking the previous line if needed.
fn delimiter(out: &mut dyn Write, at_line_start: bool) -> Result<()> {
    if !at_line_start {
        writeln!(out).into_diagnostic()?;
    }
    writeln!(out, "{OUTPUT_DELIMITER}").into_diagnostic()?;
    Ok(())
}

#[allow(unused)]
enum MsgColor {
    Green,
    Cyan,
    Red,
}

fn file_message(color: MsgColor, left: &str, right: &Path) {
    let right = format!("target {}", right.display());
    message(color, left, &right);
}

// Progress lines go to stderr: stdout belongs to the artifact stream.
fn message<S>(color: MsgColor, left: S, right: S)
where
    S: Colorize + std::fmt::Display,
{
    let left = match color {
        MsgColor::Green => left.green(),
        MsgColor::Cyan => left.cyan(),
        MsgColor::Red => left.red(),
    };
    eprintln!("{left:>12} {right}");
}
