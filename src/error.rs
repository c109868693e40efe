use std::io;
use std::path::Path;
use std::process::ExitStatus;

use miette::{miette, Report, Severity};

// Pipeline I/O errors

pub fn input_unavailable(path: &Path, err: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "io::input",
        help = "check that the file exists and is readable",
        "Unable to open input file `{}`: {err}",
        path.display(),
    )
}

pub fn output_unavailable(path: &Path, err: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "io::output",
        help = "check that the destination directory exists and is writable",
        "Unable to create output file `{}`: {err}",
        path.display(),
    )
}

// Toolchain errors

pub fn tool_missing(tool: &str, err: io::Error) -> Report {
    miette!(
        severity = Severity::Error,
        code = "tool::missing",
        help = "install the tool or point CCPU_CC/CCPU_AS at a replacement",
        "Unable to spawn `{tool}`: {err}",
    )
}

pub fn tool_failed(tool: &str, status: ExitStatus) -> Report {
    miette!(
        severity = Severity::Error,
        code = "tool::failed",
        help = "the tool's own diagnostics appear above",
        "`{tool}` exited unsuccessfully ({status})",
    )
}

// Preprocessor warnings, reported without aborting the pass

pub fn include_missing(name: &str, err: io::Error) -> Report {
    miette!(
        severity = Severity::Warning,
        code = "preproc::include",
        help = "included files are opened relative to the working directory",
        "Unable to open included file `{name}`: {err}",
    )
}

pub fn include_too_deep(name: &str) -> Report {
    miette!(
        severity = Severity::Warning,
        code = "preproc::depth",
        help = "a file that includes itself cannot be expanded",
        "Skipping `{name}`: includes nest deeper than {} levels",
        crate::preproc::MAX_INCLUDE_DEPTH,
    )
}
