//! Naive textual preprocessing.
//!
//! A line-oriented filter: local `#include "..."` directives are inlined
//! recursively through one opened output sink, `#define` lines are dropped
//! without building a macro table, and everything else passes through
//! byte-for-byte. System-style `#include <...>` is not recognized and falls
//! through verbatim into the compiler's input.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use miette::{IntoDiagnostic, Result};

use crate::error;

/// Include nesting bound. A file that includes itself would otherwise expand
/// forever.
pub(crate) const MAX_INCLUDE_DEPTH: usize = 64;

/// Expand `input` into `output`, eliding `#include "..."` and `#define`
/// lines.
///
/// An unopenable top-level input or output is fatal; an unopenable included
/// file is reported on stderr and skipped.
pub fn preprocess(input: &Path, output: &Path) -> Result<()> {
    let src = fs::read_to_string(input).map_err(|err| error::input_unavailable(input, err))?;
    let file = File::create(output).map_err(|err| error::output_unavailable(output, err))?;
    let mut out = BufWriter::new(file);
    expand(&src, &mut out, 0)?;
    out.flush().into_diagnostic()
}

fn expand(src: &str, out: &mut dyn Write, depth: usize) -> Result<()> {
    for line in src.split_inclusive('\n') {
        let token = line.trim_start();
        if let Some(rest) = token.strip_prefix("#include") {
            if let Some(name) = quoted_name(rest) {
                include(name, out, depth)?;
                continue;
            }
            // `#include <...>` and malformed forms fall through verbatim.
        } else if token.starts_with("#define") {
            continue;
        }
        out.write_all(line.as_bytes()).into_diagnostic()?;
    }
    Ok(())
}

fn include(name: &str, out: &mut dyn Write, depth: usize) -> Result<()> {
    if depth >= MAX_INCLUDE_DEPTH {
        eprintln!("{:?}", error::include_too_deep(name));
        return Ok(());
    }
    // Included files are opened relative to the working directory.
    match fs::read_to_string(name) {
        Ok(src) => expand(&src, out, depth + 1),
        Err(err) => {
            eprintln!("{:?}", error::include_missing(name, err));
            Ok(())
        }
    }
}

/// Extract `name` from the `"name"` following the directive.
fn quoted_name(rest: &str) -> Option<&str> {
    let rest = rest.trim_start().strip_prefix('"')?;
    let end = rest.find('"')?;
    Some(&rest[..end])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn preprocessed(dir: &Path, input: &Path) -> String {
        let output = dir.join("out.i");
        preprocess(input, &output).unwrap();
        fs::read_to_string(output).unwrap()
    }

    #[test]
    fn inlines_quoted_include_and_drops_define() {
        let dir = tempfile::tempdir().unwrap();
        let inc = write(dir.path(), "a.txt", "hello\n");
        let input = write(
            dir.path(),
            "input.c",
            &format!("#include \"{}\"\n#define X 1\nint x;\n", inc.display()),
        );
        assert_eq!(preprocessed(dir.path(), &input), "hello\nint x;\n");
    }

    #[test]
    fn system_include_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "input.c", "#include <stdio.h>\nint x;\n");
        assert_eq!(
            preprocessed(dir.path(), &input),
            "#include <stdio.h>\nint x;\n"
        );
    }

    #[test]
    fn nested_includes_expand_depth_first() {
        let dir = tempfile::tempdir().unwrap();
        let inner = write(dir.path(), "inner.h", "int inner;\n");
        let outer = write(
            dir.path(),
            "outer.h",
            &format!("int before;\n#include \"{}\"\nint after;\n", inner.display()),
        );
        let input = write(
            dir.path(),
            "input.c",
            &format!("#include \"{}\"\nint main;\n", outer.display()),
        );
        assert_eq!(
            preprocessed(dir.path(), &input),
            "int before;\nint inner;\nint after;\nint main;\n"
        );
    }

    #[test]
    fn missing_include_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(
            dir.path(),
            "input.c",
            &format!("#include \"{}\"\nint y;\n", dir.path().join("nope.h").display()),
        );
        assert_eq!(preprocessed(dir.path(), &input), "int y;\n");
    }

    #[test]
    fn missing_final_newline_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "input.c", "int x;");
        assert_eq!(preprocessed(dir.path(), &input), "int x;");
    }

    #[test]
    fn indented_directives_are_recognized() {
        let dir = tempfile::tempdir().unwrap();
        let input = write(dir.path(), "input.c", "    #define Y 2\nint z;\n");
        assert_eq!(preprocessed(dir.path(), &input), "int z;\n");
    }

    #[test]
    fn self_include_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loop.h");
        fs::write(&path, format!("#include \"{}\"\nx\n", path.display())).unwrap();
        let out = preprocessed(dir.path(), &path);
        assert_eq!(out.matches('x').count(), MAX_INCLUDE_DEPTH + 1);
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = preprocess(&dir.path().join("absent.c"), &dir.path().join("out.i"));
        assert!(result.is_err());
    }
}
