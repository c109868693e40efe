//! Artifact dumping for the outer harness.

use std::fs;
use std::io::Write;
use std::path::Path;

use miette::{IntoDiagnostic, Result};

use crate::error;

/// Stream a text artifact verbatim.
///
/// Returns whether the output ended at a line start, so the caller can place
/// the next delimiter on its own line.
pub fn dump_text(path: &Path, out: &mut dyn Write) -> Result<bool> {
    let contents = fs::read(path).map_err(|err| error::input_unavailable(path, err))?;
    out.write_all(&contents).into_diagnostic()?;
    Ok(contents.last().is_none_or(|byte| *byte == b'\n'))
}

/// Render a binary artifact as space-separated 8-bit groups.
///
/// One group per byte, most significant bit first, a single space after
/// each. No line breaks are inserted.
pub fn dump_object(path: &Path, out: &mut dyn Write) -> Result<bool> {
    let bytes = fs::read(path).map_err(|err| error::input_unavailable(path, err))?;
    for byte in &bytes {
        write!(out, "{byte:08b} ").into_diagnostic()?;
    }
    Ok(bytes.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_bytes_render_as_bit_groups() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, &[0xA5, 0xFF, 0x00]).unwrap();
        let mut out = Vec::new();
        let at_line_start = dump_object(file.path(), &mut out).unwrap();
        assert!(!at_line_start);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "10100101 11111111 00000000 "
        );
    }

    #[test]
    fn empty_object_dumps_nothing() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let mut out = Vec::new();
        assert!(dump_object(file.path(), &mut out).unwrap());
        assert!(out.is_empty());
    }

    #[test]
    fn text_dump_is_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"one\ntwo\n").unwrap();
        let mut out = Vec::new();
        assert!(dump_text(file.path(), &mut out).unwrap());
        assert_eq!(out, b"one\ntwo\n");
    }

    #[test]
    fn text_dump_reports_unterminated_last_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"one\ntwo").unwrap();
        let mut out = Vec::new();
        assert!(!dump_text(file.path(), &mut out).unwrap());
    }

    #[test]
    fn missing_artifact_is_fatal() {
        let mut out = Vec::new();
        assert!(dump_text(Path::new("no/such/artifact"), &mut out).is_err());
    }
}
