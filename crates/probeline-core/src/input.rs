//! Input file reading and strict line parsing
//!
//! Each line is `IDENTIFIER<TAB>LOCATOR`: exactly 32 lowercase alphanumeric
//! characters, one tab, then a non-empty locator that runs to end of line
//! (further tabs belong to the locator).

use std::io::ErrorKind;
use std::path::Path;

use crate::error::{IngestError, MalformedLine};
use crate::model::{Candidate, Identifier};

/// Read the whole input file as ordered lines.
///
/// Lines are split on `\n` and a trailing `\r` is stripped. Each line is
/// decoded on its own: invalid UTF-8 is replaced (U+FFFD) so the line
/// reaches the parser and is rejected there instead of failing the whole
/// file. A missing file is [`IngestError::InputNotFound`].
pub fn read_lines(path: &Path) -> Result<Vec<String>, IngestError> {
    let bytes = std::fs::read(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            IngestError::InputNotFound(path.to_path_buf())
        } else {
            IngestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(&bytes);

    let lines = body
        .split(|&b| b == b'\n')
        .enumerate()
        .map(|(idx, raw)| {
            let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
            match std::str::from_utf8(raw) {
                Ok(line) => line.to_owned(),
                Err(_) => {
                    log::warn!("{}:{}: invalid UTF-8", path.display(), idx + 1);
                    String::from_utf8_lossy(raw).into_owned()
                }
            }
        })
        .collect();
    Ok(lines)
}

/// Parse one input line into a [`Candidate`], or reject it whole.
pub fn parse_line(line: &str) -> Result<Candidate, MalformedLine> {
    let malformed = || MalformedLine {
        line: line.to_owned(),
    };

    let (id, locator) = line.split_once('\t').ok_or_else(malformed)?;
    let id = Identifier::parse(id).ok_or_else(malformed)?;
    if locator.is_empty() {
        return Err(malformed());
    }
    Ok(Candidate::new(id, locator))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ID: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

    #[test]
    fn parse_valid_line() {
        let c = parse_line(&format!("{ID}\t/path/a.mp4")).unwrap();
        assert_eq!(c.id().as_str(), ID);
        assert_eq!(c.locator(), "/path/a.mp4");
    }

    #[test]
    fn locator_keeps_extra_tabs() {
        let c = parse_line(&format!("{ID}\thttp://x/a b\tc")).unwrap();
        assert_eq!(c.locator(), "http://x/a b\tc");
    }

    #[test]
    fn rejects_line_without_tab() {
        let err = parse_line("bad-line-no-tab").unwrap_err();
        assert_eq!(err.line, "bad-line-no-tab");
    }

    #[test]
    fn rejects_empty_locator() {
        assert!(parse_line(&format!("{ID}\t")).is_err());
    }

    #[test]
    fn rejects_blank_line() {
        assert!(parse_line("").is_err());
    }

    #[test]
    fn rejects_identifier_with_prefix_or_suffix() {
        // The identifier must be the whole first field, not a substring of it
        assert!(parse_line(&format!("x{ID}\t/a")).is_err());
        assert!(parse_line(&format!("{ID}x\t/a")).is_err());
        assert!(parse_line(&format!(" {ID}\t/a")).is_err());
    }

    #[test]
    fn rejects_uppercase_identifier() {
        assert!(parse_line(&format!("{}\t/a", ID.to_uppercase())).is_err());
    }

    #[test]
    fn read_lines_preserves_order_and_strips_cr() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "one\r\ntwo\n\nthree").unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines, vec!["one", "two", "", "three"]);
    }

    #[test]
    fn read_lines_isolates_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        let mut content = format!("{ID}\t/a.mp4\n").into_bytes();
        content.extend_from_slice(b"garbage\xff\xfeline\n");
        content.extend_from_slice(format!("{}\t/b.mp4\n", "b".repeat(32)).as_bytes());
        std::fs::write(&path, content).unwrap();

        let lines = read_lines(&path).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(parse_line(&lines[0]).is_ok());
        assert!(parse_line(&lines[1]).is_err());
        assert!(lines[1].starts_with("garbage"));
        assert_eq!(parse_line(&lines[2]).unwrap().locator(), "/b.mp4");
    }

    #[test]
    fn read_lines_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "").unwrap();
        assert!(read_lines(&path).unwrap().is_empty());
    }

    #[test]
    fn read_lines_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_lines(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(err, IngestError::InputNotFound(_)));
    }
}
