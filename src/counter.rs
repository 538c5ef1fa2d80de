//! Line counting.
//!
//! A line is text terminated by `\n`, or the final unterminated fragment of a
//! non-empty file. Content is streamed through a fixed buffer so file size
//! never affects memory use, and newlines are counted with `bytecount`.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

const BUFFER_SIZE: usize = 8 * 1024;

/// Count lines in the file at `path`.
///
/// The file handle is closed before this returns, on success and on error.
///
/// # Examples
///
/// ```no_run
/// use linebolt::counter::count_lines;
/// use std::path::Path;
///
/// let lines = count_lines(Path::new("src/main.c")).unwrap();
/// println!("{lines} lines");
/// ```
pub fn count_lines(path: &Path) -> io::Result<u64> {
    let file = File::open(path)?;
    count_lines_from_reader(file)
}

/// Count lines in everything `reader` yields.
pub fn count_lines_from_reader<R: Read>(reader: R) -> io::Result<u64> {
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, reader);
    let mut lines = 0u64;
    let mut last_byte = None;

    loop {
        let buf = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if buf.is_empty() {
            break;
        }

        lines += bytecount::count(buf, b'\n') as u64;
        last_byte = buf.last().copied();

        let consumed = buf.len();
        reader.consume(consumed);
    }

    Ok(lines + partial_line(last_byte))
}

/// Count lines in an in-memory buffer.
///
/// # Examples
///
/// ```
/// use linebolt::counter::count_bytes;
///
/// assert_eq!(count_bytes(b"a\nb\nc"), 3);
/// assert_eq!(count_bytes(b"a\nb\nc\n"), 3);
/// assert_eq!(count_bytes(b""), 0);
/// ```
pub fn count_bytes(content: &[u8]) -> u64 {
    bytecount::count(content, b'\n') as u64 + partial_line(content.last().copied())
}

/// One extra line when content exists and does not end with a newline.
fn partial_line(last_byte: Option<u8>) -> u64 {
    match last_byte {
        Some(b'\n') | None => 0,
        Some(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    fn count_str(content: &str) -> u64 {
        count_lines_from_reader(content.as_bytes()).unwrap()
    }

    #[test]
    fn test_no_trailing_newline() {
        assert_eq!(count_str("a\nb\nc"), 3);
    }

    #[test]
    fn test_trailing_newline() {
        assert_eq!(count_str("a\nb\nc\n"), 3);
    }

    #[test]
    fn test_empty() {
        assert_eq!(count_str(""), 0);
    }

    #[test]
    fn test_only_newline() {
        assert_eq!(count_str("\n"), 1);
        assert_eq!(count_str("\n\n\n"), 3);
    }

    #[test]
    fn test_single_fragment() {
        assert_eq!(count_str("int x;"), 1);
    }

    #[test]
    fn test_crlf_counts_newlines() {
        assert_eq!(count_str("a\r\nb\r\n"), 2);
        assert_eq!(count_str("a\r\nb"), 2);
    }

    #[test]
    fn test_content_spanning_buffers() {
        // Newline lands exactly on the buffer boundary, then a partial line follows.
        let mut content = vec![b'x'; BUFFER_SIZE - 1];
        content.push(b'\n');
        content.extend_from_slice(b"tail");
        assert_eq!(count_lines_from_reader(content.as_slice()).unwrap(), 2);

        // Trailing newline is the first byte of the last buffer.
        let mut content = vec![b'x'; BUFFER_SIZE];
        content.push(b'\n');
        assert_eq!(count_lines_from_reader(content.as_slice()).unwrap(), 1);
    }

    #[test]
    fn test_binary_content() {
        assert_eq!(count_bytes(&[0, 159, 146, 150, b'\n', 0xff]), 2);
    }

    #[test]
    fn test_count_lines_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("main.c");
        fs::write(&path, "int main(void) {\n    return 0;\n}").unwrap();

        assert_eq!(count_lines(&path).unwrap(), 3);
    }

    #[test]
    fn test_count_lines_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = count_lines(&dir.path().join("missing.c")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    proptest! {
        #[test]
        fn prop_matches_newline_rule(content in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let newlines = content.iter().filter(|&&b| b == b'\n').count() as u64;
            let expected = match content.last() {
                None => 0,
                Some(b'\n') => newlines,
                Some(_) => newlines + 1,
            };
            prop_assert_eq!(count_lines_from_reader(content.as_slice()).unwrap(), expected);
            prop_assert_eq!(count_bytes(&content), expected);
        }

        #[test]
        fn prop_appending_newline_keeps_count(content in "[a-z\n]{1,200}") {
            prop_assume!(!content.ends_with('\n'));
            let terminated = format!("{content}\n");
            prop_assert_eq!(count_bytes(content.as_bytes()), count_bytes(terminated.as_bytes()));
        }
    }
}
