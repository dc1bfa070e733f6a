use crate::error::{LogtailError, Result};
use crate::logs::buffer::RollingBuffer;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Smallest number of lines a caller may request
pub const MIN_LINES: usize = 1;

/// Largest number of lines a caller may request; caps per-request memory
pub const MAX_LINES: usize = 2000;

/// Number of lines returned when the caller does not ask for a count
pub const DEFAULT_LINES: usize = 200;

/// A validated number of lines to read from the end of a log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineCount(usize);

impl LineCount {
    /// Validate a requested line count against `[MIN_LINES, MAX_LINES]`
    pub fn new(value: i64) -> Result<Self> {
        match usize::try_from(value) {
            Ok(n) if (MIN_LINES..=MAX_LINES).contains(&n) => Ok(Self(n)),
            _ => Err(LogtailError::InvalidLineCount {
                value,
                min: MIN_LINES,
                max: MAX_LINES,
            }),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for LineCount {
    fn default() -> Self {
        Self(DEFAULT_LINES)
    }
}

/// Read the last N lines from a log file
///
/// The file is scanned once, front to back, and only the most recent `lines`
/// lines are kept in memory. Each retained line keeps its original
/// terminator, so a file shorter than the request comes back byte for byte
/// (modulo invalid UTF-8, which is replaced with U+FFFD).
///
/// # Returns
/// * `Ok(String)` - The tail of the file; empty if the file does not exist
/// * `Err(LogtailError)` - The file exists but could not be read
pub async fn read_tail(file_path: &Path, lines: LineCount) -> Result<String> {
    let file = match File::open(file_path).await {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(String::new()),
        Err(e) => return Err(e.into()),
    };

    let mut reader = BufReader::new(file);
    let mut retained = RollingBuffer::new(lines.get());

    loop {
        let mut line = Vec::new();
        if reader.read_until(b'\n', &mut line).await? == 0 {
            break;
        }
        retained.push(line);
    }

    let mut output = String::new();
    for line in retained.iter() {
        output.push_str(&String::from_utf8_lossy(line));
    }

    Ok(output)
}

/// Read the last N lines from a log file, degrading to empty text on failure
///
/// A missing file means the service has not logged anything yet. Any other
/// read failure is reported as a warning and also yields empty text.
pub async fn tail(file_path: &Path, lines: LineCount) -> String {
    match read_tail(file_path, lines).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                "Failed to read log file {}: {}",
                file_path.display(),
                e
            );
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tokio::io::AsyncWriteExt;

    async fn write_log(path: &Path, content: &[u8]) {
        let mut file = File::create(path).await.unwrap();
        file.write_all(content).await.unwrap();
        file.flush().await.unwrap();
    }

    fn count(n: i64) -> LineCount {
        LineCount::new(n).unwrap()
    }

    #[test]
    fn test_line_count_bounds() {
        assert!(LineCount::new(1).is_ok());
        assert!(LineCount::new(2000).is_ok());
        assert!(matches!(
            LineCount::new(0),
            Err(LogtailError::InvalidLineCount { value: 0, .. })
        ));
        assert!(matches!(
            LineCount::new(2001),
            Err(LogtailError::InvalidLineCount { value: 2001, .. })
        ));
        assert!(LineCount::new(-5).is_err());
        assert_eq!(LineCount::default().get(), 200);
    }

    #[tokio::test]
    async fn test_read_tail_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("never-written.log");

        let text = read_tail(&log_file, count(10)).await.unwrap();
        assert_eq!(text, "");
        assert_eq!(tail(&log_file, count(10)).await, "");
    }

    #[tokio::test]
    async fn test_read_tail_empty_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("test.log");
        write_log(&log_file, b"").await;

        assert_eq!(tail(&log_file, count(10)).await, "");
    }

    #[tokio::test]
    async fn test_read_tail_last_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("test.log");
        write_log(&log_file, b"Line 1\nLine 2\nLine 3\n").await;

        let text = tail(&log_file, count(2)).await;
        assert_eq!(text, "Line 2\nLine 3\n");
    }

    #[tokio::test]
    async fn test_read_tail_exactly_k_lines() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("test.log");
        write_log(&log_file, b"a\nb\nc\n").await;

        assert_eq!(tail(&log_file, count(3)).await, "a\nb\nc\n");
    }

    #[tokio::test]
    async fn test_read_tail_fewer_lines_than_requested() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("test.log");
        write_log(&log_file, b"only\ntwo\n").await;

        assert_eq!(tail(&log_file, count(200)).await, "only\ntwo\n");
    }

    #[tokio::test]
    async fn test_read_tail_trailing_partial_line() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("test.log");
        write_log(&log_file, b"first\nsecond\nthird without newline").await;

        let text = tail(&log_file, count(2)).await;
        assert_eq!(text, "second\nthird without newline");
    }

    #[tokio::test]
    async fn test_read_tail_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("test.log");
        write_log(&log_file, b"ok\nbad \xff\xfe bytes\n").await;

        let text = tail(&log_file, count(10)).await;
        assert!(text.starts_with("ok\nbad "));
        assert!(text.contains('\u{FFFD}'));
        assert!(text.ends_with(" bytes\n"));
    }

    #[tokio::test]
    async fn test_read_tail_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("test.log");
        write_log(&log_file, b"1\n2\n3\n4\n5\n").await;

        let first = tail(&log_file, count(3)).await;
        let second = tail(&log_file, count(3)).await;
        assert_eq!(first, second);
        assert_eq!(first, "3\n4\n5\n");
    }

    #[tokio::test]
    async fn test_read_tail_directory_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();

        assert_eq!(tail(temp_dir.path(), count(10)).await, "");
    }

    #[tokio::test]
    async fn test_read_tail_large_file() {
        let temp_dir = TempDir::new().unwrap();
        let log_file = temp_dir.path().join("big.log");

        let mut content = String::new();
        for i in 0..100_000 {
            content.push_str(&format!("[2024-01-01 10:00:00.000] entry {}\n", i));
        }
        write_log(&log_file, content.as_bytes()).await;

        let text = tail(&log_file, count(MAX_LINES as i64)).await;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), MAX_LINES);
        assert!(lines[0].ends_with("entry 98000"));
        assert!(lines[MAX_LINES - 1].ends_with("entry 99999"));
    }
}
