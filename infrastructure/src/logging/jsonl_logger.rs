//! JSONL file writer for invocation records.
//!
//! Each [`InvocationRecord`] is serialized as a single JSON line with a
//! `type` field and `timestamp`, appended to the file via a buffered writer.

use refdesk_application::ports::invocation_logger::{InvocationLogger, InvocationRecord};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL invocation logger that writes one JSON object per line.
///
/// Appends to an existing file. Thread-safe via `Mutex<BufWriter<File>>`.
/// Flushes on `Drop`.
pub struct JsonlInvocationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlInvocationLogger {
    /// Open (or create) the log at the given path.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create invocation log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!(
                    "Could not open invocation log file {}: {}",
                    path.display(),
                    e
                );
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

impl InvocationLogger for JsonlInvocationLogger {
    fn record(&self, record: &InvocationRecord) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Ok(Value::Object(mut map)) = serde_json::to_value(record) else {
            return;
        };
        map.insert("type".to_string(), Value::String("invocation".to_string()));
        map.insert("timestamp".to_string(), Value::String(timestamp));

        let Ok(line) = serde_json::to_string(&map) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlInvocationLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tool: &str, outcome: &str, cache_hit: bool) -> InvocationRecord {
        InvocationRecord {
            tool: tool.to_string(),
            outcome: outcome.to_string(),
            cache_hit,
            duration_ms: 3,
        }
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("invocations.jsonl");
        let logger = JsonlInvocationLogger::new(&path).unwrap();

        logger.record(&record("get_entry", "success", false));
        logger.record(&record("get_entry", "NOT_FOUND", true));
        drop(logger);

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.trim().lines().collect();
        assert_eq!(lines.len(), 2);

        for line in &lines {
            let value: Value = serde_json::from_str(line).unwrap();
            assert_eq!(value["type"], "invocation");
            assert!(value.get("timestamp").is_some());
        }

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["tool"], "get_entry");
        assert_eq!(first["outcome"], "success");
        assert_eq!(first["cache_hit"], false);
        assert_eq!(first["duration_ms"], 3);

        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["outcome"], "NOT_FOUND");
        assert_eq!(second["cache_hit"], true);
    }

    #[test]
    fn test_jsonl_logger_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invocations.jsonl");

        for _ in 0..2 {
            let logger = JsonlInvocationLogger::new(&path).unwrap();
            logger.record(&record("list_entries", "success", false));
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_jsonl_logger_returns_none_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();

        assert!(JsonlInvocationLogger::new(blocker.join("log.jsonl")).is_none());
    }
}
