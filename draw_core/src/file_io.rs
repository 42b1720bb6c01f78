//! # File I/O Module
//!
//! Loading a stock die table from disk and appending failed requests to an
//! error log.
//!
//! ## Error Log Format
//!
//! One line per error:
//!
//! ```text
//! 2026-10-19T08:30:00.000000Z [INVALID_INPUT] Invalid input for 'dies': 0 - At least one die is required
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use draw_core::file_io::{load_stock_table, ErrorLog};
//! use std::path::Path;
//!
//! let table = load_stock_table(Path::new("stock_dies.json")).unwrap();
//! let log = ErrorLog::new("draw_errors.log");
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};

use crate::errors::{DrawError, DrawResult};
use crate::materials::StockDieTable;

/// Load a stock die table from a JSON file.
pub fn load_stock_table(path: &Path) -> DrawResult<StockDieTable> {
    let contents = fs::read_to_string(path)
        .map_err(|e| DrawError::file_error("read", path.display().to_string(), e.to_string()))?;

    let table = StockDieTable::from_json_str(&contents).map_err(|e| DrawError::SerializationError {
        reason: format!("Invalid stock die table in {}: {}", path.display(), e),
    })?;
    tracing::info!(path = %path.display(), rows = table.len(), "loaded stock die table");
    Ok(table)
}

/// Append-only text log of request errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ErrorLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped line for `err`, creating the file if needed.
    pub fn append(&self, err: &DrawError) -> DrawResult<()> {
        let line = format!(
            "{} [{}] {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            err.error_code(),
            err
        );
        let path = self.path.display().to_string();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| DrawError::file_error("open", path.clone(), e.to_string()))?;
        file.write_all(line.as_bytes())
            .map_err(|e| DrawError::file_error("write", path, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_stock_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dies.json");
        fs::write(
            &path,
            r#"[{"insert": "D", "angle": 12, "step": 0.05, "lower": 1, "upper": 3, "inStock": true}]"#,
        )
        .unwrap();

        let table = load_stock_table(&path).unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.rows()[0].in_stock);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_stock_table(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_ERROR");
    }

    #[test]
    fn test_load_invalid_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{\"rows\": 3}").unwrap();
        let err = load_stock_table(&path).unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_error_log_appends_lines() {
        let dir = tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("errors.log"));

        log.append(&DrawError::missing_field("dies")).unwrap();
        log.append(&DrawError::parse("unexpected end of input")).unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("[MISSING_FIELD] Missing required field: dies"));
        assert!(lines[1].contains("[PARSE_ERROR]"));
    }

    #[test]
    fn test_error_log_unwritable_path() {
        let dir = tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("missing").join("errors.log"));
        assert!(log.append(&DrawError::missing_field("dies")).is_err());
    }
}
