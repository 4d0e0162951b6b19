//! Data loading utilities

use crate::error::{OceanError, Result};
use polars::prelude::*;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Loader for delimited survey exports
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Field separator, tab for the survey export
    delimiter: u8,
    /// Rows scanned for type inference, `None` scans the whole file
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a loader for tab-separated files with full-file schema inference
    pub fn new() -> Self {
        Self {
            delimiter: b'\t',
            infer_schema_length: None,
        }
    }

    /// Set the field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Limit how many rows are scanned for type inference
    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a delimited file with a header row
    pub fn load(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(OceanError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            )));
        }

        let parse_opts = CsvParseOptions::default().with_separator(self.delimiter);

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .with_parse_options(parse_opts)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        debug!(
            path = %path.display(),
            rows = df.height(),
            cols = df.width(),
            "Loaded delimited file"
        );
        Ok(df)
    }

    /// Get file info without loading the full data
    pub fn file_info(&self, path: impl AsRef<Path>) -> Result<FileInfo> {
        let path = path.as_ref();
        let file_size = std::fs::metadata(path)?.len();

        let reader = BufReader::new(File::open(path)?);
        let mut lines = reader.lines();

        let header = lines.next().transpose()?.unwrap_or_default();
        let delimiter = self.delimiter as char;
        let columns: Vec<String> = header
            .split(delimiter)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let mut n_rows = 0;
        for line in lines {
            if !line?.trim().is_empty() {
                n_rows += 1;
            }
        }

        Ok(FileInfo {
            path: path.display().to_string(),
            file_size,
            n_rows,
            columns,
        })
    }
}

/// File information
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub path: String,
    pub file_size: u64,
    pub n_rows: usize,
    pub columns: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_tsv(content: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::with_suffix(".tsv").unwrap();
        tmp.write_all(content.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    #[test]
    fn test_load_tsv() {
        let tmp = write_tsv("country\tEXT1\tEXT2\nUS\t3\t4\nGB\t5\t1\n");
        let df = DataLoader::new().load(tmp.path()).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.width(), 3);
        assert!(df.column("EXT2").is_ok());
    }

    #[test]
    fn test_wrong_delimiter_collapses_columns() {
        let tmp = write_tsv("country\tEXT1\nUS\t3\n");
        let df = DataLoader::new().with_delimiter(b',').load(tmp.path()).unwrap();
        assert_eq!(df.width(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = DataLoader::new().load("/definitely/not/here.tsv").unwrap_err();
        assert!(matches!(err, OceanError::IoError(_)));
    }

    #[test]
    fn test_file_info() {
        let tmp = write_tsv("country\tEXT1\nUS\t3\nGB\t2\nFR\t1\n");
        let info = DataLoader::new().file_info(tmp.path()).unwrap();
        assert_eq!(info.n_rows, 3);
        assert_eq!(info.columns, vec!["country".to_string(), "EXT1".to_string()]);
        assert!(info.file_size > 0);
    }
}
