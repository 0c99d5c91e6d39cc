//! The sink seam: idempotent dataset/table creation, bulk file loads, and the dataset
//! description that accumulates one provenance line per run.

use crate::config::{Provenance, RetryPolicy};
use crate::delimited::DelimitedFormat;
use crate::error::SinkError;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Longest dataset description the warehouse accepts.
pub const DESCRIPTION_LIMIT: usize = 16_000;

pub trait Warehouse {
    /// Create the dataset if absent.
    fn ensure_dataset(&mut self) -> Result<(), SinkError>;
    fn description(&self) -> Result<String, SinkError>;
    fn set_description(&mut self, text: &str) -> Result<(), SinkError>;
    /// Create the table if absent.
    fn ensure_table(&mut self, table: &str) -> Result<(), SinkError>;
    /// Append a delimited file (with header) to `table`; returns rows loaded.
    fn load_file(&mut self, table: &str, path: &Path) -> Result<u64, SinkError>;
}

pub fn provenance_line(p: &Provenance, now: OffsetDateTime) -> String {
    let ts = now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string());
    format!("[{ts}] Query: {}, {}, {}", p.query, p.start, p.end)
}

/// Append `line` to the dataset description unless the result would exceed
/// [`DESCRIPTION_LIMIT`]. Returns whether it was appended.
pub fn append_description<W: Warehouse + ?Sized>(wh: &mut W, line: &str) -> Result<bool, SinkError> {
    let current = wh.description()?;
    let next = if current.is_empty() { line.to_string() } else { format!("{current}\n{line}") };
    if next.chars().count() > DESCRIPTION_LIMIT {
        let err = SinkError::DescriptionTooLong { len: next.chars().count(), limit: DESCRIPTION_LIMIT };
        tracing::info!("dataset description not updated: {}", err);
        return Ok(false);
    }
    wh.set_description(&next)?;
    Ok(true)
}

/// Load with linear backoff on transient failures (`base_delay × attempt`).
pub fn load_with_retry<W: Warehouse + ?Sized>(
    wh: &mut W,
    table: &str,
    path: &Path,
    retry: &RetryPolicy,
) -> Result<u64, SinkError> {
    let attempts = retry.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match wh.load_file(table, path) {
            Ok(n) => return Ok(n),
            Err(e) if e.is_transient() && attempt < attempts => {
                let delay = retry.delay_for(attempt);
                tracing::warn!(
                    "load into {} failed (attempt {} of {}): {}; retrying in {:?}",
                    table,
                    attempt,
                    attempts,
                    e,
                    delay
                );
                sleep(delay);
                attempt += 1;
            }
            Err(e) => {
                tracing::error!("load into {} failed after {} attempt(s): {}", table, attempt, e);
                return Err(e);
            }
        }
    }
}

/// A warehouse backed by a directory: one delimited file per table plus `DESCRIPTION.txt`.
#[derive(Clone, Debug)]
pub struct LocalWarehouse {
    root: PathBuf,
    format: DelimitedFormat,
}

impl LocalWarehouse {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf(), format: DelimitedFormat::default() }
    }

    pub fn with_format(mut self, format: DelimitedFormat) -> Self {
        self.format = format;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.csv"))
    }

    fn description_path(&self) -> PathBuf {
        self.root.join("DESCRIPTION.txt")
    }
}

impl Warehouse for LocalWarehouse {
    fn ensure_dataset(&mut self) -> Result<(), SinkError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn description(&self) -> Result<String, SinkError> {
        match fs::read_to_string(self.description_path()) {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn set_description(&mut self, text: &str) -> Result<(), SinkError> {
        fs::write(self.description_path(), text)?;
        Ok(())
    }

    fn ensure_table(&mut self, table: &str) -> Result<(), SinkError> {
        let path = self.table_path(table);
        if !path.exists() {
            fs::File::create(&path)?;
        }
        Ok(())
    }

    fn load_file(&mut self, table: &str, path: &Path) -> Result<u64, SinkError> {
        let content = fs::read_to_string(path)?;
        let mut records = self.format.parse(&content);
        if records.is_empty() {
            return Ok(0);
        }
        let header = records.remove(0);

        let target = self.table_path(table);
        let has_header = fs::metadata(&target).map(|m| m.len() > 0).unwrap_or(false);
        if has_header {
            let mut first = String::new();
            BufReader::new(fs::File::open(&target)?).read_line(&mut first)?;
            let existing_header = self.format.parse(&first).into_iter().next().unwrap_or_default();
            if existing_header != header {
                return Err(SinkError::Fatal(format!(
                    "column mismatch loading {} into {}",
                    path.display(),
                    table
                )));
            }
        }

        let mut out = OpenOptions::new().create(true).append(true).open(&target)?;
        if !has_header {
            out.write_all(self.format.encode_record(header.iter().map(|s| s.as_str().into())).as_bytes())?;
        }
        for r in &records {
            out.write_all(self.format.encode_record(r.iter().map(|s| s.as_str().into())).as_bytes())?;
        }
        out.flush()?;
        Ok(records.len() as u64)
    }
}
