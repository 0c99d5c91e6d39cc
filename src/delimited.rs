//! Delimited text output for warehouse loads.
//!
//! Fields holding the delimiter, a quote, a line break or the escape character are quoted; inside
//! quotes, quote and escape characters are preceded by the escape character. Line breaks are kept
//! verbatim inside quotes.

use crate::table::Table;
use anyhow::{Context, Result};
use serde_json::Value;
use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelimitedFormat {
    pub delimiter: char,
    pub quote: char,
    pub escape: char,
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self { delimiter: ',', quote: '"', escape: '|' }
    }
}

impl DelimitedFormat {
    fn needs_quotes(&self, s: &str) -> bool {
        s.chars().any(|c| c == self.delimiter || c == self.quote || c == self.escape || c == '\n' || c == '\r')
    }

    pub fn encode_field(&self, s: &str) -> String {
        if !self.needs_quotes(s) {
            return s.to_string();
        }
        let mut out = String::with_capacity(s.len() + 2);
        out.push(self.quote);
        for c in s.chars() {
            if c == self.quote || c == self.escape {
                out.push(self.escape);
            }
            out.push(c);
        }
        out.push(self.quote);
        out
    }

    pub fn encode_record<'a>(&self, fields: impl IntoIterator<Item = Cow<'a, str>>) -> String {
        let mut line = String::new();
        for (i, f) in fields.into_iter().enumerate() {
            if i > 0 {
                line.push(self.delimiter);
            }
            line.push_str(&self.encode_field(&f));
        }
        line.push('\n');
        line
    }

    /// Split delimited text back into records of unescaped fields.
    pub fn parse(&self, content: &str) -> Vec<Vec<String>> {
        let mut records = Vec::new();
        let mut record: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;
        let mut chars = content.chars();

        while let Some(c) = chars.next() {
            if in_quotes {
                if c == self.escape {
                    if let Some(n) = chars.next() {
                        field.push(n);
                    }
                } else if c == self.quote {
                    in_quotes = false;
                } else {
                    field.push(c);
                }
            } else if c == self.quote && field.is_empty() {
                in_quotes = true;
            } else if c == self.delimiter {
                record.push(std::mem::take(&mut field));
            } else if c == '\n' {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            } else if c != '\r' {
                field.push(c);
            }
        }
        if !field.is_empty() || !record.is_empty() {
            record.push(field);
            records.push(record);
        }
        records
    }
}

/// Text form of one cell: null is empty, lists and objects are compact JSON.
pub fn render_cell(v: Option<&Value>) -> Cow<'_, str> {
    match v {
        None | Some(Value::Null) => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(b)) => Cow::Borrowed(if *b { "true" } else { "false" }),
        Some(Value::Number(n)) => Cow::Owned(n.to_string()),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

/// Append `table` to `path`, writing the header row only when the file is new.
/// Returns the number of data rows written.
pub fn append_table(path: &Path, table: &Table, fmt: &DelimitedFormat) -> Result<usize> {
    let is_new = !path.exists();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    let mut w = BufWriter::new(f);

    if is_new {
        let header = fmt.encode_record(table.columns.iter().map(|c| Cow::Borrowed(c.as_str())));
        w.write_all(header.as_bytes())?;
    }
    for row in &table.rows {
        let line = fmt.encode_record(table.columns.iter().map(|c| render_cell(row.get(c))));
        w.write_all(line.as_bytes())?;
    }
    w.flush().with_context(|| format!("flush {}", path.display()))?;
    Ok(table.len())
}
