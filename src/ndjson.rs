use anyhow::{Context, Result};
use serde_json::Value;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Minimal NDJSON reader with buffering and empty-line trimming.
/// Files ending in `.zst` are decompressed on the fly.
pub struct NdjsonReader {
    rdr: Box<dyn BufRead>,
}

impl NdjsonReader {
    pub fn open(path: &Path, buf_bytes: usize) -> io::Result<Self> {
        let f = File::open(path)?;
        let cap = buf_bytes.max(8 * 1024);
        let rdr: Box<dyn BufRead> = if path.extension().is_some_and(|e| e == "zst") {
            let mut dec = zstd::stream::read::Decoder::new(f)?;
            // long-window archives otherwise fail with "Frame requires too much memory"
            dec.window_log_max(31)?;
            Box::new(BufReader::with_capacity(cap, dec))
        } else {
            Box::new(BufReader::with_capacity(cap, f))
        };
        Ok(Self { rdr })
    }

    /// Read the next raw line into `buf`. Returns the number of bytes read (0 on EOF).
    /// Strips trailing `\r?\n`; the bytes are not checked for UTF-8.
    pub fn read_line(&mut self, buf: &mut Vec<u8>) -> io::Result<usize> {
        buf.clear();
        let n = self.rdr.read_until(b'\n', buf)?;
        if n == 0 { return Ok(0); }
        if buf.last() == Some(&b'\n') {
            buf.pop();
            if buf.last() == Some(&b'\r') { buf.pop(); }
        }
        Ok(n)
    }
}

/// One chunk of parsed records.
#[derive(Debug, Default)]
pub struct RecordChunk {
    pub records: Vec<Value>,
    /// Lines that were not valid JSON.
    pub skipped_lines: u64,
}

/// Reads an NDJSON file in chunks of at most `chunk_size` records.
pub struct ChunkedRecords {
    reader: NdjsonReader,
    chunk_size: usize,
    line_no: u64,
    label: String,
    done: bool,
}

impl ChunkedRecords {
    pub fn open(path: &Path, buf_bytes: usize, chunk_size: usize) -> Result<Self> {
        let reader = NdjsonReader::open(path, buf_bytes).with_context(|| format!("open {}", path.display()))?;
        Ok(Self {
            reader,
            chunk_size: chunk_size.max(1),
            line_no: 0,
            label: path.display().to_string(),
            done: false,
        })
    }

    /// Next chunk, or `None` once the input is exhausted. Unparsable lines are skipped and counted.
    pub fn next_chunk(&mut self) -> Result<Option<RecordChunk>> {
        if self.done {
            return Ok(None);
        }
        let mut chunk = RecordChunk { records: Vec::with_capacity(self.chunk_size.min(8192)), skipped_lines: 0 };
        let mut line = Vec::new();
        while chunk.records.len() < self.chunk_size {
            let n = self
                .reader
                .read_line(&mut line)
                .with_context(|| format!("read {} line {}", self.label, self.line_no + 1))?;
            if n == 0 {
                self.done = true;
                break;
            }
            self.line_no += 1;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<Value>(&line) {
                Ok(v) => chunk.records.push(v),
                Err(e) => {
                    tracing::warn!("{}:{}: skipping unparsable line: {}", self.label, self.line_no, e);
                    chunk.skipped_lines += 1;
                }
            }
        }
        if chunk.records.is_empty() && chunk.skipped_lines == 0 {
            return Ok(None);
        }
        Ok(Some(chunk))
    }
}
