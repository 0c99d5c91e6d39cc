use crate::chunk::{process_chunk, ChunkStats};
use crate::config::{CollectorOptions, FailurePolicy, RetryPolicy};
use crate::delimited::{append_table, DelimitedFormat};
use crate::error::ConfigError;
use crate::ndjson::ChunkedRecords;
use crate::paths::discover_inputs;
use crate::progress::ProgressScope;
use crate::projection::SchemaVariant;
use crate::table::Table;
use crate::util::{capture_error_trace, done_marker, init_tracing_once, input_stem};
use crate::warehouse::{append_description, load_with_retry, provenance_line, Warehouse};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;

/// Running totals folded across chunks and files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunTotals {
    /// Schema-specific row-count metric (drives progress).
    pub rows_processed: u64,
    pub records: u64,
    pub chunks: u64,
    pub skipped_lines: u64,
    pub rejected_records: u64,
    pub depth_capped_chunks: u64,
    pub rows_loaded: u64,
}

impl RunTotals {
    #[must_use]
    pub fn absorb(self, stats: &ChunkStats, rows_loaded: u64) -> Self {
        Self {
            rows_processed: self.rows_processed + stats.row_count,
            records: self.records + stats.records,
            chunks: self.chunks + 1,
            skipped_lines: self.skipped_lines + stats.skipped_lines,
            rejected_records: self.rejected_records + stats.rejected_records,
            depth_capped_chunks: self.depth_capped_chunks + u64::from(stats.depth_capped),
            rows_loaded: self.rows_loaded + rows_loaded,
        }
    }
}

#[derive(Debug)]
pub struct FailedInput {
    pub path: PathBuf,
    pub error: String,
    pub trace: Option<PathBuf>,
    /// Where the file's unloaded intermediate tables were moved, if it left any.
    pub intermediates: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct RunReport {
    pub totals: RunTotals,
    pub completed: Vec<PathBuf>,
    /// Inputs skipped because a completion marker already existed.
    pub resumed: Vec<PathBuf>,
    pub failed: Vec<FailedInput>,
}

/// A file that failed part-way; `totals` includes the chunks that were loaded before the error.
#[derive(Debug)]
pub struct FileFailure {
    pub totals: RunTotals,
    pub error: anyhow::Error,
}

#[derive(Clone)]
pub struct Collector {
    pub(crate) opts: CollectorOptions,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        Self { opts: CollectorOptions::default() }
    }

    pub fn from_options(opts: CollectorOptions) -> Self {
        Self { opts }
    }

    pub fn options(&self) -> &CollectorOptions {
        &self.opts
    }

    // -------- Builder methods --------
    pub fn input_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_input_dir(dir); self }
    pub fn work_dir(mut self, dir: impl AsRef<Path>) -> Self { self.opts = self.opts.with_work_dir(dir); self }
    pub fn chunk_size(mut self, n: usize) -> Self { self.opts = self.opts.with_chunk_size(n); self }
    pub fn schema(mut self, schema: SchemaVariant) -> Self { self.opts = self.opts.with_schema(schema); self }
    pub fn max_reference_depth(mut self, depth: usize) -> Self { self.opts = self.opts.with_max_reference_depth(depth); self }
    pub fn estimated_total(mut self, total: Option<u64>) -> Self { self.opts = self.opts.with_estimated_total(total); self }
    pub fn failure_policy(mut self, policy: FailurePolicy) -> Self { self.opts = self.opts.with_failure_policy(policy); self }
    pub fn retry(mut self, retry: RetryPolicy) -> Self { self.opts = self.opts.with_retry(retry); self }
    pub fn resume(mut self, yes: bool) -> Self { self.opts = self.opts.with_resume(yes); self }
    pub fn progress(mut self, yes: bool) -> Self { self.opts = self.opts.with_progress(yes); self }
    pub fn progress_label(mut self, label: impl Into<String>) -> Self { self.opts = self.opts.with_progress_label(label); self }
    pub fn provenance(mut self, query: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self { self.opts = self.opts.with_provenance(query, start, end); self }
    pub fn io_read_buffer(mut self, bytes: usize) -> Self { self.opts = self.opts.with_io_read_buffer(bytes); self }
    pub fn format(mut self, format: DelimitedFormat) -> Self { self.opts = self.opts.with_format(format); self }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.opts.chunk_size == 0 {
            return Err(ConfigError::InvalidChunkSize);
        }
        if !self.opts.input_dir.is_dir() {
            return Err(ConfigError::MissingInputDir(self.opts.input_dir.clone()));
        }
        Ok(())
    }

    /// Process every input file into `warehouse`, one chunk at a time.
    pub fn run<W: Warehouse>(&self, warehouse: &mut W) -> Result<RunReport> {
        init_tracing_once();
        self.validate()?;
        fs::create_dir_all(&self.opts.work_dir)
            .with_context(|| format!("create {}", self.opts.work_dir.display()))?;

        let inputs = discover_inputs(&self.opts.input_dir);
        if inputs.is_empty() {
            tracing::warn!("No input files found in {}.", self.opts.input_dir.display());
        } else {
            tracing::info!("Planned {} files for processing ({} schema).", inputs.len(), self.opts.schema);
        }

        warehouse.ensure_dataset().context("create dataset")?;
        if let Some(p) = &self.opts.provenance {
            append_description(warehouse, &provenance_line(p, OffsetDateTime::now_utc()))
                .context("update dataset description")?;
        }

        let label = self.opts.progress_label.clone().unwrap_or_else(|| "Collecting".to_string());
        let progress = ProgressScope::new(self.opts.progress, &label, self.opts.estimated_total);
        let done_dir = self.opts.done_dir();

        let mut report = RunReport::default();
        let mut totals = RunTotals::default();
        for path in inputs {
            let marker = done_marker(&done_dir, &path);
            if self.opts.resume && marker.exists() {
                tracing::info!("Skipping {} (already completed).", path.display());
                report.resumed.push(path);
                continue;
            }

            match self.process_file(&path, warehouse, totals, &progress) {
                Ok(t) => {
                    totals = t;
                    fs::create_dir_all(&done_dir).with_context(|| format!("create {}", done_dir.display()))?;
                    fs::write(&marker, b"").with_context(|| format!("write {}", marker.display()))?;
                    report.completed.push(path);
                }
                Err(FileFailure { totals: t, error }) => {
                    totals = t;
                    tracing::error!("Failed processing {}: {:#}", path.display(), error);
                    let trace = match capture_error_trace(&self.opts.errors_dir(), &path, &error) {
                        Ok(p) => Some(p),
                        Err(e) => {
                            tracing::warn!("could not write error trace: {:#}", e);
                            None
                        }
                    };
                    let intermediates = match self.preserve_failed_tables(&path) {
                        Ok(dir) => dir,
                        Err(e) => {
                            tracing::warn!("could not keep intermediate files: {:#}", e);
                            None
                        }
                    };
                    match self.opts.failure_policy {
                        FailurePolicy::AbortRun => {
                            progress.finish("aborted");
                            return Err(error.context(format!("processing {}", path.display())));
                        }
                        FailurePolicy::SkipFile => {
                            report.failed.push(FailedInput { path, error: format!("{error:#}"), trace, intermediates });
                        }
                    }
                }
            }
        }

        progress.finish("done");
        tracing::info!(
            "Run finished: {} files completed, {} resumed, {} failed; {} rows processed in {} chunks.",
            report.completed.len(),
            report.resumed.len(),
            report.failed.len(),
            totals.rows_processed,
            totals.chunks
        );
        report.totals = totals;
        Ok(report)
    }

    /// Process one input file, folding each chunk into `totals`.
    pub fn process_file<W: Warehouse>(
        &self,
        path: &Path,
        warehouse: &mut W,
        totals: RunTotals,
        progress: &ProgressScope,
    ) -> Result<RunTotals, FileFailure> {
        let mut totals = totals;
        match self.run_file(path, warehouse, &mut totals, progress) {
            Ok(()) => Ok(totals),
            Err(error) => Err(FileFailure { totals, error }),
        }
    }

    fn run_file<W: Warehouse>(
        &self,
        path: &Path,
        warehouse: &mut W,
        totals: &mut RunTotals,
        progress: &ProgressScope,
    ) -> Result<()> {
        tracing::info!("Processing {}", path.display());
        self.clear_stale_tables()?;

        let mut chunks = ChunkedRecords::open(path, self.opts.read_buffer_bytes, self.opts.chunk_size)?;
        let chunk_opts = self.opts.chunk_options();
        while let Some(chunk) = chunks.next_chunk()? {
            let skipped = chunk.skipped_lines;
            let out = process_chunk(chunk.records, &chunk_opts);
            let stats = ChunkStats { skipped_lines: skipped, ..out.stats };
            let loaded = self.load_tables(warehouse, &out.projection.tables)?;
            *totals = totals.absorb(&stats, loaded);
            progress.report(totals.rows_processed);
        }
        Ok(())
    }

    /// Write each table to its intermediate file, load it, then remove the file. A failed load
    /// leaves the files in place.
    fn load_tables<W: Warehouse>(&self, warehouse: &mut W, tables: &[Table]) -> Result<u64> {
        let dir = self.opts.tables_dir();
        let mut written = Vec::with_capacity(tables.len());
        for t in tables {
            let file = dir.join(format!("{}.csv", t.name));
            append_table(&file, t, &self.opts.format)?;
            written.push((t.name.as_str(), file));
        }

        let mut loaded = 0u64;
        for (name, file) in &written {
            warehouse.ensure_table(name).with_context(|| format!("create table {name}"))?;
            let n = load_with_retry(warehouse, name, file, &self.opts.retry)
                .with_context(|| format!("load {} into {}", file.display(), name))?;
            tracing::debug!("loaded {} rows into {}", n, name);
            loaded += n;
        }
        for (_, file) in &written {
            fs::remove_file(file).with_context(|| format!("remove {}", file.display()))?;
        }
        Ok(loaded)
    }

    /// Move the intermediate files a failed input left behind to `errors/<stem>/`, so the
    /// next input starts clean without losing them.
    fn preserve_failed_tables(&self, input: &Path) -> Result<Option<PathBuf>> {
        let dir = self.opts.tables_dir();
        let Ok(entries) = fs::read_dir(&dir) else { return Ok(None) };
        let files: Vec<PathBuf> = entries.flatten().map(|e| e.path()).filter(|p| p.is_file()).collect();
        if files.is_empty() {
            return Ok(None);
        }
        let dest = self.opts.errors_dir().join(input_stem(input));
        fs::create_dir_all(&dest).with_context(|| format!("create {}", dest.display()))?;
        for f in &files {
            let Some(name) = f.file_name() else { continue };
            let to = dest.join(name);
            fs::rename(f, &to).with_context(|| format!("move {} to {}", f.display(), to.display()))?;
        }
        tracing::warn!("kept {} intermediate files of {} in {}", files.len(), input.display(), dest.display());
        Ok(Some(dest))
    }

    fn clear_stale_tables(&self) -> Result<()> {
        let dir = self.opts.tables_dir();
        let Ok(entries) = fs::read_dir(&dir) else { return Ok(()) };
        for ent in entries.flatten() {
            let p = ent.path();
            if p.is_file() {
                tracing::warn!("removing intermediate file left by an earlier failure: {}", p.display());
                fs::remove_file(&p).with_context(|| format!("remove {}", p.display()))?;
            }
        }
        Ok(())
    }
}
