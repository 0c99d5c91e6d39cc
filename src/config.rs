use crate::chunk::ChunkOptions;
use crate::delimited::DelimitedFormat;
use crate::projection::SchemaVariant;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// What a run does when one input file fails.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop the run at the first failed file.
    #[default]
    AbortRun,
    /// Record the failure and move on to the next file.
    SkipFile,
}

/// Linear backoff for transient warehouse errors: `base_delay × attempt`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_attempts: 10, base_delay: Duration::from_secs(3) }
    }
}

impl RetryPolicy {
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }
}

/// Search that produced the input, recorded in the dataset description.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Provenance {
    pub query: String,
    pub start: String,
    pub end: String,
}

/// User-facing options with defaults and builder chaining.
#[derive(Clone, Debug)]
pub struct CollectorOptions {
    pub input_dir: PathBuf,
    pub work_dir: PathBuf,             // intermediate tables, error traces, completion markers
    pub chunk_size: usize,             // records per chunk
    pub schema: SchemaVariant,
    pub max_reference_depth: usize,
    pub estimated_total: Option<u64>,  // from the search's count estimate
    pub failure_policy: FailurePolicy,
    pub retry: RetryPolicy,
    pub resume: bool,                  // skip inputs with a completion marker
    pub progress: bool,
    pub progress_label: Option<String>,
    pub provenance: Option<Provenance>,

    // IO tuning
    pub read_buffer_bytes: usize,

    // output formatting
    pub format: DelimitedFormat,
}

impl Default for CollectorOptions {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./collected"),
            work_dir: PathBuf::from("./collector_work"),
            chunk_size: 50_000,
            schema: SchemaVariant::Native,
            max_reference_depth: 64,
            estimated_total: None,
            failure_policy: FailurePolicy::AbortRun,
            retry: RetryPolicy::default(),
            resume: false,
            progress: true,
            progress_label: None,
            provenance: None,

            read_buffer_bytes: 256 * 1024,

            format: DelimitedFormat::default(),
        }
    }
}

impl CollectorOptions {
    pub fn with_input_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.input_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_work_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.work_dir = dir.as_ref().to_path_buf();
        self
    }
    pub fn with_chunk_size(mut self, n: usize) -> Self {
        self.chunk_size = n.max(1);
        self
    }
    pub fn with_schema(mut self, schema: SchemaVariant) -> Self {
        self.schema = schema;
        self
    }
    pub fn with_max_reference_depth(mut self, depth: usize) -> Self {
        self.max_reference_depth = depth;
        self
    }
    pub fn with_estimated_total(mut self, total: Option<u64>) -> Self {
        self.estimated_total = total;
        self
    }
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
    pub fn with_resume(mut self, yes: bool) -> Self {
        self.resume = yes;
        self
    }
    pub fn with_progress(mut self, yes: bool) -> Self {
        self.progress = yes;
        self
    }
    pub fn with_progress_label(mut self, label: impl Into<String>) -> Self {
        self.progress_label = Some(label.into());
        self
    }
    pub fn with_provenance(mut self, query: impl Into<String>, start: impl Into<String>, end: impl Into<String>) -> Self {
        self.provenance = Some(Provenance { query: query.into(), start: start.into(), end: end.into() });
        self
    }

    pub fn with_io_read_buffer(mut self, bytes: usize) -> Self {
        self.read_buffer_bytes = bytes.max(8 * 1024);
        self
    }

    pub fn with_format(mut self, format: DelimitedFormat) -> Self {
        self.format = format;
        self
    }

    pub fn chunk_options(&self) -> ChunkOptions {
        ChunkOptions { schema: self.schema, max_reference_depth: self.max_reference_depth }
    }

    pub fn errors_dir(&self) -> PathBuf {
        self.work_dir.join("errors")
    }

    pub fn done_dir(&self) -> PathBuf {
        self.work_dir.join("done")
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.work_dir.join("tables")
    }
}
