mod config;
mod error;
mod paths;
mod progress;
mod util;
mod pipeline;

mod table;
mod flatten;
mod fields;
mod presence;

mod unpack;
mod uplift;
mod repair;
mod entities;
mod authors;
mod interactions;
mod finalize;
mod projection;
mod chunk;

mod ndjson;
mod delimited;
mod warehouse;

pub use crate::config::{CollectorOptions, FailurePolicy, Provenance, RetryPolicy};
pub use crate::error::{ConfigError, SinkError};
pub use crate::pipeline::{Collector, FailedInput, FileFailure, RunReport, RunTotals};

// Tables and the per-chunk transformation, usable without the file pipeline.
pub use crate::table::{cell, cell_str, Row, Table};
pub use crate::chunk::{build_native_tables, process_chunk, ChunkOptions, ChunkOutput, ChunkStats};
pub use crate::projection::{
    domain_path, LegacyAProjector, LegacyBProjector, NativeProjector, NativeTables, Projection, Projector,
    SchemaVariant,
};

// Individual stages for callers assembling their own flow.
pub use crate::flatten::{flatten_object, flatten_record};
pub use crate::unpack::{unpack_references, Unpacked};
pub use crate::uplift::uplift;
pub use crate::repair::{handle_from_reply_text, handle_from_status_url, infer_referenced_authors, repair_retweets};
pub use crate::entities::EntitySpec;
pub use crate::authors::{build_author_description, build_author_urls, AuthorRole};
pub use crate::interactions::build_interactions;
pub use crate::presence::ChunkSchema;

/// Entity table specs and the generic explode/finish steps.
pub mod entity_tables {
    pub use crate::entities::{
        build, explode, finish, media_spec, ANNOTATIONS, CONTEXT_ANNOTATIONS, EDIT_HISTORY, HASHTAGS, MEDIA,
        MENTIONS, POLL_OPTIONS, URLS,
    };
}

/// Column orders and names of every output table.
pub mod columns {
    pub use crate::fields::*;
}

// export NDJSON and delimited helpers
pub use crate::ndjson::{ChunkedRecords, NdjsonReader, RecordChunk};
pub use crate::delimited::{append_table, render_cell, DelimitedFormat};

// export the sink seam
pub use crate::warehouse::{
    append_description, load_with_retry, provenance_line, LocalWarehouse, Warehouse, DESCRIPTION_LIMIT,
};

pub use crate::paths::discover_inputs;
pub use crate::progress::{make_count_progress, percent_of_estimate, ProgressScope};
pub use crate::util::init_tracing_once;
