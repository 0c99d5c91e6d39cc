//! One chunk, start to finish: unpack, uplift, repair, extract, finalize, project.

use crate::authors::{build_author_description, build_author_urls, AuthorRole};
use crate::entities::{self, explode};
use crate::fields::entity_fields;
use crate::finalize::finalize_posts;
use crate::flatten::flatten_record;
use crate::interactions::build_interactions;
use crate::presence::ChunkSchema;
use crate::projection::{NativeTables, Projection, SchemaVariant};
use crate::repair::{infer_referenced_authors, repair_retweets};
use crate::table::Table;
use crate::unpack::unpack_references;
use crate::uplift::uplift;
use serde_json::Value;

#[derive(Clone, Copy, Debug)]
pub struct ChunkOptions {
    pub schema: SchemaVariant,
    pub max_reference_depth: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self { schema: SchemaVariant::Native, max_reference_depth: 64 }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChunkStats {
    pub records: u64,
    /// Records that were valid JSON but not objects.
    pub rejected_records: u64,
    pub skipped_lines: u64,
    pub levels: usize,
    pub depth_capped: bool,
    /// Schema-specific progress metric.
    pub row_count: u64,
}

#[derive(Clone, Debug)]
pub struct ChunkOutput {
    pub projection: Projection,
    pub stats: ChunkStats,
}

/// Build every native table for one chunk of raw records.
pub fn build_native_tables(records: Vec<Value>, max_reference_depth: usize) -> (NativeTables, ChunkStats) {
    let mut stats = ChunkStats { records: records.len() as u64, ..Default::default() };

    let mut level0 = Table::new("level_0");
    for rec in records {
        match flatten_record(rec) {
            Some(row) => level0.push(row),
            None => stats.rejected_records += 1,
        }
    }
    if stats.rejected_records > 0 {
        tracing::warn!("{} records were not JSON objects and were skipped", stats.rejected_records);
    }

    let unpacked = unpack_references(level0, max_reference_depth);
    stats.levels = unpacked.levels.len();
    stats.depth_capped = unpacked.depth_capped;

    let posts = repair_retweets(uplift(unpacked.levels));

    // Raw mentions keep the nested author profile fields the author builder needs.
    let raw_mentions = explode(&posts, &entities::MENTIONS);
    let mut schema = ChunkSchema::of(&posts);
    schema.observe(&raw_mentions);

    let has = |f: &str| schema.has(f);
    let urls = entities::build(&posts, &entities::URLS, has(entity_fields::URLS));
    let posts = infer_referenced_authors(posts, urls.as_ref());

    let media_spec = entities::media_spec(has(entity_fields::MEDIA));
    let media_present = has(entity_fields::MEDIA) || has(entity_fields::MEDIA_ALT);
    let mentions = entities::build(&posts, &entities::MENTIONS, has(entity_fields::MENTIONS));

    let roles = AuthorRole::all(&posts, &raw_mentions);
    let author_description = build_author_description(&roles, &schema);
    let author_urls = build_author_urls(&roles, &schema);

    let tables = NativeTables {
        media: entities::build(&posts, &media_spec, media_present),
        annotations: entities::build(&posts, &entities::ANNOTATIONS, has(entity_fields::ANNOTATIONS)),
        context_annotations: entities::build(
            &posts,
            &entities::CONTEXT_ANNOTATIONS,
            has(entity_fields::CONTEXT_ANNOTATIONS),
        ),
        hashtags: entities::build(&posts, &entities::HASHTAGS, has(entity_fields::HASHTAGS)),
        urls,
        interactions: Some(build_interactions(&posts, mentions.as_ref())),
        mentions,
        author_description,
        author_urls,
        poll_options: entities::build(&posts, &entities::POLL_OPTIONS, has(entity_fields::POLL_OPTIONS)),
        edit_history: entities::build(&posts, &entities::EDIT_HISTORY, has(entity_fields::EDIT_HISTORY)),
        posts: finalize_posts(posts),
    };
    (tables, stats)
}

/// Process one chunk into the tables of the chosen schema.
pub fn process_chunk(records: Vec<Value>, opts: &ChunkOptions) -> ChunkOutput {
    let (native, mut stats) = build_native_tables(records, opts.max_reference_depth);
    tracing::debug!(
        "chunk: {} records, {} reference levels, {} posts",
        stats.records,
        stats.levels,
        native.posts.len()
    );
    let projection = opts.schema.project(native);
    stats.row_count = projection.row_count;
    ChunkOutput { projection, stats }
}
