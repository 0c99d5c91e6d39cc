//! Generic one-to-many entity extraction and the concrete entity tables built on it.

use crate::fields::{
    annotations, context_annotations, edit_history, entity_fields, hashtags, media, mentions, poll_options,
    urls, POST_ID,
};
use crate::flatten::flatten_into;
use crate::table::{cell, cell_str, Row, Table};
use serde_json::Value;

/// How to explode one list-valued post column into its own table.
#[derive(Clone, Copy, Debug)]
pub struct EntitySpec<'a> {
    pub table: &'a str,
    /// Key column read from the source rows.
    pub key: &'a str,
    /// Name of the key column in the output.
    pub key_as: &'a str,
    /// List-valued source column.
    pub field: &'a str,
    /// Element fields land under `{prefix}_*`; scalar elements land in `{prefix}` itself.
    pub prefix: &'a str,
    pub renames: &'a [(&'a str, &'a str)],
    pub drop: &'a [&'a str],
    /// Rows without a value here are discarded.
    pub required: &'a str,
    pub columns: &'a [&'a str],
    pub fixup: Option<fn(&mut Row)>,
}

impl<'a> EntitySpec<'a> {
    pub const fn new(table: &'a str, field: &'a str, prefix: &'a str, required: &'a str, columns: &'a [&'a str]) -> Self {
        Self {
            table,
            key: POST_ID,
            key_as: POST_ID,
            field,
            prefix,
            renames: &[],
            drop: &[],
            required,
            columns,
            fixup: None,
        }
    }
}

/// One row per list element, before reindexing and deduplication.
///
/// Rows whose key is null or whose field is not a list contribute nothing.
pub fn explode(source: &Table, spec: &EntitySpec<'_>) -> Table {
    let mut out = Table::new(spec.table);
    for row in &source.rows {
        let Some(key) = cell(row, spec.key) else { continue };
        let Some(Value::Array(items)) = row.get(spec.field) else { continue };
        for item in items {
            let mut r = Row::new();
            r.insert(spec.key_as.to_string(), key.clone());
            flatten_into(spec.prefix, item.clone(), &mut r);
            for (from, to) in spec.renames {
                if let Some(v) = r.remove(*from) {
                    r.insert((*to).to_string(), v);
                }
            }
            for d in spec.drop {
                r.remove(*d);
            }
            if let Some(f) = spec.fixup {
                f(&mut r);
            }
            if cell(&r, spec.required).is_none() {
                continue;
            }
            out.push(r);
        }
    }
    out
}

/// Conform an exploded table to its fixed column order and drop exact duplicates.
pub fn finish(exploded: Table, spec: &EntitySpec<'_>) -> Table {
    exploded.reindex(spec.columns).dedup()
}

/// Build the entity table, or `None` when the source field is absent from the chunk.
pub fn build(source: &Table, spec: &EntitySpec<'_>, present: bool) -> Option<Table> {
    if !present {
        return None;
    }
    let t = finish(explode(source, spec), spec);
    tracing::debug!("{} table built ({} rows)", spec.table, t.len());
    Some(t)
}

pub const HASHTAGS: EntitySpec<'static> = EntitySpec {
    renames: &[("hashtags_text", "hashtags_tag")],
    ..EntitySpec::new(hashtags::TABLE, entity_fields::HASHTAGS, "hashtags", hashtags::TAG, hashtags::COLUMNS)
};

pub const MENTIONS: EntitySpec<'static> = EntitySpec::new(
    mentions::TABLE,
    entity_fields::MENTIONS,
    mentions::PREFIX,
    mentions::USERNAME,
    mentions::COLUMNS,
);

pub const URLS: EntitySpec<'static> = EntitySpec {
    drop: &[urls::IMAGES],
    ..EntitySpec::new(urls::TABLE, entity_fields::URLS, "urls", urls::URL, urls::COLUMNS)
};

pub const MEDIA: EntitySpec<'static> = EntitySpec {
    renames: media::RENAMES,
    drop: media::DROP,
    fixup: Some(media_fixup),
    ..EntitySpec::new(media::TABLE, entity_fields::MEDIA, "media", media::KEY, media::COLUMNS)
};

pub const POLL_OPTIONS: EntitySpec<'static> = EntitySpec {
    key: entity_fields::POLL_ID,
    key_as: poll_options::KEY,
    ..EntitySpec::new(
        poll_options::TABLE,
        entity_fields::POLL_OPTIONS,
        "poll",
        poll_options::LABEL,
        poll_options::COLUMNS,
    )
};

pub const CONTEXT_ANNOTATIONS: EntitySpec<'static> = EntitySpec::new(
    context_annotations::TABLE,
    entity_fields::CONTEXT_ANNOTATIONS,
    context_annotations::PREFIX,
    context_annotations::ENTITY_ID,
    context_annotations::COLUMNS,
);

pub const ANNOTATIONS: EntitySpec<'static> = EntitySpec::new(
    annotations::TABLE,
    entity_fields::ANNOTATIONS,
    annotations::PREFIX,
    annotations::NORMALIZED_TEXT,
    annotations::COLUMNS,
);

pub const EDIT_HISTORY: EntitySpec<'static> = EntitySpec::new(
    edit_history::TABLE,
    entity_fields::EDIT_HISTORY,
    edit_history::EDITED_POST_ID,
    edit_history::EDITED_POST_ID,
    edit_history::COLUMNS,
);

/// Video and GIF media have no `url`; use the preview image instead. Missing view counts are 0.
fn media_fixup(row: &mut Row) {
    if cell_str(row, media::TYPE).is_some_and(|t| t != "photo") {
        let preview = row.get(media::PREVIEW_URL).cloned().unwrap_or(Value::Null);
        row.insert(media::URL.to_string(), preview);
    }
    if cell(row, media::VIEW_COUNT).is_none() {
        row.insert(media::VIEW_COUNT.to_string(), Value::from(0));
    }
}

/// Media extraction for whichever media list the chunk carries.
pub fn media_spec(has_attachments: bool) -> EntitySpec<'static> {
    if has_attachments {
        MEDIA
    } else {
        EntitySpec { field: entity_fields::MEDIA_ALT, ..MEDIA }
    }
}
