//! Level uplift: copies each referenced post's fields onto the rows that reference it and folds
//! all levels into one post table.

use crate::fields::{kind, posts, POST_ID, REFERENCED_POST_ID, TWEET_TYPE, UPLIFT_COLUMNS, UPLIFT_RENAMES};
use crate::table::{cell_str, Table};
use serde_json::Value;

/// Merge leveled tables into the unified post table.
///
/// Each level `i >= 1` is narrowed to the uplift allow-list, renamed onto the
/// `referenced_post_*` columns and left-joined onto level `i - 1`. The combined tables and the
/// deepest level are stacked. `tweet_type` is mapped from the API reference kind, and anything
/// without one is `original`.
pub fn uplift(levels: Vec<Table>) -> Table {
    let unified = if levels.len() <= 1 {
        levels.into_iter().next().unwrap_or_default()
    } else {
        let mut combined = Vec::with_capacity(levels.len());
        for pair in levels.windows(2) {
            let moved = pair[1]
                .select(UPLIFT_COLUMNS)
                .rename_columns(UPLIFT_RENAMES)
                .dedup_by(&[REFERENCED_POST_ID, POST_ID, TWEET_TYPE]);
            combined.push(pair[0].left_join(&moved, POST_ID));
        }
        combined.extend(levels.into_iter().last());
        Table::concat(posts::TABLE, combined)
    };

    unified.named(posts::TABLE).map_rows(|row| {
        let mapped = cell_str(row, TWEET_TYPE)
            .map(|t| kind::from_reference(t).unwrap_or(t).to_string())
            .unwrap_or_else(|| kind::ORIGINAL.to_string());
        row.insert(TWEET_TYPE.to_string(), Value::String(mapped));
    })
}
