//! Reference graph unpacking: nested `referenced_tweets` chains become one table per level.

use crate::fields::{POST_ID, REFERENCES, REFERENCE_LEVEL, REFERENCING_POST_ID};
use crate::flatten::{flatten_object, rename_id};
use crate::table::{cell, Row, Table};
use serde_json::Value;

/// Leveled post tables; index 0 holds the search matches.
#[derive(Clone, Debug)]
pub struct Unpacked {
    pub levels: Vec<Table>,
    /// Set when references remained below the depth cap and were not followed.
    pub depth_capped: bool,
}

fn has_pending_references(level: &Table) -> bool {
    level.has_column(REFERENCES)
        && level
            .rows
            .iter()
            .any(|r| matches!(r.get(REFERENCES), Some(Value::Array(a)) if !a.is_empty()))
}

/// Explode every referenced post of `parent` into a row of the next level.
fn next_level(parent: &Table, level: usize) -> Table {
    let stamp = Value::String(level.to_string());
    let mut out = Table::new(format!("level_{level}"));
    for row in &parent.rows {
        let Some(parent_id) = cell(row, POST_ID) else { continue };
        let Some(Value::Array(refs)) = row.get(REFERENCES) else { continue };
        for r in refs {
            let Value::Object(obj) = r else { continue };
            let mut child: Row = flatten_object(obj.clone());
            rename_id(&mut child);
            child.insert(REFERENCING_POST_ID.to_string(), parent_id.clone());
            child.insert(REFERENCE_LEVEL.to_string(), stamp.clone());
            out.push(child);
        }
    }
    out.dedup()
}

/// Follow references level by level until none remain or `max_depth` levels below the search
/// matches have been produced.
pub fn unpack_references(level0: Table, max_depth: usize) -> Unpacked {
    let mut levels = vec![level0.named("level_0")];
    let mut depth_capped = false;

    while let Some(current) = levels.last() {
        if !has_pending_references(current) {
            break;
        }
        if levels.len() > max_depth {
            tracing::warn!(
                "reference chain deeper than {} levels; deeper references left unresolved",
                max_depth
            );
            depth_capped = true;
            break;
        }
        let next = next_level(current, levels.len());
        if next.is_empty() {
            break;
        }
        tracing::debug!("unpacked reference level {} ({} rows)", levels.len(), next.len());
        levels.push(next);
    }

    Unpacked { levels, depth_capped }
}
