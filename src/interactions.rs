use crate::fields::{interactions, kind, mentions, POST_ID, REFERENCED_AUTHOR_ID, REFERENCED_AUTHOR_USERNAME, TWEET_TYPE};
use crate::table::{cell, cell_str, Row, Table};
use serde_json::Value;

fn interaction(post_id: &Value, kind: &Value, to_id: Option<&Value>, to_username: Option<&Value>) -> Row {
    let mut r = Row::new();
    r.insert(POST_ID.to_string(), post_id.clone());
    r.insert(interactions::TYPE.to_string(), kind.clone());
    r.insert(interactions::TO_USER_ID.to_string(), to_id.cloned().unwrap_or(Value::Null));
    r.insert(interactions::TO_USER_USERNAME.to_string(), to_username.cloned().unwrap_or(Value::Null));
    r
}

/// Everyone each post addresses: the retweeted, quoted or replied-to author plus every mention.
///
/// Never contains `original`. Every mention row has a `mention` interaction; repeat mentions of
/// one user in the same post collapse into one.
pub fn build_interactions(posts: &Table, mention_table: Option<&Table>) -> Table {
    let mut out = Table::with_columns(interactions::TABLE, interactions::COLUMNS.iter().copied());

    for r in &posts.rows {
        let (Some(pid), Some(t)) = (cell(r, POST_ID), cell(r, TWEET_TYPE)) else { continue };
        if t.as_str() == Some(kind::ORIGINAL) {
            continue;
        }
        out.rows.push(interaction(pid, t, cell(r, REFERENCED_AUTHOR_ID), cell(r, REFERENCED_AUTHOR_USERNAME)));
    }

    if let Some(m) = mention_table {
        let tag = Value::String(kind::MENTION.to_string());
        for r in &m.rows {
            let Some(pid) = cell(r, POST_ID) else { continue };
            out.rows.push(interaction(pid, &tag, cell(r, mentions::AUTHOR_ID), cell(r, mentions::USERNAME)));
        }
    }

    let out = out.filter(|r| cell_str(r, interactions::TYPE).is_some_and(|t| t != kind::ORIGINAL)).dedup();
    tracing::debug!("interactions table built ({} rows)", out.len());
    out
}
