use crate::fields::{kind, posts, REFERENCE_LEVEL, TWEET_TYPE};
use crate::table::{cell, cell_str, Row, Table};
use serde_json::Value;

fn is_level0(row: &Row) -> bool {
    match cell(row, REFERENCE_LEVEL) {
        Some(Value::String(s)) => s == "0",
        Some(Value::Number(n)) => n.as_u64() == Some(0),
        _ => false,
    }
}

fn non_empty(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Array(a)) => !a.is_empty(),
        Some(_) => true,
    }
}

fn bbox_text(v: &Value) -> Option<String> {
    let Value::Array(items) = v else { return None };
    let parts: Vec<String> = items
        .iter()
        .map(|x| match x {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect();
    Some(parts.join(","))
}

/// Derive flag and default columns, then conform to the post column order.
///
/// `has_*` flags describe level-0 rows only: a referenced post arrives with whatever expansions
/// the referencing search asked for, so missing lists there say nothing. The tweet-type flags
/// hold on every level.
pub fn finalize_posts(t: Table) -> Table {
    let t = t.map_rows(|row| {
        let level0 = is_level0(row);
        let ty = cell_str(row, TWEET_TYPE).unwrap_or(kind::ORIGINAL).to_string();

        row.insert("is_referenced".into(), Value::Bool(!level0));
        row.insert("is_retweet".into(), Value::Bool(ty == kind::RETWEET));
        row.insert("is_quote".into(), Value::Bool(ty == kind::QUOTE));
        row.insert("is_reply".into(), Value::Bool(ty == kind::REPLY));
        row.insert(TWEET_TYPE.into(), Value::String(ty));

        for (flag, sources) in posts::HAS_FLAGS {
            let v = if level0 {
                let list = sources.iter().find_map(|s| row.get(*s).filter(|v| !v.is_null()));
                Value::Bool(non_empty(list))
            } else {
                Value::Null
            };
            row.insert((*flag).to_string(), v);
        }

        for c in posts::COUNT_COLUMNS {
            if cell(row, c).is_none() {
                row.insert((*c).to_string(), Value::from(0));
            }
        }

        if let Some(s) = row.get(posts::BBOX).and_then(bbox_text) {
            row.insert(posts::BBOX.to_string(), Value::String(s));
        }
    });

    t.reindex(posts::COLUMNS).dedup()
}
