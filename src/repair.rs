//! Data-quality repairs on the unified post table.
//!
//! The search API truncates retweet text and leaves the retweet's entity lists incomplete, and
//! references resolved outside the chunk carry no author. Both are patched here, after uplift.

use crate::fields::{
    kind, urls, POST_ID, REFERENCED_AUTHOR_USERNAME, REFERENCED_POST_TEXT, RETWEET_ENTITY_COPIES, TEXT,
    TWEET_TYPE,
};
use crate::table::{cell, cell_str, key_text, Table};
use ahash::AHashMap;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

fn status_path_segment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // scheme, empty, host, then the handle segment
    RE.get_or_init(|| Regex::new(r"^(?:[^/]*/){3}([^/?#]+)").expect("status url pattern"))
}

fn first_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\S+)").expect("first token pattern"))
}

/// Rebuild retweet text as `RT @user: text` and carry the referenced post's entity lists over.
///
/// Text is only rebuilt when both the referenced author and text are known; an unresolved
/// retweet keeps what the API sent. Entity lists are always replaced, with null when the
/// referenced post has none.
pub fn repair_retweets(posts: Table) -> Table {
    posts.map_rows(|row| {
        if cell_str(row, TWEET_TYPE) != Some(kind::RETWEET) {
            return;
        }
        if let (Some(user), Some(text)) =
            (cell_str(row, REFERENCED_AUTHOR_USERNAME), cell_str(row, REFERENCED_POST_TEXT))
        {
            let rebuilt = format!("RT @{user}: {text}");
            row.insert(TEXT.to_string(), Value::String(rebuilt));
        }
        for (to, from) in RETWEET_ENTITY_COPIES {
            let v = row.get(*from).cloned().unwrap_or(Value::Null);
            row.insert((*to).to_string(), v);
        }
    })
}

/// Handle of the quoted author from a status link, e.g. `https://twitter.com/jack/status/20`.
pub fn handle_from_status_url(url: &str) -> Option<String> {
    let caps = status_path_segment().captures(url)?;
    let h = caps.get(1)?.as_str().trim_start_matches('@');
    (!h.is_empty()).then(|| h.to_string())
}

/// Handle a reply is addressed to, taken from the first word of its text.
pub fn handle_from_reply_text(text: &str) -> Option<String> {
    let caps = first_token().captures(text)?;
    let h = caps.get(1)?.as_str().trim_start_matches('@');
    (!h.is_empty()).then(|| h.to_string())
}

/// Best-effort fallback for quotes and replies whose referenced author is unknown.
///
/// Quotes read the handle from the post's status link (the first url pointing at a `/status/`
/// path, else the first url). Replies read it from the leading `@handle` of the text.
pub fn infer_referenced_authors(posts: Table, url_table: Option<&Table>) -> Table {
    let mut status_links: AHashMap<String, String> = AHashMap::new();
    if let Some(t) = url_table {
        for r in &t.rows {
            let (Some(pid), Some(expanded)) = (cell(r, POST_ID), cell_str(r, urls::EXPANDED_URL)) else {
                continue;
            };
            let key = key_text(pid);
            let is_status = expanded.contains("/status/");
            match status_links.get(&key) {
                Some(prev) if prev.contains("/status/") || !is_status => {}
                _ => {
                    status_links.insert(key, expanded.to_string());
                }
            }
        }
    }

    posts.map_rows(|row| {
        if cell(row, REFERENCED_AUTHOR_USERNAME).is_some() {
            return;
        }
        let inferred = match cell_str(row, TWEET_TYPE) {
            Some(kind::QUOTE) => cell(row, POST_ID)
                .and_then(|pid| status_links.get(&key_text(pid)))
                .and_then(|u| handle_from_status_url(u)),
            Some(kind::REPLY) => cell_str(row, TEXT).and_then(handle_from_reply_text),
            _ => None,
        };
        if let Some(h) = inferred {
            row.insert(REFERENCED_AUTHOR_USERNAME.to_string(), Value::String(h));
        }
    })
}
