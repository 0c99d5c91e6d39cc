//! Author profile sub-entities (description hashtags, mentions, urls and profile urls) for the
//! three author roles a chunk can name.

use crate::entities::{explode, EntitySpec};
use crate::fields::{author_description, author_urls, mentions, AUTHOR_ID, IN_REPLY_TO_USER_ID};
use crate::presence::ChunkSchema;
use crate::table::{cell, Row, Table};

/// Where one role's profiles live and the column prefix its fields carry.
#[derive(Clone, Copy, Debug)]
pub struct AuthorRole<'a> {
    pub source: &'a Table,
    pub key: &'a str,
    /// e.g. `author`, `mentions_author`, `in_reply_to_user`
    pub prefix: &'a str,
}

impl<'a> AuthorRole<'a> {
    /// Post author, mentioned authors and replied-to author, in that order.
    pub fn all(posts: &'a Table, raw_mentions: &'a Table) -> [AuthorRole<'a>; 3] {
        [
            AuthorRole { source: posts, key: AUTHOR_ID, prefix: "author" },
            AuthorRole { source: raw_mentions, key: mentions::AUTHOR_ID, prefix: mentions::PREFIX },
            AuthorRole { source: posts, key: IN_REPLY_TO_USER_ID, prefix: "in_reply_to_user" },
        ]
    }
}

const DESCRIPTION_KINDS: [&str; 3] = ["hashtags", "mentions", "urls"];

fn placeholder(name: &str, columns: &[&str]) -> Table {
    let mut t = Table::with_columns(name, columns.iter().copied());
    t.rows.push(Row::new());
    t
}

/// Explode `{prefix}_entities_{path}` for one role and fold its columns onto `author_*`.
fn role_part(role: &AuthorRole<'_>, path: &str, out_prefix: &str, table: &str, columns: &[&str]) -> Table {
    let field = format!("{}_entities_{}", role.prefix, path);
    let prefix = format!("{}_{}", role.prefix, out_prefix);
    let key_as = format!("{}_id", role.prefix);
    let spec = EntitySpec {
        table,
        key: role.key,
        key_as: &key_as,
        field: &field,
        prefix: &prefix,
        renames: &[],
        drop: &[],
        required: &key_as,
        columns,
        fixup: None,
    };
    explode(role.source, &spec).replace_prefix(&format!("{}_", role.prefix), "author_")
}

/// Description hashtags, mentions and urls of every role, stacked under `author_description_*`.
///
/// `None` when no role carries any description entities in this chunk. A role that lacks them
/// contributes one all-null row, which the final `author_id` filter removes.
pub fn build_author_description(roles: &[AuthorRole<'_>], schema: &ChunkSchema) -> Option<Table> {
    let mut parts = Vec::new();
    let mut any = false;
    for role in roles {
        let mut contributed = false;
        for kind in DESCRIPTION_KINDS {
            let path = format!("description_{kind}");
            if !schema.has(&format!("{}_entities_{}", role.prefix, path)) {
                continue;
            }
            parts.push(role_part(role, &path, &path, author_description::TABLE, author_description::COLUMNS));
            contributed = true;
        }
        if !contributed {
            parts.push(placeholder(author_description::TABLE, author_description::COLUMNS));
        }
        any |= contributed;
    }
    if !any {
        return None;
    }

    let t = finish_authors(Table::concat(author_description::TABLE, parts), author_description::COLUMNS);
    tracing::debug!("author_description table built ({} rows)", t.len());
    Some(t)
}

/// Profile urls (`entities.url.urls`) of every role under `author_url_*`.
pub fn build_author_urls(roles: &[AuthorRole<'_>], schema: &ChunkSchema) -> Option<Table> {
    let mut parts = Vec::new();
    let mut any = false;
    for role in roles {
        if schema.has(&format!("{}_entities_url_urls", role.prefix)) {
            parts.push(role_part(role, "url_urls", "url", author_urls::TABLE, author_urls::COLUMNS));
            any = true;
        } else {
            parts.push(placeholder(author_urls::TABLE, author_urls::COLUMNS));
        }
    }
    if !any {
        return None;
    }

    let t = finish_authors(Table::concat(author_urls::TABLE, parts), author_urls::COLUMNS);
    tracing::debug!("author_urls table built ({} rows)", t.len());
    Some(t)
}

fn finish_authors(t: Table, columns: &[&str]) -> Table {
    t.filter(|r| cell(r, AUTHOR_ID).is_some()).reindex(columns).dedup()
}
