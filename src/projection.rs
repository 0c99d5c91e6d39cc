//! Output schema variants and the projectors that map the native tables onto them.

use crate::error::ConfigError;
use crate::fields::{
    hashtags, interactions, kind, legacy_a, legacy_b, mentions, urls, AUTHOR_ID, AUTHOR_USERNAME, POST_ID,
    REFERENCED_AUTHOR_ID, REFERENCED_AUTHOR_NAME, REFERENCED_AUTHOR_USERNAME, REFERENCED_POST_ID,
    REFERENCED_POST_TEXT, REFERENCE_LEVEL, TEXT, TWEET_TYPE,
};
use crate::table::{cell, cell_str, key_text, Row, Table};
use ahash::AHashSet;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Every table one chunk produces in the native layout. `None` marks a table whose source field
/// the chunk does not carry.
#[derive(Clone, Debug, Default)]
pub struct NativeTables {
    pub posts: Table,
    pub media: Option<Table>,
    pub annotations: Option<Table>,
    pub context_annotations: Option<Table>,
    pub hashtags: Option<Table>,
    pub urls: Option<Table>,
    pub mentions: Option<Table>,
    pub author_description: Option<Table>,
    pub author_urls: Option<Table>,
    pub poll_options: Option<Table>,
    pub interactions: Option<Table>,
    pub edit_history: Option<Table>,
}

impl NativeTables {
    /// Present tables in load order.
    pub fn into_tables(self) -> Vec<Table> {
        let mut v = vec![self.posts];
        v.extend(
            [
                self.media,
                self.annotations,
                self.context_annotations,
                self.hashtags,
                self.urls,
                self.mentions,
                self.author_description,
                self.author_urls,
                self.poll_options,
                self.interactions,
                self.edit_history,
            ]
            .into_iter()
            .flatten(),
        );
        v
    }

    pub fn level0_posts(&self) -> Table {
        self.posts.clone().filter(|r| cell_str(r, REFERENCE_LEVEL) == Some("0"))
    }

    pub fn level0_count(&self) -> u64 {
        self.posts.rows.iter().filter(|r| cell_str(r, REFERENCE_LEVEL) == Some("0")).count() as u64
    }
}

/// Tables to load plus the row-count metric used for progress.
#[derive(Clone, Debug, Default)]
pub struct Projection {
    pub tables: Vec<Table>,
    pub row_count: u64,
}

pub trait Projector {
    fn project(&self, native: NativeTables) -> Projection;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SchemaVariant {
    #[default]
    Native,
    LegacyA,
    LegacyB,
}

impl SchemaVariant {
    pub const ALL: [SchemaVariant; 3] = [SchemaVariant::Native, SchemaVariant::LegacyA, SchemaVariant::LegacyB];

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaVariant::Native => "native",
            SchemaVariant::LegacyA => "legacy-a",
            SchemaVariant::LegacyB => "legacy-b",
        }
    }

    /// Resolve the historical three-switch configuration; exactly one must be on.
    pub fn from_flags(native: bool, legacy_a: bool, legacy_b: bool) -> Result<Self, ConfigError> {
        let on: Vec<SchemaVariant> = Self::ALL
            .into_iter()
            .zip([native, legacy_a, legacy_b])
            .filter_map(|(v, set)| set.then_some(v))
            .collect();
        match on.as_slice() {
            [] => Err(ConfigError::NoSchemaSelected),
            [one] => Ok(*one),
            many => Err(ConfigError::ConflictingSchemas(many.iter().map(|v| v.as_str()).collect())),
        }
    }

    pub fn projector(self) -> &'static dyn Projector {
        match self {
            SchemaVariant::Native => &NativeProjector,
            SchemaVariant::LegacyA => &LegacyAProjector,
            SchemaVariant::LegacyB => &LegacyBProjector,
        }
    }

    pub fn project(self, native: NativeTables) -> Projection {
        self.projector().project(native)
    }
}

impl fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" | "data" => Ok(SchemaVariant::Native),
            "legacy-a" | "legacy_a" | "tcat" => Ok(SchemaVariant::LegacyA),
            "legacy-b" | "legacy_b" | "tweetquery" => Ok(SchemaVariant::LegacyB),
            other => Err(ConfigError::UnknownSchema(other.to_string())),
        }
    }
}

/// All native tables unchanged; counts level-0 posts.
pub struct NativeProjector;

impl Projector for NativeProjector {
    fn project(&self, native: NativeTables) -> Projection {
        let row_count = native.level0_count();
        Projection { tables: native.into_tables(), row_count }
    }
}

fn blank() -> Value {
    Value::String(String::new())
}

fn when_type(row: &Row, ty: &str, col: &str) -> Value {
    if cell_str(row, TWEET_TYPE) == Some(ty) {
        row.get(col).cloned().unwrap_or(Value::Null)
    } else {
        blank()
    }
}

fn fill_blanks(t: Table, cols: &[&str]) -> Table {
    cols.iter().fold(t, |t, c| t.fill(c, blank()))
}

fn restrict_to(t: Option<&Table>, ids: &AHashSet<String>) -> Option<Table> {
    t.map(|t| t.clone().filter(|r| cell(r, POST_ID).is_some_and(|v| ids.contains(&key_text(v)))))
}

/// `tweets` + `hashtags` + `mentions` over the search matches; counts `tweets` rows.
pub struct LegacyAProjector;

impl Projector for LegacyAProjector {
    fn project(&self, native: NativeTables) -> Projection {
        let posts0 = native.level0_posts();
        let ids = posts0.key_set(POST_ID);

        let tweets = posts0
            .clone()
            .map_rows(|row| {
                let time = row.get("created_at").cloned().unwrap_or(Value::Null);
                row.insert("time".into(), time);
                row.insert("in_reply_to_status_id".into(), when_type(row, kind::REPLY, REFERENCED_POST_ID));
                row.insert("quoted_status_id".into(), when_type(row, kind::QUOTE, REFERENCED_POST_ID));
            });
        let tweets = fill_blanks(tweets, legacy_a::BLANK)
            .rename_columns(legacy_a::POST_RENAMES)
            .reindex(legacy_a::POST_COLUMNS)
            .named(legacy_a::POSTS_TABLE);

        let hashtag_rows = restrict_to(native.hashtags.as_ref(), &ids)
            .unwrap_or_else(|| Table::with_columns(hashtags::TABLE, hashtags::COLUMNS.iter().copied()));
        let tags = hashtag_rows
            .select(&[POST_ID, hashtags::TAG])
            .rename_columns(&[(POST_ID, "tweet_id"), (hashtags::TAG, "hashtag")])
            .reindex(legacy_a::HASHTAG_COLUMNS)
            .named(legacy_a::HASHTAGS_TABLE);

        let from = posts0.select(&[POST_ID, AUTHOR_ID, AUTHOR_USERNAME]);
        let mentioned = restrict_to(native.interactions.as_ref(), &ids)
            .map(|t| {
                t.filter(|r| interactions::COLUMNS.iter().all(|c| cell(r, c).is_some()))
                    .left_join(&from, POST_ID)
                    .rename_columns(&[
                        (POST_ID, "tweet_id"),
                        (AUTHOR_ID, "user_from_id"),
                        (AUTHOR_USERNAME, "user_from_name"),
                        (interactions::TO_USER_ID, "user_to_id"),
                        (interactions::TO_USER_USERNAME, "user_to_name"),
                        (interactions::TYPE, "mention_type"),
                    ])
                    .dedup()
            })
            .unwrap_or_default()
            .reindex(legacy_a::MENTION_COLUMNS)
            .named(legacy_a::MENTIONS_TABLE);

        let row_count = tweets.len() as u64;
        Projection { tables: vec![tweets, tags, mentioned], row_count }
    }
}

/// Everything `https` where the profile image url is plain `http`.
fn https_url(v: Option<&Value>) -> Value {
    match v.and_then(Value::as_str) {
        Some(s) => match s.strip_prefix("http://") {
            Some(rest) => Value::String(format!("https://{rest}")),
            None => Value::String(s.to_string()),
        },
        None => Value::Null,
    }
}

/// Scheme and host of an unwound link: the first three `/`-separated parts.
pub fn domain_path(url: &str) -> String {
    url.split('/').take(3).collect::<Vec<_>>().join("/")
}

/// One flat `tweets_flat` table with hashtags, mentions and urls joined onto each search match;
/// counts distinct post ids.
pub struct LegacyBProjector;

impl LegacyBProjector {
    fn mention_rows(native: &NativeTables, ids: &AHashSet<String>) -> Table {
        let mut names = Table::new("names");
        if let Some(m) = &native.mentions {
            for r in &m.rows {
                let mut n = Row::new();
                n.insert(interactions::TO_USER_ID.into(), r.get(mentions::AUTHOR_ID).cloned().unwrap_or(Value::Null));
                n.insert("name".into(), r.get(mentions::NAME).cloned().unwrap_or(Value::Null));
                names.push(n);
            }
        }
        for r in &native.posts.rows {
            let mut n = Row::new();
            n.insert(interactions::TO_USER_ID.into(), r.get(REFERENCED_AUTHOR_ID).cloned().unwrap_or(Value::Null));
            n.insert("name".into(), r.get(REFERENCED_AUTHOR_NAME).cloned().unwrap_or(Value::Null));
            names.push(n);
        }
        let names = names.filter(|r| cell(r, "name").is_some()).dedup();

        restrict_to(native.interactions.as_ref(), ids)
            .map(|t| {
                t.left_join(&names, interactions::TO_USER_ID)
                    .rename_columns(&[
                        (interactions::TO_USER_ID, "entities_user_mention_id"),
                        (interactions::TO_USER_USERNAME, "entities_user_mention_screen_name"),
                        ("name", "entities_user_mentions_name"),
                    ])
                    .select(&[
                        POST_ID,
                        "entities_user_mention_id",
                        "entities_user_mention_screen_name",
                        "entities_user_mentions_name",
                    ])
                    .filter(|r| r.len() == 4 && r.values().all(|v| !v.is_null()))
                    .dedup()
            })
            .unwrap_or_default()
    }

    fn url_rows(native: &NativeTables, ids: &AHashSet<String>) -> Table {
        restrict_to(native.urls.as_ref(), ids)
            .map(|t| {
                t.map_rows(|r| {
                    let unwound = r.get(urls::UNWOUND_URL).cloned().unwrap_or(Value::Null);
                    let domain = cell_str(r, urls::UNWOUND_URL).map(|u| Value::String(domain_path(u)));
                    r.insert("urls_unshortened_url".into(), unwound);
                    r.insert("urls_domain_path".into(), domain.unwrap_or(Value::Null));
                })
                .select(&[
                    POST_ID,
                    urls::URL,
                    urls::EXPANDED_URL,
                    "urls_unshortened_url",
                    "urls_domain_path",
                    urls::STATUS,
                ])
            })
            .unwrap_or_default()
    }
}

impl Projector for LegacyBProjector {
    fn project(&self, native: NativeTables) -> Projection {
        let posts0 = native.level0_posts();
        let ids = posts0.key_set(POST_ID);

        let flat = posts0.map_rows(|row| {
            let text = row.get(TEXT).cloned().unwrap_or(Value::Null);
            row.insert("full_text".into(), text);

            row.insert("in_reply_to_screen_name".into(), when_type(row, kind::REPLY, REFERENCED_AUTHOR_USERNAME));
            row.insert("in_reply_to_status_id".into(), when_type(row, kind::REPLY, REFERENCED_POST_ID));
            row.insert("in_reply_to_user_id".into(), when_type(row, kind::REPLY, REFERENCED_AUTHOR_ID));

            let is_quote = cell_str(row, TWEET_TYPE) == Some(kind::QUOTE);
            row.insert("is_quote_status".into(), Value::Bool(is_quote));
            row.insert("quoted_status_id".into(), when_type(row, kind::QUOTE, REFERENCED_POST_ID));
            row.insert("quoted_status_text".into(), when_type(row, kind::QUOTE, REFERENCED_POST_TEXT));
            row.insert("quoted_status_user_id".into(), when_type(row, kind::QUOTE, REFERENCED_AUTHOR_ID));

            let is_retweet = cell_str(row, TWEET_TYPE) == Some(kind::RETWEET);
            row.insert("retweeted".into(), Value::Bool(is_retweet));
            row.insert("retweeted_status_id".into(), when_type(row, kind::RETWEET, REFERENCED_POST_ID));
            row.insert("retweeted_status_user_id".into(), when_type(row, kind::RETWEET, REFERENCED_AUTHOR_ID));

            let https = https_url(row.get("author_profile_image_url"));
            row.insert("user_profile_image_url_https".into(), https);
        });
        let flat = fill_blanks(flat, legacy_b::BLANK);

        let tags = restrict_to(native.hashtags.as_ref(), &ids)
            .map(|t| t.select(&[POST_ID, hashtags::TAG]).rename_columns(&[(hashtags::TAG, "entities_hashtags_text")]))
            .unwrap_or_default();
        let flat = flat
            .left_join(&tags, POST_ID)
            .left_join(&Self::mention_rows(&native, &ids), POST_ID)
            .left_join(&Self::url_rows(&native, &ids), POST_ID)
            .rename_columns(legacy_b::POST_RENAMES)
            .reindex(legacy_b::COLUMNS)
            .named(legacy_b::TABLE);

        let row_count = flat.key_set("id").len() as u64;
        Projection { tables: vec![flat], row_count }
    }
}
