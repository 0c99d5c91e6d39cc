#[path = "common/mod.rs"]
mod common;

use common::*;
use std::str::FromStr;
use tweet_tables::columns::{legacy_a, legacy_b};
use tweet_tables::{
    append_table, build_native_tables, cell_str, domain_path, process_chunk, ChunkOptions, ConfigError,
    DelimitedFormat, SchemaVariant, Table,
};

fn project(schema: SchemaVariant) -> (Vec<Table>, u64) {
    let out = process_chunk(mixed_records(), &ChunkOptions { schema, ..Default::default() });
    (out.projection.tables, out.projection.row_count)
}

fn table<'a>(tables: &'a [Table], name: &str) -> &'a Table {
    tables.iter().find(|t| t.name == name).unwrap_or_else(|| panic!("missing table {name}"))
}

/// Native output is every present native table, counted by search matches.
#[test]
fn native_counts_level_zero_posts() {
    let (tables, row_count) = project(SchemaVariant::Native);
    assert_eq!(row_count, 4, "four search matches in the chunk");
    assert_eq!(tables[0].name, "posts");
    let names: Vec<&str> = tables.iter().map(|t| t.name.as_str()).collect();
    for expected in ["hashtags", "urls", "mentions", "interactions"] {
        assert!(names.contains(&expected), "{expected} missing from {names:?}");
    }
    assert!(!names.contains(&"media"), "no media in the chunk");
}

/// The denormalized layout keeps exactly its three tables with fixed columns, over search matches only.
#[test]
fn legacy_a_column_closure_and_counts() {
    let (tables, row_count) = project(SchemaVariant::LegacyA);
    assert_eq!(tables.len(), 3);

    let tweets = table(&tables, legacy_a::POSTS_TABLE);
    assert_eq!(tweets.columns, legacy_a::POST_COLUMNS);
    assert_eq!(tweets.len(), 4);
    assert_eq!(row_count, 4);
    assert!(rows_where(tweets, "id", "100").is_empty(), "referenced-only posts are not matches");

    let quote = rows_where(tweets, "id", "300")[0];
    assert_eq!(cell_str(quote, "quoted_status_id"), Some("400"));
    assert_eq!(cell_str(quote, "in_reply_to_status_id"), Some(""));
    assert_eq!(cell_str(quote, "filter_level"), Some(""));
    assert_eq!(cell_str(quote, "from_user_name"), Some("carol"));
    assert_eq!(cell_str(quote, "to_user_name"), Some("dave"));

    let tags = table(&tables, legacy_a::HASHTAGS_TABLE);
    assert_eq!(tags.columns, legacy_a::HASHTAG_COLUMNS);
    let mut pairs: Vec<(&str, &str)> = tags
        .rows
        .iter()
        .map(|r| (cell_str(r, "tweet_id").unwrap(), cell_str(r, "hashtag").unwrap()))
        .collect();
    pairs.sort();
    assert_eq!(pairs, vec![("200", "world"), ("600", "data"), ("600", "rust")]);

    let mentions = table(&tables, legacy_a::MENTIONS_TABLE);
    assert_eq!(mentions.columns, legacy_a::MENTION_COLUMNS);
    // the quote's target has no user id and is left out
    assert_eq!(mentions.len(), 3);
    assert!(mentions.rows.iter().all(|r| legacy_a::MENTION_COLUMNS.iter().all(|c| cell_str(r, c).is_some())));
    let reply = rows_where(mentions, "mention_type", "reply")[0];
    assert_eq!(cell_str(reply, "user_from_name"), Some("erin"));
    assert_eq!(cell_str(reply, "user_to_name"), Some("alice"));
}

/// The flat layout has one table whose row count is the number of distinct ids.
#[test]
fn legacy_b_column_closure_and_counts() {
    let (tables, row_count) = project(SchemaVariant::LegacyB);
    assert_eq!(tables.len(), 1);
    let flat = &tables[0];
    assert_eq!(flat.name, legacy_b::TABLE);
    assert_eq!(flat.columns, legacy_b::COLUMNS);
    assert_eq!(row_count, 4);
    assert_eq!(flat.len(), 5, "the post with two hashtags repeats once per tag");

    let rt = rows_where(flat, "id", "200")[0];
    assert_eq!(rt.get("retweeted"), Some(&serde_json::json!(true)));
    assert_eq!(cell_str(rt, "retweeted_status_id"), Some("100"));
    assert_eq!(cell_str(rt, "entities_hashtags_text"), Some("world"));
    assert_eq!(cell_str(rt, "entities_user_mention_screen_name"), Some("alice"));
    assert_eq!(cell_str(rt, "entities_user_mentions_name"), Some("alice name"));
    assert_eq!(cell_str(rt, "full_text"), Some("RT @alice: hello #world"));

    let quote = rows_where(flat, "id", "300")[0];
    assert_eq!(quote.get("is_quote_status"), Some(&serde_json::json!(true)));
    assert_eq!(cell_str(quote, "urls_unshortened_url"), Some("https://twitter.com/dave/status/400"));
    assert_eq!(cell_str(quote, "urls_domain_path"), Some("https://twitter.com"));
    assert_eq!(cell_str(quote, "user_screen_name"), Some("carol"));

    let reply = rows_where(flat, "id", "500");
    assert_eq!(reply.len(), 1, "reply and mention of the same user collapse");
    assert_eq!(cell_str(reply[0], "in_reply_to_screen_name"), Some("alice"));
}

/// Same chunk, same schema: identical tables down to the rendered bytes.
#[test]
fn projection_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    for schema in SchemaVariant::ALL {
        let (a, _) = project(schema);
        let (b, _) = project(schema);
        assert_eq!(a, b, "{schema} differs between runs");

        let fmt = DelimitedFormat::default();
        for (i, (ta, tb)) in a.iter().zip(&b).enumerate() {
            let pa = dir.path().join(format!("{schema}_{i}_a.csv"));
            let pb = dir.path().join(format!("{schema}_{i}_b.csv"));
            append_table(&pa, ta, &fmt).unwrap();
            append_table(&pb, tb, &fmt).unwrap();
            assert_eq!(std::fs::read(&pa).unwrap(), std::fs::read(&pb).unwrap());
        }
    }
}

/// Projection never invents posts: legacy rows are a subset of the native search matches.
#[test]
fn legacy_ids_subset_of_native() {
    let (native, _) = build_native_tables(mixed_records(), 64);
    let matches = native.level0_posts().key_set("post_id");
    let (tables, _) = project(SchemaVariant::LegacyB);
    assert!(tables[0].key_set("id").iter().all(|id| matches.contains(id)));
}

#[test]
fn schema_selection_from_flags() {
    assert_eq!(SchemaVariant::from_flags(false, true, false).unwrap(), SchemaVariant::LegacyA);
    assert!(matches!(SchemaVariant::from_flags(false, false, false), Err(ConfigError::NoSchemaSelected)));
    match SchemaVariant::from_flags(true, false, true) {
        Err(ConfigError::ConflictingSchemas(names)) => assert_eq!(names, vec!["native", "legacy-b"]),
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn schema_names_parse() {
    assert_eq!(SchemaVariant::from_str("native").unwrap(), SchemaVariant::Native);
    assert_eq!(SchemaVariant::from_str("TCAT").unwrap(), SchemaVariant::LegacyA);
    assert_eq!(SchemaVariant::from_str("legacy_b").unwrap(), SchemaVariant::LegacyB);
    for v in SchemaVariant::ALL {
        assert_eq!(SchemaVariant::from_str(&v.to_string()).unwrap(), v);
    }
    assert!(matches!(SchemaVariant::from_str("parquet"), Err(ConfigError::UnknownSchema(s)) if s == "parquet"));
}

#[test]
fn domain_path_keeps_scheme_and_host() {
    assert_eq!(domain_path("https://news.example.com/a/b?c=1"), "https://news.example.com");
    assert_eq!(domain_path("news.example.com"), "news.example.com");
}
