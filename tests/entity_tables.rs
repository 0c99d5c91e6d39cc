#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use tweet_tables::entity_tables::{explode, finish, HASHTAGS};
use tweet_tables::{build_native_tables, cell_str, flatten_record, Table};

/// N list elements give N rows keyed to the post before dedup; exact duplicates collapse after.
#[test]
fn hashtag_rows_match_list_elements() {
    let mut rec = post("1", "10", "abe", "#a #b #a");
    rec["entities"]["hashtags"] = json!([
        {"start": 0, "end": 2, "tag": "a"},
        {"start": 3, "end": 5, "tag": "b"},
        {"start": 0, "end": 2, "tag": "a"},
        {"start": 9, "end": 9}
    ]);
    let posts = Table::from_rows("posts", vec![flatten_record(rec).unwrap()]);

    let exploded = explode(&posts, &HASHTAGS);
    assert_eq!(exploded.len(), 3, "three tagged elements; the untagged one is dropped");
    assert!(exploded.rows.iter().all(|r| cell_str(r, "post_id") == Some("1")));

    let finished = finish(exploded, &HASHTAGS);
    assert_eq!(finished.len(), 2, "exact duplicate removed");
    assert_eq!(finished.columns, vec!["post_id", "hashtags_start", "hashtags_end", "hashtags_tag"]);
}

/// Hashtag elements that spell the value `text` instead of `tag` still land in `hashtags_tag`.
#[test]
fn hashtag_text_alias() {
    let mut rec = post("1", "10", "abe", "#old");
    rec["entities"]["hashtags"] = json!([{"start": 0, "end": 4, "text": "old"}]);
    let (tables, _) = build_native_tables(vec![rec], 64);
    assert_eq!(column_strings(&tables.hashtags.unwrap(), "hashtags_tag"), vec!["old"]);
}

/// An entity field missing from the whole chunk yields no table; an empty list yields an empty one.
#[test]
fn absent_field_differs_from_empty_result() {
    let (tables, _) = build_native_tables(vec![post("1", "10", "abe", "plain")], 64);
    assert!(tables.urls.is_none());
    assert!(tables.hashtags.is_none());
    assert!(tables.media.is_none());
    assert!(tables.interactions.is_some(), "interactions always exist");

    let mut rec = post("2", "20", "bea", "plain");
    rec["entities"] = json!({"urls": []});
    let (tables, _) = build_native_tables(vec![rec], 64);
    let urls = tables.urls.expect("urls present");
    assert!(urls.is_empty());
    assert_eq!(urls.columns.len(), tweet_tables::columns::urls::COLUMNS.len());
}

/// Url rows drop the preview images and keep the link fields.
#[test]
fn url_rows_drop_images() {
    let rec = with_urls(post("1", "10", "abe", "see"), &[("https://t.co/a", "https://example.org/a/b")]);
    let (tables, _) = build_native_tables(vec![rec], 64);
    let urls = tables.urls.unwrap();
    assert_eq!(urls.len(), 1);
    assert!(!urls.has_column("urls_images"));
    assert_eq!(cell_str(&urls.rows[0], "urls_expanded_url"), Some("https://example.org/a/b"));
    assert_eq!(urls.rows[0].get("urls_status"), Some(&json!(200)));
}

/// Non-photo media fall back to the preview image; missing view counts become 0.
#[test]
fn media_url_fallback_for_video() {
    let mut rec = post("1", "10", "abe", "clip");
    rec["attachments"] = json!({
        "media_keys": ["7_1", "3_2"],
        "media": [
            {"media_key": "7_1", "type": "video", "preview_image_url": "https://pbs.example/prev.jpg",
             "duration_ms": 5000, "public_metrics": {"view_count": 42},
             "variants": [{"bit_rate": 1, "url": "https://video.example/v.mp4"}]},
            {"media_key": "3_2", "type": "photo", "url": "https://pbs.example/photo.jpg"}
        ]
    });
    let (tables, _) = build_native_tables(vec![rec], 64);
    let media = tables.media.expect("media present");
    assert_eq!(media.len(), 2);
    assert!(!media.has_column("media_variants"));

    let video = rows_where(&media, "media_key", "7_1")[0];
    assert_eq!(cell_str(video, "media_url"), Some("https://pbs.example/prev.jpg"));
    assert_eq!(video.get("media_public_metrics_view_count"), Some(&json!(42)));

    let photo = rows_where(&media, "media_key", "3_2")[0];
    assert_eq!(cell_str(photo, "media_url"), Some("https://pbs.example/photo.jpg"));
    assert_eq!(photo.get("media_public_metrics_view_count"), Some(&json!(0)));

    assert_eq!(tables.posts.rows[0].get("has_media"), Some(&json!(true)));
}

/// A top-level `media` list feeds both the media table and the post's `has_media` flag.
#[test]
fn top_level_media_list_sets_has_media() {
    let mut rec = post("1", "10", "abe", "pic");
    rec["media"] = json!([{"media_key": "3_9", "type": "photo", "url": "https://pbs.example/p.jpg"}]);
    let bare = post("2", "11", "bea", "no pic");
    let (tables, _) = build_native_tables(vec![rec, bare], 64);

    let media = tables.media.expect("media present");
    assert_eq!(media.len(), 1);
    assert_eq!(cell_str(&media.rows[0], "post_id"), Some("1"));
    let flag = |id: &str| rows_where(&tables.posts, "post_id", id)[0].get("has_media").cloned();
    assert_eq!(flag("1"), Some(json!(true)));
    assert_eq!(flag("2"), Some(json!(false)));
}

/// Poll options are keyed by the poll id, one row per option.
#[test]
fn poll_options_keyed_by_poll() {
    let mut rec = post("1", "10", "abe", "vote");
    rec["attachments"] = json!({"poll": {
        "id": "p9", "voting_status": "closed", "duration_minutes": 60,
        "options": [{"position": 1, "label": "yes", "votes": 3}, {"position": 2, "label": "no", "votes": 1}]
    }});
    let (tables, _) = build_native_tables(vec![rec], 64);
    let polls = tables.poll_options.expect("poll options present");
    assert_eq!(polls.len(), 2);
    assert_eq!(column_strings(&polls, "poll_id"), vec!["p9", "p9"]);
    assert_eq!(column_strings(&polls, "poll_label"), vec!["yes", "no"]);
    assert_eq!(cell_str(&tables.posts.rows[0], "attachments_poll_id"), Some("p9"));
}

/// Context and free-text annotations flatten their nested domain/entity objects.
#[test]
fn annotation_tables() {
    let mut rec = post("1", "10", "abe", "Rust in Berlin");
    rec["context_annotations"] = json!([
        {"domain": {"id": "46", "name": "Business Taxonomy"}, "entity": {"id": "1557", "name": "Software"}}
    ]);
    rec["entities"]["annotations"] = json!([
        {"start": 8, "end": 13, "probability": 0.9, "type": "Place", "normalized_text": "Berlin"}
    ]);
    let (tables, _) = build_native_tables(vec![rec], 64);

    let ctx = tables.context_annotations.unwrap();
    assert_eq!(cell_str(&ctx.rows[0], "context_annotation_domain_name"), Some("Business Taxonomy"));
    assert_eq!(cell_str(&ctx.rows[0], "context_annotation_entity_id"), Some("1557"));

    let ann = tables.annotations.unwrap();
    assert_eq!(cell_str(&ann.rows[0], "annotation_normalized_text"), Some("Berlin"));
    assert_eq!(cell_str(&ann.rows[0], "post_id"), Some("1"));
}

/// Edit history ids become one row each.
#[test]
fn edit_history_rows() {
    let mut rec = post("2", "10", "abe", "edited");
    rec["edit_history_tweet_ids"] = json!(["1", "2"]);
    let (tables, _) = build_native_tables(vec![rec], 64);
    let edits = tables.edit_history.unwrap();
    assert_eq!(column_strings(&edits, "edited_post_id"), vec!["1", "2"]);
    assert_eq!(column_strings(&edits, "post_id"), vec!["2", "2"]);
}

/// Every entity row points at a post that exists in the post table.
#[test]
fn entity_rows_have_parent_posts() {
    let (tables, _) = build_native_tables(mixed_records(), 64);
    let ids = tables.posts.key_set("post_id");
    for t in [&tables.hashtags, &tables.urls, &tables.mentions].into_iter().flatten() {
        for r in &t.rows {
            let id = cell_str(r, "post_id").unwrap();
            assert!(ids.contains(id), "{} row points at missing post {}", t.name, id);
        }
    }
}
