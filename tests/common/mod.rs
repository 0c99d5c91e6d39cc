#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tweet_tables::{cell, DelimitedFormat, LocalWarehouse, SinkError, Table, Warehouse};

/// Expanded author object as the search API returns it.
pub fn author(id: &str, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "name": format!("{username} name"),
        "created_at": "2015-03-01T10:00:00.000Z",
        "verified": false,
        "protected": false,
        "public_metrics": {"followers_count": 10, "following_count": 5, "tweet_count": 100, "listed_count": 1}
    })
}

/// Plain post with no references and no entities.
pub fn post(id: &str, author_id: &str, username: &str, text: &str) -> Value {
    json!({
        "id": id,
        "text": text,
        "created_at": "2021-06-01T12:00:00.000Z",
        "author_id": author_id,
        "author": author(author_id, username),
        "lang": "en",
        "conversation_id": id,
        "public_metrics": {"like_count": 3, "quote_count": 0, "reply_count": 1, "retweet_count": 2},
        "__twarc": {"url": "https://api.example/2/tweets/search/all", "version": "2.10.4", "retrieved_at": "2021-06-02T00:00:00+00:00"}
    })
}

pub fn with_hashtags(mut v: Value, tags: &[&str]) -> Value {
    let mut start = 0;
    let items: Vec<Value> = tags
        .iter()
        .map(|t| {
            let h = json!({"start": start, "end": start + t.len() + 1, "tag": t});
            start += t.len() + 2;
            h
        })
        .collect();
    v["entities"]["hashtags"] = Value::Array(items);
    v
}

pub fn with_mentions(mut v: Value, users: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = users
        .iter()
        .enumerate()
        .map(|(i, (id, name))| json!({"start": i * 10, "end": i * 10 + name.len() + 1, "username": name, "id": id}))
        .collect();
    v["entities"]["mentions"] = Value::Array(items);
    v
}

pub fn with_urls(mut v: Value, urls: &[(&str, &str)]) -> Value {
    let items: Vec<Value> = urls
        .iter()
        .map(|(short, expanded)| {
            json!({
                "start": 0, "end": 23, "url": short, "expanded_url": expanded, "display_url": expanded,
                "unwound_url": expanded, "status": 200,
                "images": [{"url": "https://pbs.example/big.jpg", "width": 1200, "height": 800}]
            })
        })
        .collect();
    v["entities"]["urls"] = Value::Array(items);
    v
}

/// Attach `referenced` (already shaped like an API reference element) to `v`.
pub fn referencing(mut v: Value, kind: &str, referenced: Value) -> Value {
    let mut r = referenced;
    r["type"] = Value::String(kind.to_string());
    match v.get_mut("referenced_tweets").and_then(Value::as_array_mut) {
        Some(list) => list.push(r),
        None => v["referenced_tweets"] = Value::Array(vec![r]),
    }
    v
}

/// A reference the API could not expand: only its type and id.
pub fn bare_reference(id: &str) -> Value {
    json!({"id": id})
}

pub fn write_jsonl(path: &Path, records: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut f = File::create(path).unwrap();
    for r in records {
        writeln!(f, "{}", r).unwrap();
    }
}

pub fn write_jsonl_zst(path: &Path, records: &[Value]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let f = File::create(path).unwrap();
    let mut enc = zstd::stream::write::Encoder::new(f, 3).unwrap();
    for r in records {
        writeln!(&mut enc, "{}", r).unwrap();
    }
    enc.finish().unwrap();
}

/// Parse a delimited file into records (header first).
pub fn read_delimited(path: &Path) -> Vec<Vec<String>> {
    let content = fs::read_to_string(path).unwrap();
    DelimitedFormat::default().parse(&content)
}

/// Non-null values of `col`, as strings.
pub fn column_strings(t: &Table, col: &str) -> Vec<String> {
    t.rows
        .iter()
        .filter_map(|r| cell(r, col))
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .collect()
}

pub fn rows_where<'a>(t: &'a Table, col: &str, value: &str) -> Vec<&'a serde_json::Map<String, Value>> {
    t.rows.iter().filter(|r| cell(r, col).and_then(Value::as_str) == Some(value)).collect()
}

/// Fresh input/work/warehouse directories under one temp root.
pub struct Dirs {
    pub _root: tempfile::TempDir,
    pub input: PathBuf,
    pub work: PathBuf,
    pub warehouse: PathBuf,
}

pub fn dirs() -> Dirs {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("input");
    let work = root.path().join("work");
    let warehouse = root.path().join("warehouse");
    fs::create_dir_all(&input).unwrap();
    Dirs { input, work, warehouse, _root: root }
}

/// Small mixed chunk: an original, a retweet of an embedded post, a quote with a status link and
/// a reply that mentions someone.
pub fn mixed_records() -> Vec<Value> {
    let p = with_hashtags(post("100", "1", "alice", "hello #world"), &["world"]);
    let rt = referencing(post("200", "2", "bob", "RT @alice: hello #wor…"), "retweeted", p.clone());
    let q = referencing(
        with_urls(
            post("300", "3", "carol", "look at this https://t.co/q"),
            &[("https://t.co/q", "https://twitter.com/dave/status/400")],
        ),
        "quoted",
        bare_reference("400"),
    );
    let reply = referencing(
        with_mentions(post("500", "4", "erin", "@alice agreed"), &[("1", "alice")]),
        "replied_to",
        p.clone(),
    );
    let orig = with_hashtags(post("600", "5", "frank", "#rust #data"), &["rust", "data"]);
    vec![rt, q, reply, orig]
}

/// Wraps a [`LocalWarehouse`] and fails the first `failures` loads.
pub struct FlakyWarehouse {
    pub inner: LocalWarehouse,
    pub failures: u32,
    pub transient: bool,
    pub load_calls: u32,
}

impl FlakyWarehouse {
    pub fn new(root: &Path, failures: u32, transient: bool) -> Self {
        Self { inner: LocalWarehouse::new(root), failures, transient, load_calls: 0 }
    }
}

impl Warehouse for FlakyWarehouse {
    fn ensure_dataset(&mut self) -> Result<(), SinkError> {
        self.inner.ensure_dataset()
    }
    fn description(&self) -> Result<String, SinkError> {
        self.inner.description()
    }
    fn set_description(&mut self, text: &str) -> Result<(), SinkError> {
        self.inner.set_description(text)
    }
    fn ensure_table(&mut self, table: &str) -> Result<(), SinkError> {
        self.inner.ensure_table(table)
    }
    fn load_file(&mut self, table: &str, path: &Path) -> Result<u64, SinkError> {
        self.load_calls += 1;
        if self.failures > 0 {
            self.failures -= 1;
            return Err(if self.transient {
                SinkError::Transient("503 backend unavailable".into())
            } else {
                SinkError::Fatal("400 invalid schema".into())
            });
        }
        self.inner.load_file(table, path)
    }
}
