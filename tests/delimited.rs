#[path = "common/mod.rs"]
mod common;

use common::*;
use serde_json::json;
use std::borrow::Cow;
use tweet_tables::{append_table, render_cell, DelimitedFormat, Table};

/// Awkward field contents survive writing and reading back unchanged.
#[test]
fn escaping_round_trip() {
    let fmt = DelimitedFormat::default();
    let fields = ["plain", "a,b", "say \"hi\"", "pipe | inside", "line\nbreak", "", "…unicode…"];
    let line = fmt.encode_record(fields.iter().map(|s| Cow::Borrowed(*s)));
    assert_eq!(fmt.parse(&line), vec![fields.iter().map(|s| s.to_string()).collect::<Vec<_>>()]);
    assert_eq!(fmt.encode_field("say \"hi\""), "\"say |\"hi|\"\"");
}

/// Nulls render empty, lists as compact JSON, booleans and numbers as text.
#[test]
fn cell_rendering() {
    assert_eq!(render_cell(None), "");
    assert_eq!(render_cell(Some(&json!(null))), "");
    assert_eq!(render_cell(Some(&json!(true))), "true");
    assert_eq!(render_cell(Some(&json!(12))), "12");
    assert_eq!(render_cell(Some(&json!(["a", 1]))), r#"["a",1]"#);
}

/// Appending to an existing file adds rows without repeating the header.
#[test]
fn header_written_once_on_append() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("t.csv");
    let fmt = DelimitedFormat::default();

    let mut t = Table::with_columns("t", ["id", "note"]);
    t.push(serde_json::from_value(json!({"id": "1", "note": "first, with comma"})).unwrap());
    assert_eq!(append_table(&path, &t, &fmt).unwrap(), 1);

    let mut t2 = Table::with_columns("t", ["id", "note"]);
    t2.push(serde_json::from_value(json!({"id": "2"})).unwrap());
    append_table(&path, &t2, &fmt).unwrap();

    let records = read_delimited(&path);
    assert_eq!(
        records,
        vec![
            vec!["id".to_string(), "note".to_string()],
            vec!["1".to_string(), "first, with comma".to_string()],
            vec!["2".to_string(), String::new()],
        ]
    );
}

/// A custom delimiter is honoured by both encoder and parser.
#[test]
fn tab_delimited() {
    let fmt = DelimitedFormat { delimiter: '\t', ..Default::default() };
    let line = fmt.encode_record(["a,b", "c\td"].into_iter().map(Cow::Borrowed));
    assert_eq!(line, "a,b\t\"c\td\"\n");
    assert_eq!(fmt.parse(&line), vec![vec!["a,b".to_string(), "c\td".to_string()]]);
}
