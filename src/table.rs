//! In-memory relational tables: an ordered column list over JSON-valued rows.
//!
//! A missing key and an explicit `null` are the same thing everywhere in this crate: both read
//! back as `None` from [`cell`]. Builders rely on that to treat sparse API payloads uniformly.

use ahash::{AHashMap, AHashSet};
use serde_json::{Map, Value};

/// One table row keyed by column name.
pub type Row = Map<String, Value>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

/// Non-null value of `col` in `row`.
#[inline]
pub fn cell<'a>(row: &'a Row, col: &str) -> Option<&'a Value> {
    row.get(col).filter(|v| !v.is_null())
}

#[inline]
pub fn cell_str<'a>(row: &'a Row, col: &str) -> Option<&'a str> {
    cell(row, col).and_then(Value::as_str)
}

/// Join/dedup key for a scalar. Ids arrive as strings or numbers depending on the producer.
pub fn key_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), columns: Vec::new(), rows: Vec::new() }
    }

    pub fn with_columns<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { name: name.into(), columns: columns.into_iter().map(Into::into).collect(), rows: Vec::new() }
    }

    /// Build from rows; the column list is the union of keys in first-seen order.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        let mut t = Self::new(name);
        for r in rows {
            t.push(r);
        }
        t
    }

    #[inline] pub fn len(&self) -> usize { self.rows.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn has_column(&self, col: &str) -> bool {
        self.columns.iter().any(|c| c == col)
    }

    pub fn push(&mut self, row: Row) {
        for k in row.keys() {
            if !self.has_column(k) {
                self.columns.push(k.clone());
            }
        }
        self.rows.push(row);
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Keep only the listed columns that exist, in the listed order.
    pub fn select(&self, cols: &[&str]) -> Table {
        let keep: Vec<&str> = cols.iter().copied().filter(|c| self.has_column(c)).collect();
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut out = Row::new();
                for c in &keep {
                    if let Some(v) = r.get(*c) {
                        out.insert((*c).to_string(), v.clone());
                    }
                }
                out
            })
            .collect();
        Table { name: self.name.clone(), columns: keep.iter().map(|c| c.to_string()).collect(), rows }
    }

    /// Apply renames in order. A rename onto an existing column replaces its values.
    pub fn rename_columns(mut self, renames: &[(&str, &str)]) -> Self {
        for (from, to) in renames {
            if from == to || !self.has_column(from) {
                continue;
            }
            for r in &mut self.rows {
                match r.remove(*from) {
                    Some(v) => { r.insert((*to).to_string(), v); }
                    None => { r.remove(*to); }
                }
            }
            if self.has_column(to) {
                self.columns.retain(|c| c != from);
            } else if let Some(c) = self.columns.iter_mut().find(|c| c.as_str() == *from) {
                *c = (*to).to_string();
            }
        }
        self
    }

    /// Rename every column starting with `from` so it starts with `to` instead.
    pub fn replace_prefix(self, from: &str, to: &str) -> Self {
        let pairs: Vec<(String, String)> = self
            .columns
            .iter()
            .filter_map(|c| c.strip_prefix(from).map(|rest| (c.clone(), format!("{to}{rest}"))))
            .collect();
        let refs: Vec<(&str, &str)> = pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        self.rename_columns(&refs)
    }

    pub fn drop_columns(mut self, cols: &[&str]) -> Self {
        for r in &mut self.rows {
            for c in cols {
                r.remove(*c);
            }
        }
        self.columns.retain(|c| !cols.contains(&c.as_str()));
        self
    }

    /// Conform to a fixed column order: absent columns read as null, extra columns are dropped.
    pub fn reindex(mut self, cols: &[&str]) -> Self {
        for r in &mut self.rows {
            r.retain(|k, _| cols.contains(&k.as_str()));
        }
        self.columns = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Set `col` on every row.
    pub fn fill(mut self, col: &str, value: Value) -> Self {
        for r in &mut self.rows {
            r.insert(col.to_string(), value.clone());
        }
        if !self.has_column(col) {
            self.columns.push(col.to_string());
        }
        self
    }

    pub fn map_rows(mut self, mut f: impl FnMut(&mut Row)) -> Self {
        for r in &mut self.rows {
            f(r);
        }
        let mut cols = std::mem::take(&mut self.columns);
        for r in &self.rows {
            for k in r.keys() {
                if !cols.iter().any(|c| c == k) {
                    cols.push(k.clone());
                }
            }
        }
        self.columns = cols;
        self
    }

    pub fn filter(mut self, mut pred: impl FnMut(&Row) -> bool) -> Self {
        self.rows.retain(|r| pred(r));
        self
    }

    fn row_key(row: &Row, cols: &[String]) -> String {
        let vals: Vec<&Value> = cols.iter().map(|c| row.get(c).unwrap_or(&Value::Null)).collect();
        serde_json::to_string(&vals).unwrap_or_default()
    }

    /// Remove exact-duplicate rows, keeping the first occurrence.
    pub fn dedup(self) -> Self {
        let cols = self.columns.clone();
        self.dedup_on(&cols)
    }

    /// Remove rows repeating an earlier row's values on `keys`.
    pub fn dedup_by(self, keys: &[&str]) -> Self {
        let cols: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        self.dedup_on(&cols)
    }

    fn dedup_on(mut self, cols: &[String]) -> Self {
        let mut seen: AHashSet<String> = AHashSet::with_capacity(self.rows.len());
        self.rows.retain(|r| seen.insert(Self::row_key(r, cols)));
        self
    }

    /// Vertical union; the column list is the union in first-seen order.
    pub fn concat(name: impl Into<String>, tables: impl IntoIterator<Item = Table>) -> Table {
        let mut out = Table::new(name);
        for t in tables {
            for c in t.columns {
                if !out.has_column(&c) {
                    out.columns.push(c);
                }
            }
            out.rows.extend(t.rows);
        }
        out
    }

    /// Left join on `on`. A left row with several matches yields one row per match; right-side
    /// values win on shared column names.
    pub fn left_join(&self, right: &Table, on: &str) -> Table {
        let mut index: AHashMap<String, Vec<usize>> = AHashMap::with_capacity(right.len());
        for (i, r) in right.rows.iter().enumerate() {
            if let Some(k) = cell(r, on) {
                index.entry(key_text(k)).or_default().push(i);
            }
        }

        let mut columns = self.columns.clone();
        for c in &right.columns {
            if c != on && !columns.contains(c) {
                columns.push(c.clone());
            }
        }

        let mut rows = Vec::with_capacity(self.len());
        for l in &self.rows {
            let matches = cell(l, on).and_then(|k| index.get(&key_text(k)));
            match matches {
                Some(idxs) => {
                    for &i in idxs {
                        let mut merged = l.clone();
                        for (k, v) in &right.rows[i] {
                            if k != on {
                                merged.insert(k.clone(), v.clone());
                            }
                        }
                        rows.push(merged);
                    }
                }
                None => rows.push(l.clone()),
            }
        }
        Table { name: self.name.clone(), columns, rows }
    }

    /// Distinct non-null values of `col`, as join keys.
    pub fn key_set(&self, col: &str) -> AHashSet<String> {
        self.rows.iter().filter_map(|r| cell(r, col)).map(key_text).collect()
    }
}
