use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

fn input_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^.].*\.(jsonl|ndjson|json)(\.zst)?$").expect("input name pattern"))
}

/// Whether `name` looks like a collected NDJSON file (`.jsonl`, `.ndjson`, `.json`, optionally `.zst`).
pub fn is_input_name(name: &str) -> bool {
    input_name_re().is_match(name)
}

/// Input files directly under `dir`, in lexical order. A missing directory yields nothing.
pub fn discover_inputs(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if !dir.exists() {
        return files;
    }
    for ent in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name().into_iter().flatten() {
        if !ent.file_type().is_file() {
            continue;
        }
        if let Some(name) = ent.file_name().to_str() {
            if is_input_name(name) {
                files.push(ent.path().to_path_buf());
            }
        }
    }
    files
}
