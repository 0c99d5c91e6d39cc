use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

static INIT_ONCE: std::sync::Once = std::sync::Once::new();
pub fn init_tracing_once() {
    INIT_ONCE.call_once(|| {
        let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
    });
}

/// File stem without any `.jsonl`/`.json`/`.zst` suffixes.
pub fn input_stem(path: &Path) -> String {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let mut stem = name.as_str();
    for ext in [".zst", ".jsonl", ".ndjson", ".json"] {
        if let Some(s) = stem.strip_suffix(ext) {
            stem = s;
        }
    }
    stem.to_string()
}

/// Write the full error chain for a failed input to `<dir>/<stem>.trace.txt`.
pub fn capture_error_trace(dir: &Path, input: &Path, err: &anyhow::Error) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(format!("{}.trace.txt", input_stem(input)));
    let body = format!("input: {}\n\n{:?}\n", input.display(), err);
    fs::write(&path, body).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

/// Completion marker for `input` under `done_dir`.
pub fn done_marker(done_dir: &Path, input: &Path) -> PathBuf {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    done_dir.join(format!("{name}.done"))
}
