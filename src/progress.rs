//! Progress reporting: a count-style bar over the estimated total and percent-complete logging.

use indicatif::{ProgressBar, ProgressStyle};

fn count_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} {msg} {pos}/{len} [{bar:.cyan/blue}] {percent:>3}%  \
         elapsed: {elapsed_precise}  eta: {eta_precise}"
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
}

/// Count-style progress bar (items processed out of total), with an optional label.
pub fn make_count_progress(total: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(count_style());
    if !label.is_empty() {
        pb.set_message(label.to_string());
    }
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Percent of the estimate processed so far; `None` without a usable estimate.
pub fn percent_of_estimate(processed: u64, estimated_total: Option<u64>) -> Option<f64> {
    match estimated_total {
        Some(total) if total > 0 => Some(processed as f64 * 100.0 / total as f64),
        _ => None,
    }
}

/// Thin wrapper over an optional bar so callers can report unconditionally.
pub struct ProgressScope {
    pb: Option<ProgressBar>,
    estimated_total: Option<u64>,
}

impl ProgressScope {
    pub fn new(show: bool, label: &str, estimated_total: Option<u64>) -> Self {
        let pb = match (show, estimated_total) {
            (true, Some(total)) => Some(make_count_progress(total, label)),
            _ => None,
        };
        Self { pb, estimated_total }
    }

    /// Report the running row count after a chunk.
    pub fn report(&self, processed: u64) -> Option<f64> {
        let pct = percent_of_estimate(processed, self.estimated_total);
        match (pct, self.estimated_total) {
            (Some(p), Some(total)) => tracing::info!("{} of ~{} posts processed ({:.1}%)", processed, total, p),
            _ => tracing::info!("{} posts processed", processed),
        }
        if let Some(pb) = &self.pb {
            pb.set_position(processed);
        }
        pct
    }

    pub fn finish<T: Into<String>>(&self, msg: T) {
        if let Some(pb) = &self.pb {
            pb.finish_with_message(msg.into());
        }
    }
}
