//! Terminal progress display for library indexing and tile matching

use crate::algorithm::observer::MatchObserver;
use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{prefix:>9}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Two-stage progress bars driven through [`MatchObserver`]
pub struct ProgressReporter {
    multi_progress: MultiProgress,
    indexing: ProgressBar,
    matching: ProgressBar,
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter {
    /// Create bars for the indexing and matching stages
    pub fn new() -> Self {
        let multi_progress = MultiProgress::new();
        let indexing = multi_progress.add(Self::stage_bar("Indexing"));
        let matching = multi_progress.add(Self::stage_bar("Matching"));
        Self {
            multi_progress,
            indexing,
            matching,
        }
    }

    /// Bar tracking candidate indexing
    pub const fn indexing(&self) -> &ProgressBar {
        &self.indexing
    }

    /// Bar tracking tile matching
    pub const fn matching(&self) -> &ProgressBar {
        &self.matching
    }

    /// Mark both stages complete and clear the display
    pub fn finish(&self) {
        self.indexing.finish_with_message("done");
        self.matching.finish_with_message("done");
        let _ = self.multi_progress.clear();
    }

    fn stage_bar(name: &'static str) -> ProgressBar {
        let bar = ProgressBar::new(0);
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_prefix(name);
        bar
    }

    fn advance(bar: &ProgressBar, completed: usize, total: usize) {
        bar.set_length(total as u64);
        // Completions arrive out of order from worker threads
        if completed as u64 > bar.position() {
            bar.set_position(completed as u64);
        }
    }
}

impl MatchObserver for ProgressReporter {
    fn candidate_indexed(&self, completed: usize, total: usize) {
        Self::advance(&self.indexing, completed, total);
    }

    fn tile_matched(&self, completed: usize, total: usize) {
        Self::advance(&self.matching, completed, total);
    }
}
