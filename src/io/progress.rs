//! Terminal progress display for frames and stitched rows

use crate::render::observer::RenderObserver;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static ROW_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:30.cyan/blue}] {pos}/{len} rows")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static FRAME_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Frames: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

/// Shows row progress for the current frame, plus a frame bar for animations
pub struct ProgressManager {
    multi_progress: MultiProgress,
    frame_bar: Option<ProgressBar>,
    row_bar: ProgressBar,
    completed: bool,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create a progress manager with an empty row bar
    pub fn new() -> Self {
        let multi_progress = MultiProgress::new();
        let row_bar = multi_progress.add(ProgressBar::new(0));
        row_bar.set_style(ROW_STYLE.clone());
        Self {
            multi_progress,
            frame_bar: None,
            row_bar,
            completed: false,
        }
    }

    /// Whether the render reported completion
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref frame_bar) = self.frame_bar {
            frame_bar.finish_and_clear();
        }
        self.row_bar.finish_and_clear();
        let _ = self.multi_progress.clear();
    }
}

impl RenderObserver for ProgressManager {
    fn frame_started(&mut self, index: usize, total: usize, rows: u32) {
        if total > 1 && self.frame_bar.is_none() {
            let frame_bar = ProgressBar::new(total as u64);
            frame_bar.set_style(FRAME_STYLE.clone());
            self.frame_bar = Some(self.multi_progress.insert(0, frame_bar));
        }
        self.row_bar.set_length(u64::from(rows));
        self.row_bar.set_position(0);
        self.row_bar
            .set_message(format!("frame {:>width$}", index + 1, width = total.to_string().len()));
    }

    fn row_completed(&mut self, _index: usize, row: u32) {
        self.row_bar.set_position(u64::from(row) + 1);
    }

    fn frame_completed(&mut self, _index: usize, _total: usize) {
        if let Some(ref frame_bar) = self.frame_bar {
            frame_bar.inc(1);
        }
    }

    fn render_completed(&mut self) {
        self.completed = true;
        if let Some(ref frame_bar) = self.frame_bar {
            frame_bar.finish_with_message("All frames stitched");
        }
        self.row_bar.finish_with_message("done");
    }
}
