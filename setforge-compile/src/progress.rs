//! Walk progress reporting.

use std::path::Path;

use crate::walker::WalkStats;

/// Trait for receiving progress updates during a corpus walk.
pub trait WalkProgress {
    /// Called before each record file is loaded, with its root-relative path.
    fn on_file(&self, path: &Path);

    /// Called once the walk is finished.
    fn on_complete(&self, stats: &WalkStats);
}

/// A no-op progress reporter that discards all updates.
pub struct SilentProgress;

impl WalkProgress for SilentProgress {
    fn on_file(&self, _path: &Path) {}
    fn on_complete(&self, _stats: &WalkStats) {}
}

/// A progress reporter that logs to the `log` crate.
pub struct LogProgress;

impl WalkProgress for LogProgress {
    fn on_file(&self, path: &Path) {
        log::debug!("loading {}", path.display());
    }

    fn on_complete(&self, stats: &WalkStats) {
        log::info!(
            "walked {} directories, {} files: {} sets loaded",
            stats.directories,
            stats.files,
            stats.sets,
        );
    }
}
