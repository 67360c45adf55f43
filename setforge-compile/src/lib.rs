//! Pokeset corpus compilation.
//!
//! Aggregates hand-authored pokeset YAML files scattered across a directory
//! tree into one validated database: directory traversal with prototype
//! inheritance, per-record loading and display-name sanitization, a
//! whole-corpus integrity pass, and JSON artifact export.
//!
//! The stages are usable individually; [`compile_corpus`] wires them
//! together in the order the `setforge` binary runs them.

use std::collections::BTreeMap;
use std::path::Path;

use setforge_model::{Diagnostic, Pokeset};

pub mod integrity;
pub mod loader;
pub mod progress;
pub mod prototype;
pub mod report;
pub mod resolver;
pub mod rollup;
pub mod sanitize;
pub mod walker;

pub use integrity::check_integrity;
pub use loader::load_records;
pub use progress::{LogProgress, SilentProgress, WalkProgress};
pub use prototype::{merge_with_prototype, resolve_prototype};
pub use report::{DATABASE_FILENAME, ROLLUP_FILENAME, ExportError, exit_status};
pub use resolver::{BasicResolver, ResolveError, Resolution, SetResolver};
pub use rollup::{RollupOptions, roll_up, trainer_tag};
pub use sanitize::sanitize_ingamename;
pub use walker::{WalkError, WalkStats, walk_corpus};

/// Everything a full compile produces, before any artifact is written.
#[derive(Debug)]
pub struct CompileOutcome {
    /// All diagnostics, in accumulation order: walk first, integrity after.
    pub diagnostics: Vec<Diagnostic>,
    /// The deduplicated record list, ready for export.
    pub sets: Vec<Pokeset>,
    /// Trainer-tag rollup groups, keyed by marker tag.
    pub rollup: BTreeMap<String, Vec<String>>,
    pub stats: WalkStats,
}

/// Run the whole pipeline: walk the corpus, cross-check it, roll up tags.
///
/// Artifact writing is left to the caller so validate-only runs share this
/// path. The only fatal error is failing to enumerate the root directory;
/// everything narrower is a [`Diagnostic`] in the outcome.
pub fn compile_corpus(
    root: &Path,
    resolver: &dyn SetResolver,
    rollup_options: &RollupOptions,
    progress: Option<&dyn WalkProgress>,
) -> Result<CompileOutcome, WalkError> {
    let walked = walk_corpus(root, resolver, progress)?;

    let mut diagnostics = walked.diagnostics;
    let checked = check_integrity(walked.sets);
    diagnostics.extend(checked.diagnostics);

    let rollup = roll_up(&checked.sets, rollup_options);

    Ok(CompileOutcome {
        diagnostics,
        sets: checked.sets,
        rollup,
        stats: walked.stats,
    })
}
