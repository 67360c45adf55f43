//! Corpus traversal: find every record file under a root directory.
//!
//! Directories are visited recursively with sorted enumeration, so the
//! accumulation order of records and diagnostics is reproducible across
//! filesystems. Each directory's prototype is resolved once and shared by
//! every record file in it.

use serde_yml::Mapping;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use setforge_model::{Diagnostic, Pokeset, Severity};

use crate::loader::load_records;
use crate::progress::WalkProgress;
use crate::prototype::{find_prototype_file, parse_prototype_file};
use crate::resolver::SetResolver;

/// Record files use these extensions, compared case-insensitively.
const RECORD_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Filenames starting with this prefix are templates or build outputs,
/// never records.
const RESERVED_PREFIX: char = '_';

#[derive(Debug, Error)]
pub enum WalkError {
    /// The root itself cannot be enumerated; nothing narrower is fatal.
    #[error("cannot read corpus root {path}: {source}")]
    ReadRoot {
        path: String,
        source: std::io::Error,
    },
}

/// Counters accumulated over one walk.
#[derive(Debug, Default, Clone)]
pub struct WalkStats {
    pub directories: u64,
    pub files: u64,
    /// Records that survived resolution.
    pub sets: u64,
    pub errors: u64,
    pub warnings: u64,
}

/// Result of walking a corpus: everything loaded, nothing cross-checked yet.
#[derive(Debug, Default)]
pub struct Walked {
    pub diagnostics: Vec<Diagnostic>,
    pub sets: Vec<Pokeset>,
    pub stats: WalkStats,
}

/// Walk `root` and load every eligible record file.
///
/// Eligible files end in `.yaml`/`.yml` (case-insensitive) and do not
/// start with `_`. Diagnostics are stamped with paths relative to `root`.
pub fn walk_corpus(
    root: &Path,
    resolver: &dyn SetResolver,
    progress: Option<&dyn WalkProgress>,
) -> Result<Walked, WalkError> {
    // Fail fast if the root is unusable; subdirectory problems degrade to
    // diagnostics inside the walk.
    fs::read_dir(root).map_err(|e| WalkError::ReadRoot {
        path: root.display().to_string(),
        source: e,
    })?;

    let mut out = Walked::default();
    visit_dir(root, root, None, resolver, progress, &mut out);

    out.stats.errors = count_severity(&out.diagnostics, Severity::Error);
    out.stats.warnings = count_severity(&out.diagnostics, Severity::Warning);
    log::info!(
        "walked {} directories, {} files: {} sets, {} errors, {} warnings",
        out.stats.directories,
        out.stats.files,
        out.stats.sets,
        out.stats.errors,
        out.stats.warnings,
    );
    if let Some(p) = progress {
        p.on_complete(&out.stats);
    }

    Ok(out)
}

fn visit_dir(
    root: &Path,
    dir: &Path,
    inherited: Option<&Mapping>,
    resolver: &dyn SetResolver,
    progress: Option<&dyn WalkProgress>,
    out: &mut Walked,
) {
    out.stats.directories += 1;

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            out.diagnostics.push(
                Diagnostic::error(format!("cannot read directory: {e}"))
                    .with_path(relative_to(root, dir)),
            );
            return;
        }
    };
    let mut entries: Vec<PathBuf> = entries.flatten().map(|e| e.path()).collect();
    entries.sort();

    // A template in this directory shadows anything inherited from an
    // ancestor, even when it fails to parse.
    let local_template = find_prototype_file(dir);
    let owned;
    let prototype: Option<&Mapping> = match local_template {
        Some(path) => {
            let (diags, proto) = parse_prototype_file(&path, root);
            out.diagnostics.extend(diags);
            owned = proto;
            owned.as_ref()
        }
        None => inherited,
    };

    for path in &entries {
        if path.is_dir() {
            visit_dir(root, path, prototype, resolver, progress, out);
        } else if path.is_file() && is_record_file(path) {
            load_file(root, path, prototype, resolver, progress, out);
        }
    }
}

fn load_file(
    root: &Path,
    path: &Path,
    prototype: Option<&Mapping>,
    resolver: &dyn SetResolver,
    progress: Option<&dyn WalkProgress>,
    out: &mut Walked,
) {
    let rel = relative_to(root, path);
    out.stats.files += 1;
    if let Some(p) = progress {
        p.on_file(&rel);
    }

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            out.diagnostics
                .push(Diagnostic::error(format!("cannot read file: {e}")).with_path(rel));
            return;
        }
    };

    let (diagnostics, sets) = load_records(&text, &rel, prototype, resolver);
    out.stats.sets += sets.len() as u64;
    out.diagnostics.extend(diagnostics);
    out.sets.extend(sets);
}

/// Whether a file is an eligible record file.
fn is_record_file(path: &Path) -> bool {
    let reserved = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_none_or(|n| n.starts_with(RESERVED_PREFIX));
    if reserved {
        return false;
    }
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| RECORD_EXTENSIONS.iter().any(|x| e.eq_ignore_ascii_case(x)))
}

fn relative_to(root: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf())
}

fn count_severity(diagnostics: &[Diagnostic], severity: Severity) -> u64 {
    diagnostics.iter().filter(|d| d.severity == severity).count() as u64
}
