//! Prototype templates: per-directory default values for pokesets.
//!
//! A file named `_prototype.yaml` (or `.yml`, case-insensitive) supplies
//! default keys for every record file in its directory and, transitively,
//! in subdirectories that lack their own template. Lookup is purely
//! structural: every file in a directory shares the directory's resolved
//! prototype.

use serde_yml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

use setforge_model::Diagnostic;

/// Reserved template filenames, compared case-insensitively.
const PROTOTYPE_NAMES: &[&str] = &["_prototype.yaml", "_prototype.yml"];

/// Find the template file directly contained in `dir`, if any.
pub fn find_prototype_file(dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| {
                        let lower = n.to_lowercase();
                        PROTOTYPE_NAMES.contains(&lower.as_str())
                    })
        })
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

/// Parse a template file found by [`find_prototype_file`].
///
/// A parse failure (or a template that is not a mapping) is an ERROR and
/// yields no prototype: a corrupt template must not be silently applied in
/// part, and must not fall back to an ancestor's. An empty template file is
/// treated as no prototype.
pub fn parse_prototype_file(path: &Path, root: &Path) -> (Vec<Diagnostic>, Option<Mapping>) {
    let rel = pathdiff::diff_paths(path, root).unwrap_or_else(|| path.to_path_buf());

    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            let diag = Diagnostic::error(format!("cannot read prototype: {e}")).with_path(rel);
            return (vec![diag], None);
        }
    };
    if text.trim().is_empty() {
        return (Vec::new(), None);
    }

    match serde_yml::from_str::<Value>(&text) {
        Ok(Value::Mapping(mapping)) => (Vec::new(), Some(mapping)),
        Ok(Value::Null) => (Vec::new(), None),
        Ok(_) => {
            let diag =
                Diagnostic::error("prototype is not a mapping of default keys").with_path(rel);
            (vec![diag], None)
        }
        Err(e) => {
            let mut diag = Diagnostic::error(format!("cannot parse prototype: {e}")).with_path(rel);
            if let Some(location) = e.location() {
                diag = diag.with_line(location.line());
            }
            (vec![diag], None)
        }
    }
}

/// Resolve the nearest enclosing prototype for `dir`.
///
/// Walks upward from `dir` towards `root`; the first directory that
/// directly contains a template file decides the result, corrupt or not.
pub fn resolve_prototype(root: &Path, dir: &Path) -> (Vec<Diagnostic>, Option<Mapping>) {
    let mut current = dir;
    loop {
        if let Some(path) = find_prototype_file(current) {
            return parse_prototype_file(&path, root);
        }
        if current == root {
            return (Vec::new(), None);
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return (Vec::new(), None),
        }
    }
}

/// Shallow merge of a record over its prototype.
///
/// Keys present in the record replace the same key in the prototype
/// entirely; there is no recursive merging of nested mappings.
pub fn merge_with_prototype(prototype: Option<&Mapping>, record: &Mapping) -> Mapping {
    let Some(prototype) = prototype else {
        return record.clone();
    };
    let mut merged = prototype.clone();
    for (key, value) in record {
        merged.insert(key.clone(), value.clone());
    }
    merged
}
