//! Report filtering, artifact export, and exit status.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

use setforge_model::{Diagnostic, Pokeset, Severity};

/// Default database artifact name. The reserved `_` prefix keeps it out of
/// subsequent corpus walks.
pub const DATABASE_FILENAME: &str = "_compiled.json";

/// Default rollup artifact name.
pub const ROLLUP_FILENAME: &str = "_matchmaking.json";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error writing {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("cannot serialize {path}: {source}")]
    Serialize {
        path: String,
        source: serde_json::Error,
    },
}

/// Diagnostics at or above `min_severity`, in accumulation order.
///
/// Findings below the threshold stay in the full list (their side effects,
/// like name fixes, already happened); they are just not report noise.
pub fn filter_report(
    diagnostics: &[Diagnostic],
    min_severity: Severity,
) -> impl Iterator<Item = &Diagnostic> {
    diagnostics
        .iter()
        .filter(move |d| d.severity >= min_severity)
}

/// `0` when nothing at ERROR or WARNING severity was produced, `1`
/// otherwise. Lets CI gate on the compile.
pub fn exit_status(diagnostics: &[Diagnostic]) -> i32 {
    let clean = diagnostics.iter().all(|d| d.severity < Severity::Warning);
    if clean { 0 } else { 1 }
}

/// Write the compiled database: a JSON array of record bodies, object keys
/// in lexicographic order, four-space indentation.
pub fn write_database(path: &Path, sets: &[Pokeset]) -> Result<(), ExportError> {
    let bodies: Vec<&serde_json::Map<String, serde_json::Value>> =
        sets.iter().map(|s| &s.body).collect();
    write_json(path, &bodies)
}

/// Write the matchmaking rollup artifact.
pub fn write_rollup(path: &Path, rollup: &BTreeMap<String, Vec<String>>) -> Result<(), ExportError> {
    write_json(path, rollup)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut writer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| ExportError::Serialize {
            path: path.display().to_string(),
            source: e,
        })?;
    writer.write_all(b"\n").map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}
