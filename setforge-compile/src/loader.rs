//! Per-file record loading: decode, merge, sanitize, resolve.
//!
//! One source file holds zero or more YAML documents. Failures are
//! contained to the narrowest scope: a syntax error drops the file, a
//! resolution failure drops only that record.

use serde::Deserialize;
use serde_yml::{Mapping, Value};
use std::path::Path;

use setforge_model::{Diagnostic, Pokeset};

use crate::prototype::merge_with_prototype;
use crate::resolver::{Resolution, SetResolver, value_kind};
use crate::sanitize::sanitize_ingamename;

/// Load every record from one source file's text.
///
/// `source` is the file's path relative to the corpus root; every
/// diagnostic and every populated record is stamped with it.
pub fn load_records(
    text: &str,
    source: &Path,
    prototype: Option<&Mapping>,
    resolver: &dyn SetResolver,
) -> (Vec<Diagnostic>, Vec<Pokeset>) {
    let mut diagnostics = Vec::new();
    let mut sets = Vec::new();

    // Decode the whole file first: a syntax error anywhere means none of
    // its documents can be trusted, so the file contributes no records.
    let mut documents = Vec::new();
    for document in serde_yml::Deserializer::from_str(text) {
        match Value::deserialize(document) {
            Ok(value) => documents.push(value),
            Err(e) => {
                let mut diag =
                    Diagnostic::error(format!("cannot parse file: {e}")).with_path(source);
                if let Some(location) = e.location() {
                    diag = diag.with_line(location.line());
                }
                return (vec![diag], Vec::new());
            }
        }
    }

    for document in documents {
        match document {
            Value::Null => {
                diagnostics.push(
                    Diagnostic::note("skipping empty document").with_path(source),
                );
            }
            Value::Mapping(raw) => {
                load_document(raw, source, prototype, resolver, &mut diagnostics, &mut sets);
            }
            other => {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "document is not a mapping, found {}",
                        value_kind(&other)
                    ))
                    .with_path(source),
                );
            }
        }
    }

    (diagnostics, sets)
}

fn load_document(
    raw: Mapping,
    source: &Path,
    prototype: Option<&Mapping>,
    resolver: &dyn SetResolver,
    diagnostics: &mut Vec<Diagnostic>,
    sets: &mut Vec<Pokeset>,
) {
    let mut merged = merge_with_prototype(prototype, &raw);
    let subject = record_label(&merged);

    // Sanitize the display name before resolution, so the resolver only
    // ever sees encoding-safe names.
    let ingamename = match merged.get("ingamename") {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    };
    if let Some(name) = ingamename {
        let fixed = sanitize_ingamename(&name);
        if fixed != name {
            diagnostics.push(
                Diagnostic::note(format!(
                    "ingamename contains characters unsafe for the in-game encoding, changed to \"{fixed}\""
                ))
                .with_subject(subject.as_str())
                .with_path(source),
            );
            merged.insert(
                Value::String("ingamename".to_string()),
                Value::String(fixed),
            );
        }
    }

    match resolver.resolve(&merged, source) {
        Ok(Resolution { set, warnings }) => {
            for warning in warnings {
                diagnostics.push(
                    Diagnostic::warning(warning)
                        .with_subject(set.label())
                        .with_path(source),
                );
            }
            log::debug!("loaded {} from {}", set.label(), source.display());
            sets.push(set);
        }
        Err(e) => {
            diagnostics.push(
                Diagnostic::error(e.to_string())
                    .with_subject(subject)
                    .with_path(source),
            );
        }
    }
}

/// Best-effort record label "(species) setname" from a raw document, for
/// tagging diagnostics before the identifier is confirmed.
fn record_label(record: &Mapping) -> String {
    format!(
        "({}) {}",
        record.get("species").map_or_else(|| "?".to_string(), scalar_label),
        record.get("setname").map_or_else(|| "?".to_string(), scalar_label),
    )
}

fn scalar_label(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Mapping(m) => match m.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            _ => "?".to_string(),
        },
        _ => "?".to_string(),
    }
}
