//! The resolver seam: raw merged record in, populated record out.
//!
//! Resolution semantics beyond the header fields (stat math, move
//! legality) live behind [`SetResolver`] so they can be swapped without
//! touching the pipeline. Advisory warnings come back in the return value
//! rather than through any ambient channel, so resolvers are safe to call
//! concurrently.

use serde_yml::{Mapping, Value};
use std::path::Path;
use thiserror::Error;

use setforge_model::{Gender, Pokeset, Species};

use crate::sanitize::sanitize_ingamename;

/// In-game names are capped by the target engine's name buffer.
const INGAMENAME_MAX: usize = 10;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),
    #[error("{0}")]
    Invalid(String),
}

/// A successfully populated record plus any advisory warnings raised
/// while producing it.
#[derive(Debug)]
pub struct Resolution {
    pub set: Pokeset,
    pub warnings: Vec<String>,
}

/// Turns one raw merged record into a populated [`Pokeset`].
///
/// `source` is the record's file path relative to the corpus root; it is
/// carried on the populated record for provenance.
pub trait SetResolver {
    fn resolve(&self, raw: &Mapping, source: &Path) -> Result<Resolution, ResolveError>;
}

/// The built-in resolver: validates and normalizes the header fields the
/// pipeline itself depends on, and passes every other attribute through
/// opaquely.
pub struct BasicResolver;

impl SetResolver for BasicResolver {
    fn resolve(&self, raw: &Mapping, source: &Path) -> Result<Resolution, ResolveError> {
        let mut warnings = Vec::new();

        let species = resolve_species(raw, &mut warnings)?;
        let setname = resolve_setname(raw)?;
        let ingamename = resolve_ingamename(raw, &species, &mut warnings)?;
        let genders = resolve_genders(raw)?;
        let tags = resolve_tags(raw)?;

        let mut body = match yaml_to_json(&Value::Mapping(raw.clone()))? {
            serde_json::Value::Object(map) => map,
            _ => unreachable!("a mapping converts to a JSON object"),
        };
        let mut species_body = serde_json::Map::new();
        species_body.insert("id".to_string(), species.id.into());
        species_body.insert("name".to_string(), species.name.clone().into());
        body.insert(
            "species".to_string(),
            serde_json::Value::Object(species_body),
        );
        body.insert("setname".to_string(), setname.clone().into());
        body.insert("ingamename".to_string(), ingamename.clone().into());
        body.insert(
            "gender".to_string(),
            serde_json::to_value(&genders).map_err(|e| ResolveError::Invalid(e.to_string()))?,
        );
        body.insert(
            "tags".to_string(),
            serde_json::to_value(&tags).map_err(|e| ResolveError::Invalid(e.to_string()))?,
        );

        Ok(Resolution {
            set: Pokeset {
                species,
                setname,
                ingamename,
                genders,
                tags,
                body,
                source: source.to_path_buf(),
            },
            warnings,
        })
    }
}

fn resolve_species(raw: &Mapping, warnings: &mut Vec<String>) -> Result<Species, ResolveError> {
    match raw.get("species") {
        None => Err(ResolveError::MissingKey("species")),
        Some(Value::Number(n)) => {
            let id = species_id(n)?;
            warnings.push(format!("species {id} given without a name, using #{id}"));
            Ok(Species {
                id,
                name: format!("#{id}"),
            })
        }
        Some(Value::Mapping(m)) => {
            let id = match m.get("id") {
                Some(Value::Number(n)) => species_id(n)?,
                Some(other) => {
                    return Err(ResolveError::Invalid(format!(
                        "species id must be an integer, found {}",
                        value_kind(other)
                    )));
                }
                None => return Err(ResolveError::MissingKey("species.id")),
            };
            let name = match m.get("name") {
                Some(Value::String(s)) => s.clone(),
                Some(other) => {
                    return Err(ResolveError::Invalid(format!(
                        "species name must be a string, found {}",
                        value_kind(other)
                    )));
                }
                None => return Err(ResolveError::MissingKey("species.name")),
            };
            Ok(Species { id, name })
        }
        Some(other) => Err(ResolveError::Invalid(format!(
            "species must be an id or an id/name mapping, found {}",
            value_kind(other)
        ))),
    }
}

fn species_id(n: &serde_yml::Number) -> Result<u32, ResolveError> {
    n.as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ResolveError::Invalid(format!("species id must be a positive integer, found {n}")))
}

fn resolve_setname(raw: &Mapping) -> Result<String, ResolveError> {
    match raw.get("setname") {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::String(_)) => Err(ResolveError::Invalid("setname must not be empty".to_string())),
        Some(other) => Err(ResolveError::Invalid(format!(
            "setname must be a string, found {}",
            value_kind(other)
        ))),
        None => Err(ResolveError::MissingKey("setname")),
    }
}

fn resolve_ingamename(
    raw: &Mapping,
    species: &Species,
    warnings: &mut Vec<String>,
) -> Result<String, ResolveError> {
    match raw.get("ingamename") {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ResolveError::Invalid(format!(
            "ingamename must be a string, found {}",
            value_kind(other)
        ))),
        None => {
            let default: String = species.name.to_uppercase().chars().take(INGAMENAME_MAX).collect();
            let default = sanitize_ingamename(&default);
            warnings.push(format!("no ingamename given, defaulting to \"{default}\""));
            Ok(default)
        }
    }
}

fn resolve_genders(raw: &Mapping) -> Result<Vec<Option<Gender>>, ResolveError> {
    match raw.get("gender") {
        None => Ok(vec![None]),
        Some(Value::Sequence(seq)) => {
            if seq.is_empty() {
                return Err(ResolveError::Invalid("gender list must not be empty".to_string()));
            }
            seq.iter().map(parse_gender).collect()
        }
        Some(value) => Ok(vec![parse_gender(value)?]),
    }
}

fn parse_gender(value: &Value) -> Result<Option<Gender>, ResolveError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => match s.as_str() {
            "m" => Ok(Some(Gender::Male)),
            "f" => Ok(Some(Gender::Female)),
            other => Err(ResolveError::Invalid(format!(
                "unknown gender value '{other}', expected 'm', 'f' or null"
            ))),
        },
        other => Err(ResolveError::Invalid(format!(
            "gender entries must be 'm', 'f' or null, found {}",
            value_kind(other)
        ))),
    }
}

fn resolve_tags(raw: &Mapping) -> Result<Vec<String>, ResolveError> {
    match raw.get("tags") {
        None => Ok(Vec::new()),
        Some(Value::Sequence(seq)) => seq
            .iter()
            .map(|v| match v {
                Value::String(s) => Ok(s.clone()),
                other => Err(ResolveError::Invalid(format!(
                    "tags must be strings, found {}",
                    value_kind(other)
                ))),
            })
            .collect(),
        Some(other) => Err(ResolveError::Invalid(format!(
            "tags must be a list of strings, found {}",
            value_kind(other)
        ))),
    }
}

/// Convert an arbitrary YAML value into its JSON equivalent.
///
/// Mapping keys must be strings; YAML tags are stripped.
fn yaml_to_json(value: &Value) -> Result<serde_json::Value, ResolveError> {
    match value {
        Value::Null => Ok(serde_json::Value::Null),
        Value::Bool(b) => Ok((*b).into()),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(u.into())
            } else if let Some(i) = n.as_i64() {
                Ok(i.into())
            } else if let Some(f) = n.as_f64() {
                serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .ok_or_else(|| {
                        ResolveError::Invalid(format!("number {f} cannot be stored in the database"))
                    })
            } else {
                Err(ResolveError::Invalid(format!("unsupported number {n}")))
            }
        }
        Value::String(s) => Ok(s.clone().into()),
        Value::Sequence(seq) => {
            let items: Result<Vec<_>, _> = seq.iter().map(yaml_to_json).collect();
            Ok(serde_json::Value::Array(items?))
        }
        Value::Mapping(map) => {
            let mut out = serde_json::Map::new();
            for (key, value) in map {
                let key = key.as_str().ok_or_else(|| {
                    ResolveError::Invalid(format!(
                        "mapping keys must be strings, found {}",
                        value_kind(key)
                    ))
                })?;
                out.insert(key.to_string(), yaml_to_json(value)?);
            }
            Ok(serde_json::Value::Object(out))
        }
        Value::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

/// Human-readable kind of a YAML value, for error messages.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(yaml: &str) -> Mapping {
        match serde_yml::from_str::<Value>(yaml).unwrap() {
            Value::Mapping(m) => m,
            other => panic!("fixture is not a mapping: {other:?}"),
        }
    }

    #[test]
    fn resolves_full_header() {
        let record = raw(
            r#"
species: {id: 25, name: Pikachu}
setname: Defense
ingamename: PIKACHU
gender: [m, f]
tags: [biddable, "trainer:Red"]
item: Light Ball
"#,
        );
        let resolution = BasicResolver
            .resolve(&record, Path::new("sets/kanto.yaml"))
            .unwrap();
        assert!(resolution.warnings.is_empty());
        let set = resolution.set;
        assert_eq!(set.species.id, 25);
        assert_eq!(set.species.name, "Pikachu");
        assert_eq!(set.setname, "Defense");
        assert_eq!(set.ingamename, "PIKACHU");
        assert_eq!(set.genders, vec![Some(Gender::Male), Some(Gender::Female)]);
        assert_eq!(set.tags, vec!["biddable", "trainer:Red"]);
        assert_eq!(set.body["item"], serde_json::json!("Light Ball"));
        assert_eq!(set.source, Path::new("sets/kanto.yaml"));
    }

    #[test]
    fn bare_species_id_warns_and_uses_placeholder_name() {
        let record = raw("species: 132\nsetname: Standard\n");
        let resolution = BasicResolver.resolve(&record, Path::new("a.yaml")).unwrap();
        assert_eq!(resolution.set.species.name, "#132");
        assert!(
            resolution
                .warnings
                .iter()
                .any(|w| w.contains("without a name"))
        );
    }

    #[test]
    fn ingamename_defaults_from_species_name() {
        let record = raw(
            "species: {id: 6, name: Charizard}\nsetname: Standard\n",
        );
        let resolution = BasicResolver.resolve(&record, Path::new("a.yaml")).unwrap();
        assert_eq!(resolution.set.ingamename, "CHARIZARD");
        assert!(resolution.warnings.iter().any(|w| w.contains("no ingamename")));
    }

    #[test]
    fn ingamename_default_is_truncated() {
        let record = raw(
            "species: {id: 199, name: Slowking of the Deep}\nsetname: Standard\n",
        );
        let resolution = BasicResolver.resolve(&record, Path::new("a.yaml")).unwrap();
        assert_eq!(resolution.set.ingamename.chars().count(), 10);
    }

    #[test]
    fn scalar_gender_and_missing_gender() {
        let record = raw("species: {id: 1, name: Bulbasaur}\nsetname: A\ngender: f\n");
        let resolution = BasicResolver.resolve(&record, Path::new("a.yaml")).unwrap();
        assert_eq!(resolution.set.genders, vec![Some(Gender::Female)]);

        let record = raw("species: {id: 1, name: Bulbasaur}\nsetname: B\n");
        let resolution = BasicResolver.resolve(&record, Path::new("a.yaml")).unwrap();
        assert_eq!(resolution.set.genders, vec![None]);
    }

    #[test]
    fn unknown_gender_is_rejected() {
        let record = raw("species: {id: 1, name: Bulbasaur}\nsetname: A\ngender: x\n");
        let err = BasicResolver
            .resolve(&record, Path::new("a.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("unknown gender value 'x'"));
    }

    #[test]
    fn missing_setname_is_rejected() {
        let record = raw("species: {id: 1, name: Bulbasaur}\n");
        let err = BasicResolver
            .resolve(&record, Path::new("a.yaml"))
            .unwrap_err();
        assert!(err.to_string().contains("setname"));
    }

    #[test]
    fn body_carries_normalized_fields() {
        let record = raw("species: 151\nsetname: Mystic\ngender: ~\n");
        let resolution = BasicResolver.resolve(&record, Path::new("a.yaml")).unwrap();
        let body = &resolution.set.body;
        assert_eq!(body["species"]["id"], serde_json::json!(151));
        assert_eq!(body["gender"], serde_json::json!([null]));
        assert_eq!(body["tags"], serde_json::json!([]));
    }
}
