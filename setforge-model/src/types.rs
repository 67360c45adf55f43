//! Record types for the compiled pokeset database.
//!
//! A `Pokeset` is one fully resolved record as it will appear in the output
//! artifact. The typed header fields (species, setname, genders, tags) are
//! the ones the pipeline itself inspects; everything else lives opaquely in
//! `body` and is exported verbatim.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ── Species ─────────────────────────────────────────────────────────────────

/// A species descriptor: numeric id plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Species {
    pub id: u32,
    pub name: String,
}

// ── Gender ──────────────────────────────────────────────────────────────────

/// An explicit gender value. The genderless marker is `None` in
/// `Vec<Option<Gender>>`, matching the `null` wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "m")]
    Male,
    #[serde(rename = "f")]
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "m",
            Self::Female => "f",
        }
    }
}

/// Display label for a gender slot, genderless included.
pub fn gender_label(gender: Option<Gender>) -> &'static str {
    match gender {
        Some(g) => g.as_str(),
        None => "none",
    }
}

// ── Identifier ──────────────────────────────────────────────────────────────

/// The corpus-wide uniqueness key: (species id, set name).
///
/// `Ord` so record lists can be sorted into a reproducible order before the
/// uniqueness pass.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SetId {
    pub species: u32,
    pub setname: String,
}

// ── Pokeset ─────────────────────────────────────────────────────────────────

/// A fully resolved pokeset record.
///
/// Created once by the resolver and immutable afterwards. `body` holds the
/// complete resolved document; because `serde_json::Map` is ordered by key,
/// exporting it yields lexicographically sorted object keys.
#[derive(Debug, Clone)]
pub struct Pokeset {
    pub species: Species,
    pub setname: String,
    /// Display name as shown in-game, already encoding-safe.
    pub ingamename: String,
    /// Gender slots this set may roll; `None` is genderless.
    pub genders: Vec<Option<Gender>>,
    /// Free-form tags as authored.
    pub tags: Vec<String>,
    /// The full resolved document, exported verbatim.
    pub body: serde_json::Map<String, serde_json::Value>,
    /// Source file, relative to the corpus root.
    pub source: PathBuf,
}

impl Pokeset {
    /// The uniqueness key for this record.
    pub fn set_id(&self) -> SetId {
        SetId {
            species: self.species.id,
            setname: self.setname.clone(),
        }
    }

    /// Diagnostic label: "(species) setname".
    pub fn label(&self) -> String {
        format!("({}) {}", self.species.id, self.setname)
    }
}
