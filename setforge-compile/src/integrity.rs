//! Whole-corpus integrity checks.
//!
//! These run only after every file has been loaded, because both checks
//! need cross-record knowledge no single file has: the gender values a
//! species uses anywhere, and every identifier already taken.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use setforge_model::{Diagnostic, Gender, Pokeset, SetId, gender_label};

/// Result of the integrity pass.
#[derive(Debug)]
pub struct IntegrityResult {
    pub diagnostics: Vec<Diagnostic>,
    /// The deduplicated record list to export, in (identifier, source) order.
    pub sets: Vec<Pokeset>,
}

/// Cross-check the full record list and exclude duplicate identifiers.
///
/// Records are first sorted by (identifier, source path) so the survivor
/// of a duplicate pair does not depend on filesystem enumeration order.
pub fn check_integrity(mut sets: Vec<Pokeset>) -> IntegrityResult {
    sets.sort_by_key(|s| (s.set_id(), s.source.clone()));

    let mut diagnostics = check_gender_consistency(&sets);

    // Uniqueness: first seen wins, repeats are excluded from the export.
    let total = sets.len();
    let mut seen: HashMap<SetId, PathBuf> = HashMap::new();
    let mut kept = Vec::with_capacity(sets.len());
    for set in sets {
        let id = set.set_id();
        match seen.get(&id) {
            Some(first_source) => {
                diagnostics.push(
                    Diagnostic::error(format!(
                        "combination of species {} ({}) and setname {} already exists (kept the one from {}), but must be unique",
                        set.species.id,
                        set.species.name,
                        set.setname,
                        first_source.display(),
                    ))
                    .with_subject(set.label())
                    .with_path(set.source.clone()),
                );
            }
            None => {
                seen.insert(id, set.source.clone());
                kept.push(set);
            }
        }
    }

    log::debug!("integrity pass kept {} of {} loaded sets", kept.len(), total);

    IntegrityResult {
        diagnostics,
        sets: kept,
    }
}

/// One ERROR per species that mixes genderless and gendered sets.
///
/// Reporting-only: the conflicting records all stay in the corpus, the
/// authors have to pick one convention per species.
fn check_gender_consistency(sets: &[Pokeset]) -> Vec<Diagnostic> {
    let mut genders_per_species: BTreeMap<u32, BTreeSet<Option<Gender>>> = BTreeMap::new();
    for set in sets {
        genders_per_species
            .entry(set.species.id)
            .or_default()
            .extend(set.genders.iter().copied());
    }

    let mut diagnostics = Vec::new();
    for (species_id, genders) in &genders_per_species {
        if !(genders.contains(&None) && genders.len() > 1) {
            continue;
        }
        let members: Vec<&Pokeset> = sets.iter().filter(|s| s.species.id == *species_id).collect();
        let species_name = &members[0].species.name;
        let listing = members
            .iter()
            .map(|s| {
                let genders: Vec<&str> = s.genders.iter().map(|g| gender_label(*g)).collect();
                format!("{} [{}]", s.setname, genders.join(", "))
            })
            .collect::<Vec<_>>()
            .join("; ");
        diagnostics.push(Diagnostic::error(format!(
            "species {species_id} ({species_name}) has both genderless and gendered sets, \
             but must stick to one or the other: {listing}"
        )));
    }

    diagnostics
}
