//! Trainer-tag rollups for the matchmaking configuration.
//!
//! A pure reduction over the final record list: records carrying a group's
//! marker tag contribute their derived trainer tag to that group, and only
//! trainer tags with enough occurrences survive. The downstream matchmaker
//! refuses groups too small to rotate, hence the threshold.

use std::collections::BTreeMap;

use setforge_model::Pokeset;

/// Tags of the form `trainer:<name>` carry the matchmaking identity.
pub const TRAINER_TAG_PREFIX: &str = "trainer:";

/// Which groups to build and how many occurrences a trainer tag needs.
#[derive(Debug, Clone)]
pub struct RollupOptions {
    /// Marker tags; each names one output group.
    pub markers: Vec<String>,
    pub min_occurrences: usize,
}

impl Default for RollupOptions {
    fn default() -> Self {
        Self {
            markers: vec!["biddable".to_string()],
            min_occurrences: 4,
        }
    }
}

/// The derived trainer tag of a record: the first `trainer:` tag, stripped.
pub fn trainer_tag(set: &Pokeset) -> Option<&str> {
    set.tags
        .iter()
        .find_map(|tag| tag.strip_prefix(TRAINER_TAG_PREFIX))
        .filter(|name| !name.is_empty())
}

/// Build the rollup groups, keyed by marker tag.
///
/// Every configured group is present in the output even when empty, so the
/// downstream consumer sees a stable shape.
pub fn roll_up(sets: &[Pokeset], options: &RollupOptions) -> BTreeMap<String, Vec<String>> {
    let mut groups = BTreeMap::new();

    for marker in &options.markers {
        let mut occurrences: BTreeMap<&str, usize> = BTreeMap::new();
        for set in sets.iter().filter(|s| s.tags.iter().any(|t| t == marker)) {
            if let Some(name) = trainer_tag(set) {
                *occurrences.entry(name).or_insert(0) += 1;
            }
        }

        let survivors: Vec<String> = occurrences
            .into_iter()
            .filter(|(_, count)| *count >= options.min_occurrences)
            .map(|(name, _)| name.to_string())
            .collect();
        groups.insert(marker.clone(), survivors);
    }

    groups
}
