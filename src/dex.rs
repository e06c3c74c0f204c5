//! Pokédex engine: reconcile the backend status feed with the species
//! database, then filter and order the resulting entries.
//!
//! Everything here is a pure transform over an immutable snapshot. The
//! snapshot is rebuilt wholesale by [`ingest`] when the trainer changes and
//! [`filter_and_sort`] runs again whenever a filter input changes.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::set::{CompetitiveSet, MoveLine};
use crate::species::{to_id, SpeciesDb, SpeciesInfo};
use crate::sprite::SpriteHosts;

pub const ELEMENTAL_TYPES: [&str; 18] = [
    "Normal", "Fire", "Water", "Grass", "Electric", "Ice", "Fighting", "Poison", "Ground",
    "Flying", "Psychic", "Bug", "Rock", "Ghost", "Dragon", "Steel", "Fairy", "Dark",
];

const HIDDEN_NAME: &str = "?????";

/// One species' status for the logged-in trainer, as the backend reports it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusRecord {
    #[serde(rename = "name")]
    pub species_name: String,
    #[serde(default)]
    pub caught: bool,
    #[serde(default)]
    pub shiny: bool,
    #[serde(rename = "set", default)]
    pub competitive_set: Option<CompetitiveSet>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokedexEntry {
    pub national_id: u16,
    pub display_name: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
    pub sprite_url: String,
    pub caught: bool,
    pub shiny: bool,
    pub competitive_set: Option<CompetitiveSet>,
    /// Moves of `competitive_set` typed against the species database.
    pub set_moves: Vec<MoveLine>,
    /// Sprite of the set's held item, if it has one.
    pub item_sprite_url: Option<String>,
}

impl PokedexEntry {
    pub fn has_type(&self, wanted: &str) -> bool {
        self.primary_type.eq_ignore_ascii_case(wanted)
            || self
                .secondary_type
                .as_deref()
                .is_some_and(|t| t.eq_ignore_ascii_case(wanted))
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_type.as_str()).chain(self.secondary_type.as_deref())
    }

    /// What the presentation layer may show. Uncaught entries keep their
    /// number but conceal name, types and sprite.
    pub fn masked(&self) -> EntryView {
        if self.caught {
            EntryView {
                number: self.national_id,
                name: self.display_name.clone(),
                types: self.types().map(str::to_string).collect(),
                sprite_url: Some(self.sprite_url.clone()),
                shiny: self.shiny,
                caught: true,
            }
        } else {
            EntryView {
                number: self.national_id,
                name: HIDDEN_NAME.to_string(),
                types: Vec::new(),
                sprite_url: None,
                shiny: false,
                caught: false,
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryView {
    pub number: u16,
    pub name: String,
    pub types: Vec<String>,
    pub sprite_url: Option<String>,
    pub shiny: bool,
    pub caught: bool,
}

/// Result of one ingestion pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IngestOutcome {
    /// Sorted ascending by national id.
    pub entries: Vec<PokedexEntry>,
    /// Species names with no species-database match.
    pub skipped: Vec<String>,
    /// Records folded into an earlier record of the same species.
    pub duplicates: usize,
}

pub fn resolve<'db>(record: &StatusRecord, db: &'db SpeciesDb) -> Option<&'db SpeciesInfo> {
    let species = db.get(&record.species_name.to_lowercase());
    if species.is_none() {
        tracing::warn!(
            species = %record.species_name,
            "no species data for status record, skipping"
        );
    }
    species
}

pub fn materialize(
    record: &StatusRecord,
    species: &SpeciesInfo,
    db: &SpeciesDb,
    hosts: &SpriteHosts,
) -> PokedexEntry {
    let set_moves = record
        .competitive_set
        .as_ref()
        .map(|set| set_moves(set, species, db))
        .unwrap_or_default();

    PokedexEntry {
        national_id: species.national_id,
        display_name: species.canonical_name.clone(),
        primary_type: species.primary_type.clone(),
        secondary_type: species.secondary_type.clone(),
        sprite_url: hosts.sprite_url(&record.species_name, record.shiny),
        caught: record.caught,
        shiny: record.shiny,
        competitive_set: record.competitive_set.clone(),
        set_moves,
        item_sprite_url: record
            .competitive_set
            .as_ref()
            .and_then(|set| hosts.item_url(&set.held_item)),
    }
}

pub fn set_moves(set: &CompetitiveSet, species: &SpeciesInfo, db: &SpeciesDb) -> Vec<MoveLine> {
    let learnset = db.learnset(&species.id);
    set.moves
        .iter()
        .map(|name| {
            let info = db.move_info(name);
            MoveLine {
                name: info.map_or_else(|| name.clone(), |info| info.name.clone()),
                move_type: info.map(|info| info.move_type.clone()),
                learnable: learnset.map(|moves| {
                    let id = to_id(name);
                    moves.iter().any(|known| *known == id)
                }),
            }
        })
        .collect()
}

/// Build the snapshot for one status feed. Unresolvable records are skipped;
/// a species reported twice keeps the later record.
pub fn ingest(records: &[StatusRecord], db: &SpeciesDb, hosts: &SpriteHosts) -> IngestOutcome {
    let mut entries: Vec<PokedexEntry> = Vec::with_capacity(records.len());
    let mut by_species: HashMap<&str, usize> = HashMap::new();
    let mut skipped = Vec::new();
    let mut duplicates = 0;

    for record in records {
        let Some(species) = resolve(record, db) else {
            skipped.push(record.species_name.clone());
            continue;
        };
        let entry = materialize(record, species, db, hosts);
        match by_species.get(species.id.as_str()) {
            Some(&index) => {
                tracing::warn!(
                    species = %species.canonical_name,
                    "duplicate status record, keeping the later one"
                );
                duplicates += 1;
                entries[index] = entry;
            }
            None => {
                by_species.insert(species.id.as_str(), entries.len());
                entries.push(entry);
            }
        }
    }

    entries.sort_by_key(|entry| entry.national_id);
    tracing::debug!(
        entries = entries.len(),
        skipped = skipped.len(),
        duplicates,
        "status feed ingested"
    );
    IngestOutcome {
        entries,
        skipped,
        duplicates,
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum TypeFilter {
    #[default]
    All,
    Only(String),
}

impl TypeFilter {
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            TypeFilter::All
        } else {
            TypeFilter::Only(value.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TypeFilter::All => "All",
            TypeFilter::Only(name) => name,
        }
    }

    /// Step through `All` followed by [`ELEMENTAL_TYPES`], wrapping around.
    pub fn cycle(&self, step: i32) -> Self {
        let len = ELEMENTAL_TYPES.len() as i32 + 1;
        let current = match self {
            TypeFilter::All => 0,
            TypeFilter::Only(name) => ELEMENTAL_TYPES
                .iter()
                .position(|t| t.eq_ignore_ascii_case(name))
                .map_or(0, |idx| idx as i32 + 1),
        };
        let next = (current + step).rem_euclid(len);
        if next == 0 {
            TypeFilter::All
        } else {
            TypeFilter::Only(ELEMENTAL_TYPES[(next - 1) as usize].to_string())
        }
    }
}

/// Filter inputs, AND-combined. The default matches everything.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FilterCriteria {
    /// Case-insensitive name prefix; empty means no search.
    pub search_prefix: String,
    pub caught_only: bool,
    pub shiny_only: bool,
    pub type_filter: TypeFilter,
}

impl FilterCriteria {
    pub fn matches(&self, entry: &PokedexEntry) -> bool {
        // Unknown species never show up in a name search.
        if !self.search_prefix.is_empty()
            && !(entry.caught
                && entry
                    .display_name
                    .to_lowercase()
                    .starts_with(&self.search_prefix.to_lowercase()))
        {
            return false;
        }
        if self.caught_only && !entry.caught {
            return false;
        }
        if self.shiny_only && !entry.shiny {
            return false;
        }
        match &self.type_filter {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => entry.has_type(wanted),
        }
    }

    pub fn is_default(&self) -> bool {
        *self == FilterCriteria::default()
    }
}

/// Entries matching `criteria`, ascending by national id. Ties keep their
/// input order.
pub fn filter_and_sort(entries: &[PokedexEntry], criteria: &FilterCriteria) -> Vec<PokedexEntry> {
    let mut visible: Vec<PokedexEntry> = entries
        .iter()
        .filter(|entry| criteria.matches(entry))
        .cloned()
        .collect();
    visible.sort_by_key(|entry| entry.national_id);
    visible
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DexCounts {
    pub total: usize,
    pub caught: usize,
    pub shiny: usize,
}

impl DexCounts {
    pub fn of(entries: &[PokedexEntry]) -> Self {
        Self {
            total: entries.len(),
            caught: entries.iter().filter(|entry| entry.caught).count(),
            shiny: entries.iter().filter(|entry| entry.shiny).count(),
        }
    }
}
