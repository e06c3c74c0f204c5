//! Species database: national ids, elemental types, learnsets and move typing.
//!
//! The database is immutable reference data. Building a [`SpeciesDb`] is the
//! one-time initialization; every lookup is a method on the built value, so no
//! lookup can run before loading has finished.

use std::collections::HashMap;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

const BUNDLED_DEX: &str = include_str!("../data/dex.json");

/// Last national id the game knows about (end of generation 7).
pub const MAX_NATIONAL_ID: u16 = 809;
/// Newest generation whose learnset sources count.
const MAX_GENERATION: u8 = 7;

#[derive(thiserror::Error, Debug)]
pub enum DexError {
    #[error("failed to read species database {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("species database parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("species {0} declares no elemental type")]
    MissingType(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesInfo {
    pub id: String,
    pub national_id: u16,
    pub canonical_name: String,
    pub primary_type: String,
    pub secondary_type: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoveInfo {
    pub name: String,
    pub move_type: String,
}

#[derive(Debug, Deserialize)]
struct DexFile {
    species: HashMap<String, SpeciesRecord>,
    #[serde(default)]
    learnsets: HashMap<String, Vec<String>>,
    #[serde(default)]
    moves: HashMap<String, MoveRecord>,
}

#[derive(Debug, Deserialize)]
struct SpeciesRecord {
    num: u16,
    name: String,
    types: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MoveRecord {
    name: String,
    #[serde(rename = "type")]
    move_type: String,
}

/// `pokedex.json` entry of a Showdown data directory. Extra fields are ignored.
#[derive(Debug, Deserialize)]
struct ShowdownSpecies {
    num: i32,
    name: String,
    #[serde(default)]
    types: Vec<String>,
}

/// `learnsets.json` entry: move id to source codes such as `"7L1"`.
#[derive(Debug, Deserialize)]
struct ShowdownLearnset {
    #[serde(default)]
    learnset: HashMap<String, Vec<String>>,
}

#[derive(Clone, Debug, Default)]
pub struct SpeciesDb {
    species: HashMap<String, SpeciesInfo>,
    learnsets: HashMap<String, Vec<String>>,
    moves: HashMap<String, MoveInfo>,
}

impl SpeciesDb {
    /// The table shipped with the crate: national dex 1 to 809 plus the
    /// regional and battle forms the game hands out.
    pub fn bundled() -> Result<Self, DexError> {
        Self::from_json(BUNDLED_DEX)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, DexError> {
        Self::from_json(&read(path.as_ref())?)
    }

    pub fn from_json(json: &str) -> Result<Self, DexError> {
        Self::from_file(serde_json::from_str(json)?)
    }

    /// Build from a Showdown data directory (`pokedex.json`, `learnsets.json`,
    /// `moves.json`). Only `pokedex.json` is required. Species past
    /// [`MAX_NATIONAL_ID`] and non-canon entries (num <= 0) are dropped, and
    /// learnsets keep moves with at least one source up to generation 7.
    pub fn load_showdown(dir: impl AsRef<Path>) -> Result<Self, DexError> {
        let dir = dir.as_ref();
        let pokedex: HashMap<String, ShowdownSpecies> =
            serde_json::from_str(&read(&dir.join("pokedex.json"))?)?;
        let learnsets: HashMap<String, ShowdownLearnset> =
            match read_optional(&dir.join("learnsets.json"))? {
                Some(json) => serde_json::from_str(&json)?,
                None => HashMap::new(),
            };
        let moves: HashMap<String, MoveRecord> = match read_optional(&dir.join("moves.json"))? {
            Some(json) => serde_json::from_str(&json)?,
            None => HashMap::new(),
        };

        let species = pokedex
            .into_iter()
            .filter_map(|(key, entry)| {
                let num = u16::try_from(entry.num)
                    .ok()
                    .filter(|num| (1..=MAX_NATIONAL_ID).contains(num))?;
                Some((
                    key,
                    SpeciesRecord {
                        num,
                        name: entry.name,
                        types: entry.types,
                    },
                ))
            })
            .collect();

        let learnsets = learnsets
            .into_iter()
            .map(|(key, entry)| {
                let mut moves: Vec<String> = entry
                    .learnset
                    .into_iter()
                    .filter(|(_, sources)| sources.iter().any(|source| learnable_by_gen(source)))
                    .map(|(id, _)| id)
                    .collect();
                moves.sort_unstable();
                (key, moves)
            })
            .filter(|(_, moves)| !moves.is_empty())
            .collect();

        let db = Self::from_file(DexFile {
            species,
            learnsets,
            moves,
        })?;
        tracing::debug!(
            dir = %dir.display(),
            species = db.species.len(),
            learnsets = db.learnsets.len(),
            moves = db.moves.len(),
            "loaded showdown data"
        );
        Ok(db)
    }

    fn from_file(file: DexFile) -> Result<Self, DexError> {
        let mut species = HashMap::with_capacity(file.species.len());
        for (key, record) in file.species {
            let id = to_id(&key);
            let mut types = record.types.into_iter();
            let primary_type = types.next().ok_or_else(|| DexError::MissingType(id.clone()))?;
            let secondary_type = types.next().filter(|t| !t.is_empty());
            species.insert(
                id.clone(),
                SpeciesInfo {
                    id,
                    national_id: record.num,
                    canonical_name: record.name,
                    primary_type,
                    secondary_type,
                },
            );
        }

        let learnsets = file
            .learnsets
            .into_iter()
            .map(|(key, moves)| (to_id(&key), moves.iter().map(|m| to_id(m)).collect()))
            .collect();

        let moves = file
            .moves
            .into_iter()
            .map(|(key, record)| {
                (
                    to_id(&key),
                    MoveInfo {
                        name: record.name,
                        move_type: record.move_type,
                    },
                )
            })
            .collect();

        Ok(Self {
            species,
            learnsets,
            moves,
        })
    }

    pub fn get(&self, name: &str) -> Option<&SpeciesInfo> {
        self.species.get(&to_id(name))
    }

    pub fn learnset(&self, species_id: &str) -> Option<&[String]> {
        self.learnsets.get(&to_id(species_id)).map(Vec::as_slice)
    }

    pub fn move_info(&self, name: &str) -> Option<&MoveInfo> {
        self.moves.get(&to_id(name))
    }

    pub fn len(&self) -> usize {
        self.species.len()
    }

    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }
}

fn read(path: &Path) -> Result<String, DexError> {
    std::fs::read_to_string(path).map_err(|source| DexError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn read_optional(path: &Path) -> Result<Option<String>, DexError> {
    match std::fs::read_to_string(path) {
        Ok(json) => Ok(Some(json)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DexError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Source codes start with the generation digit, e.g. `"7L1"` or `"8M"`.
fn learnable_by_gen(source: &str) -> bool {
    source
        .chars()
        .next()
        .and_then(|ch| ch.to_digit(10))
        .is_some_and(|generation| (1..=u32::from(MAX_GENERATION)).contains(&generation))
}

/// Lookup key for species and moves: lowercase ASCII letters and digits only.
pub fn to_id(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .filter_map(|ch| match ch {
            'a'..='z' | '0'..='9' => Some(ch),
            'é' | 'è' | 'ê' => Some('e'),
            '♀' => Some('f'),
            '♂' => Some('m'),
            _ => None,
        })
        .collect()
}
