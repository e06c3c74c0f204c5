//! Competitive sets: a trainer's configured loadout for one caught species.

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

pub const EV_DEFAULT: u16 = 0;
pub const IV_DEFAULT: u16 = 31;
pub const MAX_MOVES: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Hp,
    Atk,
    Def,
    Spa,
    Spd,
    Spe,
}

impl Stat {
    pub const ALL: [Stat; 6] = [Stat::Hp, Stat::Atk, Stat::Def, Stat::Spa, Stat::Spd, Stat::Spe];

    pub fn key(self) -> &'static str {
        match self {
            Stat::Hp => "hp",
            Stat::Atk => "atk",
            Stat::Def => "def",
            Stat::Spa => "spa",
            Stat::Spd => "spd",
            Stat::Spe => "spe",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Atk => "Atk",
            Stat::Def => "Def",
            Stat::Spa => "SpA",
            Stat::Spd => "SpD",
            Stat::Spe => "Spe",
        }
    }

    pub fn from_key(key: &str) -> Option<Stat> {
        Stat::ALL.into_iter().find(|stat| stat.key() == key)
    }
}

/// One value per stat; always all six.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatTable {
    pub hp: u16,
    pub atk: u16,
    pub def: u16,
    pub spa: u16,
    pub spd: u16,
    pub spe: u16,
}

impl StatTable {
    pub fn uniform(value: u16) -> Self {
        Self {
            hp: value,
            atk: value,
            def: value,
            spa: value,
            spd: value,
            spe: value,
        }
    }

    /// Unknown keys are ignored; missing stats take `default`.
    pub fn from_map(map: &HashMap<String, u16>, default: u16) -> Self {
        let mut table = Self::uniform(default);
        for (key, value) in map {
            if let Some(stat) = Stat::from_key(&key.to_ascii_lowercase()) {
                table.set(stat, *value);
            }
        }
        table
    }

    pub fn get(&self, stat: Stat) -> u16 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spa => self.spa,
            Stat::Spd => self.spd,
            Stat::Spe => self.spe,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u16) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Atk => self.atk = value,
            Stat::Def => self.def = value,
            Stat::Spa => self.spa = value,
            Stat::Spd => self.spd = value,
            Stat::Spe => self.spe = value,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, u16)> + '_ {
        Stat::ALL.into_iter().map(move |stat| (stat, self.get(stat)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, value)| u32::from(value)).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompetitiveSet {
    #[serde(default)]
    pub ability: String,
    #[serde(rename = "item", default)]
    pub held_item: String,
    #[serde(default)]
    pub nature: String,
    #[serde(default, deserialize_with = "de_moves")]
    pub moves: Vec<String>,
    #[serde(rename = "evs", default = "default_evs", deserialize_with = "de_evs")]
    #[schemars(with = "StatTable")]
    pub effort_values: StatTable,
    #[serde(rename = "ivs", default, deserialize_with = "de_ivs")]
    #[schemars(with = "Option<StatTable>")]
    pub individual_values: Option<StatTable>,
}

impl CompetitiveSet {
    pub fn ev_summary(&self) -> Option<String> {
        format_spread(&self.effort_values, EV_DEFAULT)
    }

    pub fn iv_summary(&self) -> Option<String> {
        self.individual_values
            .as_ref()
            .and_then(|ivs| format_spread(ivs, IV_DEFAULT))
    }

    pub fn has_item(&self) -> bool {
        !self.held_item.trim().is_empty()
    }
}

/// `"252 Atk / 4 SpD"`, listing only stats that differ from `default`.
/// `None` when every stat is at its default.
pub fn format_spread(table: &StatTable, default: u16) -> Option<String> {
    let parts: Vec<String> = table
        .iter()
        .filter(|(_, value)| *value != default)
        .map(|(stat, value)| format!("{value} {}", stat.label()))
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" / "))
    }
}

fn default_evs() -> StatTable {
    StatTable::uniform(EV_DEFAULT)
}

fn de_moves<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let mut moves = Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default();
    moves.truncate(MAX_MOVES);
    Ok(moves)
}

fn de_evs<'de, D>(deserializer: D) -> Result<StatTable, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<HashMap<String, u16>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(StatTable::from_map(&map, EV_DEFAULT))
}

fn de_ivs<'de, D>(deserializer: D) -> Result<Option<StatTable>, D::Error>
where
    D: Deserializer<'de>,
{
    let map = Option::<HashMap<String, u16>>::deserialize(deserializer)?;
    Ok(map.map(|map| StatTable::from_map(&map, IV_DEFAULT)))
}

/// One move of a set, typed against the species database.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MoveLine {
    pub name: String,
    pub move_type: Option<String>,
    /// `None` when the species has no learnset on record.
    pub learnable: Option<bool>,
}
