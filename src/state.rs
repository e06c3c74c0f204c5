//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::dex::{filter_and_sort, DexCounts, FilterCriteria, PokedexEntry};
use crate::session::Session;

/// Badge slots on the trainer card.
pub const MAX_BADGES: u32 = 8;

/// Trainer profile as served by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub discord_id: String,
    pub name: String,
    #[serde(default)]
    pub badges: u32,
    #[serde(default)]
    pub money: i64,
    #[serde(default)]
    pub encounters: u32,
    #[serde(default)]
    pub new_encounters: u32,
    /// Trainer sprite URL; may be empty.
    #[serde(default)]
    pub sprite: String,
    /// Days.
    #[serde(default)]
    pub delay: i64,
}

impl Profile {
    /// `true` for every earned badge, capped at [`MAX_BADGES`].
    pub fn badge_slots(&self) -> Vec<bool> {
        (1..=MAX_BADGES).map(|slot| slot <= self.badges).collect()
    }

    /// Money with `.` as the thousands separator, e.g. `1.234.567 ₱`.
    pub fn money_display(&self) -> String {
        let digits = self.money.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }
        let sign = if self.money < 0 { "-" } else { "" };
        format!("{sign}{grouped} \u{20b1}")
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum View {
    #[default]
    Profile,
    Pokedex,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Profile => View::Pokedex,
            View::Pokedex => View::Profile,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            View::Profile => "Trainer",
            View::Pokedex => "Pokédex",
        }
    }
}

/// Login modal: takes a trainer id or a login link.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoginForm {
    pub active: bool,
    pub input: String,
    pub error: Option<String>,
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "Session", label = "Trainer", debug_fmt)]
    pub session: Session,

    #[debug(section = "Session", label = "View", debug_fmt)]
    pub view: View,

    /// Profile lifecycle: Empty → Loading → Loaded/Failed
    #[debug(section = "Session", label = "Profile", debug_fmt)]
    pub profile: DataResource<Profile>,

    /// The immutable snapshot produced by ingestion, sorted by national id.
    #[debug(skip)]
    pub dex: DataResource<Vec<PokedexEntry>>,

    /// Generation the current snapshot was requested for.
    #[debug(section = "Dex", label = "Generation", debug_fmt)]
    pub dex_generation: Option<u64>,

    /// Species names the last ingestion could not resolve.
    #[debug(section = "Dex", label = "Skipped", debug_fmt)]
    pub skipped: Vec<String>,

    /// `filter_and_sort(dex, criteria)`, kept in sync by the reducer.
    #[debug(skip)]
    pub visible: Vec<PokedexEntry>,

    #[debug(section = "Dex", label = "Selected")]
    pub selected_index: usize,

    #[debug(section = "Filters", label = "Criteria", debug_fmt)]
    pub criteria: FilterCriteria,

    #[debug(section = "Filters", label = "Search active")]
    pub search_active: bool,

    #[debug(section = "Dex", label = "Set panel")]
    pub show_set: bool,

    #[debug(skip)]
    pub login: LoginForm,

    /// The one status string shown in the footer.
    #[debug(section = "Status", label = "Message", debug_fmt)]
    pub message: Option<String>,

    #[debug(skip)]
    pub terminal_size: (u16, u16),
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            session: Session::default(),
            view: View::default(),
            profile: DataResource::Empty,
            dex: DataResource::Empty,
            dex_generation: None,
            skipped: Vec::new(),
            visible: Vec::new(),
            selected_index: 0,
            criteria: FilterCriteria::default(),
            search_active: false,
            show_set: true,
            login: LoginForm::default(),
            message: None,
            terminal_size: (80, 24),
        }
    }
}

impl AppState {
    /// State for a trainer restored from local storage (or none).
    pub fn new(trainer_id: Option<String>) -> Self {
        let mut state = Self::default();
        if let Some(id) = trainer_id {
            state.session.login(id);
        }
        state
    }

    pub fn entries(&self) -> &[PokedexEntry] {
        self.dex.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn counts(&self) -> DexCounts {
        DexCounts::of(self.entries())
    }

    pub fn selected_entry(&self) -> Option<&PokedexEntry> {
        self.visible.get(self.selected_index)
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.visible.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.visible.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn rebuild_visible(&mut self) {
        self.visible = filter_and_sort(self.entries(), &self.criteria);
        if self.selected_index >= self.visible.len() {
            self.selected_index = 0;
        }
    }

    /// Drop everything derived from the trainer's data.
    pub fn clear_trainer_data(&mut self) {
        self.profile = DataResource::Empty;
        self.dex = DataResource::Empty;
        self.dex_generation = None;
        self.skipped.clear();
        self.visible.clear();
        self.selected_index = 0;
    }

    /// Whether the Pokédex still has to be fetched for the current identity.
    pub fn needs_dex_fetch(&self) -> bool {
        self.session.is_logged_in() && self.dex_generation != Some(self.session.generation)
    }

    pub fn is_loading(&self) -> bool {
        self.profile.is_loading() || self.dex.is_loading()
    }
}
