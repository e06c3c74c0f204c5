//! Actions: intents from the keyboard and results from async fetches.
//!
//! Every `*Did*` result carries the session generation that requested it so
//! the reducer can drop responses that belong to a superseded identity.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::dex::IngestOutcome;
use crate::state::{Profile, View};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    // ===== Login category =====
    LoginStart,
    LoginInput(char),
    LoginBackspace,
    LoginCancel,
    LoginSubmit,
    Logout,

    // ===== Identity category =====
    /// The stored trainer id was written or removed.
    IdentityDidSync,
    IdentityDidError(String),

    // ===== Profile category =====
    ProfileDidLoad { generation: u64, profile: Profile },
    ProfileDidError { generation: u64, error: ApiError },

    // ===== Pokedex category =====
    PokedexDidLoad { generation: u64, outcome: IngestOutcome },
    PokedexDidError { generation: u64, error: ApiError },

    // ===== View category =====
    ViewNext,
    ViewSet(View),

    // ===== Search category =====
    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,

    // ===== Filter category =====
    ToggleCaughtOnly,
    ToggleShinyOnly,
    TypeFilterNext,
    TypeFilterPrev,
    TypeFilterClear,
    /// Back to the default criteria.
    FilterReset,

    // ===== Selection category =====
    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    DexSelect(usize),
    SetPanelToggle,

    /// Refetch everything for the current trainer.
    Refresh,

    UiTerminalResize(u16, u16),
    Quit,
}
