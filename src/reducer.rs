//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api::ApiError;
use crate::effect::Effect;
use crate::session::parse_login;
use crate::state::{AppState, View};

const LOGIN_PROMPT: &str = "Log in with your trainer id or the login link from the bot.";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let Some(trainer_id) = state.session.trainer_id().map(str::to_string) else {
                state.login.active = true;
                state.message = Some(LOGIN_PROMPT.to_string());
                return DispatchResult::changed();
            };
            state.profile = DataResource::Loading;
            state.message = None;
            let mut effects = vec![Effect::LoadProfile {
                trainer_id,
                generation: state.session.generation,
            }];
            effects.extend(dex_fetch(state));
            DispatchResult::changed_with_many(effects)
        }

        // ===== Login =====
        Action::LoginStart => {
            if state.login.active {
                return DispatchResult::unchanged();
            }
            state.login.active = true;
            state.login.input.clear();
            state.login.error = None;
            state.search_active = false;
            DispatchResult::changed()
        }

        Action::LoginInput(ch) => {
            if !state.login.active {
                return DispatchResult::unchanged();
            }
            state.login.input.push(ch);
            state.login.error = None;
            DispatchResult::changed()
        }

        Action::LoginBackspace => {
            if !state.login.active || state.login.input.pop().is_none() {
                return DispatchResult::unchanged();
            }
            DispatchResult::changed()
        }

        Action::LoginCancel => {
            if !state.login.active {
                return DispatchResult::unchanged();
            }
            state.login.active = false;
            state.login.input.clear();
            state.login.error = None;
            DispatchResult::changed()
        }

        Action::LoginSubmit => {
            if !state.login.active {
                return DispatchResult::unchanged();
            }
            let Some(trainer_id) = parse_login(&state.login.input) else {
                state.login.error = Some("Enter a trainer id or a login?id= link.".to_string());
                return DispatchResult::changed();
            };
            tracing::info!(trainer = %trainer_id, "login");
            state.clear_trainer_data();
            let generation = state.session.login(trainer_id.clone());
            state.login = Default::default();
            state.profile = DataResource::Loading;
            state.message = None;

            let mut effects = vec![
                Effect::PersistIdentity {
                    trainer_id: trainer_id.clone(),
                },
                Effect::LoadProfile {
                    trainer_id,
                    generation,
                },
            ];
            effects.extend(dex_fetch(state));
            DispatchResult::changed_with_many(effects)
        }

        Action::Logout => {
            if !state.session.is_logged_in() {
                return DispatchResult::unchanged();
            }
            tracing::info!("logout");
            state.session.logout();
            state.clear_trainer_data();
            state.view = View::Profile;
            state.message = Some(LOGIN_PROMPT.to_string());
            DispatchResult::changed_with(Effect::ClearIdentity)
        }

        Action::IdentityDidSync => DispatchResult::unchanged(),

        Action::IdentityDidError(error) => {
            state.message = Some(format!("Could not update the stored trainer id: {error}"));
            DispatchResult::changed()
        }

        // ===== Profile =====
        Action::ProfileDidLoad {
            generation,
            profile,
        } => {
            if !accept(state, generation, "profile") {
                return DispatchResult::unchanged();
            }
            state.profile = DataResource::Loaded(profile);
            state.message = None;
            DispatchResult::changed()
        }

        Action::ProfileDidError { generation, error } => {
            if !accept(state, generation, "profile") {
                return DispatchResult::unchanged();
            }
            if error.is_unknown_trainer() {
                return forget_trainer(state, &error);
            }
            tracing::warn!(%error, "profile fetch failed");
            state.profile = DataResource::Failed(error.user_message());
            state.message = Some(error.user_message());
            DispatchResult::changed()
        }

        // ===== Pokedex =====
        Action::PokedexDidLoad {
            generation,
            outcome,
        } => {
            if !accept(state, generation, "pokedex") {
                return DispatchResult::unchanged();
            }
            state.dex = DataResource::Loaded(outcome.entries);
            state.skipped = outcome.skipped;
            state.rebuild_visible();
            if !state.skipped.is_empty() {
                tracing::info!(skipped = state.skipped.len(), "pokedex loaded with unknown species");
            }
            DispatchResult::changed()
        }

        Action::PokedexDidError { generation, error } => {
            if !accept(state, generation, "pokedex") {
                return DispatchResult::unchanged();
            }
            if error.is_unknown_trainer() {
                return forget_trainer(state, &error);
            }
            tracing::warn!(%error, "pokedex fetch failed");
            state.dex = DataResource::Failed(error.user_message());
            state.skipped.clear();
            state.visible.clear();
            state.selected_index = 0;
            state.message = Some(error.user_message());
            DispatchResult::changed()
        }

        // ===== Views =====
        Action::ViewNext => {
            let next = state.view.next();
            set_view(state, next)
        }
        Action::ViewSet(view) => set_view(state, view),

        // ===== Search =====
        Action::SearchStart => {
            if state.view != View::Pokedex || state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search_active && state.criteria.search_prefix.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            state.criteria.search_prefix.clear();
            refilter(state)
        }

        Action::SearchSubmit => {
            if !state.search_active {
                return DispatchResult::unchanged();
            }
            state.search_active = false;
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.criteria.search_prefix.push(ch);
            refilter(state)
        }

        Action::SearchBackspace => {
            if state.criteria.search_prefix.pop().is_none() {
                return DispatchResult::unchanged();
            }
            refilter(state)
        }

        // ===== Filters =====
        Action::ToggleCaughtOnly => {
            state.criteria.caught_only = !state.criteria.caught_only;
            refilter(state)
        }

        Action::ToggleShinyOnly => {
            state.criteria.shiny_only = !state.criteria.shiny_only;
            refilter(state)
        }

        Action::TypeFilterNext => {
            state.criteria.type_filter = state.criteria.type_filter.cycle(1);
            refilter(state)
        }

        Action::TypeFilterPrev => {
            state.criteria.type_filter = state.criteria.type_filter.cycle(-1);
            refilter(state)
        }

        Action::TypeFilterClear => {
            if state.criteria.type_filter == Default::default() {
                return DispatchResult::unchanged();
            }
            state.criteria.type_filter = Default::default();
            refilter(state)
        }

        Action::FilterReset => {
            if state.criteria.is_default() && !state.search_active {
                return DispatchResult::unchanged();
            }
            state.criteria = Default::default();
            state.search_active = false;
            refilter(state)
        }

        // ===== Selection =====
        Action::SelectionMove(delta) => {
            let index = clamp_index(state.selected_index, delta);
            changed_if(state.set_selected_index(index))
        }

        Action::SelectionPage(delta) => {
            let page = list_page_size(state) as i16;
            let index = clamp_index(state.selected_index, delta.saturating_mul(page));
            changed_if(state.set_selected_index(index))
        }

        Action::SelectionJumpTop => changed_if(state.set_selected_index(0)),

        Action::SelectionJumpBottom => {
            let last = state.visible.len().saturating_sub(1);
            changed_if(state.set_selected_index(last))
        }

        Action::DexSelect(index) => changed_if(state.set_selected_index(index)),

        Action::SetPanelToggle => {
            state.show_set = !state.show_set;
            DispatchResult::changed()
        }

        Action::Refresh => {
            let Some(generation) = state.session.renew() else {
                return DispatchResult::unchanged();
            };
            let Some(trainer_id) = state.session.trainer_id().map(str::to_string) else {
                return DispatchResult::unchanged();
            };
            state.profile = DataResource::Loading;
            state.message = None;
            let mut effects = vec![Effect::LoadProfile {
                trainer_id,
                generation,
            }];
            // A snapshot that was never requested stays lazy.
            let dex_effects = if state.dex_generation.is_some() || state.view == View::Pokedex {
                dex_fetch(state)
            } else {
                Vec::new()
            };
            // An in-flight fetch now belongs to a dead generation and will be
            // dropped; the next Pokédex visit fetches again.
            if dex_effects.is_empty() && state.dex.is_loading() {
                state.dex = DataResource::Empty;
                state.dex_generation = None;
            }
            effects.extend(dex_effects);
            DispatchResult::changed_with_many(effects)
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Whether a fetch result still belongs to the current session.
fn accept(state: &AppState, generation: u64, what: &str) -> bool {
    if state.session.is_current(generation) {
        return true;
    }
    tracing::debug!(
        what,
        generation,
        current = state.session.generation,
        "dropping stale response"
    );
    false
}

/// The backend does not know this trainer: tear the session down.
fn forget_trainer(state: &mut AppState, error: &ApiError) -> DispatchResult<Effect> {
    tracing::warn!("backend rejected trainer id, clearing stored identity");
    state.session.logout();
    state.clear_trainer_data();
    state.profile = DataResource::Failed(error.user_message());
    state.view = View::Profile;
    state.search_active = false;
    state.login.active = true;
    state.message = Some(error.user_message());
    DispatchResult::changed_with(Effect::ClearIdentity)
}

fn set_view(state: &mut AppState, view: View) -> DispatchResult<Effect> {
    if state.view == view {
        return DispatchResult::unchanged();
    }
    state.view = view;
    if view != View::Pokedex {
        state.search_active = false;
        return DispatchResult::changed();
    }
    DispatchResult::changed_with_many(dex_fetch(state))
}

/// Request the status feed unless it is already loaded or loading for this
/// generation. Only the Pokédex view triggers it.
fn dex_fetch(state: &mut AppState) -> Vec<Effect> {
    if state.view != View::Pokedex || !state.needs_dex_fetch() {
        return Vec::new();
    }
    let Some(trainer_id) = state.session.trainer_id().map(str::to_string) else {
        return Vec::new();
    };
    let generation = state.session.generation;
    state.dex = DataResource::Loading;
    state.dex_generation = Some(generation);
    state.skipped.clear();
    state.visible.clear();
    state.selected_index = 0;
    vec![Effect::LoadPokedex {
        trainer_id,
        generation,
    }]
}

fn refilter(state: &mut AppState) -> DispatchResult<Effect> {
    let previous = state.selected_entry().map(|entry| entry.national_id);
    state.rebuild_visible();
    // Keep the cursor on the same species when it survives the filter.
    if let Some(id) = previous {
        if let Some(index) = state.visible.iter().position(|entry| entry.national_id == id) {
            state.selected_index = index;
        }
    }
    DispatchResult::changed()
}

fn changed_if(changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}

fn clamp_index(current: usize, delta: i16) -> usize {
    let next = current as i64 + i64::from(delta);
    next.max(0) as usize
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(8).max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dex::{ingest, IngestOutcome, StatusRecord, TypeFilter};
    use crate::species::SpeciesDb;
    use crate::sprite::SpriteHosts;
    use crate::state::Profile;

    fn outcome(names: &[(&str, bool, bool)]) -> IngestOutcome {
        let records: Vec<StatusRecord> = names
            .iter()
            .map(|(name, caught, shiny)| StatusRecord {
                species_name: name.to_string(),
                caught: *caught,
                shiny: *shiny,
                competitive_set: None,
            })
            .collect();
        ingest(&records, &SpeciesDb::bundled().unwrap(), &SpriteHosts::default())
    }

    fn logged_in_on_dex() -> AppState {
        let mut state = AppState::new(Some("1234".into()));
        reducer(&mut state, Action::ViewSet(View::Pokedex));
        let generation = state.session.generation;
        reducer(
            &mut state,
            Action::PokedexDidLoad {
                generation,
                outcome: outcome(&[
                    ("Eevee", false, false),
                    ("Pikachu", true, true),
                    ("Charizard", true, false),
                ]),
            },
        );
        state
    }

    #[test]
    fn init_without_identity_opens_login() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.login.active);
        assert!(state.message.is_some());
    }

    #[test]
    fn init_with_identity_fetches_profile_only() {
        let mut state = AppState::new(Some("1234".into()));
        let result = reducer(&mut state, Action::Init);
        assert!(state.profile.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::LoadProfile {
                trainer_id: "1234".into(),
                generation: 1
            }]
        );
    }

    #[test]
    fn entering_pokedex_fetches_once_per_generation() {
        let mut state = AppState::new(Some("1234".into()));
        let first = reducer(&mut state, Action::ViewSet(View::Pokedex));
        assert_eq!(first.effects.len(), 1);
        assert!(state.dex.is_loading());

        reducer(&mut state, Action::ViewSet(View::Profile));
        let again = reducer(&mut state, Action::ViewSet(View::Pokedex));
        assert!(again.changed);
        assert!(again.effects.is_empty());
    }

    #[test]
    fn filters_recompute_visible_list() {
        let mut state = logged_in_on_dex();
        let ids = |state: &AppState| -> Vec<u16> {
            state.visible.iter().map(|entry| entry.national_id).collect()
        };
        assert_eq!(ids(&state), vec![6, 25, 133]);

        reducer(&mut state, Action::ToggleCaughtOnly);
        assert_eq!(ids(&state), vec![6, 25]);

        reducer(&mut state, Action::ToggleShinyOnly);
        assert_eq!(ids(&state), vec![25]);

        reducer(&mut state, Action::FilterReset);
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchInput('c'));
        reducer(&mut state, Action::SearchInput('h'));
        assert_eq!(ids(&state), vec![6]);

        reducer(&mut state, Action::SearchCancel);
        assert_eq!(ids(&state), vec![6, 25, 133]);
    }

    #[test]
    fn type_filter_cycles_and_clears() {
        let mut state = logged_in_on_dex();
        for _ in 0..10 {
            reducer(&mut state, Action::TypeFilterNext);
        }
        // Normal, Fire, ... the tenth step lands on Flying.
        assert_eq!(state.criteria.type_filter, TypeFilter::Only("Flying".into()));
        assert_eq!(state.visible.len(), 1);
        assert_eq!(state.visible[0].display_name, "Charizard");

        let result = reducer(&mut state, Action::TypeFilterClear);
        assert!(result.changed);
        assert_eq!(state.visible.len(), 3);
        assert!(!reducer(&mut state, Action::TypeFilterClear).changed);
    }

    #[test]
    fn selection_follows_species_through_filter_changes() {
        let mut state = logged_in_on_dex();
        reducer(&mut state, Action::DexSelect(1));
        assert_eq!(state.selected_entry().unwrap().national_id, 25);
        reducer(&mut state, Action::ToggleCaughtOnly);
        assert_eq!(state.selected_entry().unwrap().national_id, 25);
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut state = AppState::new(Some("old".into()));
        reducer(&mut state, Action::Init);
        let stale = state.session.generation;

        state.login.active = true;
        state.login.input = "new".into();
        reducer(&mut state, Action::LoginSubmit);

        let result = reducer(
            &mut state,
            Action::ProfileDidLoad {
                generation: stale,
                profile: Profile {
                    name: "Old".into(),
                    ..Default::default()
                },
            },
        );
        assert!(!result.changed);
        assert!(state.profile.is_loading());
    }

    #[test]
    fn unknown_trainer_clears_identity_and_data() {
        let mut state = logged_in_on_dex();
        let generation = state.session.generation;
        let result = reducer(
            &mut state,
            Action::ProfileDidError {
                generation,
                error: ApiError::UnknownTrainer,
            },
        );
        assert_eq!(result.effects, vec![Effect::ClearIdentity]);
        assert!(!state.session.is_logged_in());
        assert!(state.entries().is_empty());
        assert!(state.visible.is_empty());
        assert!(state.login.active);
        assert_eq!(
            state.message.as_deref(),
            Some(ApiError::UnknownTrainer.user_message().as_str())
        );
    }

    #[test]
    fn other_errors_leave_identity_alone() {
        let mut state = AppState::new(Some("1234".into()));
        reducer(&mut state, Action::Init);
        let result = reducer(
            &mut state,
            Action::ProfileDidError {
                generation: 1,
                error: ApiError::Http { status: 503 },
            },
        );
        assert!(result.effects.is_empty());
        assert!(state.session.is_logged_in());
        assert!(state.profile.is_failed());
    }

    #[test]
    fn invalid_login_input_stays_in_modal() {
        let mut state = AppState::default();
        reducer(&mut state, Action::LoginStart);
        reducer(&mut state, Action::LoginInput(' '));
        let result = reducer(&mut state, Action::LoginSubmit);
        assert!(result.effects.is_empty());
        assert!(state.login.active);
        assert!(state.login.error.is_some());
    }

    #[test]
    fn refresh_supersedes_and_refetches() {
        let mut state = logged_in_on_dex();
        let before = state.session.generation;
        let result = reducer(&mut state, Action::Refresh);
        assert_eq!(state.session.generation, before + 1);
        assert_eq!(result.effects.len(), 2);
        assert!(state.dex.is_loading());
        assert!(state.visible.is_empty());
    }

    #[test]
    fn refresh_away_from_pokedex_drops_pending_fetch() {
        let mut state = AppState::new(Some("1234".into()));
        reducer(&mut state, Action::ViewSet(View::Pokedex));
        reducer(&mut state, Action::ViewSet(View::Profile));
        assert!(state.dex.is_loading());

        let result = reducer(&mut state, Action::Refresh);
        assert_eq!(result.effects.len(), 1);
        assert!(matches!(result.effects[0], Effect::LoadProfile { generation: 2, .. }));
        assert!(state.dex.is_empty());
        assert_eq!(state.dex_generation, None);

        // The dropped fetch's reply is ignored and the next visit refetches.
        reducer(
            &mut state,
            Action::PokedexDidLoad {
                generation: 1,
                outcome: outcome(&[("Pikachu", true, false)]),
            },
        );
        assert!(state.dex.is_empty());
        let result = reducer(&mut state, Action::ViewSet(View::Pokedex));
        assert!(matches!(
            result.effects.as_slice(),
            [Effect::LoadPokedex { generation: 2, .. }]
        ));
        assert!(state.dex.is_loading());
    }
}
