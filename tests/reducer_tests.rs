//! Store flows through EffectStoreTestHarness: fetch lifecycles, session
//! changes and the Pokédex filters.

use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;
use trainerdex::action::Action;
use trainerdex::api::ApiError;
use trainerdex::dex::{ingest, IngestOutcome, StatusRecord, TypeFilter};
use trainerdex::effect::Effect;
use trainerdex::reducer::reducer;
use trainerdex::species::SpeciesDb;
use trainerdex::sprite::SpriteHosts;
use trainerdex::state::{AppState, Profile, View};
use trainerdex::ui::{self, DexUi};

fn red() -> Profile {
    Profile {
        discord_id: "1234".into(),
        name: "Red".into(),
        badges: 8,
        money: 1_500_000,
        ..Default::default()
    }
}

fn record(name: &str, caught: bool, shiny: bool) -> StatusRecord {
    StatusRecord {
        species_name: name.into(),
        caught,
        shiny,
        competitive_set: None,
    }
}

fn feed() -> IngestOutcome {
    let db = SpeciesDb::bundled().unwrap();
    ingest(
        &[
            record("Pikachu", true, true),
            record("Eevee", false, false),
            record("Charizard", true, false),
            record("Missingno", true, false),
        ],
        &db,
        &SpriteHosts::default(),
    )
}

fn logged_in() -> AppState {
    AppState::new(Some("1234".into()))
}

/// Logged in, on the Pokédex view, with `feed()` applied.
fn state_with_dex() -> AppState {
    let mut state = logged_in();
    reducer(&mut state, Action::ViewSet(View::Pokedex));
    reducer(
        &mut state,
        Action::PokedexDidLoad {
            generation: 1,
            outcome: feed(),
        },
    );
    state
}

// ============================================================================
// Fetch lifecycle
// ============================================================================

#[test]
fn stored_trainer_loads_profile_on_init() {
    let mut harness = EffectStoreTestHarness::new(logged_in(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.profile.is_loading());
    harness.assert_state(|s| s.dex.is_empty());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::LoadProfile { trainer_id, generation: 1 } if trainer_id == "1234")
    });

    harness.complete_action(Action::ProfileDidLoad {
        generation: 1,
        profile: red(),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));

    harness.assert_state(|s| s.profile.data().map(|p| p.name.as_str()) == Some("Red"));
}

#[test]
fn first_run_opens_login() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.login.active);
    harness.drain_effects().effects_empty();
}

#[test]
fn pokedex_is_fetched_once_per_session() {
    let mut harness = EffectStoreTestHarness::new(logged_in(), reducer);

    harness.dispatch_collect(Action::ViewSet(View::Pokedex));
    harness.assert_state(|s| s.dex.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadPokedex { generation: 1, .. }));

    harness.complete_action(Action::PokedexDidLoad {
        generation: 1,
        outcome: feed(),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.dex.is_loaded());
    harness.assert_state(|s| s.skipped == vec!["Missingno".to_string()]);
    harness.assert_state(|s| s.visible.len() == 3);

    harness.dispatch_collect(Action::ViewSet(View::Profile));
    harness.dispatch_collect(Action::ViewSet(View::Pokedex));
    harness.drain_effects().effects_empty();
}

#[test]
fn generic_failure_keeps_the_session() {
    let mut harness = EffectStoreTestHarness::new(logged_in(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.dispatch_collect(Action::ProfileDidError {
        generation: 1,
        error: ApiError::Http { status: 502 },
    });

    harness.assert_state(|s| s.profile.is_failed());
    harness.assert_state(|s| s.session.trainer_id() == Some("1234"));
    harness.assert_state(|s| !s.login.active);
    harness.drain_effects().effects_empty();
}

#[test]
fn unknown_trainer_forgets_identity() {
    let mut harness = EffectStoreTestHarness::new(state_with_dex(), reducer);

    harness.dispatch_collect(Action::Refresh);
    harness.drain_effects();
    harness.dispatch_collect(Action::PokedexDidError {
        generation: 2,
        error: ApiError::UnknownTrainer,
    });

    harness.assert_state(|s| !s.session.is_logged_in());
    harness.assert_state(|s| s.login.active);
    harness.assert_state(|s| s.view == View::Profile);
    harness.assert_state(|s| s.visible.is_empty() && s.dex.is_empty());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::ClearIdentity));
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn login_link_switches_trainer_and_drops_old_responses() {
    let mut harness = EffectStoreTestHarness::new(logged_in(), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();

    harness.dispatch_collect(Action::LoginStart);
    for ch in "https://game.example/login?id=5678".chars() {
        harness.dispatch_collect(Action::LoginInput(ch));
    }
    harness.dispatch_collect(Action::LoginSubmit);

    harness.assert_state(|s| s.session.trainer_id() == Some("5678"));
    harness.assert_state(|s| !s.login.active);
    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(
        |e| matches!(e, Effect::PersistIdentity { trainer_id } if trainer_id == "5678"),
    );

    // The first trainer's profile arrives late.
    harness.dispatch_collect(Action::ProfileDidLoad {
        generation: 1,
        profile: red(),
    });
    harness.assert_state(|s| s.profile.is_loading());

    harness.dispatch_collect(Action::ProfileDidLoad {
        generation: 2,
        profile: Profile {
            discord_id: "5678".into(),
            name: "Blue".into(),
            ..Default::default()
        },
    });
    harness.assert_state(|s| s.profile.data().map(|p| p.name.as_str()) == Some("Blue"));
}

#[test]
fn old_pokedex_reply_after_login_is_dropped() {
    let mut harness = EffectStoreTestHarness::new(logged_in(), reducer);
    harness.dispatch_collect(Action::ViewSet(View::Pokedex));
    harness.drain_effects();

    harness.dispatch_collect(Action::LoginStart);
    for ch in "5678".chars() {
        harness.dispatch_collect(Action::LoginInput(ch));
    }
    harness.dispatch_collect(Action::LoginSubmit);
    let effects = harness.drain_effects();
    effects.effects_count(3);

    // The first trainer's status feed lands after the switch.
    assert_eq!(
        harness.dispatch_all([Action::PokedexDidLoad {
            generation: 1,
            outcome: feed(),
        }]),
        vec![false]
    );
    harness.assert_state(|s| s.dex.is_loading());
    harness.assert_state(|s| s.visible.is_empty() && s.skipped.is_empty());

    harness.dispatch_collect(Action::PokedexDidLoad {
        generation: 2,
        outcome: feed(),
    });
    harness.assert_state(|s| s.dex.is_loaded() && s.visible.len() == 3);
}

#[test]
fn refresh_on_profile_clears_pending_pokedex() {
    let mut harness = EffectStoreTestHarness::new(logged_in(), reducer);
    harness.dispatch_all([Action::ViewSet(View::Pokedex), Action::ViewSet(View::Profile)]);
    harness.drain_effects();
    harness.assert_state(|s| s.dex.is_loading());

    harness.dispatch_collect(Action::Refresh);

    harness.assert_state(|s| s.dex.is_empty());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadProfile { generation: 2, .. }));
}

#[test]
fn garbage_login_keeps_modal_open() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::LoginStart);
    for ch in "login?id=".chars() {
        harness.dispatch_collect(Action::LoginInput(ch));
    }
    harness.dispatch_collect(Action::LoginSubmit);

    harness.assert_state(|s| s.login.active && s.login.error.is_some());
    harness.assert_state(|s| !s.session.is_logged_in());
    harness.drain_effects().effects_empty();
}

#[test]
fn logout_clears_everything() {
    let mut harness = EffectStoreTestHarness::new(state_with_dex(), reducer);

    harness.dispatch_collect(Action::Logout);

    harness.assert_state(|s| !s.session.is_logged_in());
    harness.assert_state(|s| s.entries().is_empty());
    harness.assert_state(|s| s.view == View::Profile);
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::ClearIdentity));
}

#[test]
fn refresh_refetches_loaded_pokedex() {
    let mut harness = EffectStoreTestHarness::new(state_with_dex(), reducer);

    harness.dispatch_collect(Action::Refresh);

    harness.assert_state(|s| s.session.generation == 2);
    let effects = harness.drain_effects();
    effects.effects_count(2);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadProfile { generation: 2, .. }));
}

// ============================================================================
// Filters
// ============================================================================

#[test]
fn filters_compose() {
    let mut harness = EffectStoreTestHarness::new(state_with_dex(), reducer);

    harness.dispatch_collect(Action::ToggleCaughtOnly);
    harness.assert_state(|s| s.visible.len() == 2);

    harness.dispatch_collect(Action::SearchStart);
    harness.dispatch_collect(Action::SearchInput('c'));
    harness.assert_state(|s| {
        s.visible.len() == 1 && s.visible[0].display_name == "Charizard"
    });

    harness.dispatch_collect(Action::SearchCancel);
    harness.dispatch_collect(Action::ToggleShinyOnly);
    harness.assert_state(|s| {
        s.visible.len() == 1 && s.visible[0].display_name == "Pikachu"
    });

    harness.dispatch_collect(Action::FilterReset);
    harness.assert_state(|s| s.visible.len() == 3);
    harness.assert_state(|s| s.criteria.is_default());
}

#[test]
fn type_filter_narrows_and_clears() {
    let mut harness = EffectStoreTestHarness::new(state_with_dex(), reducer);

    // All -> Normal -> Fire
    harness.dispatch_all([Action::TypeFilterNext, Action::TypeFilterNext]);
    harness.assert_state(|s| s.criteria.type_filter == TypeFilter::Only("Fire".into()));
    harness.assert_state(|s| {
        s.visible.len() == 1 && s.visible[0].display_name == "Charizard"
    });

    harness.dispatch_collect(Action::TypeFilterClear);
    harness.assert_state(|s| s.visible.len() == 3);
}

#[test]
fn selection_stays_in_bounds() {
    let mut harness = EffectStoreTestHarness::new(state_with_dex(), reducer);

    harness.dispatch_collect(Action::SelectionJumpBottom);
    harness.assert_state(|s| s.selected_index == 2);
    assert_eq!(harness.dispatch_all([Action::SelectionMove(5)]), vec![false]);
    harness.dispatch_collect(Action::SelectionMove(-10));
    harness.assert_state(|s| s.selected_index == 0);
}

// ============================================================================
// Keys
// ============================================================================

#[test]
fn list_keys_map_to_filters() {
    let mut harness = EffectStoreTestHarness::new(state_with_dex(), reducer);
    let mut dex_ui = DexUi::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("c", |state, event| {
        dex_ui.handle_list_event(&event.kind, state).actions
    });
    actions.assert_count(1);
    actions.assert_first(Action::ToggleCaughtOnly);
}

#[test]
fn global_keys_switch_views() {
    let mut harness = EffectStoreTestHarness::new(logged_in(), reducer);

    let actions = harness.send_keys::<NumericComponentId, _, _>("2", |state, event| {
        ui::handle_global_event(&event.kind, state).actions
    });
    actions.assert_first(Action::ViewSet(View::Pokedex));
}

#[test]
fn global_keys_yield_to_login_modal() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::Init);

    let actions = harness.send_keys::<NumericComponentId, _, _>("q", |state, event| {
        ui::handle_global_event(&event.kind, state).actions
    });
    actions.assert_count(0);
}
