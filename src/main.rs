//! trainerdex - terminal dashboard for a trainer's profile and Pokédex

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::OnceLock;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use trainerdex::action::Action;
use trainerdex::api::BackendClient;
use trainerdex::config::Config;
use trainerdex::dex;
use trainerdex::effect::Effect;
use trainerdex::logging;
use trainerdex::reducer::reducer;
use trainerdex::session::{parse_login, IdentityStore};
use trainerdex::species::SpeciesDb;
use trainerdex::sprite::SpriteHosts;
use trainerdex::state::AppState;
use trainerdex::ui::{self, DexComponentId, DexContext, DexUi};

#[derive(Parser, Debug)]
#[command(name = "trainerdex")]
#[command(about = "Trainer profile and Pokédex for the Discord Pokémon game")]
struct Args {
    /// Config file (TOML); defaults to <config dir>/trainerdex/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and TRAINERDEX_BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Species database JSON (defaults to the bundled table)
    #[arg(long)]
    dex: Option<PathBuf>,

    /// Showdown data directory with pokedex.json, learnsets.json and moves.json
    #[arg(long)]
    showdown_data: Option<PathBuf>,

    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[arg(long)]
    log_level: Option<String>,

    /// Trainer id or login link; replaces the stored id
    #[arg(long)]
    login: Option<String>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

/// Long-lived collaborators used by effect tasks. They stay out of
/// `AppState` so the state remains plain, serializable data.
struct Services {
    client: BackendClient,
    species: SpeciesDb,
    sprites: SpriteHosts,
    identity: Option<IdentityStore>,
}

static SERVICES: OnceLock<Services> = OnceLock::new();

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    let mut config = Config::resolve(args.config.as_deref()).map_err(io::Error::other)?;
    config.apply_env();
    config.apply_backend_override(args.backend_url);
    if let Some(path) = args.dex {
        config.dex_path = Some(path);
    }
    if let Some(dir) = args.showdown_data {
        config.showdown_dir = Some(dir);
    }
    if let Some(dir) = args.log_dir {
        config.log_dir = dir;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    let _log_guard = match logging::init_logging(&config.log_dir, &config.log_level) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("warning: file logging disabled: {err}");
            None
        }
    };
    let client =
        BackendClient::new(&config.backend_url, config.request_timeout()).map_err(io::Error::other)?;
    tracing::info!(backend = client.base_url(), "starting trainerdex");

    let species = config.load_species().map_err(io::Error::other)?;
    tracing::info!(species = species.len(), "species database loaded");

    let identity = match IdentityStore::in_config_dir() {
        Ok(store) => {
            tracing::debug!(path = %store.path().display(), "trainer id store");
            Some(store)
        }
        Err(err) => {
            tracing::warn!(error = %err, "trainer id will not be remembered");
            None
        }
    };
    let trainer_id = initial_trainer_id(args.login.as_deref(), identity.as_ref()).await;

    let _ = SERVICES.set(Services {
        client,
        species,
        sprites: config.sprites.clone(),
        identity,
    });

    let debug = DebugSession::new(args.debug);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState::new(trainer_id))
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("bye");
    Ok(())
}

/// `--login` wins over the stored id and replaces it.
async fn initial_trainer_id(login: Option<&str>, identity: Option<&IdentityStore>) -> Option<String> {
    if let Some(input) = login {
        let Some(id) = parse_login(input) else {
            tracing::warn!(input, "--login did not contain a trainer id");
            return None;
        };
        if let Some(store) = identity {
            if let Err(err) = store.save(&id).await {
                tracing::warn!(error = %err, "could not store trainer id");
            }
        }
        return Some(id);
    }
    let store = identity?;
    match store.load().await {
        Ok(id) => id,
        Err(err) => {
            tracing::warn!(error = %err, "could not read stored trainer id");
            None
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    bus.register(DexComponentId::Profile, |event, state| {
        ui::handle_profile_event(&event.kind, state)
    });

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::DexList, move |event, state| {
        ui_list.borrow_mut().handle_list_event(&event.kind, state)
    });

    bus.register(DexComponentId::Search, |event, state| {
        ui::handle_search_event(&event.kind, state)
    });

    bus.register(DexComponentId::Login, |event, state| {
        ui::handle_login_event(&event.kind, state)
    });

    bus.register_global(|event, state| ui::handle_global_event(&event.kind, state));

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |_runtime| {},
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    let Some(services) = SERVICES.get() else {
        tracing::error!(?effect, "services not initialised, dropping effect");
        return;
    };
    match effect {
        Effect::LoadProfile {
            trainer_id,
            generation,
        } => {
            ctx.tasks().spawn(TaskKey::new("profile"), async move {
                match services.client.fetch_profile(&trainer_id).await {
                    Ok(profile) => Action::ProfileDidLoad {
                        generation,
                        profile,
                    },
                    Err(error) => Action::ProfileDidError { generation, error },
                }
            });
        }
        Effect::LoadPokedex {
            trainer_id,
            generation,
        } => {
            ctx.tasks().spawn(TaskKey::new("pokedex"), async move {
                match services.client.fetch_pokedex(&trainer_id).await {
                    Ok(records) => {
                        let outcome = dex::ingest(&records, &services.species, &services.sprites);
                        Action::PokedexDidLoad {
                            generation,
                            outcome,
                        }
                    }
                    Err(error) => Action::PokedexDidError { generation, error },
                }
            });
        }
        Effect::PersistIdentity { trainer_id } => {
            let Some(store) = services.identity.as_ref() else {
                return;
            };
            ctx.tasks().spawn(TaskKey::new("identity"), async move {
                match store.save(&trainer_id).await {
                    Ok(()) => Action::IdentityDidSync,
                    Err(error) => Action::IdentityDidError(error.to_string()),
                }
            });
        }
        Effect::ClearIdentity => {
            let Some(store) = services.identity.as_ref() else {
                return;
            };
            ctx.tasks().spawn(TaskKey::new("identity"), async move {
                match store.clear().await {
                    Ok(()) => Action::IdentityDidSync,
                    Err(error) => Action::IdentityDidError(error.to_string()),
                }
            });
        }
    }
}
