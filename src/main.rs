//! Pokebrowse - page through the PokeAPI catalog in the terminal

use std::cell::RefCell;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pokebrowse::action::Action;
use pokebrowse::api::CatalogClient;
use pokebrowse::artwork::{ARTWORK_COLS, ARTWORK_ROWS, THUMB_COLS, THUMB_ROWS};
use pokebrowse::components::{AppShell, BrowseComponentId, BrowseContext};
use pokebrowse::config::{BrowseConfig, DEFAULT_API_BASE, DEFAULT_ARTWORK_BASE};
use pokebrowse::effect::Effect;
use pokebrowse::reducer::reducer;
use pokebrowse::state::{AppState, LOADING_ANIM_TICK_MS};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Browse the PokeAPI catalog page by page
#[derive(Parser, Debug)]
#[command(name = "pokebrowse")]
#[command(about = "A paginated PokeAPI browser built on tui-dispatch")]
struct Args {
    /// Base URL of the catalog API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Base URL that `{id}.png` artwork is appended to
    #[arg(long, default_value = DEFAULT_ARTWORK_BASE)]
    artwork_base: String,

    /// Pre-fill the API key screen (the key is never sent)
    #[arg(long)]
    api_key: Option<String>,

    /// Write logs to this file (RUST_LOG overrides the default `info` level)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        api_base,
        artwork_base,
        api_key,
        log_file,
        debug: debug_args,
    } = Args::parse();
    let config = BrowseConfig::new(&api_base, &artwork_base, api_key, log_file);

    if let Some(path) = &config.log_file {
        init_tracing(path)?;
    }
    info!(api_base = %config.api_base, "starting pokebrowse");

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let initial = AppState::new(config.artwork_base.clone(), config.api_key.clone());
    let state = debug
        .load_state_or_else_async(move || async move { Ok::<AppState, io::Error>(initial) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let client = CatalogClient::new(config.api_base.clone());
    let result = run_app(&mut terminal, &debug, store, replay_actions, client).await;

    // ===== Cleanup =====
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
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Log to a file only; the terminal belongs to the UI.
fn init_tracing(path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    client: CatalogClient,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(AppShell::new()));
    let mut bus: EventBus<AppState, Action, BrowseComponentId, BrowseContext> = EventBus::new();
    let keybindings: Keybindings<BrowseContext> = Keybindings::new();

    for id in [
        BrowseComponentId::Gate,
        BrowseComponentId::Browser,
        BrowseComponentId::Detail,
    ] {
        let ui = Rc::clone(&ui);
        bus.register(id, move |event, state| {
            ui.borrow_mut().handle_event(id, &event.kind, state)
        });
    }

    // Resize only needs a redraw; Ctrl+C quits from anywhere
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
        EventKind::Key(key)
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            HandlerResponse {
                actions: vec![Action::Quit],
                consumed: true,
                needs_render: false,
            }
        }
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::PageFetch),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, client.clone()),
        )
        .await
}

/// Handle effects by spawning tasks. Re-spawning under the same key replaces
/// the previous task; tokens still guard anything that slips through.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, client: CatalogClient) {
    match effect {
        Effect::FetchPage {
            token,
            offset,
            limit,
        } => {
            ctx.tasks()
                .spawn(TaskKey::new("catalog_page"), async move {
                    match client.fetch_page(offset, limit).await {
                        Ok(page) => Action::PageDidLoad { token, page },
                        Err(err) => {
                            warn!(offset, error = %err, "catalog page fetch failed");
                            Action::PageDidError {
                                token,
                                error: err.to_string(),
                            }
                        }
                    }
                });
        }
        Effect::FetchThumbnail { token, id, url } => {
            let key = format!("thumbnail_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match client.fetch_artwork(&url, THUMB_COLS, THUMB_ROWS).await {
                    Ok(artwork) => Action::PageThumbnailDidLoad { token, id, artwork },
                    Err(err) => Action::PageThumbnailDidError {
                        token,
                        id,
                        error: err.to_string(),
                    },
                }
            });
        }
        Effect::FetchDetail { token, id } => {
            ctx.tasks()
                .spawn(TaskKey::new("entry_detail"), async move {
                    match client.fetch_detail(id).await {
                        Ok(detail) => Action::EntryDidLoad { token, detail },
                        Err(err) => {
                            warn!(id, error = %err, "entry detail fetch failed");
                            Action::EntryDidError {
                                token,
                                error: err.to_string(),
                            }
                        }
                    }
                });
        }
        Effect::FetchArtwork { token, url } => {
            ctx.tasks()
                .spawn(TaskKey::new("entry_artwork"), async move {
                    match client.fetch_artwork(&url, ARTWORK_COLS, ARTWORK_ROWS).await {
                        Ok(artwork) => Action::EntryArtworkDidLoad { token, artwork },
                        Err(err) => {
                            warn!(url = %url, error = %err, "artwork fetch failed");
                            Action::EntryArtworkDidError {
                                token,
                                error: err.to_string(),
                            }
                        }
                    }
                });
        }
    }
}
