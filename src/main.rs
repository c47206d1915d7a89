//! A terminal image carousel with a draggable progress scrubber.
//!
//! Run the binary to browse the default feed, or pass a feed URL / JSON file.
//! Run with `--write-config` to persist the effective settings.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    fetch_runtime::{self, FetchUpdate},
    handler, render,
    state::AppState,
};
use crate::config::AppConfig;
use crate::core::feed::Source;

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal image carousel with a progress scrubber")]
struct Cli {
    /// Feed to open: an http(s) URL or a local JSON file (defaults to the
    /// configured endpoint).
    source: Option<String>,

    /// JSON field holding the image list.
    #[arg(long)]
    field: Option<String>,

    /// Stop at the first and last slide instead of wrapping.
    #[arg(long = "no-loop")]
    no_loop: bool,

    /// Seek on click only; pressing the track does not start a drag.
    #[arg(long = "click-only")]
    click_only: bool,

    /// Event poll / animation tick in milliseconds.
    #[arg(long = "tick-ms")]
    tick_ms: Option<u64>,

    /// Save the effective configuration and exit.
    #[arg(long = "write-config")]
    write_config: bool,
}

impl Cli {
    /// Layer CLI flags over the file configuration.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(source) = &self.source {
            config.endpoint = source.clone();
        }
        if let Some(field) = &self.field {
            config.list_field = field.clone();
        }
        if self.no_loop {
            config.loop_slides = false;
        }
        if self.click_only {
            config.scrub_on_drag = false;
        }
        if let Some(tick_ms) = self.tick_ms {
            config.tick_ms = tick_ms.clamp(10, 1000);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();
    let mut user_config = AppConfig::load();
    cli.apply(&mut user_config);

    if cli.write_config {
        let path = user_config.save()?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let source = Source::parse(&user_config.endpoint);
    let tick_rate = Duration::from_millis(user_config.tick_ms);
    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .timeout(Duration::from_secs(30))
        .build()?;
    let mut state = AppState::new(source, user_config);

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    state.terminal_area = Rect::new(0, 0, size.width, size.height);

    // ── async channels ────────────────────────────────────────
    let mut events = spawn_event_reader(tick_rate);
    let (fetch_tx, mut fetch_rx) = tokio::sync::mpsc::unbounded_channel::<FetchUpdate>();

    // ── event loop ────────────────────────────────────────────
    loop {
        // Deliver selection changes queued by the last handler before
        // anything reads the scrubber.
        state.engine.flush();
        handler::sync_layout(&mut state);

        // ── draw first ─────────────────────────────────────────
        terminal.draw(|frame| render::draw(frame, &mut state))?;

        // ── kick off background work AFTER draw ─────────────────
        if state.needs_reload {
            state.needs_reload = false;
            fetch_runtime::spawn_list_fetch(
                fetch_tx.clone(),
                client.clone(),
                state.generation,
                state.source.clone(),
                state.config.list_field.clone(),
            );
        }
        if state.needs_image_fetch {
            state.needs_image_fetch = false;
            let base_dir = fetch_runtime::feed_base_dir(&state.source);
            state.image_batch = Some(fetch_runtime::spawn_image_fetches(
                fetch_tx.clone(),
                client.clone(),
                state.generation,
                &state.images,
                base_dir.as_deref(),
            ));
        }

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => handler::handle_resize(&mut state, w, h),
                    AppEvent::FocusLost => handler::handle_focus_lost(&mut state),
                    AppEvent::FocusGained => {}
                    AppEvent::Tick => {
                        state.tick = state.tick.wrapping_add(1);
                        if state.strip_scroll.is_animating() {
                            state.strip_scroll.tick();
                        }
                    }
                }
            }

            Some(update) = fetch_rx.recv() => {
                // Batch-drain everything already queued before redrawing.
                state.apply_fetch_update(update);
                while let Ok(update) = fetch_rx.try_recv() {
                    state.apply_fetch_update(update);
                }
            }
        }

        if state.should_quit {
            break;
        }
    }

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    Ok(())
}
