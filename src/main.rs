//! A terminal showcase page driven by a small animation choreography core.
//!
//! Run the binary to open the page: filter and search the project cards,
//! jump between sections from the `☰` menu and watch the pointer follower.
//! Run with `--print-config` to dump the effective configuration.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, widgets::Paragraph, Frame, Terminal};
use tokio::time::{self, MissedTickBehavior};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{AppState, InputMode},
};
use crate::config::AppConfig;
use crate::core::engine::PRIMARY_POINTER;
use crate::ui::{
    layout::AppLayout,
    menu::MenuPopup,
    page_view::{CursorOverlay, NavBar, PageView},
    theme::Theme,
};

/// How long the event reader blocks before checking for shutdown.
const EVENT_POLL: Duration = Duration::from_millis(50);

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Animated terminal showcase page")]
struct Cli {
    /// Config file to read instead of the default location.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long = "print-config")]
    print_config: bool,

    /// Override the frame rate.
    #[arg(long)]
    fps: Option<u32>,
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &AppState) {
    let layout = AppLayout::from_area(frame.area());

    frame.render_widget(
        NavBar {
            scrolled: state.engine.gate_active(),
            menu_open: state.menu_open,
        },
        layout.navbar_area,
    );

    let page = state.layout();
    frame.render_widget(
        PageView {
            state,
            layout: &page,
        },
        layout.page_area,
    );

    let status = match state.input_mode {
        InputMode::Search => Paragraph::new(format!("/{}▏", state.search_input))
            .style(Theme::command_input_style()),
        InputMode::Page => {
            let hint = state.config.status_bar_hint();
            let text = state.status_message.clone().unwrap_or(hint);
            Paragraph::new(text).style(Theme::status_bar_style())
        }
    };
    frame.render_widget(status, layout.status_area);

    if state.menu_open {
        frame.render_widget(
            MenuPopup {
                selected: state.menu_selected,
            },
            layout.menu_area(),
        );
    }

    frame.render_widget(
        CursorOverlay {
            pointer: state.pointer,
            follower: state.engine.follower_position(PRIMARY_POINTER),
            grow: state.hovering,
        },
        frame.area(),
    );
}

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref());
    if let Some(fps) = cli.fps {
        config.frame_rate_hz = fps.max(1);
    }

    if cli.print_config {
        print!("{}", config.serialise());
        return Ok(());
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut state = AppState::new(config, Rect::new(0, 0, size.width, size.height));

    // ── frame pacing ──────────────────────────────────────────
    // Late frames are dropped rather than replayed in a burst.
    let mut frames = time::interval(state.config.frame_interval());
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut events = spawn_event_reader(EVENT_POLL);
    tracing::info!(fps = state.config.frame_rate_hz, "choreo: started");

    // ── event loop ────────────────────────────────────────────
    let result: Result<()> = loop {
        if let Err(err) = terminal.draw(|frame| draw(frame, &state)) {
            break Err(err.into());
        }

        // Sleep until the engine's earliest timer, mapped onto the wall clock.
        let deadline = state.engine.next_deadline();
        let wake = time::Instant::from_std(state.started + deadline.unwrap_or(Duration::ZERO));

        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(&mut state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(&mut state, m),
                    AppEvent::Resize(w, h) => {
                        state.terminal_area = Rect::new(0, 0, w, h);
                    }
                }
            }

            _ = time::sleep_until(wake), if deadline.is_some() => {}

            _ = frames.tick(), if state.engine.wants_frames() => {
                handler::on_frame(&mut state);
            }
        }

        handler::advance(&mut state);

        if state.should_quit {
            break Ok(());
        }
    };

    state.engine.shutdown();
    tracing::info!("choreo: shut down");

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
