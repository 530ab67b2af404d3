//! Full-screen interactive session.

pub mod app;
pub mod input;
pub mod render;

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

pub use app::{Action, App, CellHit, Notice, Tone};

const TICK_RATE: Duration = Duration::from_millis(100);

type Backend = CrosstermBackend<io::Stdout>;

/// Runs the session until the learner quits. The terminal is restored
/// even when the loop fails.
pub fn run(app: &mut App) -> Result<()> {
    let mut stdout = io::stdout();
    enable_raw_mode().context("failed to enter raw mode")?;
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )
    .context("failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
    terminal.clear()?;

    let result = event_loop(&mut terminal, app);
    restore_terminal(&mut terminal)?;
    result
}

fn event_loop(terminal: &mut Terminal<Backend>, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        let now = Instant::now();
        app.tick(now);

        let mut hits = Vec::new();
        let view: &App = app;
        terminal.draw(|frame| hits = render::draw(frame, view, now))?;
        app.set_hits(hits);

        if event::poll(TICK_RATE).context("poll terminal events")? {
            let event = event::read().context("read terminal event")?;
            if let Some(action) = input::action_for(&event) {
                app.handle(action, Instant::now());
            }
        }
    }
    Ok(())
}

fn restore_terminal(terminal: &mut Terminal<Backend>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )
    .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}
