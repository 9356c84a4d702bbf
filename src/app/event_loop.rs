//! Terminal event loop.

use std::io::{self, Write};

use chrono::Utc;
use crossterm::{
    cursor::{Hide, Show},
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::app::{Dashboard, FetchOutcome};
use crate::render::terminal::Painter;

/// What a key press asks the dashboard to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Refresh,
    Quit,
}

/// Map a key press to an action. Releases and repeats are ignored.
pub fn key_action(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::F(5) => Some(Action::Refresh),
        _ => None,
    }
}

/// Raw mode plus alternate screen, undone on drop.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen, Hide) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }

    /// Best-effort restore, also used from the panic hook.
    pub fn restore() {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        Self::restore();
    }
}

/// Run the interactive dashboard until the user quits.
///
/// A refresh is kicked off immediately; afterwards only explicit refreshes
/// hit the network.
pub async fn run_dashboard(mut dashboard: Dashboard) -> anyhow::Result<()> {
    let _guard = TerminalGuard::enter()?;
    let mut stdout = io::stdout();
    let painter = Painter::new();
    let (tx, mut rx) = mpsc::channel::<FetchOutcome>(1);
    let mut input = EventStream::new();

    dashboard.request_refresh(&tx);
    redraw(&painter, &mut stdout, &dashboard)?;

    loop {
        tokio::select! {
            Some(outcome) = rx.recv() => {
                dashboard.apply_fetch(outcome, Utc::now());
            }
            next = input.next() => match next {
                Some(Ok(Event::Key(key))) => match key_action(key) {
                    Some(Action::Quit) => break,
                    Some(Action::Refresh) => {
                        dashboard.request_refresh(&tx);
                    }
                    None => continue,
                },
                Some(Ok(Event::Resize(_, _))) => {}
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }

        redraw(&painter, &mut stdout, &dashboard)?;
    }

    tracing::info!("Dashboard closed with {} events in history", dashboard.store().len());
    Ok(())
}

fn redraw<W: Write>(painter: &Painter, out: &mut W, dashboard: &Dashboard) -> io::Result<()> {
    let size = terminal::size()?;
    painter.draw(out, dashboard.view(), dashboard.status(), size)
}
