//! Interactive reply collector
//!
//! Bridges one asynchronous network call to a blocking, single-operator
//! terminal session. The network task performs a single receive on a
//! one-shot completion channel; the session task sends exactly once, at
//! the moment a terminal action fires. The wait is unbounded - an idle
//! operator holds the gate indefinitely, and only a terminal action ends
//! the session. The caller's exclusion gate guarantees that at most one
//! session is ever on screen.

use std::io;
use std::time::Duration;

use async_trait::async_trait;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tokio::sync::oneshot;

use hal_core::chat::ChatRequest;
use hal_core::error_log;
use hal_core::reply::{ReplyOutcome, ReplySource};
use hal_core::HalError;

pub mod app;
pub mod event_loop;
pub mod ui;

use crate::tui::app::{RequestView, SessionApp};
use crate::tui::event_loop::{handle_key_event, LoopAction};

/// Reply source that puts a human operator in the loop.
pub struct InteractiveReply;

#[async_trait]
impl ReplySource for InteractiveReply {
    async fn collect(&self, request: &ChatRequest) -> Result<ReplyOutcome, HalError> {
        let view = RequestView::from_request(request);
        let (tx, rx) = oneshot::channel();

        tokio::spawn(run_session_task(view, tx));

        // Single blocking receive; unbounded - the operator may take
        // arbitrary real time.
        rx.await.map_err(|_| HalError::SessionAborted)
    }
}

async fn run_session_task(view: RequestView, tx: oneshot::Sender<ReplyOutcome>) {
    let outcome = match run_session(view).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error_log!("terminal session failed: {e}");
            ReplyOutcome::InternalError
        }
    };
    // Sent exactly once, never again.
    let _ = tx.send(outcome);
}

/// Run one operator session: set up the terminal, loop until a terminal
/// action fires, restore the terminal, and hand back the outcome.
async fn run_session(view: RequestView) -> io::Result<ReplyOutcome> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = SessionApp::new(view);
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal before surfacing any error from the loop.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.outcome.take().unwrap_or(ReplyOutcome::InternalError))
}

/// Main event loop
async fn run_event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut SessionApp,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(16); // ~60 FPS

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        tokio::time::sleep(tick_rate).await;

        while event::poll(Duration::from_secs(0))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key_event(app, key) == LoopAction::Break {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }
}
