//! Colloquy - terminal client for a conversational answer service
//!
//! The conversation core (state machine + runtime) owns all state and
//! sequencing; this binary is a thin front end that feeds key events
//! through the submission gate and re-renders from state snapshots.

mod config;
mod gate;
mod runtime;
mod state_machine;
mod transport;
mod view;

use config::Config;
use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::{cursor, queue, style, terminal};
use futures::StreamExt;
use gate::InputGate;
use runtime::{ConversationHandle, ViewEvent};
use state_machine::ConversationState;
use std::io::{self, Write};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::HttpAnswerService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they can be redirected away from the chat view.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "colloquy=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env();
    let service = HttpAnswerService::new(&config)?;
    tracing::info!(endpoint = %service.endpoint(), "answer service configured");

    let handle = runtime::spawn(service);
    let view_rx = handle.subscribe();

    terminal::enable_raw_mode()?;
    let result = run_ui(&handle, view_rx).await;
    terminal::disable_raw_mode()?;

    result
}

async fn run_ui(
    handle: &ConversationHandle,
    mut view_rx: broadcast::Receiver<ViewEvent>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut gate = InputGate::new();
    let mut snapshot = ConversationState::new();
    let mut keys = EventStream::new();

    draw(&snapshot, &gate)?;

    loop {
        tokio::select! {
            update = view_rx.recv() => match update {
                Ok(ViewEvent::Snapshot { state }) => {
                    gate.set_busy(state.phase.is_busy());
                    snapshot = state;
                    draw(&snapshot, &gate)?;
                }
                // A full redraw always ends at the newest content.
                Ok(ViewEvent::ScrollToLatest) => {}
                Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => break,
            },
            key = keys.next() => match key {
                Some(Ok(TermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
                    if !handle_key(key, &mut gate, handle).await? {
                        break;
                    }
                    draw(&snapshot, &gate)?;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }

    Ok(())
}

/// Apply one key event. Returns false when the user asked to quit.
async fn handle_key(
    key: KeyEvent,
    gate: &mut InputGate,
    handle: &ConversationHandle,
) -> Result<bool, Box<dyn std::error::Error>> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Ok(false),
        KeyCode::Esc => return Ok(false),
        KeyCode::Enter => {
            let shift_held = key.modifiers.contains(KeyModifiers::SHIFT);
            match gate.confirm_key(shift_held) {
                Some(event) => handle.send_event(event).await?,
                // The gate refused: a shifted confirm becomes a line break,
                // inserted here rather than by the gate.
                None if shift_held => gate.insert('\n'),
                None => {}
            }
        }
        KeyCode::Backspace => gate.backspace(),
        KeyCode::Char(c) => gate.insert(c),
        _ => {}
    }
    Ok(true)
}

fn draw(state: &ConversationState, gate: &InputGate) -> io::Result<()> {
    let mut out = io::stdout();
    queue!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;

    for bubble in view::bubbles(state) {
        let (label, text) = match bubble {
            view::Bubble::Assistant { text } => ("assistant", text),
            view::Bubble::User { text } => ("you", text),
            view::Bubble::Loading => ("assistant", "..."),
            view::Bubble::ErrorNotice { text } => ("error", text),
        };

        let mut lines = text.lines();
        let first = lines.next().unwrap_or("");
        queue!(
            out,
            style::Print(format!("{label:>9}  {first}")),
            cursor::MoveToNextLine(1)
        )?;
        for continuation in lines {
            queue!(
                out,
                style::Print(format!("{:>9}  {continuation}", "")),
                cursor::MoveToNextLine(1)
            )?;
        }
    }

    let prompt = if gate.is_busy() { "  " } else { "> " };
    queue!(
        out,
        cursor::MoveToNextLine(1),
        style::Print(format!("{prompt}{}", gate.draft()))
    )?;
    out.flush()
}
