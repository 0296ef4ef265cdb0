pub mod render;
pub mod state;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use state::{AppState, InputMode};
use std::io::stdout;

use crate::bsky::auth::Session;
use crate::bsky::{ensure_fresh_session, GraphApi};
use crate::lists::model::AggregatedData;
use crate::lists::toggle_membership;

const PAGE: usize = 10;

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Quit,
    /// Flip membership of `profile` (index into the snapshot) in list `list`.
    Toggle { profile: usize, list: usize },
}

/// Run the TUI until the user quits. Membership changes are awaited inline,
/// so at most one remote mutation is ever in flight.
pub async fn run_tui(
    api: &dyn GraphApi,
    session: &mut Session,
    data: &mut AggregatedData,
    batch_size: usize,
) -> Result<()> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = tui_loop(&mut terminal, api, session, data, batch_size).await;

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn tui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    api: &dyn GraphApi,
    session: &mut Session,
    data: &mut AggregatedData,
    batch_size: usize,
) -> Result<()> {
    let mut state = AppState::new(&session.handle, batch_size, data);
    state.push_log(
        "INFO",
        format!("loaded {} profiles, {} lists", data.profiles.len(), data.lists.len()),
    );
    let mut events = EventStream::new();

    loop {
        terminal.draw(|f| render::draw(f, &state, data))?;

        let Some(event) = events.next().await else {
            return Ok(());
        };
        let Event::Key(key) = event? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match handle_key(&mut state, data, key) {
            Action::None => {}
            Action::Quit => return Ok(()),
            Action::Toggle { profile, list } => {
                state.busy = true;
                state.status = Some("Updating list...".to_string());
                terminal.draw(|f| render::draw(f, &state, data))?;

                let outcome = match ensure_fresh_session(api, session).await {
                    Ok(()) => toggle_membership(api, session, data, profile, list).await,
                    Err(e) => Err(e),
                };
                state.busy = false;
                match outcome {
                    Ok(now_member) => {
                        let p = &data.profiles[profile];
                        let l = &data.lists[list];
                        let msg = if now_member {
                            format!("added @{} to {}", p.handle, l.name)
                        } else {
                            format!("removed @{} from {}", p.handle, l.name)
                        };
                        state.status = None;
                        state.push_log("INFO", msg);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to update list membership");
                        state.status = Some(format!("Failed to update list membership: {}", e));
                        state.push_log("ERROR", e.to_string());
                    }
                }
            }
        }
    }
}

/// Apply a key press to the UI state and report what the loop must do.
pub fn handle_key(state: &mut AppState, data: &AggregatedData, key: KeyEvent) -> Action {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }
    if state.busy {
        return Action::None;
    }

    match state.mode {
        InputMode::Search => {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => state.mode = InputMode::Browse,
                KeyCode::Backspace => {
                    let mut input = state.search_input.clone();
                    input.pop();
                    state.set_search(input, data);
                }
                KeyCode::Char(c) => {
                    let mut input = state.search_input.clone();
                    input.push(c);
                    state.set_search(input, data);
                }
                _ => {}
            }
            Action::None
        }
        InputMode::Browse if state.log_focus => {
            match key.code {
                KeyCode::Esc | KeyCode::Char('L') => state.log_focus = false,
                KeyCode::Char('j') | KeyCode::Down => {
                    state.log_scroll_offset = state.log_scroll_offset.saturating_sub(1);
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    state.log_scroll_offset = state.log_scroll_offset.saturating_add(1);
                }
                KeyCode::Char('q') => return Action::Quit,
                _ => {}
            }
            Action::None
        }
        InputMode::Browse => match key.code {
            KeyCode::Char('q') => Action::Quit,
            KeyCode::Char('/') => {
                state.mode = InputMode::Search;
                Action::None
            }
            KeyCode::Char('n') => {
                state.toggle_not_in_list_only(data);
                Action::None
            }
            KeyCode::Char('L') => {
                state.log_focus = true;
                state.log_scroll_offset = 0;
                Action::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                state.select_next();
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                state.select_prev();
                Action::None
            }
            KeyCode::PageDown => {
                state.page_down(PAGE);
                Action::None
            }
            KeyCode::PageUp => {
                state.page_up(PAGE);
                Action::None
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Tab => {
                state.next_list(data.lists.len());
                Action::None
            }
            KeyCode::Left | KeyCode::Char('h') | KeyCode::BackTab => {
                state.prev_list(data.lists.len());
                Action::None
            }
            KeyCode::Char(' ') | KeyCode::Enter => match state.selected_profile() {
                Some(profile) if state.list_cursor < data.lists.len() => Action::Toggle {
                    profile,
                    list: state.list_cursor,
                },
                _ => Action::None,
            },
            _ => Action::None,
        },
    }
}
