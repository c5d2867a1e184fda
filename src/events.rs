use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};

use coldwatch_types::TimeRange;

use crate::app::{Action, App, Tab};
use crate::ui::common::tab_title;

/// Default file written by the export key.
pub const EXPORT_FILE: &str = "coldwatch_export.json";

/// Row of the tab bar (below the header).
const TAB_ROW: u16 = 1;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Map a key press to an action.
pub fn key_action(show_help: bool, key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    // If help is shown, any key closes it
    if show_help {
        return Some(Action::ToggleHelp);
    }

    let action = match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Action::PrevTab,
        KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => Action::NextTab,
        KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => Action::PrevTab,

        KeyCode::Char('1') => Action::SwitchTab(Tab::Live),
        KeyCode::Char('2') => Action::SwitchTab(Tab::Analytics),
        KeyCode::Char('3') => Action::SwitchTab(Tab::Alerts),
        KeyCode::Char('4') => Action::SwitchTab(Tab::Trends),

        KeyCode::Char('m') | KeyCode::Char(' ') => Action::ToggleMonitoring,
        KeyCode::Char('c') => Action::ClearAlerts,
        KeyCode::Char('r') => Action::Refresh,

        // Trends range
        KeyCode::Char('t') => Action::CycleTimeRange,
        KeyCode::Char('!') => Action::SetTimeRange(TimeRange::Hour),
        KeyCode::Char('@') => Action::SetTimeRange(TimeRange::SixHours),
        KeyCode::Char('#') => Action::SetTimeRange(TimeRange::Day),
        KeyCode::Char('$') => Action::SetTimeRange(TimeRange::Week),

        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Char('e') => Action::Export(PathBuf::from(EXPORT_FILE)),
        KeyCode::Char('u') => Action::EditThreshold,

        _ => return None,
    };
    Some(action)
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // Threshold prompt captures keystrokes
    if app.threshold_input_active {
        if key.kind != KeyEventKind::Release {
            handle_threshold_input(app, key);
        }
        return;
    }

    if let Some(action) = key_action(app.show_help, key) {
        app.dispatch(action);
    }
}

fn handle_threshold_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_threshold_input(),
        KeyCode::Esc => app.cancel_threshold_input(),
        KeyCode::Backspace => app.threshold_input_pop(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.cancel_threshold_input()
        }
        KeyCode::Char(c) => app.threshold_input_push(c),
        _ => {}
    }
}

/// Map a mouse event to an action.
pub fn mouse_action(mouse: MouseEvent) -> Option<Action> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if mouse.row == TAB_ROW => {
            tab_at_column(mouse.column).map(Action::SwitchTab)
        }
        MouseEventKind::ScrollDown => Some(Action::NextTab),
        MouseEventKind::ScrollUp => Some(Action::PrevTab),
        _ => None,
    }
}

/// Handle mouse events
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if let Some(action) = mouse_action(mouse) {
        app.dispatch(action);
    }
}

/// Find the tab under a column of the tab bar.
///
/// Each title is drawn with one cell of padding on either side and tabs are
/// separated by a one-cell divider.
fn tab_at_column(column: u16) -> Option<Tab> {
    let mut start = 0u16;
    for tab in Tab::ALL {
        let width = tab_title(tab).chars().count() as u16 + 2;
        if column < start + width {
            return Some(tab);
        }
        start += width + 1;
    }
    None
}
