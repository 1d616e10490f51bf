use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    JumpTop,
    ToggleAutoscroll,
    /// Transient pause, the hover analog
    TogglePause,
    SpeedUp,
    SpeedDown,
    /// Select the tile under the cursor; permanently stops autoscroll
    Select,
    ClearSelection,
    SelectionDown,
    SelectionUp,
    ToggleStar,
    NextFeed,
    PrevFeed,
    MoreColumns,
    FewerColumns,
    CycleSort,
    Refresh,
    None,
}

/// Map a key press to an action
pub fn map_key(key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Down => Action::ScrollDown,
        KeyCode::Up => Action::ScrollUp,
        KeyCode::PageDown | KeyCode::Char('d') => Action::PageDown,
        KeyCode::PageUp | KeyCode::Char('u') => Action::PageUp,
        KeyCode::Home | KeyCode::Char('g') => Action::JumpTop,
        KeyCode::Char('a') | KeyCode::Char(' ') => Action::ToggleAutoscroll,
        KeyCode::Char('p') => Action::TogglePause,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::SpeedUp,
        KeyCode::Char('-') => Action::SpeedDown,
        KeyCode::Enter => Action::Select,
        KeyCode::Esc => Action::ClearSelection,
        KeyCode::Char('j') => Action::SelectionDown,
        KeyCode::Char('k') => Action::SelectionUp,
        KeyCode::Char('s') => Action::ToggleStar,
        KeyCode::Tab => Action::NextFeed,
        KeyCode::BackTab => Action::PrevFeed,
        KeyCode::Char(']') => Action::MoreColumns,
        KeyCode::Char('[') => Action::FewerColumns,
        KeyCode::Char('o') => Action::CycleSort,
        KeyCode::Char('r') => Action::Refresh,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_basic_bindings() {
        assert_eq!(map_key(key(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(map_key(key(KeyCode::Char('a'))), Action::ToggleAutoscroll);
        assert_eq!(map_key(key(KeyCode::Enter)), Action::Select);
        assert_eq!(map_key(key(KeyCode::Char('x'))), Action::None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut k = key(KeyCode::Char('c'));
        k.modifiers = KeyModifiers::CONTROL;
        assert_eq!(map_key(k), Action::Quit);
    }
}
