use crossterm::event::KeyCode;

use crate::ui::chart::Indicator;
use crate::window::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Quit,
    Up,
    Down,
    Left,
    Right,
    Open,
    Back,
    SetRange(DateRange),
    NextRange,
    PrevRange,
    ToggleOverlay(Indicator),
}

/// Keys understood on every screen.
pub fn parse_global_command(key_code: &KeyCode) -> Option<UiCommand> {
    match key_code {
        KeyCode::Char(c) if c.eq_ignore_ascii_case(&'q') => Some(UiCommand::Quit),
        KeyCode::Esc | KeyCode::Backspace => Some(UiCommand::Back),
        _ => None,
    }
}

pub fn parse_overview_command(key_code: &KeyCode) -> Option<UiCommand> {
    if let Some(cmd) = parse_global_command(key_code) {
        return Some(cmd);
    }
    match key_code {
        KeyCode::Up => Some(UiCommand::Up),
        KeyCode::Down => Some(UiCommand::Down),
        KeyCode::Left => Some(UiCommand::Left),
        KeyCode::Right => Some(UiCommand::Right),
        KeyCode::Enter => Some(UiCommand::Open),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'k' => Some(UiCommand::Up),
            'j' => Some(UiCommand::Down),
            'h' => Some(UiCommand::Left),
            'l' => Some(UiCommand::Right),
            'o' => Some(UiCommand::Open),
            _ => None,
        },
        _ => None,
    }
}

pub fn parse_detail_command(key_code: &KeyCode) -> Option<UiCommand> {
    if let Some(cmd) = parse_global_command(key_code) {
        return Some(cmd);
    }
    match key_code {
        KeyCode::Up => Some(UiCommand::Up),
        KeyCode::Down => Some(UiCommand::Down),
        KeyCode::Left => Some(UiCommand::PrevRange),
        KeyCode::Right | KeyCode::Tab => Some(UiCommand::NextRange),
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            '1' => Some(UiCommand::SetRange(DateRange::OneMonth)),
            '2' => Some(UiCommand::SetRange(DateRange::ThreeMonths)),
            '3' => Some(UiCommand::SetRange(DateRange::SixMonths)),
            '4' => Some(UiCommand::SetRange(DateRange::OneYear)),
            '5' => Some(UiCommand::SetRange(DateRange::All)),
            '[' => Some(UiCommand::PrevRange),
            ']' => Some(UiCommand::NextRange),
            'a' => Some(UiCommand::ToggleOverlay(Indicator::Ma5)),
            's' => Some(UiCommand::ToggleOverlay(Indicator::Ma20)),
            'd' => Some(UiCommand::ToggleOverlay(Indicator::Ma60)),
            'k' => Some(UiCommand::Up),
            'j' => Some(UiCommand::Down),
            _ => None,
        },
        _ => None,
    }
}
