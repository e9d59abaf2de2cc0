//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::{KeyAction, format_action};
use crate::app::{AppState, InputMode, ModalState};

/// Render the bottom status bar with mode, in-flight requests and the last message.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Form => "FORM",
        InputMode::Modal => "MODAL",
    };
    let mut msg = format!("mode: {mode}  users:{}", app.store.users().len());
    let pending = app.store.in_flight();
    if pending > 0 {
        msg.push_str(&format!("  requests:{pending}"));
    }
    if let Some(status) = &app.status {
        msg.push_str("  ");
        msg.push_str(status);
    }
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 40u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone()).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help modal from the active keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines: Vec<Line> = vec![Line::from(Span::styled("User list", bold))];
    let list_actions = [
        (KeyAction::MoveUp, "Move up"),
        (KeyAction::MoveDown, "Move down"),
        (KeyAction::PageUp, "Page up"),
        (KeyAction::PageDown, "Page down"),
        (KeyAction::EnterAction, "Edit selected user"),
        (KeyAction::NewUser, "Create user"),
        (KeyAction::DeleteSelection, "Delete selected user"),
        (KeyAction::Reload, "Reload from server"),
        (KeyAction::OpenHelp, "This help"),
        (KeyAction::Quit, "Quit"),
    ];
    for (action, label) in list_actions {
        let keys = app.keymap.keys_for(action);
        let keys = if keys.is_empty() { format!("(unbound: {})", format_action(action)) } else { keys.join(", ") };
        lines.push(Line::from(vec![Span::raw(format!("  {label}: ")), Span::styled(keys, italic)]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Form", bold)));
    for (keys, label) in [
        ("Tab / Down", "Next field"),
        ("Shift+Tab / Up", "Previous field"),
        ("Enter", "Save"),
        ("Esc", "Back to list"),
    ] {
        lines.push(Line::from(vec![Span::raw(format!("  {label}: ")), Span::styled(keys, italic)]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![Span::raw("Close help: "), Span::styled("Esc / Enter", italic)]));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((scroll, 0)).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_fits_inside_small_area() {
        let area = Rect { x: 0, y: 0, width: 20, height: 5 };
        let r = centered_rect(50, 7, area);
        assert_eq!((r.x, r.y, r.width, r.height), (0, 0, 20, 5));
        let r = centered_rect(10, 3, area);
        assert_eq!((r.x, r.y), (5, 1));
    }
}
