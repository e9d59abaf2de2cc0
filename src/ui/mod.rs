//! Frame rendering: header, routed screen, status bar and modals.
//!
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState, Screen};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());

    let route = match app.screen {
        Screen::List => "[List]".to_string(),
        Screen::Detail { id } => format!("[User {id}]"),
        Screen::Create => "[New user]".to_string(),
    };
    let header = Paragraph::new(format!(
        "{}  {}  users:{}  ?: help; q: quit",
        app.base_url,
        route,
        app.store.users().len()
    ))
    .block(
        Block::default()
            .title("User Management")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    match app.screen {
        Screen::List => users::render_users_table(f, root[1], app),
        Screen::Detail { id } => match (app.store.get(id), app.form.as_ref()) {
            (Some(_), Some(form)) => users::render_user_form(f, root[1], app, form),
            _ => users::render_not_found(f, root[1], app),
        },
        Screen::Create => {
            if let Some(form) = app.form.as_ref() {
                users::render_user_form(f, root[1], app, form);
            }
        }
    }

    components::render_status_bar(f, root[2], app);

    if let Some(state) = app.modal.clone() {
        let area = f.area();
        match state {
            ModalState::DeleteConfirm { .. } => users::render_delete_modal(f, area, app, &state),
            ModalState::Info { .. } => components::render_info_modal(f, area, app, &state),
            ModalState::Help { scroll } => components::render_help_modal(f, area, app, scroll),
        }
    }
}
