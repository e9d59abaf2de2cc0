use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::form::{FormField, UserForm};
use crate::app::{AppState, ModalState};

fn framed<'a>(title: &'a str, app: &AppState) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border))
}

/// Users table, or the loading/error text in its place.
pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    if app.store.is_loading() {
        let p = Paragraph::new("Loading...").style(Style::default().fg(app.theme.muted)).block(framed("Users", app));
        f.render_widget(p, area);
        return;
    }
    if let Some(err) = app.store.error() {
        let p = Paragraph::new(err.to_string())
            .style(Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD))
            .block(framed("Users", app));
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let users = app.store.users();
    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(users.len());
    let slice = users.get(start..end).unwrap_or(&[]);

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let mut style = Style::default().fg(app.theme.text);
        if absolute_index % 2 == 1 {
            style = style.bg(app.theme.row_alt_bg);
        }
        if absolute_index == app.selected_index {
            style = style
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD);
        }
        Row::new(vec![
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.phone.clone()),
        ])
        .style(style)
    });

    let widths = [Constraint::Percentage(30), Constraint::Percentage(40), Constraint::Percentage(30)];
    let header = Row::new(vec!["Name", "Email", "Phone"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let table = Table::new(rows, widths)
        .header(header)
        .block(framed("Users", app))
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Edit/create form with inline validation messages.
pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState, form: &UserForm) {
    let label_w = FormField::ALL.iter().map(|fl| fl.label().len()).max().unwrap_or(0);
    let mut lines: Vec<Line> = Vec::new();
    for (idx, field) in FormField::ALL.iter().enumerate() {
        let focused = idx == form.focus;
        let marker = if focused { "▶ " } else { "  " };
        let label = format!("{marker}{:>width$}: ", field.label(), width = label_w);
        let mut value = form.value(*field).to_string();
        if focused {
            value.push('_');
        }
        let value_style = if focused {
            Style::default().fg(app.theme.highlight_fg)
        } else {
            Style::default().fg(app.theme.text)
        };
        lines.push(Line::from(vec![
            Span::styled(label, Style::default().fg(app.theme.title)),
            Span::styled(value, value_style),
        ]));
        if let Some(msg) = form.errors.get(*field) {
            lines.push(Line::from(Span::styled(
                format!("{}{msg}", " ".repeat(label_w + 4)),
                Style::default().fg(app.theme.error),
            )));
        }
    }
    lines.push(Line::raw(""));
    let button = if form.pending.is_some() {
        "Saving...".to_string()
    } else {
        format!("[ {} ]  (Enter)", form.submit_label())
    };
    lines.push(Line::from(Span::styled(button, Style::default().add_modifier(Modifier::BOLD))));
    lines.push(Line::from(Span::styled(
        "Tab/Up/Down: field  Esc: back to list",
        Style::default().fg(app.theme.muted),
    )));

    let title = match form.target {
        Some(id) => format!("Edit user {id}"),
        None => "New user".to_string(),
    };
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(framed(&title, app));
    f.render_widget(p, area);
}

pub fn render_not_found(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new("User not found\n\nEsc: back to list")
        .style(Style::default().fg(app.theme.text))
        .block(framed("User", app));
    f.render_widget(p, area);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::DeleteConfirm { id, name, selected } = state {
        let rect = crate::ui::components::centered_rect(50, 7, area);
        let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
        let no = if *selected == 1 { "[No]" } else { " No " };
        let body = format!("Delete user '{name}' (id {id})?\n\n  {yes}    {no}");
        let p = Paragraph::new(body).block(framed("Confirm delete", app));
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}
