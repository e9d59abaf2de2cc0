//! Event loop and key handling.
//!
//! The loop drains completed store requests, draws a frame, then waits up to
//! 100ms for a key. Keys are routed by [`InputMode`].
//!
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;

use crate::app::form::{FormErrors, UserForm};
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState, Screen};
use crate::store::{Applied, Operation};
use crate::ui;

/// Whether the loop should keep running after a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: AppState) -> Result<()> {
    app.store.spawn_load_all();

    loop {
        for applied in app.store.poll() {
            on_applied(&mut app, applied);
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(&mut app, key) == Flow::Quit
        {
            break;
        }
    }
    tracing::info!(uptime = ?app.started_at.elapsed(), "exiting");
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Flow {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Flow::Quit;
    }
    match app.input_mode {
        InputMode::Normal => handle_list_key(app, key),
        InputMode::Form => {
            handle_form_key(app, key);
            Flow::Continue
        }
        InputMode::Modal => {
            handle_modal_key(app, key);
            Flow::Continue
        }
    }
}

fn handle_list_key(app: &mut AppState, key: KeyEvent) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    let len = app.store.users().len();
    let rpp = app.rows_per_page.max(1);
    // rows are hidden behind the error text until a reload succeeds
    let rows_hidden = len == 0 || app.store.error().is_some();
    if matches!(action, KeyAction::EnterAction | KeyAction::DeleteSelection) && rows_hidden {
        let message = match app.store.error() {
            Some(err) => format!("{err}. Press r to reload."),
            None if app.store.is_loading() => "Users are still loading.".to_string(),
            None => "There are no users. Press n to create one.".to_string(),
        };
        app.open_modal(ModalState::Info { message });
        return Flow::Continue;
    }
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::NewUser => open_create(app),
        KeyAction::EnterAction => {
            if let Some(id) = app.selected_user().map(|u| u.id) {
                open_detail(app, id);
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(u) = app.selected_user() {
                let modal = ModalState::DeleteConfirm { id: u.id, name: u.name.clone(), selected: 1 };
                app.open_modal(modal);
            }
        }
        KeyAction::Reload => {
            app.store.spawn_load_all();
            app.status = Some("Reloading...".to_string());
        }
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected_index + 1 < len {
                app.selected_index += 1;
            }
        }
        KeyAction::PageUp => app.selected_index = app.selected_index.saturating_sub(rpp),
        KeyAction::PageDown => {
            app.selected_index = app.selected_index.saturating_add(rpp).min(len.saturating_sub(1));
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

/// Route to the detail screen. The form is only built if the record exists.
pub fn open_detail(app: &mut AppState, id: u64) {
    app.screen = Screen::Detail { id };
    app.form = app.store.get(id).map(UserForm::for_user);
    app.input_mode = InputMode::Form;
}

pub fn open_create(app: &mut AppState) {
    app.screen = Screen::Create;
    app.form = Some(UserForm::blank());
    app.input_mode = InputMode::Form;
}

fn drop_form(app: &mut AppState) {
    if let Some(ticket) = app.form.take().and_then(|f| f.pending) {
        app.store.cancel(ticket);
        tracing::debug!(?ticket, "form dismissed with save in flight");
    }
}

/// Drop the edit form once its record has left the store. Returns true if it did.
fn discard_orphaned_form(app: &mut AppState) -> bool {
    let Screen::Detail { id } = app.screen else {
        return false;
    };
    if app.store.get(id).is_some() {
        return false;
    }
    if app.form.is_some() {
        tracing::debug!(id, "record gone, discarding its edit form");
        drop_form(app);
    }
    true
}

/// Back to the list. A save still in flight is cancelled.
pub fn close_form(app: &mut AppState) {
    drop_form(app);
    app.screen = Screen::List;
    app.input_mode = InputMode::Normal;
    app.clamp_selection();
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        close_form(app);
        return;
    }
    if discard_orphaned_form(app) {
        return;
    }
    let Some(form) = app.form.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => form.focus_prev(),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Enter => submit_form(app),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => form.insert_char(c),
        _ => {}
    }
}

/// Validate the open form and dispatch a create or update.
pub fn submit_form(app: &mut AppState) {
    if discard_orphaned_form(app) {
        return;
    }
    let Some(form) = app.form.as_mut() else {
        return;
    };
    if form.pending.is_some() {
        return;
    }
    match form.validate() {
        Err(errors) => form.errors = errors,
        Ok(draft) => {
            form.errors = FormErrors::default();
            let ticket = match form.target {
                Some(id) => app.store.spawn_update(id, draft.into()),
                None => app.store.spawn_create(draft),
            };
            form.pending = Some(ticket);
            app.status = Some("Saving...".to_string());
        }
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    let Some(modal) = app.modal.as_mut() else {
        app.close_modal();
        return;
    };
    match modal {
        ModalState::DeleteConfirm { id, selected, .. } => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => *selected = 1 - (*selected).min(1),
            KeyCode::Char('y') => {
                let id = *id;
                confirm_delete(app, id);
            }
            KeyCode::Enter => {
                let (id, yes) = (*id, *selected == 0);
                if yes {
                    confirm_delete(app, id);
                } else {
                    app.close_modal();
                }
            }
            KeyCode::Esc | KeyCode::Char('n') => app.close_modal(),
            _ => {}
        },
        ModalState::Info { .. } => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                app.close_modal();
            }
        }
        ModalState::Help { scroll } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') => app.close_modal(),
            _ => {}
        },
    }
}

fn confirm_delete(app: &mut AppState, id: u64) {
    app.store.spawn_delete(id);
    app.status = Some("Deleting...".to_string());
    app.close_modal();
}

/// React to a request result that the store has just applied.
pub fn on_applied(app: &mut AppState, applied: Applied) {
    let form_ticket = app.form.as_ref().and_then(|f| f.pending);
    if form_ticket == Some(applied.ticket) {
        if applied.succeeded {
            let created = applied.operation == Operation::Create;
            app.form = None;
            app.screen = Screen::List;
            if app.modal.is_none() {
                app.input_mode = InputMode::Normal;
            }
            if created {
                app.selected_index = app.store.users().len().saturating_sub(1);
            }
            app.status = Some(if created { "User created" } else { "User updated" }.to_string());
        } else {
            // the form stays as it was; the list shows the error slot
            if let Some(form) = app.form.as_mut() {
                form.pending = None;
            }
            app.status = None;
        }
    } else if applied.succeeded {
        match applied.operation {
            Operation::Fetch => {
                app.status = Some(format!("Loaded {} users", app.store.users().len()));
            }
            Operation::Delete => app.status = Some("User deleted".to_string()),
            Operation::Create | Operation::Update => {}
        }
    } else {
        app.status = app.store.error().map(str::to_string);
    }
    app.clamp_selection();
}
