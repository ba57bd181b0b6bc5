use std::io;
use std::path::PathBuf;
use std::time::Duration;

use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::layout::Rect;
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::auth::Identity;
use crate::editor;
use crate::error::{Error, Result};
use crate::persist;
use crate::render::Interaction;
use crate::service::{self, SubmitOutcome};
use crate::state::*;
use crate::store::SurveyStore;

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Collaborators the form talks to while it runs.
pub struct Session<'a> {
    pub store: &'a dyn SurveyStore,
    pub data_dir: PathBuf,
    pub user: Option<Identity>,
}

pub fn run_tui(mut state: FormState, session: &Session<'_>) -> Result<FormState> {
    enable_raw_mode().map_err(Error::Terminal)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(Error::Terminal)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(Error::Terminal)?;

    let result = main_loop(&mut terminal, &mut state, session);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();

    result.map(|_| state)
}

fn main_loop(terminal: &mut Term, state: &mut FormState, session: &Session<'_>) -> Result<()> {
    loop {
        terminal
            .draw(|f| crate::ui::draw(f, state))
            .map_err(Error::Terminal)?;

        if state.should_quit {
            break;
        }

        if !event::poll(Duration::from_millis(200)).map_err(Error::Terminal)? {
            continue;
        }
        match event::read().map_err(Error::Terminal)? {
            Event::Key(key) if key.kind != KeyEventKind::Release => {
                handle_key(key, state, terminal, session)?;
            }
            Event::Mouse(mouse) => {
                let size = terminal.size().unwrap_or_default();
                handle_mouse(mouse, state, Rect::new(0, 0, size.width, size.height));
            }
            _ => {}
        }

        if state.dirty && state.submitted.is_none() {
            if let Err(e) = persist::save_draft(&session.data_dir, &state.survey, &state.answers) {
                tracing::warn!(error = %e, "draft save failed");
                state.notice = Some(e.to_string());
            }
            state.dirty = false;
        }
    }

    Ok(())
}

fn handle_key(
    key: KeyEvent,
    state: &mut FormState,
    terminal: &mut Term,
    session: &Session<'_>,
) -> Result<()> {
    if state.has_dialog() {
        handle_dialog_key(key, state, session);
        return Ok(());
    }

    match state.input_mode {
        InputMode::TextEdit => handle_text_key(key, state),
        InputMode::Picker => handle_picker_key(key, state),
        InputMode::Navigation => handle_nav_key(key, state, terminal)?,
    }
    Ok(())
}

fn handle_nav_key(key: KeyEvent, state: &mut FormState, terminal: &mut Term) -> Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl {
        match key.code {
            KeyCode::Char('q') => state.push_dialog(Dialog::ConfirmQuit),
            KeyCode::Char('s') => {
                if state.check_submit() {
                    state.notice = None;
                    state.push_dialog(Dialog::ConfirmSubmit);
                }
            }
            KeyCode::Char('n') => state.add_instance(),
            KeyCode::Char('e') => edit_externally(state, terminal)?,
            _ => {}
        }
        return Ok(());
    }

    state.notice = None;
    match key.code {
        KeyCode::Tab => {
            state.active_panel = match state.active_panel {
                ActivePanel::Sidebar => ActivePanel::Main,
                ActivePanel::Main => ActivePanel::Sidebar,
            };
        }
        KeyCode::Up if state.active_panel == ActivePanel::Sidebar => state.prev_question(),
        KeyCode::Down if state.active_panel == ActivePanel::Sidebar => state.next_question(),
        KeyCode::Up => state.move_row(-1),
        KeyCode::Down => state.move_row(1),
        KeyCode::PageUp | KeyCode::Left => state.prev_question(),
        KeyCode::PageDown | KeyCode::Right => state.next_question(),
        KeyCode::Home => state.navigate_to(0),
        KeyCode::End => state.navigate_to(state.visible.len().saturating_sub(1)),
        KeyCode::Enter | KeyCode::Char(' ') => {
            state.active_panel = ActivePanel::Main;
            state.activate();
        }
        KeyCode::Delete => state.remove_focused_instance(),
        KeyCode::Char('?') => state.push_dialog(Dialog::Help),
        _ => {}
    }
    Ok(())
}

fn handle_text_key(key: KeyEvent, state: &mut FormState) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let Some(edit) = state.text_edit.as_mut() else {
        state.input_mode = InputMode::Navigation;
        return;
    };
    match key.code {
        KeyCode::Esc => state.cancel_text(),
        KeyCode::Char('s') if ctrl => state.commit_text(),
        KeyCode::Enter if edit.multiline => edit.insert('\n'),
        KeyCode::Enter => state.commit_text(),
        KeyCode::Char(c) if !ctrl => edit.insert(c),
        KeyCode::Backspace => edit.backspace(),
        KeyCode::Delete => edit.delete(),
        KeyCode::Left => edit.left(),
        KeyCode::Right => edit.right(),
        KeyCode::Home => edit.home(),
        KeyCode::End => edit.end(),
        _ => {}
    }
}

fn handle_picker_key(key: KeyEvent, state: &mut FormState) {
    let Some(picker) = state.picker.as_mut() else {
        state.input_mode = InputMode::Navigation;
        return;
    };
    match key.code {
        KeyCode::Esc => state.cancel_pick(),
        KeyCode::Enter => state.commit_pick(),
        KeyCode::Up => picker.move_cursor(-1),
        KeyCode::Down => picker.move_cursor(1),
        KeyCode::PageUp => picker.move_cursor(-10),
        KeyCode::PageDown => picker.move_cursor(10),
        KeyCode::Backspace => picker.pop_filter(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            picker.push_filter(c)
        }
        _ => {}
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut FormState, session: &Session<'_>) {
    let Some(dialog) = state.top_dialog().cloned() else {
        return;
    };
    match (dialog, key.code) {
        (_, KeyCode::Esc) => {
            state.pop_dialog();
        }
        (Dialog::ConfirmQuit, KeyCode::Enter) => {
            state.pop_dialog();
            state.should_quit = true;
        }
        (Dialog::ConfirmSubmit, KeyCode::Enter) => {
            state.pop_dialog();
            do_submit(state, session);
        }
        (Dialog::Help, _) => {
            state.pop_dialog();
        }
        _ => {}
    }
}

/// Store the response. Failures leave the answers in memory and in the draft.
fn do_submit(state: &mut FormState, session: &Session<'_>) {
    let outcome = service::submit(
        session.store,
        &state.survey,
        &state.answers,
        session.user.as_ref(),
        state.labels(),
    );
    match outcome {
        Ok(SubmitOutcome::Stored(id)) => {
            tracing::info!(action = "form/submit", survey = %state.survey.id, response = %id, "response submitted");
            if let Err(e) = persist::clear_draft(&session.data_dir, &state.survey.id) {
                tracing::warn!(error = %e, "draft not cleared");
            }
            state.submitted = Some(id);
            state.notice = None;
            state.should_quit = true;
        }
        Ok(SubmitOutcome::Rejected(errors)) => {
            state.errors = errors;
            state.check_submit();
        }
        Err(e) => {
            tracing::warn!(error = %e, "submit failed");
            state.notice = Some(format!("Submit failed: {}", e));
        }
    }
}

/// Ctrl+E: edit the focused textarea answer in `$EDITOR`.
fn edit_externally(state: &mut FormState, terminal: &mut Term) -> Result<()> {
    let Some((id, current)) = state.external_edit_target() else {
        return Ok(());
    };

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture).ok();

    let edited = editor::open_editor(&current);

    execute!(terminal.backend_mut(), EnterAlternateScreen, EnableMouseCapture).ok();
    enable_raw_mode().map_err(Error::Terminal)?;
    terminal.clear().map_err(Error::Terminal)?;

    match edited {
        Ok(text) => {
            if let Err(e) = state.apply(&id, Interaction::Text(text)) {
                state.notice = Some(e.to_string());
            }
        }
        Err(e) => state.notice = Some(e.to_string()),
    }
    Ok(())
}

fn handle_mouse(mouse: MouseEvent, state: &mut FormState, size: Rect) {
    if state.has_dialog() || state.input_mode != InputMode::Navigation {
        return;
    }
    let layout = crate::ui::layout::compute_layout(size);
    let in_rect = |r: Rect| {
        mouse.column >= r.x
            && mouse.column < r.x + r.width
            && mouse.row >= r.y
            && mouse.row < r.y + r.height
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if in_rect(layout.sidebar) => {
            let height = layout.sidebar.height.saturating_sub(1) as usize;
            let offset = if state.current >= state.sidebar_scroll + height {
                state.current.saturating_sub(height.saturating_sub(1))
            } else {
                state.sidebar_scroll.min(state.current)
            };
            let relative = mouse.row.saturating_sub(layout.sidebar.y + 1) as usize;
            state.active_panel = ActivePanel::Sidebar;
            state.navigate_to(offset + relative);
        }
        MouseEventKind::ScrollUp if in_rect(layout.main) => {
            state.question_scroll = state.question_scroll.saturating_sub(1);
        }
        MouseEventKind::ScrollDown if in_rect(layout.main) => {
            state.question_scroll += 1;
        }
        MouseEventKind::ScrollUp if in_rect(layout.sidebar) => state.prev_question(),
        MouseEventKind::ScrollDown if in_rect(layout.sidebar) => state.next_question(),
        _ => {}
    }
}
