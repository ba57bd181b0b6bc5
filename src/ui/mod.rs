pub mod dialog;
pub mod keybar;
pub mod layout;
pub mod markdown;
pub mod question;
pub mod sidebar;
pub mod statusbar;
pub mod titlebar;

use ratatui::Frame;

use crate::state::{FormState, InputMode};

pub fn draw(f: &mut Frame, state: &FormState) {
    let area = f.area();
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    sidebar::draw_sidebar(f, layout.sidebar, state);
    question::draw_question(f, layout.main, state);
    statusbar::draw_statusbar(f, layout.statusbar, state);
    keybar::draw_keybar(f, layout.keybar, state);

    match state.input_mode {
        InputMode::TextEdit => dialog::draw_text_edit(f, area, state),
        InputMode::Picker => dialog::draw_picker(f, area, state),
        InputMode::Navigation => {}
    }

    if state.has_dialog() {
        dialog::draw_dialog(f, area, state);
    }
}
