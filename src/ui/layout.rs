use ratatui::layout::{Constraint, Layout, Rect};

pub struct FormLayout {
    pub titlebar: Rect,
    pub sidebar: Rect,
    pub main: Rect,
    pub statusbar: Rect,
    pub keybar: Rect,
}

/// Below this width the sidebar is dropped.
const MIN_WIDTH_FOR_SIDEBAR: u16 = 60;

fn sidebar_width(total: u16) -> u16 {
    if total < MIN_WIDTH_FOR_SIDEBAR {
        0
    } else {
        (total / 3).clamp(24, 36)
    }
}

pub fn compute_layout(area: Rect) -> FormLayout {
    let [titlebar, middle, statusbar, keybar] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(5),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    let [sidebar, main] = Layout::horizontal([
        Constraint::Length(sidebar_width(area.width)),
        Constraint::Min(20),
    ])
    .areas(middle);

    FormLayout {
        titlebar,
        sidebar,
        main,
        statusbar,
        keybar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_terminal_hides_sidebar() {
        let layout = compute_layout(Rect::new(0, 0, 50, 20));
        assert_eq!(layout.sidebar.width, 0);
        assert_eq!(layout.main.width, 50);

        let wide = compute_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(wide.sidebar.width, 36);
        assert_eq!(wide.keybar.y, 39);
    }
}
