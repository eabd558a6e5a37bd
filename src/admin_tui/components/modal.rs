//! Overlay dialog with a single open flag

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Clear},
    Frame,
};

use crate::admin_tui::ui::{centered_rect, Styles};

/// A titled overlay. `toggle` is the only state transition.
#[derive(Debug, Clone, Default)]
pub struct Modal {
    pub title: String,
    open: bool,
    width_percent: u16,
    height_percent: u16,
}

impl Modal {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            open: false,
            width_percent: 60,
            height_percent: 60,
        }
    }

    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    pub fn with_size(mut self, width_percent: u16, height_percent: u16) -> Self {
        self.width_percent = width_percent;
        self.height_percent = height_percent;
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    /// Draw the frame over `area` and hand the inner area to `body`.
    /// Nothing is drawn while closed.
    pub fn render<F>(&self, f: &mut Frame, area: Rect, body: F)
    where
        F: FnOnce(&mut Frame, Rect),
    {
        if !self.open {
            return;
        }

        let popup = centered_rect(self.width_percent, self.height_percent, area);
        let block = Block::default()
            .title(self.title.as_str())
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(popup);

        f.render_widget(Clear, popup);
        f.render_widget(block, popup);
        body(f, inner);
    }
}
