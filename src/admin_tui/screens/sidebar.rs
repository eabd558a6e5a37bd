//! Sidebar with one link per entity route

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::admin_tui::ui::Styles;
use crate::models::EntityKind;
use crate::nav::{sidebar_links, NavLink};

pub struct Sidebar {
    pub links: Vec<NavLink>,
}

impl Default for Sidebar {
    fn default() -> Self {
        Self::new()
    }
}

impl Sidebar {
    pub fn new() -> Self {
        Self {
            links: sidebar_links(),
        }
    }

    /// Kind behind the 1-based shortcut key shown next to each link
    pub fn kind_for_shortcut(&self, c: char) -> Option<EntityKind> {
        let index = c.to_digit(10)?.checked_sub(1)? as usize;
        self.links.get(index).map(|l| l.kind)
    }

    /// Link after the active one, wrapping around
    pub fn next_kind(&self, current: EntityKind) -> EntityKind {
        let position = self.links.iter().position(|l| l.kind == current).unwrap_or(0);
        self.links
            .get((position + 1) % self.links.len().max(1))
            .map(|l| l.kind)
            .unwrap_or(current)
    }

    pub fn render(&self, f: &mut Frame, area: Rect, current_path: &str) {
        let items: Vec<ListItem> = self
            .links
            .iter()
            .enumerate()
            .map(|(i, link)| {
                let (marker, style) = if link.is_active(current_path) {
                    ("▸ ", Styles::active_link())
                } else {
                    ("  ", Styles::default())
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{}{} ", marker, i + 1), Styles::inactive()),
                    Span::styled(link.label.clone(), style),
                ]))
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .title("Dashboard")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );

        f.render_widget(list, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortcuts_map_to_links() {
        let sidebar = Sidebar::new();
        assert_eq!(sidebar.kind_for_shortcut('1'), Some(EntityKind::Category));
        assert_eq!(sidebar.kind_for_shortcut('4'), Some(EntityKind::Role));
        assert_eq!(sidebar.kind_for_shortcut('0'), None);
        assert_eq!(sidebar.kind_for_shortcut('9'), None);
    }

    #[test]
    fn test_next_kind_wraps() {
        let sidebar = Sidebar::new();
        assert_eq!(sidebar.next_kind(EntityKind::Category), EntityKind::Location);
        assert_eq!(sidebar.next_kind(EntityKind::Role), EntityKind::Category);
    }
}
