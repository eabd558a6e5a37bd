//! Sortable, filterable table with loading placeholder rows

use std::cmp::Ordering;

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::admin_tui::{traits::Navigable, ui::Styles};

const SKELETON_CHAR: char = '░';

/// Label shown in the action column of real rows
pub const ROW_ACTIONS: &str = "e edit · d delete";

/// One column: key, header text, and how to render a present row
pub struct Column<T> {
    pub key: &'static str,
    pub header: &'static str,
    pub cell: fn(&T) -> String,
    pub sortable: bool,
    /// Width of the loading placeholder drawn in this column
    pub skeleton_width: usize,
}

impl<T> Column<T> {
    pub fn new(key: &'static str, header: &'static str, cell: fn(&T) -> String) -> Self {
        Self {
            key,
            header,
            cell,
            sortable: false,
            skeleton_width: 12,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn with_skeleton_width(mut self, width: usize) -> Self {
        self.skeleton_width = width;
        self
    }

    /// Render a row; `None` is a placeholder and never reaches `cell`
    pub fn render_cell(&self, row: Option<&T>) -> String {
        match row {
            Some(record) => (self.cell)(record),
            None => SKELETON_CHAR.to_string().repeat(self.skeleton_width),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column: usize,
    pub direction: SortDirection,
}

/// Configuration for table display
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    pub title: String,
    /// Key of the column the free-text filter applies to
    pub filter_key: &'static str,
}

impl DataTableConfig {
    pub fn new(title: &str, filter_key: &'static str) -> Self {
        Self {
            title: title.to_string(),
            filter_key,
        }
    }
}

/// Table over rows that may be placeholders (`None`) while data loads
pub struct DataTable<T> {
    pub columns: Vec<Column<T>>,
    pub config: DataTableConfig,
    pub state: TableState,
    rows: Vec<Option<T>>,
    filter: String,
    sort: Option<SortState>,
    focused_column: usize,
}

impl<T> DataTable<T> {
    pub fn new(columns: Vec<Column<T>>, config: DataTableConfig) -> Self {
        Self {
            columns,
            config,
            state: TableState::default(),
            rows: Vec::new(),
            filter: String::new(),
            sort: None,
            focused_column: 0,
        }
    }

    /// Replace all rows and keep the selection in range
    pub fn set_rows(&mut self, rows: Vec<Option<T>>) {
        self.rows = rows;
        self.clamp_selection();
    }

    pub fn rows(&self) -> &[Option<T>] {
        &self.rows
    }

    pub fn placeholder_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_none()).count()
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        self.clamp_selection();
    }

    pub fn push_filter_char(&mut self, c: char) {
        self.filter.push(c);
        self.clamp_selection();
    }

    pub fn pop_filter_char(&mut self) {
        self.filter.pop();
        self.clamp_selection();
    }

    pub fn sort(&self) -> Option<SortState> {
        self.sort
    }

    pub fn focused_column(&self) -> usize {
        self.focused_column
    }

    pub fn focus_next_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = (self.focused_column + 1) % self.columns.len();
        }
    }

    pub fn focus_previous_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = if self.focused_column == 0 {
                self.columns.len() - 1
            } else {
                self.focused_column - 1
            };
        }
    }

    /// Toggle sorting on a column: ascending first, then flipping direction.
    /// Returns false when the column is not sortable.
    pub fn toggle_sort(&mut self, column: usize) -> bool {
        match self.columns.get(column) {
            Some(c) if c.sortable => {}
            _ => return false,
        }

        self.sort = Some(match self.sort {
            Some(SortState {
                column: current,
                direction: SortDirection::Ascending,
            }) if current == column => SortState {
                column,
                direction: SortDirection::Descending,
            },
            _ => SortState {
                column,
                direction: SortDirection::Ascending,
            },
        });
        true
    }

    pub fn toggle_sort_on_focused(&mut self) -> bool {
        self.toggle_sort(self.focused_column)
    }

    /// Header text with the sort indicator
    pub fn header_label(&self, column: usize) -> String {
        let Some(col) = self.columns.get(column) else {
            return String::new();
        };
        match self.sort {
            Some(SortState { column: c, direction }) if c == column => {
                let arrow = match direction {
                    SortDirection::Ascending => "▲",
                    SortDirection::Descending => "▼",
                };
                format!("{} {}", col.header, arrow)
            }
            _ => col.header.to_string(),
        }
    }

    /// Indices into `rows` after filtering and sorting.
    ///
    /// Descending order is the exact reverse of the stable ascending order.
    /// Placeholders are never filtered out and stay after real rows.
    pub fn view_indices(&self) -> Vec<usize> {
        let needle = self.filter.to_lowercase();
        let filter_col = self.columns.iter().find(|c| c.key == self.config.filter_key);

        let mut real = Vec::new();
        let mut placeholders = Vec::new();
        for (idx, row) in self.rows.iter().enumerate() {
            match row {
                None => placeholders.push(idx),
                Some(record) => {
                    let keep = match (needle.is_empty(), filter_col) {
                        (true, _) | (false, None) => true,
                        (false, Some(col)) => (col.cell)(record).to_lowercase().contains(&needle),
                    };
                    if keep {
                        real.push(idx);
                    }
                }
            }
        }

        if let Some(sort) = self.sort {
            if let Some(col) = self.columns.get(sort.column) {
                let mut keyed: Vec<(usize, String)> = real
                    .iter()
                    .filter_map(|&idx| self.rows[idx].as_ref().map(|r| (idx, (col.cell)(r))))
                    .collect();
                keyed.sort_by(|a, b| compare_cells(&a.1, &b.1));
                real = keyed.into_iter().map(|(idx, _)| idx).collect();
                if sort.direction == SortDirection::Descending {
                    real.reverse();
                }
            }
        }

        real.extend(placeholders);
        real
    }

    /// Rows in display order
    pub fn visible_rows(&self) -> Vec<Option<&T>> {
        self.view_indices()
            .into_iter()
            .map(|idx| self.rows[idx].as_ref())
            .collect()
    }

    /// Selected record; `None` when nothing is selected or on a placeholder
    pub fn selected_record(&self) -> Option<&T> {
        let selected = self.state.selected()?;
        let idx = *self.view_indices().get(selected)?;
        self.rows[idx].as_ref()
    }

    fn clamp_selection(&mut self) {
        let count = self.view_indices().len();
        match self.state.selected() {
            _ if count == 0 => self.state.select(None),
            Some(i) if i >= count => self.state.select(Some(count - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    /// Render the table
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let header_cells: Vec<Cell> = (0..self.columns.len())
            .map(|i| {
                let style = if i == self.focused_column {
                    Styles::title().add_modifier(ratatui::style::Modifier::UNDERLINED)
                } else {
                    Styles::title()
                };
                Cell::from(Span::styled(self.header_label(i), style))
            })
            .chain(std::iter::once(Cell::from(Span::styled("Actions", Styles::title()))))
            .collect();

        let visible = self.visible_rows();
        let total_real = self.rows.len() - self.placeholder_count();
        let shown_real = visible.iter().filter(|r| r.is_some()).count();

        let rows: Vec<Row> = visible
            .iter()
            .map(|row| {
                let style = if row.is_some() {
                    Style::default()
                } else {
                    Styles::skeleton()
                };
                let mut cells: Vec<Cell> = self
                    .columns
                    .iter()
                    .map(|col| Cell::from(col.render_cell(*row)))
                    .collect();
                let actions = if row.is_some() { ROW_ACTIONS } else { "" };
                cells.push(Cell::from(actions).style(Styles::inactive()));
                Row::new(cells).style(style)
            })
            .collect();

        let mut widths: Vec<Constraint> = self
            .columns
            .iter()
            .map(|c| Constraint::Min(c.skeleton_width as u16))
            .collect();
        widths.push(Constraint::Length(ROW_ACTIONS.chars().count() as u16));

        let mut title = if self.rows.is_empty() {
            format!("{} (Empty)", self.config.title)
        } else if shown_real == 0 && total_real == 0 {
            format!("{} (Loading...)", self.config.title)
        } else {
            format!("{} ({}/{})", self.config.title, shown_real, total_real)
        };
        if !self.filter.is_empty() {
            title = format!("{} - filter: {}", title, self.filter);
        }

        let table = Table::new(rows, widths)
            .header(Row::new(header_cells).bottom_margin(1))
            .block(
                Block::default()
                    .title(Line::from(title))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

/// Numeric cells compare as numbers, everything else case-insensitively
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}

impl<T> Navigable for DataTable<T> {
    fn navigate_up(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        let new_selected = if selected == 0 { count - 1 } else { selected - 1 };
        self.state.select(Some(new_selected));
    }

    fn navigate_down(&mut self) {
        let count = self.get_item_count();
        if count == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        self.state.select(Some((selected + 1) % count));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.view_indices().len()
    }
}
