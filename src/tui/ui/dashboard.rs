//! Dashboard view: the signed-in user's medicine table and add form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use super::form::{render_fields, FormState, TextField};
use super::{render_footer, render_header};
use crate::domain::{Medicine, Session};
use crate::tui::styles::MedicalTheme;

pub const NAME: usize = 0;
pub const DOSAGE: usize = 1;
pub const TIME: usize = 2;

/// Which part of the dashboard receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Form,
    Table,
}

/// Dashboard state for rendering.
///
/// Built from a [`Session`] on login and dropped on logout.
#[derive(Debug)]
pub struct DashboardState {
    pub session: Session,
    pub medicines: Vec<Medicine>,
    pub table: TableState,
    pub form: FormState,
    pub focus: Focus,
}

impl DashboardState {
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self {
            session,
            medicines: Vec::new(),
            table: TableState::default(),
            form: FormState::new(vec![
                TextField::new("Medicine Name", "e.g. Aspirin"),
                TextField::new("Dosage", "e.g. 1 pill"),
                TextField::new("Time", "e.g. 8:00 AM"),
            ]),
            focus: Focus::Form,
        }
    }

    /// Replace the table contents, keeping the selection in range.
    pub fn set_medicines(&mut self, medicines: Vec<Medicine>) {
        self.medicines = medicines;
        let selected = match (self.table.selected(), self.medicines.len()) {
            (_, 0) => None,
            (Some(i), len) => Some(i.min(len - 1)),
            (None, _) => None,
        };
        self.table.select(selected);
    }

    #[must_use]
    pub fn selected_medicine(&self) -> Option<&Medicine> {
        self.table.selected().and_then(|i| self.medicines.get(i))
    }

    pub fn select_next(&mut self) {
        if self.medicines.is_empty() {
            return;
        }
        let next = match self.table.selected() {
            Some(i) if i + 1 < self.medicines.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.table.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.medicines.is_empty() {
            return;
        }
        let prev = match self.table.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.table.select(Some(prev));
    }

    /// Tab order: Medicine Name → Dosage → Time → table → Medicine Name.
    pub fn focus_next(&mut self) {
        match self.focus {
            Focus::Form if self.form.selected_field + 1 == self.form.fields.len() => {
                self.focus = Focus::Table;
                if self.table.selected().is_none() && !self.medicines.is_empty() {
                    self.table.select(Some(0));
                }
            }
            Focus::Form => self.form.next_field(),
            Focus::Table => {
                self.focus = Focus::Form;
                self.form.selected_field = 0;
            }
        }
    }

    pub fn focus_prev(&mut self) {
        match self.focus {
            Focus::Form if self.form.selected_field == 0 => {
                self.focus = Focus::Table;
                if self.table.selected().is_none() && !self.medicines.is_empty() {
                    self.table.select(Some(0));
                }
            }
            Focus::Form => self.form.prev_field(),
            Focus::Table => {
                self.focus = Focus::Form;
                self.form.selected_field = self.form.fields.len() - 1;
            }
        }
    }
}

/// Render the dashboard.
pub fn render_dashboard(f: &mut Frame, area: Rect, state: &mut DashboardState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(5),    // Medicine table
            Constraint::Length(3), // Add form
            Constraint::Length(3), // Footer
        ])
        .split(area);

    let now = chrono::Local::now().format("%a %d %b, %H:%M").to_string();
    render_header(
        f,
        chunks[0],
        &format!("Welcome, {}", state.session.username),
        &now,
    );
    render_table(f, chunks[1], state);
    render_fields(
        f,
        chunks[2],
        &state.form,
        Direction::Horizontal,
        state.focus == Focus::Form,
    );

    let hints: &[(&str, &str)] = match state.focus {
        Focus::Form => &[
            ("Tab", "Next"),
            ("Enter", "Add Medicine"),
            ("↑↓", "Select"),
            ("Esc", "Logout"),
        ],
        Focus::Table => &[
            ("Tab", "Form"),
            ("↑↓", "Select"),
            ("Del", "Delete Selected"),
            ("F5", "Refresh"),
            ("Esc", "Logout"),
        ],
    };
    render_footer(f, chunks[3], state.form.notice.as_ref(), hints);
}

fn render_table(f: &mut Frame, area: Rect, state: &mut DashboardState) {
    let border_style = if state.focus == Focus::Table {
        MedicalTheme::border_focused()
    } else {
        MedicalTheme::border()
    };

    let block = Block::default()
        .title(Span::styled(" My Medicines ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(border_style);

    if state.medicines.is_empty() {
        let empty_msg = Paragraph::new(Line::from(vec![Span::styled(
            "No medicines yet. Fill in the form below and press [Enter].",
            MedicalTheme::text_muted(),
        )]))
        .block(block);
        f.render_widget(empty_msg, area);
        return;
    }

    let header = Row::new(["ID", "Medicine", "Dosage", "Time"].map(Cell::from))
        .style(MedicalTheme::header());

    let rows = state.medicines.iter().enumerate().map(|(i, m)| {
        let style = if i % 2 == 1 {
            MedicalTheme::row_alt()
        } else {
            MedicalTheme::text()
        };
        Row::new(vec![
            Cell::from(m.id.to_string()),
            Cell::from(m.name.clone()),
            Cell::from(m.dosage.clone()),
            Cell::from(m.time.clone()),
        ])
        .style(style)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Percentage(40),
            Constraint::Percentage(30),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(MedicalTheme::selected())
    .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, &mut state.table);
}
