//! Login screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

use super::form::{render_fields, FormState, TextField};
use super::{centered_rect, render_footer, render_header, Notice};
use crate::tui::styles::MedicalTheme;

pub const USERNAME: usize = 0;
pub const PASSWORD: usize = 1;

/// Login form state
#[derive(Debug)]
pub struct LoginState {
    pub form: FormState,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            form: FormState::new(vec![
                TextField::new("Username", "your username"),
                TextField::masked("Password", "your password"),
            ]),
        }
    }
}

impl LoginState {
    /// Fresh login screen showing `notice`, e.g. after signup or logout.
    #[must_use]
    pub fn with_notice(notice: Notice) -> Self {
        let mut state = Self::default();
        state.form.notice = Some(notice);
        state
    }

    /// Pre-fill the username and put the cursor on the password.
    #[must_use]
    pub fn with_username(mut self, username: &str) -> Self {
        self.form.fields[USERNAME].value.push_str(username);
        self.form.selected_field = PASSWORD;
        self
    }
}

/// Render the login screen
pub fn render_login(f: &mut Frame, area: Rect, state: &LoginState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_header(f, chunks[0], "Medischeduler Login", "Your medication schedule");

    let card = centered_rect(48, 10, chunks[1]);
    let block = Block::default()
        .title(Span::styled(" Sign in ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());
    let inner = block.inner(card);
    f.render_widget(block, card);
    render_fields(f, inner, &state.form, Direction::Vertical, true);

    render_footer(
        f,
        chunks[2],
        state.form.notice.as_ref(),
        &[
            ("Tab", "Next field"),
            ("Enter", "Login"),
            ("F2", "Create a new account"),
            ("Esc", "Quit"),
        ],
    );
}
