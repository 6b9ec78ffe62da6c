//! Signup screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::Span,
    widgets::{Block, Borders},
    Frame,
};

use super::form::{render_fields, FormState, TextField};
use super::{centered_rect, render_footer, render_header};
use crate::tui::styles::MedicalTheme;

pub const USERNAME: usize = 0;
pub const EMAIL: usize = 1;
pub const PASSWORD: usize = 2;

#[derive(Debug)]
pub struct SignupState {
    pub form: FormState,
}

impl Default for SignupState {
    fn default() -> Self {
        Self {
            form: FormState::new(vec![
                TextField::new("Username", "pick a username"),
                TextField::new("Email", "you@example.com"),
                TextField::masked("Password", "choose a password"),
            ]),
        }
    }
}

pub fn render_signup(f: &mut Frame, area: Rect, state: &SignupState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(f, chunks[0], "Create an Account", "Medischeduler");

    let card = centered_rect(48, 13, chunks[1]);
    let block = Block::default()
        .title(Span::styled(" New account ", MedicalTheme::subtitle()))
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
            ("Enter", "Create Account"),
            ("Esc", "Back to Login"),
        ],
    );
}
