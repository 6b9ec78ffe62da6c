//! Text-input forms shared by the login, signup and dashboard screens.

use std::fmt;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use super::Notice;
use crate::tui::styles::MedicalTheme;

/// Longest value a field accepts, in characters.
const MAX_FIELD_CHARS: usize = 128;

/// Buffer size that holds `MAX_FIELD_CHARS` of any width, so typing never
/// reallocates and leaves stale copies of a password behind.
const FIELD_CAPACITY: usize = MAX_FIELD_CHARS * 4;

/// Form field definition
pub struct TextField {
    pub label: &'static str,
    pub hint: &'static str,
    pub value: String,
    /// Render as bullets (passwords).
    pub masked: bool,
}

impl TextField {
    #[must_use]
    pub fn new(label: &'static str, hint: &'static str) -> Self {
        Self {
            label,
            hint,
            value: String::with_capacity(FIELD_CAPACITY),
            masked: false,
        }
    }

    #[must_use]
    pub fn masked(label: &'static str, hint: &'static str) -> Self {
        let mut field = Self::new(label, hint);
        field.masked = true;
        field
    }

    /// Text to draw for the current value.
    #[must_use]
    pub fn display_value(&self) -> String {
        if self.masked {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

impl fmt::Debug for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = if self.masked { "<redacted>" } else { self.value.as_str() };
        f.debug_struct("TextField")
            .field("label", &self.label)
            .field("value", &value)
            .finish_non_exhaustive()
    }
}

impl Drop for TextField {
    fn drop(&mut self) {
        self.value.zeroize();
    }
}

/// Field values plus the focused field and the footer notice.
#[derive(Debug)]
pub struct FormState {
    pub fields: Vec<TextField>,
    pub selected_field: usize,
    pub notice: Option<Notice>,
}

impl FormState {
    /// Build a form; `fields` must not be empty.
    #[must_use]
    pub fn new(fields: Vec<TextField>) -> Self {
        debug_assert!(!fields.is_empty());
        Self {
            fields,
            selected_field: 0,
            notice: None,
        }
    }

    /// Move to the next field
    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    /// Move to the previous field
    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Add a character to the current field
    pub fn input_char(&mut self, c: char) {
        let field = &mut self.fields[self.selected_field];
        if !c.is_control() && field.value.chars().count() < MAX_FIELD_CHARS {
            field.value.push(c);
            self.notice = None;
        }
    }

    /// Delete the last character
    pub fn delete_char(&mut self) {
        let value = &mut self.fields[self.selected_field].value;
        if let Some((idx, _)) = value.char_indices().next_back() {
            // `pop` would leave the removed bytes in spare capacity.
            let mut kept = String::with_capacity(FIELD_CAPACITY);
            kept.push_str(&value[..idx]);
            value.zeroize();
            *value = kept;
        }
    }

    /// Clear the current field
    pub fn clear_field(&mut self) {
        self.fields[self.selected_field].value.zeroize();
    }

    /// Wipe every field and go back to the first one.
    pub fn clear(&mut self) {
        for field in &mut self.fields {
            field.value.zeroize();
        }
        self.selected_field = 0;
    }

    /// Value of field `index`, empty if out of range.
    #[must_use]
    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }
}

/// Render the fields stacked (`Direction::Vertical`) or side by side.
///
/// `focused` is false when keyboard focus is elsewhere on the screen, so no
/// field gets the cursor.
pub fn render_fields(
    f: &mut Frame,
    area: Rect,
    form: &FormState,
    direction: Direction,
    focused: bool,
) {
    let field_height = 3;
    let constraints: Vec<Constraint> = match direction {
        Direction::Vertical => form
            .fields
            .iter()
            .map(|_| Constraint::Length(field_height))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect(),
        Direction::Horizontal => form
            .fields
            .iter()
            .map(|_| Constraint::Ratio(1, form.fields.len() as u32))
            .collect(),
    };

    let chunks = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_selected = focused && i == form.selected_field;
        let border_style = if is_selected {
            MedicalTheme::border_focused()
        } else {
            MedicalTheme::border()
        };

        let title_style = if is_selected {
            MedicalTheme::focused()
        } else {
            MedicalTheme::text_secondary()
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let value_display = if field.value.is_empty() {
            Span::styled(field.hint, MedicalTheme::text_muted())
        } else {
            Span::styled(field.display_value(), MedicalTheme::text())
        };

        let content = Paragraph::new(Line::from(vec![
            Span::raw(" "),
            value_display,
            if is_selected {
                Span::styled("▌", MedicalTheme::cursor())
            } else {
                Span::raw("")
            },
        ]))
        .block(block);

        f.render_widget(content, chunks[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_fields() -> FormState {
        FormState::new(vec![
            TextField::new("Username", "username"),
            TextField::masked("Password", "password"),
        ])
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = two_fields();
        form.prev_field();
        assert_eq!(form.selected_field, 1);
        form.next_field();
        assert_eq!(form.selected_field, 0);
    }

    #[test]
    fn test_typing_goes_to_selected_field() {
        let mut form = two_fields();
        for c in "alice".chars() {
            form.input_char(c);
        }
        form.next_field();
        form.input_char('p');
        form.input_char('w');
        form.input_char('\u{7}');

        assert_eq!(form.value(0), "alice");
        assert_eq!(form.value(1), "pw");
        assert_eq!(form.fields[1].display_value(), "••");
        assert_eq!(form.value(9), "");
        assert!(!format!("{form:?}").contains("pw"));
    }

    #[test]
    fn test_input_clears_notice() {
        let mut form = two_fields();
        form.notice = Some(Notice::error("Invalid credentials."));
        form.input_char('a');
        assert!(form.notice.is_none());
    }

    #[test]
    fn test_delete_and_clear() {
        let mut form = two_fields();
        form.input_char('a');
        form.input_char('b');
        form.delete_char();
        assert_eq!(form.value(0), "a");

        form.next_field();
        form.input_char('x');
        form.clear();
        assert_eq!(form.value(0), "");
        assert_eq!(form.value(1), "");
        assert_eq!(form.selected_field, 0);
    }

    #[test]
    fn test_typing_never_grows_the_buffer() {
        let mut form = two_fields();
        form.next_field();
        let capacity = form.fields[1].value.capacity();
        for _ in 0..MAX_FIELD_CHARS {
            form.input_char('\u{1F48A}');
        }
        assert_eq!(form.value(1).chars().count(), MAX_FIELD_CHARS);
        assert_eq!(form.fields[1].value.capacity(), capacity);

        form.delete_char();
        assert_eq!(form.value(1).chars().count(), MAX_FIELD_CHARS - 1);
        assert!(form.fields[1].value.capacity() >= FIELD_CAPACITY);
    }

    #[test]
    fn test_field_length_is_capped() {
        let mut form = two_fields();
        for _ in 0..MAX_FIELD_CHARS + 10 {
            form.input_char('a');
        }
        assert_eq!(form.value(0).len(), MAX_FIELD_CHARS);
    }
}
