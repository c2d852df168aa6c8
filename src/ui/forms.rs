use anyhow::{anyhow, Context, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::actions::{Action, FieldKind, FieldSpec, Request};

/// State of the modal that collects an action's arguments.
#[derive(Clone)]
pub(crate) struct ActionForm {
    pub(crate) action: Action,
    pub(crate) values: Vec<String>,
    pub(crate) active: usize,
    pub(crate) error: Option<String>,
}

impl ActionForm {
    pub(crate) fn new(action: Action) -> Self {
        Self {
            action,
            values: vec![String::new(); action.fields().len()],
            active: 0,
            error: None,
        }
    }

    pub(crate) fn fields(&self) -> &'static [FieldSpec] {
        self.action.fields()
    }

    /// Move focus to the next field, wrapping around.
    pub(crate) fn next_field(&mut self) {
        if !self.values.is_empty() {
            self.active = (self.active + 1) % self.values.len();
        }
    }

    pub(crate) fn previous_field(&mut self) {
        if !self.values.is_empty() {
            self.active = (self.active + self.values.len() - 1) % self.values.len();
        }
    }

    /// Append a character to the focused field. Integer fields only take
    /// digits; a signed field also takes a leading minus.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        let Some(spec) = self.fields().get(self.active) else {
            return false;
        };
        let accepted = match spec.kind {
            FieldKind::Integer => ch.is_ascii_digit(),
            FieldKind::SignedInteger => {
                ch.is_ascii_digit() || (ch == '-' && self.values[self.active].is_empty())
            }
            FieldKind::Text => !ch.is_control(),
        };
        if accepted {
            self.values[self.active].push(ch);
        }
        accepted
    }

    pub(crate) fn backspace(&mut self) {
        if let Some(value) = self.values.get_mut(self.active) {
            value.pop();
        }
    }

    /// Trimmed text of a required field.
    fn text(&self, idx: usize) -> Result<String> {
        let trimmed = self.values[idx].trim();
        if trimmed.is_empty() {
            return Err(anyhow!("{} is required.", self.fields()[idx].label));
        }
        Ok(trimmed.to_string())
    }

    /// Required field kept exactly as typed.
    fn raw_text(&self, idx: usize) -> Result<String> {
        self.text(idx)?;
        Ok(self.values[idx].clone())
    }

    fn integer(&self, idx: usize) -> Result<i64> {
        let label = self.fields()[idx].label;
        let raw = self.text(idx)?;
        raw.parse::<i64>()
            .with_context(|| format!("{label} must be a whole number."))
    }

    /// Presence-check every field and build the typed request.
    pub(crate) fn parse_inputs(&self) -> Result<Request> {
        let request = match self.action {
            Action::AddMember => Request::AddMember {
                name: self.text(0)?,
                email: self.text(1)?,
            },
            Action::ListMembers => Request::ListMembers,
            Action::FindMember => Request::FindMembers { name: self.text(0)? },
            Action::AddBook => Request::AddBook {
                title: self.text(0)?,
                author: self.text(1)?,
                year: self.integer(2)?,
            },
            Action::ListBooks => Request::ListBooks,
            Action::FindBook => Request::FindBooks {
                title: self.text(0)?,
            },
            Action::LendBook => Request::Lend {
                member_id: self.integer(0)?,
                book_id: self.integer(1)?,
            },
            Action::ReturnBook => Request::Return {
                member_id: self.integer(0)?,
                book_id: self.integer(1)?,
            },
            Action::ActiveLoans => Request::ActiveLoans,
            Action::AddComment => Request::AddComment {
                member_id: self.integer(0)?,
                book_id: self.integer(1)?,
                text: self.raw_text(2)?,
            },
            Action::BookComments => Request::BookComments {
                book_id: self.integer(0)?,
            },
        };
        Ok(request)
    }

    /// Render one labelled field, highlighting the focused one.
    pub(crate) fn build_line(&self, idx: usize) -> Line<'static> {
        let spec = self.fields()[idx];
        let value = &self.values[idx];
        let is_active = idx == self.active;

        let display = if value.is_empty() {
            "<required>".to_string()
        } else {
            value.clone()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", spec.label)),
            Span::styled(display, style),
        ])
    }

    /// Column and row of the text cursor relative to the form body.
    pub(crate) fn cursor_offset(&self) -> (u16, u16) {
        let Some(spec) = self.fields().get(self.active) else {
            return (0, 0);
        };
        let prefix = spec.label.chars().count() + 2;
        let typed = self.values[self.active].chars().count();
        ((prefix + typed) as u16, self.active as u16)
    }
}
