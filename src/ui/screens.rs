use ratatui::style::{Color, Style};

use super::actions::{Action, SECTIONS};

/// Cursor over the grid of menu columns.
#[derive(Default)]
pub(crate) struct Menu {
    pub(crate) section: usize,
    pub(crate) row: usize,
}

impl Menu {
    pub(crate) fn current_action(&self) -> Action {
        SECTIONS[self.section].actions[self.row]
    }

    /// Jump to a neighbouring column, keeping the row when it exists there.
    pub(crate) fn move_horizontal(&mut self, offset: isize) {
        let last = SECTIONS.len() as isize - 1;
        self.section = (self.section as isize + offset).clamp(0, last) as usize;
        self.clamp_row();
    }

    pub(crate) fn move_vertical(&mut self, offset: isize) {
        let last = SECTIONS[self.section].actions.len() as isize - 1;
        self.row = (self.row as isize + offset).clamp(0, last) as usize;
    }

    fn clamp_row(&mut self) {
        let len = SECTIONS[self.section].actions.len();
        if self.row >= len {
            self.row = len.saturating_sub(1);
        }
    }
}

/// Severity of a result dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum MessageKind {
    Info,
    Warning,
    Error,
}

impl MessageKind {
    pub(crate) fn style(self) -> Style {
        match self {
            MessageKind::Info => Style::default().fg(Color::Green),
            MessageKind::Warning => Style::default().fg(Color::Yellow),
            MessageKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Dialog showing the outcome of an action. Long listings scroll.
#[derive(Debug, Clone)]
pub(crate) struct MessageView {
    pub(crate) title: String,
    pub(crate) lines: Vec<String>,
    pub(crate) kind: MessageKind,
    pub(crate) scroll: u16,
}

impl MessageView {
    pub(crate) fn new(title: impl Into<String>, kind: MessageKind, lines: Vec<String>) -> Self {
        Self {
            title: title.into(),
            lines,
            kind,
            scroll: 0,
        }
    }

    pub(crate) fn info(title: impl Into<String>, line: impl Into<String>) -> Self {
        Self::new(title, MessageKind::Info, vec![line.into()])
    }

    pub(crate) fn warning(title: impl Into<String>, line: impl Into<String>) -> Self {
        Self::new(title, MessageKind::Warning, vec![line.into()])
    }

    pub(crate) fn error(title: impl Into<String>, line: impl Into<String>) -> Self {
        Self::new(title, MessageKind::Error, vec![line.into()])
    }

    /// A list result, or `empty` when nothing matched.
    pub(crate) fn listing<T: ToString>(
        title: impl Into<String>,
        rows: &[T],
        empty_title: impl Into<String>,
        empty: impl Into<String>,
    ) -> Self {
        if rows.is_empty() {
            Self::info(empty_title, empty)
        } else {
            let lines = rows.iter().map(ToString::to_string).collect();
            Self::new(title, MessageKind::Info, lines)
        }
    }

    pub(crate) fn scroll_by(&mut self, offset: i32) {
        let max = self.lines.len().saturating_sub(1) as i32;
        self.scroll = (self.scroll as i32 + offset).clamp(0, max) as u16;
    }
}
