use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::club::Club;
use crate::db::{LendOutcome, ReturnOutcome};
use crate::error::StoreError;

use super::actions::{Request, SECTIONS};
use super::forms::ActionForm;
use super::helpers::{centered_rect, key_hints, surface_error};
use super::screens::{Menu, MessageKind, MessageView};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;

/// What currently has the keyboard.
enum Mode {
    Normal,
    Editing(ActionForm),
    Message(MessageView),
}

/// Footer line left behind by the last action.
struct StatusMessage {
    text: String,
    kind: MessageKind,
}

/// Central application state shared across the TUI.
pub struct App {
    club: Club,
    menu: Menu,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(club: Club) -> Self {
        Self {
            club,
            menu: Menu::default(),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Feed one key press through the state machine. Returns `true` when the
    /// user asked to quit. An unreachable store is returned as an error.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Editing(form) => self.handle_form_key(code, form)?,
            Mode::Message(view) => self.handle_message_key(code, view),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => *exit = true,
            KeyCode::Left => self.menu.move_horizontal(-1),
            KeyCode::Right | KeyCode::Tab => self.menu.move_horizontal(1),
            KeyCode::BackTab => self.menu.move_horizontal(-1),
            KeyCode::Up => self.menu.move_vertical(-1),
            KeyCode::Down => self.menu.move_vertical(1),
            KeyCode::Enter => {
                self.clear_status();
                let action = self.menu.current_action();
                let form = ActionForm::new(action);
                if action.needs_input() {
                    return Ok(Mode::Editing(form));
                }
                return self.submit(form);
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_form_key(&mut self, code: KeyCode, mut form: ActionForm) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status(
                    format!("{} cancelled.", form.action.label()),
                    MessageKind::Info,
                );
                return Ok(Mode::Normal);
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => return self.submit(form),
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::Editing(form))
    }

    fn handle_message_key(&mut self, code: KeyCode, mut view: MessageView) -> Mode {
        match code {
            KeyCode::Up => view.scroll_by(-1),
            KeyCode::Down => view.scroll_by(1),
            KeyCode::PageUp => view.scroll_by(-10),
            KeyCode::PageDown => view.scroll_by(10),
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => return Mode::Normal,
            _ => {}
        }
        Mode::Message(view)
    }

    /// Validate the form and run its request. Validation and storage problems
    /// keep the form open with the message; everything else ends in a dialog.
    fn submit(&mut self, mut form: ActionForm) -> Result<Mode> {
        let request = match form.parse_inputs() {
            Ok(request) => request,
            Err(err) => {
                form.error = Some(err.to_string());
                return Ok(Mode::Editing(form));
            }
        };

        match self.execute(request) {
            Ok(view) => {
                self.set_status(view.title.clone(), view.kind);
                Ok(Mode::Message(view))
            }
            Err(err) if StoreError::find(&err).is_some() => Err(err),
            Err(err) => {
                let message = surface_error(&err);
                tracing::error!(
                    action = form.action.label(),
                    error = %format!("{err:#}"),
                    "action failed"
                );
                self.set_status(message.clone(), MessageKind::Error);
                if form.action.needs_input() {
                    form.error = Some(message);
                    Ok(Mode::Editing(form))
                } else {
                    Ok(Mode::Message(MessageView::error("Error", message)))
                }
            }
        }
    }

    /// Run one club operation and phrase its result for the dialog.
    fn execute(&self, request: Request) -> Result<MessageView> {
        let view = match request {
            Request::AddMember { name, email } => {
                let member = self.club.add_member(&name, &email)?;
                MessageView::info(
                    "Success",
                    format!("Member '{}' added with ID {}.", member.name, member.id),
                )
            }
            Request::ListMembers => MessageView::listing(
                "Members",
                &self.club.list_members()?,
                "No members",
                "The club has no members yet.",
            ),
            Request::FindMembers { name } => MessageView::listing(
                "Member found",
                &self.club.find_members_by_name(&name)?,
                "No member found",
                format!("No member found with the name: {name}"),
            ),
            Request::AddBook {
                title,
                author,
                year,
            } => {
                let book = self.club.add_book(&title, &author, year)?;
                MessageView::info(
                    "Success",
                    format!("Book '{}' added with ID {}.", book.title, book.id),
                )
            }
            Request::ListBooks => MessageView::listing(
                "Books",
                &self.club.list_books()?,
                "No books",
                "The library is empty.",
            ),
            Request::FindBooks { title } => MessageView::listing(
                "Book found",
                &self.club.find_books_by_title(&title)?,
                "No book found",
                format!("No book found with the title: {title}"),
            ),
            Request::Lend { member_id, book_id } => {
                match self.club.lend_book(member_id, book_id)? {
                    LendOutcome::Lent(loan) => MessageView::info(
                        "Success",
                        format!(
                            "Book ID {} lent to member ID {} on {}.",
                            loan.book_id, loan.member_id, loan.loaned_on
                        ),
                    ),
                    LendOutcome::AlreadyLoaned { book_id } => MessageView::warning(
                        "Not lent",
                        format!("Book ID {book_id} is already on loan."),
                    ),
                }
            }
            Request::Return { member_id, book_id } => {
                match self.club.return_book(member_id, book_id)? {
                    ReturnOutcome::Returned { returned_on, .. } => MessageView::info(
                        "Success",
                        format!(
                            "Book ID {book_id} returned by member ID {member_id} on {returned_on}."
                        ),
                    ),
                    ReturnOutcome::NoActiveLoan { member_id, book_id } => MessageView::warning(
                        "Not returned",
                        format!(
                            "No active loan found for member ID {member_id} and book ID {book_id}."
                        ),
                    ),
                }
            }
            Request::ActiveLoans => MessageView::listing(
                "Books currently out",
                &self.club.list_active_loans()?,
                "No active loans",
                "Every book is on the shelf.",
            ),
            Request::AddComment {
                member_id,
                book_id,
                text,
            } => {
                let comment = self.club.add_comment(member_id, book_id, &text)?;
                MessageView::info(
                    "Success",
                    format!(
                        "Comment added for book ID {book_id} by member ID {member_id} (sentiment {:+.2}).",
                        comment.sentiment
                    ),
                )
            }
            Request::BookComments { book_id } => MessageView::listing(
                format!("Comments on book {book_id}"),
                &self.club.list_comments_for_book(book_id)?,
                "No comments",
                format!("Nobody has commented on book ID {book_id} yet."),
            ),
        };
        Ok(view)
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        // Too short for both: the menu gets the whole screen.
        let (content_area, footer_area) = if area.height > FOOTER_HEIGHT {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(FOOTER_HEIGHT)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        } else {
            (area, None)
        };

        self.draw_menu(frame, content_area);
        if let Some(footer_area) = footer_area {
            self.draw_footer(frame, footer_area);
        }

        match &self.mode {
            Mode::Normal => {}
            Mode::Editing(form) => self.draw_form(frame, area, form),
            Mode::Message(view) => self.draw_message(frame, area, view),
        }
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let outer = Block::default()
            .title(" Reading Club ")
            .borders(Borders::ALL);
        frame.render_widget(outer.clone(), area);
        let inner = outer.inner(area);

        let constraints = vec![Constraint::Ratio(1, SECTIONS.len() as u32); SECTIONS.len()];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(inner);

        for (idx, (section, column)) in SECTIONS.iter().zip(columns.iter()).enumerate() {
            let focused = idx == self.menu.section;
            let border_style = if focused {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let items: Vec<ListItem> = section
                .actions
                .iter()
                .map(|action| ListItem::new(action.label()))
                .collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .title(section.title)
                        .borders(Borders::ALL)
                        .border_style(border_style),
                )
                .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED))
                .highlight_symbol("> ");

            let mut state = ListState::default().with_selected(focused.then_some(self.menu.row));
            frame.render_stateful_widget(list, *column, &mut state);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = match &self.status {
            Some(status) => Line::from(vec![Span::styled(
                status.text.clone(),
                status.kind.style(),
            )]),
            None => Line::from(""),
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        match &self.mode {
            Mode::Normal => key_hints(&[
                ("←→", "Section"),
                ("↑↓", "Action"),
                ("Enter", "Run"),
                ("q", "Quit"),
            ]),
            Mode::Editing(_) => key_hints(&[
                ("Tab", "Next field"),
                ("Enter", "Submit"),
                ("Esc", "Cancel"),
            ]),
            Mode::Message(_) => key_hints(&[("↑↓", "Scroll"), ("Enter", "Close")]),
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, form: &ActionForm) {
        let popup_area = centered_rect(60, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(form.action.label())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = (0..form.values.len())
            .map(|idx| form.build_line(idx))
            .collect();
        lines.push(Line::from(""));

        match &form.error {
            Some(error) => lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ))),
            None => lines.push(Line::from(Span::styled(
                "Enter to submit • Tab to switch field • Esc to cancel",
                Style::default().fg(Color::Gray),
            ))),
        }

        frame.render_widget(Paragraph::new(lines), inner);

        let (dx, dy) = form.cursor_offset();
        let cursor_x = (inner.x + dx).min(inner.right().saturating_sub(1));
        frame.set_cursor_position((cursor_x, inner.y + dy));
    }

    fn draw_message(&self, frame: &mut Frame, area: Rect, view: &MessageView) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(Span::styled(view.title.clone(), view.kind.style()))
            .borders(Borders::ALL);

        let lines: Vec<Line> = view
            .lines
            .iter()
            .map(|line| Line::from(line.clone()))
            .collect();
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((view.scroll, 0));
        frame.render_widget(paragraph, popup_area);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: MessageKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use crate::db::Store;
    use crate::sentiment::VaderScorer;

    fn app_in(dir: &tempfile::TempDir) -> App {
        let club = Club::new(Store::new(dir.path().join("club.sqlite")), VaderScorer);
        club.ensure_schema().unwrap();
        App::new(club)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn message(app: &App) -> &MessageView {
        match &app.mode {
            Mode::Message(view) => view,
            _ => panic!("expected a result dialog"),
        }
    }

    #[test]
    fn adding_a_member_through_the_form() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Editing(_)));
        type_text(&mut app, "Ada");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "ada@example.org");
        app.handle_key(KeyCode::Enter).unwrap();

        let view = message(&app);
        assert_eq!(view.kind, MessageKind::Info);
        assert!(view.lines[0].contains("Member 'Ada' added"));

        app.handle_key(KeyCode::Enter).unwrap();
        app.handle_key(KeyCode::Down).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(
            message(&app).lines,
            vec!["ID: 1, Name: Ada, Email: ada@example.org".to_string()]
        );
    }

    #[test]
    fn missing_field_keeps_form_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.handle_key(KeyCode::Enter).unwrap();
        type_text(&mut app, "Ada");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::Editing(form) => assert_eq!(form.error.as_deref(), Some("Email is required.")),
            _ => panic!("form should stay open"),
        }
    }

    #[test]
    fn returning_an_unlent_book_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.menu.move_horizontal(2);
        app.menu.move_vertical(1);
        app.handle_key(KeyCode::Enter).unwrap();
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Enter).unwrap();

        let view = message(&app);
        assert_eq!(view.kind, MessageKind::Warning);
        assert_eq!(
            view.lines,
            vec!["No active loan found for member ID 1 and book ID 1.".to_string()]
        );
    }

    #[test]
    fn unknown_ids_keep_lend_form_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);

        app.menu.move_horizontal(2);
        app.handle_key(KeyCode::Enter).unwrap();
        type_text(&mut app, "999");
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(&mut app, "999");
        app.handle_key(KeyCode::Enter).unwrap();

        match &app.mode {
            Mode::Editing(form) => {
                let error = form.error.as_deref().unwrap_or_default();
                assert!(error.contains("does not exist"), "unexpected error: {error}");
            }
            _ => panic!("form should stay open"),
        }
        assert!(app.club.list_active_loans().unwrap().is_empty());
    }

    #[test]
    fn unreachable_store_ends_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file in the way").unwrap();
        let club = Club::new(Store::new(blocker.join("club.sqlite")), VaderScorer);
        let mut app = App::new(club);

        app.handle_key(KeyCode::Down).unwrap();
        let err = app.handle_key(KeyCode::Enter).unwrap_err();

        assert!(StoreError::find(&err).is_some());
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn short_terminal_skips_the_footer() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_in(&dir);
        let mut terminal = Terminal::new(TestBackend::new(40, FOOTER_HEIGHT)).unwrap();

        terminal.draw(|frame| app.draw(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let top_row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, 0)].symbol())
            .collect();
        assert!(top_row.contains("Reading Club"), "menu title hidden: {top_row}");
    }

    #[test]
    fn quit_key_exits_from_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(&dir);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }
}
