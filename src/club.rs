//! The operations the shell calls. Each method opens its own connection via
//! the [`Store`], runs one or two statements, logs what happened, and drops the
//! connection again. Business refusals come back as outcome values; only
//! storage trouble is an `Err`.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::TransactionBehavior;
use tracing::{debug, info, warn};

use crate::db::{self, LendOutcome, ReturnOutcome, Store};
use crate::models::{Book, Comment, Loan, Member};
use crate::sentiment::{self, SentimentScorer};

pub struct Club {
    store: Store,
    scorer: Box<dyn SentimentScorer>,
    today: fn() -> NaiveDate,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl Club {
    pub fn new(store: Store, scorer: impl SentimentScorer + 'static) -> Self {
        Self {
            store,
            scorer: Box::new(scorer),
            today: local_today,
        }
    }

    /// Replace the clock used to date loans and returns.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Create the tables if this is the first run.
    pub fn ensure_schema(&self) -> Result<()> {
        self.store.initialize()?;
        info!(path = %self.store.path().display(), "club schema ready");
        Ok(())
    }

    pub fn add_member(&self, name: &str, email: &str) -> Result<Member> {
        let conn = self.store.connect()?;
        let member = db::add_member(&conn, name, email)?;
        info!(member_id = member.id, name, "member added");
        Ok(member)
    }

    pub fn list_members(&self) -> Result<Vec<Member>> {
        let conn = self.store.connect()?;
        let members = db::list_members(&conn)?;
        debug!(count = members.len(), "members listed");
        Ok(members)
    }

    pub fn find_members_by_name(&self, name: &str) -> Result<Vec<Member>> {
        let conn = self.store.connect()?;
        let members = db::find_members_by_name(&conn, name)?;
        debug!(name, count = members.len(), "member search");
        Ok(members)
    }

    pub fn add_book(&self, title: &str, author: &str, year: i64) -> Result<Book> {
        let conn = self.store.connect()?;
        let book = db::add_book(&conn, title, author, year)?;
        info!(book_id = book.id, title, "book added");
        Ok(book)
    }

    pub fn list_books(&self) -> Result<Vec<Book>> {
        let conn = self.store.connect()?;
        let books = db::list_books(&conn)?;
        debug!(count = books.len(), "books listed");
        Ok(books)
    }

    pub fn find_books_by_title(&self, title: &str) -> Result<Vec<Book>> {
        let conn = self.store.connect()?;
        let books = db::find_books_by_title(&conn, title)?;
        debug!(title, count = books.len(), "book search");
        Ok(books)
    }

    /// Lend a book unless someone already has it. The availability check and
    /// the insert share one immediate transaction, so a second process cannot
    /// slip a loan in between.
    pub fn lend_book(&self, member_id: i64, book_id: i64) -> Result<LendOutcome> {
        let mut conn = self.store.connect()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("failed to start loan transaction")?;
        let outcome = db::lend_book(&tx, member_id, book_id, (self.today)())?;

        match &outcome {
            LendOutcome::Lent(loan) => {
                tx.commit().context("failed to commit loan")?;
                info!(loan_id = loan.id, member_id, book_id, "book lent");
            }
            LendOutcome::AlreadyLoaned { .. } => {
                warn!(member_id, book_id, "book already on loan");
            }
        }
        Ok(outcome)
    }

    pub fn return_book(&self, member_id: i64, book_id: i64) -> Result<ReturnOutcome> {
        let conn = self.store.connect()?;
        let outcome = db::return_book(&conn, member_id, book_id, (self.today)())?;

        match &outcome {
            ReturnOutcome::Returned { closed, .. } if *closed > 1 => {
                warn!(member_id, book_id, closed, "closed more than one open loan");
            }
            ReturnOutcome::Returned { .. } => info!(member_id, book_id, "book returned"),
            ReturnOutcome::NoActiveLoan { .. } => {
                warn!(member_id, book_id, "no active loan to return")
            }
        }
        Ok(outcome)
    }

    pub fn list_active_loans(&self) -> Result<Vec<Loan>> {
        let conn = self.store.connect()?;
        let loans = db::list_active_loans(&conn)?;
        debug!(count = loans.len(), "active loans listed");
        Ok(loans)
    }

    /// Score the text first; a comment is never stored without its score.
    pub fn add_comment(&self, member_id: i64, book_id: i64, text: &str) -> Result<Comment> {
        let score = self
            .scorer
            .score(text)
            .and_then(sentiment::check_range)
            .context("failed to score comment")?;

        let conn = self.store.connect()?;
        let comment = db::add_comment(&conn, member_id, book_id, text, score)?;
        info!(
            comment_id = comment.id,
            member_id,
            book_id,
            sentiment = score,
            "comment added"
        );
        Ok(comment)
    }

    pub fn list_comments_for_book(&self, book_id: i64) -> Result<Vec<Comment>> {
        let conn = self.store.connect()?;
        let comments = db::list_comments_for_book(&conn, book_id)?;
        debug!(book_id, count = comments.len(), "comments listed");
        Ok(comments)
    }
}
