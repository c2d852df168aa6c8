// Integration tests for the club operations against a real database file.

use chrono::NaiveDate;
use reading_club::sentiment::{ScoreError, SentimentScorer, MAX_SCORE, MIN_SCORE};
use reading_club::{Club, Config, LendOutcome, ReturnOutcome, Store, StoreError, VaderScorer};
use rusqlite::Connection;
use tempfile::TempDir;

/// Scorer with a fixed answer, so tests do not depend on the lexicon.
struct FixedScorer(f64);

impl SentimentScorer for FixedScorer {
    fn score(&self, _text: &str) -> Result<f64, ScoreError> {
        Ok(self.0)
    }
}

/// Scorer that always fails.
struct BrokenScorer;

impl SentimentScorer for BrokenScorer {
    fn score(&self, _text: &str) -> Result<f64, ScoreError> {
        Err(ScoreError::Missing)
    }
}

fn loan_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn setup_with(scorer: impl SentimentScorer + 'static) -> (TempDir, Club) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = Config::in_dir(dir.path());
    let club = Club::new(Store::new(&config.db_path), scorer).with_clock(loan_day);
    club.ensure_schema().expect("schema should be created");
    (dir, club)
}

fn setup() -> (TempDir, Club) {
    setup_with(FixedScorer(0.5))
}

fn raw(club: &Club) -> Connection {
    Connection::open(club.store().path()).unwrap()
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn test_added_member_is_listed() {
    let (_dir, club) = setup();

    club.add_member("Ada", "ada@example.org").unwrap();

    let members = club.list_members().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].name, "Ada");
    assert_eq!(members[0].email, "ada@example.org");
}

#[test]
fn test_find_member_distinguishes_empty_result() {
    let (_dir, club) = setup();
    club.add_member("Ada", "ada@example.org").unwrap();

    assert_eq!(club.find_members_by_name("Ada").unwrap().len(), 1);
    assert!(club.find_members_by_name("Grace").unwrap().is_empty());
}

#[test]
fn test_added_book_is_found_by_title() {
    let (_dir, club) = setup();

    club.add_book("Le Petit Prince", "Saint-Exupéry", 1943).unwrap();

    let found = club.find_books_by_title("Le Petit Prince").unwrap();
    assert!(found
        .iter()
        .any(|b| b.author == "Saint-Exupéry" && b.year == 1943));
    assert_eq!(club.list_books().unwrap().len(), 1);
}

#[test]
fn test_schema_creation_is_idempotent() {
    let (_dir, club) = setup();
    club.add_member("Ada", "ada@example.org").unwrap();
    club.add_book("Dune", "Frank Herbert", 1965).unwrap();

    club.ensure_schema().unwrap();
    club.ensure_schema().unwrap();

    let conn = raw(&club);
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master
             WHERE type = 'table' AND name IN ('members', 'books', 'loans', 'comments')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 4);
    assert_eq!(count(&conn, "members"), 1);
    assert_eq!(count(&conn, "books"), 1);
}

#[test]
fn test_loan_is_exclusive_until_returned() {
    let (_dir, club) = setup();
    let ada = club.add_member("Ada", "ada@example.org").unwrap().id;
    let bob = club.add_member("Bob", "bob@example.org").unwrap().id;
    let book = club.add_book("Dune", "Frank Herbert", 1965).unwrap().id;

    let lent = club.lend_book(ada, book).unwrap();
    match lent {
        LendOutcome::Lent(loan) => assert_eq!(loan.loaned_on, loan_day()),
        other => panic!("expected a loan, got {other:?}"),
    }

    assert_eq!(
        club.lend_book(bob, book).unwrap(),
        LendOutcome::AlreadyLoaned { book_id: book }
    );
    assert_eq!(club.list_active_loans().unwrap().len(), 1);

    assert!(matches!(
        club.return_book(ada, book).unwrap(),
        ReturnOutcome::Returned { closed: 1, .. }
    ));
    assert!(matches!(
        club.lend_book(bob, book).unwrap(),
        LendOutcome::Lent(_)
    ));
}

#[test]
fn test_lend_return_round_trip() {
    let (_dir, club) = setup();
    let ada = club.add_member("Ada", "ada@example.org").unwrap().id;
    let book = club.add_book("Dune", "Frank Herbert", 1965).unwrap().id;

    club.lend_book(ada, book).unwrap();
    club.return_book(ada, book).unwrap();

    let conn = raw(&club);
    let closed: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM loans
             WHERE member_id = ?1 AND book_id = ?2 AND returned_on IS NOT NULL",
            [ada, book],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(closed, 1);
    let returned_on: String = conn
        .query_row("SELECT returned_on FROM loans", [], |row| row.get(0))
        .unwrap();
    assert_eq!(returned_on, "2024-06-01");

    assert!(matches!(
        club.lend_book(ada, book).unwrap(),
        LendOutcome::Lent(_)
    ));
}

#[test]
fn test_return_without_loan_is_soft_failure() {
    let (_dir, club) = setup();
    let ada = club.add_member("Ada", "ada@example.org").unwrap().id;
    let book = club.add_book("Dune", "Frank Herbert", 1965).unwrap().id;

    assert_eq!(
        club.return_book(ada, book).unwrap(),
        ReturnOutcome::NoActiveLoan {
            member_id: ada,
            book_id: book
        }
    );
    assert_eq!(count(&raw(&club), "loans"), 0);
}

#[test]
fn test_comment_is_stored_with_score() {
    let (_dir, club) = setup_with(VaderScorer);
    let ada = club.add_member("Ada", "ada@example.org").unwrap().id;
    let book = club.add_book("Dune", "Frank Herbert", 1965).unwrap().id;

    let comment = club.add_comment(ada, book, "great book").unwrap();
    assert!(comment.sentiment.is_finite());
    assert!((MIN_SCORE..=MAX_SCORE).contains(&comment.sentiment));
    assert!(comment.sentiment > 0.0);

    let stored = club.list_comments_for_book(book).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].body, "great book");
    assert_eq!(stored[0].sentiment, comment.sentiment);
}

#[test]
fn test_failed_scoring_stores_nothing() {
    let (_dir, club) = setup_with(BrokenScorer);
    let ada = club.add_member("Ada", "ada@example.org").unwrap().id;
    let book = club.add_book("Dune", "Frank Herbert", 1965).unwrap().id;

    assert!(club.add_comment(ada, book, "anything").is_err());
    assert_eq!(count(&raw(&club), "comments"), 0);
}

#[test]
fn test_out_of_range_score_is_rejected() {
    let (_dir, club) = setup_with(FixedScorer(3.0));
    let ada = club.add_member("Ada", "ada@example.org").unwrap().id;
    let book = club.add_book("Dune", "Frank Herbert", 1965).unwrap().id;

    assert!(club.add_comment(ada, book, "off the charts").is_err());
    assert!(club.list_comments_for_book(book).unwrap().is_empty());
}

#[test]
fn test_unreachable_store_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"file in the way").unwrap();

    let club = Club::new(Store::new(blocker.join("club.sqlite")), FixedScorer(0.0));
    let err = club.list_members().unwrap_err();
    assert!(StoreError::find(&err).is_some());
}
