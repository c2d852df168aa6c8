//! Persistence module split per entity. Every function takes the connection it
//! should run on; opening and closing connections is the caller's business.

mod books;
mod comments;
mod connection;
mod loans;
mod members;

use anyhow::anyhow;
use rusqlite::{ffi, Error as SqlError};

pub use books::{add_book, find_books_by_title, list_books};
pub use comments::{add_comment, list_comments_for_book};
pub use connection::{ensure_schema, Store};
pub use loans::{
    lend_book, list_active_loans, open_loan_for_book, return_book, LendOutcome, ReturnOutcome,
};
pub use members::{add_member, find_members_by_name, list_members};

/// Turn a foreign key failure into a sentence the user can act on. Other
/// errors pass through untouched.
fn map_missing_reference(err: SqlError, member_id: i64, book_id: i64) -> anyhow::Error {
    match &err {
        SqlError::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY =>
        {
            anyhow!("Member {member_id} or book {book_id} does not exist.")
        }
        _ => err.into(),
    }
}
