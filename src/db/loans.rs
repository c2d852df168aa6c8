use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};

use super::map_missing_reference;
use crate::models::Loan;

/// Result of asking to lend a book. A book that is already out is an
/// expected answer, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum LendOutcome {
    Lent(Loan),
    AlreadyLoaned { book_id: i64 },
}

/// Result of bringing a book back.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnOutcome {
    /// `closed` counts the rows stamped; the open loan index keeps it at one.
    Returned {
        member_id: i64,
        book_id: i64,
        returned_on: NaiveDate,
        closed: usize,
    },
    NoActiveLoan { member_id: i64, book_id: i64 },
}

fn loan_from_row(row: &Row<'_>) -> rusqlite::Result<Loan> {
    Ok(Loan {
        id: row.get(0)?,
        member_id: row.get(1)?,
        book_id: row.get(2)?,
        loaned_on: row.get(3)?,
        returned_on: row.get(4)?,
    })
}

/// The loan currently holding `book_id`, if any.
pub fn open_loan_for_book(conn: &Connection, book_id: i64) -> Result<Option<Loan>> {
    conn.query_row(
        "SELECT id, member_id, book_id, loaned_on, returned_on
         FROM loans
         WHERE book_id = ?1 AND returned_on IS NULL
         LIMIT 1",
        [book_id],
        loan_from_row,
    )
    .optional()
    .context("failed to look up open loan")
}

/// Check that nobody holds the book, then record a new loan dated `today`.
/// The check and the insert are two statements; run them inside a transaction
/// when more than one writer can reach the file.
pub fn lend_book(
    conn: &Connection,
    member_id: i64,
    book_id: i64,
    today: NaiveDate,
) -> Result<LendOutcome> {
    if open_loan_for_book(conn, book_id)?.is_some() {
        return Ok(LendOutcome::AlreadyLoaned { book_id });
    }

    let inserted = conn.execute(
        "INSERT INTO loans (member_id, book_id, loaned_on) VALUES (?1, ?2, ?3)",
        params![member_id, book_id, today],
    );
    match inserted {
        Ok(_) => {}
        Err(err) if is_open_loan_conflict(&err) => {
            return Ok(LendOutcome::AlreadyLoaned { book_id });
        }
        Err(err) => {
            return Err(
                map_missing_reference(err, member_id, book_id).context("failed to insert loan")
            );
        }
    }

    Ok(LendOutcome::Lent(Loan {
        id: conn.last_insert_rowid(),
        member_id,
        book_id,
        loaned_on: today,
        returned_on: None,
    }))
}

/// Stamp `today` on the member's open loan for the book. When nothing matches
/// the store is left as it was.
pub fn return_book(
    conn: &Connection,
    member_id: i64,
    book_id: i64,
    today: NaiveDate,
) -> Result<ReturnOutcome> {
    let closed = conn
        .execute(
            "UPDATE loans SET returned_on = ?1
             WHERE member_id = ?2 AND book_id = ?3 AND returned_on IS NULL",
            params![today, member_id, book_id],
        )
        .context("failed to close loan")?;

    if closed == 0 {
        Ok(ReturnOutcome::NoActiveLoan { member_id, book_id })
    } else {
        Ok(ReturnOutcome::Returned {
            member_id,
            book_id,
            returned_on: today,
            closed,
        })
    }
}

/// Loans still out, oldest first.
pub fn list_active_loans(conn: &Connection) -> Result<Vec<Loan>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, member_id, book_id, loaned_on, returned_on
             FROM loans
             WHERE returned_on IS NULL
             ORDER BY loaned_on, id",
        )
        .context("failed to prepare active loan query")?;

    let loans = stmt
        .query_map([], loan_from_row)
        .context("failed to load active loans")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect active loans")?;

    Ok(loans)
}

fn is_open_loan_conflict(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _)
            if inner.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
