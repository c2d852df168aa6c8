//! Domain models that mirror the SQLite schema. They stay plain data holders;
//! the persistence layer hydrates them and the terminal shell formats them.

use std::fmt;

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
/// A club member. Members are never edited or removed once created.
pub struct Member {
    /// Sequence number assigned by SQLite. Loans and comments refer to it.
    pub id: i64,
    pub name: String,
    /// Free text; nothing checks that it looks like an address.
    pub email: String,
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {}, Name: {}, Email: {}", self.id, self.name, self.email)
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A book in the club library.
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    /// Publication year, kept numeric so it sorts and compares naturally.
    pub year: i64,
}

impl fmt::Display for Book {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Published: {}",
            self.id, self.title, self.author, self.year
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A book handed to a member. The loan stays open while `returned_on` is
/// `None`; returning it stamps the date and the row is never touched again.
pub struct Loan {
    pub id: i64,
    pub member_id: i64,
    pub book_id: i64,
    pub loaned_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
}

impl Loan {
    /// Whether the book is still out with the member.
    pub fn is_open(&self) -> bool {
        self.returned_on.is_none()
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Loan {}: book {} with member {} since {}",
            self.id, self.book_id, self.member_id, self.loaned_on
        )?;
        if let Some(returned) = self.returned_on {
            write!(f, ", returned {returned}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A member's note about a book together with the polarity score computed
/// when it was written.
pub struct Comment {
    pub id: i64,
    pub member_id: i64,
    pub book_id: i64,
    pub body: String,
    /// Compound polarity in `[-1.0, 1.0]`.
    pub sentiment: f64,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:+.2}] member {}: {}",
            self.sentiment, self.member_id, self.body
        )
    }
}
