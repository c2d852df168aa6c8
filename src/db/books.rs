use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::models::Book;

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        id: row.get(0)?,
        title: row.get(1)?,
        author: row.get(2)?,
        year: row.get(3)?,
    })
}

/// Insert a book and hand back the hydrated row.
pub fn add_book(conn: &Connection, title: &str, author: &str, year: i64) -> Result<Book> {
    conn.execute(
        "INSERT INTO books (title, author, year) VALUES (?1, ?2, ?3)",
        params![title, author, year],
    )
    .context("failed to insert book")?;

    Ok(Book {
        id: conn.last_insert_rowid(),
        title: title.to_string(),
        author: author.to_string(),
        year,
    })
}

pub fn list_books(conn: &Connection) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare("SELECT id, title, author, year FROM books ORDER BY id")
        .context("failed to prepare book query")?;

    let books = stmt
        .query_map([], book_from_row)
        .context("failed to load books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect books")?;

    Ok(books)
}

/// Books whose title matches exactly, oldest entry first.
pub fn find_books_by_title(conn: &Connection, title: &str) -> Result<Vec<Book>> {
    let mut stmt = conn
        .prepare("SELECT id, title, author, year FROM books WHERE title = ?1 ORDER BY id")
        .context("failed to prepare book search")?;

    let books = stmt
        .query_map([title], book_from_row)
        .context("failed to search books")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect matching books")?;

    Ok(books)
}
