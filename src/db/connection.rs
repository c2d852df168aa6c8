use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::error::StoreError;

/// Connection factory for the club database. Each operation opens its own
/// connection through this handle and drops it when done, so the only shared
/// state is the file itself.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection with foreign keys enforced. Any failure here means
    /// the store is unreachable, which callers treat as fatal.
    pub fn connect(&self) -> Result<Connection> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::DataDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let conn = Connection::open(&self.path).map_err(|source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        })?;
        conn.execute("PRAGMA foreign_keys = ON", [])
            .context("failed to enable foreign keys")?;
        Ok(conn)
    }

    /// Open a throwaway connection and make sure every table exists.
    pub fn initialize(&self) -> Result<()> {
        let conn = self.connect()?;
        ensure_schema(&conn)
    }
}

/// Create the four club tables when they are missing. Safe to run on every
/// start; existing tables and rows are left alone.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS members (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            email TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create members table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            year INTEGER NOT NULL
        )",
        [],
    )
    .context("failed to create books table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS loans (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            book_id INTEGER NOT NULL,
            loaned_on TEXT NOT NULL,
            returned_on TEXT,
            FOREIGN KEY(member_id) REFERENCES members(id),
            FOREIGN KEY(book_id) REFERENCES books(id)
        )",
        [],
    )
    .context("failed to create loans table")?;

    // At most one open loan per book.
    conn.execute(
        "CREATE UNIQUE INDEX IF NOT EXISTS loans_one_open_per_book
            ON loans(book_id) WHERE returned_on IS NULL",
        [],
    )
    .context("failed to create open loan index")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS comments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            member_id INTEGER NOT NULL,
            book_id INTEGER NOT NULL,
            body TEXT NOT NULL,
            sentiment REAL NOT NULL,
            FOREIGN KEY(member_id) REFERENCES members(id),
            FOREIGN KEY(book_id) REFERENCES books(id)
        )",
        [],
    )
    .context("failed to create comments table")?;

    Ok(())
}
