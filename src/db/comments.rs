use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use super::map_missing_reference;
use crate::models::Comment;

/// Store a comment along with the score computed for it by the caller.
pub fn add_comment(
    conn: &Connection,
    member_id: i64,
    book_id: i64,
    body: &str,
    sentiment: f64,
) -> Result<Comment> {
    conn.execute(
        "INSERT INTO comments (member_id, book_id, body, sentiment) VALUES (?1, ?2, ?3, ?4)",
        params![member_id, book_id, body, sentiment],
    )
    .map_err(|err| map_missing_reference(err, member_id, book_id))
    .context("failed to insert comment")?;

    Ok(Comment {
        id: conn.last_insert_rowid(),
        member_id,
        book_id,
        body: body.to_string(),
        sentiment,
    })
}

/// Everything said about one book, in the order it was written.
pub fn list_comments_for_book(conn: &Connection, book_id: i64) -> Result<Vec<Comment>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, member_id, book_id, body, sentiment
             FROM comments
             WHERE book_id = ?1
             ORDER BY id",
        )
        .context("failed to prepare comment query")?;

    let comments = stmt
        .query_map([book_id], |row| {
            Ok(Comment {
                id: row.get(0)?,
                member_id: row.get(1)?,
                book_id: row.get(2)?,
                body: row.get(3)?,
                sentiment: row.get(4)?,
            })
        })
        .context("failed to load comments")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect comments")?;

    Ok(comments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{add_book, add_member, ensure_schema};

    #[test]
    fn comment_text_round_trips_unmodified() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        ensure_schema(&conn).unwrap();
        let member = add_member(&conn, "Ada", "ada@example.org").unwrap();
        let book = add_book(&conn, "Dune", "Frank Herbert", 1965).unwrap();
        let other = add_book(&conn, "Emma", "Jane Austen", 1815).unwrap();

        let body = "  Épique, mais un peu long…  ";
        let stored = add_comment(&conn, member.id, book.id, body, 0.4).unwrap();
        add_comment(&conn, member.id, other.id, "charming", 0.6).unwrap();

        let comments = list_comments_for_book(&conn, book.id).unwrap();
        assert_eq!(comments, vec![stored]);
        assert_eq!(comments[0].body, body);
        assert_eq!(comments[0].sentiment, 0.4);
    }

    #[test]
    fn comment_on_unknown_book_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("PRAGMA foreign_keys = ON", []).unwrap();
        ensure_schema(&conn).unwrap();
        let member = add_member(&conn, "Ada", "ada@example.org").unwrap();

        let err = add_comment(&conn, member.id, 42, "ghost", 0.0).unwrap_err();
        assert!(format!("{err:#}").contains("book 42"));
        assert!(list_comments_for_book(&conn, 42).unwrap().is_empty());
    }
}
