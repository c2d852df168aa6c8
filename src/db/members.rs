use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::models::Member;

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

/// Insert a member and hand back the hydrated row.
pub fn add_member(conn: &Connection, name: &str, email: &str) -> Result<Member> {
    conn.execute(
        "INSERT INTO members (name, email) VALUES (?1, ?2)",
        params![name, email],
    )
    .context("failed to insert member")?;

    Ok(Member {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        email: email.to_string(),
    })
}

/// Every member in insertion order.
pub fn list_members(conn: &Connection) -> Result<Vec<Member>> {
    let mut stmt = conn
        .prepare("SELECT id, name, email FROM members ORDER BY id")
        .context("failed to prepare member query")?;

    let members = stmt
        .query_map([], member_from_row)
        .context("failed to load members")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect members")?;

    Ok(members)
}

/// Members whose name matches exactly. An empty vector is a normal answer.
pub fn find_members_by_name(conn: &Connection, name: &str) -> Result<Vec<Member>> {
    let mut stmt = conn
        .prepare("SELECT id, name, email FROM members WHERE name = ?1 ORDER BY id")
        .context("failed to prepare member search")?;

    let members = stmt
        .query_map([name], member_from_row)
        .context("failed to search members")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect matching members")?;

    Ok(members)
}
