//! Audit Log Repository
//!
//! Insert and read only. The table rejects UPDATE and DELETE via triggers.

use super::RepoResult;
use shared::models::{AuditEntry, AuditEntryCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, actor, action, table_name, target_id, details, created_at";

pub async fn append(pool: &SqlitePool, entry: &AuditEntryCreate) -> RepoResult<i64> {
    let id = sqlx::query(
        "INSERT INTO audit_log (actor, action, table_name, target_id, details, created_at) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&entry.actor)
    .bind(entry.action)
    .bind(&entry.table_name)
    .bind(&entry.target_id)
    .bind(sqlx::types::Json(&entry.details))
    .bind(entry.created_at)
    .execute(pool)
    .await?
    .last_insert_rowid();
    Ok(id)
}

pub async fn find_by_target(
    pool: &SqlitePool,
    table_name: &str,
    target_id: &str,
) -> RepoResult<Vec<AuditEntry>> {
    let entries = sqlx::query_as::<_, AuditEntry>(&format!(
        "SELECT {COLUMNS} FROM audit_log WHERE table_name = ? AND target_id = ? ORDER BY id"
    ))
    .bind(table_name)
    .bind(target_id)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

/// Most recent entries first
pub async fn list(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<AuditEntry>> {
    let entries = sqlx::query_as::<_, AuditEntry>(&format!(
        "SELECT {COLUMNS} FROM audit_log ORDER BY id DESC LIMIT ?"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(entries)
}
