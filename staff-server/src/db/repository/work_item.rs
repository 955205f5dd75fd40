//! Work Item Repository

use super::{RepoResult, placeholders};
use shared::models::{WorkItem, WorkItemCreate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, employee_id, title, category, description, status, received_date, function_tag, created_at, updated_at";

pub async fn find_by_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<WorkItem>> {
    let items = sqlx::query_as::<_, WorkItem>(&format!(
        "SELECT {COLUMNS} FROM work_item WHERE employee_id = ? ORDER BY id"
    ))
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

pub async fn count_by_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM work_item WHERE employee_id = ?")
        .bind(employee_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

pub async fn create(pool: &SqlitePool, data: WorkItemCreate) -> RepoResult<WorkItem> {
    let now = shared::util::now_millis();
    let item = WorkItem {
        id: shared::util::snowflake_id(),
        employee_id: data.employee_id,
        title: data.title,
        category: data.category,
        description: data.description,
        status: data.status,
        received_date: data.received_date,
        function_tag: data.function_tag,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(&format!(
        "INSERT INTO work_item ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(item.id)
    .bind(item.employee_id)
    .bind(&item.title)
    .bind(&item.category)
    .bind(&item.description)
    .bind(item.status)
    .bind(&item.received_date)
    .bind(&item.function_tag)
    .bind(item.created_at)
    .bind(item.updated_at)
    .execute(pool)
    .await?;
    Ok(item)
}

/// Re-point every work item of `from` to `to`; returns the affected ids
///
/// Ids are captured and updated in one transaction so the returned set is
/// exactly the set that moved.
pub async fn reassign_owner(pool: &SqlitePool, from: i64, to: i64, now: i64) -> RepoResult<Vec<i64>> {
    let mut tx = pool.begin().await?;

    let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM work_item WHERE employee_id = ? ORDER BY id")
        .bind(from)
        .fetch_all(&mut *tx)
        .await?;

    if !ids.is_empty() {
        sqlx::query("UPDATE work_item SET employee_id = ?, updated_at = ? WHERE employee_id = ?")
            .bind(to)
            .bind(now)
            .bind(from)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(ids)
}

/// Ids bound per `IN (...)` statement, well under SQLite's variable limit
const SET_OWNER_CHUNK: usize = 500;

/// Re-point exactly the listed work items to `owner`
///
/// Large id lists are split into chunks that share one transaction.
pub async fn set_owner(pool: &SqlitePool, ids: &[i64], owner: i64, now: i64) -> RepoResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut affected = 0;
    for chunk in ids.chunks(SET_OWNER_CHUNK) {
        let sql = format!(
            "UPDATE work_item SET employee_id = ?, updated_at = ? WHERE id IN ({})",
            placeholders(chunk.len())
        );
        let mut query = sqlx::query(&sql).bind(owner).bind(now);
        for id in chunk {
            query = query.bind(*id);
        }
        affected += query.execute(&mut *tx).await?.rows_affected();
    }
    tx.commit().await?;
    Ok(affected)
}

pub async fn delete_by_employee(pool: &SqlitePool, employee_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM work_item WHERE employee_id = ?")
        .bind(employee_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
