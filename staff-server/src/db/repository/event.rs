//! Event Repository

use super::RepoResult;
use shared::models::{Event, EventCreate};
use sqlx::SqlitePool;

pub async fn find_by_creator(pool: &SqlitePool, employee_id: i64) -> RepoResult<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(
        "SELECT id, created_by, title, start_date, end_date, location, created_at, updated_at FROM event WHERE created_by = ? ORDER BY start_date",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;
    Ok(events)
}

pub async fn count_by_creator(pool: &SqlitePool, employee_id: i64) -> RepoResult<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event WHERE created_by = ?")
        .bind(employee_id)
        .fetch_one(pool)
        .await?;
    Ok(count as u64)
}

/// Create an event together with its participant rows
pub async fn create(pool: &SqlitePool, data: EventCreate) -> RepoResult<Event> {
    let now = shared::util::now_millis();
    let event = Event {
        id: shared::util::snowflake_id(),
        created_by: data.created_by,
        title: data.title,
        start_date: data.start_date,
        end_date: data.end_date,
        location: data.location,
        created_at: now,
        updated_at: now,
    };

    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO event (id, created_by, title, start_date, end_date, location, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(event.id)
    .bind(event.created_by)
    .bind(&event.title)
    .bind(&event.start_date)
    .bind(&event.end_date)
    .bind(&event.location)
    .bind(event.created_at)
    .bind(event.updated_at)
    .execute(&mut *tx)
    .await?;

    for participant in &data.participant_ids {
        sqlx::query("INSERT OR IGNORE INTO event_participant (event_id, employee_id) VALUES (?, ?)")
            .bind(event.id)
            .bind(participant)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(event)
}

pub async fn participant_ids(pool: &SqlitePool, event_id: i64) -> RepoResult<Vec<i64>> {
    let ids: Vec<i64> = sqlx::query_scalar("SELECT employee_id FROM event_participant WHERE event_id = ? ORDER BY employee_id")
        .bind(event_id)
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Delete every event created by the employee; participants cascade
pub async fn delete_by_creator(pool: &SqlitePool, employee_id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM event WHERE created_by = ?")
        .bind(employee_id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
