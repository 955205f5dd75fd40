//! Employee Repository

use super::{RepoError, RepoResult};
use shared::models::{Employee, EmployeeCreate, EmployeeRole};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, full_name, personnel_number, grade, position, username, email, role, is_active, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<Employee>> {
    let employee = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE username = ? LIMIT 1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(employee)
}

/// Active employees other than `exclude_id` (transfer target candidates)
pub async fn find_active_excluding(pool: &SqlitePool, exclude_id: i64) -> RepoResult<Vec<Employee>> {
    let employees = sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employee WHERE is_active = 1 AND id != ? ORDER BY full_name"
    ))
    .bind(exclude_id)
    .fetch_all(pool)
    .await?;
    Ok(employees)
}

pub async fn count_active_admins_excluding(pool: &SqlitePool, exclude_id: i64) -> RepoResult<u64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM employee WHERE role = ? AND is_active = 1 AND id != ?",
    )
    .bind(EmployeeRole::Admin)
    .bind(exclude_id)
    .fetch_one(pool)
    .await?;
    Ok(count as u64)
}

/// Provision a new employee with a generated id
pub async fn create(pool: &SqlitePool, data: EmployeeCreate) -> RepoResult<Employee> {
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username '{}' already exists",
            data.username
        )));
    }

    let now = shared::util::now_millis();
    let employee = Employee {
        id: shared::util::snowflake_id(),
        full_name: data.full_name,
        personnel_number: data.personnel_number,
        grade: data.grade,
        position: data.position,
        username: data.username,
        email: data.email,
        role: data.role,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    insert(pool, &employee).await?;
    Ok(employee)
}

/// Insert a fully specified employee row, id included
pub async fn insert(pool: &SqlitePool, employee: &Employee) -> RepoResult<()> {
    sqlx::query(&format!(
        "INSERT INTO employee ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    ))
    .bind(employee.id)
    .bind(&employee.full_name)
    .bind(&employee.personnel_number)
    .bind(&employee.grade)
    .bind(&employee.position)
    .bind(&employee.username)
    .bind(&employee.email)
    .bind(employee.role)
    .bind(employee.is_active)
    .bind(employee.created_at)
    .bind(employee.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn set_active(pool: &SqlitePool, id: i64, is_active: bool) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE employee SET is_active = ?, updated_at = ? WHERE id = ?")
        .bind(is_active)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Employee {id} not found")));
    }
    Ok(())
}

/// Hard delete; returns the number of rows removed (0 if already gone)
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<u64> {
    let rows = sqlx::query("DELETE FROM employee WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected())
}
