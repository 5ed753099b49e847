use sqlx::MySqlPool;

use crate::model::work_schedule::{WorkSchedule, WorkScheduleEntry};

pub async fn for_user(pool: &MySqlPool, user_id: i64) -> Result<Vec<WorkSchedule>, sqlx::Error> {
    sqlx::query_as::<_, WorkSchedule>(
        r#"
        SELECT id, user_id, day_of_week, daily_hours
        FROM work_schedules
        WHERE user_id = ?
        ORDER BY day_of_week
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Wholesale replacement: the old set is discarded and the new set installed
/// in one transaction.
pub async fn replace_for_user(
    pool: &MySqlPool,
    user_id: i64,
    entries: &[WorkScheduleEntry],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM work_schedules WHERE user_id = ?")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    for entry in entries {
        sqlx::query(
            "INSERT INTO work_schedules (user_id, day_of_week, daily_hours) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(entry.day_of_week)
        .bind(entry.daily_hours)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}
