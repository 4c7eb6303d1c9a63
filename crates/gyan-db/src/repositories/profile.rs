use gyan_adaptive::AdaptiveProfile;
use sqlx::{Executor, Postgres, types::Json};

use crate::models::AdaptiveProfileRow;

/// Fetch a student's stored profile, `None` before the first submission.
pub async fn get_adaptive_profile<'e, E>(
    executor: E,
    student_id: &str,
) -> Result<Option<AdaptiveProfileRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT student_id, performance_data, weakness_history, created_at, updated_at
            FROM adaptive_profiles
            WHERE student_id = $1
        "#,
    )
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

/// Same as [`get_adaptive_profile`], but locks the row until the surrounding
/// transaction ends.
pub async fn get_adaptive_profile_for_update<'e, E>(
    executor: E,
    student_id: &str,
) -> Result<Option<AdaptiveProfileRow>, sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_as(
        // language=PostgreSQL
        r#"
            SELECT student_id, performance_data, weakness_history, created_at, updated_at
            FROM adaptive_profiles
            WHERE student_id = $1
            FOR UPDATE
        "#,
    )
    .bind(student_id)
    .fetch_optional(executor)
    .await
}

/// Insert or replace a student's profile, bumping `updated_at`.
pub async fn upsert_adaptive_profile<'e, E>(
    executor: E,
    student_id: &str,
    profile: &AdaptiveProfile,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query(
        // language=PostgreSQL
        r#"
            INSERT INTO adaptive_profiles (student_id, performance_data, weakness_history)
            VALUES ($1, $2, $3)
            ON CONFLICT (student_id)
            DO UPDATE SET
                performance_data = EXCLUDED.performance_data,
                weakness_history = EXCLUDED.weakness_history,
                updated_at = NOW()
        "#,
    )
    .bind(student_id)
    .bind(Json(&profile.performance_data))
    .bind(Json(&profile.weakness_history))
    .execute(executor)
    .await?;
    Ok(())
}
