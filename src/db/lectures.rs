use crate::error::AppError;
use crate::models::Lecture;
use sqlx::SqlitePool;

/// ID로 강의 회차 하나를 조회합니다. 없으면 `None`.
pub async fn get_lecture(pool: &SqlitePool, id: &str) -> Result<Option<Lecture>, AppError> {
    let lecture = sqlx::query_as::<_, Lecture>(
        "SELECT id, lecture_number, lecture_date, created_at FROM lectures WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(lecture)
}
