use crate::error::AppError;
use crate::models::Student;
use sqlx::SqlitePool;

/// ID로 학생 하나를 조회합니다. 없으면 `None`.
pub async fn get_student(pool: &SqlitePool, id: &str) -> Result<Option<Student>, AppError> {
    let student = sqlx::query_as::<_, Student>(
        "SELECT id, student_code, full_name, created_at FROM students WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(student)
}
