//! # 출결 데이터베이스 쿼리 모듈
//!
//! ## 테이블 구조
//! - `attendance`: 출결 레코드. `(student_id, course_id, teacher_id, lecture_id, date)`에
//!   UNIQUE 인덱스가 걸려 있습니다.
//!
//! 기록은 "조회 후 삽입" 대신 `INSERT ... ON CONFLICT DO UPDATE` 한 문장으로 처리합니다.
//! 같은 키에 대한 동시 요청이 들어와도 유일성은 인덱스가 보장합니다.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::models::*;

/// upsert 결과 행. `revision`이 0이면 방금 삽입된 행입니다.
#[derive(sqlx::FromRow)]
struct UpsertedRow {
    #[sqlx(flatten)]
    record: AttendanceRecord,
    revision: i64,
}

/// 출결을 기록합니다 (키가 있으면 상태 갱신, 없으면 삽입).
///
/// ## 반환값
/// 저장된 레코드와 `MarkOutcome` (`Marked` = 새 레코드, `Updated` = 기존 레코드 갱신)
pub async fn upsert_attendance(
    pool: &SqlitePool,
    teacher_id: &str,
    student_id: &str,
    mark: &MarkAttendance,
) -> Result<(AttendanceRecord, MarkOutcome), AppError> {
    // 충돌 시에는 기존 행의 id가 유지됩니다
    let id = uuid::Uuid::now_v7().to_string();

    // ON CONFLICT ... DO UPDATE: 키 튜플의 UNIQUE 인덱스에 걸리면 INSERT 대신 UPDATE.
    // 조회 후 삽입(check-then-act)이 아니라 한 문장이라 동시 요청에도 행은 하나만 남습니다.
    // RETURNING으로 저장된 행을 바로 돌려받아 추가 SELECT가 필요 없습니다.
    let row = sqlx::query_as::<_, UpsertedRow>(
        r#"
        INSERT INTO attendance (id, student_id, course_id, teacher_id, lecture_id, date, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT (student_id, course_id, teacher_id, lecture_id, date) DO UPDATE SET
            status = excluded.status,
            revision = attendance.revision + 1,
            updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        RETURNING id, student_id, course_id, teacher_id,
                  NULLIF(lecture_id, '') AS lecture_id,
                  date, status, created_at, updated_at, revision
        "#,
    )
    .bind(&id)
    .bind(student_id)
    .bind(&mark.course_id)
    .bind(teacher_id)
    // SQLite UNIQUE 인덱스는 NULL끼리 서로 다르다고 보므로 강의 없음은 ''로 저장
    .bind(mark.lecture_id.as_deref().unwrap_or(""))
    .bind(mark.date)
    .bind(mark.status)
    .fetch_one(pool)
    .await?;

    // revision: 삽입 시 0, 충돌 갱신마다 +1
    let outcome = if row.revision == 0 {
        MarkOutcome::Marked
    } else {
        MarkOutcome::Updated
    };

    Ok((row.record, outcome))
}

/// 특정 과목의 하루치 출결을 조회합니다. `lecture_id`가 있으면 해당 강의만.
///
/// 학생 이름/학번과 강의 회차를 LEFT JOIN으로 덧붙입니다.
pub async fn list_course_attendance(
    pool: &SqlitePool,
    course_id: &str,
    date: NaiveDate,
    lecture_id: Option<&str>,
) -> Result<Vec<AttendanceEntry>, AppError> {
    let entries = sqlx::query_as::<_, AttendanceEntry>(
        r#"
        SELECT a.id, a.student_id, a.course_id, a.teacher_id,
               NULLIF(a.lecture_id, '') AS lecture_id,
               a.date, a.status, a.created_at, a.updated_at,
               s.full_name AS student_name,
               s.student_code AS student_code,
               l.lecture_number AS lecture_number
        FROM attendance a
        LEFT JOIN students s ON s.id = a.student_id
        LEFT JOIN lectures l ON l.id = a.lecture_id
        WHERE a.course_id = ?
          AND a.date = ?
          AND (? IS NULL OR a.lecture_id = ?)
        ORDER BY a.student_id, a.lecture_id
        "#,
    )
    .bind(course_id)
    .bind(date)
    .bind(lecture_id)
    .bind(lecture_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// 집계 기간 안의 (학생, 상태) 목록을 조회합니다.
pub async fn list_status_samples(
    pool: &SqlitePool,
    course_id: &str,
    window: DateWindow,
) -> Result<Vec<StatusSample>, AppError> {
    let samples = sqlx::query_as::<_, StatusSample>(
        r#"
        SELECT student_id, status
        FROM attendance
        WHERE course_id = ?
          AND (? IS NULL OR date >= ?)
          AND (? IS NULL OR date <= ?)
        "#,
    )
    .bind(course_id)
    .bind(window.start)
    .bind(window.start)
    .bind(window.end)
    .bind(window.end)
    .fetch_all(pool)
    .await?;

    Ok(samples)
}

/// 과목에 출결 기록이 한 번이라도 있는 학생 ID (기간 무관)
pub async fn list_course_roster(pool: &SqlitePool, course_id: &str) -> Result<Vec<String>, AppError> {
    let roster = sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT student_id FROM attendance WHERE course_id = ? ORDER BY student_id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await?;

    Ok(roster)
}
