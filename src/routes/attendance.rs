//! # 출결 API 라우트 핸들러
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | POST | /api/v1/attendance/{studentId} | `mark_attendance` | 출결 기록/갱신 |
//! | GET | /api/v1/attendance/course/{courseId}?date=&lectureId= | `get_course_attendance` | 과목의 하루치 출결 |
//! | GET | /api/v1/attendance/course/{courseId}/percentage | `get_course_percentages` | 학생별 출석률 |
//!
//! 세 엔드포인트 모두 `AuthUser` 추출기로 요청자를 식별합니다.
//! 기록 시 teacherId는 요청 본문이 아니라 토큰의 `sub`에서 가져옵니다.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    db,
    error::AppError,
    middleware::{
        auth::AuthUser,
        json::{ValidJson, ValidQuery},
    },
    models::*,
    routes::AppState,
    services,
};

/// `POST /api/v1/attendance/{studentId}` + `{ "courseId", "status", "date", "lectureId"? }`
///
/// 처리 순서: 본문 검증(400) → 학생/강의 존재 확인(404) → upsert.
/// 같은 키로 다시 호출하면 `"Attendance updated"`와 함께 같은 레코드를 돌려줍니다.
pub async fn mark_attendance(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(student_id): Path<String>,
    ValidJson(req): ValidJson<MarkAttendanceRequest>,
) -> Result<Json<Value>, AppError> {
    let mark = req.validate()?;

    db::get_student(&state.pool, &student_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Student not found".to_string()))?;

    if let Some(lecture_id) = &mark.lecture_id {
        db::get_lecture(&state.pool, lecture_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Lecture not found".to_string()))?;
    }

    let (attendance, outcome) =
        db::upsert_attendance(&state.pool, &auth.user_id, &student_id, &mark).await?;

    tracing::info!(
        student_id = %student_id,
        course_id = %mark.course_id,
        teacher_id = %auth.user_id,
        role = ?auth.role,
        lecture_id = ?mark.lecture_id,
        date = %mark.date,
        status = %mark.status,
        outcome = ?outcome,
        "attendance recorded"
    );

    Ok(Json(json!({
        "success": true,
        "message": outcome.message(),
        "attendance": attendance
    })))
}

/// `GET /api/v1/attendance/course/{courseId}?date=2024-03-01&lectureId=...`
///
/// `date`는 기록 때와 같은 방식으로 정규화되므로 시각이 붙어 있어도 같은 날로 조회됩니다.
pub async fn get_course_attendance(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(course_id): Path<String>,
    ValidQuery(query): ValidQuery<CourseAttendanceQuery>,
) -> Result<Json<Value>, AppError> {
    let (date, lecture_id) = query.validate()?;

    let attendance =
        db::list_course_attendance(&state.pool, &course_id, date, lecture_id.as_deref()).await?;

    tracing::debug!(
        course_id = %course_id,
        date = %date,
        count = attendance.len(),
        "course attendance listed"
    );

    Ok(Json(json!({
        "success": true,
        "attendance": attendance
    })))
}

/// `GET /api/v1/attendance/course/{courseId}/percentage?windowStart=&windowEnd=`
///
/// 매 요청마다 저장된 레코드로 다시 계산합니다 (캐시 없음).
/// 기간을 지정하지 않으면 `ATTENDANCE_WINDOW_DAYS` 정책을 따릅니다.
pub async fn get_course_percentages(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(course_id): Path<String>,
    ValidQuery(query): ValidQuery<PercentageQuery>,
) -> Result<Json<Value>, AppError> {
    let today = Utc::now().date_naive();
    let window = services::resolve_window(state.attendance_window, &query, today)?;

    let roster = db::list_course_roster(&state.pool, &course_id).await?;
    let samples = db::list_status_samples(&state.pool, &course_id, window).await?;
    let sample_count = samples.len();

    let percentages = services::attendance_percentages(roster, samples);

    tracing::debug!(
        course_id = %course_id,
        students = percentages.len(),
        records = sample_count,
        window = ?window,
        "attendance percentages computed"
    );

    Ok(Json(json!({
        "success": true,
        "percentages": percentages,
        "window": window
    })))
}
