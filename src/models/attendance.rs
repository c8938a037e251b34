//! # 출결 모델 정의
//!
//! ## 구조체 역할
//! - `AttendanceStatus`: 출결 상태 (`Present` / `Absent` / `Online`, 대소문자 구분)
//! - `AttendanceRecord`: DB의 `attendance` 테이블 한 행
//! - `AttendanceEntry`: 과목별 조회 응답용 (학생 이름, 강의 회차가 덧붙음)
//! - `MarkAttendanceRequest` → `MarkAttendance`: 출결 기록 요청 본문과 검증된 입력
//! - `CourseAttendanceQuery`, `PercentageQuery`: 조회 쿼리스트링
//! - `DateWindow`: 출석률 집계 기간
//!
//! ## 유일성 키
//! `(student_id, course_id, teacher_id, lecture_id, date)` 조합당 레코드는 최대 하나입니다.
//! 같은 키로 다시 기록하면 새 행을 만들지 않고 `status`만 덮어씁니다.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::normalize_date;

/// 출결 상태 — 닫힌 열거형입니다.
///
/// JSON과 DB 모두 variant 이름 그대로 저장됩니다 (`"Present"`).
/// `sqlx::Type`을 derive하면 TEXT 컬럼과 자동으로 변환됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Online,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Online => "Online",
        }
    }

    /// 출석으로 인정되는 상태인지 여부 (`Present`, `Online`)
    pub fn is_attended(&self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Online)
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendanceStatus {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Present" => Ok(AttendanceStatus::Present),
            "Absent" => Ok(AttendanceStatus::Absent),
            "Online" => Ok(AttendanceStatus::Online),
            other => Err(AppError::Validation(format!(
                "status must be one of Present, Absent, Online (got {other:?})"
            ))),
        }
    }
}

/// 출결 레코드 엔티티
///
/// `lecture_id`는 DB에서 빈 문자열(강의 미지정)로 저장되며,
/// 조회 쿼리에서 `NULLIF(lecture_id, '')`로 `None`이 됩니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    /// 레코드 고유 식별자 (UUIDv7). 갱신되어도 바뀌지 않습니다.
    pub id: String,
    pub student_id: String,
    pub course_id: String,
    /// 기록한 교사 (요청자 토큰의 `sub`)
    pub teacher_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lecture_id: Option<String>,
    /// 자정으로 정규화된 날짜 (`YYYY-MM-DD`)
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    pub created_at: String,
    pub updated_at: String,
}

/// 과목별 출결 조회 응답 항목
///
/// 레코드 필드에 표시용 필드를 덧붙입니다. 학생 행이 삭제되었으면 `None`입니다.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceEntry {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub record: AttendanceRecord,
    pub student_name: Option<String>,
    pub student_code: Option<String>,
    pub lecture_number: Option<i64>,
}

/// 기록 결과 — 새로 기록했는지, 기존 레코드를 갱신했는지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkOutcome {
    Marked,
    Updated,
}

impl MarkOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            MarkOutcome::Marked => "Attendance marked",
            MarkOutcome::Updated => "Attendance updated",
        }
    }
}

/// 출결 기록 요청 — `POST /api/v1/attendance/{studentId}`의 본문
///
/// 모든 필드가 Option인 이유: 누락된 필드를 serde 파싱 에러 대신
/// `validate()`에서 한 번에 "courseId, status and date are required"로 알려주기 위함입니다.
/// 알 수 없는 필드는 `deny_unknown_fields`로 거부합니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MarkAttendanceRequest {
    pub course_id: Option<String>,
    pub status: Option<String>,
    pub date: Option<String>,
    pub lecture_id: Option<String>,
}

/// 검증을 통과한 출결 기록 입력
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkAttendance {
    pub course_id: String,
    pub status: AttendanceStatus,
    pub date: NaiveDate,
    pub lecture_id: Option<String>,
}

impl MarkAttendanceRequest {
    pub fn validate(self) -> Result<MarkAttendance, AppError> {
        let (Some(course_id), Some(status), Some(date)) = (
            non_blank(self.course_id),
            non_blank(self.status),
            non_blank(self.date),
        ) else {
            return Err(AppError::Validation(
                "courseId, status and date are required".to_string(),
            ));
        };

        Ok(MarkAttendance {
            course_id,
            status: status.parse()?,
            date: normalize_date(&date)?,
            lecture_id: non_blank(self.lecture_id),
        })
    }
}

/// `GET /api/v1/attendance/course/{courseId}?date=...&lectureId=...`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAttendanceQuery {
    pub date: Option<String>,
    pub lecture_id: Option<String>,
}

impl CourseAttendanceQuery {
    /// 정규화된 날짜와 강의 필터를 돌려줍니다.
    pub fn validate(self) -> Result<(NaiveDate, Option<String>), AppError> {
        let date = non_blank(self.date)
            .ok_or_else(|| AppError::Validation("date query is required".to_string()))?;
        Ok((normalize_date(&date)?, non_blank(self.lecture_id)))
    }
}

/// `GET /api/v1/attendance/course/{courseId}/percentage?windowStart=...&windowEnd=...`
///
/// 둘 다 비어 있으면 서버 설정의 기간 정책을 따릅니다.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentageQuery {
    pub window_start: Option<String>,
    pub window_end: Option<String>,
}

/// 집계 기간 (양 끝 포함). `None`이면 그 방향으로 제한이 없습니다.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// 집계용 경량 행 — 학생 ID와 상태만 읽습니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StatusSample {
    pub student_id: String,
    pub status: AttendanceStatus,
}

/// 공백뿐인 문자열은 누락으로 취급합니다.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(course_id: &str, status: &str, date: &str) -> MarkAttendanceRequest {
        MarkAttendanceRequest {
            course_id: Some(course_id.to_string()),
            status: Some(status.to_string()),
            date: Some(date.to_string()),
            lecture_id: None,
        }
    }

    #[test]
    fn status_parsing_is_case_sensitive() {
        assert_eq!("Online".parse::<AttendanceStatus>().unwrap(), AttendanceStatus::Online);
        assert!("present".parse::<AttendanceStatus>().is_err());
        assert!("Late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn only_present_and_online_count_as_attended() {
        assert!(AttendanceStatus::Present.is_attended());
        assert!(AttendanceStatus::Online.is_attended());
        assert!(!AttendanceStatus::Absent.is_attended());
    }

    #[test]
    fn validate_normalizes_date_and_parses_status() {
        let mark = request("C1", "Present", "2024-03-01T15:30:00Z").validate().unwrap();
        assert_eq!(mark.course_id, "C1");
        assert_eq!(mark.status, AttendanceStatus::Present);
        assert_eq!(mark.date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(mark.lecture_id, None);
    }

    #[test]
    fn validate_rejects_missing_or_blank_fields() {
        let err = MarkAttendanceRequest {
            course_id: Some("C1".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "courseId, status and date are required");

        assert!(request("   ", "Present", "2024-01-10").validate().is_err());
    }

    #[test]
    fn validate_rejects_unknown_status() {
        let err = request("C1", "absent", "2024-01-10").validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn blank_lecture_id_means_no_lecture() {
        let mut req = request("C1", "Absent", "2024-01-10");
        req.lecture_id = Some("".into());
        assert_eq!(req.validate().unwrap().lecture_id, None);
    }

    #[test]
    fn request_rejects_unknown_fields() {
        let parsed = serde_json::from_str::<MarkAttendanceRequest>(
            r#"{"courseId":"C1","status":"Present","date":"2024-01-10","grade":"A"}"#,
        );
        assert!(parsed.is_err());
    }

    #[test]
    fn course_query_requires_date() {
        let err = CourseAttendanceQuery::default().validate().unwrap_err();
        assert_eq!(err.to_string(), "date query is required");
    }
}
