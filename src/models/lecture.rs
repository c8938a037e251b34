use serde::{Deserialize, Serialize};

/// 강의 회차 — 출결을 회차 단위로 기록할 때 참조합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Lecture {
    pub id: String,
    /// 1 ~ 30
    pub lecture_number: i64,
    pub lecture_date: String,
    pub created_at: String,
}
