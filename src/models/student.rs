use serde::{Deserialize, Serialize};

/// 학생 — 출결 서비스에서는 존재 확인과 표시용 필드 조회에만 사용합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    /// 기관에서 발급한 학번
    pub student_code: String,
    pub full_name: String,
    pub created_at: String,
}
