//! # 에러 처리 모듈
//!
//! 출결 서비스에서 발생할 수 있는 에러 종류를 하나의 타입으로 모읍니다.
//!
//! - `Validation`: 필수 필드 누락, 잘못된 상태값/날짜 (HTTP 400)
//! - `NotFound`: 참조한 학생/강의가 없음 (HTTP 404)
//! - `Storage`: DB 오류 (HTTP 500, 원인은 로그에만 남김)
//!
//! 요청자 식별 실패(401)는 `middleware::auth::AuthError`가 따로 담당합니다.
//!
//! 모든 에러는 요청 경계에서 `{ "success": false, "code", "message" }` JSON으로 변환되며,
//! 어떤 에러도 프로세스를 종료시키지 않습니다.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// 애플리케이션 에러
///
/// 핸들러가 `Result<T, AppError>`를 반환하면 Axum이 `IntoResponse`를 호출해
/// 상태 코드와 JSON 본문을 만듭니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 요청 본문/쿼리 검증 실패. 상태 변경은 일어나지 않습니다.
    #[error("{0}")]
    Validation(String),

    /// 참조 대상이 존재하지 않음
    #[error("{0}")]
    NotFound(String),

    /// 저장소 오류
    /// #[from]: sqlx 함수의 에러에 `?`를 쓰면 자동으로 이 variant로 변환됩니다.
    /// 자동 재시도는 하지 않습니다 (재시도는 호출자 몫).
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl AppError {
    /// HTTP 상태 코드와 기계용 에러 코드
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "storage_error"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match self {
            AppError::Storage(ref e) => {
                // 내부 원인은 서버 로그에만 남기고, 클라이언트에는 일반 메시지만 보냅니다
                tracing::error!(error = %e, "Storage error");
                "A storage error occurred".to_string()
            }
            AppError::Validation(msg) | AppError::NotFound(msg) => msg,
        };

        let body = Json(json!({
            "success": false,
            "code": code,
            "message": message
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_each_variant_to_its_status() {
        assert_eq!(
            AppError::Validation("x".into()).status_and_code().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("Student not found".into()).status_and_code(),
            (StatusCode::NOT_FOUND, "not_found")
        );
        assert_eq!(
            AppError::Storage(sqlx::Error::RowNotFound).status_and_code(),
            (StatusCode::INTERNAL_SERVER_ERROR, "storage_error")
        );
    }

    #[tokio::test]
    async fn storage_errors_hide_their_cause() {
        let response = AppError::Storage(sqlx::Error::PoolTimedOut).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "storage_error");
        assert_eq!(body["message"], "A storage error occurred");
    }
}
