//! # 라우트 핸들러 모듈
//!
//! 각 하위 모듈:
//! - `attendance`: 출결 기록, 과목별 조회, 출석률
//! - `health`: 서버 상태 확인 (헬스체크)
//!
//! `router()`가 전체 API 라우터를 조립합니다. `main`과 통합 테스트가 같은 함수를 씁니다.

pub mod attendance;
pub mod health;

pub use attendance::*;
pub use health::*;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::services::WindowPolicy;

/// 애플리케이션 공유 상태
///
/// 모든 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// 요청마다 clone되며, 프로세스 전역의 가변 상태는 두지 않습니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀 (내부적으로 Arc로 공유)
    pub pool: SqlitePool,
    /// 요청자 토큰 검증용 비밀키
    pub jwt_secret: String,
    /// 출석률 집계 기본 기간
    pub attendance_window: WindowPolicy,
}

/// `/api/v1` 아래에 모든 API 라우트를 붙인 라우터를 만듭니다.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/attendance/{student_id}", post(mark_attendance))
        .route("/attendance/course/{course_id}", get(get_course_attendance))
        .route(
            "/attendance/course/{course_id}/percentage",
            get(get_course_percentages),
        )
        .route("/health", get(health_check))
        .with_state(state);

    // 관리자 화면이 다른 출처에서 호출하므로 CORS는 모두 허용합니다
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
