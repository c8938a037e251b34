//! # 교육기관 관리 백엔드 — 출결 서비스
//!
//! 학생 출결을 기록하고, 과목별로 조회하고, 학생별 출석률을 집계하는 REST API입니다.
//!
//! 모듈 구성:
//! - `config`: 환경변수 설정
//! - `db`: SQLite 쿼리 (sqlx)
//! - `error`: 에러 타입과 HTTP 응답 변환
//! - `middleware`: 요청자 식별(JWT), 검증용 JSON 추출기
//! - `models`: 엔티티와 요청/쿼리 스키마
//! - `routes`: Axum 핸들러와 라우터 조립
//! - `services`: 날짜 정규화, 집계 기간, 출석률 계산

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::{router, AppState};
