//! # 서비스 계층
//!
//! 핸들러와 DB 사이의 순수 계산 로직입니다.
//! - `attendance`: 날짜 정규화, 집계 기간 정책, 출석률 집계

pub mod attendance;

pub use attendance::*;
