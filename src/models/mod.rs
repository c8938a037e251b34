//! # 데이터 모델 모듈
//!
//! - `attendance`: 출결 레코드, 상태 열거형, 요청/쿼리 스키마
//! - `student`: 학생 (조회 전용)
//! - `lecture`: 강의 (조회 전용)

pub mod attendance;
pub mod lecture;
pub mod student;

pub use attendance::*;
pub use lecture::*;
pub use student::*;
