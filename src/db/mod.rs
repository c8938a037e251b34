//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//!
//! 각 하위 모듈:
//! - `attendance`: 출결 upsert, 과목별 조회, 집계용 조회
//! - `students`: 학생 존재 확인
//! - `lectures`: 강의 회차 존재 확인

pub mod attendance;
pub mod lectures;
pub mod students;

pub use attendance::*;
pub use lectures::*;
pub use students::*;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// 연결 풀을 만들고 마이그레이션을 실행합니다.
///
/// `sqlite::memory:`는 연결마다 별도의 DB가 생기므로 `max_connections`를 1로 줘야 합니다.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    connect("sqlite::memory:", 1)
        .await
        .expect("failed to create in-memory pool")
}
