//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어옵니다. `.env` 파일이 있으면 `main`에서 먼저 로딩합니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: 요청자 토큰 검증용 비밀키 (필수)
//! - `HOST`: 서버 바인딩 주소 (기본값 `0.0.0.0`)
//! - `PORT`: 서버 포트 번호 (기본값 `3000`)
//! - `REQUEST_TIMEOUT_SECS`: 요청 처리 제한 시간 (기본값 `30`)
//! - `ATTENDANCE_WINDOW_DAYS`: 출석률 집계 기간. 비우거나 `0`/`all`이면 전체 기록,
//!   숫자 N이면 최근 N일 (기본값 전체 기록)

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::services::WindowPolicy;

/// 설정 로딩 에러
///
/// 어떤 환경변수가 빠졌는지 메시지에 그대로 담아 시작 로그에서 바로 보이게 합니다.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variable `{0}` is not set")]
    Missing(&'static str),
}

/// 필수 환경변수 조회. 비어 있는 값도 없는 것으로 취급합니다.
fn required<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|value| !value.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// 애플리케이션 전체 설정
///
/// 서버 시작 시 한 번 읽은 뒤 `AppState`로 각 요청에 전달됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    /// 출석률 집계 기본 기간 정책
    pub attendance_window: WindowPolicy,
}

impl Config {
    /// 프로세스 환경변수에서 설정을 읽습니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`이 없으면 에러를 반환합니다.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 키 → 값 조회 함수로부터 설정을 만듭니다.
    ///
    /// 필수가 아닌 값은 형식이 잘못되어 있으면 기본값을 사용합니다.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            jwt_secret: required(&lookup, "JWT_SECRET")?,
            // 선택 항목: 없거나 파싱에 실패하면 조용히 기본값으로 갑니다
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|value| value.parse().ok())
                .unwrap_or(3000),
            request_timeout: Duration::from_secs(
                lookup("REQUEST_TIMEOUT_SECS")
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(30),
            ),
            // "all", "0", 빈 값 → 전체 기록 / "30" → 최근 30일
            attendance_window: lookup("ATTENDANCE_WINDOW_DAYS")
                .and_then(|value| WindowPolicy::parse(&value))
                .unwrap_or_default(),
        })
    }
}
