//! # 검증용 JSON 추출기
//!
//! Axum 기본 `Json<T>`은 파싱 실패 시 평문 422/415 응답을 돌려줍니다.
//! `ValidJson<T>`은 같은 파싱을 하되 실패를 `AppError::Validation`(400, JSON 본문)으로 바꿉니다.
//! 알 수 없는 필드, 잘못된 타입, 깨진 JSON, Content-Type 누락이 모두 여기서 걸러집니다.
//! 쿼리 문자열은 `ValidQuery<T>`가 같은 방식으로 처리합니다.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::request::Parts,
    Json,
};

use crate::error::AppError;

#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(ValidJson(value))
    }
}

/// 쿼리 문자열 추출기
///
/// `Query<T>`의 거부 응답(평문 400)을 `AppError::Validation`으로 바꿉니다.
/// 같은 키가 두 번 들어온 쿼리(`?date=a&date=b`)도 여기서 걸러집니다.
#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(ValidQuery(value))
    }
}
