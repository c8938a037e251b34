#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Duration;
use institute_admin::{
    db, middleware::auth::create_access_token, router, services::WindowPolicy, AppState,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

pub struct TestApp {
    pub pool: SqlitePool,
    pub app: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_window(WindowPolicy::AllTime).await
    }

    pub async fn with_window(attendance_window: WindowPolicy) -> Self {
        let pool = db::connect("sqlite::memory:", 1)
            .await
            .expect("in-memory pool");
        let app = router(AppState {
            pool: pool.clone(),
            jwt_secret: SECRET.to_string(),
            attendance_window,
        });
        Self { pool, app }
    }

    pub async fn seed_student(&self, id: &str, name: &str) {
        sqlx::query("INSERT INTO students (id, student_code, full_name) VALUES (?, ?, ?)")
            .bind(id)
            .bind(format!("CODE-{id}"))
            .bind(name)
            .execute(&self.pool)
            .await
            .expect("seed student");
    }

    pub async fn seed_lecture(&self, id: &str, number: i64) {
        sqlx::query("INSERT INTO lectures (id, lecture_number, lecture_date) VALUES (?, ?, ?)")
            .bind(id)
            .bind(number)
            .bind("2024-01-10")
            .execute(&self.pool)
            .await
            .expect("seed lecture");
    }

    pub async fn attendance_rows(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM attendance")
            .fetch_one(&self.pool)
            .await
            .expect("count rows")
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("read body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn mark(&self, teacher: &str, student: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/attendance/{student}"))
            .header(header::AUTHORIZATION, bearer(teacher))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn get(&self, teacher: &str, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .uri(uri)
            .header(header::AUTHORIZATION, bearer(teacher))
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }
}

pub fn bearer(teacher: &str) -> String {
    let token = create_access_token(teacher, Some("teacher"), SECRET, Duration::minutes(15))
        .expect("sign token");
    format!("Bearer {token}")
}
