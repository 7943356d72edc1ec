use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::error;

use crate::state::AppState;

/// Best-effort API usage logging. The row is written on a spawned task after
/// the response is ready; a failed insert is logged and otherwise ignored, so
/// the write can never block or fail the request itself.
pub async fn track_usage(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let endpoint = req.uri().path().to_string();
    let method = req.method().to_string();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());
    let ip_address = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string());

    let start = Instant::now();
    let response = next.run(req).await;
    let response_time_ms = start.elapsed().as_millis() as i32;
    let status_code = response.status().as_u16() as i32;

    let db = state.db.clone();
    tokio::spawn(async move {
        let result = sqlx::query(
            r#"
            INSERT INTO api_usage
                (endpoint, method, status_code, response_time_ms, user_agent, ip_address)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&endpoint)
        .bind(&method)
        .bind(status_code)
        .bind(response_time_ms)
        .bind(&user_agent)
        .bind(&ip_address)
        .execute(&db)
        .await;

        if let Err(e) = result {
            error!(error = %e, %endpoint, "failed to log api usage");
        }
    });

    response
}
