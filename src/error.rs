use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

/// Error envelope returned by every failing endpoint: `{"success": false, "error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

pub type ApiError = (StatusCode, Json<ErrorBody>);

pub fn failure(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorBody {
            success: false,
            error: message.to_string(),
        }),
    )
}

pub fn bad_request(message: &str) -> ApiError {
    failure(StatusCode::BAD_REQUEST, message)
}

pub fn not_found(message: &str) -> ApiError {
    failure(StatusCode::NOT_FOUND, message)
}

pub fn internal(message: &str) -> ApiError {
    failure(StatusCode::INTERNAL_SERVER_ERROR, message)
}

pub fn unauthorized(message: &str) -> ApiError {
    failure(StatusCode::UNAUTHORIZED, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_serializes_with_success_flag() {
        let (status, body) = not_found("Pet not found");
        assert_eq!(status, StatusCode::NOT_FOUND);
        let json = serde_json::to_string(&body.0).unwrap();
        assert_eq!(json, r#"{"success":false,"error":"Pet not found"}"#);
    }
}
