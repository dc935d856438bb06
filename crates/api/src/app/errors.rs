use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use siteledger_core::LedgerError;

/// Map a ledger failure onto the dashboard's wire contract.
///
/// User-correctable input problems are 400s carrying the validation
/// message. Everything else, including an unknown material on the
/// transaction path, surfaces as a generic 500: that path has never
/// returned a 404 and existing clients only distinguish 400 from failure.
pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    match err {
        LedgerError::InvalidInput(msg) => json_error(StatusCode::BAD_REQUEST, msg),
        LedgerError::NotFound(msg) | LedgerError::Storage(msg) => {
            tracing::error!("ledger operation failed: {msg}");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

pub fn json_error(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "message": message.into(),
        })),
    )
        .into_response()
}
