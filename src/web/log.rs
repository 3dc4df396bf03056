use axum::http::{Method, StatusCode, Uri};
use serde::Serialize;
use serde_json::json;
use serde_with::skip_serializing_none;
use tracing::{debug, error};
use uuid::Uuid;

use super::error::ClientError;
use crate::web::Error;

/// Emits one structured log line per request.
/// Server-side detail (the full `web::Error`) stays here and never reaches
/// the client; the response mapper decides what the caller gets to see.
pub async fn log_request(
    uuid: Uuid,
    req_method: Method,
    uri: Uri,
    status_code: StatusCode,
    web_error: Option<&Error>,
    client_status_and_error: Option<&(StatusCode, ClientError)>,
) {
    let logline = LogLine::build(
        uuid,
        req_method,
        uri,
        status_code,
        web_error,
        client_status_and_error,
    );

    if logline.web_error_type.is_some() {
        error!("LOGLINE: {}", json!(logline));
    } else {
        debug!("LOGLINE: {}", json!(logline));
    }
}

#[skip_serializing_none]
#[derive(Serialize)]
struct LogLine {
    timestamp: String,
    uuid: String,

    req_method: String,
    uri: String,
    status_code: String,

    client_error_type: Option<String>,
    web_error_type: Option<String>,
    web_error_detail: Option<String>,
}

impl LogLine {
    fn build(
        uuid: Uuid,
        req_method: Method,
        uri: Uri,
        status_code: StatusCode,
        web_error: Option<&Error>,
        client_status_and_error: Option<&(StatusCode, ClientError)>,
    ) -> Self {
        let client_error_type = client_status_and_error.map(|(_, ce)| ce.as_ref().to_string());
        let status_code = client_status_and_error
            .map(|(sc, _)| sc.to_string())
            .unwrap_or(status_code.to_string());

        LogLine {
            timestamp: chrono::Utc::now().to_rfc3339(),
            uuid: uuid.to_string(),
            req_method: req_method.to_string(),
            uri: uri.to_string(),
            status_code,
            client_error_type,
            web_error_type: web_error.map(|we| we.as_ref().to_string()),
            web_error_detail: web_error.map(|we| we.to_string()),
        }
    }
}
