use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use strum_macros::AsRefStr;

pub type WebResult<T> = core::result::Result<T, Error>;

#[derive(Debug, AsRefStr, thiserror::Error)]
pub enum Error {
    #[error("unsupported media type: expected 'application/json'")]
    UnsupportedMediaType,
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    #[error("data parsing error: {0}")]
    DataParsing(#[from] super::data::DataParsingError),

    #[error("duplicate waitlist entry: {0}")]
    DuplicateEmail(String),
    #[error("datastore rejected the write: {0}")]
    DatastoreRejected(String),

    #[error("error awaiting a tokio task: {0}")]
    TokioJoin(#[from] tokio::task::JoinError),
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

impl Error {
    pub fn status_code_and_client_error(&self) -> (StatusCode, ClientError) {
        use ClientError::*;

        match self {
            Error::UnsupportedMediaType => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, UnsupportedMediaType)
            }
            Error::MalformedBody(msg) => (StatusCode::BAD_REQUEST, InvalidInput(msg.clone())),
            Error::DataParsing(data_er) => {
                (StatusCode::BAD_REQUEST, InvalidInput(data_er.to_string()))
            }
            Error::DuplicateEmail(msg) => (StatusCode::CONFLICT, DuplicateEntry(msg.clone())),
            // The database is trusted infrastructure, so a rejected write is
            // surfaced to the caller as their problem. Schema or permission
            // breakage would be better off as a 500; revisit if it bites.
            Error::DatastoreRejected(msg) => (StatusCode::BAD_REQUEST, InvalidInput(msg.clone())),
            // Anything unclassified stays opaque to the caller.
            _ => (StatusCode::INTERNAL_SERVER_ERROR, ServiceError),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        tracing::debug!("{:<12} - into_response(Error: {self:?})", "INTO_RESP");

        // Construct a response
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();

        // Insert the Error into response so that it can be retrieved later.
        res.extensions_mut().insert(Arc::new(self));

        res
    }
}

#[derive(Debug, AsRefStr, derive_more::Display)]
pub enum ClientError {
    #[display("Received invalid input: {_0}")]
    InvalidInput(String),
    #[display("{_0}")]
    DuplicateEntry(String),
    #[display("Unsupported media type: expected 'application/json'")]
    UnsupportedMediaType,
    #[display("Service Error!")]
    ServiceError,
}
