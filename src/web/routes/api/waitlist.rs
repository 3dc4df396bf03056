use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;
use sqlx::{error::DatabaseError, postgres::PgDatabaseError, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::{
    web::{
        data::{DeserSignup, ValidSignup, WaitlistRecord},
        Error, WebResult,
    },
    AppState,
};

#[derive(Debug, Serialize)]
pub struct WaitlistResponse {
    pub message: String,
    pub data: Vec<WaitlistRecord>,
}

#[tracing::instrument(name = "Adding a new signup to the waitlist", skip_all)]
pub async fn waitlist_join(
    State(app_state): State<AppState>,
    payload: Result<Json<DeserSignup>, JsonRejection>,
) -> WebResult<(StatusCode, Json<WaitlistResponse>)> {
    // Gate on content type before anything else; a syntactically broken body
    // is the caller's mistake, not a server crash.
    let Json(signup) = payload.map_err(|rejection| match rejection {
        JsonRejection::MissingJsonContentType(_) => Error::UnsupportedMediaType,
        rejection => Error::MalformedBody(rejection.body_text()),
    })?;

    // Spawn a blocking task to validate the signup fields.
    let signup: ValidSignup =
        tokio::task::spawn_blocking(move || ValidSignup::try_from(signup)).await??;

    // The single point that touches the database.
    let record = insert_signup(app_state.database_mgr.db(), &signup).await?;

    info!("New waitlist signup stored");
    let response = WaitlistResponse {
        message: "Entry added successfully!".to_string(),
        data: vec![record],
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Tries to insert a new signup into the waitlist table and returns the
/// stored representation. Database failures are classified on the way out:
/// a violated uniqueness constraint on `email` becomes `DuplicateEmail`,
/// everything else the backend reports becomes `DatastoreRejected`.
async fn insert_signup(db: &PgPool, signup: &ValidSignup) -> WebResult<WaitlistRecord> {
    let query_result = sqlx::query_as::<_, WaitlistRecord>(
        r#"
        INSERT INTO waitlist (id, email, nationality, language, joined_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING email, nationality, language
    "#,
    )
    .bind(Uuid::new_v4())
    .bind(signup.email.as_ref())
    .bind(signup.nationality.as_ref())
    .bind(signup.language.as_ref())
    .bind(Utc::now())
    .fetch_one(db)
    .await;

    query_result.map_err(classify_insert_error)
}

// ###################################
// ->   HELPERS
// ###################################

/// Splits an insert failure into what the backend rejected (surfaced to the
/// caller) and what went wrong around the call (kept opaque): pool timeouts,
/// broken connections and the like stay `Error::Sqlx` and end up as a 500.
fn classify_insert_error(error: sqlx::Error) -> Error {
    match error {
        sqlx::Error::Database(db_error) => {
            if is_unique_violation(db_error.as_ref()) {
                Error::DuplicateEmail(db_error.message().to_string())
            } else {
                Error::DatastoreRejected(db_error.message().to_string())
            }
        }
        other => Error::Sqlx(other),
    }
}

/// Postgres reports unique-constraint violations with SQLSTATE 23505.
/// The message check below is a compatibility shim for backends that don't
/// expose a structured code; prefer the code whenever it is available.
fn is_unique_violation(db_error: &dyn DatabaseError) -> bool {
    if let Some(pg_error) = db_error.try_downcast_ref::<PgDatabaseError>() {
        if pg_error.code() == "23505" {
            return true;
        }
    }

    message_indicates_duplicate(db_error.message())
}

fn message_indicates_duplicate(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    message.contains("duplicate") || message.contains("unique constraint")
}
