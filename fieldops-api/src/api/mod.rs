//! HTTP layer: one module per resource family, each exposing a `routes()`
//! vector, plus the shared error response type and the Diesel-error-to-
//! status mapping every handler falls back to.

pub mod analytics;
pub mod company;
pub mod order;
pub mod profile;
pub mod report;
pub mod status;
pub mod survey;
pub mod unit;

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use rocket::Route;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use serde::Serialize;
use ts_rs::TS;

/// Error response structure for API failures.
#[derive(Serialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}

pub type ApiError = Custom<Json<ErrorResponse>>;

pub fn error_response(status: Status, message: impl Into<String>) -> ApiError {
    Custom(
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// 400 naming the first invalid field, as produced by input validation.
pub fn bad_request(message: String) -> ApiError {
    error_response(Status::BadRequest, message)
}

/// Maps a Diesel error to the API taxonomy: NotFound → 404, unique or
/// foreign-key constraint violations → 409, everything else → an opaque 500
/// with the full error logged server-side only.
pub fn db_error_response(context: &str, e: DieselError) -> ApiError {
    match e {
        DieselError::NotFound => error_response(Status::NotFound, format!("{} not found", context)),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => error_response(
            Status::Conflict,
            format!("{} conflicts with an existing record", context),
        ),
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => error_response(
            Status::Conflict,
            format!("{} is referenced by or references other records", context),
        ),
        e => {
            rocket::error!("Database error while handling {}: {:?}", context, e);
            error_response(Status::InternalServerError, "Internal error")
        }
    }
}

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(analytics::routes());
    routes.extend(company::routes());
    routes.extend(order::routes());
    routes.extend(profile::routes());
    routes.extend(report::routes());
    routes.extend(status::routes());
    routes.extend(survey::routes());
    routes.extend(unit::routes());
    routes
}
