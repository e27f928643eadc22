//! API endpoints for user profiles.
//!
//! Profiles mirror the external identity-provider accounts. `/1/Me` is the
//! lazy bootstrap the dashboard calls on every session start.

use rocket::Route;
use rocket::http::Status;
use rocket::serde::json::Json;

use crate::api::{ApiError, bad_request, db_error_response, error_response};
use crate::models::{Profile, ProfileInput};
use crate::orm::DbConn;
use crate::orm::profile::{
    delete_profile, get_all_profiles, get_profile_by_id, update_profile, upsert_profile,
};
use crate::session_guards::AuthenticatedUser;

/// Current Profile endpoint.
///
/// - **URL:** `/api/1/Me`
/// - **Method:** `GET`
/// - **Purpose:** Create-if-absent profile keyed by the identity provider's
///   user id, then return it
/// - **Authentication:** Required
///
/// Idempotent: repeated calls return the same row. The display name and
/// email fall back to the identity headers; an absent name falls back to
/// the user id itself.
#[get("/1/Me")]
pub async fn current_profile(
    db: DbConn,
    auth_user: AuthenticatedUser,
) -> Result<Json<Profile>, ApiError> {
    db.run(move |conn| {
        let name = auth_user
            .name
            .clone()
            .unwrap_or_else(|| auth_user.external_user_id.clone());
        let email = auth_user.email.clone().unwrap_or_default();

        upsert_profile(
            conn,
            &auth_user.external_user_id,
            &name,
            &email,
            auth_user.image_url.as_deref(),
        )
        .map(Json)
        .map_err(|e| db_error_response("profile", e))
    })
    .await
}

/// List Profiles endpoint.
///
/// - **URL:** `/api/1/Profiles`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Profiles")]
pub async fn list_profiles(
    db: DbConn,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Profile>>, ApiError> {
    db.run(|conn| {
        get_all_profiles(conn)
            .map(Json)
            .map_err(|e| db_error_response("profiles", e))
    })
    .await
}

/// Get Profile endpoint.
///
/// - **URL:** `/api/1/Profiles/<profile_id>`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Profiles/<profile_id>")]
pub async fn get_profile(
    db: DbConn,
    profile_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Profile>, ApiError> {
    db.run(move |conn| match get_profile_by_id(conn, profile_id) {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(error_response(Status::NotFound, "Profile not found")),
        Err(e) => Err(db_error_response("profile", e)),
    })
    .await
}

/// Update Profile endpoint.
///
/// - **URL:** `/api/1/Profiles/<profile_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Full replace of the editable fields, including role,
///   register number, and position
/// - **Authentication:** Required
#[put("/1/Profiles/<profile_id>", data = "<request>")]
pub async fn update_profile_endpoint(
    db: DbConn,
    profile_id: i32,
    request: Json<ProfileInput>,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Profile>, ApiError> {
    let input = request.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| match update_profile(conn, profile_id, &input) {
        Ok(Some(profile)) => Ok(Json(profile)),
        Ok(None) => Err(error_response(Status::NotFound, "Profile not found")),
        Err(e) => Err(db_error_response("profile", e)),
    })
    .await
}

/// Delete Profile endpoint.
///
/// - **URL:** `/api/1/Profiles/<profile_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Required
#[delete("/1/Profiles/<profile_id>")]
pub async fn delete_profile_endpoint(
    db: DbConn,
    profile_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_profile(conn, profile_id) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(error_response(Status::NotFound, "Profile not found")),
        Err(e) => Err(db_error_response("profile", e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        current_profile,
        list_profiles,
        get_profile,
        update_profile_endpoint,
        delete_profile_endpoint
    ]
}
