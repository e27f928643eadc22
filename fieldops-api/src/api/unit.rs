//! API endpoints for managing units.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, bad_request, db_error_response, error_response};
use crate::models::{Unit, UnitInput};
use crate::orm::DbConn;
use crate::orm::unit::{delete_unit, get_all_units, get_unit_by_id, insert_unit, update_unit};
use crate::session_guards::AuthenticatedUser;

/// Create Unit endpoint.
///
/// - **URL:** `/api/1/Units`
/// - **Method:** `POST`
/// - **Authentication:** Required
///
/// A missing company id surfaces as a 409 via the foreign key constraint.
#[post("/1/Units", data = "<new_unit>")]
pub async fn create_unit(
    db: DbConn,
    new_unit: Json<UnitInput>,
    _auth_user: AuthenticatedUser,
) -> Result<status::Created<Json<Unit>>, ApiError> {
    let input = new_unit.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| {
        insert_unit(conn, &input)
            .map(|unit| status::Created::new("/").body(Json(unit)))
            .map_err(|e| db_error_response("unit", e))
    })
    .await
}

/// List Units endpoint.
///
/// - **URL:** `/api/1/Units`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Units")]
pub async fn list_units(
    db: DbConn,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Unit>>, ApiError> {
    db.run(|conn| {
        get_all_units(conn)
            .map(Json)
            .map_err(|e| db_error_response("units", e))
    })
    .await
}

/// Get Unit endpoint.
///
/// - **URL:** `/api/1/Units/<unit_id>`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Units/<unit_id>")]
pub async fn get_unit(
    db: DbConn,
    unit_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Unit>, ApiError> {
    db.run(move |conn| match get_unit_by_id(conn, unit_id) {
        Ok(Some(unit)) => Ok(Json(unit)),
        Ok(None) => Err(error_response(Status::NotFound, "Unit not found")),
        Err(e) => Err(db_error_response("unit", e)),
    })
    .await
}

/// Update Unit endpoint.
///
/// - **URL:** `/api/1/Units/<unit_id>`
/// - **Method:** `PUT`
/// - **Authentication:** Required
#[put("/1/Units/<unit_id>", data = "<request>")]
pub async fn update_unit_endpoint(
    db: DbConn,
    unit_id: i32,
    request: Json<UnitInput>,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Unit>, ApiError> {
    let input = request.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| match update_unit(conn, unit_id, &input) {
        Ok(Some(unit)) => Ok(Json(unit)),
        Ok(None) => Err(error_response(Status::NotFound, "Unit not found")),
        Err(e) => Err(db_error_response("unit", e)),
    })
    .await
}

/// Delete Unit endpoint.
///
/// - **URL:** `/api/1/Units/<unit_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Required
#[delete("/1/Units/<unit_id>")]
pub async fn delete_unit_endpoint(
    db: DbConn,
    unit_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_unit(conn, unit_id) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(error_response(Status::NotFound, "Unit not found")),
        Err(e) => Err(db_error_response("unit", e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_unit,
        list_units,
        get_unit,
        update_unit_endpoint,
        delete_unit_endpoint
    ]
}
