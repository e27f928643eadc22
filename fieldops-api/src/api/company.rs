//! API endpoints for managing companies.
//!
//! Companies are the tenants of the dashboard: they own units and are
//! referenced by service orders. Deleting a company is refused while any
//! dependent rows exist.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, bad_request, db_error_response, error_response};
use crate::models::{Company, CompanyInput, Order, Unit};
use crate::orm::DbConn;
use crate::orm::company::{
    count_company_dependents, delete_company, get_all_companies, get_company_by_id,
    get_company_by_legal_id, insert_company, update_company,
};
use crate::orm::order::get_orders_by_company;
use crate::orm::unit::get_units_by_company;
use crate::session_guards::AuthenticatedUser;

/// Create Company endpoint.
///
/// - **URL:** `/api/1/Companies`
/// - **Method:** `POST`
/// - **Purpose:** Creates a new company
/// - **Authentication:** Required
///
/// # Request Format
///
/// ```json
/// {
///   "name": "Acme",
///   "legal_id": "12.345.678/0001-00",
///   "unit_label": "Plant A"
/// }
/// ```
///
/// Returns 201 with the stored row. A duplicate legal identifier is a 409.
#[post("/1/Companies", data = "<new_company>")]
pub async fn create_company(
    db: DbConn,
    new_company: Json<CompanyInput>,
    _auth_user: AuthenticatedUser,
) -> Result<status::Created<Json<Company>>, ApiError> {
    let input = new_company.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| {
        // Explicit duplicate check up front; the unique constraint on
        // legal_id remains the backstop for races.
        match get_company_by_legal_id(conn, &input.legal_id) {
            Ok(Some(_)) => {
                return Err(error_response(
                    Status::Conflict,
                    format!("Company with legal id '{}' already exists", input.legal_id),
                ));
            }
            Ok(None) => {}
            Err(e) => return Err(db_error_response("company", e)),
        }

        insert_company(conn, &input)
            .map(|comp| status::Created::new("/").body(Json(comp)))
            .map_err(|e| db_error_response("company", e))
    })
    .await
}

/// List Companies endpoint.
///
/// - **URL:** `/api/1/Companies`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves all companies, ordered by id
/// - **Authentication:** Required
#[get("/1/Companies")]
pub async fn list_companies(
    db: DbConn,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Company>>, ApiError> {
    db.run(|conn| {
        get_all_companies(conn)
            .map(Json)
            .map_err(|e| db_error_response("companies", e))
    })
    .await
}

/// Get Company endpoint.
///
/// - **URL:** `/api/1/Companies/<company_id>`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Companies/<company_id>")]
pub async fn get_company(
    db: DbConn,
    company_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Company>, ApiError> {
    db.run(move |conn| match get_company_by_id(conn, company_id) {
        Ok(Some(company)) => Ok(Json(company)),
        Ok(None) => Err(error_response(Status::NotFound, "Company not found")),
        Err(e) => Err(db_error_response("company", e)),
    })
    .await
}

/// List Company Units endpoint.
///
/// - **URL:** `/api/1/Companies/<company_id>/Units`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Companies/<company_id>/Units")]
pub async fn list_company_units(
    db: DbConn,
    company_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Unit>>, ApiError> {
    db.run(move |conn| {
        get_units_by_company(conn, company_id)
            .map(Json)
            .map_err(|e| db_error_response("units", e))
    })
    .await
}

/// List Company Orders endpoint.
///
/// - **URL:** `/api/1/Companies/<company_id>/Orders`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Companies/<company_id>/Orders")]
pub async fn list_company_orders(
    db: DbConn,
    company_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    db.run(move |conn| {
        get_orders_by_company(conn, company_id)
            .map(Json)
            .map_err(|e| db_error_response("orders", e))
    })
    .await
}

/// Update Company endpoint.
///
/// - **URL:** `/api/1/Companies/<company_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Full scalar replace of a company's fields
/// - **Authentication:** Required
#[put("/1/Companies/<company_id>", data = "<request>")]
pub async fn update_company_endpoint(
    db: DbConn,
    company_id: i32,
    request: Json<CompanyInput>,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Company>, ApiError> {
    let input = request.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| match update_company(conn, company_id, &input) {
        Ok(Some(company)) => Ok(Json(company)),
        Ok(None) => Err(error_response(Status::NotFound, "Company not found")),
        Err(e) => Err(db_error_response("company", e)),
    })
    .await
}

/// Delete Company endpoint.
///
/// - **URL:** `/api/1/Companies/<company_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Required
///
/// The dependency check runs before the delete so the caller gets a message
/// naming what blocks it, instead of a bare constraint error afterwards.
///
/// Returns 204 on success, 404 if absent, 409 while units or orders still
/// reference the company.
#[delete("/1/Companies/<company_id>")]
pub async fn delete_company_endpoint(
    db: DbConn,
    company_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Status, ApiError> {
    db.run(move |conn| {
        let (units, orders) = match count_company_dependents(conn, company_id) {
            Ok(counts) => counts,
            Err(e) => return Err(db_error_response("company", e)),
        };
        if units > 0 || orders > 0 {
            return Err(error_response(
                Status::Conflict,
                "Remove dependent units and orders first",
            ));
        }

        match delete_company(conn, company_id) {
            Ok(true) => Ok(Status::NoContent),
            Ok(false) => Err(error_response(Status::NotFound, "Company not found")),
            Err(e) => Err(db_error_response("company", e)),
        }
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_company,
        list_companies,
        get_company,
        list_company_units,
        list_company_orders,
        update_company_endpoint,
        delete_company_endpoint
    ]
}
