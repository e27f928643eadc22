//! API endpoints for field-service reports, nested under their order.
//!
//! Create and replace run as single transactions in the ORM layer; replace
//! is the delete-all-then-insert-all child swap, so a failure can never
//! leave a half-replaced report behind.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, bad_request, db_error_response, error_response};
use crate::models::{Report, ReportDetail, ReportInput};
use crate::orm::DbConn;
use crate::orm::order::get_order_by_id;
use crate::orm::report::{
    delete_report, get_report_detail, get_report_in_order, get_reports_by_order, insert_report,
    replace_report,
};
use crate::session_guards::AuthenticatedUser;

/// Create Report endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>/Reports`
/// - **Method:** `POST`
/// - **Purpose:** Creates the full report graph in one transaction
/// - **Authentication:** Required
///
/// The payload carries the form sections one level nested:
///
/// ```json
/// {
///   "schedule": { "visit_date": "2026-05-03", "start_time": "09:00", "end_time": null },
///   "equipment": { "location": "...", "name": "...", "model": "...", "serial": "...",
///                  "tag": "...", "kind": "...", "description": "..." },
///   "service": { "diagnostic": "...", "recommendation": "...", "additional_info": "..." },
///   "descriptions": [{ "description": "..." }],
///   "procedures": [{ "description": "..." }],
///   "gallery": [{ "image_url": "...", "comment": "..." }]
/// }
/// ```
///
/// Descriptions and procedures require at least one entry; the gallery may
/// be empty. Returns 201 with the full graph, 404 if the order is absent.
#[post("/1/Orders/<order_id>/Reports", data = "<new_report>")]
pub async fn create_report(
    db: DbConn,
    order_id: i32,
    new_report: Json<ReportInput>,
    auth_user: AuthenticatedUser,
) -> Result<status::Created<Json<ReportDetail>>, ApiError> {
    let input = new_report.into_inner();
    input.validate().map_err(bad_request)?;

    let author = auth_user.external_user_id;
    db.run(move |conn| {
        match get_order_by_id(conn, order_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(error_response(Status::NotFound, "Order not found")),
            Err(e) => return Err(db_error_response("order", e)),
        }

        insert_report(conn, order_id, &author, &input)
            .map(|detail| status::Created::new("/").body(Json(detail)))
            .map_err(|e| db_error_response("report", e))
    })
    .await
}

/// List Reports endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>/Reports`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Orders/<order_id>/Reports")]
pub async fn list_reports(
    db: DbConn,
    order_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Report>>, ApiError> {
    db.run(move |conn| {
        get_reports_by_order(conn, order_id)
            .map(Json)
            .map_err(|e| db_error_response("reports", e))
    })
    .await
}

/// Get Report endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>/Reports/<report_id>`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves the full report graph
/// - **Authentication:** Required
///
/// A report id under a different order is a 404.
#[get("/1/Orders/<order_id>/Reports/<report_id>")]
pub async fn get_report(
    db: DbConn,
    order_id: i32,
    report_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<ReportDetail>, ApiError> {
    db.run(move |conn| {
        let report = match get_report_in_order(conn, order_id, report_id) {
            Ok(Some(report)) => report,
            Ok(None) => return Err(error_response(Status::NotFound, "Report not found")),
            Err(e) => return Err(db_error_response("report", e)),
        };
        get_report_detail(conn, report)
            .map(Json)
            .map_err(|e| db_error_response("report", e))
    })
    .await
}

/// Update Report endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>/Reports/<report_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Full replace: owned rows updated in place, child
///   collections deleted and re-inserted wholesale
/// - **Authentication:** Required
///
/// The swap runs in one transaction; racing updates are last-writer-wins.
#[put("/1/Orders/<order_id>/Reports/<report_id>", data = "<request>")]
pub async fn update_report(
    db: DbConn,
    order_id: i32,
    report_id: i32,
    request: Json<ReportInput>,
    auth_user: AuthenticatedUser,
) -> Result<Json<ReportDetail>, ApiError> {
    let input = request.into_inner();
    input.validate().map_err(bad_request)?;

    let author = auth_user.external_user_id;
    db.run(move |conn| {
        match replace_report(conn, order_id, report_id, &author, &input) {
            Ok(Some(detail)) => Ok(Json(detail)),
            Ok(None) => Err(error_response(Status::NotFound, "Report not found")),
            Err(e) => Err(db_error_response("report", e)),
        }
    })
    .await
}

/// Delete Report endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>/Reports/<report_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Required
#[delete("/1/Orders/<order_id>/Reports/<report_id>")]
pub async fn delete_report_endpoint(
    db: DbConn,
    order_id: i32,
    report_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_report(conn, order_id, report_id) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(error_response(Status::NotFound, "Report not found")),
        Err(e) => Err(db_error_response("report", e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_report,
        list_reports,
        get_report,
        update_report,
        delete_report_endpoint
    ]
}
