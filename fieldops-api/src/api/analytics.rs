//! API endpoint for the dashboard's aggregate counts.

use rocket::Route;
use rocket::serde::json::Json;

use crate::api::{ApiError, db_error_response};
use crate::models::DashboardTotals;
use crate::orm::DbConn;
use crate::orm::analytics::get_dashboard_totals;
use crate::session_guards::AuthenticatedUser;

/// Dashboard Analytics endpoint.
///
/// - **URL:** `/api/1/Analytics`
/// - **Method:** `GET`
/// - **Purpose:** Returns total counts of orders, reports, and companies
/// - **Authentication:** Required
#[get("/1/Analytics")]
pub async fn dashboard_analytics(
    db: DbConn,
    _auth_user: AuthenticatedUser,
) -> Result<Json<DashboardTotals>, ApiError> {
    db.run(|conn| {
        get_dashboard_totals(conn)
            .map(Json)
            .map_err(|e| db_error_response("analytics", e))
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![dashboard_analytics]
}
