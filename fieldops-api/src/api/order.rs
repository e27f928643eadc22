//! API endpoints for managing service orders.
//!
//! Orders are soft-cancelled, never deleted: reports and surveys keep a
//! valid parent for referential history. Status changes go through the
//! state machine; anything it refuses is a 409.

use chrono::{Datelike, Utc};
use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, bad_request, db_error_response, error_response};
use crate::models::{Order, OrderDetail, OrderInput, OrderSchedule, OrderStatusInput};
use crate::orm::DbConn;
use crate::orm::order::{
    TransitionOutcome, cancel_order, get_all_orders, get_order_by_id, get_order_schedule,
    insert_order, set_order_status, update_order,
};
use crate::session_guards::AuthenticatedUser;

fn detail(order: Order, schedule: OrderSchedule) -> OrderDetail {
    let display_number = order.display_number(Utc::now().year());
    OrderDetail {
        order,
        schedule,
        display_number,
    }
}

/// Create Order endpoint.
///
/// - **URL:** `/api/1/Orders`
/// - **Method:** `POST`
/// - **Purpose:** Creates an order and its schedule row in one transaction
/// - **Authentication:** Required
///
/// # Request Format
///
/// ```json
/// {
///   "company_id": 1,
///   "requester": "Maintenance lead",
///   "location": "Plant A",
///   "purpose": "Quarterly inspection",
///   "schedule": { "starts_on": "2026-09-01", "predicted_end_on": "2026-09-03" }
/// }
/// ```
///
/// New orders start IN_PROGRESS. A missing company is a 409 via the foreign
/// key constraint.
#[post("/1/Orders", data = "<new_order>")]
pub async fn create_order(
    db: DbConn,
    new_order: Json<OrderInput>,
    _auth_user: AuthenticatedUser,
) -> Result<status::Created<Json<OrderDetail>>, ApiError> {
    let input = new_order.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| {
        insert_order(conn, &input)
            .map(|(order, schedule)| {
                status::Created::new("/").body(Json(detail(order, schedule)))
            })
            .map_err(|e| db_error_response("order", e))
    })
    .await
}

/// List Orders endpoint.
///
/// - **URL:** `/api/1/Orders`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves all orders, ordered by id
/// - **Authentication:** Required
#[get("/1/Orders")]
pub async fn list_orders(
    db: DbConn,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Order>>, ApiError> {
    db.run(|conn| {
        get_all_orders(conn)
            .map(Json)
            .map_err(|e| db_error_response("orders", e))
    })
    .await
}

/// Get Order endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves the order, its schedule, and the display number
/// - **Authentication:** Required
#[get("/1/Orders/<order_id>")]
pub async fn get_order(
    db: DbConn,
    order_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<OrderDetail>, ApiError> {
    db.run(move |conn| {
        let order = match get_order_by_id(conn, order_id) {
            Ok(Some(order)) => order,
            Ok(None) => return Err(error_response(Status::NotFound, "Order not found")),
            Err(e) => return Err(db_error_response("order", e)),
        };
        let schedule = get_order_schedule(conn, order_id)
            .map_err(|e| db_error_response("order schedule", e))?;
        Ok(Json(detail(order, schedule)))
    })
    .await
}

/// Update Order endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Replaces the order's scalar fields and schedule
/// - **Authentication:** Required
///
/// The status is not updatable here; use the status or cancel endpoints.
#[put("/1/Orders/<order_id>", data = "<request>")]
pub async fn update_order_endpoint(
    db: DbConn,
    order_id: i32,
    request: Json<OrderInput>,
    _auth_user: AuthenticatedUser,
) -> Result<Json<OrderDetail>, ApiError> {
    let input = request.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| match update_order(conn, order_id, &input) {
        Ok(Some((order, schedule))) => Ok(Json(detail(order, schedule))),
        Ok(None) => Err(error_response(Status::NotFound, "Order not found")),
        Err(e) => Err(db_error_response("order", e)),
    })
    .await
}

fn transition_response(
    outcome: Result<TransitionOutcome, diesel::result::Error>,
) -> Result<Json<Order>, ApiError> {
    match outcome {
        Ok(TransitionOutcome::Updated(order)) => Ok(Json(order)),
        Ok(TransitionOutcome::NotFound) => {
            Err(error_response(Status::NotFound, "Order not found"))
        }
        Ok(TransitionOutcome::Refused(current)) => Err(error_response(
            Status::Conflict,
            format!("Order status {} does not permit this transition", current.as_str()),
        )),
        Err(e) => Err(db_error_response("order", e)),
    }
}

/// Cancel Order endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>/Cancel`
/// - **Method:** `POST`
/// - **Purpose:** Soft cancel: sets status=CANCELED, the row survives
/// - **Authentication:** Required
///
/// Cancelling an already-cancelled order is a 409: CANCELED is terminal.
#[post("/1/Orders/<order_id>/Cancel")]
pub async fn cancel_order_endpoint(
    db: DbConn,
    order_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Order>, ApiError> {
    db.run(move |conn| transition_response(cancel_order(conn, order_id))).await
}

/// Update Order Status endpoint.
///
/// - **URL:** `/api/1/Orders/<order_id>/Status`
/// - **Method:** `PUT`
/// - **Purpose:** Moves the order along the forward path
///   IN_PROGRESS → WAITING_SURVEY → FINISHED
/// - **Authentication:** Required
#[put("/1/Orders/<order_id>/Status", data = "<request>")]
pub async fn update_order_status(
    db: DbConn,
    order_id: i32,
    request: Json<OrderStatusInput>,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Order>, ApiError> {
    let next = request.into_inner().status;
    db.run(move |conn| transition_response(set_order_status(conn, order_id, next))).await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_order,
        list_orders,
        get_order,
        update_order_endpoint,
        cancel_order_endpoint,
        update_order_status
    ]
}
