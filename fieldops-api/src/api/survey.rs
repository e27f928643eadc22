//! API endpoints for post-service surveys.
//!
//! A survey is tied 1:1 to an order. Creating a second one is a 409; the
//! explicit check runs first and the unique constraint backstops races.

use rocket::Route;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;

use crate::api::{ApiError, bad_request, db_error_response, error_response};
use crate::models::{Survey, SurveyDetail, SurveyInput};
use crate::orm::DbConn;
use crate::orm::order::get_order_by_id;
use crate::orm::survey::{
    delete_survey, get_all_surveys, get_survey_by_id, get_survey_by_order, get_survey_detail,
    insert_survey, update_survey,
};
use crate::session_guards::AuthenticatedUser;

/// Create Survey endpoint.
///
/// - **URL:** `/api/1/Surveys`
/// - **Method:** `POST`
/// - **Purpose:** Creates a survey and its participants in one transaction
/// - **Authentication:** Required
///
/// # Request Format
///
/// ```json
/// {
///   "order_id": 1,
///   "participants": [
///     { "name": "Alice", "email": "alice@example.com", "role": "operator" }
///   ]
/// }
/// ```
///
/// Returns 201, 404 if the order is absent, 409 if the order already has a
/// survey.
#[post("/1/Surveys", data = "<new_survey>")]
pub async fn create_survey(
    db: DbConn,
    new_survey: Json<SurveyInput>,
    _auth_user: AuthenticatedUser,
) -> Result<status::Created<Json<SurveyDetail>>, ApiError> {
    let input = new_survey.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| {
        match get_order_by_id(conn, input.order_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(error_response(Status::NotFound, "Order not found")),
            Err(e) => return Err(db_error_response("order", e)),
        }
        match get_survey_by_order(conn, input.order_id) {
            Ok(None) => {}
            Ok(Some(_)) => {
                return Err(error_response(
                    Status::Conflict,
                    "Order already has a survey",
                ));
            }
            Err(e) => return Err(db_error_response("survey", e)),
        }

        insert_survey(conn, &input)
            .map(|detail| status::Created::new("/").body(Json(detail)))
            .map_err(|e| db_error_response("survey", e))
    })
    .await
}

/// List Surveys endpoint.
///
/// - **URL:** `/api/1/Surveys`
/// - **Method:** `GET`
/// - **Authentication:** Required
#[get("/1/Surveys")]
pub async fn list_surveys(
    db: DbConn,
    _auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Survey>>, ApiError> {
    db.run(|conn| {
        get_all_surveys(conn)
            .map(Json)
            .map_err(|e| db_error_response("surveys", e))
    })
    .await
}

/// Get Survey endpoint.
///
/// - **URL:** `/api/1/Surveys/<survey_id>`
/// - **Method:** `GET`
/// - **Purpose:** Retrieves the survey and its participants
/// - **Authentication:** Required
#[get("/1/Surveys/<survey_id>")]
pub async fn get_survey(
    db: DbConn,
    survey_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Json<SurveyDetail>, ApiError> {
    db.run(move |conn| {
        let survey = match get_survey_by_id(conn, survey_id) {
            Ok(Some(survey)) => survey,
            Ok(None) => return Err(error_response(Status::NotFound, "Survey not found")),
            Err(e) => return Err(db_error_response("survey", e)),
        };
        get_survey_detail(conn, survey)
            .map(Json)
            .map_err(|e| db_error_response("survey", e))
    })
    .await
}

/// Update Survey endpoint.
///
/// - **URL:** `/api/1/Surveys/<survey_id>`
/// - **Method:** `PUT`
/// - **Purpose:** Replaces draft participants: rows with a null answered
///   timestamp are deleted, the new list inserted, in one transaction
/// - **Authentication:** Required
///
/// Answered participants are preserved. The payload's `order_id` must name
/// an existing order but never rebinds the survey; it stays on the order it
/// was created for.
#[put("/1/Surveys/<survey_id>", data = "<request>")]
pub async fn update_survey_endpoint(
    db: DbConn,
    survey_id: i32,
    request: Json<SurveyInput>,
    _auth_user: AuthenticatedUser,
) -> Result<Json<SurveyDetail>, ApiError> {
    let input = request.into_inner();
    input.validate().map_err(bad_request)?;

    db.run(move |conn| {
        match get_order_by_id(conn, input.order_id) {
            Ok(Some(_)) => {}
            Ok(None) => return Err(error_response(Status::NotFound, "Order not found")),
            Err(e) => return Err(db_error_response("order", e)),
        }

        match update_survey(conn, survey_id, &input) {
            Ok(Some(detail)) => Ok(Json(detail)),
            Ok(None) => Err(error_response(Status::NotFound, "Survey not found")),
            Err(e) => Err(db_error_response("survey", e)),
        }
    })
    .await
}

/// Delete Survey endpoint.
///
/// - **URL:** `/api/1/Surveys/<survey_id>`
/// - **Method:** `DELETE`
/// - **Authentication:** Required
#[delete("/1/Surveys/<survey_id>")]
pub async fn delete_survey_endpoint(
    db: DbConn,
    survey_id: i32,
    _auth_user: AuthenticatedUser,
) -> Result<Status, ApiError> {
    db.run(move |conn| match delete_survey(conn, survey_id) {
        Ok(true) => Ok(Status::NoContent),
        Ok(false) => Err(error_response(Status::NotFound, "Survey not found")),
        Err(e) => Err(db_error_response("survey", e)),
    })
    .await
}

/// Returns a vector of all routes defined in this module.
pub fn routes() -> Vec<Route> {
    routes![
        create_survey,
        list_surveys,
        get_survey,
        update_survey_endpoint,
        delete_survey_endpoint
    ]
}
