//! Request guard for authenticated staff.
//!
//! Authentication itself lives with the external identity provider; the
//! fronting auth proxy forwards the verified identity as request headers
//! (oauth2-proxy convention). The guard trusts those headers, so the API
//! must only ever be reachable through the proxy. A request without the
//! user id header fails with 401.

use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};

pub const USER_ID_HEADER: &str = "X-Auth-Request-User";
pub const EMAIL_HEADER: &str = "X-Auth-Request-Email";
pub const NAME_HEADER: &str = "X-Auth-Request-Preferred-Username";
pub const PICTURE_HEADER: &str = "X-Auth-Request-Picture";

/// The identity asserted by the auth proxy for the current request.
#[derive(Debug)]
pub struct AuthenticatedUser {
    /// Stable user id issued by the identity provider.
    pub external_user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match req.headers().get_one(USER_ID_HEADER) {
            Some(user_id) if !user_id.trim().is_empty() => {
                Outcome::Success(AuthenticatedUser {
                    external_user_id: user_id.to_string(),
                    name: req.headers().get_one(NAME_HEADER).map(str::to_string),
                    email: req.headers().get_one(EMAIL_HEADER).map(str::to_string),
                    image_url: req.headers().get_one(PICTURE_HEADER).map(str::to_string),
                })
            }
            _ => Outcome::Error((Status::Unauthorized, ())),
        }
    }
}
