//! Shared helpers for the API integration tests.

use rocket::http::Header;
use rocket::local::asynchronous::Client;
use serde_json::json;

use fieldops_api::models::{Company, OrderDetail};
use fieldops_api::orm::testing::test_rocket;
use fieldops_api::session_guards::{EMAIL_HEADER, NAME_HEADER, USER_ID_HEADER};

pub async fn test_client() -> Client {
    Client::tracked(test_rocket())
        .await
        .expect("valid rocket instance")
}

/// Identity headers as the auth proxy would forward them.
pub fn identity_headers() -> Vec<Header<'static>> {
    vec![
        Header::new(USER_ID_HEADER, "idp_test_user"),
        Header::new(NAME_HEADER, "Test User"),
        Header::new(EMAIL_HEADER, "test.user@example.com"),
    ]
}

pub async fn create_company(client: &Client, name: &str, legal_id: &str) -> Company {
    let mut req = client.post("/api/1/Companies").json(&json!({
        "name": name,
        "legal_id": legal_id,
        "unit_label": "Plant A"
    }));
    for header in identity_headers() {
        req.add_header(header);
    }
    let response = req.dispatch().await;
    assert_eq!(response.status(), rocket::http::Status::Created);
    response.into_json().await.expect("valid company JSON")
}

pub async fn create_order(client: &Client, company_id: i32) -> OrderDetail {
    let mut req = client.post("/api/1/Orders").json(&json!({
        "company_id": company_id,
        "requester": "Maintenance lead",
        "location": "Plant A",
        "purpose": "Quarterly inspection",
        "schedule": { "starts_on": "2026-09-01", "predicted_end_on": "2026-09-03" }
    }));
    for header in identity_headers() {
        req.add_header(header);
    }
    let response = req.dispatch().await;
    assert_eq!(response.status(), rocket::http::Status::Created);
    response.into_json().await.expect("valid order JSON")
}

pub fn report_payload(suffix: &str) -> serde_json::Value {
    json!({
        "schedule": { "visit_date": "2026-05-03", "start_time": "09:00", "end_time": "17:00" },
        "equipment": {
            "location": format!("Machine room {}", suffix),
            "name": "Compressor",
            "model": "ZR-144",
            "serial": format!("SN-{}", suffix),
            "tag": "EQ-77",
            "kind": "Refrigeration",
            "description": "Scroll compressor"
        },
        "service": {
            "diagnostic": format!("Diagnostic {}", suffix),
            "recommendation": "Replace filter drier",
            "additional_info": "n/a"
        },
        "descriptions": [
            { "description": format!("Description one {}", suffix) },
            { "description": format!("Description two {}", suffix) }
        ],
        "procedures": [
            { "description": format!("Leak inspection {}", suffix) }
        ],
        "gallery": [
            { "image_url": format!("https://img.example/{}.jpg", suffix), "comment": format!("Before {}", suffix) }
        ]
    })
}
