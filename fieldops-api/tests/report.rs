mod common;

use rocket::http::Status;
use rocket::local::asynchronous::Client;
use serde_json::json;

use fieldops_api::models::ReportDetail;

use common::{create_company, create_order, identity_headers, report_payload, test_client};

async fn fetch_report(client: &Client, order_id: i32, report_id: i32) -> ReportDetail {
    let mut request = client.get(format!("/api/1/Orders/{}/Reports/{}", order_id, report_id));
    for header in identity_headers() {
        request.add_header(header);
    }
    let response = request.dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    response.into_json().await.expect("valid report JSON")
}

#[rocket::async_test]
async fn test_create_report_returns_full_graph() {
    let client = test_client().await;
    let company = create_company(&client, "Report Co", "60.000.000/0001-60").await;
    let order = create_order(&client, company.id).await;

    let mut request = client
        .post(format!("/api/1/Orders/{}/Reports", order.order.id))
        .json(&report_payload("a"));
    for header in identity_headers() {
        request.add_header(header);
    }
    let response = request.dispatch().await;
    assert_eq!(response.status(), Status::Created);

    let detail: ReportDetail = response.into_json().await.expect("valid report JSON");
    assert_eq!(detail.report.order_id, order.order.id);
    assert_eq!(detail.report.author_id, "idp_test_user");
    assert_eq!(detail.equipment.serial, "SN-a");
    assert_eq!(detail.descriptions.len(), 2);
    assert_eq!(detail.procedures.len(), 1);
    assert_eq!(detail.gallery.len(), 1);
}

#[rocket::async_test]
async fn test_create_report_for_missing_order_is_not_found() {
    let client = test_client().await;

    let mut request = client
        .post("/api/1/Orders/9999/Reports")
        .json(&report_payload("nope"));
    for header in identity_headers() {
        request.add_header(header);
    }
    assert_eq!(request.dispatch().await.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_create_report_without_procedures_is_bad_request() {
    let client = test_client().await;
    let company = create_company(&client, "Strict Co", "61.000.000/0001-61").await;
    let order = create_order(&client, company.id).await;

    let mut payload = report_payload("x");
    payload["procedures"] = json!([]);

    let mut request = client
        .post(format!("/api/1/Orders/{}/Reports", order.order.id))
        .json(&payload);
    for header in identity_headers() {
        request.add_header(header);
    }
    let response = request.dispatch().await;
    assert_eq!(response.status(), Status::BadRequest);

    let body: serde_json::Value = response.into_json().await.expect("valid JSON");
    assert_eq!(body["error"], "procedures is required");
}

#[rocket::async_test]
async fn test_update_report_replaces_children_exactly() {
    let client = test_client().await;
    let company = create_company(&client, "Replace Co", "62.000.000/0001-62").await;
    let order = create_order(&client, company.id).await;

    let mut request = client
        .post(format!("/api/1/Orders/{}/Reports", order.order.id))
        .json(&report_payload("a"));
    for header in identity_headers() {
        request.add_header(header);
    }
    let created: ReportDetail = request
        .dispatch()
        .await
        .into_json()
        .await
        .expect("valid report JSON");

    let mut request = client
        .put(format!(
            "/api/1/Orders/{}/Reports/{}",
            order.order.id, created.report.id
        ))
        .json(&report_payload("b"));
    for header in identity_headers() {
        request.add_header(header);
    }
    let response = request.dispatch().await;
    assert_eq!(response.status(), Status::Ok);

    // Re-read and verify by count and by content: exactly the new set, the
    // old set fully gone, nothing duplicated.
    let detail = fetch_report(&client, order.order.id, created.report.id).await;
    assert_eq!(detail.descriptions.len(), 2);
    assert!(
        detail
            .descriptions
            .iter()
            .all(|d| d.description.ends_with('b'))
    );
    assert_eq!(detail.procedures.len(), 1);
    assert_eq!(detail.procedures[0].description, "Leak inspection b");
    assert_eq!(detail.gallery.len(), 1);
    assert_eq!(detail.gallery[0].image_url, "https://img.example/b.jpg");

    // Owned rows updated in place.
    assert_eq!(detail.equipment.id, created.equipment.id);
    assert_eq!(detail.equipment.serial, "SN-b");
    assert_eq!(detail.schedule.id, created.schedule.id);
}

#[rocket::async_test]
async fn test_report_scoped_to_its_order() {
    let client = test_client().await;
    let company = create_company(&client, "Scope Co", "63.000.000/0001-63").await;
    let order_a = create_order(&client, company.id).await;
    let order_b = create_order(&client, company.id).await;

    let mut request = client
        .post(format!("/api/1/Orders/{}/Reports", order_a.order.id))
        .json(&report_payload("a"));
    for header in identity_headers() {
        request.add_header(header);
    }
    let created: ReportDetail = request
        .dispatch()
        .await
        .into_json()
        .await
        .expect("valid report JSON");

    // Reading or replacing through the wrong order is a 404.
    let mut request = client.get(format!(
        "/api/1/Orders/{}/Reports/{}",
        order_b.order.id, created.report.id
    ));
    for header in identity_headers() {
        request.add_header(header);
    }
    assert_eq!(request.dispatch().await.status(), Status::NotFound);

    let mut request = client
        .put(format!(
            "/api/1/Orders/{}/Reports/{}",
            order_b.order.id, created.report.id
        ))
        .json(&report_payload("b"));
    for header in identity_headers() {
        request.add_header(header);
    }
    assert_eq!(request.dispatch().await.status(), Status::NotFound);
}

#[rocket::async_test]
async fn test_delete_report() {
    let client = test_client().await;
    let company = create_company(&client, "Delete Co", "64.000.000/0001-64").await;
    let order = create_order(&client, company.id).await;

    let mut request = client
        .post(format!("/api/1/Orders/{}/Reports", order.order.id))
        .json(&report_payload("a"));
    for header in identity_headers() {
        request.add_header(header);
    }
    let created: ReportDetail = request
        .dispatch()
        .await
        .into_json()
        .await
        .expect("valid report JSON");

    let mut request = client.delete(format!(
        "/api/1/Orders/{}/Reports/{}",
        order.order.id, created.report.id
    ));
    for header in identity_headers() {
        request.add_header(header);
    }
    assert_eq!(request.dispatch().await.status(), Status::NoContent);

    let mut request = client.get(format!(
        "/api/1/Orders/{}/Reports/{}",
        order.order.id, created.report.id
    ));
    for header in identity_headers() {
        request.add_header(header);
    }
    assert_eq!(request.dispatch().await.status(), Status::NotFound);
}
