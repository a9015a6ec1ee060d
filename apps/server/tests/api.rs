use autoims::domain::config::ApiConfig;
use autoims_server::Server;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

struct App {
    router: Router,
    token: String,
    _static_dir: TempDir,
}

async fn server(static_dir: &TempDir) -> Server {
    let mut cfg = ApiConfig::default();
    cfg.database.in_memory = true;
    cfg.storage.static_dir = static_dir.path().to_path_buf();
    Server::builder().config(cfg).build().await.expect("server")
}

async fn send(router: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => request.header(header::CONTENT_TYPE, "application/json").body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .expect("request");

    let response = router.clone().oneshot(request).await.expect("call");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).expect("json") };
    (status, json)
}

async fn signed_in() -> App {
    let static_dir = tempfile::tempdir().expect("static dir");
    let router = server(&static_dir).await.router();
    let (status, body) = send(
        &router,
        Method::POST,
        "/api/signup",
        None,
        Some(json!({ "name": "Workshop Admin", "username": "admin", "email": "Admin@Garage.test", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let token = body["token"].as_str().expect("token").to_owned();
    App { router, token, _static_dir: static_dir }
}

impl App {
    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, Method::GET, uri, Some(&self.token), None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, Method::POST, uri, Some(&self.token), Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        send(&self.router, Method::PUT, uri, Some(&self.token), Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        send(&self.router, Method::DELETE, uri, Some(&self.token), None).await
    }

    /// Customer, vehicle and a pending request for it; returns the request id.
    async fn booked_request(&self, plate: &str) -> i64 {
        let (status, body) = self
            .post(
                "/api/service-requests",
                json!({
                    "customer": { "name": "Dana Reyes", "phone": format!("555-{plate}"), "email": format!("{plate}@mail.test"), "address": "2 Elm St" },
                    "vehicle": { "plate_no": plate, "brand": "Honda", "model": "Civic", "year": "2019", "color": "Blue" },
                    "service_type": "Brake inspection",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["request"]["request_id"].as_i64().expect("request id")
    }
}

#[tokio::test]
async fn api_requires_a_token() {
    let static_dir = tempfile::tempdir().expect("static dir");
    let router = server(&static_dir).await.router();

    let (status, body) = send(&router, Method::GET, "/api/customers", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token is missing");

    let (status, body) = send(&router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
}

#[tokio::test]
async fn signup_login_and_me() {
    let app = signed_in().await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/login",
        None,
        Some(json!({ "email": "admin@garage.test", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let token = body["token"].as_str().expect("token");

    let (status, body) = send(&app.router, Method::GET, "/api/me", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "admin@garage.test");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn pages_docs_and_static_files() {
    let static_dir = tempfile::tempdir().expect("static dir");
    std::fs::write(static_dir.path().join("autoims.png"), b"\x89PNG").expect("logo");
    let router = server(&static_dir).await.router();

    let response = router.clone().oneshot(Request::get("/").body(Body::empty()).expect("request")).await.expect("call");
    assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/signup");

    let response =
        router.clone().oneshot(Request::get("/signup").body(Body::empty()).expect("request")).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);
    let html = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let html = String::from_utf8_lossy(&html);
    assert!(html.starts_with("<!DOCTYPE html>"), "{html}");
    assert!(html.contains("AutoIMS | Sign up"));
    assert!(html.contains("/autoims.png"));

    let response =
        router.clone().oneshot(Request::get("/autoims.png").body(Body::empty()).expect("request")).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);

    let response =
        router.oneshot(Request::get("/api/docs").body(Body::empty()).expect("request")).await.expect("call");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn customer_vehicle_and_request_lifecycle() {
    let app = signed_in().await;

    let (status, body) = app
        .post("/api/customers", json!({ "name": "Ali", "phone": "555-1000", "email": "ali@mail.test", "address": "9 Oak Rd" }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let customer_id = body["customer"]["customer_id"].as_i64().expect("customer id");

    let (status, body) = app
        .post(
            "/api/vehicles",
            json!({ "plate_no": "KA-01", "brand": "Toyota", "model": "Yaris", "year": 2021, "color": "Red", "customer_id": customer_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let vehicle_id = body["vehicle"]["vehicle_id"].as_i64().expect("vehicle id");

    let (status, body) = app.get("/api/vehicles/plate/KA-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vehicle"]["customer_name"], "Ali");

    let (status, body) = app.post("/api/service-requests", json!({ "vehicle_id": vehicle_id, "service_type": "Oil change" })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["request"]["status"], "Pending");
    assert_eq!(body["request"]["priority"], "Normal");
    let request_id = body["request"]["request_id"].as_i64().expect("request id");

    let (status, body) = app.put(&format!("/api/service-requests/{request_id}/status"), json!({ "status": "Finished" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status. Must be one of: Pending, In Progress, Completed, Cancelled");

    let (status, _) = app.put(&format!("/api/service-requests/{request_id}/status"), json!({ "status": "In Progress" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/vehicles/{vehicle_id}/service-requests")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requests"][0]["status"], "In Progress");

    let (status, body) = app.delete(&format!("/api/customers/{customer_id}")).await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    let (status, _) = app.delete(&format!("/api/service-requests/{request_id}")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn job_parts_move_stock_and_bills_total_them() {
    let app = signed_in().await;
    let request_id = app.booked_request("KA-02").await;

    let (status, body) = app.post("/api/employees", json!({ "employeeName": "Sam", "role": "Mechanic" })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let employee_id = body["employee"]["id"].as_i64().expect("employee id");

    let (status, body) = app
        .post("/api/service-jobs", json!({ "request_id": request_id, "assigned_employee": employee_id, "labor_cost": 120 }))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["job"]["job_status"], "Pending");
    let job_id = body["job"]["job_id"].as_i64().expect("job id");

    let (status, body) = app
        .post(
            "/api/inventory",
            json!({ "part_name": "Brake pads", "part_code": "BP-100", "unit_price": "25.5", "quantity_in_stock": 4, "reorder_level": 2 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let part_id = body["item"]["part_id"].as_i64().expect("part id");

    let (status, body) = app.post("/api/job-parts", json!({ "job_id": job_id, "part_id": part_id, "quantity_used": 5 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Insufficient stock. Available: 4, Requested: 5");

    let (status, body) = app.post("/api/job-parts", json!({ "job_id": job_id, "part_id": part_id, "quantity_used": 2 })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["job_part"]["part_code"], "BP-100");

    let (_, body) = app.get(&format!("/api/inventory/{part_id}")).await;
    assert_eq!(body["item"]["quantity_in_stock"], 2);

    let (status, body) = app.get(&format!("/api/job-parts/job/{job_id}/total")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_parts_cost"], 51.0);

    let (status, body) = app.get(&format!("/api/service-requests/{request_id}?include_employees=true")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["request"]["employees"][0]["employee_name"], "Sam");

    let (status, body) = app.put(&format!("/api/service-jobs/{job_id}/status"), json!({ "status": "In Progress" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert!(body["job"]["start_time"].is_string());

    let (status, body) = app.post("/api/billing", json!({ "job_id": job_id })).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["bill"]["total_amount"], 171.0);
    assert_eq!(body["bill"]["payment_status"], "Unpaid");
    let bill_id = body["bill"]["bill_id"].as_i64().expect("bill id");

    let (status, body) = app.post("/api/billing", json!({ "job_id": job_id })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Bill already exists for this job");

    let (_, body) = app.get("/api/dashboard").await;
    assert_eq!(body["stats"]["active_jobs"], 1);
    assert_eq!(body["stats"]["unpaid_total"], 171.0);
    assert_eq!(body["stats"]["low_stock_items"], 1);

    let (status, body) = app.put(&format!("/api/billing/{bill_id}/pay"), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["bill"]["payment_status"], "Paid");

    let (_, body) = app.get("/api/dashboard").await;
    assert_eq!(body["user"]["username"], "admin");
    assert_eq!(body["stats"]["total_revenue"], 171.0);
    assert_eq!(body["stats"]["unpaid_total"], 0.0);
}

#[tokio::test]
async fn removing_a_part_restores_stock() {
    let app = signed_in().await;
    let request_id = app.booked_request("KA-03").await;
    let (_, body) = app.post("/api/service-jobs", json!({ "request_id": request_id })).await;
    let job_id = body["job"]["job_id"].as_i64().expect("job id");
    let (_, body) = app
        .post("/api/inventory", json!({ "part_name": "Oil filter", "part_code": "OF-1", "unit_price": 8, "quantity_in_stock": 10, "reorder_level": 3 }))
        .await;
    let part_id = body["item"]["part_id"].as_i64().expect("part id");

    let (_, body) = app.post("/api/job-parts", json!({ "job_id": job_id, "part_id": part_id, "quantity_used": "3" })).await;
    let usage_id = body["job_part"]["job_part_id"].as_i64().expect("usage id");

    let (status, body) = app.delete(&format!("/api/job-parts/{usage_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Part removed from job successfully");

    let (_, body) = app.get(&format!("/api/inventory/{part_id}")).await;
    assert_eq!(body["item"]["quantity_in_stock"], 10);

    let (status, body) = app.delete(&format!("/api/job-parts/{usage_id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Part usage record not found");
}

#[tokio::test]
async fn dashboard_listings() {
    let app = signed_in().await;
    app.booked_request("KA-04").await;

    let (status, body) = app.get("/api/dashboard/service-requests").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service_requests"][0]["plate_no"], "KA-04");

    let (_, body) = app.get("/api/dashboard/customers").await;
    assert_eq!(body["customers"].as_array().map(Vec::len), Some(1));

    let (_, body) = app.get("/api/dashboard/inventory").await;
    assert_eq!(body["message"], "Inventory retrieved successfully");

    let (_, body) = app.get("/api/dashboard/billing").await;
    assert_eq!(body["message"], "Billing records retrieved successfully");
    assert_eq!(body["billing"], json!([]));
}

#[tokio::test]
async fn missing_rows_are_reported_before_the_body() {
    let app = signed_in().await;

    for (uri, message) in [
        ("/api/customers/999", "Customer not found"),
        ("/api/vehicles/999", "Vehicle not found"),
        ("/api/inventory/999", "Item not found"),
        ("/api/inventory/999/stock", "Item not found"),
        ("/api/service-requests/999", "Service request not found"),
        ("/api/service-requests/999/status", "Service request not found"),
        ("/api/employees/999", "Employee not found"),
        ("/api/service-jobs/999/status", "Job not found"),
    ] {
        let (status, body) = app.put(uri, json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}: {body}");
        assert_eq!(body["error"], message, "{uri}");
    }

    let (_, body) = app
        .post("/api/customers", json!({ "name": "Lee", "phone": "555-0101", "email": "lee@mail.test", "address": "3 Oak St" }))
        .await;
    let customer_id = body["customer"]["customer_id"].as_i64().expect("customer id");
    let (status, body) = app.put(&format!("/api/customers/{customer_id}"), json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No data provided");
}

#[tokio::test]
async fn stock_adjustments_stay_in_range() {
    let app = signed_in().await;
    let (_, body) = app
        .post("/api/inventory", json!({ "part_name": "Fuse", "part_code": "FU-10", "unit_price": 1, "quantity_in_stock": 2, "reorder_level": 1 }))
        .await;
    let part_id = body["item"]["part_id"].as_i64().expect("part id");
    let stock_uri = format!("/api/inventory/{part_id}/stock");

    let (status, body) = app.put(&stock_uri, json!({ "quantity_change": -3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Stock cannot go below zero or overflow. Available: 2, Change: -3");

    let (status, _) = app.put(&stock_uri, json!({ "quantity": i64::MAX })).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.put(&stock_uri, json!({ "quantity_change": 1 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.put(&stock_uri, json!({ "quantity_change": 1e30 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "quantity_change must be an integer");

    let (status, body) = app.get("/api/inventory").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["items"][0]["quantity_in_stock"], i64::MAX);
}

#[tokio::test]
async fn blank_request_filters_are_ignored() {
    let app = signed_in().await;
    app.booked_request("KA-07").await;

    let (status, body) = app.get("/api/service-requests?customer_id=&vehicle_id=").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["requests"].as_array().map(Vec::len), Some(1));

    let (status, body) = app.get("/api/vehicles?customer_id=").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["vehicles"].as_array().map(Vec::len), Some(1));
}
