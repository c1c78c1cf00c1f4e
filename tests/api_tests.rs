//! API integration tests
//!
//! Drive the full router over the in-memory backend.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use gearguard_server::{
    api,
    config::{AppConfig, BootstrapConfig},
    repository::Repository,
    AppState,
};

const ADMIN_EMAIL: &str = "admin@gearguard.test";
const ADMIN_PASSWORD: &str = "admin-password";

async fn app() -> Router {
    let config = AppConfig {
        bootstrap: BootstrapConfig {
            admin_username: Some("admin".to_string()),
            admin_email: Some(ADMIN_EMAIL.to_string()),
            admin_password: Some(ADMIN_PASSWORD.to_string()),
        },
        ..AppConfig::default()
    };
    let bootstrap = config.bootstrap.clone();
    let state = AppState::new(config, Repository::in_memory());
    state
        .services
        .users
        .ensure_admin(&bootstrap)
        .await
        .expect("bootstrap admin");
    api::router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(format!("/api/v1{}", uri));
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"]["token"].as_str().unwrap().to_string()
}

/// Register an account and return (token, user id)
async fn register(app: &Router, name: &str, role: &str, department: Option<&str>) -> (String, String) {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": name,
            "email": format!("{}@gearguard.test", name),
            "password": "password1",
            "confirmPassword": "password1",
            "role": role,
            "department": department,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    (
        body["data"]["token"].as_str().unwrap().to_string(),
        body["data"]["user"]["id"].as_str().unwrap().to_string(),
    )
}

struct World {
    app: Router,
    admin: String,
    manager: String,
    technician: String,
    technician_id: String,
    employee: String,
    employee_id: String,
    team_id: String,
    equipment_id: String,
}

async fn world() -> World {
    let app = app().await;
    let admin = login(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (manager, _) = register(&app, "manager", "Manager", None).await;
    let (technician, technician_id) = register(&app, "tech1", "Technician", Some("Mechanics")).await;
    let (employee, employee_id) = register(&app, "emp1", "Employee", Some("Mechanics")).await;

    let (status, team) = send(
        &app,
        Method::POST,
        "/teams",
        Some(&manager),
        Some(json!({ "name": "Mechanics Team", "specialization": "Mechanics" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", team);
    let team_id = team["data"]["id"].as_str().unwrap().to_string();

    let (status, equipment) = send(
        &app,
        Method::POST,
        "/equipment",
        Some(&admin),
        Some(json!({
            "name": "CNC Lathe",
            "serialNumber": "CNC-0001",
            "purchaseDate": "2023-03-01T00:00:00Z",
            "warranty": { "provider": "Haas", "endDate": "2026-03-01T00:00:00Z" },
            "location": "Hall A",
            "assignedTeam": team_id,
            "defaultTechnician": technician_id,
            "assignedEmployee": employee_id,
            "department": "Production",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", equipment);
    let equipment_id = equipment["data"]["id"].as_str().unwrap().to_string();

    World {
        app,
        admin,
        manager,
        technician,
        technician_id,
        employee,
        employee_id,
        team_id,
        equipment_id,
    }
}

impl World {
    async fn new_request(&self, token: &str, scheduled: Option<&str>) -> Value {
        let (status, body) = send(
            &self.app,
            Method::POST,
            "/requests",
            Some(token),
            Some(json!({
                "subject": "Spindle vibration",
                "equipment": self.equipment_id,
                "scheduledDate": scheduled,
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"].clone()
    }

    async fn set_status(&self, token: &str, id: &str, body: Value) -> (StatusCode, Value) {
        send(
            &self.app,
            Method::PUT,
            &format!("/requests/{}/status", id),
            Some(token),
            Some(body),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/requests/kanban", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_admin_self_registration_is_forbidden() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "mallory",
            "email": "mallory@gearguard.test",
            "password": "password1",
            "confirmPassword": "password1",
            "role": "Admin",
            "department": "Mechanics",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_manager_registration_ignores_department() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "boss",
            "email": "boss@gearguard.test",
            "password": "password1",
            "confirmPassword": "password1",
            "role": "Manager",
            "department": "IT Support",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["user"]["department"], "Management");
    assert!(body["data"]["user"].get("password").is_none());
}

#[tokio::test]
async fn test_request_lifecycle_end_to_end() {
    let w = world().await;

    let request = w.new_request(&w.employee, None).await;
    assert_eq!(request["category"], "Corrective");
    assert_eq!(request["team"], w.team_id.as_str());
    assert_eq!(request["assignedTechnician"], w.technician_id.as_str());
    assert_eq!(request["status"], "New");
    assert_eq!(request["createdBy"], w.employee_id.as_str());
    let id = request["id"].as_str().unwrap();

    // employees cannot move requests
    let (status, _) = w.set_status(&w.employee, id, json!({ "status": "In Progress" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = w.set_status(&w.technician, id, json!({ "status": "In Progress" })).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "In Progress");

    let (status, body) = w
        .set_status(&w.technician, id, json!({ "status": "Repaired", "durationHours": 2.5 }))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["durationHours"], 2.5);
    assert!(!body["data"]["completionDate"].is_null());

    let (status, body) = w.set_status(&w.manager, id, json!({ "status": "In Progress" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid transition from Repaired to In Progress");

    let (status, body) = send(&w.app, Method::GET, "/requests/kanban", Some(&w.employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["Repaired"].as_array().unwrap().len(), 1);
    assert!(body["data"]["New"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["Repaired"][0]["team"]["name"], "Mechanics Team");
}

#[tokio::test]
async fn test_scrap_cascades_to_equipment() {
    let w = world().await;
    let request = w.new_request(&w.employee, None).await;
    let id = request["id"].as_str().unwrap();

    w.set_status(&w.technician, id, json!({ "status": "In Progress" })).await;
    let (status, body) = w.set_status(&w.technician, id, json!({ "status": "Scrap" })).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let (_, equipment) = send(
        &w.app,
        Method::GET,
        &format!("/equipment/{}", w.equipment_id),
        Some(&w.employee),
        None,
    )
    .await;
    assert_eq!(equipment["data"]["status"], "Scrapped");

    // terminal: nothing leaves Scrap
    let (status, _) = w.set_status(&w.technician, id, json!({ "status": "Repaired" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_second_scrap_on_scrapped_equipment() {
    let w = world().await;
    let first = w.new_request(&w.employee, None).await;
    let second = w.new_request(&w.employee, None).await;
    let equipment_uri = format!("/equipment/{}", w.equipment_id);

    for request in [&first, &second] {
        let id = request["id"].as_str().unwrap();
        w.set_status(&w.technician, id, json!({ "status": "In Progress" })).await;
        let (status, body) = w.set_status(&w.technician, id, json!({ "status": "Scrap" })).await;
        assert_eq!(status, StatusCode::OK, "{}", body);

        let (_, equipment) = send(&w.app, Method::GET, &equipment_uri, Some(&w.employee), None).await;
        assert_eq!(equipment["data"]["status"], "Scrapped");
    }
}

#[tokio::test]
async fn test_status_update_errors() {
    let w = world().await;

    let missing = format!("/requests/{}/status", Uuid::nil());
    let (status, _) = send(
        &w.app,
        Method::PUT,
        &missing,
        Some(&w.technician),
        Some(json!({ "status": "Done" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let request = w.new_request(&w.employee, None).await;
    let (status, body) = w
        .set_status(&w.technician, request["id"].as_str().unwrap(), json!({ "status": "Done" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status: Done");
}

#[tokio::test]
async fn test_assign_technician_requires_supervisor() {
    let w = world().await;
    let request = w.new_request(&w.employee, None).await;
    let uri = format!("/requests/{}/assign", request["id"].as_str().unwrap());

    let (status, _) = send(
        &w.app,
        Method::PUT,
        &uri,
        Some(&w.technician),
        Some(json!({ "technicianId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &w.app,
        Method::PUT,
        &uri,
        Some(&w.manager),
        Some(json!({ "technicianId": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert!(body["data"]["assignedTechnician"].is_null());
}

#[tokio::test]
async fn test_reports_and_calendar() {
    let w = world().await;
    let first = w.new_request(&w.employee, None).await;
    w.new_request(&w.employee, None).await;
    w.new_request(&w.employee, Some("2030-06-01T08:00:00Z")).await;

    let id = first["id"].as_str().unwrap();
    w.set_status(&w.technician, id, json!({ "status": "In Progress" })).await;
    w.set_status(&w.technician, id, json!({ "status": "Repaired", "durationHours": 3 })).await;

    let (status, _) = send(&w.app, Method::GET, "/requests/reports", Some(&w.technician), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&w.app, Method::GET, "/requests/reports", Some(&w.manager), None).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(
        body["data"]["requestsByTeam"],
        json!([{ "team": "Mechanics Team", "count": 3, "completed": 1 }])
    );
    assert_eq!(body["data"]["requestsByEquipment"][0]["department"], "Production");
    assert_eq!(body["data"]["requestsByEquipment"][0]["avgDuration"], 1.0);

    let (status, body) = send(&w.app, Method::GET, "/requests/calendar", Some(&w.employee), None).await;
    assert_eq!(status, StatusCode::OK);
    let calendar = body["data"].as_array().unwrap();
    assert_eq!(calendar.len(), 1);
    assert_eq!(calendar[0]["category"], "Preventive");
}

#[tokio::test]
async fn test_equipment_requests_and_delete_guard() {
    let w = world().await;
    w.new_request(&w.employee, None).await;

    let (status, body) = send(
        &w.app,
        Method::GET,
        &format!("/equipment/{}/requests", w.equipment_id),
        Some(&w.employee),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["openCount"], 1);

    let uri = format!("/equipment/{}", w.equipment_id);
    let (status, _) = send(&w.app, Method::DELETE, &uri, Some(&w.manager), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&w.app, Method::DELETE, &uri, Some(&w.admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_duplicate_serial_number() {
    let w = world().await;
    let (status, body) = send(
        &w.app,
        Method::POST,
        "/equipment",
        Some(&w.admin),
        Some(json!({
            "name": "Second lathe",
            "serialNumber": "CNC-0001",
            "purchaseDate": "2024-01-01T00:00:00Z",
            "location": "Hall B",
            "assignedTeam": w.team_id,
            "assignedEmployee": w.employee_id,
            "department": "Production",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "serialNumber already exists");
}

#[tokio::test]
async fn test_malformed_input_uses_envelope() {
    let w = world().await;
    let (status, body) = send(
        &w.app,
        Method::PUT,
        "/requests/not-a-uuid/status",
        Some(&w.technician),
        Some(json!({ "status": "In Progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &w.app,
        Method::POST,
        "/requests",
        Some(&w.employee),
        Some(json!({ "subject": "No equipment" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_status_table_is_published() {
    let w = world().await;
    let (status, body) = send(&w.app, Method::GET, "/requests/statuses", Some(&w.employee), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][1], json!({ "from": "In Progress", "to": ["Repaired", "Scrap"] }));
}
