use std::collections::HashMap;
use std::net::SocketAddr;

use reqwest::{StatusCode, header};
use serde_json::{Value, json};

use dealerhub_api::config::AppConfig;

const ADMIN_PASSWORD: &str = "admin-secret-pw";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let env: HashMap<&str, &str> = HashMap::from([
            ("JWT_SECRET", "black-box-secret"),
            ("ADMIN_PASSWORD", ADMIN_PASSWORD),
            ("ADMIN_USERNAME", "root"),
            ("BCRYPT_COST", "4"),
        ]);
        let config = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();

        // Same router as prod, in-memory store, ephemeral port.
        let app = dealerhub_api::app::build_app(&config).await.unwrap();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
                .await
                .unwrap();
        });

        Self {
            base_url,
            client: reqwest::Client::new(),
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn admin_token(&self) -> String {
        let res = self
            .client
            .post(self.url("/api/auth/admin/login"))
            .json(&json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body["token"].as_str().unwrap().to_string()
    }

    async fn dealer_login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// Create a dealer as admin; returns (dealer json, temp password).
    async fn create_dealer(&self, admin: &str, username: &str) -> (Value, String) {
        let res = self
            .client
            .post(self.url("/api/admin/dealers"))
            .bearer_auth(admin)
            .json(&dealer_payload(username))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = res.json().await.unwrap();
        let temp = body["tempPassword"].as_str().unwrap().to_string();
        (body["dealer"].clone(), temp)
    }

    /// Create a dealer and log in with a permanent password; returns (dealer id, token).
    async fn onboarded_dealer(&self, admin: &str, username: &str) -> (String, String) {
        let (dealer, temp) = self.create_dealer(admin, username).await;
        let body: Value = self.dealer_login(username, &temp).await.json().await.unwrap();
        let token = body["token"].as_str().unwrap().to_string();
        let res = self
            .client
            .post(self.url("/api/auth/change-password"))
            .bearer_auth(&token)
            .json(&json!({ "newPassword": "permanent-pw-1" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        (dealer["id"].as_str().unwrap().to_string(), token)
    }

    async fn audit_log(&self, admin: &str) -> Vec<Value> {
        self.client
            .get(self.url("/api/audit"))
            .bearer_auth(admin)
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn dealer_payload(username: &str) -> Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "companyName": format!("{username} Motors"),
        "primaryContactName": "Asha Rao",
        "primaryContactPhone": "+91 90000 11111",
        "address": "12 Ring Road, Pune",
    })
}

async fn error_code(res: reqwest::Response) -> String {
    let body: Value = res.json().await.unwrap();
    body["error"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn health_is_public() {
    let server = TestServer::spawn().await;
    let res = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body, json!({ "ok": true }));
}

#[tokio::test]
async fn protected_routes_require_a_session() {
    let server = TestServer::spawn().await;

    for path in ["/api/employees", "/api/customers", "/api/search?q=ab", "/api/admin/dealers", "/api/audit"] {
        let res = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{path}");
    }

    let res = server
        .client
        .get(server.url("/api/employees"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_token");
}

#[tokio::test]
async fn admin_actions_share_one_audit_identity() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    server.create_dealer(&admin, "d1").await;

    let log = server.audit_log(&admin).await;
    let admin_entries: Vec<&Value> = log
        .iter()
        .filter(|e| e["actionType"] == "LOGIN" || e["actionType"] == "CREATE_DEALER")
        .collect();
    assert_eq!(admin_entries.len(), 2);
    for entry in admin_entries {
        assert_eq!(entry["whoUserId"], "admin");
        assert_eq!(entry["whoUserName"], "Admin (root)");
    }
}

#[tokio::test]
async fn wrong_admin_password_is_rejected() {
    let server = TestServer::spawn().await;
    let res = server
        .client
        .post(server.url("/api/auth/admin/login"))
        .json(&json!({ "password": "nope" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(error_code(res).await, "invalid_credentials");
}

#[tokio::test]
async fn temporary_password_forces_a_change() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;

    let (dealer, temp) = server.create_dealer(&admin, "d1").await;
    assert_eq!(dealer["status"], "ACTIVE");
    assert_eq!(dealer["forcePasswordChange"], true);
    assert!(dealer.get("passwordHash").is_none());
    assert_eq!(temp.len(), dealerhub_auth::TEMP_PASSWORD_LEN);

    let res = server.dealer_login("d1", &temp).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["dealer"]["forcePasswordChange"], true);
    let token = body["token"].as_str().unwrap().to_string();

    let res = server
        .client
        .post(server.url("/api/auth/change-password"))
        .bearer_auth(&token)
        .json(&json!({ "newPassword": "short" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .client
        .post(server.url("/api/auth/change-password"))
        .bearer_auth(&token)
        .json(&json!({ "newPassword": "brand-new-pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.dealer_login("d1", &temp).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    // Email works as the login identifier too.
    let res = server.dealer_login("D1@example.com", "brand-new-pw").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["dealer"]["forcePasswordChange"], false);
}

#[tokio::test]
async fn suspension_blocks_login_and_existing_sessions() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (dealer_id, token) = server.onboarded_dealer(&admin, "d1").await;

    let res = server
        .client
        .post(server.url(&format!("/api/admin/dealers/{dealer_id}/suspend")))
        .bearer_auth(&admin)
        .json(&json!({ "reason": "unpaid invoices" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "SUSPENDED");
    assert_eq!(body["suspensionReason"], "unpaid invoices");

    let res = server.dealer_login("d1", "permanent-pw-1").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await.unwrap();
    assert!(body["message"].as_str().unwrap().contains("SUSPENDED"));

    let res = server
        .client
        .get(server.url("/api/employees"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Suspending again replaces the reason.
    let res = server
        .client
        .post(server.url(&format!("/api/admin/dealers/{dealer_id}/suspend")))
        .bearer_auth(&admin)
        .json(&json!({ "reason": "audit pending" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["suspensionReason"], "audit pending");

    // A suspended dealer's session no longer resolves to a user.
    let body: Value = server
        .client
        .get(server.url("/api/auth/me"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "user": null }));

    let res = server
        .client
        .post(server.url(&format!("/api/admin/dealers/{dealer_id}/activate")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.dealer_login("d1", "permanent-pw-1").await;
    assert_eq!(res.status(), StatusCode::OK);

    // Activating an already active dealer is accepted and still audited.
    let res = server
        .client
        .post(server.url(&format!("/api/admin/dealers/{dealer_id}/activate")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let activations = server
        .audit_log(&admin)
        .await
        .iter()
        .filter(|e| e["actionType"] == "ACTIVATE_DEALER")
        .count();
    assert_eq!(activations, 2);
}

#[tokio::test]
async fn dealer_can_be_created_with_only_identity_and_company() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;

    let res = server
        .client
        .post(server.url("/api/admin/dealers"))
        .bearer_auth(&admin)
        .json(&json!({ "username": "d1", "email": "d1@x.com", "companyName": "Acme" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["dealer"]["username"], "d1");
    assert_eq!(body["dealer"]["primaryContactName"], Value::Null);
    let temp = body["tempPassword"].as_str().unwrap();

    let res = server.dealer_login("d1", temp).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["dealer"]["forcePasswordChange"], true);
}

#[tokio::test]
async fn deleted_dealer_cannot_transition() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (dealer, _) = server.create_dealer(&admin, "d1").await;
    let id = dealer["id"].as_str().unwrap();

    let res = server
        .client
        .post(server.url(&format!("/api/admin/dealers/{id}/delete")))
        .bearer_auth(&admin)
        .json(&json!({ "reason": "closed business" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "DELETED");
    assert!(body["deletionDate"].is_string());

    for action in ["activate", "suspend", "delete"] {
        let res = server
            .client
            .post(server.url(&format!("/api/admin/dealers/{id}/{action}")))
            .bearer_auth(&admin)
            .json(&json!({ "reason": "try again" }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{action}");
    }

    // Soft delete keeps the row visible to the admin.
    let res = server
        .client
        .get(server.url(&format!("/api/admin/dealers/{id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_identifiers_conflict_across_tenants() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (_, d1) = server.onboarded_dealer(&admin, "d1").await;
    let (_, d2) = server.onboarded_dealer(&admin, "d2").await;

    let res = server
        .client
        .post(server.url("/api/admin/dealers"))
        .bearer_auth(&admin)
        .json(&dealer_payload("D1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let employee = json!({
        "firstName": "Ravi",
        "lastName": "Kumar",
        "phone": "98765 43210",
        "aadhar": "1234 5678 9012",
    });
    let res = server
        .client
        .post(server.url("/api/employees"))
        .bearer_auth(&d1)
        .json(&employee)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let mut duplicate = employee.clone();
    duplicate["aadhar"] = json!("1234-5678-9012");
    let res = server
        .client
        .post(server.url("/api/employees"))
        .bearer_auth(&d2)
        .json(&duplicate)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(error_code(res).await, "conflict");
}

#[tokio::test]
async fn dealers_only_see_their_own_records() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (d1_id, d1) = server.onboarded_dealer(&admin, "d1").await;
    let (_, d2) = server.onboarded_dealer(&admin, "d2").await;

    let res = server
        .client
        .post(server.url("/api/customers"))
        .bearer_auth(&d1)
        .json(&json!({
            "nameOrEntity": "Sharma Traders",
            "customerType": "business",
            "phone": "022 4000 5000",
            "officialId": "GSTIN-27AAB",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let customer: Value = res.json().await.unwrap();
    assert_eq!(customer["dealerId"], d1_id.as_str());
    let customer_id = customer["id"].as_str().unwrap();

    let res = server
        .client
        .get(server.url(&format!("/api/customers/{customer_id}")))
        .bearer_auth(&d2)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let list: Vec<Value> = server
        .client
        .get(server.url("/api/customers"))
        .bearer_auth(&d2)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(list.is_empty());

    let list: Vec<Value> = server
        .client
        .get(server.url(&format!("/api/customers?dealerId={d1_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(list.len(), 1);

    let res = server
        .client
        .post(server.url(&format!("/api/customers/{customer_id}/terminate")))
        .bearer_auth(&d1)
        .json(&json!({ "reason": "moved away" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["status"], "inactive");
}

#[tokio::test]
async fn admin_must_name_an_owner_when_creating_records() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;

    let res = server
        .client
        .post(server.url("/api/employees"))
        .bearer_auth(&admin)
        .json(&json!({
            "firstName": "Ravi",
            "lastName": "Kumar",
            "phone": "98765 43210",
            "aadhar": "1234 5678 9012",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_code(res).await, "validation_error");
}

#[tokio::test]
async fn search_spans_tenants_and_is_audited_once() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (_, d1) = server.onboarded_dealer(&admin, "d1").await;
    let (_, d2) = server.onboarded_dealer(&admin, "d2").await;

    let res = server
        .client
        .post(server.url("/api/employees"))
        .bearer_auth(&d1)
        .json(&json!({
            "firstName": "Ravi",
            "lastName": "Kumar",
            "phone": "98765 43210",
            "aadhar": "1234 5678 9012",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let results: Vec<Value> = server
        .client
        .get(server.url("/api/search?q=987"))
        .bearer_auth(&d2)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["entityType"], "employee");
    assert_eq!(results[0]["canonicalName"], "Ravi Kumar");
    assert_eq!(results[0]["ownerDealerName"], "d1 Motors");

    let searches = |log: &[Value]| log.iter().filter(|e| e["actionType"] == "SEARCH").count();
    let log = server.audit_log(&admin).await;
    assert_eq!(searches(&log), 1);

    let results: Vec<Value> = server
        .client
        .get(server.url("/api/search?q=a"))
        .bearer_auth(&d2)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(results.is_empty());
    let log = server.audit_log(&admin).await;
    assert_eq!(searches(&log), 1);
}

#[tokio::test]
async fn session_cookie_authenticates_requests() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (_, temp) = server.create_dealer(&admin, "d1").await;

    let res = server.dealer_login("d1", &temp).await;
    let set_cookie = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(set_cookie.starts_with("token="));
    assert!(set_cookie.contains("HttpOnly"));
    let cookie = set_cookie.split(';').next().unwrap().to_string();

    let res = server
        .client
        .get(server.url("/api/auth/me"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["user"]["username"], "d1");
    assert_eq!(body["user"]["role"], "dealer");

    let res = server
        .client
        .get(server.url("/api/employees"))
        .header(header::COOKIE, &cookie)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = server.client.post(server.url("/api/auth/logout")).send().await.unwrap();
    let cleared = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.contains("Max-Age=0"));

    let body: Value = server
        .client
        .get(server.url("/api/auth/me"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "user": null }));
}

#[tokio::test]
async fn dealers_cannot_reach_admin_routes() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (dealer_id, token) = server.onboarded_dealer(&admin, "d1").await;

    for path in ["/api/admin/dealers".to_string(), "/api/audit".to_string(), format!("/api/audit/dealer/{dealer_id}")] {
        let res = server.client.get(server.url(&path)).bearer_auth(&token).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "{path}");
    }
}

#[tokio::test]
async fn forgot_password_never_reveals_accounts() {
    let server = TestServer::spawn().await;
    let admin = server.admin_token().await;
    let (dealer_id, _) = server.onboarded_dealer(&admin, "d1").await;

    for username in ["d1", "nobody"] {
        let res = server
            .client
            .post(server.url("/api/auth/forgot"))
            .json(&json!({ "username": username }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body, json!({ "ok": true }));
    }

    // The old password no longer works and the dealer must pick a new one.
    let res = server.dealer_login("d1", "permanent-pw-1").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let entries: Vec<Value> = server
        .client
        .get(server.url(&format!("/api/audit/dealer/{dealer_id}")))
        .bearer_auth(&admin)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(entries.iter().any(|e| e["actionType"] == "RESET_PASSWORD"));
    assert!(entries.iter().all(|e| e["dealerId"] == dealer_id.as_str()));
}
