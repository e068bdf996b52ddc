mod helpers;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use helpers::TestApp;
use taskforge_core::{NewSession, SessionStore, generate_session_token};

#[tokio::test]
async fn test_health() {
    let app = TestApp::spawn();
    let (status, _) = app.request("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_verify_login_flow() {
    let app = TestApp::spawn();

    let (status, body) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Alice",
                "email": "alice@x.com",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "alice@x.com");
    assert_eq!(body["user"]["is_verified"], false);
    // Credential material never appears in responses.
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());

    // The verification code went out by email, six digits long.
    let code = app.mailer.last_code().await;
    assert_eq!(code.as_str().len(), 6);

    // Login is gated on verification even with the right password.
    let (status, body) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "alice@x.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Email not verified");

    let (status, _) = app
        .request(
            "POST",
            "/auth/verify-email",
            None,
            Some(json!({ "code": code.as_str() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (access_token, refresh_token, _) = app.login("alice@x.com", "password123").await;
    assert!(!refresh_token.is_empty());

    let (status, body) = app
        .request("GET", "/auth/me", Some(&access_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "alice@x.com");
    assert_eq!(body["is_verified"], true);
}

#[tokio::test]
async fn test_duplicate_registration_rejected() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;

    let (status, body) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Mallory",
                "email": "alice@x.com",
                "password": "otherpassword"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "A user with this email already exists");

    // The original account is untouched.
    app.login("alice@x.com", "password123").await;
}

#[tokio::test]
async fn test_login_failures_share_one_message() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;

    let (status, unknown) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "ghost@x.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, wrong) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "alice@x.com", "password": "wrongpassword" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(unknown["error"], wrong["error"]);
}

#[tokio::test]
async fn test_verification_code_is_single_use() {
    let app = TestApp::spawn();
    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Alice",
                "email": "alice@x.com",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let code = app.mailer.last_code().await;
    let body = json!({ "code": code.as_str() });

    let (status, _) = app
        .request("POST", "/auth/verify-email", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request("POST", "/auth/verify-email", None, Some(body))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_refresh_rotates_near_expiry() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;
    let (_, _, user_id) = app.login("alice@x.com", "password123").await;

    // A session two days from expiry sits inside the rotation window.
    let near_expiry = generate_session_token();
    app.session_store
        .create(NewSession {
            token: near_expiry.clone(),
            user_id,
            expires_at: Utc::now() + chrono::Duration::days(2),
            device: None,
        })
        .await
        .unwrap();

    let (status, body) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": near_expiry })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let rotated = body["refresh_token"].as_str().unwrap().to_owned();
    assert_ne!(rotated, near_expiry);
    assert!(!body["access_token"].as_str().unwrap().is_empty());

    // The replaced token cannot be replayed.
    let (status, body) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": near_expiry })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Refresh token has been revoked");

    // The rotated token works.
    let (status, _) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": rotated })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_refresh_far_from_expiry_keeps_token() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;
    // A fresh login issues a 30-day token, well outside the rotation
    // window.
    let (_, refresh_token, _) = app.login("alice@x.com", "password123").await;

    let (status, body) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refresh_token"], refresh_token.as_str());
}

#[tokio::test]
async fn test_unknown_refresh_token_rejected() {
    let app = TestApp::spawn();
    let (status, body) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": "no-such-token" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid refresh token");
}

#[tokio::test]
async fn test_logout_revokes_session() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;
    let (_, refresh_token, _) = app.login("alice@x.com", "password123").await;

    let (status, _) = app
        .request(
            "POST",
            "/auth/logout",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Logging out again with the same (now dead) token still succeeds.
    let (status, _) = app
        .request(
            "POST",
            "/auth/logout",
            None,
            Some(json!({ "refresh_token": refresh_token })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_password_reset_flow_revokes_all_sessions() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;
    let (_, refresh_a, _) = app.login("alice@x.com", "password123").await;
    let (_, refresh_b, _) = app.login("alice@x.com", "password123").await;

    // Unknown emails get the same answer and no email.
    let sent_before = app.mailer.sent().await.len();
    let (status, _) = app
        .request(
            "POST",
            "/auth/request-password-reset",
            None,
            Some(json!({ "email": "unknown@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.mailer.sent().await.len(), sent_before);

    let (status, _) = app
        .request(
            "POST",
            "/auth/request-password-reset",
            None,
            Some(json!({ "email": "alice@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let code = app.mailer.last_code().await;

    let (status, _) = app
        .request(
            "POST",
            "/auth/reset-password",
            None,
            Some(json!({ "code": code.as_str(), "new_password": "newpassword456" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Every pre-reset session is dead.
    for token in [&refresh_a, &refresh_b] {
        let (status, _) = app
            .request(
                "POST",
                "/auth/refresh-token",
                None,
                Some(json!({ "refresh_token": token })),
            )
            .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // The code is single-use.
    let (status, _) = app
        .request(
            "POST",
            "/auth/reset-password",
            None,
            Some(json!({ "code": code.as_str(), "new_password": "anotherpassword" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Old password out, new password in.
    let (status, _) = app
        .request(
            "POST",
            "/auth/login",
            None,
            Some(json!({ "email": "alice@x.com", "password": "password123" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    app.login("alice@x.com", "newpassword456").await;
}

#[tokio::test]
async fn test_session_listing_and_cross_user_isolation() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;
    app.register_and_verify("Bob", "bob@x.com", "password123")
        .await;

    let (alice_access, _, _) = app.login("alice@x.com", "password123").await;
    app.login("alice@x.com", "password123").await;
    let (bob_access, _, _) = app.login("bob@x.com", "password123").await;

    let (status, sessions) = app
        .request("GET", "/auth/sessions", Some(&alice_access), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let sessions = sessions.as_array().unwrap().clone();
    assert_eq!(sessions.len(), 2);
    // Logins without a User-Agent are classified, not left blank.
    assert_eq!(sessions[0]["device_name"], "unknown - unknown");

    // Bob cannot revoke Alice's session, and is told it does not exist.
    let alice_session_id = sessions[0]["id"].as_i64().unwrap();
    let (status, _) = app
        .request(
            "DELETE",
            &format!("/auth/sessions/{alice_session_id}"),
            Some(&bob_access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice's sessions are unharmed.
    let (_, sessions) = app
        .request("GET", "/auth/sessions", Some(&alice_access), None)
        .await;
    assert_eq!(sessions.as_array().unwrap().len(), 2);

    // Alice revokes one of her own sessions.
    let (status, _) = app
        .request(
            "DELETE",
            &format!("/auth/sessions/{alice_session_id}"),
            Some(&alice_access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, sessions) = app
        .request("GET", "/auth/sessions", Some(&alice_access), None)
        .await;
    assert_eq!(sessions.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_revoke_all_other_sessions_keeps_current() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;

    let (access, current_refresh, _) = app.login("alice@x.com", "password123").await;
    let (_, other_refresh, _) = app.login("alice@x.com", "password123").await;

    let (status, _) = app
        .request(
            "DELETE",
            "/auth/sessions",
            Some(&access),
            Some(json!({ "refresh_token": current_refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The acting session survives; the other is revoked.
    let (status, _) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": current_refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(
            "POST",
            "/auth/refresh-token",
            None,
            Some(json!({ "refresh_token": other_refresh })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_valid_token() {
    let app = TestApp::spawn();

    let (status, _) = app.request("GET", "/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request("GET", "/todos", Some("not-a-real-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_todo_crud_with_tags() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;
    let (access, _, _) = app.login("alice@x.com", "password123").await;

    let (status, todo) = app
        .request(
            "POST",
            "/todos",
            Some(&access),
            Some(json!({
                "title": "Write report",
                "description": "Quarterly numbers",
                "priority": "high",
                "tags": ["work", "reports"]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todo["completed"], false);
    assert_eq!(todo["priority"], "high");
    let todo_id = todo["id"].as_i64().unwrap();

    let (status, todos) = app.request("GET", "/todos", Some(&access), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(todos.as_array().unwrap().len(), 1);

    // Tag bookkeeping.
    let (_, tags) = app.request("GET", "/tags", Some(&access), None).await;
    assert_eq!(tags.as_array().unwrap().len(), 2);
    let (_, by_tag) = app
        .request("GET", "/tags/containing/work", Some(&access), None)
        .await;
    assert_eq!(by_tag.as_array().unwrap().len(), 1);

    // A tag in use cannot be deleted.
    let work_tag_id = tags
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "work")
        .unwrap()["id"]
        .as_i64()
        .unwrap();
    let (status, _) = app
        .request(
            "DELETE",
            &format!("/tags/id/{work_tag_id}"),
            Some(&access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Complete, then update.
    let (status, done) = app
        .request(
            "PUT",
            &format!("/todos/{todo_id}/complete"),
            Some(&access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["completed"], true);
    assert!(done["completed_at"].is_string());

    let (status, updated) = app
        .request(
            "PUT",
            &format!("/todos/{todo_id}"),
            Some(&access),
            Some(json!({ "title": "Write annual report", "tags": ["work"] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Write annual report");
    assert_eq!(updated["tags"], json!(["work"]));

    // Delete the todo; the now-unused tag can be removed by name.
    let (status, _) = app
        .request("DELETE", &format!("/todos/{todo_id}"), Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .request("DELETE", "/tags/name/work", Some(&access), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_todos_are_isolated_between_users() {
    let app = TestApp::spawn();
    app.register_and_verify("Alice", "alice@x.com", "password123")
        .await;
    app.register_and_verify("Bob", "bob@x.com", "password123")
        .await;
    let (alice_access, _, _) = app.login("alice@x.com", "password123").await;
    let (bob_access, _, _) = app.login("bob@x.com", "password123").await;

    let (_, todo) = app
        .request(
            "POST",
            "/todos",
            Some(&alice_access),
            Some(json!({ "title": "Alice's secret plan" })),
        )
        .await;
    let todo_id = todo["id"].as_i64().unwrap();

    let (_, bob_todos) = app.request("GET", "/todos", Some(&bob_access), None).await;
    assert_eq!(bob_todos.as_array().unwrap().len(), 0);

    // Direct addressing by id is a 404 for a non-owner, not a 403.
    let (status, _) = app
        .request("GET", &format!("/todos/{todo_id}"), Some(&bob_access), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            "DELETE",
            &format!("/todos/{todo_id}"),
            Some(&bob_access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Alice still has it.
    let (status, _) = app
        .request(
            "GET",
            &format!("/todos/{todo_id}"),
            Some(&alice_access),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_resend_verification() {
    let app = TestApp::spawn();
    let (status, _) = app
        .request(
            "POST",
            "/auth/register",
            None,
            Some(json!({
                "name": "Alice",
                "email": "alice@x.com",
                "password": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .request(
            "POST",
            "/auth/resend-verification",
            None,
            Some(json!({ "email": "alice@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // The freshly issued code verifies the account.
    let code = app.mailer.last_code().await;
    let (status, _) = app
        .request(
            "POST",
            "/auth/verify-email",
            None,
            Some(json!({ "code": code.as_str() })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    // Unknown account and already-verified account are both rejected.
    let (status, _) = app
        .request(
            "POST",
            "/auth/resend-verification",
            None,
            Some(json!({ "email": "ghost@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .request(
            "POST",
            "/auth/resend-verification",
            None,
            Some(json!({ "email": "alice@x.com" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
