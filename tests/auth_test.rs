mod common;

use axum::http::StatusCode;
use common::*;

#[tokio::test]
async fn test_login_sets_session_accepted_by_guard() {
    let app = TestApp::new().await;
    create_user(&app.db, "ana", "Ana", "s3nha", true).await;

    let response = app
        .post_form(
            "/accounts/login/",
            &[("username", "ana"), ("password", "s3nha"), ("next", "/works/new/")],
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/works/new/");
    let session = set_cookie(&response, "session").expect("session cookie");

    let response = app.get("/works/new/", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_rerenders_login() {
    let app = TestApp::new().await;
    create_user(&app.db, "ana", "Ana", "s3nha", true).await;

    for (username, password) in [("ana", "errada"), ("ninguem", "s3nha"), ("", "")] {
        let response = app
            .post_form(
                "/accounts/login/",
                &[("username", username), ("password", password)],
                None,
            )
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response, "session").is_none());
        let body = body_json(response).await;
        assert_eq!(body["non_field_errors"].as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_login_never_redirects_off_site() {
    let app = TestApp::new().await;
    create_user(&app.db, "ana", "Ana", "s3nha", true).await;

    for next in ["//evil.example/", "https://evil.example/", "/\\evil.example"] {
        let response = app
            .post_form(
                "/accounts/login/",
                &[("username", "ana"), ("password", "s3nha"), ("next", next)],
                None,
            )
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&response), "/");
    }
}

#[tokio::test]
async fn test_forged_session_is_redirected() {
    let app = TestApp::new().await;
    let forged = bizdesk::auth::SessionKeys::new("other-secret")
        .create_token("ana", "admin")
        .unwrap();

    let response = app
        .get("/people/new/", Some(&format!("session={}", forged)))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/accounts/login/?next=%2Fpeople%2Fnew%2F");
}

#[tokio::test]
async fn test_login_page_echoes_next() {
    let app = TestApp::new().await;

    let response = app
        .get("/accounts/login/?next=%2Fworks%2Fnew%2F", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["next"], "/works/new/");
}

#[tokio::test]
async fn test_logout_clears_session() {
    let app = TestApp::new().await;

    let response = app
        .post_form("/accounts/logout/", &[], Some(&app.session("ana")))
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert_eq!(set_cookie(&response, "session").as_deref(), Some("session="));
}

#[tokio::test]
async fn test_static_pages_are_public() {
    let app = TestApp::new().await;

    for uri in ["/", "/status"] {
        let response = app.get(uri, None).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
    }
}
