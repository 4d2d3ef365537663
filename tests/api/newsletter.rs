use crate::helpers::{
    ADMIN_EMAILS, LEAD_PATH, SITE_URL, spawn_app, spawn_app_with, spawn_app_with_unreachable_smtp,
    unused_port,
};
use newsletter_signup::notifications::{CONFIRMATION_SUBJECT, NOTIFICATION_SUBJECT};
use newsletter_signup::utils::ApiResponse;
use serde_json::json;
use wiremock::matchers::{any, body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn newsletter_returns_a_200_with_the_crm_response_for_a_valid_email() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "6613f8a2"})))
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app.post_newsletter(&json!({"email": "a@b.com"})).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        Some("application/json"),
        response
            .headers()
            .get("Content-Type")
            .and_then(|h| h.to_str().ok())
    );
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status_code": 200,
            "message": "Registration completed successfully",
            "data": {"id": "6613f8a2"}
        })
    );
}

#[tokio::test]
async fn newsletter_creates_exactly_one_crm_lead_for_a_valid_email() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .and(method("POST"))
        .and(header("Accept", "application/json"))
        .and(body_json(json!({"emailAddress": "ursula_le_guin@gmail.com"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app
        .post_newsletter(&json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    // Mock asserts on drop
}

#[tokio::test]
async fn newsletter_accepts_form_encoded_payloads() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .and(body_json(json!({"emailAddress": "ursula_le_guin@gmail.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app
        .post_newsletter_form("email=ursula_le_guin%40gmail.com")
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status_code": 200,
            "message": "Registration completed successfully",
            "data": null
        })
    );
}

#[tokio::test]
async fn newsletter_returns_null_data_when_the_crm_answers_with_something_other_than_json() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app.post_newsletter(&json!({"email": "a@b.com"})).await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "status_code": 200,
            "message": "Registration completed successfully",
            "data": null
        })
    );
}

#[tokio::test]
async fn newsletter_returns_a_400_for_an_empty_email() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app.post_newsletter(&json!({"email": ""})).await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status_code": 400, "message": "Dados inválidos"}));
}

#[tokio::test]
async fn newsletter_returns_a_400_and_skips_the_crm_when_data_is_invalid() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.crm_server)
        .await;

    let test_cases = vec![
        (json!({}), "missing the email"),
        (json!({"name": "le guin"}), "missing the email but carrying other fields"),
        (json!({"email": "definitely-not-an-email"}), "an invalid email"),
        (json!({"email": "ursula@localhost"}), "an email without a dotted domain"),
        (json!({"email": 42}), "an email that is not a string"),
        (json!(["ursula_le_guin@gmail.com"]), "not a JSON object"),
    ];

    for (invalid_body, error_message) in test_cases {
        // Act
        let response = app.post_newsletter(&invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            // Additional customised error message on test failure
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
        let body: ApiResponse = response.json().await.unwrap();
        assert_eq!(
            body,
            ApiResponse::failure(400, "Dados inválidos", None),
            "Unexpected error envelope when the payload was {}.",
            error_message
        );
    }

    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn newsletter_returns_a_400_for_invalid_form_payloads() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.crm_server)
        .await;

    let test_cases = vec![
        ("", "empty"),
        ("name=le%20guin", "missing the email"),
        ("email=", "carrying an empty email"),
        ("email=ursula", "carrying an invalid email"),
    ];

    for (invalid_body, error_message) in test_cases {
        // Act
        let response = app.post_newsletter_form(invalid_body).await;

        // Assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the form was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn newsletter_accepts_mixed_case_content_types() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .and(body_json(json!({"emailAddress": "a@b.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app
        .api_client
        .post(&format!("{}/newsletter", &app.address))
        .header("Content-Type", "Application/JSON; charset=UTF-8")
        .body(r#"{"email":"a@b.com"}"#)
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(200, response.status().as_u16());
}

#[tokio::test]
async fn newsletter_returns_a_json_400_for_an_oversized_payload() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.crm_server)
        .await;

    let padding = "x".repeat(300 * 1024);

    // Act
    let response = app
        .post_newsletter(&json!({"email": "a@b.com", "padding": padding}))
        .await;

    // Assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body, json!({"status_code": 400, "message": "Dados inválidos"}));
}

#[tokio::test]
async fn newsletter_rejects_unsupported_content_types() {
    // Arrange
    let app = spawn_app().await;

    // Act
    let response = app
        .api_client
        .post(&format!("{}/newsletter", &app.address))
        .header("Content-Type", "text/plain")
        .body("ursula_le_guin@gmail.com")
        .send()
        .await
        .expect("Failed to execute request.");

    // Assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn newsletter_returns_a_500_and_sends_no_email_when_the_crm_fails() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app
        .post_newsletter(&json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: ApiResponse = response.json().await.unwrap();
    assert_eq!(body.status_code, 500);
    assert_eq!(body.message, "Internal Server Error");
    assert!(body.data.is_none());
    assert!(body.error.is_some_and(|e| e.contains("500")));
    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn newsletter_returns_a_500_and_sends_no_email_when_the_crm_is_unreachable() {
    // Arrange
    let crm_port = unused_port();
    let app = spawn_app_with(|c| {
        c.crm.lead_url = format!("http://127.0.0.1:{}{}", crm_port, LEAD_PATH);
    })
    .await;

    // Act
    let response = app
        .post_newsletter(&json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(500, response.status().as_u16());
    let body: ApiResponse = response.json().await.unwrap();
    assert_eq!(body.message, "Internal Server Error");
    assert!(body.error.is_some());
    assert!(app.sent_emails().is_empty());
}

#[tokio::test]
async fn newsletter_confirms_the_subscriber_and_notifies_the_admins() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.crm_server)
        .await;

    // Act
    app.post_newsletter(&json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    let sent = app.sent_emails();
    assert_eq!(sent.len(), 2);

    let confirmation = &sent[0];
    let recipients: Vec<&str> = confirmation.recipients.iter().map(|r| r.as_ref()).collect();
    assert_eq!(recipients, vec!["ursula_le_guin@gmail.com"]);
    assert_eq!(confirmation.subject, CONFIRMATION_SUBJECT);

    let notification = &sent[1];
    let recipients: Vec<&str> = notification.recipients.iter().map(|r| r.as_ref()).collect();
    assert_eq!(recipients, ADMIN_EMAILS.to_vec());
    assert_eq!(notification.subject, NOTIFICATION_SUBJECT);
    assert!(notification.html_content.contains("ursula_le_guin@gmail.com"));
}

#[tokio::test]
async fn confirmation_email_links_back_to_the_site() {
    // Arrange
    let app = spawn_app().await;

    Mock::given(path(LEAD_PATH))
        .respond_with(ResponseTemplate::new(200))
        .mount(&app.crm_server)
        .await;

    // Act
    app.post_newsletter(&json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    let confirmation = &app.sent_emails()[0];
    let links: Vec<_> = linkify::LinkFinder::new()
        .links(&confirmation.html_content)
        .filter(|l| *l.kind() == linkify::LinkKind::Url)
        .collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].as_str(), SITE_URL);
}

#[tokio::test]
async fn newsletter_still_returns_a_200_when_the_mail_server_is_down() {
    // Arrange
    let app = spawn_app_with_unreachable_smtp().await;

    Mock::given(path(LEAD_PATH))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "6613f8a2"})))
        .expect(1)
        .mount(&app.crm_server)
        .await;

    // Act
    let response = app
        .post_newsletter(&json!({"email": "ursula_le_guin@gmail.com"}))
        .await;

    // Assert
    assert_eq!(200, response.status().as_u16());
    let body: ApiResponse = response.json().await.unwrap();
    assert_eq!(
        body,
        ApiResponse::success("Registration completed successfully", json!({"id": "6613f8a2"}))
    );
}
