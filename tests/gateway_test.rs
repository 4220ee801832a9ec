// ABOUTME: Integration tests for the HTTP request gateway
// ABOUTME: Status-to-error mapping, message priority, and body parsing conventions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Platewise

use platewise_client::{ApiError, ClientConfig, Gateway};
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway_for(server: &MockServer) -> Gateway {
    let config = ClientConfig::for_origin(server.uri()).unwrap();
    Gateway::new(&config).unwrap()
}

#[tokio::test]
async fn non_2xx_statuses_carry_their_status_code() {
    for status in [400_u16, 401, 404, 500] {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/getWeekly"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&mock_server)
            .await;

        let gateway = gateway_for(&mock_server).await;
        let err = gateway
            .get("/users/getWeekly", None)
            .await
            .expect_err("non-2xx must be an error");
        assert_eq!(err.status(), Some(status), "status {status} mismatch");
    }
}

#[tokio::test]
async fn error_field_has_highest_message_priority() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "phone number not registered",
            "message": "should not be used"
        })))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let err = gateway
        .post("/users/login", None, Some(&json!({ "phoneNumber": "+1" })))
        .await
        .unwrap_err();
    match err {
        ApiError::Api { message, .. } => assert_eq!(message, "phone number not registered"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn message_field_used_when_error_absent() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/getWeekly"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "no plan yet" })),
        )
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let err = gateway.get("/users/getWeekly", None).await.unwrap_err();
    match err {
        ApiError::Api {
            status_code,
            message,
            ..
        } => {
            assert_eq!(status_code, 404);
            assert_eq!(message, "no plan yet");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn raw_text_used_when_body_is_not_json() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/boom"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let err = gateway.get("/boom", None).await.unwrap_err();
    match err {
        ApiError::Api {
            message, retryable, ..
        } => {
            assert_eq!(message, "upstream exploded");
            assert!(retryable, "5xx must be marked retryable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn synthesized_message_for_empty_error_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/getWeekly"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let err = gateway.get("/users/getWeekly", None).await.unwrap_err();
    match err {
        ApiError::Api {
            message, retryable, ..
        } => {
            assert_eq!(message, "HTTP 401");
            assert!(!retryable, "4xx must not be marked retryable");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn empty_2xx_body_resolves_to_empty_record() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let value = gateway
        .post("/users/login", None, Some(&json!({ "phoneNumber": "+1" })))
        .await
        .unwrap();
    assert_eq!(value, json!({}));
}

#[tokio::test]
async fn unparsable_2xx_body_resolves_to_null_not_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/odd"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let value = gateway.get("/odd", None).await.unwrap();
    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn bearer_token_is_attached() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/getWeekly"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "weeklyPlan": {} })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let value = gateway
        .get("/users/getWeekly", Some("secret-token"))
        .await
        .unwrap();
    assert!(value.get("weeklyPlan").is_some());
}

#[tokio::test]
async fn json_body_is_forwarded_verbatim() {
    let mock_server = MockServer::start().await;
    let expected = json!({ "phoneNumber": "+15551234567", "otp": "123456" });
    Mock::given(method("POST"))
        .and(path("/users/verify-otp"))
        .and(body_json(&expected))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": "a",
            "refreshToken": "b"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let gateway = gateway_for(&mock_server).await;
    let value = gateway
        .post("/users/verify-otp", None, Some(&expected))
        .await
        .unwrap();
    assert_eq!(value["accessToken"], "a");
}

#[tokio::test]
async fn transport_failure_is_a_network_error() {
    // Nothing listens on this port
    let config = ClientConfig::for_origin("http://127.0.0.1:1").unwrap();
    let gateway = Gateway::new(&config).unwrap();
    let err = gateway.get("/users/getWeekly", None).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
    assert_eq!(err.status(), None);
}
