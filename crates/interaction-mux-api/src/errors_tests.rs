use super::*;
use axum::body::to_bytes;

async fn status_and_body(error: InteractionError) -> (StatusCode, serde_json::Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_unauthorized_maps_to_401_without_details() {
    let (status, body) =
        status_and_body(InteractionError::Unauthorized(VerifyError::SignatureMismatch)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
    assert_eq!(body["error"], "invalid request signature");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_malformed_body_maps_to_400() {
    let error = InteractionError::from(ClassifyError::UnsupportedInteractionType(42));

    let (status, body) = status_and_body(error).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("42"));
}

#[tokio::test]
async fn test_payload_too_large_maps_to_413() {
    let (status, _) = status_and_body(InteractionError::PayloadTooLarge { max_size: 10 }).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_no_response_maps_to_500() {
    let (status, body) = status_and_body(InteractionError::NoResponse {
        route: "todo/add".to_string(),
    })
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], 500);
}

#[test]
fn test_decode_error_becomes_malformed_body() {
    let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error = InteractionError::from(DispatchError::Decode {
        kind: InnerKind::Button,
        source,
    });

    assert!(matches!(error, InteractionError::MalformedBody { .. }));
    assert!(error.to_string().contains("button"));
}
