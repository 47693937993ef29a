use atgaiva_core::{GeminiClient, ImagePayload, ImageRestorer, RestorationOptions, RestoreError};
use mockito::Matcher;
use serde_json::json;

const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash-image:generateContent";

fn photo() -> ImagePayload {
    ImagePayload::parse("data:image/jpeg;base64,/9j/4AAQSkZJRg==").expect("valid data uri")
}

fn client_for(server: &mockito::Server) -> GeminiClient {
    GeminiClient::new("test-key").with_endpoint(server.url())
}

#[tokio::test]
async fn restore_sends_image_and_instruction() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", MODEL_PATH)
        .match_header("x-goog-api-key", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "contents": [{
                "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/4AAQSkZJRg==" } },
                    { "text": "High quality photo restoration. Please colorize this image naturally and realistically. Maintain the original composition and facial features accurately. Output a high-resolution restored image." }
                ]
            }],
            "generationConfig": { "responseModalities": ["IMAGE"] }
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }]
                    }
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let options = RestorationOptions {
        fix_damage: false,
        enhance_details: false,
        colorize: true,
    };
    let restored = client_for(&server)
        .restore(&photo(), options)
        .await
        .expect("restoration succeeds");

    mock.assert_async().await;
    assert_eq!(restored.as_data_uri(), "data:image/png;base64,iVBORw0KGgo=");
}

#[tokio::test]
async fn text_only_answer_is_reported_as_missing_image() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Sorry"}]}}]}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .restore(&photo(), RestorationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RestoreError::NoImageData));
    assert_eq!(err.to_string(), "No image data received from the model.");
}

#[tokio::test]
async fn service_error_message_is_surfaced() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .restore(&photo(), RestorationOptions::default())
        .await
        .unwrap_err();

    match err {
        RestoreError::Service { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "API key not valid.");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn non_json_failure_uses_status_reason() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", MODEL_PATH)
        .with_status(503)
        .with_body("upstream unavailable")
        .create_async()
        .await;

    let err = client_for(&server)
        .restore(&photo(), RestorationOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RestoreError::Service { status: 503, ref message } if message == "Service Unavailable"
    ));
}

#[tokio::test]
async fn custom_model_changes_the_path() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/other-model:generateContent")
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"AAAA"}}]}}]}"#)
        .create_async()
        .await;

    let client = client_for(&server).with_model("other-model");
    assert_eq!(client.model(), "other-model");
    client
        .restore(&photo(), RestorationOptions::default())
        .await
        .expect("restoration succeeds");
    mock.assert_async().await;
}
