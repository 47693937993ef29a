use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::options::{RestorationOptions, build_instruction};
use crate::payload::{ImagePayload, RESULT_MEDIA_TYPE};

/// Image-capable Gemini model used for restorations.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Public Generative Language API host.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum RestoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Gemini API error ({status}): {message}")]
    Service { status: u16, message: String },
    #[error("No image data received from the model.")]
    NoImageData,
    #[error("No Gemini API key configured. Set GEMINI_API_KEY or save a key first.")]
    MissingApiKey,
    #[error("Restoration could not be started: {0}")]
    Unavailable(String),
}

/// Something that can turn an old photo into a restored one.
///
/// The controller only talks to this trait, so the network client can be
/// swapped for a fake in tests.
pub trait ImageRestorer: Send + Sync + 'static {
    fn restore(
        &self,
        image: &ImagePayload,
        options: RestorationOptions,
    ) -> impl Future<Output = Result<ImagePayload, RestoreError>> + Send;
}

/// Thin `generateContent` client for the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
    model: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum RequestPart<'a> {
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: &'a str,
        data: &'a str,
    },
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct InlineData {
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Send one image plus instruction and return the first image the model produced.
    pub async fn generate_image(
        &self,
        image: &ImagePayload,
        instruction: &str,
    ) -> Result<ImagePayload, RestoreError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::InlineData {
                        mime_type: image.media_type(),
                        data: image.base64_body(),
                    },
                    RequestPart::Text(instruction),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };

        info!(
            model = %self.model,
            media_type = image.media_type(),
            approx_bytes = image.approx_len(),
            "Submitting restoration request"
        );
        debug!(instruction, "Restoration instruction");

        let response = self
            .http
            .post(self.url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            warn!(status = status.as_u16(), %message, "Gemini request failed");
            return Err(RestoreError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let restored = extract_image(parsed)?;
        info!(approx_bytes = restored.approx_len(), "Restoration response received");
        Ok(restored)
    }
}

impl ImageRestorer for GeminiClient {
    async fn restore(
        &self,
        image: &ImagePayload,
        options: RestorationOptions,
    ) -> Result<ImagePayload, RestoreError> {
        let instruction = build_instruction(&options);
        self.generate_image(image, &instruction).await
    }
}

fn extract_image(response: GenerateContentResponse) -> Result<ImagePayload, RestoreError> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.inline_data)
                .find(|inline| !inline.data.is_empty())
        })
        .map(|inline| ImagePayload::from_base64(RESULT_MEDIA_TYPE, inline.data))
        .ok_or(RestoreError::NoImageData)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn request_body_matches_wire_format() {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![
                    RequestPart::InlineData {
                        mime_type: "image/jpeg",
                        data: "AAAA",
                    },
                    RequestPart::Text("fix it"),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["IMAGE"],
            },
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "mimeType": "image/jpeg", "data": "AAAA" } },
                        { "text": "fix it" }
                    ]
                }],
                "generationConfig": { "responseModalities": ["IMAGE"] }
            })
        );
    }

    #[test]
    fn extracts_first_inline_image_as_png() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[
                {"text":"here you go"},
                {"inlineData":{"mimeType":"image/png","data":"iVBORw0K"}},
                {"inlineData":{"mimeType":"image/png","data":"second"}}
            ]}}]}"#,
        );
        let image = extract_image(response).unwrap();
        assert_eq!(image.as_data_uri(), "data:image/png;base64,iVBORw0K");
    }

    #[test]
    fn text_only_response_has_no_image() {
        let response =
            parse(r#"{"candidates":[{"content":{"parts":[{"text":"I cannot do that"}]}}]}"#);
        assert!(matches!(extract_image(response), Err(RestoreError::NoImageData)));
    }

    #[test]
    fn empty_response_has_no_image() {
        assert!(matches!(
            extract_image(parse("{}")),
            Err(RestoreError::NoImageData)
        ));
        assert!(matches!(
            extract_image(parse(r#"{"candidates":[{}]}"#)),
            Err(RestoreError::NoImageData)
        ));
    }

    #[test]
    fn url_joins_endpoint_and_model() {
        let client = GeminiClient::new("key")
            .with_endpoint("http://localhost:1234/")
            .with_model("custom-model");
        assert_eq!(
            client.url(),
            "http://localhost:1234/v1beta/models/custom-model:generateContent"
        );
    }
}
