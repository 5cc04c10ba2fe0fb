use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::mpsc::Sender;
use std::thread;
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

use crate::backend::key_store::KeyNotice;
use crate::backend::prompt::build_revision_prompt;
use crate::config::ReviewerConfig;
use crate::constant::{DEFAULT_API_URL, DEFAULT_MODEL};
use crate::messages::ResponseMessage;
use crate::review::ReviewRequest;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AiError {
    #[error(
        "A API Key fornecida é inválida. Verifique a chave e tente novamente. Se persistir, \
         verifique a chave ou o faturamento da sua conta Google AI."
    )]
    InvalidApiKey,

    #[error("Limite de requisições da sua API Key foi excedido. Tente novamente mais tarde.")]
    RateLimited,

    #[error(
        "Permissão negada. Verifique se sua API Key tem acesso ao modelo Gemini e se o \
         faturamento está ativo na sua conta Google Cloud."
    )]
    PermissionDenied,

    #[error("Erro da API ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Falha na requisição: {0}")]
    Request(String),

    #[error("Resposta da API não contém texto revisado ou está em formato inesperado.")]
    MissingContent,

    #[error("API Key não configurada.")]
    MissingApiKey,
}

impl AiError {
    /// Status to show next to the API key field, for key-related failures
    pub fn key_notice(&self) -> Option<KeyNotice> {
        match self {
            AiError::InvalidApiKey => Some(KeyNotice::Invalid),
            AiError::RateLimited => Some(KeyNotice::RateLimited),
            AiError::PermissionDenied => Some(KeyNotice::PermissionDenied),
            AiError::MissingApiKey => Some(KeyNotice::Required),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

pub struct AiBackend {
    model: String,
    api_url: String,
    api_key: String,
}

impl Default for AiBackend {
    fn default() -> Self {
        AiBackend {
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
        }
    }
}

impl AiBackend {
    pub fn new(model: Option<String>, api_url: Option<String>, api_key: Option<String>) -> Self {
        // Explicit values first, then the environment, then the defaults
        let model = model
            .or_else(|| std::env::var("GEMINI_MODEL").ok())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let api_url = api_url
            .or_else(|| std::env::var("GEMINI_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_key = api_key
            .or_else(|| std::env::var("GEMINI_API_KEY").ok())
            .unwrap_or_else(|| {
                tracing::warn!("GEMINI_API_KEY not found, using empty string");
                String::new()
            });

        Self {
            model,
            api_url,
            api_key,
        }
    }

    pub fn from_config(config: &ReviewerConfig) -> Self {
        let non_empty = |value: &str| {
            let value = value.trim();
            (!value.is_empty()).then(|| value.to_string())
        };
        Self::new(
            non_empty(&config.model_name),
            non_empty(&config.api_url),
            non_empty(&config.api_key),
        )
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}:generateContent?key={}",
            self.api_url, self.model, self.api_key
        )
    }

    /// Send the revision request on a background thread; the outcome comes
    /// back as [`ResponseMessage::RevisionFinished`].
    pub fn request_revision(&self, request: ReviewRequest, sender: Sender<ResponseMessage>) {
        let generation = request.generation;

        if !self.has_api_key() {
            let _ = sender.send(ResponseMessage::RevisionFinished {
                generation,
                elapsed: Default::default(),
                result: Err(AiError::MissingApiKey),
            });
            return;
        }

        let endpoint = self.endpoint();
        let model = self.model.clone();
        let prompt = build_revision_prompt(&request.text, request.is_transcription);

        thread::spawn(move || {
            info!("Requesting revision #{} from {}", generation, model);
            let started = Instant::now();
            let result = Self::blocking_send_request(&endpoint, prompt);
            let elapsed = started.elapsed();

            match &result {
                Ok(text) => info!(
                    "Revision #{} finished in {:.2}s ({} chars)",
                    generation,
                    elapsed.as_secs_f64(),
                    text.chars().count()
                ),
                Err(e) => error!("Revision #{} failed: {}", generation, e),
            }

            let _ = sender.send(ResponseMessage::RevisionFinished {
                generation,
                elapsed,
                result,
            });
        });
    }

    fn blocking_send_request(endpoint: &str, prompt: String) -> Result<String, AiError> {
        let client = Client::new();

        let request_body = GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = client
            .post(endpoint)
            .json(&request_body)
            .send()
            .map_err(|e| AiError::Request(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| AiError::Request(e.without_url().to_string()))?;

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown error");
            return Err(classify_error(status.as_u16(), reason, &body));
        }

        parse_response(&body)
    }
}

/// Map a failed HTTP exchange to an error the user can act on
pub fn classify_error(status: u16, reason: &str, body: &str) -> AiError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| reason.to_string());

    match status {
        400 if message.to_lowercase().contains("api key not valid") => AiError::InvalidApiKey,
        429 => AiError::RateLimited,
        403 => AiError::PermissionDenied,
        _ => AiError::Api { status, message },
    }
}

/// Extract the revised text from a `generateContent` response body
pub fn parse_response(body: &str) -> Result<String, AiError> {
    let response: GeminiResponse = serde_json::from_str(body)
        .map_err(|e| AiError::Request(format!("Failed to parse AI response: {}", e)))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .filter(|text| !text.is_empty())
        .ok_or(AiError::MissingContent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn parses_first_candidate_text() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Texto revisado.\n"}]}},
                {"content": {"parts": [{"text": "outro"}]}}
            ]
        }"#;
        assert_eq!(parse_response(body).unwrap(), "Texto revisado.\n");
    }

    #[test]
    fn missing_text_is_reported() {
        assert_eq!(
            parse_response(r#"{"candidates": []}"#),
            Err(AiError::MissingContent)
        );
        assert_eq!(
            parse_response(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#),
            Err(AiError::MissingContent)
        );
        assert!(matches!(parse_response("not json"), Err(AiError::Request(_))));
    }

    #[test]
    fn invalid_key_is_recognized() {
        let body = r#"{"error": {"code": 400, "message": "API key not valid. Please pass a valid API key."}}"#;
        let error = classify_error(400, "Bad Request", body);
        assert_eq!(error, AiError::InvalidApiKey);
        assert_eq!(error.key_notice(), Some(KeyNotice::Invalid));
    }

    #[test]
    fn other_bad_requests_keep_the_api_message() {
        let body = r#"{"error": {"message": "Request payload size exceeds the limit"}}"#;
        assert_eq!(
            classify_error(400, "Bad Request", body),
            AiError::Api {
                status: 400,
                message: "Request payload size exceeds the limit".to_string()
            }
        );
    }

    #[test]
    fn quota_and_permission_errors() {
        assert_eq!(classify_error(429, "Too Many Requests", ""), AiError::RateLimited);
        assert_eq!(classify_error(403, "Forbidden", "{}"), AiError::PermissionDenied);
        assert_eq!(
            AiError::RateLimited.key_notice(),
            Some(KeyNotice::RateLimited)
        );
    }

    #[test]
    fn unreadable_error_body_falls_back_to_reason() {
        assert_eq!(
            classify_error(500, "Internal Server Error", "<html>"),
            AiError::Api {
                status: 500,
                message: "Internal Server Error".to_string()
            }
        );
    }

    #[test]
    fn endpoint_includes_model_and_key() {
        let backend = AiBackend::new(
            Some("gemini-2.0-flash".to_string()),
            Some("https://example.test/models/".to_string()),
            Some("KEY".to_string()),
        );
        assert_eq!(
            backend.endpoint(),
            "https://example.test/models/gemini-2.0-flash:generateContent?key=KEY"
        );
    }

    #[test]
    fn missing_key_answers_without_network() {
        let backend = AiBackend {
            api_key: String::new(),
            ..AiBackend::default()
        };
        let (sender, receiver) = mpsc::channel();
        backend.request_revision(
            ReviewRequest {
                generation: 7,
                text: "texto".to_string(),
                is_transcription: false,
            },
            sender,
        );

        match receiver.recv().unwrap() {
            ResponseMessage::RevisionFinished {
                generation, result, ..
            } => {
                assert_eq!(generation, 7);
                assert_eq!(result, Err(AiError::MissingApiKey));
            }
            _ => panic!("unexpected message"),
        }
    }
}
