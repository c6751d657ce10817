use async_trait::async_trait;
use replica_core::config::Config;
use replica_core::drafter::{DraftBackend, DraftRequest};
use replica_core::error::DraftError;
use replica_core::prompt::build_instruction;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Returned instead of a present-but-blank service response.
pub const EMPTY_RESPONSE_FALLBACK: &str = "Não foi possível gerar a resposta. Tente novamente.";

/// Calls the Gemini `generateContent` API with the assembled instruction.
///
/// One blocking round trip per draft: no retries, no streaming. Transport
/// and service failures are logged here in full and surfaced to the caller
/// only as the generic [`DraftError::Service`].
pub struct GeminiBackend {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Reasoning budget hint, attached verbatim to every request.
    pub thinking_budget: u32,
    pub timeout_secs: u64,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: replica_core::config::DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
            thinking_budget: replica_core::config::DEFAULT_THINKING_BUDGET,
            timeout_secs: replica_core::config::DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            thinking_budget: config.thinking_budget,
            timeout_secs: config.timeout_secs,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = budget;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn request_body(&self, instruction: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: instruction.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                thinking_config: ThinkingConfig {
                    thinking_budget: self.thinking_budget,
                },
            },
        }
    }
}

// ── Wire format ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// Concatenate the text parts of the first candidate, if any.
fn extract_text(response: &GenerateContentResponse) -> Option<String> {
    let content = response.candidates.first()?.content.as_ref()?;
    let mut out = String::new();
    for part in &content.parts {
        out.push_str(&part.text);
    }
    Some(out)
}

#[async_trait]
impl DraftBackend for GeminiBackend {
    async fn draft(&self, request: &DraftRequest) -> Result<String, DraftError> {
        let instruction = build_instruction(request);

        info!(
            model = %self.model,
            prompt_len = instruction.len(),
            thinking_budget = self.thinking_budget,
            "calling gemini generateContent"
        );

        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(self.timeout_secs))
            .build()
            .map_err(|e| {
                warn!("failed to build http client: {}", e);
                DraftError::Service
            })?;

        let response = match client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(&instruction))
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) if e.is_timeout() => {
                warn!(
                    model = %self.model,
                    timeout_secs = self.timeout_secs,
                    "gemini request timed out"
                );
                return Err(DraftError::Service);
            }
            Err(e) => {
                warn!(model = %self.model, "gemini request failed: {}", e);
                return Err(DraftError::Service);
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(model = %self.model, %status, "gemini returned non-200: {}", body);
            return Err(DraftError::Service);
        }

        let parsed: GenerateContentResponse = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(model = %self.model, "failed to parse gemini response: {}", e);
                return Err(DraftError::Service);
            }
        };

        match draft_or_fallback(&parsed) {
            DraftText::Draft(text) => {
                info!(model = %self.model, draft_len = text.len(), "gemini draft received");
                Ok(text)
            }
            DraftText::Fallback => {
                warn!(model = %self.model, "gemini returned an empty draft");
                Ok(EMPTY_RESPONSE_FALLBACK.to_string())
            }
        }
    }
}

enum DraftText {
    Draft(String),
    /// Response was present but blank; the fixed fallback applies.
    Fallback,
}

fn draft_or_fallback(response: &GenerateContentResponse) -> DraftText {
    match extract_text(response) {
        Some(text) if !text.trim().is_empty() => DraftText::Draft(text),
        _ => DraftText::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend() -> GeminiBackend {
        GeminiBackend::new("test-key", "gemini-2.5-flash")
    }

    #[test]
    fn request_body_uses_camel_case_wire_names() {
        let body = serde_json::to_value(backend().request_body("instrução")).unwrap();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "instrução");
        assert_eq!(
            body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            2048
        );
    }

    #[test]
    fn thinking_budget_override_lands_in_the_body() {
        let body = serde_json::to_value(
            backend()
                .with_thinking_budget(512)
                .request_body("instrução"),
        )
        .unwrap();
        assert_eq!(
            body["generationConfig"]["thinkingConfig"]["thinkingBudget"],
            512
        );
    }

    #[test]
    fn extract_text_joins_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "# Minuta\n"}, {"text": "texto"}]}},
                {"content": {"parts": [{"text": "ignorado"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(&response).as_deref(), Some("# Minuta\ntexto"));
    }

    #[test]
    fn blank_response_text_maps_to_the_fixed_fallback() {
        let blank: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": ""}]}}]
        }))
        .unwrap();
        assert!(matches!(draft_or_fallback(&blank), DraftText::Fallback));

        let whitespace: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "  \n "}]}}]
        }))
        .unwrap();
        assert!(matches!(draft_or_fallback(&whitespace), DraftText::Fallback));
    }

    #[test]
    fn extract_text_handles_missing_candidates_and_content() {
        let empty: GenerateContentResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(extract_text(&empty), None);

        let no_content: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({"candidates": [{}]})).unwrap();
        assert_eq!(extract_text(&no_content), None);
    }
}
