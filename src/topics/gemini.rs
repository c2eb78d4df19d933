//! Gemini-backed generator.

use super::{GenerationError, TopicGenerator};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Model used when none is configured.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Words requested per category.
pub const DEFAULT_WORD_COUNT: usize = 10;

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

const SYSTEM_PROMPT: &str = "You are a creative word generator for a party game similar to Spyfall. \
Your task is to generate secret words or locations for the given category. \
The words must be concrete, specific proper nouns or well-known fixed entities/locations, \
and vague enough to allow conversation without obvious giveaways. \
Do not use generic locations like 'school' or 'beach'.";

#[derive(Debug, Deserialize)]
struct WordList {
    #[serde(default)]
    words: Vec<String>,
}

/// Generator that asks Gemini for a JSON word list.
#[derive(Debug, Clone)]
pub struct GeminiGenerator {
    client: reqwest::Client,
    api_key: String,
    model: String,
    word_count: usize,
}

impl GeminiGenerator {
    /// Creates a generator for `model`.
    ///
    /// # Errors
    ///
    /// Returns a terminal error if the key is blank or the HTTP client
    /// cannot be built.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn new(api_key: String, model: String) -> Result<Self, GenerationError> {
        if api_key.trim().is_empty() {
            return Err(GenerationError::terminal("No API key provided"));
        }
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| GenerationError::terminal(format!("Failed to build HTTP client: {}", e)))?;
        debug!("Gemini generator created");
        Ok(Self {
            client,
            api_key,
            model,
            word_count: DEFAULT_WORD_COUNT,
        })
    }

    /// Changes how many words are requested.
    pub fn with_word_count(mut self, word_count: usize) -> Self {
        self.word_count = word_count.max(1);
        self
    }

    /// Model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body(&self, category: &str) -> serde_json::Value {
        let query = format!(
            "Generate {} unique, creative, and plausible secret proper nouns or fixed entities \
for the category: '{}'. The items must be single concepts or short phrases (max 4 words).",
            self.word_count, category
        );
        serde_json::json!({
            "contents": [{ "parts": [{ "text": query }] }],
            "systemInstruction": { "parts": [{ "text": SYSTEM_PROMPT }] },
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "words": {
                            "type": "ARRAY",
                            "description": format!(
                                "A list of {} unique words or short phrases for the category.",
                                self.word_count
                            ),
                            "items": { "type": "STRING" }
                        }
                    }
                }
            }
        })
    }
}

/// Rate limiting and server failures are worth another try.
fn classify(status: StatusCode, body: &str) -> GenerationError {
    let message = format!("Gemini API error {}: {}", status, body);
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        GenerationError::transient(message)
    } else {
        GenerationError::terminal(message)
    }
}

/// Pulls the word list out of a `generateContent` response.
fn parse_words(response_text: &str) -> Result<Vec<String>, GenerationError> {
    let response_json: serde_json::Value = serde_json::from_str(response_text)
        .map_err(|e| GenerationError::terminal(format!("Failed to parse response: {}", e)))?;

    let text = response_json["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| GenerationError::terminal("No text content in Gemini response"))?;

    let list: WordList = serde_json::from_str(text)
        .map_err(|e| GenerationError::terminal(format!("Response text is not a word list: {}", e)))?;

    let words: Vec<String> = list
        .words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect();
    if words.is_empty() {
        return Err(GenerationError::terminal("Gemini returned no words"));
    }
    Ok(words)
}

#[async_trait]
impl TopicGenerator for GeminiGenerator {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self), fields(model = %self.model))]
    async fn generate(&self, category: &str) -> Result<Vec<String>, GenerationError> {
        let url = format!("{}/{}:generateContent", API_BASE, self.model);

        debug!("Sending request to Gemini");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.clone())
            .header("content-type", "application/json")
            .json(&self.request_body(category))
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Gemini API request failed");
                GenerationError::transient(format!("Gemini API request failed: {}", e))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            error!(error = ?e, "Failed to read Gemini response");
            GenerationError::transient(format!("Failed to read response: {}", e))
        })?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(classify(status, &response_text));
        }

        let words = parse_words(&response_text)?;
        info!(count = words.len(), "Gemini generated words");
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_words_from_candidate_text() {
        let body = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"words\": [\" Kyoto \", \"\", \"Lisbon\"]}" }] }
            }]
        })
        .to_string();
        assert_eq!(parse_words(&body).unwrap(), vec!["Kyoto", "Lisbon"]);
    }

    #[test]
    fn test_parse_rejects_empty_list() {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "{\"words\": []}" }] } }]
        })
        .to_string();
        assert!(parse_words(&body).is_err());
    }

    #[test]
    fn test_classify_status() {
        assert!(classify(StatusCode::SERVICE_UNAVAILABLE, "").is_transient());
        assert!(classify(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(!classify(StatusCode::FORBIDDEN, "").is_transient());
    }

    #[test]
    fn test_blank_key_rejected() {
        assert!(GeminiGenerator::new("  ".to_string(), DEFAULT_GEMINI_MODEL.to_string()).is_err());
    }

    #[test]
    fn test_request_mentions_category_and_count() {
        let generator = GeminiGenerator::new("k".to_string(), DEFAULT_GEMINI_MODEL.to_string())
            .unwrap()
            .with_word_count(7);
        let body = generator.request_body("Rivers").to_string();
        assert!(body.contains("'Rivers'"));
        assert!(body.contains("Generate 7 unique"));
    }
}
