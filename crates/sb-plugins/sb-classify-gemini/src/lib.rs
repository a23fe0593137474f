//! # sb-classify-gemini
//!
//! `Classifier` backed by the Gemini `generateContent` endpoint, asking for
//! structured JSON output constrained by a response schema.

use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use sb_core::models::{Analysis, Category, Sentiment};
use sb_core::traits::Classifier;

/// Generation request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

/// The JSON object the model is asked to produce.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    sentiment: Sentiment,
    category: String,
    #[serde(default)]
    tags: Vec<String>,
}

fn response_schema() -> Value {
    let categories: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "sentiment": {
                "type": "STRING",
                "enum": ["Positive", "Neutral", "Negative"],
                "description": "The overall sentiment of the suggestion."
            },
            "category": {
                "type": "STRING",
                "enum": categories,
                "description": "The most relevant category for the suggestion."
            },
            "tags": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "A list of 3-5 relevant lowercase tags for the suggestion."
            }
        },
        "required": ["sentiment", "category", "tags"]
    })
}

fn prompt(title: &str, description: &str) -> String {
    format!(
        "Analyze the following student suggestion and provide a sentiment, a category, \
         and relevant tags. Suggestion Title: \"{title}\". Description: \"{description}\""
    )
}

/// Pulls the model's JSON text out of a `generateContent` response and reads it
/// as an analysis. Unknown category labels become `Other`.
fn parse_analysis(body: &str) -> anyhow::Result<Analysis> {
    let response: GenerateResponse =
        serde_json::from_str(body).context("malformed generateContent response")?;

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| anyhow!("response carried no candidate text"))?;

    let raw: RawAnalysis =
        serde_json::from_str(text.trim()).context("model output is not the expected JSON")?;

    Ok(Analysis {
        sentiment: raw.sentiment,
        category: Category::coerce(&raw.category),
        tags: raw.tags,
    })
}

pub struct GeminiClassifier {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    base_url: String,
}

impl GeminiClassifier {
    pub fn new(
        api_key: SecretString,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl Classifier for GeminiClassifier {
    async fn analyze(&self, title: &str, description: &str) -> anyhow::Result<Analysis> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt(title, description),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        };

        log::debug!("Classifying suggestion '{}' with {}", title, self.model);
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .context("failed to reach classification service")?;

        let status = response.status();
        let body = response.text().await.context("failed to read classification response")?;
        if !status.is_success() {
            bail!("classification service returned {}", status);
        }

        parse_analysis(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(model_text: &str) -> String {
        json!({
            "candidates": [{ "content": { "parts": [{ "text": model_text }] } }]
        })
        .to_string()
    }

    #[test]
    fn test_parses_structured_output() {
        let body = wrap(r#"{"sentiment":"Negative","category":"Facilities","tags":["parking","lot"]}"#);
        let analysis = parse_analysis(&body).unwrap();
        assert_eq!(analysis.sentiment, Sentiment::Negative);
        assert_eq!(analysis.category, Category::Facilities);
        assert_eq!(analysis.tags, ["parking", "lot"]);
    }

    #[test]
    fn test_unknown_category_coerces_to_other() {
        let body = wrap(r#" {"sentiment":"Positive","category":"Cafeteria","tags":[]} "#);
        assert_eq!(parse_analysis(&body).unwrap().category, Category::Other);
    }

    #[test]
    fn test_rejects_missing_candidates_and_bad_json() {
        assert!(parse_analysis(r#"{"candidates":[]}"#).is_err());
        assert!(parse_analysis(&wrap("not json")).is_err());
        assert!(parse_analysis(&wrap(r#"{"sentiment":"Ecstatic","category":"Events"}"#)).is_err());
    }

    #[test]
    fn test_schema_lists_every_category() {
        let schema = response_schema();
        let labels = schema["properties"]["category"]["enum"].as_array().unwrap();
        assert_eq!(labels.len(), Category::ALL.len());
        assert_eq!(schema["required"], json!(["sentiment", "category", "tags"]));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_an_error() {
        let classifier = GeminiClassifier::new(
            SecretString::from("k".to_string()),
            "gemini-2.5-flash",
            "http://127.0.0.1:9/v1beta/",
            Duration::from_secs(2),
        )
        .unwrap();
        assert_eq!(
            classifier.endpoint(),
            "http://127.0.0.1:9/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert!(classifier.analyze("t", "d").await.is_err());
    }
}
