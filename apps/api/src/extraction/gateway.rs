//! AI Extraction Gateway: transcript in, structured profile details out.
//!
//! Tries each configured model in preference order and falls back to the
//! keyword extractor when no credential is configured or every model fails.
//! `extract` never returns an error; degradation is reported as an advisory.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::extraction::fallback::fallback_extract;
use crate::extraction::prompts::{EMPLOYER_EXTRACT_PROMPT, SEEKER_EXTRACT_PROMPT};
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, JSON_ONLY_TRAILER};
use crate::llm_client::{strip_json_fences, LlmError, TextGenerator};
use crate::models::profile::{DEFAULT_EMPLOYMENT_TYPE, NOT_SPECIFIED};
use crate::models::{EmployerDetails, Mode, ProfileDetails, SeekerDetails};

pub const FALLBACK_ADVISORY: &str =
    "AI extraction is unavailable right now. Details were derived from your text; please review them.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "model", rename_all = "snake_case")]
pub enum ExtractionSource {
    Model(String),
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub details: ProfileDetails,
    pub source: ExtractionSource,
    pub advisory: Option<String>,
}

#[derive(Clone)]
pub struct ExtractionGateway {
    generator: Option<Arc<dyn TextGenerator>>,
    models: Vec<String>,
}

impl ExtractionGateway {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, models: Vec<String>) -> Self {
        Self { generator, models }
    }

    pub fn is_configured(&self) -> bool {
        self.generator.is_some() && !self.models.is_empty()
    }

    pub async fn extract(&self, text: &str, mode: Mode) -> Extraction {
        let Some(generator) = self.generator.as_ref() else {
            warn!("Generative text service not configured. Using fallback data extraction.");
            return fallback(text, mode);
        };

        let prompt = build_prompt(text, mode);

        for model in &self.models {
            match try_model(generator.as_ref(), model, &prompt, mode).await {
                Ok(details) => {
                    info!("Extracted {mode} profile details with model {model}");
                    return Extraction {
                        details,
                        source: ExtractionSource::Model(model.clone()),
                        advisory: None,
                    };
                }
                Err(e) => {
                    warn!("Model {model} failed, trying next... {e}");
                }
            }
        }

        warn!("All models failed, returning fallback data.");
        fallback(text, mode)
    }
}

fn fallback(text: &str, mode: Mode) -> Extraction {
    Extraction {
        details: fallback_extract(text, mode),
        source: ExtractionSource::Fallback,
        advisory: Some(FALLBACK_ADVISORY.to_string()),
    }
}

fn build_prompt(text: &str, mode: Mode) -> String {
    let template = match mode {
        Mode::Seeker => SEEKER_EXTRACT_PROMPT,
        Mode::Employer => EMPLOYER_EXTRACT_PROMPT,
    };
    let mut prompt = template.replace("{text}", text);
    prompt.push_str(JSON_ONLY_TRAILER);
    prompt
}

async fn try_model(
    generator: &dyn TextGenerator,
    model: &str,
    prompt: &str,
    mode: Mode,
) -> Result<ProfileDetails, LlmError> {
    let raw = generator.generate(model, prompt, JSON_ONLY_SYSTEM).await?;
    let value: Value = serde_json::from_str(strip_json_fences(&raw))?;
    if !value.is_object() {
        return Err(LlmError::UnexpectedShape("expected a JSON object".to_string()));
    }
    Ok(coerce_details(&value, mode))
}

/// Fills gaps in a model's JSON output with documented defaults.
fn coerce_details(value: &Value, mode: Mode) -> ProfileDetails {
    match mode {
        Mode::Seeker => ProfileDetails::Seeker(SeekerDetails {
            bio: text_or(value, "bio", "No bio provided."),
            skills: string_list(value, "skills"),
            experience: text_or(value, "experience", NOT_SPECIFIED),
            education: text_or(value, "education", NOT_SPECIFIED),
        }),
        Mode::Employer => ProfileDetails::Employer(EmployerDetails {
            description: text_or(value, "description", "No description provided."),
            requirements: string_list(value, "requirements"),
            salary: text_or(value, "salary", NOT_SPECIFIED),
            employment_type: text_or(value, "type", DEFAULT_EMPLOYMENT_TYPE),
        }),
    }
}

fn text_or(value: &Value, key: &str, default: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

fn string_list(value: &Value, key: &str) -> Vec<String> {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}
