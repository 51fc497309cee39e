use serde_json::Value;
use thiserror::Error;

use super::interface::AUTO_DETECT;

pub const DEFAULT_MAX_TEXT_LENGTH: usize = 5000;

/// A translation request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub target_language: String,
    pub source_language: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every violation found in a request body
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

fn join_messages(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn fields(&self) -> Vec<&'static str> {
        self.0.iter().map(|e| e.field).collect()
    }
}

/// Look up a camelCase key, falling back to its snake_case spelling
fn field<'a>(body: &'a serde_json::Map<String, Value>, camel: &str, snake: &str) -> Option<&'a Value> {
    body.get(camel).or_else(|| body.get(snake))
}

fn is_language_code(code: &str) -> bool {
    code.chars().count() == 2
}

pub fn validate_translation_request(
    body: &Value,
    max_text_length: usize,
) -> Result<TranslationRequest, ValidationErrors> {
    let body = match body.as_object() {
        Some(map) if !map.is_empty() => map,
        _ => {
            return Err(ValidationErrors(vec![FieldError {
                field: "body",
                message: "Request body is empty".to_string(),
            }]))
        }
    };

    let mut errors = Vec::new();

    let text = match body.get("text") {
        None => {
            errors.push(FieldError {
                field: "text",
                message: "Missing required field: text".to_string(),
            });
            None
        }
        Some(Value::String(text)) if !text.trim().is_empty() => {
            if text.chars().count() > max_text_length {
                errors.push(FieldError {
                    field: "text",
                    message: format!("Text field must be at most {} characters", max_text_length),
                });
            }
            Some(text.clone())
        }
        Some(_) => {
            errors.push(FieldError {
                field: "text",
                message: "Text field must be a non-empty string".to_string(),
            });
            None
        }
    };

    let target_language = match field(body, "targetLanguage", "target_language") {
        None | Some(Value::Null) => {
            errors.push(FieldError {
                field: "targetLanguage",
                message: "Missing required field: targetLanguage".to_string(),
            });
            None
        }
        Some(Value::String(code)) if is_language_code(code) => Some(code.clone()),
        Some(_) => {
            errors.push(FieldError {
                field: "targetLanguage",
                message: "targetLanguage must be a 2-letter language code".to_string(),
            });
            None
        }
    };

    let source_language = match field(body, "sourceLanguage", "source_language") {
        None | Some(Value::Null) => Some(AUTO_DETECT.to_string()),
        Some(Value::String(code)) if code == AUTO_DETECT || is_language_code(code) => {
            Some(code.clone())
        }
        Some(_) => {
            errors.push(FieldError {
                field: "sourceLanguage",
                message: "sourceLanguage must be a 2-letter language code".to_string(),
            });
            None
        }
    };

    match (text, target_language, source_language) {
        (Some(text), Some(target_language), Some(source_language)) if errors.is_empty() => {
            Ok(TranslationRequest {
                text,
                target_language,
                source_language,
            })
        }
        _ => Err(ValidationErrors(errors)),
    }
}
