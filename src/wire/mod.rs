use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// ========================================
/// Planner output and provider request shapes
/// ========================================

/// Target language of a subtask. Tags are matched case-insensitively; anything
/// unrecognized keeps its original tag so it can be reported back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    Python,
    NodeJs,
    Rust,
    Other(String),
}

impl Language {
    pub fn tag(&self) -> &str {
        match self {
            Language::Python => "python",
            Language::NodeJs => "nodejs",
            Language::Rust => "rust",
            Language::Other(t) => t,
        }
    }
}

impl Default for Language {
    fn default() -> Self {
        Language::Other(String::new())
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "python" => Language::Python,
            "nodejs" => Language::NodeJs,
            "rust" => Language::Rust,
            _ => Language::Other(tag),
        }
    }
}

impl From<&str> for Language {
    fn from(tag: &str) -> Self {
        Language::from(tag.to_string())
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.tag().to_string()
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

fn default_filename() -> String {
    "untitled.txt".into()
}

// Planner output is model text: a null or non-string field falls back to its
// default instead of rejecting the whole plan.
fn string_or_none<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_language<'de, D: Deserializer<'de>>(de: D) -> Result<Language, D::Error> {
    Ok(string_or_none(de)?.map(Language::from).unwrap_or_default())
}

fn lenient_filename<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(string_or_none(de)?
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(default_filename))
}

fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(string_or_none(de)?.unwrap_or_default())
}

/// One planned file. Accepts both the English keys and the Spanish ones older
/// planner prompts produced (`lenguaje`, `archivo`, `descripcion`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    #[serde(default, alias = "lenguaje", deserialize_with = "lenient_language")]
    pub language: Language,
    #[serde(default = "default_filename", alias = "archivo", deserialize_with = "lenient_filename")]
    pub filename: String,
    #[serde(default, alias = "descripcion", deserialize_with = "lenient_text")]
    pub description: String,
}

#[cfg(test)]
impl Subtask {
    pub fn new(language: impl Into<Language>, filename: &str, description: &str) -> Self {
        Self {
            language: language.into(),
            filename: filename.to_string(),
            description: description.to_string(),
        }
    }
}

/// The one logical provider operation: respond(model, input, instructions, tools, stream).
#[derive(Debug, Clone, Serialize)]
pub struct RespondRequest {
    pub model: String,
    pub input: String,
    pub instructions: String,
    pub tools: Vec<Value>,
    pub stream: bool,
}
