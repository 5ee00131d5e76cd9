//! Data shapes for external docstring normalization
//!
//! The core never invokes an AI CLI itself; it only defines the prompt
//! payload it produces and parses the response it consumes. The front-end
//! owns transport, batching, and rate limiting.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::schema::ParseResult;

/// One symbol whose docstring should be normalized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDoc {
    pub name: String,
    pub signature: String,
    pub docstring: String,
}

/// Prompt payload for one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocstringPrompt {
    pub file_path: String,
    pub language: String,
    pub symbols: Vec<SymbolDoc>,
}

impl DocstringPrompt {
    /// Build a prompt for the symbols of one parsed file that carry a
    /// docstring worth normalizing
    pub fn from_result(result: &ParseResult) -> Self {
        let symbols = result
            .symbols
            .iter()
            .filter(|s| !s.docstring.is_empty())
            .map(|s| SymbolDoc {
                name: s.name.clone(),
                signature: s.signature.clone(),
                docstring: s.docstring.clone(),
            })
            .collect();

        Self {
            file_path: result.path.clone(),
            language: result.language.clone(),
            symbols,
        }
    }

    /// Render the instruction text handed to the external CLI
    pub fn render(&self) -> String {
        let mut lines = vec![
            format!(
                "Summarize each symbol docstring from {} into one English sentence.",
                self.file_path
            ),
            "Respond with a JSON object mapping symbol name to description.".to_string(),
            String::new(),
        ];
        for symbol in &self.symbols {
            lines.push(format!("- {} - {}", symbol.name, symbol.docstring.replace('\n', " ")));
        }
        lines.join("\n")
    }
}

/// Parse an external response into symbol-name → description.
///
/// Tolerant of chatter around the JSON object: the first `{`..`}` span that
/// parses as an object wins. Non-string values are ignored.
pub fn parse_response(response: &str) -> BTreeMap<String, String> {
    let mut descriptions = BTreeMap::new();

    let Some(start) = response.find('{') else {
        return descriptions;
    };
    let Some(end) = response.rfind('}') else {
        return descriptions;
    };
    if end < start {
        return descriptions;
    }

    if let Ok(serde_json::Value::Object(map)) =
        serde_json::from_str::<serde_json::Value>(&response[start..=end])
    {
        for (key, value) in map {
            if let serde_json::Value::String(text) = value {
                descriptions.insert(key, text);
            }
        }
    }
    descriptions
}
