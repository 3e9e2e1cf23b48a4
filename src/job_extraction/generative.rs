// src/job_extraction/generative.rs
//! Fallback extraction that asks a text model to read the page for us.

use super::structured::scalar_to_string;
use super::types::JobFields;
use crate::utils::{collapse_whitespace, truncate_chars};
use regex::Regex;
use scraper::{Html, Node, Selector};
use serde_json::Value;
use std::sync::OnceLock;
use tracing::warn;

pub const PROMPT_TEXT_MAX_CHARS: usize = 10_000;

const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Whitespace-normalized text a reader would see in the page body.
pub fn visible_text(html: &str, max_chars: usize) -> String {
    let document = Html::parse_document(html);
    let root = Selector::parse("body")
        .ok()
        .and_then(|body| document.select(&body).next())
        .unwrap_or_else(|| document.root_element());

    let mut pieces = Vec::new();
    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if !hidden {
            pieces.push(&**text);
        }
    }

    truncate_chars(&collapse_whitespace(&pieces.join(" ")), max_chars)
}

pub fn build_prompt(page_text: &str) -> String {
    format!(
        r#"Extract job information from this text and return ONLY a valid JSON object with these exact keys:
{{ "company": string|null, "location": string|null, "salary": string|null, "notes": string|null, "deadline": string|null }}

Job posting text:
"""{}"""

Return only the JSON object, no other text."#,
        page_text
    )
}

fn object_pattern() -> &'static Regex {
    static OBJECT: OnceLock<Regex> = OnceLock::new();
    OBJECT.get_or_init(|| Regex::new(r"(?s)\{.*?\}").expect("valid object pattern"))
}

/// Decode the first `{...}` span of a model reply into fields.
///
/// Anything that is not a JSON object yields `None`.
pub fn parse_model_response(response: &str) -> Option<JobFields> {
    let candidate = object_pattern().find(response)?.as_str();

    let parsed: Value = match serde_json::from_str(candidate) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to parse model response: {}", e);
            return None;
        }
    };

    let object = parsed.as_object()?;
    let field = |key: &str| object.get(key).and_then(scalar_to_string);

    Some(JobFields {
        company: field("company"),
        location: field("location"),
        salary: field("salary"),
        notes: field("notes"),
        deadline: field("deadline").or_else(|| field("applyBy")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let html = r#"<html><head><title>T</title><style>.x{}</style></head>
            <body>
              <h1>Senior   Engineer</h1>
              <script>var hidden = 1;</script>
              <p>Acme
                 Corp</p>
              <noscript>enable js</noscript>
            </body></html>"#;

        assert_eq!(visible_text(html, 1000), "Senior Engineer Acme Corp");
    }

    #[test]
    fn test_visible_text_is_bounded() {
        let html = format!("<html><body><p>{}</p></body></html>", "word ".repeat(5000));
        let text = visible_text(&html, PROMPT_TEXT_MAX_CHARS);
        assert_eq!(text.chars().count(), PROMPT_TEXT_MAX_CHARS);
    }

    #[test]
    fn test_prompt_names_every_key() {
        let prompt = build_prompt("Some job");
        for key in JobFields::KEYS {
            assert!(prompt.contains(&format!("\"{}\"", key)));
        }
        assert!(prompt.contains("\"\"\"Some job\"\"\""));
    }

    #[test]
    fn test_parse_fenced_response() {
        let reply = "```json\n{\"company\": \"Acme\", \"location\": null, \"salary\": \"$90k\", \"notes\": \"\", \"deadline\": \"2025-05-01\"}\n```";

        let fields = parse_model_response(reply).unwrap();
        assert_eq!(fields.company.as_deref(), Some("Acme"));
        assert_eq!(fields.location, None);
        assert_eq!(fields.salary.as_deref(), Some("$90k"));
        assert_eq!(fields.notes, None);
        assert_eq!(fields.deadline.as_deref(), Some("2025-05-01"));
    }

    #[test]
    fn test_parse_legacy_apply_by_and_numbers() {
        let fields = parse_model_response(r#"{"salary": 75000, "applyBy": "2025-02-02"}"#).unwrap();
        assert_eq!(fields.salary.as_deref(), Some("75000"));
        assert_eq!(fields.deadline.as_deref(), Some("2025-02-02"));
    }

    #[test]
    fn test_parse_malformed_response() {
        assert_eq!(parse_model_response("no json here"), None);
        assert_eq!(parse_model_response("{company: Acme}"), None);
        assert_eq!(parse_model_response(""), None);
    }

    #[test]
    fn test_parse_takes_only_first_object() {
        let reply = r#"{"company": "First"} and {"company": "Second"}"#;
        assert_eq!(
            parse_model_response(reply).unwrap().company.as_deref(),
            Some("First")
        );
    }
}
