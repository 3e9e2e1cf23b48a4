// src/utils.rs
use anyhow::{Context, Result};
use regex::Regex;
use reqwest::Url;
use std::path::Path;
use std::sync::OnceLock;

fn tag_pattern() -> &'static Regex {
    static TAGS: OnceLock<Regex> = OnceLock::new();
    TAGS.get_or_init(|| Regex::new(r"</?[^>]+(>|$)").expect("valid tag pattern"))
}

/// Remove markup tags and surrounding whitespace. Entities are left as-is.
pub fn strip_html(html: &str) -> String {
    tag_pattern().replace_all(html, "").trim().to_string()
}

/// Collapse every run of whitespace into a single space
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep at most `max_chars` characters, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Parse an absolute http(s) URL supplied by a caller.
pub fn parse_job_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("Invalid URL: {}", raw))?;

    match url.scheme() {
        "http" | "https" => {}
        other => anyhow::bail!("Unsupported URL scheme: {}", other),
    }

    if url.host_str().is_none() {
        anyhow::bail!("URL has no host: {}", raw);
    }

    Ok(url)
}

pub async fn read_file_safe(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(strip_html("<p>Build <b>things</b></p>"), "Build things");
        assert_eq!(strip_html("  plain  "), "plain");
        assert_eq!(strip_html("broken <span"), "broken");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b   c"), "a b c");
        assert_eq!(collapse_whitespace("   "), "");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("hello", 3), "hel");
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("héllo wörld", 7), "héllo w");
    }

    #[test]
    fn test_parse_job_url() {
        assert!(parse_job_url("https://jobs.example.com/123").is_ok());
        assert!(parse_job_url("  http://example.com ").is_ok());
        assert!(parse_job_url("not a url").is_err());
        assert!(parse_job_url("ftp://example.com/file").is_err());
        assert!(parse_job_url("/relative/path").is_err());
    }
}
