// src/job_extraction/redirect.rs
use reqwest::Url;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A tracking redirector that carries the real destination in a query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    /// Matches the host exactly or any subdomain of it.
    pub host_suffix: String,
    #[serde(default)]
    pub path_prefix: Option<String>,
    pub param: String,
}

impl RedirectRule {
    pub fn new(host_suffix: &str, path_prefix: Option<&str>, param: &str) -> Self {
        Self {
            host_suffix: host_suffix.to_lowercase(),
            path_prefix: path_prefix.map(String::from),
            param: param.to_string(),
        }
    }

    fn matches(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        let suffix = self.host_suffix.as_str();
        let host_ok = host == suffix || host.ends_with(&format!(".{}", suffix));

        let path_ok = self
            .path_prefix
            .as_deref()
            .map_or(true, |prefix| url.path().starts_with(prefix));

        host_ok && path_ok
    }

    fn destination(&self, url: &Url) -> Option<Url> {
        let raw = url
            .query_pairs()
            .find(|(key, _)| key == self.param.as_str())
            .map(|(_, value)| value.into_owned())?;

        let target = Url::parse(&raw).ok()?;
        matches!(target.scheme(), "http" | "https").then_some(target)
    }
}

/// Rules applied when no configuration overrides them.
pub fn default_rules() -> Vec<RedirectRule> {
    vec![
        RedirectRule::new("linkedin.com", Some("/redir/"), "url"),
        RedirectRule::new("google.com", Some("/url"), "q"),
    ]
}

/// Substitute the embedded destination of the first matching rule.
///
/// URLs that match no rule, or whose parameter is missing or not an
/// absolute http(s) URL, come back unchanged.
pub fn unwrap_redirect(url: &Url, rules: &[RedirectRule]) -> Url {
    for rule in rules.iter().filter(|rule| rule.matches(url)) {
        if let Some(target) = rule.destination(url) {
            info!("Unwrapped redirect {} -> {}", url, target);
            return target;
        }
    }
    url.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn test_unwraps_matching_rule() {
        let rules = vec![RedirectRule::new("tracker.example", None, "dest")];
        let input = url("https://go.tracker.example/r?dest=https%3A%2F%2Fjobs.acme.com%2F42%3Fref%3Dx");

        let out = unwrap_redirect(&input, &rules);
        assert_eq!(out.as_str(), "https://jobs.acme.com/42?ref=x");
    }

    #[test]
    fn test_path_prefix_must_match() {
        let rules = vec![RedirectRule::new("tracker.example", Some("/r/"), "dest")];
        let input = url("https://tracker.example/other?dest=https%3A%2F%2Fjobs.acme.com");

        assert_eq!(unwrap_redirect(&input, &rules), input);
    }

    #[test]
    fn test_non_matching_host_untouched() {
        let rules = vec![RedirectRule::new("tracker.example", None, "dest")];
        let input = url("https://nottracker.example/r?dest=https%3A%2F%2Fjobs.acme.com");

        assert_eq!(unwrap_redirect(&input, &rules), input);
    }

    #[test]
    fn test_invalid_destination_ignored() {
        let rules = vec![RedirectRule::new("tracker.example", None, "dest")];
        let input = url("https://tracker.example/r?dest=javascript%3Aalert(1)");
        assert_eq!(unwrap_redirect(&input, &rules), input);

        let missing = url("https://tracker.example/r?other=1");
        assert_eq!(unwrap_redirect(&missing, &rules), missing);
    }

    #[test]
    fn test_default_rules() {
        let input = url(
            "https://www.linkedin.com/redir/redirect?url=https%3A%2F%2Fboards.greenhouse.io%2Facme%2Fjobs%2F1",
        );
        let out = unwrap_redirect(&input, &default_rules());
        assert_eq!(out.as_str(), "https://boards.greenhouse.io/acme/jobs/1");

        let google = url("https://www.google.com/url?q=https%3A%2F%2Fjobs.lever.co%2Facme%2F7&sa=D");
        assert_eq!(
            unwrap_redirect(&google, &default_rules()).as_str(),
            "https://jobs.lever.co/acme/7"
        );
    }
}
