use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Fields pre-filled into the application form.
///
/// Every key is serialized even when unknown, so clients can rely on its
/// presence and test for `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFields {
    pub company: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    #[serde(alias = "applyBy")]
    pub deadline: Option<String>,
}

impl JobFields {
    pub const KEYS: [&'static str; 5] = ["company", "location", "salary", "notes", "deadline"];
}

#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub url: Url,
    pub caller_identity: String,
}

impl ExtractionRequest {
    pub fn new(url: Url, caller_identity: impl Into<String>) -> Self {
        Self {
            url,
            caller_identity: caller_identity.into(),
        }
    }
}

/// Page body handed to each extractor, along with where it came from.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: Url,
    pub html: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_keys_serialized_when_empty() {
        let value = serde_json::to_value(JobFields::default()).unwrap();
        let object = value.as_object().unwrap();

        for key in JobFields::KEYS {
            assert!(object.contains_key(key), "missing key {key}");
            assert!(object[key].is_null());
        }
    }

    #[test]
    fn test_apply_by_alias() {
        let fields: JobFields =
            serde_json::from_str(r#"{"company":"Acme","applyBy":"2025-01-31"}"#).unwrap();
        assert_eq!(fields.deadline.as_deref(), Some("2025-01-31"));
        assert_eq!(fields.company.as_deref(), Some("Acme"));
    }
}
