use crate::endpoint::Endpoints;
use serde::{Serialize, Serializer};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Measured,
    Heuristic,
}

/// Registration price. No pricing source exists, so the only value is `Unknown`,
/// which goes out on the wire as `0` to keep the response shape stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Price {
    #[default]
    Unknown,
}

impl Price {
    pub fn cents(self) -> Option<u64> {
        match self {
            Price::Unknown => None,
        }
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.cents().unwrap_or(0))
    }
}

/// What a result is about. Flattened into the result object as either `url` or `platform`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Subject {
    Domain { url: String },
    Platform { platform: String },
}

impl Subject {
    pub fn label(&self) -> &str {
        match self {
            Subject::Domain { url } => url,
            Subject::Platform { platform } => platform,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    #[serde(flatten)]
    pub subject: Subject,
    pub available: bool,
    pub confidence: Confidence,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_in_cents: Option<Price>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    /// Why the probe failed, if it did. Never changes `available`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub duration: Duration,
}

#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub timeout: Duration,
    pub max_concurrent: usize,
    pub max_rate_per_host: u32,
    pub user_agent: String,
    pub endpoints: Endpoints,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_concurrent: 64,
            max_rate_per_host: 20,
            user_agent: concat!("libclaim-storm/", env!("CARGO_PKG_VERSION")).to_string(),
            endpoints: Endpoints::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_result_wire_shape() {
        let result = ProbeResult {
            subject: Subject::Domain { url: "https://bar.com".to_string() },
            available: false,
            confidence: Confidence::Measured,
            price_in_cents: Some(Price::Unknown),
            link: None,
            error: None,
            duration: Duration::from_millis(12),
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "url": "https://bar.com",
                "available": false,
                "confidence": "measured",
                "priceInCents": 0
            })
        );
    }

    #[test]
    fn platform_result_wire_shape() {
        let result = ProbeResult {
            subject: Subject::Platform { platform: "apt package".to_string() },
            available: true,
            confidence: Confidence::Heuristic,
            price_in_cents: None,
            link: Some("https://packages.ubuntu.com/search?keywords=foo".to_string()),
            error: None,
            duration: Duration::ZERO,
        };

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "platform": "apt package",
                "available": true,
                "confidence": "heuristic",
                "link": "https://packages.ubuntu.com/search?keywords=foo"
            })
        );
    }

    #[test]
    fn unknown_price_has_no_cents() {
        assert_eq!(Price::Unknown.cents(), None);
    }
}
