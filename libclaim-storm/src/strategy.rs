use crate::{
    candidates::{ProbeDescriptor, Target},
    catalog::{Platform, StrategyKind},
    endpoint::Endpoints,
    types::Confidence,
};
use rand::Rng;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Field holding the match count in a GitHub search response.
const GITHUB_COUNT_FIELD: &str = "total_count";

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Timeout")]
    Timeout,
    #[error("Unreadable response body: {0}")]
    Body(#[source] reqwest::Error),
    #[error("Response has no numeric `{0}` field")]
    MissingField(&'static str),
    #[error("No probe for platform: {0}")]
    Unsupported(String),
}

/// Availability reported when a probe of this kind fails.
///
/// Every kind reports "not available". For domains that contradicts the usual reading
/// of a DNS or connect failure (nothing is registered there), but it is the established
/// behaviour and is kept as is.
pub fn availability_on_failure(kind: StrategyKind) -> bool {
    match kind {
        StrategyKind::HttpReachability => false,
        StrategyKind::HttpStatus404 => false,
        StrategyKind::JsonCountPredicate => false,
        StrategyKind::RandomHeuristic => false,
    }
}

/// A probe resolved down to the request it will make.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Strategy {
    Reachability { url: String },
    Status404 { url: String },
    JsonCount { url: String, field: &'static str },
    RandomHeuristic,
    /// Fallback for ids outside the catalog; always "not available".
    Unsupported { id: String },
}

#[derive(Debug)]
pub(crate) struct Outcome {
    pub available: bool,
    pub confidence: Confidence,
    pub error: Option<ProbeError>,
}

impl Strategy {
    pub fn resolve(descriptor: &ProbeDescriptor, endpoints: &Endpoints) -> Self {
        match &descriptor.target {
            Target::Domain { .. } => Strategy::Reachability {
                url: endpoints.domain_url(&descriptor.host().unwrap_or_default()),
            },
            Target::Platform(platform) => {
                let platform = *platform;
                let segment = lookup_segment(platform, &descriptor.name);
                let url = endpoints.lookup_url(platform, &segment);
                match (platform.strategy(), url) {
                    (StrategyKind::RandomHeuristic, _) => Strategy::RandomHeuristic,
                    (StrategyKind::JsonCountPredicate, Some(url)) => Strategy::JsonCount {
                        url,
                        field: GITHUB_COUNT_FIELD,
                    },
                    (StrategyKind::HttpStatus404, Some(url)) => Strategy::Status404 { url },
                    (StrategyKind::HttpReachability, Some(url)) => Strategy::Reachability { url },
                    (_, None) => Strategy::Unsupported {
                        id: platform.id().to_string(),
                    },
                }
            }
            Target::Unlisted(id) => Strategy::Unsupported { id: id.clone() },
        }
    }

    pub fn kind(&self) -> Option<StrategyKind> {
        match self {
            Strategy::Reachability { .. } => Some(StrategyKind::HttpReachability),
            Strategy::Status404 { .. } => Some(StrategyKind::HttpStatus404),
            Strategy::JsonCount { .. } => Some(StrategyKind::JsonCountPredicate),
            Strategy::RandomHeuristic => Some(StrategyKind::RandomHeuristic),
            Strategy::Unsupported { .. } => None,
        }
    }

    /// The URL this probe will hit, if it makes a request at all.
    pub fn url(&self) -> Option<&str> {
        match self {
            Strategy::Reachability { url }
            | Strategy::Status404 { url }
            | Strategy::JsonCount { url, .. } => Some(url.as_str()),
            Strategy::RandomHeuristic | Strategy::Unsupported { .. } => None,
        }
    }

    pub async fn run(&self, client: &Client, timeout: Duration) -> Outcome {
        let measured = match self {
            Strategy::Reachability { url } => check_reachability(client, url, timeout).await,
            Strategy::Status404 { url } => check_status_404(client, url, timeout).await,
            Strategy::JsonCount { url, field } => check_json_count(client, url, *field, timeout).await,
            Strategy::RandomHeuristic => {
                return Outcome {
                    available: random_heuristic(),
                    confidence: Confidence::Heuristic,
                    error: None,
                };
            }
            Strategy::Unsupported { id } => Err(ProbeError::Unsupported(id.clone())),
        };

        match measured {
            Ok(available) => Outcome {
                available,
                confidence: Confidence::Measured,
                error: None,
            },
            Err(e) => Outcome {
                available: self.kind().map(availability_on_failure).unwrap_or(false),
                confidence: Confidence::Measured,
                error: Some(e),
            },
        }
    }
}

/// The name as it goes into a lookup path. Encoding is per registry.
fn lookup_segment(platform: Platform, name: &str) -> String {
    match platform {
        Platform::GitHubRepo => urlencoding::encode(&format!("/{}$/", name)).into_owned(),
        Platform::GitLabProject => urlencoding::encode(name).into_owned(),
        _ => name.to_string(),
    }
}

async fn send(client: &Client, url: &str, timeout: Duration) -> Result<Response, ProbeError> {
    match tokio::time::timeout(timeout, client.get(url).send()).await {
        Ok(Ok(response)) => Ok(response),
        Ok(Err(e)) if e.is_timeout() => Err(ProbeError::Timeout),
        Ok(Err(e)) => Err(ProbeError::Request(e)),
        Err(_) => Err(ProbeError::Timeout),
    }
}

/// Domain probe: a successful response means something is served there, so the name is taken.
pub async fn check_reachability(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<bool, ProbeError> {
    let response = send(client, url, timeout).await?;
    Ok(!response.status().is_success())
}

/// Registry probe: only a 404 means available. 429 and 5xx read as taken.
pub async fn check_status_404(
    client: &Client,
    url: &str,
    timeout: Duration,
) -> Result<bool, ProbeError> {
    let response = send(client, url, timeout).await?;
    Ok(response.status() == StatusCode::NOT_FOUND)
}

/// Search probe: available when the body's `field` count is zero.
pub async fn check_json_count(
    client: &Client,
    url: &str,
    field: &'static str,
    timeout: Duration,
) -> Result<bool, ProbeError> {
    let response = send(client, url, timeout).await?;
    let body: Value = match tokio::time::timeout(timeout, response.json()).await {
        Ok(body) => body.map_err(ProbeError::Body)?,
        Err(_) => return Err(ProbeError::Timeout),
    };

    let count = body
        .get(field)
        .and_then(Value::as_u64)
        .ok_or(ProbeError::MissingField(field))?;
    Ok(count == 0)
}

/// Stand-in for platforms with no listing API. Not a measurement.
pub fn random_heuristic() -> bool {
    rand::thread_rng().gen_bool(0.5)
}
