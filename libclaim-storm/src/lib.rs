//! Is this name free to claim?
//!
//! Generates candidates from a base name (domains across TLDs and name variations,
//! package registries, code hosts), probes them all concurrently with a per-platform
//! strategy, and folds every answer into the same [`ProbeResult`] shape. Results always
//! come back one per candidate and in generation order; a failing probe yields an
//! unavailable result instead of an error.

pub mod candidates;
pub mod catalog;
mod endpoint;
mod http;
pub mod link;
mod prober;
mod ratelimit;
mod strategy;
mod types;

pub use candidates::{NameVariation, ProbeDescriptor, Target};
pub use catalog::{default_tlds, CatalogError, Platform, StrategyKind, DEFAULT_TLDS};
pub use endpoint::Endpoints;
pub use http::HttpError;
pub use prober::Prober;
pub use strategy::{
    availability_on_failure, check_json_count, check_reachability, check_status_404,
    random_heuristic, ProbeError,
};
pub use types::{Confidence, Price, ProbeConfig, ProbeResult, Subject};

pub async fn check_platforms(name: &str) -> Vec<ProbeResult> {
    Prober::new().check_platforms(name).await
}

pub async fn check_domain_variations(name: &str) -> Vec<Vec<ProbeResult>> {
    Prober::new()
        .check_domain_variations(name, &default_tlds())
        .await
}
