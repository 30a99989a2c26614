use crate::{
    candidates::{
        domain_candidates, grouped_domain_candidates, platform_candidates, NameVariation,
        ProbeDescriptor, Target,
    },
    catalog::Platform,
    endpoint::extract_host,
    http::{create_http_pool, HttpError},
    link::{link_for_id, platform_link},
    ratelimit::HostRateLimiters,
    strategy::{Outcome, Strategy},
    types::{Price, ProbeConfig, ProbeResult, Subject},
};
use futures::stream::{self, Stream, StreamExt};
use reqwest::Client;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// Runs probes concurrently and hands results back in the order they were generated.
pub struct Prober {
    client: Client,
    rate_limiters: Arc<HostRateLimiters>,
    config: ProbeConfig,
}

impl Prober {
    pub fn new() -> Self {
        Self::with_config(ProbeConfig::default())
    }

    pub fn with_config(config: ProbeConfig) -> Self {
        let client = match create_http_pool(config.timeout, &config.user_agent) {
            Ok(client) => client,
            Err(e) => {
                warn!(error = %e, "falling back to default HTTP client");
                Client::default()
            }
        };
        Self::from_parts(client, config)
    }

    pub fn try_with_config(config: ProbeConfig) -> Result<Self, HttpError> {
        let client = create_http_pool(config.timeout, &config.user_agent)?;
        Ok(Self::from_parts(client, config))
    }

    fn from_parts(client: Client, config: ProbeConfig) -> Self {
        Self {
            client,
            rate_limiters: Arc::new(HostRateLimiters::new(config.max_rate_per_host)),
            config,
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probes one descriptor. Never fails: a broken probe still yields a result.
    pub async fn probe_one(&self, descriptor: &ProbeDescriptor) -> ProbeResult {
        let start = Instant::now();
        let strategy = Strategy::resolve(descriptor, &self.config.endpoints);

        if let Some(url) = strategy.url() {
            self.rate_limiters.acquire(extract_host(url)).await;
        }

        let outcome = strategy.run(&self.client, self.config.timeout).await;
        let label = descriptor.label();
        match &outcome.error {
            Some(e) => warn!(candidate = %label, error = %e, "probe failed"),
            None => debug!(
                candidate = %label,
                available = outcome.available,
                confidence = ?outcome.confidence,
                "probe settled"
            ),
        }

        assemble(descriptor, label, outcome, start.elapsed())
    }

    /// Probes every descriptor and returns one result per descriptor, in input order,
    /// whatever order the probes finish in.
    pub async fn probe_all(&self, descriptors: &[ProbeDescriptor]) -> Vec<ProbeResult> {
        stream::iter(descriptors)
            .map(|descriptor| self.probe_one(descriptor))
            .buffered(self.concurrency())
            .collect()
            .await
    }

    /// Results as they complete, tagged with the descriptor's index.
    pub fn probe_stream(
        &self,
        descriptors: Vec<ProbeDescriptor>,
    ) -> impl Stream<Item = (usize, ProbeResult)> + '_ {
        stream::iter(descriptors.into_iter().enumerate())
            .map(move |(index, descriptor)| async move {
                (index, self.probe_one(&descriptor).await)
            })
            .buffer_unordered(self.concurrency())
    }

    pub async fn check_platforms(&self, name: &str) -> Vec<ProbeResult> {
        self.check_platforms_in(name, &Platform::ALL).await
    }

    pub async fn check_platforms_in(&self, name: &str, platforms: &[Platform]) -> Vec<ProbeResult> {
        let descriptors = platform_candidates(name, platforms);
        info!(query = name, platforms = descriptors.len(), "checking platforms");
        self.probe_all(&descriptors).await
    }

    /// Single platform by id or slug. Ids outside the catalog come back unavailable.
    pub async fn check_platform(&self, name: &str, id: &str) -> ProbeResult {
        self.probe_one(&ProbeDescriptor::platform_id(name, id)).await
    }

    pub async fn check_domains(&self, name: &str, tlds: &[String]) -> Vec<ProbeResult> {
        let descriptors = domain_candidates(name, tlds);
        info!(query = name, domains = descriptors.len(), "checking domains");
        self.probe_all(&descriptors).await
    }

    /// Grouped mode: one group per TLD, five variations per group.
    pub async fn check_domain_variations(&self, name: &str, tlds: &[String]) -> Vec<Vec<ProbeResult>> {
        let groups = grouped_domain_candidates(name, tlds);
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        let descriptors: Vec<ProbeDescriptor> = groups.into_iter().flatten().collect();
        info!(query = name, domains = descriptors.len(), "checking domain variations");

        let mut results = self.probe_all(&descriptors).await.into_iter();
        sizes
            .into_iter()
            .map(|size| results.by_ref().take(size).collect())
            .collect()
    }

    pub async fn check_domain(&self, name: &str, tld: &str) -> ProbeResult {
        self.probe_one(&ProbeDescriptor::domain(name, tld, NameVariation::Plain))
            .await
    }

    fn concurrency(&self) -> usize {
        self.config.max_concurrent.max(1)
    }
}

fn assemble(
    descriptor: &ProbeDescriptor,
    label: String,
    outcome: Outcome,
    duration: Duration,
) -> ProbeResult {
    let (subject, price_in_cents, link) = match &descriptor.target {
        Target::Domain { .. } => (Subject::Domain { url: label }, Some(Price::Unknown), None),
        Target::Platform(platform) => (
            Subject::Platform { platform: label },
            None,
            Some(platform_link(*platform, &descriptor.name)),
        ),
        Target::Unlisted(id) => (
            Subject::Platform { platform: label },
            None,
            Some(link_for_id(id, &descriptor.name)),
        ),
    };

    ProbeResult {
        subject,
        available: outcome.available,
        confidence: outcome.confidence,
        price_in_cents,
        link,
        error: outcome.error.map(|e| e.to_string()),
        duration,
    }
}

impl Default for Prober {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Prober {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            rate_limiters: Arc::clone(&self.rate_limiters),
            config: self.config.clone(),
        }
    }
}
