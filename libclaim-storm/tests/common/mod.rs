#![allow(dead_code)]

use httpmock::MockServer;
use libclaim_storm::{Endpoints, ProbeConfig, Prober};
use std::time::Duration;

/// A prober whose every request lands on the mock server.
pub fn prober_for(server: &MockServer) -> Prober {
    Prober::try_with_config(config_for(&server.base_url())).unwrap()
}

pub fn config_for(origin: &str) -> ProbeConfig {
    ProbeConfig {
        timeout: Duration::from_secs(2),
        max_rate_per_host: 10_000,
        endpoints: Endpoints::with_origin(origin),
        ..ProbeConfig::default()
    }
}

pub fn tlds(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}
