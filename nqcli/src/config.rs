use libclaim_storm::{Endpoints, Platform, ProbeConfig};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, collections::HashSet, path::PathBuf, time::Duration};
use tracing::warn;

/// Key under `[endpoints]` that reroutes domain probes.
const DOMAINS_ENDPOINT_KEY: &str = "domains";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tlds: TldConfig,
    #[serde(default)]
    pub platforms: PlatformConfig,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TldConfig {
    #[serde(default)]
    pub always: Vec<String>,
    #[serde(default)]
    pub never: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PlatformConfig {
    #[serde(default)]
    pub never: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeSettings {
    pub timeout_secs: u64,
    pub max_concurrent: usize,
    pub max_rate_per_host: u32,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        let defaults = ProbeConfig::default();
        Self {
            timeout_secs: defaults.timeout.as_secs(),
            max_concurrent: defaults.max_concurrent,
            max_rate_per_host: defaults.max_rate_per_host,
        }
    }
}

pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("nq").join("config.toml"))
}

pub fn load_config() -> Config {
    let Some(path) = config_path() else {
        return Config::default();
    };
    let Ok(content) = std::fs::read_to_string(&path) else {
        return Config::default();
    };
    match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring unreadable config");
            Config::default()
        }
    }
}

pub fn apply_config_to_tlds(mut tlds: Vec<String>, config: &Config) -> Vec<String> {
    let never_set: HashSet<_> = config.tlds.never.iter()
        .map(|s| s.to_lowercase())
        .collect();

    tlds.retain(|tld| !never_set.contains(&tld.to_lowercase()));

    for always_tld in config.tlds.always.iter().rev() {
        let lower = always_tld.to_lowercase();
        if !tlds.iter().any(|t| t.to_lowercase() == lower) {
            tlds.insert(0, lower);
        }
    }

    tlds
}

/// Catalog platforms minus the ones the config turns off.
pub fn enabled_platforms(config: &Config) -> Vec<Platform> {
    let never: HashSet<Platform> = config
        .platforms
        .never
        .iter()
        .filter_map(|id| match id.parse::<Platform>() {
            Ok(platform) => Some(platform),
            Err(e) => {
                warn!(error = %e, "ignoring entry in [platforms].never");
                None
            }
        })
        .collect();

    Platform::ALL
        .into_iter()
        .filter(|p| !never.contains(p))
        .collect()
}

pub fn probe_config(config: &Config, timeout_override: Option<u64>) -> ProbeConfig {
    let mut endpoints = Endpoints::new();
    for (key, origin) in &config.endpoints {
        if key.eq_ignore_ascii_case(DOMAINS_ENDPOINT_KEY) {
            endpoints = endpoints.with_domain_origin(origin);
            continue;
        }
        match key.parse::<Platform>() {
            Ok(platform) => endpoints.override_origin(platform, origin),
            Err(e) => warn!(error = %e, "ignoring entry in [endpoints]"),
        }
    }

    ProbeConfig {
        timeout: Duration::from_secs(timeout_override.unwrap_or(config.probe.timeout_secs)),
        max_concurrent: config.probe.max_concurrent,
        max_rate_per_host: config.probe.max_rate_per_host,
        endpoints,
        ..ProbeConfig::default()
    }
}

pub fn get_default_config_toml() -> String {
    r#"# Name Query (nq) Configuration

[tlds]
# TLDs to always include in domain checks
# always = ["rs", "no", "pm"]
always = []

# TLDs to never check
# never = ["ing", "xyz"]
never = []

[platforms]
# Platform ids or slugs to skip (see `nq --list-platforms`)
# never = ["apt", "maven"]
never = []

[probe]
timeout_secs = 5
max_concurrent = 64
max_rate_per_host = 20

[endpoints]
# Send lookups for a platform to another origin (mirror, proxy)
# npm = "https://registry.npmmirror.com"
# domains = "http://localhost:8080"
"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tlds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn default_config_parses_to_defaults() {
        let config: Config = toml::from_str(&get_default_config_toml()).unwrap();
        assert!(config.tlds.always.is_empty());
        assert!(config.platforms.never.is_empty());
        assert_eq!(config.probe.timeout_secs, 5);
        assert_eq!(enabled_platforms(&config).len(), Platform::ALL.len());
    }

    #[test]
    fn never_and_always_reshape_tlds() {
        let config: Config = toml::from_str(
            r#"
            [tlds]
            always = ["RS", "com"]
            never = ["xyz"]
            "#,
        )
        .unwrap();

        let result = apply_config_to_tlds(tlds(&["com", "xyz", "io"]), &config);
        assert_eq!(result, tlds(&["rs", "com", "io"]));
    }

    #[test]
    fn platforms_can_be_switched_off_by_slug_or_id() {
        let config: Config = toml::from_str(
            r#"
            [platforms]
            never = ["apt", "Maven package", "not-a-platform"]
            "#,
        )
        .unwrap();

        let enabled = enabled_platforms(&config);
        assert_eq!(enabled.len(), Platform::ALL.len() - 2);
        assert!(!enabled.contains(&Platform::AptPackage));
        assert!(!enabled.contains(&Platform::MavenPackage));
    }

    #[test]
    fn endpoint_overrides_reach_the_probe_config() {
        let config: Config = toml::from_str(
            r#"
            [probe]
            timeout_secs = 9

            [endpoints]
            npm = "https://registry.npmmirror.com"
            domains = "http://localhost:8080"
            "#,
        )
        .unwrap();

        let probe = probe_config(&config, None);
        assert_eq!(probe.timeout, Duration::from_secs(9));
        assert_eq!(probe.max_concurrent, 64);
        assert_eq!(
            probe.endpoints.lookup_url(Platform::NpmPackage, "foo").as_deref(),
            Some("https://registry.npmmirror.com/foo")
        );
        assert_eq!(probe.endpoints.domain_url("foo.com"), "http://localhost:8080/foo.com");

        assert_eq!(probe_config(&config, Some(2)).timeout, Duration::from_secs(2));
    }
}
