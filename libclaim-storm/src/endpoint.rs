use crate::catalog::Platform;
use std::collections::HashMap;

/// Where probe requests are actually sent.
///
/// Candidates keep their public form (`https://foo.com`, `npm package`); this only decides
/// which origin answers the lookup, so registries can be pointed at mirrors, proxies or a
/// local mock without touching the generated targets.
#[derive(Debug, Clone, Default)]
pub struct Endpoints {
    origins: HashMap<Platform, String>,
    domain_origin: Option<String>,
}

impl Endpoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes every registry lookup and every domain probe to `origin`.
    pub fn with_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/').to_string();
        let origins = Platform::ALL
            .into_iter()
            .filter(|p| p.lookup().is_some())
            .map(|p| (p, origin.clone()))
            .collect();

        Self {
            origins,
            domain_origin: Some(origin),
        }
    }

    pub fn override_origin(&mut self, platform: Platform, origin: &str) {
        self.origins
            .insert(platform, origin.trim_end_matches('/').to_string());
    }

    pub fn with_domain_origin(mut self, origin: &str) -> Self {
        self.domain_origin = Some(origin.trim_end_matches('/').to_string());
        self
    }

    /// Lookup URL for `platform` with the already-prepared name `segment`.
    /// `None` for platforms that have no lookup API.
    pub fn lookup_url(&self, platform: Platform, segment: &str) -> Option<String> {
        let lookup = platform.lookup()?;
        let origin = self
            .origins
            .get(&platform)
            .map(String::as_str)
            .unwrap_or(lookup.origin);
        Some(format!("{}{}", origin, lookup.path.replace("{name}", segment)))
    }

    pub fn domain_url(&self, host: &str) -> String {
        match &self.domain_origin {
            Some(origin) => format!("{}/{}", origin, host),
            None => format!("https://{}", host),
        }
    }
}

/// Host part of a URL, used to key per-host rate limiters.
pub fn extract_host(url: &str) -> &str {
    let rest = url.split_once("://").map(|(_, r)| r).unwrap_or(url);
    rest.split(['/', '?', '#']).next().unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes_use_catalog_origins() {
        let endpoints = Endpoints::new();
        assert_eq!(
            endpoints.lookup_url(Platform::RustCrate, "serde").as_deref(),
            Some("https://crates.io/api/v1/crates/serde")
        );
        assert_eq!(
            endpoints.lookup_url(Platform::GoPackage, "foo").as_deref(),
            Some("https://pkg.go.dev/foo?tab=overview")
        );
        assert_eq!(endpoints.lookup_url(Platform::MavenPackage, "foo"), None);
        assert_eq!(endpoints.domain_url("getfoo.io"), "https://getfoo.io");
    }

    #[test]
    fn single_origin_rewrites_everything() {
        let endpoints = Endpoints::with_origin("http://127.0.0.1:9000/");
        assert_eq!(
            endpoints.lookup_url(Platform::NpmPackage, "foo").as_deref(),
            Some("http://127.0.0.1:9000/foo")
        );
        assert_eq!(endpoints.domain_url("foo.com"), "http://127.0.0.1:9000/foo.com");
    }

    #[test]
    fn per_platform_override_leaves_others_alone() {
        let mut endpoints = Endpoints::new();
        endpoints.override_origin(Platform::NpmPackage, "https://registry.npmmirror.com");
        assert_eq!(
            endpoints.lookup_url(Platform::NpmPackage, "foo").as_deref(),
            Some("https://registry.npmmirror.com/foo")
        );
        assert_eq!(
            endpoints.lookup_url(Platform::PyPiPackage, "foo").as_deref(),
            Some("https://pypi.org/pypi/foo/json")
        );
    }

    #[test]
    fn host_extraction() {
        assert_eq!(extract_host("https://api.github.com/users/foo"), "api.github.com");
        assert_eq!(extract_host("http://127.0.0.1:9000/foo.com"), "127.0.0.1:9000");
        assert_eq!(extract_host("https://pkg.go.dev/foo?tab=overview"), "pkg.go.dev");
        assert_eq!(extract_host("foo.com"), "foo.com");
    }
}
