use serde::{Serialize, Serializer};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// TLDs probed when the caller does not pick its own. Order is display order only.
pub const DEFAULT_TLDS: &[&str] = &[
    "com", "net", "org", "io", "dev", "app", "in", "tech", "co", "ai", "xyz", "me", "ing",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),
}

/// How a probe's raw response is turned into an availability signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    /// Any 2xx from the candidate URL means taken.
    HttpReachability,
    /// 404 from the registry lookup means available.
    HttpStatus404,
    /// A search API whose JSON body carries a match count.
    JsonCountPredicate,
    /// No public API; a coin flip tagged as heuristic.
    RandomHeuristic,
}

/// Registry lookup endpoint. `{name}` in `path` is replaced by the prepared name segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub origin: &'static str,
    pub path: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    GitHubRepo,
    GitHubUser,
    GitLabProject,
    PyPiPackage,
    Homebrew,
    AptPackage,
    RustCrate,
    MavenPackage,
    NpmPackage,
    NpmOrg,
    RubyGem,
    NugetPackage,
    PackagistPackage,
    GoPackage,
}

impl Platform {
    pub const ALL: [Platform; 14] = [
        Platform::GitHubRepo,
        Platform::GitHubUser,
        Platform::GitLabProject,
        Platform::PyPiPackage,
        Platform::Homebrew,
        Platform::AptPackage,
        Platform::RustCrate,
        Platform::MavenPackage,
        Platform::NpmPackage,
        Platform::NpmOrg,
        Platform::RubyGem,
        Platform::NugetPackage,
        Platform::PackagistPackage,
        Platform::GoPackage,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Platform::GitHubRepo => "GitHub repo",
            Platform::GitHubUser => "GitHub org/user",
            Platform::GitLabProject => "GitLab project",
            Platform::PyPiPackage => "PyPI package",
            Platform::Homebrew => "Homebrew cask/formula",
            Platform::AptPackage => "apt package",
            Platform::RustCrate => "Rust crate",
            Platform::MavenPackage => "Maven package",
            Platform::NpmPackage => "npm package",
            Platform::NpmOrg => "npm org",
            Platform::RubyGem => "Ruby gem",
            Platform::NugetPackage => "Nuget package",
            Platform::PackagistPackage => "Packagist package",
            Platform::GoPackage => "Go package",
        }
    }

    /// Short alias accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Platform::GitHubRepo => "github-repo",
            Platform::GitHubUser => "github-user",
            Platform::GitLabProject => "gitlab",
            Platform::PyPiPackage => "pypi",
            Platform::Homebrew => "homebrew",
            Platform::AptPackage => "apt",
            Platform::RustCrate => "crates",
            Platform::MavenPackage => "maven",
            Platform::NpmPackage => "npm",
            Platform::NpmOrg => "npm-org",
            Platform::RubyGem => "rubygems",
            Platform::NugetPackage => "nuget",
            Platform::PackagistPackage => "packagist",
            Platform::GoPackage => "go",
        }
    }

    pub fn strategy(self) -> StrategyKind {
        match self {
            Platform::GitHubRepo => StrategyKind::JsonCountPredicate,
            Platform::AptPackage | Platform::MavenPackage => StrategyKind::RandomHeuristic,
            _ => StrategyKind::HttpStatus404,
        }
    }

    pub fn lookup(self) -> Option<Lookup> {
        let (origin, path) = match self {
            Platform::GitHubRepo => ("https://api.github.com", "/search/repositories?q={name}+in:name"),
            Platform::GitHubUser => ("https://api.github.com", "/users/{name}"),
            Platform::GitLabProject => ("https://gitlab.com", "/api/v4/projects/{name}"),
            Platform::PyPiPackage => ("https://pypi.org", "/pypi/{name}/json"),
            Platform::Homebrew => ("https://formulae.brew.sh", "/api/formula/{name}.json"),
            Platform::RustCrate => ("https://crates.io", "/api/v1/crates/{name}"),
            Platform::NpmPackage => ("https://registry.npmjs.org", "/{name}"),
            Platform::NpmOrg => ("https://www.npmjs.com", "/org/{name}"),
            Platform::RubyGem => ("https://rubygems.org", "/api/v1/gems/{name}.json"),
            Platform::NugetPackage => (
                "https://api.nuget.org",
                "/v3/registration5-gz-semver1/{name}/index.json",
            ),
            Platform::PackagistPackage => ("https://repo.packagist.org", "/p2/{name}.json"),
            Platform::GoPackage => ("https://pkg.go.dev", "/{name}?tab=overview"),
            Platform::AptPackage | Platform::MavenPackage => return None,
        };
        Some(Lookup { origin, path })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Platform {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Platform::ALL
            .into_iter()
            .find(|p| p.id().eq_ignore_ascii_case(wanted) || p.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownPlatform(s.to_string()))
    }
}

impl Serialize for Platform {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

pub fn default_tlds() -> Vec<String> {
    DEFAULT_TLDS.iter().map(|s| s.to_string()).collect()
}
