use crate::catalog::Platform;

/// Placeholder returned for platforms the catalog does not know.
pub const NO_LINK: &str = "#";

/// Canonical public page for `name` on `platform`, for a human to follow up.
pub fn platform_link(platform: Platform, name: &str) -> String {
    match platform {
        Platform::GitHubRepo | Platform::GitHubUser => format!("https://github.com/{}", name),
        Platform::GitLabProject => format!("https://gitlab.com/{}", name),
        Platform::PyPiPackage => format!("https://pypi.org/project/{}", name),
        Platform::Homebrew => format!("https://formulae.brew.sh/formula/{}", name),
        Platform::AptPackage => format!("https://packages.ubuntu.com/search?keywords={}", name),
        Platform::RustCrate => format!("https://crates.io/crates/{}", name),
        Platform::MavenPackage => format!("https://search.maven.org/search?q=g:{}", name),
        Platform::NpmPackage => format!("https://www.npmjs.com/package/{}", name),
        Platform::NpmOrg => format!("https://www.npmjs.com/org/{}", name),
        Platform::RubyGem => format!("https://rubygems.org/gems/{}", name),
        Platform::NugetPackage => format!("https://www.nuget.org/packages/{}", name),
        Platform::PackagistPackage => format!("https://packagist.org/packages/{}", name),
        Platform::GoPackage => format!("https://pkg.go.dev/{}", name),
    }
}

/// Same as [`platform_link`] but keyed by id or slug. Never fails.
pub fn link_for_id(id: &str, name: &str) -> String {
    id.parse::<Platform>()
        .map(|platform| platform_link(platform, name))
        .unwrap_or_else(|_| NO_LINK.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_links() {
        assert_eq!(
            platform_link(Platform::NpmPackage, "foo"),
            "https://www.npmjs.com/package/foo"
        );
        assert_eq!(platform_link(Platform::RustCrate, "foo"), "https://crates.io/crates/foo");
        assert_eq!(
            platform_link(Platform::MavenPackage, "foo"),
            "https://search.maven.org/search?q=g:foo"
        );
    }

    #[test]
    fn unknown_id_gets_placeholder() {
        assert_eq!(link_for_id("Hackage package", "foo"), NO_LINK);
        assert_eq!(link_for_id("pypi", "foo"), "https://pypi.org/project/foo");
    }
}
