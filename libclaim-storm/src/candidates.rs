use crate::catalog::Platform;

/// The five fixed ways a base name is turned into a domain label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameVariation {
    Plain,
    GetPrefix,
    TryPrefix,
    AppSuffix,
    LySuffix,
}

impl NameVariation {
    pub const ALL: [NameVariation; 5] = [
        NameVariation::Plain,
        NameVariation::GetPrefix,
        NameVariation::TryPrefix,
        NameVariation::AppSuffix,
        NameVariation::LySuffix,
    ];

    pub fn apply(self, name: &str) -> String {
        match self {
            NameVariation::Plain => name.to_string(),
            NameVariation::GetPrefix => format!("get{}", name),
            NameVariation::TryPrefix => format!("try{}", name),
            NameVariation::AppSuffix => format!("{}app", name),
            NameVariation::LySuffix => format!("{}ly", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Domain {
        tld: String,
        variation: NameVariation,
    },
    Platform(Platform),
    /// A platform id the catalog does not know. Probed by the fallback strategy.
    Unlisted(String),
}

/// One unit of work for the aggregator. `name` is raw; strategies encode it as needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeDescriptor {
    pub target: Target,
    pub name: String,
}

impl ProbeDescriptor {
    pub fn domain(name: &str, tld: &str, variation: NameVariation) -> Self {
        Self {
            target: Target::Domain {
                tld: tld.to_string(),
                variation,
            },
            name: name.to_string(),
        }
    }

    pub fn platform(name: &str, platform: Platform) -> Self {
        Self {
            target: Target::Platform(platform),
            name: name.to_string(),
        }
    }

    /// Resolves a platform id or slug; ids outside the catalog become `Target::Unlisted`.
    pub fn platform_id(name: &str, id: &str) -> Self {
        let target = match id.parse::<Platform>() {
            Ok(platform) => Target::Platform(platform),
            Err(_) => Target::Unlisted(id.to_string()),
        };
        Self {
            target,
            name: name.to_string(),
        }
    }

    /// `{variation}.{tld}` for domain targets.
    pub fn host(&self) -> Option<String> {
        match &self.target {
            Target::Domain { tld, variation } => Some(format!("{}.{}", variation.apply(&self.name), tld)),
            _ => None,
        }
    }

    /// The public form of the candidate: a URL for domains, the platform id otherwise.
    pub fn label(&self) -> String {
        match &self.target {
            Target::Domain { .. } => format!("https://{}", self.host().unwrap_or_default()),
            Target::Platform(platform) => platform.id().to_string(),
            Target::Unlisted(id) => id.clone(),
        }
    }
}

/// Single-variation mode: `https://{name}.{tld}` for every TLD.
pub fn domain_candidates(name: &str, tlds: &[String]) -> Vec<ProbeDescriptor> {
    tlds.iter()
        .map(|tld| ProbeDescriptor::domain(name, tld, NameVariation::Plain))
        .collect()
}

/// Grouped mode: one group per TLD, each with the five variations in fixed order.
pub fn grouped_domain_candidates(name: &str, tlds: &[String]) -> Vec<Vec<ProbeDescriptor>> {
    tlds.iter()
        .map(|tld| {
            NameVariation::ALL
                .into_iter()
                .map(|variation| ProbeDescriptor::domain(name, tld, variation))
                .collect()
        })
        .collect()
}

pub fn platform_candidates(name: &str, platforms: &[Platform]) -> Vec<ProbeDescriptor> {
    platforms
        .iter()
        .map(|platform| ProbeDescriptor::platform(name, *platform))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tlds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn single_variation_one_per_tld() {
        let labels: Vec<String> = domain_candidates("foo", &tlds(&["com", "io"]))
            .iter()
            .map(ProbeDescriptor::label)
            .collect();
        assert_eq!(labels, vec!["https://foo.com", "https://foo.io"]);
    }

    #[test]
    fn grouped_variations_keep_slot_order() {
        let groups = grouped_domain_candidates("foo", &tlds(&["com", "dev"]));
        assert_eq!(groups.len(), 2);

        let dev: Vec<String> = groups[1].iter().map(ProbeDescriptor::label).collect();
        assert_eq!(
            dev,
            vec![
                "https://foo.dev",
                "https://getfoo.dev",
                "https://tryfoo.dev",
                "https://fooapp.dev",
                "https://fooly.dev",
            ]
        );
    }

    #[test]
    fn names_pass_through_unvalidated() {
        let descriptors = platform_candidates("", &[Platform::NpmPackage]);
        assert_eq!(descriptors[0].name, "");

        let domains = domain_candidates("a b", &tlds(&["com"]));
        assert_eq!(domains[0].host().as_deref(), Some("a b.com"));
    }

    #[test]
    fn platform_ids_outside_catalog_are_unlisted() {
        let descriptor = ProbeDescriptor::platform_id("foo", "CPAN module");
        assert_eq!(descriptor.target, Target::Unlisted("CPAN module".to_string()));

        let descriptor = ProbeDescriptor::platform_id("foo", "crates");
        assert_eq!(descriptor.target, Target::Platform(Platform::RustCrate));
    }
}
