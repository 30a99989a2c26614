use console::style;
use libclaim_storm::{Confidence, ProbeResult};
use serde::Serialize;

/// Domain half of the aggregate response: flat, or one group per TLD in variation mode.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DomainResults {
    Flat(Vec<ProbeResult>),
    Grouped(Vec<Vec<ProbeResult>>),
}

impl DomainResults {
    pub fn iter(&self) -> Box<dyn Iterator<Item = &ProbeResult> + '_> {
        match self {
            DomainResults::Flat(results) => Box::new(results.iter()),
            DomainResults::Grouped(groups) => Box::new(groups.iter().flatten()),
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domains: Option<DomainResults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<ProbeResult>>,
}

/// One NDJSON line: the result plus the index of the candidate it answers.
#[derive(Debug, Serialize)]
pub struct StreamLine<'a> {
    pub index: usize,
    #[serde(flatten)]
    pub result: &'a ProbeResult,
}

pub fn render_result(result: &ProbeResult) -> String {
    let (symbol, verdict) = match (result.available, result.confidence) {
        (true, Confidence::Measured) => (style("✓").green().bold(), style("available").green()),
        (false, Confidence::Measured) if result.error.is_some() => {
            (style("!").magenta().bold(), style("unknown").magenta())
        }
        (false, Confidence::Measured) => (style("✗").red().bold(), style("taken").red()),
        (true, Confidence::Heuristic) => (style("~").yellow().bold(), style("maybe available").yellow()),
        (false, Confidence::Heuristic) => (style("~").yellow().bold(), style("maybe taken").yellow()),
    };

    let mut line = format!(
        "{} {} {}",
        symbol,
        style(format!("{:<30}", result.subject.label())).cyan(),
        verdict
    );
    if let Some(link) = &result.link {
        line.push_str(&format!("  {}", style(link).dim()));
    }
    if let Some(error) = &result.error {
        line.push_str(&format!("  {}", style(format!("({})", error)).dim()));
    }
    line
}

pub fn render_section<'a>(title: &str, results: impl Iterator<Item = &'a ProbeResult>) -> String {
    let results: Vec<&ProbeResult> = results.collect();
    let available = results.iter().filter(|r| r.available).count();

    let mut out = format!(
        "{} [Available:{}/{}]\n",
        style(title).bold(),
        available,
        results.len()
    );
    for result in results {
        out.push_str(&render_result(result));
        out.push('\n');
    }
    out
}

pub fn render_report(report: &Report) -> String {
    let mut sections = Vec::new();
    if let Some(domains) = &report.domains {
        sections.push(render_section("Domains", domains.iter()));
    }
    if let Some(platforms) = &report.platforms {
        sections.push(render_section("Platforms", platforms.iter()));
    }
    sections.join("\n")
}
