mod config;
mod logger;
mod output;

use clap::Parser;
use config::{
    apply_config_to_tlds, config_path, enabled_platforms, get_default_config_toml, load_config,
    probe_config,
};
use futures::StreamExt;
use libclaim_storm::{
    candidates::{domain_candidates, grouped_domain_candidates, platform_candidates},
    default_tlds, Platform, ProbeDescriptor, ProbeResult, Prober,
};
use output::{render_report, render_result, DomainResults, Report, StreamLine};
use std::io::{self, Write};
use tracing::debug;

fn parse_domain_query(query: &str) -> (String, Option<String>) {
    if let Some(dot_pos) = query.rfind('.') {
        let base = &query[..dot_pos];
        let potential_tld = &query[dot_pos + 1..];

        let is_valid_tld = !base.is_empty()
            && !potential_tld.is_empty()
            && potential_tld.len() <= 20
            && potential_tld.chars().all(|c| c.is_ascii_alphabetic());

        if is_valid_tld {
            return (base.to_string(), Some(potential_tld.to_lowercase()));
        }
    }

    (query.to_string(), None)
}

/// Moves `priority_tld` to the front, adding it if the list lacks it.
/// Moves `priority_tld` to the front if it is in the list; never adds it.
fn prioritize_tld(mut tlds: Vec<String>, priority_tld: &str) -> Vec<String> {
    if let Some(pos) = tlds.iter().position(|t| t.eq_ignore_ascii_case(priority_tld)) {
        let tld = tlds.remove(pos);
        tlds.insert(0, tld);
    }
    tlds
}

#[derive(Parser, Debug)]
#[command(name = "nq")]
#[command(about = "Name Query - is this name free to claim across domains and package registries?", long_about = None)]
struct Args {
    /// Name to check. Platforms get it as typed; for domains a trailing known TLD
    /// (`foo.io`) is split off and checked first
    query: Option<String>,

    /// Check a single TLD only
    #[arg(long, conflicts_with = "platform")]
    domain: Option<String>,

    /// Check a single platform only, by id or slug (see --list-platforms)
    #[arg(long)]
    platform: Option<String>,

    /// Also check get-, try-, -app and -ly variations for every TLD
    #[arg(long)]
    variations: bool,

    /// Skip platform checks
    #[arg(long, conflicts_with = "platforms_only")]
    domains_only: bool,

    /// Skip domain checks
    #[arg(long)]
    platforms_only: bool,

    /// Comma-separated list of specific TLDs to check (e.g., dev,ai,com,net,org,io)
    #[arg(long, value_delimiter = ',')]
    tlds: Option<Vec<String>>,

    /// Print the whole response as one JSON document
    #[arg(long, conflicts_with = "ndjson")]
    json: bool,

    /// Output results as NDJSON stream (one JSON object per line, in completion order)
    #[arg(long, short = 'j')]
    ndjson: bool,

    /// Per-probe timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,

    /// List supported platforms and exit
    #[arg(long)]
    list_platforms: bool,

    /// Print the default config to stdout and exit
    #[arg(long)]
    print_default_config: bool,

    /// Write the default config to the config path and exit
    #[arg(long)]
    write_default_config: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum OutputMode {
    Table,
    Json,
    Ndjson,
}

impl OutputMode {
    fn from_args(args: &Args) -> Self {
        if args.ndjson {
            OutputMode::Ndjson
        } else if args.json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// What a full run covers.
#[derive(Debug)]
struct Plan {
    /// The query as typed, used for platform lookups.
    name: String,
    /// Base label for domain candidates, with a recognised TLD split off.
    domain_name: String,
    tlds: Vec<String>,
    platforms: Vec<Platform>,
    variations: bool,
}

impl Plan {
    /// Splits `foo.io` into `foo` + `io` for the domain half only, and only when `io` is
    /// one of the TLDs being checked. Platform lookups keep the full query.
    fn from_query(
        query: &str,
        tlds: Vec<String>,
        keep_tld_order: bool,
        platforms: Vec<Platform>,
        variations: bool,
    ) -> Self {
        let (domain_name, tlds) = match parse_domain_query(query) {
            (base, Some(tld)) if tlds.iter().any(|t| t.eq_ignore_ascii_case(&tld)) => {
                let tlds = if keep_tld_order { tlds } else { prioritize_tld(tlds, &tld) };
                (base, tlds)
            }
            _ => (query.to_string(), tlds),
        };

        Self {
            name: query.to_string(),
            domain_name,
            tlds,
            platforms,
            variations,
        }
    }

    fn domain_descriptors(&self) -> Vec<ProbeDescriptor> {
        if self.variations {
            grouped_domain_candidates(&self.domain_name, &self.tlds)
                .into_iter()
                .flatten()
                .collect()
        } else {
            domain_candidates(&self.domain_name, &self.tlds)
        }
    }

    fn descriptors(&self) -> Vec<ProbeDescriptor> {
        let mut descriptors = self.domain_descriptors();
        descriptors.extend(platform_candidates(&self.name, &self.platforms));
        descriptors
    }
}

fn list_platforms() {
    for platform in Platform::ALL {
        println!(
            "{:<24} {:<12} {:?}",
            platform.id(),
            platform.slug(),
            platform.strategy()
        );
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_default_config {
        println!("{}", get_default_config_toml());
        return Ok(());
    }

    if args.write_default_config {
        if let Some(path) = config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, get_default_config_toml())?;
            println!("Default config written to: {}", path.display());
        } else {
            eprintln!("Error: Could not determine config path");
            std::process::exit(1);
        }
        return Ok(());
    }

    if args.list_platforms {
        list_platforms();
        return Ok(());
    }

    logger::init_logger(args.verbose);
    let config = load_config();

    let Some(query) = args.query.as_deref() else {
        eprintln!("Error: a name to check is required");
        std::process::exit(1);
    };

    let tlds = apply_config_to_tlds(args.tlds.clone().unwrap_or_else(default_tlds), &config);
    let plan = Plan::from_query(
        query,
        if args.platforms_only { Vec::new() } else { tlds },
        args.tlds.is_some(),
        if args.domains_only {
            Vec::new()
        } else {
            enabled_platforms(&config)
        },
        args.variations,
    );

    let prober = Prober::try_with_config(probe_config(&config, args.timeout))?;
    let mode = OutputMode::from_args(&args);
    debug!(
        query = %plan.name,
        domain_name = %plan.domain_name,
        tlds = plan.tlds.len(),
        timeout = ?prober.config().timeout,
        ?mode,
        "starting"
    );

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        if let Some(tld) = &args.domain {
            let result = prober.check_domain(&plan.domain_name, tld).await;
            return emit_single(&result, mode);
        }
        if let Some(id) = &args.platform {
            let result = prober.check_platform(&plan.name, id).await;
            return emit_single(&result, mode);
        }

        match mode {
            OutputMode::Ndjson => run_ndjson(&prober, &plan).await,
            OutputMode::Json | OutputMode::Table => {
                let report = run_report(&prober, &plan, &args).await;
                if mode == OutputMode::Json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{}", render_report(&report));
                }
                Ok(())
            }
        }
    })
}

fn emit_single(result: &ProbeResult, mode: OutputMode) -> Result<(), Box<dyn std::error::Error>> {
    match mode {
        OutputMode::Table => println!("{}", render_result(result)),
        OutputMode::Json | OutputMode::Ndjson => println!("{}", serde_json::to_string(result)?),
    }
    Ok(())
}

async fn run_report(prober: &Prober, plan: &Plan, args: &Args) -> Report {
    let domains = async {
        if args.platforms_only {
            None
        } else if plan.variations {
            Some(DomainResults::Grouped(
                prober.check_domain_variations(&plan.domain_name, &plan.tlds).await,
            ))
        } else {
            Some(DomainResults::Flat(
                prober.check_domains(&plan.domain_name, &plan.tlds).await,
            ))
        }
    };
    let platforms = async {
        if args.domains_only {
            None
        } else {
            Some(prober.check_platforms_in(&plan.name, &plan.platforms).await)
        }
    };

    let (domains, platforms) = futures::join!(domains, platforms);
    Report { domains, platforms }
}

async fn run_ndjson(prober: &Prober, plan: &Plan) -> Result<(), Box<dyn std::error::Error>> {
    let mut stream = prober.probe_stream(plan.descriptors());
    let mut stdout = io::stdout();

    while let Some((index, result)) = stream.next().await {
        let line = StreamLine {
            index,
            result: &result,
        };
        writeln!(stdout, "{}", serde_json::to_string(&line)?)?;
        stdout.flush()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tlds(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn query_with_tld_is_split() {
        assert_eq!(parse_domain_query("foo.io"), ("foo".to_string(), Some("io".to_string())));
        assert_eq!(parse_domain_query("foo"), ("foo".to_string(), None));
        assert_eq!(parse_domain_query("foo.123"), ("foo.123".to_string(), None));
        assert_eq!(parse_domain_query(".io"), (".io".to_string(), None));
    }

    #[test]
    fn extracted_tld_goes_first() {
        assert_eq!(
            prioritize_tld(tlds(&["com", "net", "io"]), "io"),
            tlds(&["io", "com", "net"])
        );
        assert_eq!(prioritize_tld(tlds(&["com"]), "interface"), tlds(&["com"]));
    }

    #[test]
    fn variation_plan_expands_every_tld() {
        let plan = Plan::from_query(
            "foo",
            tlds(&["com", "io"]),
            false,
            vec![Platform::NpmPackage],
            true,
        );
        let descriptors = plan.descriptors();
        assert_eq!(descriptors.len(), 2 * 5 + 1);
        assert_eq!(descriptors[5].label(), "https://foo.io");
        assert_eq!(descriptors[10].label(), "npm package");
    }

    #[test]
    fn dotted_package_name_reaches_platforms_unchanged() {
        let plan = Plan::from_query(
            "zope.interface",
            tlds(&["com", "io"]),
            false,
            vec![Platform::PyPiPackage],
            false,
        );

        assert_eq!(plan.name, "zope.interface");
        assert_eq!(plan.tlds, tlds(&["com", "io"]));

        let descriptors = plan.descriptors();
        let platform = descriptors.last().unwrap();
        assert_eq!(platform.target, libclaim_storm::Target::Platform(Platform::PyPiPackage));
        assert_eq!(platform.name, "zope.interface");
    }

    #[test]
    fn known_tld_suffix_only_shapes_domains() {
        let plan = Plan::from_query(
            "socket.io",
            tlds(&["com", "net", "io"]),
            false,
            vec![Platform::NpmPackage],
            false,
        );

        assert_eq!(plan.domain_name, "socket");
        assert_eq!(plan.tlds, tlds(&["io", "com", "net"]));

        let labels: Vec<String> = plan.descriptors().iter().map(ProbeDescriptor::label).collect();
        assert_eq!(
            labels,
            vec!["https://socket.io", "https://socket.com", "https://socket.net", "npm package"]
        );
        assert_eq!(plan.descriptors()[3].name, "socket.io");
    }

    #[test]
    fn user_tld_order_is_kept() {
        let plan = Plan::from_query("foo.io", tlds(&["com", "io"]), true, Vec::new(), false);
        assert_eq!(plan.domain_name, "foo");
        assert_eq!(plan.tlds, tlds(&["com", "io"]));
    }

    #[test]
    fn args_parse_single_platform_mode() {
        let args = Args::parse_from(["nq", "foo", "--platform", "crates", "--json"]);
        assert_eq!(args.platform.as_deref(), Some("crates"));
        assert_eq!(OutputMode::from_args(&args), OutputMode::Json);
    }

    #[test]
    fn args_reject_domain_and_platform_together() {
        let parsed = Args::try_parse_from(["nq", "foo", "--domain", "com", "--platform", "npm"]);
        assert!(parsed.is_err());
    }
}
