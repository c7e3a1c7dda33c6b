use anyhow::{bail, Context};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use vistoria_core::{Dashboard, DashboardConfig, InMemoryOrganizationSource, InMemoryRecordSource};
use vistoria_model::{
    normalize_organizations, normalize_records, CategorySelector, FilterSpec, Organization,
    OrganizationSelector, RawOrganization, RawRecord, Record,
};

#[derive(Debug, Parser)]
#[command(
    name = "vistoria",
    version,
    about = "Aggregate inspection requests into dashboard views"
)]
struct Cli {
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the aggregation result for a filter as JSON
    Aggregate(AggregateArgs),
    /// Type the input files and report rows that would be rejected
    Check(InputArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON array of record rows
    #[arg(long, value_name = "FILE")]
    records: PathBuf,

    /// JSON array of organization rows
    #[arg(long, value_name = "FILE")]
    organizations: PathBuf,
}

#[derive(Debug, Args)]
struct AggregateArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Inclusive start date
    #[arg(long, value_name = "YYYY-MM-DD")]
    from: Option<NaiveDate>,

    /// Inclusive end date
    #[arg(long, value_name = "YYYY-MM-DD")]
    to: Option<NaiveDate>,

    /// `all` or an organization id
    #[arg(long, default_value = "all")]
    organization: OrganizationSelector,

    /// `all` or a category name
    #[arg(long, default_value = "all")]
    category: CategorySelector,

    /// TOML dashboard configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

impl AggregateArgs {
    fn filter(&self) -> FilterSpec {
        FilterSpec {
            start: self.from,
            end: self.to,
            organization: self.organization,
            category: self.category.clone(),
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DashboardConfig> {
    let Some(path) = path else {
        return Ok(DashboardConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Typed inputs plus how many rows were dropped
struct Inputs {
    records: Vec<Record>,
    organizations: Vec<Organization>,
    rejected_records: usize,
    rejected_organizations: usize,
}

fn load_inputs(args: &InputArgs) -> anyhow::Result<Inputs> {
    let records = normalize_records(read_json::<Vec<RawRecord>>(&args.records)?);
    let organizations =
        normalize_organizations(read_json::<Vec<RawOrganization>>(&args.organizations)?);

    tracing::info!(
        records = records.accepted.len(),
        rejected_records = records.rejected.len(),
        organizations = organizations.accepted.len(),
        rejected_organizations = organizations.rejected.len(),
        "inputs loaded"
    );

    Ok(Inputs {
        rejected_records: records.rejected.len(),
        rejected_organizations: organizations.rejected.len(),
        records: records.accepted,
        organizations: organizations.accepted,
    })
}

async fn run_aggregate(args: AggregateArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?;
    let filter = args.filter();
    let inputs = load_inputs(&args.input)?;

    let dashboard = Dashboard::new(
        InMemoryRecordSource::new(inputs.records),
        InMemoryOrganizationSource::new(inputs.organizations),
        config,
    )?;
    let snapshot = dashboard.refresh(&filter).await?;

    let out = if args.pretty {
        serde_json::to_string_pretty(snapshot.result.as_ref())?
    } else {
        serde_json::to_string(snapshot.result.as_ref())?
    };
    println!("{out}");
    Ok(())
}

fn run_check(args: &InputArgs) -> anyhow::Result<()> {
    let inputs = load_inputs(args)?;
    println!(
        "records: {} accepted, {} rejected",
        inputs.records.len(),
        inputs.rejected_records
    );
    println!(
        "organizations: {} accepted, {} rejected",
        inputs.organizations.len(),
        inputs.rejected_organizations
    );
    if inputs.rejected_records + inputs.rejected_organizations > 0 {
        bail!("input files contain malformed rows");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Command::Aggregate(args) => run_aggregate(args).await,
        Command::Check(args) => run_check(&args),
    }
}
