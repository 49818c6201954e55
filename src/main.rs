use anyhow::{Context, Result};
use awspricing::config::{init_config, Config};
use awspricing::exit_codes::{codes, exit_code_for_anyhow};
use awspricing::report::{self, PricingReport, SortKey, StorageReport};
use awspricing::{PricingClient, ServiceKind};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "awspricing")]
#[command(
    about = "AWS on-demand pricing merged with instance specifications",
    long_about = "awspricing fetches the public AWS pricing feeds and prints per-size prices.\n\nSupports:\n  - EC2 on-demand instances\n  - RDS (MySQL) instance classes\n  - ElastiCache (Redis) node types\n  - gp2 and provisioned IOPS storage prices\n\nRDS and ElastiCache results are enriched with vCPU, memory and network\ndata from the local specification tables."
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Args)]
struct QueryArgs {
    /// Region identifier as it appears in the feed (defaults to config)
    #[arg(short, long)]
    region: Option<String>,

    /// Row order for text output
    #[arg(long, value_enum, default_value_t = SortKey::Name)]
    sort: SortKey,
}

#[derive(Subcommand)]
enum Commands {
    /// EC2 on-demand instance pricing
    Ec2(QueryArgs),
    /// RDS (MySQL) instance pricing
    Rds(QueryArgs),
    /// ElastiCache (Redis) node pricing
    Elasticache(QueryArgs),
    /// gp2 and provisioned IOPS storage pricing
    Storage {
        /// Region identifier as it appears in the feed (defaults to config)
        #[arg(short, long)]
        region: Option<String>,
    },
    /// Write a default configuration file
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = ".awspricing.toml")]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Quiet by default; RUST_LOG wins when set
    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::from(codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(exit_code_for_anyhow(&err) as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Init { output } = &cli.command {
        init_config(output)
            .with_context(|| format!("Failed to write config: {}", output.display()))?;
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    let client = PricingClient::from_config(&config)?;

    match cli.command {
        Commands::Ec2(args) => show_instances(&client, ServiceKind::Compute, args, &config, cli.output),
        Commands::Rds(args) => {
            show_instances(&client, ServiceKind::RelationalDatabase, args, &config, cli.output)
        }
        Commands::Elasticache(args) => {
            show_instances(&client, ServiceKind::InMemoryCache, args, &config, cli.output)
        }
        Commands::Storage { region } => {
            let region = region.unwrap_or_else(|| config.default_region.clone());
            show_storage(&client, &region, cli.output)
        }
        Commands::Init { .. } => Ok(()),
    }
}

fn show_instances<F, S>(
    client: &PricingClient<F, S>,
    service: ServiceKind,
    args: QueryArgs,
    config: &Config,
    output: OutputFormat,
) -> Result<()>
where
    F: awspricing::fetch::FeedFetcher,
    S: awspricing::spec_table::SpecLoader,
{
    let region = args.region.unwrap_or_else(|| config.default_region.clone());
    let instance_types = client
        .instance_pricing(service, &region)
        .with_context(|| format!("Failed to get {} pricing for {}", service, region))?;

    match output {
        OutputFormat::Json => {
            let report = PricingReport::new(service, &region, instance_types);
            println!("{}", report.to_json()?);
        }
        OutputFormat::Text => {
            if instance_types.is_empty() {
                println!("No {} pricing found for region {}", service, region);
            } else {
                println!("{}", report::instance_table(&instance_types, args.sort));
                println!("{} sizes in {}", instance_types.len(), region);
            }
        }
    }
    Ok(())
}

fn show_storage<F, S>(client: &PricingClient<F, S>, region: &str, output: OutputFormat) -> Result<()>
where
    F: awspricing::fetch::FeedFetcher,
    S: awspricing::spec_table::SpecLoader,
{
    let storage = StorageReport {
        region: region.to_string(),
        fetched_at: Utc::now(),
        ec2_gp2_per_gb_month: client
            .ec2_gp2_storage_price(region)
            .context("Failed to get EC2 gp2 pricing")?,
        rds_gp2_per_gb_month: client
            .rds_gp2_storage_price(region)
            .context("Failed to get RDS gp2 pricing")?,
        rds_piops: client
            .rds_piops_pricing(region)
            .context("Failed to get RDS PIOPS pricing")?,
    };

    match output {
        OutputFormat::Json => println!("{}", storage.to_json()?),
        OutputFormat::Text => println!("{}", report::storage_table(&storage)),
    }
    Ok(())
}
