use std::time::Duration;

use clap::Parser;
use miette::Result;

use mds_validator::commands::{ValidateRequest, selected_endpoints, validate_command};
use mds_validator::config::{DEFAULT_REGISTRY_URL, DEFAULT_SCHEMA_BASE_URL, ValidatorConfig};
use mds_validator::provider::{Credential, Provider};
use mds_validator::validation::Reporter;

#[derive(Parser)]
#[command(
    name = "mds-validator",
    about = "Validate an MDS provider's trips and status_changes feeds against the published schemas",
    version,
    long_about = None
)]
struct Cli {
    /// Name of the provider to validate, as listed in the provider registry
    #[arg(long, env = "MDS_PROVIDER_NAME")]
    provider_name: String,

    /// Bearer token for the provider API
    #[arg(long, env = "MDS_TOKEN", hide_env_values = true)]
    token: String,

    /// Path after the registry base URL (e.g. city or version) if the provider needs one
    #[arg(long)]
    postfix: Option<String>,

    /// Validate the status_changes endpoint
    #[arg(long)]
    status_changes: bool,

    /// Validate the trips endpoint
    #[arg(long)]
    trips: bool,

    /// Location of the provider registry CSV
    #[arg(long, env = "MDS_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// Directory containing trips.json and status_changes.json
    #[arg(long, env = "MDS_SCHEMA_BASE_URL", default_value = DEFAULT_SCHEMA_BASE_URL)]
    schema_base_url: String,

    /// Request timeout in seconds (defaults to the HTTP client's own behaviour)
    #[arg(long, env = "MDS_TIMEOUT_SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Enable verbose output (use -vv for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = ValidatorConfig::new(
        &cli.registry_url,
        &cli.schema_base_url,
        cli.timeout.map(Duration::from_secs),
    )?;

    let request = ValidateRequest {
        provider: Provider::new(cli.provider_name, cli.postfix)?,
        credential: Credential::new(cli.token),
        endpoints: selected_endpoints(cli.trips, cli.status_changes),
    };

    let mut reporter = Reporter::stdout();
    validate_command(&request, &config, &mut reporter).await?;

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbose {
        0 => EnvFilter::new("mds_validator=warn"),
        1 => EnvFilter::new("mds_validator=info"),
        _ => EnvFilter::new("mds_validator=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
