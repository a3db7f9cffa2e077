mod check;
mod config;
mod emit;
mod listing;
mod scan;

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Monitoring check that lists a host firewall's accounting counters and
/// prints them as Graphite metric lines: two per rule (packets and bytes),
/// named by the rule's number and comment label.
#[derive(Parser, Debug)]
#[command(name = "metrics-iptables", version, about)]
pub struct Cli {
    /// Location of the firewall binary
    #[arg(short, long)]
    bin: Option<PathBuf>,

    /// Type of firewall (generally iptables or iptables-nft)
    #[arg(short, long)]
    ftype: Option<String>,

    /// Scheme to prepend to metric names
    #[arg(short, long)]
    scheme: Option<String>,

    /// Config file path
    #[arg(short, long, default_value = "metrics-iptables.toml")]
    config: PathBuf,

    /// Extra logging (listing capture, per-run rule counts)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Metric lines own stdout; everything else goes to stderr.
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    let file = match config::load_file(&cli.config) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(error = %e, "invalid configuration");
            return ExitCode::from(check::CheckOutcome::Warning.exit_code());
        }
    };
    let config = config::CheckConfig::resolve(file, cli.bin, cli.ftype, cli.scheme);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = check::run_check(&config, &mut out).await;
    let _ = out.flush();

    ExitCode::from(outcome.exit_code())
}
