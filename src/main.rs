use std::process::ExitCode;

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use chatwire::client::{RequestClient, TimestampFormat};
use chatwire::config::Config;
use chatwire::domains::record::DisplayRecord;
use chatwire::error::Result;
use chatwire::services::sampling::Sampler;
use chatwire::services::scenario::{Plan, Preset, RunReport, Scenario, StepOutcome};
use chatwire::services::transport::TcpTransport;

#[derive(Parser, Debug)]
#[command(name = "chatwire")]
#[command(about = "Drives login/users/channel/channels traffic against a REP chat service")]
struct Cli {
    #[arg(long)]
    config: Option<String>,

    #[arg(long, env = "CHATWIRE_ENDPOINT")]
    endpoint: Option<String>,

    #[arg(long, value_enum, default_value_t = Preset::Load)]
    preset: Preset,

    #[arg(long, value_enum)]
    timestamp: Option<TimestampFormat>,

    #[arg(long)]
    logins: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long = "success", help = "Status counted as success (repeatable)")]
    success: Vec<String>,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(timestamp) = self.timestamp {
            config.timestamp = timestamp;
        }
        if self.logins.is_some() {
            config.logins = self.logins;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if !self.success.is_empty() {
            config.success_statuses = self.success.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn print_step(step: &StepOutcome) {
    let phase = style(format!("[{}]", step.phase)).color256(245);
    let line = match &step.record {
        DisplayRecord::Accepted { .. } => style(step.record.to_string()).green(),
        DisplayRecord::Rejected { .. } => style(step.record.to_string()).red(),
        DisplayRecord::Listing { .. } => style(step.record.to_string()).cyan(),
        DisplayRecord::Raw { .. } => style(step.record.to_string()).yellow(),
    };
    println!("{phase} {line}");
}

fn print_summary(report: &RunReport) {
    println!(
        "{} {} calls, {} accepted, {} rejected",
        style(format!("run {}:", report.phase)).bold(),
        report.steps.len(),
        report.successes(),
        report.failures()
    );
}

async fn run(cli: &Cli) -> Result<RunReport> {
    let config = cli.resolve_config()?;
    let endpoint = config.endpoint()?;

    let mut sampler = match config.seed {
        Some(seed) => Sampler::from_seed(seed),
        None => Sampler::from_entropy(),
    };
    let plan = Plan::from_preset(cli.preset, &config, &mut sampler);

    let transport = TcpTransport::new()
        .with_connect_timeout(config.connect_timeout())
        .with_max_reply_size(config.max_reply_size);
    let client = RequestClient::connect(&transport, &endpoint, config.timestamp).await?;

    Scenario::new(config.status_policy())
        .run_with(client, &plan, print_step)
        .await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,chatwire=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(report) => {
            print_summary(&report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{} {err}", style("fatal:").red().bold());
            ExitCode::FAILURE
        }
    }
}
