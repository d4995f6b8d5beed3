use std::path::PathBuf;
use std::time::Duration;

use host_scan_rs::error::ScanError;
use host_scan_rs::types::{
    ScanRequest, DEFAULT_CONCURRENCY, DEFAULT_END_PORT, DEFAULT_START_PORT, DEFAULT_TIMEOUT,
};
use host_scan_rs::{logging, probe, report, scanner, target};

use anyhow::{bail, Result};
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

/// host-scan-rs — Fast async TCP connect port scanner for a single host.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "host-scan-rs",
    version,
    about = "Fast async TCP connect port scanner for a single host.",
    long_about = None
)]
struct Cli {
    /// The IP address or domain name to scan.
    target: String,

    /// The starting port.
    #[arg(short = 's', long = "start-port", default_value_t = DEFAULT_START_PORT,
          value_parser = clap::value_parser!(u16).range(1..))]
    start_port: u16,

    /// The ending port.
    #[arg(short = 'e', long = "end-port", default_value_t = DEFAULT_END_PORT,
          value_parser = clap::value_parser!(u16).range(1..))]
    end_port: u16,

    /// Connect timeout in seconds.
    #[arg(short = 't', long, default_value_t = DEFAULT_TIMEOUT.as_secs_f64())]
    timeout: f64,

    /// Maximum concurrent connections.
    #[arg(short = 'c', long, default_value_t = DEFAULT_CONCURRENCY)]
    concurrency: usize,

    /// Write results as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Append debug logs to this file.
    #[arg(long = "log-file", default_value = logging::DEFAULT_LOG_FILE)]
    log_file: PathBuf,

    /// Disable the progress bar.
    #[arg(long = "no-progress", default_value_t = false)]
    no_progress: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_file_logging(&cli.log_file)?;

    let timeout = match Duration::try_from_secs_f64(cli.timeout) {
        Ok(t) if !t.is_zero() => t,
        _ => bail!("Timeout must be greater than 0."),
    };
    let request = ScanRequest::new(
        cli.target.clone(),
        cli.start_port,
        cli.end_port,
        timeout,
        cli.concurrency,
    );
    target::validate(&request)?;
    let address = target::resolve_host(&request.host).await?;

    println!("\n{}\n", "Scanning...".green());

    // Ctrl-C cancels the scan.
    let cancel = CancellationToken::new();
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_ctrlc.cancel();
        }
    });

    let bar = if cli.no_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(request.total())
    };
    bar.set_style(
        ProgressStyle::with_template("Scanning ports {wide_bar:.cyan/blue} {pos}/{len} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let outcome = scanner::scan_with_prober(
        &request,
        address,
        cancel,
        probe::probe_addr,
        |event| bar.set_position(event.completed),
    )
    .await;

    match outcome {
        Ok(result) => {
            bar.finish_and_clear();
            report::print_results(&result);
            if let Some(path) = cli.output.as_deref() {
                report::write_results_json(path, &result)?;
                println!("Wrote JSON results to {}", path.display());
            }
            Ok(())
        }
        Err(ScanError::Interrupted) => {
            bar.abandon();
            report::print_interrupted();
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
