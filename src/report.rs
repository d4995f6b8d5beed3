use crate::types::ScanResult;
use anyhow::{Context, Result};
use colored::*;
use std::fs::File;
use std::path::Path;

/// Render open ports as a fixed-width table, or a clear "nothing found" line.
pub fn render_results(result: &ScanResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", "Scan Results".magenta().bold()));

    if result.open_ports.is_empty() {
        out.push_str(&format!(
            "{}\n",
            format!("No open ports found on {}.", result.host).red().bold()
        ));
        return out;
    }

    let port_w = 5usize.max("port".len());
    let status_w = "status".len();

    out.push_str(&format!(
        "Open ports on {} ({}): {} of {} scanned\n",
        result.host.cyan(),
        result.address,
        result.open_ports.len(),
        result.total
    ));
    out.push_str(&format!(
        "{:>port_w$}  {:<status_w$}\n",
        "port",
        "status",
        port_w = port_w,
        status_w = status_w
    ));
    out.push_str(&format!(
        "{:-<port_w$}  {:-<status_w$}\n",
        "",
        "",
        port_w = port_w,
        status_w = status_w
    ));
    for port in &result.open_ports {
        out.push_str(&format!(
            "{:>port_w$}  {}\n",
            port.to_string().green().bold(),
            "open".yellow(),
            port_w = port_w
        ));
    }
    out
}

pub fn print_results(result: &ScanResult) {
    print!("\n{}", render_results(result));
}

pub fn print_interrupted() {
    println!("\n{}", "Scan interrupted by user.".red().bold());
}

pub fn write_results_json(path: &Path, result: &ScanResult) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("failed to create output file: {}", path.display()))?;
    serde_json::to_writer_pretty(file, result)
        .with_context(|| format!("failed to write JSON to {}", path.display()))?;
    Ok(())
}
