use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use humansize::{format_size, DECIMAL};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use uplink::config::Config;
use uplink::fs::SftpFs;
use uplink::sync::{Replicator, SyncReport};

/// Deploy a local directory tree to a remote host over SFTP.
#[derive(Debug, Parser)]
#[command(name = "uplink", version, about)]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let start = Instant::now();

    println!("Reading configuration from {}", cli.config.display());
    let config = Config::load(&cli.config)?;
    let task = config.task()?;

    println!(
        "Connecting to {}:{} as {}",
        config.server.host, config.server.port, config.server.username
    );
    let remote = SftpFs::connect(&config.server)?;
    println!("{}", "SFTP session established".green());

    println!(
        "Uploading {} -> {}",
        task.local_root.display(),
        task.remote_root
    );
    let replicator = Replicator::new(Arc::new(remote), task);

    let upload_start = Instant::now();
    let snapshot = replicator.run().await?;
    let upload_duration = upload_start.elapsed();

    let report = SyncReport::new(snapshot, upload_duration, start.elapsed());
    print_report(&report);

    Ok(())
}

fn print_report(report: &SyncReport) {
    println!("{}", "Deployment finished".green().bold());
    println!("  files uploaded: {}", report.files_uploaded);
    println!("  directories:    {}", report.dirs_created);
    println!(
        "  transferred:    {}",
        format_size(report.total_bytes, DECIMAL)
    );
    println!("  upload time:    {:.2?}", report.upload_duration);
    println!("  total time:     {:.2?}", report.total_duration);
    if report.throughput_mbps() > 0.0 {
        println!("  throughput:     {:.2} MB/s", report.throughput_mbps());
    }
}
