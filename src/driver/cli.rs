//! CLI Argument Parsing
//!
//! CLIの引数解析

use clap::Parser;

/// BigQueryクライアントの認証設定を検証するCLI
#[derive(Parser, Debug, Clone)]
#[command(name = "bqresource")]
#[command(about = "Resolve GCP credentials and acquire an authenticated BigQuery client", long_about = None)]
pub struct Args {
    /// Dry run mode - resolve credentials only, don't construct a client
    #[arg(long)]
    pub dry_run: bool,

    /// Override the project from the config file
    #[arg(long)]
    pub project: Option<String>,

    /// Override the location from the config file
    #[arg(long)]
    pub location: Option<String>,

    /// Config file path
    #[arg(short, long, default_value = "./bqresource.json")]
    pub config: String,
}
