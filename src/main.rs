//! bqresource - BigQuery client check
//!
//! 設定ファイルから認証情報を解決し、BigQueryクライアントを取得して解放する

use anyhow::Result;
use clap::Parser;

use bqresource::adapter::config::Config;
use bqresource::driver::{Args, CheckClientWorkflow};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Create workflow with injected dependencies
    let workflow = CheckClientWorkflow::new(config);

    workflow.execute(&args).await?;
    Ok(())
}
