//! Workflow Orchestration
//!
//! クライアント取得ワークフローのオーケストレーション

use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;

use crate::adapter::auth::{GoogleAuthProviderFactory, TempFileCredentialStager};
use crate::adapter::bigquery::GoogleBigQueryClientFactory;
use crate::adapter::config::Config;
use crate::application::use_cases::acquire_client::AcquireClientUseCase;
use crate::domain::services::credential_resolution::StrategyKind;

use super::cli::Args;

/// 本番用アダプタで組み立てたクライアント取得ユースケース
pub type BigQueryResource = AcquireClientUseCase<
    GoogleBigQueryClientFactory,
    GoogleAuthProviderFactory,
    TempFileCredentialStager,
>;

/// Create the use case with production dependencies injected
pub fn production_use_case() -> BigQueryResource {
    AcquireClientUseCase::new(
        Arc::new(GoogleBigQueryClientFactory),
        Arc::new(GoogleAuthProviderFactory),
        Arc::new(TempFileCredentialStager),
    )
}

/// 取得結果の報告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReport {
    pub strategy: StrategyKind,
    /// 認証情報の説明（秘密情報は含まない）
    pub credentials: String,
    pub project: Option<String>,
    pub location: Option<String>,
    /// インライン鍵を一時ファイルに書き出したかどうか
    pub staged_credentials: bool,
    pub client_constructed: bool,
}

/// Client Check Workflow
pub struct CheckClientWorkflow {
    config: Config,
    use_case: BigQueryResource,
}

impl CheckClientWorkflow {
    /// Create a new workflow instance with dependency injection
    pub fn new(config: Config) -> Self {
        Self {
            config,
            use_case: production_use_case(),
        }
    }

    /// Execute the check workflow
    pub async fn execute(&self, args: &Args) -> Result<ClientReport> {
        info!("Starting BigQuery client check...");
        info!("Dry run: {}", args.dry_run);

        let mut config = self.config.clone();
        if let Some(project) = &args.project {
            config.project = Some(project.clone());
        }
        if let Some(location) = &args.location {
            config.location = Some(location.clone());
        }

        let client_config = config
            .to_client_config()
            .context("Invalid client configuration")?;

        println!("✓ Using configuration:");
        println!("  Project: {}", client_config.project().unwrap_or("<default>"));
        println!("  Location: {}", client_config.location().unwrap_or("<default>"));
        println!("  Auth: {}", client_config.credential_strategy().kind());

        if args.dry_run {
            let (strategy, credentials) = self
                .use_case
                .resolve_credentials(&client_config)
                .await
                .context("Failed to resolve credentials")?;

            println!("✓ Resolved {}", credentials.describe());
            println!("✓ Dry-run mode (no client constructed)");

            return Ok(ClientReport {
                strategy,
                credentials: credentials.describe(),
                project: client_config
                    .project()
                    .or(credentials.project_id())
                    .map(str::to_string),
                location: client_config.location().map(str::to_string),
                staged_credentials: false,
                client_constructed: false,
            });
        }

        let scope = self
            .use_case
            .execute(&client_config)
            .await
            .context("Failed to acquire BigQuery client")?;

        let report = ClientReport {
            strategy: scope.strategy(),
            credentials: scope.credentials().describe(),
            project: scope.project_id().map(str::to_string),
            location: scope.location().map(str::to_string),
            staged_credentials: scope.staged_credentials_path().is_some(),
            client_constructed: true,
        };

        println!("✓ Acquired BigQuery client (scope {})", scope.scope_id());
        println!("  Project: {}", report.project.as_deref().unwrap_or("<unknown>"));
        println!("  Location: {}", report.location.as_deref().unwrap_or("<default>"));
        if report.staged_credentials {
            println!("  Credentials staged for the scope lifetime");
        }

        scope.release();
        println!("✓ Released client scope");

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::credentials::fixtures::service_account_json;
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;

    fn args(dry_run: bool) -> Args {
        Args {
            dry_run,
            project: None,
            location: None,
            config: "./bqresource.json".to_string(),
        }
    }

    #[tokio::test]
    async fn test_dry_run_with_inline_credentials() {
        let config = Config {
            location: Some("US".to_string()),
            gcp_credentials: Some(STANDARD.encode(service_account_json("proj-a"))),
            ..Default::default()
        };

        let report = CheckClientWorkflow::new(config)
            .execute(&args(true))
            .await
            .unwrap();

        assert_eq!(report.strategy, StrategyKind::Inline);
        assert_eq!(report.project.as_deref(), Some("proj-a"));
        assert_eq!(report.location.as_deref(), Some("US"));
        assert!(!report.client_constructed);
        assert!(!report.staged_credentials);
    }

    #[tokio::test]
    async fn test_dry_run_cli_overrides() {
        let config = Config {
            project: Some("from-file".to_string()),
            gcp_credentials: Some(STANDARD.encode(service_account_json("key-project"))),
            ..Default::default()
        };
        let mut args = args(true);
        args.project = Some("from-cli".to_string());
        args.location = Some("EU".to_string());

        let report = CheckClientWorkflow::new(config).execute(&args).await.unwrap();

        assert_eq!(report.project.as_deref(), Some("from-cli"));
        assert_eq!(report.location.as_deref(), Some("EU"));
    }

    #[tokio::test]
    async fn test_dry_run_invalid_credentials() {
        let config = Config {
            gcp_credentials: Some("not-base64!!".to_string()),
            ..Default::default()
        };

        let err = CheckClientWorkflow::new(config)
            .execute(&args(true))
            .await
            .unwrap_err();

        let root = err.root_cause().to_string();
        assert!(err.to_string().contains("Failed to resolve credentials"));
        assert!(!root.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_config_is_reported() {
        let config = Config {
            project: Some("   ".to_string()),
            ..Default::default()
        };

        let err = CheckClientWorkflow::new(config)
            .execute(&args(true))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Invalid client configuration"));
    }
}
