//! BigQuery Client Construction
//!
//! 解決済みの認証情報からBigQueryクライアントを構築

use std::ops::Deref;
use std::path::PathBuf;

use async_trait::async_trait;
use google_cloud_bigquery::client::google_cloud_auth::credentials::CredentialsFile;
use google_cloud_bigquery::client::{Client, ClientConfig};
use log::debug;

use crate::adapter::auth::{ambient_credentials_env, AmbientCredentialsEnv};
use crate::domain::entities::client_binding::ClientBinding;
use crate::domain::entities::credentials::Credentials;
use crate::domain::errors::ResourceError;
use crate::domain::providers::client_factory::ClientFactory;

/// プロジェクトIDのフォールバックに使う環境変数（先頭が優先）
pub const PROJECT_ENV_VARS: [&str; 2] = ["GOOGLE_CLOUD_PROJECT", "GCLOUD_PROJECT"];

/// 束縛先付きのBigQueryクライアント
///
/// クエリ・管理APIは [`Client`] へのDerefでそのまま使う
#[derive(Clone)]
pub struct BigQueryClient {
    client: Client,
    project_id: Option<String>,
    location: Option<String>,
}

impl BigQueryClient {
    pub fn new(client: Client, project_id: Option<String>, location: Option<String>) -> Self {
        Self {
            client,
            project_id,
            location,
        }
    }

    /// ジョブやデータセットの作成時に使うプロジェクトID
    pub fn project_id(&self) -> Option<&str> {
        self.project_id.as_deref()
    }

    /// ジョブ・データセット・テーブルのデフォルトロケーション
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }
}

impl Deref for BigQueryClient {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

/// プロジェクトIDを決定
///
/// 設定 → 認証情報から検出した値 → 環境変数 の順
pub fn resolve_project_id<F>(
    configured: Option<&str>,
    detected: Option<String>,
    env_lookup: F,
) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    configured
        .map(str::to_string)
        .or(detected.filter(|p| !p.is_empty()))
        .or_else(|| {
            PROJECT_ENV_VARS
                .iter()
                .find_map(|name| env_lookup(name).filter(|v| !v.is_empty()))
        })
}

/// サービスアカウント鍵をクライアントライブラリの形式へ変換
pub fn to_credentials_file(json: &str) -> Result<CredentialsFile, ResourceError> {
    serde_json::from_str(json).map_err(|e| {
        ResourceError::auth_with("service account key was rejected by the client library", e)
    })
}

/// 実行環境のデフォルト認証情報の取得方法
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmbientSource {
    /// クライアントライブラリの標準の探索に任せる
    LibraryDefault,
    /// 鍵ファイルを直接読む
    KeyFile(PathBuf),
}

/// デフォルト認証情報の取得方法を決定
///
/// 一時鍵の公開中はクライアントライブラリが環境変数経由でそれを拾ってしまうため、
/// 公開前の設定値かgcloudの既定ファイルを直接読む
pub fn ambient_source(
    env: &AmbientCredentialsEnv,
    well_known: Option<PathBuf>,
) -> Result<AmbientSource, ResourceError> {
    if *env == AmbientCredentialsEnv::Untouched {
        return Ok(AmbientSource::LibraryDefault);
    }

    let path = env.configured_path().or(well_known).ok_or_else(|| {
        ResourceError::auth(
            "no application default credentials file is available while inline credentials are staged",
        )
    })?;
    if !path.exists() {
        return Err(ResourceError::auth(format!(
            "application default credentials file is missing: {}",
            path.display()
        )));
    }
    Ok(AmbientSource::KeyFile(path))
}

/// gcloudが書き出すデフォルト認証情報ファイル（存在する場合のみ）
fn well_known_credentials_file() -> Option<PathBuf> {
    #[cfg(windows)]
    let dir = std::env::var_os("APPDATA").map(|d| PathBuf::from(d).join("gcloud"));
    #[cfg(not(windows))]
    let dir = Some(PathBuf::from(shellexpand::tilde("~/.config/gcloud").to_string()));

    dir.map(|d| d.join("application_default_credentials.json"))
        .filter(|p| p.exists())
}

async fn ambient_client_config() -> Result<(ClientConfig, Option<String>), ResourceError> {
    match ambient_source(&ambient_credentials_env(), well_known_credentials_file())? {
        AmbientSource::LibraryDefault => ClientConfig::new_with_auth().await.map_err(|e| {
            ResourceError::auth_with("failed to find application default credentials", e)
        }),
        AmbientSource::KeyFile(path) => {
            debug!("Reading application default credentials from {}", path.display());
            let file = CredentialsFile::new_from_file(path.to_string_lossy().to_string())
                .await
                .map_err(|e| {
                    ResourceError::auth_with(
                        format!("failed to read application default credentials {}", path.display()),
                        e,
                    )
                })?;
            ClientConfig::new_with_credentials(file).await.map_err(|e| {
                ResourceError::auth_with("failed to authenticate with application default credentials", e)
            })
        }
    }
}

/// Production implementation of ClientFactory
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleBigQueryClientFactory;

#[async_trait]
impl ClientFactory for GoogleBigQueryClientFactory {
    type Client = BigQueryClient;

    async fn create_client(
        &self,
        binding: &ClientBinding,
        credentials: &Credentials,
    ) -> Result<BigQueryClient, ResourceError> {
        let (config, detected_project) = match credentials {
            Credentials::ServiceAccount(key) => {
                let file = to_credentials_file(key.json())?;
                ClientConfig::new_with_credentials(file)
                    .await
                    .map_err(|e| ResourceError::auth_with("failed to authenticate with service account", e))?
            }
            Credentials::ApplicationDefault => ambient_client_config().await?,
        };

        let project_id = resolve_project_id(binding.project_id.as_deref(), detected_project, |name| {
            std::env::var(name).ok()
        });
        debug!(
            "Creating BigQuery client (project: {:?}, location: {:?})",
            project_id, binding.location
        );

        let client = Client::new(config)
            .await
            .map_err(|e| ResourceError::construction_with("BigQuery client rejected the configuration", e))?;

        Ok(BigQueryClient::new(client, project_id, binding.location.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::credentials::fixtures::service_account_json;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_configured_project_wins() {
        let project = resolve_project_id(
            Some("proj-a"),
            Some("key-project".to_string()),
            env(&[("GOOGLE_CLOUD_PROJECT", "env-project")]),
        );
        assert_eq!(project.as_deref(), Some("proj-a"));
    }

    #[test]
    fn test_detected_project_used_when_not_configured() {
        let project = resolve_project_id(
            None,
            Some("key-project".to_string()),
            env(&[("GOOGLE_CLOUD_PROJECT", "env-project")]),
        );
        assert_eq!(project.as_deref(), Some("key-project"));
    }

    #[test]
    fn test_env_project_fallback_order() {
        let project = resolve_project_id(
            None,
            None,
            env(&[
                ("GCLOUD_PROJECT", "legacy-project"),
                ("GOOGLE_CLOUD_PROJECT", "env-project"),
            ]),
        );
        assert_eq!(project.as_deref(), Some("env-project"));

        let project = resolve_project_id(None, None, env(&[("GCLOUD_PROJECT", "legacy-project")]));
        assert_eq!(project.as_deref(), Some("legacy-project"));
    }

    #[test]
    fn test_empty_values_are_skipped() {
        let project = resolve_project_id(
            None,
            Some(String::new()),
            env(&[("GOOGLE_CLOUD_PROJECT", ""), ("GCLOUD_PROJECT", "legacy")]),
        );
        assert_eq!(project.as_deref(), Some("legacy"));
    }

    #[test]
    fn test_no_project_anywhere() {
        assert_eq!(resolve_project_id(None, None, env(&[])), None);
    }

    #[test]
    fn test_to_credentials_file_accepts_service_account_key() {
        assert!(to_credentials_file(&service_account_json("proj-a")).is_ok());
    }

    #[test]
    fn test_to_credentials_file_rejects_garbage() {
        let err = to_credentials_file("[1, 2, 3]").err().unwrap();
        assert!(err.is_auth_resolution());
    }

    #[test]
    fn test_ambient_source_untouched_uses_library_default() {
        let source = ambient_source(&AmbientCredentialsEnv::Untouched, None).unwrap();
        assert_eq!(source, AmbientSource::LibraryDefault);
    }

    #[test]
    fn test_ambient_source_shadowed_reads_original_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let env = AmbientCredentialsEnv::Shadowed(Some(file.path().as_os_str().to_owned()));

        let source = ambient_source(&env, Some(PathBuf::from("/unused/adc.json"))).unwrap();
        assert_eq!(source, AmbientSource::KeyFile(file.path().to_path_buf()));
    }

    #[test]
    fn test_ambient_source_shadowed_falls_back_to_well_known_file() {
        let file = tempfile::NamedTempFile::new().unwrap();

        let source = ambient_source(
            &AmbientCredentialsEnv::Shadowed(None),
            Some(file.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(source, AmbientSource::KeyFile(file.path().to_path_buf()));
    }

    #[test]
    fn test_ambient_source_shadowed_without_file() {
        let err = ambient_source(&AmbientCredentialsEnv::Shadowed(None), None).unwrap_err();
        assert!(err.is_auth_resolution());

        let missing = AmbientCredentialsEnv::Shadowed(Some("/nonexistent/adc.json".into()));
        let err = ambient_source(&missing, None).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/adc.json"));
    }

    /// 実際のGCP認証情報が必要
    /// Run with: cargo test -- --ignored
    #[tokio::test]
    #[ignore]
    async fn test_create_client_with_application_default_credentials() {
        let binding = ClientBinding::new(None, Some("US".to_string()));
        let client = GoogleBigQueryClientFactory
            .create_client(&binding, &Credentials::ApplicationDefault)
            .await
            .expect("application default credentials should be available");

        assert_eq!(client.location(), Some("US"));
    }
}
