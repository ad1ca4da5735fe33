//! Google Authentication Provider
//!
//! サービスアカウント鍵（ファイル・base64）または実行環境のデフォルト認証情報

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::debug;

use super::staged_credentials::ambient_credentials_env;
use crate::domain::entities::credentials::{Credentials, ServiceAccountKey};
use crate::domain::errors::ResourceError;
use crate::domain::providers::auth_provider::{AuthProvider, AuthProviderFactory};

/// クライアントライブラリが参照する鍵ファイルの環境変数
pub const CREDENTIALS_ENV_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Expands tilde in path and returns the full path
pub fn expand_key_path(key_path: &str) -> String {
    shellexpand::tilde(key_path).to_string()
}

/// base64エンコードされたサービスアカウント鍵を復号
///
/// `cat key.json | base64` の出力は折り返されるため、空白文字は取り除いてから復号する
pub fn decode_service_account_info(encoded: &str) -> Result<ServiceAccountKey, ResourceError> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| ResourceError::auth_with("inline credentials are not valid base64", e))?;
    let json = String::from_utf8(bytes)
        .map_err(|e| ResourceError::auth_with("decoded credentials are not valid UTF-8", e))?;

    ServiceAccountKey::from_json(&json)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum KeySource {
    File(String),
    Info(String),
    ApplicationDefault,
}

/// Google認証プロバイダ
///
/// 委譲プロバイダとして複数のクライアント設定から共有できる
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleAuthProvider {
    source: KeySource,
}

impl GoogleAuthProvider {
    /// 鍵ファイルとbase64鍵のどちらか一方（または両方なし）から作成します。
    ///
    /// # Errors
    ///
    /// 両方が指定された場合に [`ResourceError::AuthResolution`] を返します。
    ///
    /// # 例
    ///
    /// ```
    /// use bqresource::adapter::auth::google_auth::GoogleAuthProvider;
    ///
    /// // どちらもなければ実行環境のデフォルト
    /// let provider = GoogleAuthProvider::new(None, None).unwrap();
    /// assert!(provider.is_application_default());
    ///
    /// // 両方の指定はできない
    /// let err = GoogleAuthProvider::new(
    ///     Some("~/key.json".to_string()),
    ///     Some("eyJ0eXBlIjoi".to_string()),
    /// )
    /// .unwrap_err();
    /// assert!(err.is_auth_resolution());
    /// ```
    pub fn new(
        service_account_file: Option<String>,
        service_account_info: Option<String>,
    ) -> Result<Self, ResourceError> {
        match (service_account_file, service_account_info) {
            (Some(_), Some(_)) => Err(ResourceError::auth(
                "cannot provide both service_account_file and service_account_info",
            )),
            (Some(path), None) => Ok(Self::from_service_account_file(path)),
            (None, Some(encoded)) => Ok(Self::from_service_account_info(encoded)),
            (None, None) => Ok(Self::application_default()),
        }
    }

    pub fn from_service_account_file(path: impl Into<String>) -> Self {
        Self {
            source: KeySource::File(path.into()),
        }
    }

    /// base64エンコードされた鍵から作成（復号は認証情報の要求時に行う）
    pub fn from_service_account_info(encoded: impl Into<String>) -> Self {
        Self {
            source: KeySource::Info(encoded.into()),
        }
    }

    pub fn application_default() -> Self {
        Self {
            source: KeySource::ApplicationDefault,
        }
    }

    pub fn is_application_default(&self) -> bool {
        self.source == KeySource::ApplicationDefault
    }

    async fn read_key_file(path: &str) -> Result<Credentials, ResourceError> {
        let expanded = expand_key_path(path);
        debug!("Reading service account key from {}", expanded);

        let json = tokio::fs::read_to_string(&expanded).await.map_err(|e| {
            ResourceError::auth_with(
                format!("failed to read service account key file {}", expanded),
                e,
            )
        })?;

        let key = ServiceAccountKey::from_json(&json)?.with_source_path(expanded);
        Ok(Credentials::ServiceAccount(key))
    }

    fn application_default_credentials() -> Result<Credentials, ResourceError> {
        // 他のスコープが公開中の一時鍵は見ない
        let configured = ambient_credentials_env().configured_path();

        // 存在しないファイルを指している場合はクライアントライブラリに渡す前に失敗させる
        if let Some(path) = configured {
            if !path.exists() {
                return Err(ResourceError::auth(format!(
                    "{} points to a missing file: {}",
                    CREDENTIALS_ENV_VAR,
                    path.display()
                )));
            }
        }
        Ok(Credentials::ApplicationDefault)
    }
}

impl std::fmt::Debug for GoogleAuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.source {
            KeySource::File(path) => format!("file({})", path),
            KeySource::Info(_) => "info([censored])".to_string(),
            KeySource::ApplicationDefault => "application_default".to_string(),
        };
        f.debug_struct("GoogleAuthProvider")
            .field("source", &source)
            .finish()
    }
}

#[async_trait]
impl AuthProvider for GoogleAuthProvider {
    async fn credentials(&self) -> Result<Credentials, ResourceError> {
        match &self.source {
            KeySource::File(path) => Self::read_key_file(path).await,
            KeySource::Info(encoded) => {
                decode_service_account_info(encoded).map(Credentials::ServiceAccount)
            }
            KeySource::ApplicationDefault => Self::application_default_credentials(),
        }
    }
}

/// 設定に委譲プロバイダがない場合に [`GoogleAuthProvider`] を作るファクトリ
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleAuthProviderFactory;

impl AuthProviderFactory for GoogleAuthProviderFactory {
    fn from_inline(&self, encoded: &str) -> Box<dyn AuthProvider> {
        Box::new(GoogleAuthProvider::from_service_account_info(encoded))
    }

    fn ambient(&self) -> Box<dyn AuthProvider> {
        Box::new(GoogleAuthProvider::application_default())
    }
}
