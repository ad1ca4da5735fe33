//! # Client Configuration DTO
//!
//! クライアント取得設定のData Transfer Object

use std::fmt;
use std::sync::Arc;

use crate::domain::entities::client_binding::ClientBinding;
use crate::domain::errors::ResourceError;
use crate::domain::providers::auth_provider::AuthProvider;
use crate::domain::services::credential_resolution::CredentialStrategy;

/// クライアント取得設定
///
/// 構築後は不変。オーケストレーション側の1ステップの間だけ保持される。
#[derive(Clone, Default)]
pub struct ClientConfig {
    project: Option<String>,
    location: Option<String>,
    inline_credentials: Option<String>,
    delegated_auth: Option<Arc<dyn AuthProvider>>,
}

impl ClientConfig {
    /// 設定のビルダーを返します。
    ///
    /// # 例
    ///
    /// ```
    /// use bqresource::application::dto::client_config::ClientConfig;
    ///
    /// let config = ClientConfig::builder()
    ///     .project("proj-a")
    ///     .location("US")
    ///     .build()
    ///     .unwrap();
    ///
    /// assert_eq!(config.project(), Some("proj-a"));
    /// assert_eq!(config.location(), Some("US"));
    /// assert!(config.inline_credentials().is_none());
    /// ```
    ///
    /// 空のプロジェクトIDは拒否されます：
    ///
    /// ```
    /// # use bqresource::application::dto::client_config::ClientConfig;
    /// let err = ClientConfig::builder().project("  ").build().unwrap_err();
    /// assert!(err.is_client_construction());
    /// ```
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// GCPプロジェクトID（未指定なら実行環境のデフォルト）
    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// デフォルトロケーション（未指定ならクライアントライブラリのデフォルト）
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// base64エンコードされたサービスアカウント鍵
    pub fn inline_credentials(&self) -> Option<&str> {
        self.inline_credentials.as_deref()
    }

    pub fn delegated_auth(&self) -> Option<&Arc<dyn AuthProvider>> {
        self.delegated_auth.as_ref()
    }

    /// この設定で使う認証方法
    pub fn credential_strategy(&self) -> CredentialStrategy<'_> {
        CredentialStrategy::select(self.delegated_auth(), self.inline_credentials())
    }

    pub fn binding(&self) -> ClientBinding {
        ClientBinding::new(self.project.clone(), self.location.clone())
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("project", &self.project)
            .field("location", &self.location)
            .field(
                "inline_credentials",
                &self.inline_credentials.as_ref().map(|_| "[censored]"),
            )
            .field("delegated_auth", &self.delegated_auth.is_some())
            .finish()
    }
}

/// [`ClientConfig`] のビルダー
#[derive(Default)]
pub struct ClientConfigBuilder {
    project: Option<String>,
    location: Option<String>,
    inline_credentials: Option<String>,
    delegated_auth: Option<Arc<dyn AuthProvider>>,
}

impl ClientConfigBuilder {
    pub fn project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// base64エンコードされたサービスアカウント鍵を設定
    pub fn inline_credentials(mut self, encoded: impl Into<String>) -> Self {
        self.inline_credentials = Some(encoded.into());
        self
    }

    /// 委譲する認証プロバイダを設定（インライン鍵より優先される）
    pub fn delegated_auth(mut self, provider: Arc<dyn AuthProvider>) -> Self {
        self.delegated_auth = Some(provider);
        self
    }

    /// 設定を検証して構築
    ///
    /// # Errors
    ///
    /// - プロジェクトIDまたはロケーションが空白のみ: [`ResourceError::ClientConstruction`]
    /// - 委譲プロバイダがなく、インライン鍵が空白のみ: [`ResourceError::AuthResolution`]
    pub fn build(self) -> Result<ClientConfig, ResourceError> {
        if is_blank(&self.project) {
            return Err(ResourceError::construction("project must not be empty"));
        }
        if is_blank(&self.location) {
            return Err(ResourceError::construction("location must not be empty"));
        }
        // 委譲プロバイダがあればインライン鍵は使われない
        if self.delegated_auth.is_none() && is_blank(&self.inline_credentials) {
            return Err(ResourceError::auth("inline credentials must not be empty"));
        }

        Ok(ClientConfig {
            project: self.project,
            location: self.location,
            inline_credentials: self.inline_credentials,
            delegated_auth: self.delegated_auth,
        })
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| v.trim().is_empty())
}
