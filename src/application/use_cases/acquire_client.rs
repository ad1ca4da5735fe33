//! # Acquire Client Use Case
//!
//! 認証済みクライアントをスコープ付きで取得するユースケース

use std::ops::Deref;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::application::dto::client_config::ClientConfig;
use crate::domain::entities::client_binding::ClientBinding;
use crate::domain::entities::credentials::Credentials;
use crate::domain::errors::ResourceError;
use crate::domain::providers::auth_provider::AuthProviderFactory;
use crate::domain::providers::client_factory::ClientFactory;
use crate::domain::providers::credential_stager::{CredentialStager, StagedCredentials};
use crate::domain::services::credential_resolution::{CredentialStrategy, StrategyKind};

/// 取得したクライアントのスコープ
///
/// スコープを抜けると（通常終了でもエラーでも）クライアントを破棄し、
/// 一時的に書き出した鍵ファイルと環境変数を後始末する。
/// クライアントはこのスコープより長く生存できない。
pub struct ClientScope<C> {
    // フィールドは宣言順にドロップされる: クライアント → 一時鍵
    client: C,
    staged: Option<Box<dyn StagedCredentials>>,
    strategy: StrategyKind,
    credentials: Credentials,
    binding: ClientBinding,
    scope_id: String,
}

impl<C> ClientScope<C> {
    pub fn client(&self) -> &C {
        &self.client
    }

    /// このスコープで使った認証方法
    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// クライアントの構築に使った認証情報
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// 設定で要求された束縛先
    pub fn binding(&self) -> &ClientBinding {
        &self.binding
    }

    /// 一時的に書き出した鍵ファイルのパス
    pub fn staged_credentials_path(&self) -> Option<&Path> {
        self.staged.as_ref().map(|s| s.path())
    }

    pub fn scope_id(&self) -> &str {
        &self.scope_id
    }

    /// スコープを明示的に終了
    pub fn release(self) {
        drop(self);
    }
}

impl<C> Deref for ClientScope<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.client
    }
}

impl<C> Drop for ClientScope<C> {
    fn drop(&mut self) {
        debug!(
            "Releasing client scope {} ({})",
            self.scope_id, self.strategy
        );
    }
}

/// クライアント取得ユースケース
///
/// 認証情報を優先順位に従って解決し、クライアントを構築する
pub struct AcquireClientUseCase<F: ClientFactory, A: AuthProviderFactory, S: CredentialStager> {
    client_factory: Arc<F>,
    auth_factory: Arc<A>,
    stager: Arc<S>,
}

impl<F: ClientFactory, A: AuthProviderFactory, S: CredentialStager> AcquireClientUseCase<F, A, S> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `client_factory` - クライアントファクトリ
    /// * `auth_factory` - インライン鍵・デフォルト認証用のプロバイダファクトリ
    /// * `stager` - インライン鍵の一時ファイル書き出し
    pub fn new(client_factory: Arc<F>, auth_factory: Arc<A>, stager: Arc<S>) -> Self {
        Self {
            client_factory,
            auth_factory,
            stager,
        }
    }

    /// 認証方法と認証情報だけを解決（クライアントは構築しない）
    ///
    /// # Errors
    ///
    /// 認証情報を解決できない場合に [`ResourceError::AuthResolution`] を返す
    pub async fn resolve_credentials(
        &self,
        config: &ClientConfig,
    ) -> Result<(StrategyKind, Credentials), ResourceError> {
        let strategy = config.credential_strategy();
        let kind = strategy.kind();

        let credentials = match strategy {
            CredentialStrategy::Delegated(provider) => provider.credentials().await,
            CredentialStrategy::Inline(encoded) => {
                self.auth_factory.from_inline(encoded).credentials().await
            }
            CredentialStrategy::Ambient => self.auth_factory.ambient().credentials().await,
        }
        .inspect_err(|e| warn!("Credential resolution via {} failed: {}", kind, e))?;

        debug!("Resolved {} via {}", credentials.describe(), kind);
        Ok((kind, credentials))
    }

    /// クライアントを取得
    ///
    /// # Arguments
    ///
    /// * `config` - クライアント取得設定
    ///
    /// # Returns
    ///
    /// クライアントを保持するスコープ
    ///
    /// # Errors
    ///
    /// - 認証情報を解決できない場合: [`ResourceError::AuthResolution`]
    ///   （この場合クライアントは構築されない）
    /// - クライアントライブラリが設定を拒否した場合: [`ResourceError::ClientConstruction`]
    pub async fn execute(&self, config: &ClientConfig) -> Result<ClientScope<F::Client>, ResourceError> {
        let scope_id = Uuid::new_v4().to_string();
        let (strategy, credentials) = self.resolve_credentials(config).await?;

        // インライン鍵はスコープの間だけファイルとして公開する
        let staged = match (strategy, &credentials) {
            (StrategyKind::Inline, Credentials::ServiceAccount(key)) => {
                Some(self.stager.stage(key)?)
            }
            _ => None,
        };

        let binding = config.binding();
        // 構築に失敗した場合、stagedはここでドロップされ後始末される
        let client = self
            .client_factory
            .create_client(&binding, &credentials)
            .await
            .inspect_err(|e| warn!("Client construction failed: {}", e))?;

        info!(
            "Acquired BigQuery client scope {} (project: {}, location: {}, auth: {})",
            scope_id,
            binding.project_id.as_deref().unwrap_or("<default>"),
            binding.location.as_deref().unwrap_or("<default>"),
            strategy
        );

        Ok(ClientScope {
            client,
            staged,
            strategy,
            credentials,
            binding,
            scope_id,
        })
    }
}
