//! # ClientFactory Trait
//!
//! 認証済みクライアントの構築を抽象化

use async_trait::async_trait;

use crate::domain::entities::client_binding::ClientBinding;
use crate::domain::entities::credentials::Credentials;
use crate::domain::errors::ResourceError;

/// クライアントファクトリ
///
/// 本番ではBigQueryクライアントを、テストでは任意のフェイクを構築する
#[async_trait]
pub trait ClientFactory: Send + Sync {
    type Client: Send + Sync;

    /// 認証情報を使って束縛先に向けたクライアントを構築
    ///
    /// # Errors
    ///
    /// クライアントライブラリが設定を拒否した場合に
    /// [`ResourceError::ClientConstruction`] を返す
    async fn create_client(
        &self,
        binding: &ClientBinding,
        credentials: &Credentials,
    ) -> Result<Self::Client, ResourceError>;
}
