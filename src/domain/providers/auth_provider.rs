//! # AuthProvider Trait
//!
//! 認証情報の解決を抽象化

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::credentials::Credentials;
use crate::domain::errors::ResourceError;

/// 認証プロバイダ
///
/// 呼び出されるたびに具体的な認証情報を返す。
/// 複数のクライアント設定から共有されるため `Arc` で参照される。
#[cfg_attr(test, automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// 認証情報を解決
    ///
    /// # Errors
    ///
    /// 鍵が不正な場合や、どの方法でも認証情報を得られない場合に
    /// [`ResourceError::AuthResolution`] を返す
    async fn credentials(&self) -> Result<Credentials, ResourceError>;
}

/// 設定に委譲プロバイダがない場合に使う認証プロバイダを作るファクトリ
pub trait AuthProviderFactory: Send + Sync {
    /// base64エンコードされたインライン鍵から作成
    ///
    /// 復号は [`AuthProvider::credentials`] の呼び出し時に行う
    fn from_inline(&self, encoded: &str) -> Box<dyn AuthProvider>;

    /// 実行環境のデフォルト認証情報を使うプロバイダを作成
    fn ambient(&self) -> Box<dyn AuthProvider>;
}
