//! # Resource Errors
//!
//! クライアント取得時に発生するエラー

use std::error::Error as StdError;

use thiserror::Error;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// BigQueryクライアント取得のエラー
///
/// 認証情報の解決失敗とクライアント構築失敗の2種類のみ。
/// どちらもリトライせずに呼び出し元へそのまま伝播する。
#[derive(Debug, Error)]
pub enum ResourceError {
    /// 認証情報を解決できなかった（不正なbase64、不正な鍵、環境に認証情報がない等）
    #[error("failed to resolve credentials: {message}")]
    AuthResolution {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// クライアントライブラリが設定を拒否した
    #[error("failed to construct BigQuery client: {message}")]
    ClientConstruction {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl ResourceError {
    pub fn auth(message: impl Into<String>) -> Self {
        Self::AuthResolution {
            message: message.into(),
            source: None,
        }
    }

    pub fn auth_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::AuthResolution {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn construction(message: impl Into<String>) -> Self {
        Self::ClientConstruction {
            message: message.into(),
            source: None,
        }
    }

    pub fn construction_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::ClientConstruction {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// 認証情報の解決エラーかどうか
    pub fn is_auth_resolution(&self) -> bool {
        matches!(self, Self::AuthResolution { .. })
    }

    /// クライアント構築エラーかどうか
    pub fn is_client_construction(&self) -> bool {
        matches!(self, Self::ClientConstruction { .. })
    }
}
