//! # Credential Resolution Service
//!
//! 認証方法の優先順位を決めるドメインサービス

use std::fmt;
use std::sync::Arc;

use crate::domain::providers::auth_provider::AuthProvider;

/// 認証方法の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Delegated,
    Inline,
    Ambient,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StrategyKind::Delegated => "delegated auth provider",
            StrategyKind::Inline => "inline credentials",
            StrategyKind::Ambient => "ambient environment defaults",
        };
        f.write_str(name)
    }
}

/// 1回の取得で使う認証方法
///
/// 必ずどれか1つだけが選ばれる
pub enum CredentialStrategy<'a> {
    /// 呼び出し元が設定した認証プロバイダ
    Delegated(&'a Arc<dyn AuthProvider>),
    /// base64エンコードされたインライン鍵
    Inline(&'a str),
    /// 実行環境のデフォルト認証情報
    Ambient,
}

impl<'a> CredentialStrategy<'a> {
    /// 優先順位に従って認証方法を選択します。
    ///
    /// 1. 委譲プロバイダ
    /// 2. インライン鍵
    /// 3. 実行環境のデフォルト
    ///
    /// 委譲プロバイダがある場合、インライン鍵は参照すらしない。
    ///
    /// # 例
    ///
    /// ```
    /// use bqresource::domain::services::credential_resolution::{CredentialStrategy, StrategyKind};
    ///
    /// let strategy = CredentialStrategy::select(None, Some("eyJ0eXBlIjoi..."));
    /// assert_eq!(strategy.kind(), StrategyKind::Inline);
    ///
    /// let strategy = CredentialStrategy::select(None, None);
    /// assert_eq!(strategy.kind(), StrategyKind::Ambient);
    /// ```
    pub fn select(
        delegated: Option<&'a Arc<dyn AuthProvider>>,
        inline: Option<&'a str>,
    ) -> Self {
        if let Some(provider) = delegated {
            CredentialStrategy::Delegated(provider)
        } else if let Some(encoded) = inline {
            CredentialStrategy::Inline(encoded)
        } else {
            CredentialStrategy::Ambient
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            CredentialStrategy::Delegated(_) => StrategyKind::Delegated,
            CredentialStrategy::Inline(_) => StrategyKind::Inline,
            CredentialStrategy::Ambient => StrategyKind::Ambient,
        }
    }
}
