//! # CredentialStager Trait
//!
//! 復号した鍵を一時的にファイルとして公開する処理を抽象化

use std::path::Path;

use crate::domain::entities::credentials::ServiceAccountKey;
use crate::domain::errors::ResourceError;

/// 公開中の鍵
///
/// ドロップ時に一時ファイルと環境変数を後始末する
pub trait StagedCredentials: Send + Sync {
    /// 鍵を保持しているファイルのパス
    fn path(&self) -> &Path;
}

/// 鍵のステージャ
pub trait CredentialStager: Send + Sync {
    /// 鍵を一時ファイルに書き出し、スコープの間だけ公開する
    ///
    /// # Errors
    ///
    /// 書き出しに失敗した場合に [`ResourceError::AuthResolution`] を返す
    fn stage(&self, key: &ServiceAccountKey) -> Result<Box<dyn StagedCredentials>, ResourceError>;
}
