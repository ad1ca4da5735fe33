//! Staged Credentials
//!
//! 復号したインライン鍵を一時ファイルに書き出し、
//! スコープの間だけ `GOOGLE_APPLICATION_CREDENTIALS` で公開する

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;
use tempfile::NamedTempFile;

use super::google_auth::CREDENTIALS_ENV_VAR;
use crate::domain::entities::credentials::ServiceAccountKey;
use crate::domain::errors::ResourceError;
use crate::domain::providers::credential_stager::{CredentialStager, StagedCredentials};

/// 公開中の一時鍵ファイルの登録簿（プロセス全体で1つ）
///
/// 環境変数は常に生存中の最新の鍵ファイルを指す。
/// 最後の1つが解放されたら元の値（または未設定）に戻す。
struct Registry {
    original: Option<OsString>,
    active: Vec<(u64, PathBuf)>,
    next_id: u64,
}

static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
    original: None,
    active: Vec::new(),
    next_id: 0,
});

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

/// ステージングを除いた `GOOGLE_APPLICATION_CREDENTIALS` の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmbientCredentialsEnv {
    /// 公開中の一時鍵ファイルはない。環境変数をそのまま参照してよい
    Untouched,
    /// 一時鍵ファイルが公開中。値は最初のステージング前のもの
    Shadowed(Option<OsString>),
}

impl AmbientCredentialsEnv {
    /// 実行環境が本来設定している鍵ファイルのパス
    pub fn configured_path(&self) -> Option<PathBuf> {
        let value = match self {
            AmbientCredentialsEnv::Untouched => std::env::var_os(CREDENTIALS_ENV_VAR),
            AmbientCredentialsEnv::Shadowed(original) => original.clone(),
        };
        value.filter(|v| !v.is_empty()).map(PathBuf::from)
    }
}

/// 実行環境のデフォルト認証情報の解決に使う環境変数の状態
///
/// 他のスコープが公開中の鍵を、デフォルト認証情報として拾わないために使う
pub fn ambient_credentials_env() -> AmbientCredentialsEnv {
    let registry = registry();
    if registry.active.is_empty() {
        AmbientCredentialsEnv::Untouched
    } else {
        AmbientCredentialsEnv::Shadowed(registry.original.clone())
    }
}

/// 一時鍵ファイル
///
/// ドロップ時に環境変数を戻し、ファイルを削除する
pub struct TempCredentialsFile {
    id: u64,
    // Drop::drop の後にドロップされ、ファイルが削除される
    file: NamedTempFile,
}

impl TempCredentialsFile {
    /// 鍵を一時ファイルに書き出して環境変数を設定
    pub fn create(key: &ServiceAccountKey) -> Result<Self, ResourceError> {
        let mut file = tempfile::Builder::new()
            .prefix("gcp-credentials-")
            .suffix(".json")
            .tempfile()
            .map_err(|e| ResourceError::auth_with("failed to create temporary credentials file", e))?;

        file.write_all(key.json().as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| ResourceError::auth_with("failed to write temporary credentials file", e))?;

        let mut registry = registry();
        if registry.active.is_empty() {
            registry.original = std::env::var_os(CREDENTIALS_ENV_VAR);
        }
        let id = registry.next_id;
        registry.next_id += 1;
        registry.active.push((id, file.path().to_path_buf()));
        std::env::set_var(CREDENTIALS_ENV_VAR, file.path());

        debug!(
            "Staged credentials for {} at {}",
            key.client_email(),
            file.path().display()
        );

        Ok(Self { id, file })
    }
}

impl StagedCredentials for TempCredentialsFile {
    fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for TempCredentialsFile {
    fn drop(&mut self) {
        let mut registry = registry();
        // 外部で書き換えられていたら、その値を尊重して触らない
        let current = std::env::var_os(CREDENTIALS_ENV_VAR);
        let owned = current.as_deref().is_some_and(|value| {
            registry
                .active
                .iter()
                .any(|(_, path)| path.as_os_str() == value)
        });
        registry.active.retain(|(id, _)| *id != self.id);

        if owned {
            match registry.active.last() {
                Some((_, newest)) => std::env::set_var(CREDENTIALS_ENV_VAR, newest),
                None => match registry.original.take() {
                    Some(original) => std::env::set_var(CREDENTIALS_ENV_VAR, original),
                    None => std::env::remove_var(CREDENTIALS_ENV_VAR),
                },
            }
        } else {
            debug!("{} was changed outside staging, leaving it", CREDENTIALS_ENV_VAR);
            if registry.active.is_empty() {
                registry.original = None;
            }
        }

        debug!("Removing staged credentials {}", self.file.path().display());
    }
}

/// 一時ファイルを使う [`CredentialStager`] 実装
#[derive(Debug, Clone, Copy, Default)]
pub struct TempFileCredentialStager;

impl CredentialStager for TempFileCredentialStager {
    fn stage(&self, key: &ServiceAccountKey) -> Result<Box<dyn StagedCredentials>, ResourceError> {
        Ok(Box::new(TempCredentialsFile::create(key)?))
    }
}
