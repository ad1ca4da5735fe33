//! Resource Configuration File
//!
//! JSON設定ファイルの読み込みと [`ClientConfig`] への変換

use std::fs;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapter::auth::google_auth::GoogleAuthProvider;
use crate::application::dto::client_config::ClientConfig;
use crate::domain::errors::ResourceError;

/// 委譲認証プロバイダの設定
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct GoogleAuthSection {
    pub service_account_file: Option<String>,
    pub service_account_info: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Config {
    /// GCP project the client acts on behalf of
    pub project: Option<String>,
    /// Default location for jobs / datasets / tables
    pub location: Option<String>,

    // Authentication
    /// base64エンコードされたサービスアカウント鍵
    pub gcp_credentials: Option<String>,
    /// base64鍵を保持する環境変数名（`gcp_credentials` がない場合のみ参照）
    pub gcp_credentials_env: Option<String>,
    /// 委譲認証プロバイダ
    pub google_auth: Option<GoogleAuthSection>,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;
        Ok(config)
    }

    /// インライン鍵を決定（直接指定 → 環境変数）
    fn inline_credentials(&self) -> Result<Option<String>, ResourceError> {
        if let Some(encoded) = &self.gcp_credentials {
            return Ok(Some(encoded.clone()));
        }
        match &self.gcp_credentials_env {
            Some(name) => std::env::var(name).map(Some).map_err(|e| {
                ResourceError::auth_with(
                    format!("environment variable {} for gcp_credentials is not set", name),
                    e,
                )
            }),
            None => Ok(None),
        }
    }

    /// 検証済みの [`ClientConfig`] に変換
    ///
    /// # Errors
    ///
    /// 設定値が不正な場合、または `google_auth` に鍵ファイルとbase64鍵の両方がある場合
    pub fn to_client_config(&self) -> Result<ClientConfig, ResourceError> {
        let mut builder = ClientConfig::builder();

        if let Some(project) = &self.project {
            builder = builder.project(project.clone());
        }
        if let Some(location) = &self.location {
            builder = builder.location(location.clone());
        }
        // 委譲プロバイダがある場合はインライン鍵（環境変数を含む）を参照しない
        match &self.google_auth {
            Some(section) => {
                let provider = GoogleAuthProvider::new(
                    section.service_account_file.clone(),
                    section.service_account_info.clone(),
                )?;
                builder = builder.delegated_auth(Arc::new(provider));
            }
            None => {
                if let Some(encoded) = self.inline_credentials()? {
                    builder = builder.inline_credentials(encoded);
                }
            }
        }

        builder.build()
    }
}
