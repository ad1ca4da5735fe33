//! # bqresource
//!
//! オーケストレーションのステップからBigQueryクライアントを認証付きで取得するライブラリ
//!
//! 認証情報は次の優先順位で解決されます：
//!
//! 1. 委譲された認証プロバイダ
//! 2. base64エンコードされたインラインのサービスアカウント鍵
//! 3. 実行環境のデフォルト認証情報
//!
//! 取得したクライアントは [`ClientScope`] が保持し、スコープを抜けると
//! 一時的に書き出した鍵ファイルと `GOOGLE_APPLICATION_CREDENTIALS` が後始末されます。
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: 認証情報・エラー・認証方法の優先順位（外部依存なし）
//! - **Application層**: クライアント取得設定とユースケース
//! - **Adapter層**: Google認証、一時鍵ファイル、BigQueryクライアントライブラリ、設定ファイル
//! - **Driver層**: CLI、依存性注入

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;

pub use adapter::auth::GoogleAuthProvider;
pub use adapter::bigquery::BigQueryClient;
pub use application::dto::client_config::ClientConfig;
pub use application::use_cases::acquire_client::ClientScope;
pub use domain::errors::ResourceError;

/// 本番用アダプタでBigQueryクライアントを取得
///
/// ```no_run
/// use bqresource::{acquire_bigquery_client, ClientConfig};
///
/// # async fn run() -> Result<(), bqresource::ResourceError> {
/// let config = ClientConfig::builder().project("my-project").build()?;
///
/// let client = acquire_bigquery_client(&config).await?;
/// assert_eq!(client.project_id(), Some("my-project"));
/// // スコープを抜けると解放される
/// # Ok(())
/// # }
/// ```
pub async fn acquire_bigquery_client(
    config: &ClientConfig,
) -> Result<ClientScope<BigQueryClient>, ResourceError> {
    driver::production_use_case().execute(config).await
}
