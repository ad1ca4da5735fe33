//! Adapter Layer
//!
//! 外部システム（BigQueryクライアントライブラリ, ファイルシステム, 環境変数）との統合

pub mod auth;
pub mod bigquery;
pub mod config;
