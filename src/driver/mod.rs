//! # Driver Layer (Presentation)
//!
//! CLIやその他の外部インターフェースを提供
//!
//! ## 特徴
//!
//! - Use Caseを呼び出してクライアント取得を起動
//! - 依存性注入（DI）を行い、本番用アダプタを組み立てる
//!
//! ## 構成要素
//!
//! - **cli**: CLI引数のパース
//! - **workflow**: 取得・報告・解放のオーケストレーション

pub mod cli;
pub mod workflow;

pub use cli::Args;
pub use workflow::{production_use_case, BigQueryResource, CheckClientWorkflow, ClientReport};
