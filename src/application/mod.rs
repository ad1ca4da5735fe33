//! # Application Layer
//!
//! アプリケーション固有のビジネスフロー（ユースケース）
//!
//! ## 特徴
//!
//! - Domain層の型とサービスを組み合わせてクライアント取得を実現
//! - Provider traitに依存（実装には依存しない）
//! - クライアントライブラリの詳細は知らない
//!
//! ## 構成要素
//!
//! - **dto**: クライアント取得設定
//! - **use_cases**: ユースケースとスコープガード

pub mod dto;
pub mod use_cases;
