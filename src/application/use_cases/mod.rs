//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **AcquireClientUseCase**: 認証情報の解決とスコープ付きクライアント取得

pub mod acquire_client;
