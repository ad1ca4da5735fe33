//! # Provider Traits
//!
//! 外部システムとの境界（インターフェース定義のみ）

pub mod auth_provider;
pub mod client_factory;
pub mod credential_stager;
