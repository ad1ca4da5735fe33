//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクト

pub mod client_binding;
pub mod credentials;
