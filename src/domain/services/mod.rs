//! # Domain Services
//!
//! ビジネスルール

pub mod credential_resolution;
