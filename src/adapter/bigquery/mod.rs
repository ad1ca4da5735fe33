//! BigQuery Adapter Modules
//!
//! BigQueryクライアントの構築

pub mod client;

pub use client::{BigQueryClient, GoogleBigQueryClientFactory};
