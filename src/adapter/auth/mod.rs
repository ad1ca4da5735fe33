//! Authentication Module
//!
//! GCP認証関連の機能

pub mod google_auth;
pub mod staged_credentials;

pub use google_auth::{GoogleAuthProvider, GoogleAuthProviderFactory};
pub use staged_credentials::{
    ambient_credentials_env, AmbientCredentialsEnv, TempFileCredentialStager,
};
