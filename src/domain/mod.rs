//! # Domain Layer
//!
//! このモジュールはクライアント取得の核心的なルールと型を定義します。
//!
//! ## 特徴
//!
//! - クライアントライブラリやファイルシステムに依存しない
//! - 認証方法の優先順位は純粋なロジックとして表現
//!
//! ## 構成要素
//!
//! - **entities**: 認証情報と束縛先（Credentials, ClientBindingなど）
//! - **errors**: 2種類のエラー（AuthResolution, ClientConstruction）
//! - **providers**: 外部との境界となるtrait（インターフェース定義のみ）
//! - **services**: Domain Service（認証方法の選択）

pub mod entities;
pub mod errors;
pub mod providers;
pub mod services;
