//! # ClientBinding Value Object
//!
//! クライアントを束縛するプロジェクトとロケーション

/// クライアントの束縛先
///
/// `None` の項目はクライアントライブラリ・実行環境のデフォルトに委ねる
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientBinding {
    /// GCPプロジェクトID
    pub project_id: Option<String>,
    /// ジョブ・データセットのデフォルトロケーション（例: "US", "asia-northeast1"）
    pub location: Option<String>,
}

impl ClientBinding {
    pub fn new(project_id: Option<String>, location: Option<String>) -> Self {
        Self {
            project_id,
            location,
        }
    }
}
