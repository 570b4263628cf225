// ============================================
// src/error.rs
// エラー型
// ============================================

use std::path::PathBuf;

/// このクレート共通の `Result`
pub type Result<T> = std::result::Result<T, KanaError>;

#[derive(Debug, thiserror::Error)]
pub enum KanaError {
    /// ファイルの読み書きに失敗
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// データセットの JSON が壊れている
    #[error("Failed to parse dataset '{origin}': {source}")]
    DatasetParse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON としては読めたが中身が不正
    #[error("Invalid dataset '{origin}': {message}")]
    InvalidDataset { origin: String, message: String },

    /// ログ出力先ディレクトリが決まらない
    #[error("Could not determine a data directory for the log file; pass --log-file")]
    LogDir,
}
