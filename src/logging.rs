// ============================================
// src/logging.rs
// ログ出力 (画面を汚さないようファイルに書く)
// ============================================

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use tracing_subscriber::EnvFilter;

use crate::error::{KanaError, Result};

const LOG_FILE: &str = "kanawiz.log";

// MARK:ログファイルのパスを取得する関数
fn default_log_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("jp", "Fukumoto0141", "KANA_WIZ").ok_or(KanaError::LogDir)?;
    Ok(proj_dirs.data_dir().join(LOG_FILE))
}

/// 優先順位: RUST_LOG > --verbose > info
pub fn init(log_file: Option<&Path>, verbose: bool) -> Result<PathBuf> {
    let path = match log_file {
        Some(path) => path.to_path_buf(),
        None => default_log_path()?,
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| KanaError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let file = File::create(&path).map_err(|source| KanaError::Io {
        path: path.clone(),
        source,
    })?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(path)
}
