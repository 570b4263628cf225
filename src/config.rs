// ============================================
// src/config.rs
// コマンドライン引数
// ============================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::katakana::Difficulty;
use crate::session::Mode;

/// KANA WiZ - カタカナ練習
#[derive(Parser, Debug)]
#[command(name = "kanawiz")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// 出題順
    #[arg(short, long, value_enum, default_value_t = Mode::Random)]
    pub mode: Mode,

    /// 難易度 (basic = 先頭25文字)
    #[arg(short, long, value_enum, default_value_t = Difficulty::Basic)]
    pub difficulty: Difficulty,

    /// 乱数のシード (指定すると出題が再現できる)
    #[arg(long)]
    pub seed: Option<u64>,

    /// 正解後に次へ進むまでの時間 (ミリ秒)
    #[arg(long, default_value_t = 1500)]
    pub advance_delay_ms: u64,

    /// カタカナ表の JSON ファイル (省略時は組み込みの表)
    #[arg(long, value_name = "FILE")]
    pub dataset: Option<PathBuf>,

    /// ログファイル (省略時はデータディレクトリの kanawiz.log)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// debug レベルでログを出す
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}
