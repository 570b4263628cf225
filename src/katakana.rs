/*
 * src/katakana.rs
 * カタカナ表 (お題データ) を管理するモジュール
 */

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{KanaError, Result};

/// 組み込みのカタカナ表 (五十音順, 46文字)
const EMBEDDED_TABLE: &str = include_str!("data/katakana.json");

/// Basic で出題する先頭の文字数 (ア行〜ナ行)
pub const BASIC_COUNT: usize = 25;

/// 組み込み表の文字数
pub const FULL_COUNT: usize = 46;

/// 1文字分のお題
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CharacterEntry {
    /// 表示する文字 (例: "ア")
    #[serde(rename = "katakana")]
    pub symbol: String,
    /// 正解のローマ字 (例: "a")
    #[serde(rename = "romaji")]
    pub answer: String,
}

/// 難易度
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Difficulty {
    /// 先頭25文字だけ
    #[default]
    Basic,
    /// 全文字
    All,
}

impl Difficulty {
    pub fn toggle(self) -> Self {
        match self {
            Difficulty::Basic => Difficulty::All,
            Difficulty::All => Difficulty::Basic,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Basic => "Basic (25 chars)",
            Difficulty::All => "All Characters",
        }
    }
}

/// 起動時に一度だけ読み込むカタカナ表
#[derive(Debug, Clone)]
pub struct Dataset {
    entries: Vec<CharacterEntry>,
}

impl Dataset {
    /// 組み込みの表を読み込む
    pub fn embedded() -> Result<Self> {
        let dataset = Self::from_json("<embedded>", EMBEDDED_TABLE)?;
        if dataset.entries.len() != FULL_COUNT {
            return Err(KanaError::InvalidDataset {
                origin: "<embedded>".to_string(),
                message: format!(
                    "expected {} entries, found {}",
                    FULL_COUNT,
                    dataset.entries.len()
                ),
            });
        }
        Ok(dataset)
    }

    /// ファイルから読み込む (形式は組み込みの表と同じ)
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| KanaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&path.display().to_string(), &text)
    }

    /// JSON 文字列をパースして検証する
    pub fn from_json(origin: &str, text: &str) -> Result<Self> {
        let entries: Vec<CharacterEntry> =
            serde_json::from_str(text).map_err(|source| KanaError::DatasetParse {
                origin: origin.to_string(),
                source,
            })?;

        let invalid = |message: String| KanaError::InvalidDataset {
            origin: origin.to_string(),
            message,
        };

        // Basic の範囲が埋まらない表は受け付けない
        if entries.len() < BASIC_COUNT {
            return Err(invalid(format!(
                "needs at least {} entries, found {}",
                BASIC_COUNT,
                entries.len()
            )));
        }

        let mut seen = HashSet::new();
        for (i, entry) in entries.iter().enumerate() {
            if entry.symbol.trim().is_empty() || entry.answer.trim().is_empty() {
                return Err(invalid(format!("entry {} has a blank field", i)));
            }
            // Sequential は文字で位置を探すので重複は不可
            if !seen.insert(entry.symbol.as_str()) {
                return Err(invalid(format!("duplicate symbol '{}'", entry.symbol)));
            }
        }

        Ok(Self { entries })
    }

    /// 難易度で絞り込んだ出題範囲 (表の順序のまま)
    pub fn active_subset(&self, difficulty: Difficulty) -> &[CharacterEntry] {
        match difficulty {
            Difficulty::Basic => &self.entries[..BASIC_COUNT],
            Difficulty::All => &self.entries,
        }
    }

    pub fn first(&self) -> &CharacterEntry {
        &self.entries[0]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_table_has_canonical_order() {
        let dataset = Dataset::embedded().unwrap();
        assert_eq!(dataset.len(), FULL_COUNT);
        assert_eq!(dataset.first().symbol, "ア");
        assert_eq!(dataset.first().answer, "a");

        let all = dataset.active_subset(Difficulty::All);
        assert_eq!(all[BASIC_COUNT - 1].symbol, "ノ");
        assert_eq!(all[FULL_COUNT - 1].symbol, "ン");
        assert_eq!(all[FULL_COUNT - 1].answer, "n");
    }

    #[test]
    fn basic_is_prefix_of_all() {
        let dataset = Dataset::embedded().unwrap();
        let basic = dataset.active_subset(Difficulty::Basic);
        let all = dataset.active_subset(Difficulty::All);

        assert_eq!(basic.len(), 25);
        assert_eq!(all.len(), 46);
        assert_eq!(basic, &all[..basic.len()]);
    }

    #[test]
    fn difficulty_toggle_round_trips() {
        assert_eq!(Difficulty::Basic.toggle(), Difficulty::All);
        assert_eq!(Difficulty::All.toggle(), Difficulty::Basic);
        assert_eq!(Difficulty::default(), Difficulty::Basic);
    }

    fn table(count: usize) -> String {
        let rows: Vec<String> = (0..count)
            .map(|i| format!(r#"{{ "katakana": "k{}", "romaji": "r{}" }}"#, i, i))
            .collect();
        format!("[{}]", rows.join(","))
    }

    #[test]
    fn custom_table_is_accepted() {
        let dataset = Dataset::from_json("test", &table(30)).unwrap();
        assert_eq!(dataset.len(), 30);
        assert_eq!(dataset.active_subset(Difficulty::Basic).len(), BASIC_COUNT);
    }

    #[test]
    fn short_table_is_rejected() {
        let err = Dataset::from_json("test", &table(10)).unwrap_err();
        assert!(matches!(err, KanaError::InvalidDataset { .. }));
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = Dataset::from_json("test", "[{ \"katakana\": ").unwrap_err();
        assert!(matches!(err, KanaError::DatasetParse { .. }));
    }

    #[test]
    fn blank_and_duplicate_entries_are_rejected() {
        let mut rows: Vec<String> = (0..BASIC_COUNT)
            .map(|i| format!(r#"{{ "katakana": "k{}", "romaji": "r{}" }}"#, i, i))
            .collect();
        rows.push(r#"{ "katakana": "k0", "romaji": "x" }"#.to_string());
        let err = Dataset::from_json("dup", &format!("[{}]", rows.join(","))).unwrap_err();
        assert!(err.to_string().contains("duplicate symbol 'k0'"));

        rows.pop();
        rows.push(r#"{ "katakana": "z", "romaji": "  " }"#.to_string());
        let err = Dataset::from_json("blank", &format!("[{}]", rows.join(","))).unwrap_err();
        assert!(err.to_string().contains("blank field"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Dataset::from_file(Path::new("/nonexistent/katakana.json")).unwrap_err();
        assert!(matches!(err, KanaError::Io { .. }));
    }
}
