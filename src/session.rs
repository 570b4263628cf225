// ============================================
// src/session.rs
// 練習セッションの状態と、それを変更する唯一の操作群
// ============================================

use std::fmt;

use clap::ValueEnum;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::katakana::{CharacterEntry, Dataset, Difficulty};

// --------------------------------------------------
// 乱数
// --------------------------------------------------

/// `[0, bound)` の一様な整数を返す乱数源
pub trait RandomSource {
    fn below(&mut self, bound: usize) -> usize;
}

/// 実行時に使う乱数源 (`StdRng`)
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// シード指定があれば再現可能な乱数列にする
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { rng }
    }
}

impl RandomSource for StdRandom {
    fn below(&mut self, bound: usize) -> usize {
        self.rng.random_range(0..bound)
    }
}

/// 出題範囲から1文字を無作為に選ぶ (直前と同じ文字も出る)
pub fn pick_random<'a>(
    dataset: &'a Dataset,
    difficulty: Difficulty,
    rng: &mut impl RandomSource,
) -> &'a CharacterEntry {
    let subset = dataset.active_subset(difficulty);
    &subset[rng.below(subset.len())]
}

/// 正答率 (%)。四捨五入、試行0回なら0
pub fn accuracy(score: u32, attempts: u32) -> u32 {
    if attempts == 0 {
        return 0;
    }
    let (score, attempts) = (score as u64, attempts as u64);
    ((200 * score + attempts) / (2 * attempts)) as u32
}

// --------------------------------------------------
// データ構造
// --------------------------------------------------

/// 出題順
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    #[default]
    Random,
    Sequential,
}

impl Mode {
    pub fn toggle(self) -> Self {
        match self {
            Mode::Random => Mode::Sequential,
            Mode::Sequential => Mode::Random,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Random => "Random",
            Mode::Sequential => "Sequential",
        }
    }
}

/// 直前の判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Incorrect { expected: String },
    Skipped { answer: String },
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        matches!(self, Feedback::Correct)
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feedback::Correct => write!(f, "Correct! 正解！"),
            Feedback::Incorrect { expected } => write!(f, "Incorrect. The answer is: {}", expected),
            Feedback::Skipped { answer } => write!(f, "Skipped. The answer was: {}", answer),
        }
    }
}

/// `check_answer` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// 正解。`generation` は自動で次へ進む予約に使う
    Correct { generation: u64 },
    Incorrect,
}

/// Enter キーで何が起きたか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterAction {
    Advanced,
    Checked(CheckOutcome),
    Ignored,
}

/// セッション全体の状態
#[derive(Debug, Clone)]
pub struct SessionState<'a> {
    dataset: &'a Dataset,
    current: &'a CharacterEntry,
    user_input: String,
    score: u32,
    attempts: u32,
    feedback: Option<Feedback>,
    /// 不正解・スキップの後は入力不可で「次へ」だけ押せる
    answer_revealed: bool,
    mode: Mode,
    difficulty: Difficulty,
    /// advance / reset のたびに増える
    generation: u64,
}

impl<'a> SessionState<'a> {
    /// 最初のお題は表の先頭 (Basic の先頭でもある)
    pub fn new(dataset: &'a Dataset, mode: Mode, difficulty: Difficulty) -> Self {
        Self {
            dataset,
            current: dataset.first(),
            user_input: String::new(),
            score: 0,
            attempts: 0,
            feedback: None,
            answer_revealed: false,
            mode,
            difficulty,
            generation: 0,
        }
    }

    // MARK:状態の参照

    pub fn current(&self) -> &'a CharacterEntry {
        self.current
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn answer_revealed(&self) -> bool {
        self.answer_revealed
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn accuracy(&self) -> u32 {
        accuracy(self.score, self.attempts)
    }

    /// 正解した後、自動で次へ進むのを待っているか
    pub fn awaiting_advance(&self) -> bool {
        self.feedback.as_ref().is_some_and(Feedback::is_correct)
    }

    /// 「Check Answer」を押せるか
    pub fn can_check(&self) -> bool {
        !self.answer_revealed && !self.awaiting_advance() && !self.user_input.trim().is_empty()
    }

    /// 「Skip」を押せるか
    pub fn can_skip(&self) -> bool {
        !self.answer_revealed && !self.awaiting_advance()
    }

    // MARK:入力

    pub fn push_char(&mut self, c: char) {
        if !self.answer_revealed {
            self.user_input.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.answer_revealed {
            self.user_input.pop();
        }
    }

    // MARK:操作

    /// 次の文字へ進み、入力と判定をクリアする
    pub fn advance(&mut self, rng: &mut impl RandomSource) {
        self.current = match self.mode {
            Mode::Random => pick_random(self.dataset, self.difficulty, rng),
            Mode::Sequential => {
                let subset = self.dataset.active_subset(self.difficulty);
                // 範囲外 (難易度を狭めた直後など) なら先頭に戻る
                let next = subset
                    .iter()
                    .position(|entry| entry.symbol == self.current.symbol)
                    .map_or(0, |idx| (idx + 1) % subset.len());
                &subset[next]
            }
        };
        self.user_input.clear();
        self.feedback = None;
        self.answer_revealed = false;
        self.generation += 1;
        debug!(symbol = %self.current.symbol, mode = ?self.mode, "advance");
    }

    /// 入力を判定する。大文字小文字と前後の空白は無視
    pub fn check_answer(&mut self) -> CheckOutcome {
        let given = self.user_input.trim().to_lowercase();
        let expected = self.current.answer.trim().to_lowercase();
        self.attempts += 1;

        if given == expected {
            self.score += 1;
            self.feedback = Some(Feedback::Correct);
            debug!(symbol = %self.current.symbol, "correct");
            CheckOutcome::Correct {
                generation: self.generation,
            }
        } else {
            self.feedback = Some(Feedback::Incorrect {
                expected: self.current.answer.clone(),
            });
            self.answer_revealed = true;
            debug!(symbol = %self.current.symbol, given = %given, "incorrect");
            CheckOutcome::Incorrect
        }
    }

    /// スキップも1回の試行として数える (正解数は増えない)
    pub fn skip(&mut self) {
        self.attempts += 1;
        self.feedback = Some(Feedback::Skipped {
            answer: self.current.answer.clone(),
        });
        self.answer_revealed = true;
        debug!(symbol = %self.current.symbol, "skip");
    }

    /// 成績をリセットし、今の難易度から新しい文字を選ぶ
    pub fn reset(&mut self, rng: &mut impl RandomSource) {
        self.score = 0;
        self.attempts = 0;
        self.user_input.clear();
        self.feedback = None;
        self.answer_revealed = false;
        self.current = pick_random(self.dataset, self.difficulty, rng);
        self.generation += 1;
        info!(symbol = %self.current.symbol, "session reset");
    }

    /// 出題順だけ変える (次の advance から反映)
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        debug!(?mode, "mode changed");
    }

    /// 難易度だけ変える。表示中の文字は次の advance まで範囲外のこともある
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        debug!(?difficulty, "difficulty changed");
    }

    /// Enter キー: 答えを表示中なら次へ、そうでなければ判定
    pub fn on_enter(&mut self, rng: &mut impl RandomSource) -> EnterAction {
        if self.answer_revealed {
            self.advance(rng);
            EnterAction::Advanced
        } else if self.can_check() {
            EnterAction::Checked(self.check_answer())
        } else {
            EnterAction::Ignored
        }
    }
}
