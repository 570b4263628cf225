// ============================================
// src/auto_advance.rs
// 正解後、一定時間たったら自動で次の文字へ進む予約
// ============================================

use std::time::{Duration, Instant};

use tracing::debug;

use crate::session::{RandomSource, SessionState};

/// 正解してから次へ進むまでの既定の待ち時間
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Pending {
    /// 予約した時点のセッション世代
    generation: u64,
    due: Instant,
}

/// 1回きりの自動 advance。予約後に手動で進めた場合は何もしない
#[derive(Debug)]
pub struct AutoAdvance {
    delay: Duration,
    pending: Option<Pending>,
}

impl AutoAdvance {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// 予約する (前の予約は上書き)
    pub fn schedule(&mut self, generation: u64, now: Instant) {
        self.pending = Some(Pending {
            generation,
            due: now + self.delay,
        });
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// 期限が来ていれば実行する。実際に advance したら true
    pub fn fire(
        &mut self,
        now: Instant,
        session: &mut SessionState<'_>,
        rng: &mut impl RandomSource,
    ) -> bool {
        let Some(pending) = self.pending else {
            return false;
        };
        if now < pending.due {
            return false;
        }
        self.pending = None;

        if pending.generation != session.generation() {
            debug!(
                scheduled = pending.generation,
                current = session.generation(),
                "stale auto-advance dropped"
            );
            return false;
        }
        session.advance(rng);
        true
    }

    /// 入力待ちでブロックしてよい時間
    pub fn timeout(&self, now: Instant, idle: Duration) -> Duration {
        match self.pending {
            Some(pending) => pending.due.saturating_duration_since(now).min(idle),
            None => idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::katakana::{Dataset, Difficulty};
    use crate::session::tests::FixedSequence;
    use crate::session::{CheckOutcome, Mode};

    const IDLE: Duration = Duration::from_millis(50);

    fn answer_correctly(session: &mut SessionState<'_>) -> u64 {
        for c in session.current().answer.clone().chars() {
            session.push_char(c);
        }
        match session.check_answer() {
            CheckOutcome::Correct { generation } => generation,
            CheckOutcome::Incorrect => panic!("expected a correct answer"),
        }
    }

    #[test]
    fn fires_after_delay() {
        let dataset = Dataset::embedded().unwrap();
        let mut session = SessionState::new(&dataset, Mode::Sequential, Difficulty::Basic);
        let mut rng = FixedSequence::new(vec![0]);
        let mut auto = AutoAdvance::new(DEFAULT_DELAY);
        let start = Instant::now();

        let generation = answer_correctly(&mut session);
        auto.schedule(generation, start);

        assert!(!auto.fire(start + Duration::from_millis(1499), &mut session, &mut rng));
        assert_eq!(session.current().symbol, "ア");
        assert!(auto.is_pending());

        assert!(auto.fire(start + DEFAULT_DELAY, &mut session, &mut rng));
        assert_eq!(session.current().symbol, "イ");
        assert!(session.feedback().is_none());
        assert!(!auto.is_pending());

        // 一度きり
        assert!(!auto.fire(start + DEFAULT_DELAY * 2, &mut session, &mut rng));
        assert_eq!(session.current().symbol, "イ");
    }

    #[test]
    fn manual_advance_makes_it_stale() {
        let dataset = Dataset::embedded().unwrap();
        let mut session = SessionState::new(&dataset, Mode::Sequential, Difficulty::Basic);
        let mut rng = FixedSequence::new(vec![0]);
        let mut auto = AutoAdvance::new(DEFAULT_DELAY);
        let start = Instant::now();

        let generation = answer_correctly(&mut session);
        auto.schedule(generation, start);
        session.advance(&mut rng);
        assert_eq!(session.current().symbol, "イ");

        assert!(!auto.fire(start + DEFAULT_DELAY, &mut session, &mut rng));
        assert_eq!(session.current().symbol, "イ");
        assert!(!auto.is_pending());
    }

    #[test]
    fn reset_makes_it_stale() {
        let dataset = Dataset::embedded().unwrap();
        let mut session = SessionState::new(&dataset, Mode::Random, Difficulty::Basic);
        let mut rng = FixedSequence::new(vec![2, 9]);
        let mut auto = AutoAdvance::new(DEFAULT_DELAY);
        let start = Instant::now();

        let generation = answer_correctly(&mut session);
        auto.schedule(generation, start);
        session.reset(&mut rng);
        assert_eq!(session.current().symbol, "ウ");

        assert!(!auto.fire(start + DEFAULT_DELAY, &mut session, &mut rng));
        assert_eq!(session.current().symbol, "ウ");
        assert_eq!(session.attempts(), 0);
    }

    #[test]
    fn timeout_shrinks_towards_due() {
        let mut auto = AutoAdvance::new(Duration::from_millis(30));
        let now = Instant::now();
        assert_eq!(auto.timeout(now, IDLE), IDLE);

        auto.schedule(0, now);
        assert_eq!(auto.timeout(now, IDLE), Duration::from_millis(30));
        assert_eq!(
            auto.timeout(now + Duration::from_millis(100), IDLE),
            Duration::ZERO
        );
    }
}
