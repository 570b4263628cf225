// ============================================
// src/main.rs (メインファイル)
// ============================================

use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use console::style;
use tracing::info;

mod auto_advance;
mod config;
mod error;
mod katakana;
mod logging;
mod session;

use auto_advance::AutoAdvance;
use config::Args;
use katakana::Dataset;
use session::{CheckOutcome, EnterAction, SessionState, StdRandom};

use crossterm::{
    ExecutableCommand,
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};

use ratatui::{
    prelude::*,
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// 入力待ちの最大時間
const IDLE_POLL: Duration = Duration::from_millis(50);

/// 終了時に表示する成績
struct Summary {
    score: u32,
    attempts: u32,
    accuracy: u32,
}

// --------------------------------------------------
// メイン関数 (TUIセットアップと実行ループ)
// --------------------------------------------------

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = logging::init(args.log_file.as_deref(), args.verbose)
        .context("failed to initialise logging")?;

    // 表が読めなければ画面を開く前に終了する
    let dataset = match &args.dataset {
        Some(path) => Dataset::from_file(path),
        None => Dataset::embedded(),
    }
    .context("failed to load katakana table")?;

    info!(
        entries = dataset.len(),
        mode = ?args.mode,
        difficulty = ?args.difficulty,
        log = %log_path.display(),
        "KANA WiZ starting"
    );

    let mut terminal = setup_terminal().context("failed to set up terminal")?;
    let result = run_app(&mut terminal, &dataset, &args);
    // エラーでも端末は必ず元に戻す
    restore_terminal().context("failed to restore terminal")?;
    let summary = result.context("event loop failed")?;

    info!(
        score = summary.score,
        attempts = summary.attempts,
        "KANA WiZ exiting"
    );
    println!(
        "{} {}  {} {}  {} {}%",
        style("Correct").green(),
        style(summary.score).green().bold(),
        style("Total").blue(),
        style(summary.attempts).blue().bold(),
        style("Accuracy").magenta(),
        style(summary.accuracy).magenta().bold(),
    );
    Ok(())
}

fn setup_terminal() -> std::io::Result<Terminal<impl Backend>> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?; // 代替スクリーンを使用
    stdout().execute(Hide)?; // カーソルを非表示
    let backend = CrosstermBackend::new(stdout());
    Terminal::new(backend)
}

fn restore_terminal() -> std::io::Result<()> {
    stdout().execute(Show)?; // カーソルを再表示
    stdout().execute(LeaveAlternateScreen)?; // 代替スクリーンを終了
    disable_raw_mode()?;
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<impl Backend>,
    dataset: &Dataset,
    args: &Args,
) -> std::io::Result<Summary> {
    let mut session = SessionState::new(dataset, args.mode, args.difficulty);
    let mut rng = StdRandom::new(args.seed);
    let mut auto_advance = AutoAdvance::new(args.advance_delay());

    loop {
        terminal.draw(|f| ui(f, &session))?;

        if event::poll(auto_advance.timeout(Instant::now(), IDLE_POLL))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == event::KeyEventKind::Press {
                    match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Enter => {
                            if let EnterAction::Checked(CheckOutcome::Correct { generation }) =
                                session.on_enter(&mut rng)
                            {
                                auto_advance.schedule(generation, Instant::now());
                            }
                        }
                        KeyCode::Tab => {
                            if session.can_skip() {
                                session.skip();
                            }
                        }
                        KeyCode::Right => session.advance(&mut rng),
                        KeyCode::F(2) => session.set_mode(session.mode().toggle()),
                        KeyCode::F(3) => session.set_difficulty(session.difficulty().toggle()),
                        KeyCode::F(5) => session.reset(&mut rng),
                        KeyCode::Backspace => session.pop_char(),
                        KeyCode::Char(c) => session.push_char(c),
                        _ => {}
                    }
                }
            }
        }

        // 正解後の自動送り (手動で進めていれば何もしない)
        auto_advance.fire(Instant::now(), &mut session, &mut rng);
    }

    Ok(Summary {
        score: session.score(),
        attempts: session.attempts(),
        accuracy: session.accuracy(),
    })
}

// --------------------------------------------------
// UI描画
// --------------------------------------------------

fn ui(f: &mut Frame, session: &SessionState) {
    let size = f.area();
    // 枠線を描画
    let block = Block::default()
        .borders(Borders::ALL)
        .title("カタカナ Practice");
    let inner_area = block.inner(size);
    f.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // [0] モード / 難易度
            Constraint::Length(1), // [1] 成績
            Constraint::Length(1), // [2] 空白
            Constraint::Length(1), // [3] カタカナ
            Constraint::Length(1), // [4] 案内
            Constraint::Length(3), // [5] 入力欄
            Constraint::Length(1), // [6] 判定
            Constraint::Min(1),    // [7] 空白
            Constraint::Length(1), // [8] キー操作
        ])
        .split(inner_area);

    // 0. 設定
    let settings = format!(
        "Mode: {}  /  Difficulty: {}",
        session.mode().label(),
        session.difficulty().label()
    );
    f.render_widget(
        Paragraph::new(settings)
            .style(Style::default().fg(Color::Gray))
            .centered(),
        chunks[0],
    );

    // 1. 成績 (正解 / 試行 / 正答率)
    let stats = Line::from(vec![
        Span::styled(
            format!("Correct: {}", session.score()),
            Style::default().fg(Color::Green),
        ),
        Span::raw("   "),
        Span::styled(
            format!("Total: {}", session.attempts()),
            Style::default().fg(Color::Blue),
        ),
        Span::raw("   "),
        Span::styled(
            format!("Accuracy: {}%", session.accuracy()),
            Style::default().fg(Color::Magenta),
        ),
    ]);
    f.render_widget(Paragraph::new(stats).centered(), chunks[1]);

    // 3. カタカナ表示
    f.render_widget(
        Paragraph::new(session.current().symbol.as_str())
            .style(Style::default().fg(Color::White).bold())
            .centered(),
        chunks[3],
    );
    f.render_widget(
        Paragraph::new("What is the romanized reading?")
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[4],
    );

    // 5. 入力欄 (答えを表示中は入力不可なので暗くする)
    let input_style = if session.answer_revealed() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::White)
    };
    let input_text = if session.user_input().is_empty() && !session.answer_revealed() {
        Span::styled("Type the romaji...", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(session.user_input(), input_style)
    };
    let input_area = centered_width(chunks[5], 30);
    f.render_widget(
        Paragraph::new(Line::from(input_text))
            .block(Block::default().borders(Borders::ALL).style(input_style))
            .centered(),
        input_area,
    );

    // 6. 判定
    if let Some(feedback) = session.feedback() {
        let color = if feedback.is_correct() {
            Color::Green
        } else {
            Color::Red
        };
        f.render_widget(
            Paragraph::new(feedback.to_string())
                .style(Style::default().fg(color).bold())
                .centered(),
            chunks[6],
        );
    }

    // 8. キー操作 (今押せるものだけ)
    let help = if session.answer_revealed() {
        "Enter: Next Character"
    } else {
        "Enter: Check Answer  Tab: Skip"
    };
    let help = format!("{help}  →: New Character  F2: Mode  F3: Difficulty  F5: Reset  Esc: Quit");
    f.render_widget(
        Paragraph::new(help)
            .style(Style::default().fg(Color::DarkGray))
            .centered(),
        chunks[8],
    );
}

/// 横幅を `width` に絞って中央寄せした領域
fn centered_width(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}
