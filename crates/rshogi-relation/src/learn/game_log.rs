//! 対局結果ログ
//!
//! 自己対局エンジンが1局ごとに1行追記し、学習側はログ全体を作業用の名前に
//! rename してから読む。行の形式:
//!
//! ```text
//! {b|w} {result} {reason} position startpos moves 7g7f 3c3d ...
//! ```
//!
//! `result` と `reason` の空白文字は `_` に置き換えて1トークンにし、空なら `unknown` を書く。
//! `position` コマンド内の空白の並びは1個の空白にまとめる。

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

use super::rules::StartPosition;
use crate::types::{Color, Move};

/// ログファイルの上限サイズ（これを超える追記は捨てる）
pub const DEFAULT_LOG_CEILING: u64 = 256 * 1024 * 1024;

/// ログ行の解析エラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameLogError {
    #[error("missing {0} field")]
    MissingField(&'static str),

    #[error("invalid side '{0}' (expected 'b' or 'w')")]
    InvalidSide(String),

    #[error("invalid position command: {0}")]
    InvalidPosition(String),

    #[error("invalid move '{0}'")]
    InvalidMove(String),
}

/// `result_turn` 側から見た対局結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameResult {
    Win,
    Lose,
    Draw,
    Other(String),
}

impl GameResult {
    pub fn parse(token: &str) -> GameResult {
        match token {
            "win" => GameResult::Win,
            "lose" => GameResult::Lose,
            "draw" => GameResult::Draw,
            other => GameResult::Other(other.to_string()),
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::Win => f.write_str("win"),
            GameResult::Lose => f.write_str("lose"),
            GameResult::Draw => f.write_str("draw"),
            GameResult::Other(text) => f.write_str(&token(text)),
        }
    }
}

/// ログの1行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResultRecord {
    pub result_turn: Color,
    pub result: GameResult,
    pub reason: String,
    pub position_command: String,
}

impl GameResultRecord {
    /// 改行付きのログ行
    pub fn to_line(&self) -> String {
        format!(
            "{} {} {} {}\n",
            self.result_turn.to_usi_char(),
            self.result,
            token(&self.reason),
            self.position_command.split_whitespace().collect::<Vec<_>>().join(" ")
        )
    }

    pub fn parse_line(line: &str) -> Result<GameResultRecord, GameLogError> {
        let mut tokens = line.split_whitespace();
        let turn = tokens.next().ok_or(GameLogError::MissingField("result turn"))?;
        let mut chars = turn.chars();
        let result_turn = match (chars.next(), chars.next()) {
            (Some(c), None) => Color::from_usi_char(c),
            _ => None,
        }
        .ok_or_else(|| GameLogError::InvalidSide(turn.to_string()))?;
        let result = GameResult::parse(tokens.next().ok_or(GameLogError::MissingField("result"))?);
        let reason = tokens.next().ok_or(GameLogError::MissingField("reason"))?.to_string();
        let position_command = tokens.collect::<Vec<_>>().join(" ");
        if position_command.is_empty() {
            return Err(GameLogError::MissingField("position command"));
        }
        Ok(GameResultRecord {
            result_turn,
            result,
            reason,
            position_command,
        })
    }

    /// 勝者（引き分け・不明な結果は None）
    pub fn winner(&self) -> Option<Color> {
        match self.result {
            GameResult::Win => Some(self.result_turn),
            GameResult::Lose => Some(!self.result_turn),
            GameResult::Draw | GameResult::Other(_) => None,
        }
    }

    pub fn to_game_record(&self) -> Result<GameRecord, GameLogError> {
        let (start, moves) = parse_position_command(&self.position_command)?;
        Ok(GameRecord {
            start,
            moves,
            winner: self.winner(),
            reason: self.reason.clone(),
        })
    }
}

/// 自由記述を1トークンにする
fn token(text: &str) -> String {
    if text.trim().is_empty() {
        return "unknown".to_string();
    }
    text.chars().map(|c| if c.is_whitespace() { '_' } else { c }).collect()
}

/// 学習に使う形に解析済みの対局
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRecord {
    pub start: StartPosition,
    pub moves: Vec<Move>,
    pub winner: Option<Color>,
    pub reason: String,
}

/// USI の `position` コマンドを初期局面と指し手列に分解する
pub fn parse_position_command(line: &str) -> Result<(StartPosition, Vec<Move>), GameLogError> {
    let mut tokens = line.split_whitespace().peekable();
    if tokens.peek().is_some_and(|tok| *tok == "position") {
        tokens.next();
    }
    let start = match tokens.next() {
        Some("startpos") => StartPosition::Startpos,
        Some("sfen") => {
            let mut sfen_tokens = Vec::new();
            while let Some(token) = tokens.next_if(|tok| *tok != "moves") {
                sfen_tokens.push(token);
            }
            if sfen_tokens.is_empty() {
                return Err(GameLogError::InvalidPosition("missing SFEN payload".to_string()));
            }
            StartPosition::Sfen(sfen_tokens.join(" "))
        }
        Some(other) => {
            return Err(GameLogError::InvalidPosition(format!(
                "expected 'startpos' or 'sfen', got '{other}'"
            )));
        }
        None => return Err(GameLogError::InvalidPosition("empty command".to_string())),
    };
    let moves = parse_moves(tokens)?;
    Ok((start, moves))
}

fn parse_moves<'a, I>(iter: I) -> Result<Vec<Move>, GameLogError>
where
    I: Iterator<Item = &'a str>,
{
    let mut iter = iter.peekable();
    match iter.peek() {
        Some(&"moves") => {
            iter.next();
            iter.map(|mv| Move::from_usi(mv).ok_or_else(|| GameLogError::InvalidMove(mv.to_string())))
                .collect()
        }
        Some(other) => Err(GameLogError::InvalidPosition(format!(
            "expected 'moves' before move list, got '{other}'"
        ))),
        None => Ok(Vec::new()),
    }
}

/// 1局分を追記する（エンジン側）
///
/// 追記後のサイズが `ceiling` を超える場合は書かずに `Ok(false)` を返す。
pub fn append_result(path: &Path, record: &GameResultRecord, ceiling: u64) -> io::Result<bool> {
    let line = record.to_line();
    let current = match fs::metadata(path) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
        Err(e) => return Err(e),
    };
    if current + line.len() as u64 > ceiling {
        log::warn!(
            "game log {} is {current} bytes (ceiling {ceiling}); dropping result",
            path.display()
        );
        return Ok(false);
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(line.as_bytes())?;
    Ok(true)
}

/// ログを作業用の名前に移す（学習側）
pub fn take_log(log_path: &Path, working_path: &Path) -> io::Result<()> {
    fs::rename(log_path, working_path)
}

/// ログを読み、解析できない行は警告して読み飛ばす
///
/// UTF-8 として読めない行も1行単位で読み飛ばす。
pub fn read_records(path: &Path) -> io::Result<Vec<GameResultRecord>> {
    let bytes = fs::read(path)?;
    let mut records = Vec::new();
    for (line_no, raw) in bytes.split(|&b| b == b'\n').enumerate() {
        let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
        let line = match std::str::from_utf8(raw) {
            Ok(line) => line,
            Err(e) => {
                log::warn!("{}:{}: skipping undecodable record: {e}", path.display(), line_no + 1);
                continue;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        match GameResultRecord::parse_line(line) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("{}:{}: skipping malformed record: {e}", path.display(), line_no + 1),
        }
    }
    Ok(records)
}
