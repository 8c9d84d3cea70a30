//! 自己対局学習
//!
//! - `rules`: 外部ルールエンジン / プレイアウトとの境界トレイト
//! - `config`: 学習設定ファイル
//! - `game_log`: 対局結果ログの追記・受け取り・解析
//! - `decision`: 局面区分・候補手の扱い・ビット調整の判定表
//! - `learner`: 1局分の学習
//! - `driver`: 設定再読込・バックオフ付きの学習ループ

pub mod config;
pub mod decision;
pub mod driver;
pub mod game_log;
pub mod learner;
pub mod rules;

pub use config::{ConfigError, LearnConfig, LearnRate};
pub use decision::{Adjustment, CandidateMode, Phase};
pub use driver::{DriverOptions, DriverSummary, Transient};
pub use game_log::{GameLogError, GameRecord, GameResult, GameResultRecord};
pub use learner::{GameLearnReport, SelfPlayLearner};
pub use rules::{Playout, PlayoutOutcome, ShogiRules, StartPosition};
