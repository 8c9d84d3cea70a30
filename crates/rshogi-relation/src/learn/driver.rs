//! 学習ループのドライバ
//!
//! 1回の反復:
//! 1. 設定ファイルを読み直す
//! 2. 対局結果ログを作業用の名前に rename する
//! 3. 全局を学習し、変更のあるテーブルを保存する
//! 4. 作業用ログを削除する
//!
//! 設定やログが無い・壊れているといった状態は `Transient` としてバックオフ後に再試行し、
//! それ以外のエラーはループを止めて呼び出し側に返す。3 の途中で止まった場合、
//! 作業用ログは `<log>.learning.failed` に退避し、次の反復で同じログを再開しない。

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::config::{ConfigError, LearnConfig};
use super::game_log;
use super::learner::{GameLearnReport, SelfPlayLearner};
use super::rules::{Playout, ShogiRules};
use crate::error::{RelationError, Result};

/// 再試行の待ち時間の既定値
pub const DEFAULT_BACKOFF: Duration = Duration::from_secs(30);

/// 再試行で回復しうる状態
#[derive(thiserror::Error, Debug)]
pub enum Transient {
    #[error("config {} not found", .0.display())]
    ConfigMissing(PathBuf),

    #[error("config rejected: {0}")]
    ConfigInvalid(String),

    #[error("no game log at {}", .0.display())]
    LogMissing(PathBuf),

    #[error("could not take game log: {0}")]
    RenameRace(String),
}

impl Transient {
    /// 学習対象が無いだけの待機状態か
    pub fn is_idle(&self) -> bool {
        matches!(self, Transient::LogMissing(_))
    }
}

impl From<ConfigError> for Transient {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Missing(path) => Transient::ConfigMissing(path),
            other => Transient::ConfigInvalid(other.to_string()),
        }
    }
}

/// ドライバの設定
#[derive(Debug, Clone)]
pub struct DriverOptions {
    pub config_path: PathBuf,
    pub log_path: PathBuf,
    pub working_log_path: PathBuf,
    /// 学習に失敗した作業用ログの退避先
    pub failed_log_path: PathBuf,
    pub backoff: Duration,
    /// 反復回数の上限（None なら無限）
    pub max_iterations: Option<u64>,
}

impl DriverOptions {
    /// 作業用ログは `<log>.learning`、退避先は `<log>.learning.failed`
    pub fn new(config_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> DriverOptions {
        let log_path = log_path.into();
        let mut working = log_path.clone().into_os_string();
        working.push(".learning");
        let mut failed = working.clone();
        failed.push(".failed");
        DriverOptions {
            config_path: config_path.into(),
            log_path,
            working_log_path: PathBuf::from(working),
            failed_log_path: PathBuf::from(failed),
            backoff: DEFAULT_BACKOFF,
            max_iterations: None,
        }
    }
}

/// ドライバの累計
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriverSummary {
    pub iterations: u64,
    pub retries: u64,
    pub games: usize,
    /// 勝者なしで読み飛ばした局数
    pub draws: usize,
    /// 指し手列を解釈できずに読み飛ばした局数
    pub rejected: usize,
    pub learned: GameLearnReport,
}

/// 1回の反復の結果
#[derive(Debug, Clone, Copy, Default)]
struct PassReport {
    games: usize,
    draws: usize,
    rejected: usize,
    learned: GameLearnReport,
}

/// 学習ループを回す
///
/// `max_iterations` に達するか致命的エラーで止まる。最後に変更のあるテーブルを保存する。
pub fn run<R, P>(learner: &mut SelfPlayLearner<'_, R, P>, options: &DriverOptions) -> Result<DriverSummary>
where
    R: ShogiRules,
    P: Playout<R::Position>,
{
    let mut summary = DriverSummary::default();
    while options.max_iterations.is_none_or(|max| summary.iterations < max) {
        summary.iterations += 1;
        match learn_pass(learner, options)? {
            Ok(pass) => {
                summary.games += pass.games;
                summary.draws += pass.draws;
                summary.rejected += pass.rejected;
                summary.learned += pass.learned;
            }
            Err(transient) => {
                summary.retries += 1;
                if transient.is_idle() {
                    log::info!("{transient}; waiting {:?}", options.backoff);
                } else {
                    log::warn!("{transient}; retrying in {:?}", options.backoff);
                }
                std::thread::sleep(options.backoff);
            }
        }
    }
    learner.store_mut().save_all()?;
    log::info!(
        "driver stopped after {} iteration(s): games={} draws={} rejected={} retries={} {}",
        summary.iterations,
        summary.games,
        summary.draws,
        summary.rejected,
        summary.retries,
        summary.learned
    );
    Ok(summary)
}

/// 外側の Result は致命的エラー、内側は再試行対象
fn learn_pass<R, P>(
    learner: &mut SelfPlayLearner<'_, R, P>,
    options: &DriverOptions,
) -> Result<std::result::Result<PassReport, Transient>>
where
    R: ShogiRules,
    P: Playout<R::Position>,
{
    let config = match LearnConfig::load(&options.config_path) {
        Ok(config) => config,
        Err(e) => return Ok(Err(e.into())),
    };

    // 前回の反復が途中で止まっていれば、作業用ログから再開する
    if options.working_log_path.exists() {
        log::info!("resuming unfinished working log {}", options.working_log_path.display());
    } else if let Err(transient) = take_log(&options.log_path, &options.working_log_path) {
        return Ok(Err(transient));
    }

    let pass = match learn_working_log(learner, &config, &options.working_log_path) {
        Ok(pass) => pass,
        Err(e) => {
            quarantine_working_log(options);
            return Err(e);
        }
    };

    remove_working_log(&options.working_log_path)?;
    Ok(Ok(pass))
}

fn learn_working_log<R, P>(
    learner: &mut SelfPlayLearner<'_, R, P>,
    config: &LearnConfig,
    working_path: &Path,
) -> Result<PassReport>
where
    R: ShogiRules,
    P: Playout<R::Position>,
{
    let mut pass = PassReport::default();
    for record in game_log::read_records(working_path)? {
        let game = match record.to_game_record() {
            Ok(game) => game,
            Err(e) => {
                log::warn!("skipping game with unreadable moves ({e}): {}", record.position_command);
                pass.rejected += 1;
                continue;
            }
        };
        if game.winner.is_none() {
            pass.draws += 1;
        }
        pass.learned += learner.learn_game(&game, config)?;
        pass.games += 1;
    }
    learner.store_mut().save_all()?;
    Ok(pass)
}

/// 退避に失敗しても元のエラーを優先する
fn quarantine_working_log(options: &DriverOptions) {
    match std::fs::rename(&options.working_log_path, &options.failed_log_path) {
        Ok(()) => log::warn!(
            "moved unlearnable working log to {}",
            options.failed_log_path.display()
        ),
        Err(e) => log::error!(
            "could not move working log {} aside: {e}",
            options.working_log_path.display()
        ),
    }
}

fn take_log(log_path: &Path, working_path: &Path) -> std::result::Result<(), Transient> {
    match game_log::take_log(log_path, working_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(Transient::LogMissing(log_path.to_path_buf()))
        }
        Err(e) => Err(Transient::RenameRace(format!(
            "{} -> {}: {e}",
            log_path.display(),
            working_path.display()
        ))),
    }
}

fn remove_working_log(path: &Path) -> Result<()> {
    std::fs::remove_file(path).map_err(|source| RelationError::WorkingLogRemoval {
        path: path.to_path_buf(),
        source,
    })
}
