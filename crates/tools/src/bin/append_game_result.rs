//! 対局結果ログへの追記（エンジン側）
//!
//! 例:
//! ```text
//! append_game_result --log results.log --turn w --result lose --reason resign \
//!     --position "position startpos moves 7g7f 3c3d 2g2f"
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;

use rshogi_relation::Color;
use rshogi_relation::learn::game_log::{self, DEFAULT_LOG_CEILING};
use rshogi_relation::learn::{GameResult, GameResultRecord};

#[derive(Parser, Debug)]
#[command(name = "append_game_result")]
#[command(about = "1局分の結果を学習用ログに追記する")]
struct Cli {
    /// 追記先のログ
    #[arg(long)]
    log: PathBuf,

    /// 結果を記録する側（b / w）
    #[arg(long)]
    turn: char,

    /// win / lose / draw またはその他の文字列
    #[arg(long)]
    result: String,

    /// 終局理由
    #[arg(long, default_value = "unknown")]
    reason: String,

    /// USI の position コマンド
    #[arg(long)]
    position: String,

    /// ログの上限サイズ（バイト）
    #[arg(long, default_value_t = DEFAULT_LOG_CEILING)]
    ceiling: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let Some(result_turn) = Color::from_usi_char(cli.turn) else {
        bail!("--turn must be 'b' or 'w', got '{}'", cli.turn);
    };
    let (_, moves) = game_log::parse_position_command(&cli.position)
        .with_context(|| format!("invalid --position '{}'", cli.position))?;

    let record = GameResultRecord {
        result_turn,
        result: GameResult::parse(&cli.result),
        reason: cli.reason,
        position_command: cli.position,
    };
    let written = game_log::append_result(&cli.log, &record, cli.ceiling)
        .with_context(|| format!("failed to append to {}", cli.log.display()))?;
    if written {
        log::info!(
            "appended {} game ({} plies) to {}",
            record.result,
            moves.len(),
            cli.log.display()
        );
    }
    Ok(())
}
