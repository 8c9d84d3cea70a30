//! 関係テーブルの統計表示
//!
//! ディレクトリ内の8枚（KK/KP/PK/PP × 先手/後手）を読み、立っているビットの数と割合を出す。
//! 存在しないテーブルは作らずに "missing" として扱う。

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use rshogi_relation::policy::format_percent;
use rshogi_relation::relation::table_file_name;
use rshogi_relation::{Color, MoveIndexes, RelationKind, RelationTable};

#[derive(Parser, Debug)]
#[command(name = "relation_stats")]
#[command(about = "関係テーブルのビット統計を表示する")]
struct Cli {
    /// テーブルのディレクトリ
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// JSON で出力する
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct TableStats {
    kind: &'static str,
    color: &'static str,
    file: String,
    bits: usize,
    present: bool,
    ones: usize,
    percent: String,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let indexes = MoveIndexes::new();

    let mut stats = Vec::with_capacity(RelationKind::NUM * Color::NUM);
    for kind in RelationKind::ALL {
        for color in Color::ALL {
            let file = table_file_name(kind, color);
            let path = cli.dir.join(&file);
            let bits = kind.bit_count(&indexes);
            let table = RelationTable::load_existing(&path, bits)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let ones = table.as_ref().map_or(0, RelationTable::count_ones);
            stats.push(TableStats {
                kind: kind.label(),
                color: color.label(),
                file,
                bits,
                present: table.is_some(),
                ones,
                percent: format_percent(ones, bits),
            });
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("{:<4} {:<6} {:>12} {:>12} {:>7}", "kind", "color", "bits", "ones", "ratio");
    for s in &stats {
        if s.present {
            println!(
                "{:<4} {:<6} {:>12} {:>12} {:>7}",
                s.kind, s.color, s.bits, s.ones, s.percent
            );
        } else {
            println!("{:<4} {:<6} {:>12} {:>12} {:>7}", s.kind, s.color, s.bits, "-", "missing");
        }
    }
    Ok(())
}
