//! 指し手インデックスの一覧表示
//!
//! 玉 / 駒のインデックス空間の大きさと、必要なら全エントリ（`index usi`）を出力する。

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rshogi_relation::{MoveIndexes, Orientation};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Indexer {
    King,
    Piece,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    /// 先手基準
    Native,
    /// 後手基準（盤面を180度回転）
    Reflected,
}

#[derive(Parser, Debug)]
#[command(name = "relation_index_dump")]
#[command(about = "玉 / 駒の指し手インデックスを表示する")]
struct Cli {
    /// 全エントリを出力する変換表
    #[arg(long, value_enum)]
    list: Option<Indexer>,

    /// 出力する向き
    #[arg(long, value_enum, default_value = "native")]
    orientation: Side,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let indexes = MoveIndexes::new();
    let piece = indexes.piece();

    eprintln!("king moves:  {}", indexes.king().len());
    eprintln!(
        "piece moves: {} (plain {}, promote {}, drop {})",
        piece.len(),
        piece.promote_base(),
        piece.drop_base() - piece.promote_base(),
        piece.len() - piece.drop_base()
    );

    let Some(list) = cli.list else {
        return Ok(());
    };
    let orientation = match cli.orientation {
        Side::Native => Orientation::Native,
        Side::Reflected => Orientation::Reflected,
    };
    let king = matches!(list, Indexer::King);
    for index in 0..indexes.size(king) {
        let mv = indexes.decode(index, orientation, king)?;
        println!("{index} {}", mv.mv);
    }
    Ok(())
}
