//! # rshogi-relation
//!
//! 指し手ペアの「関係ビット」テーブルと、詰み手数ベースの自己対局学習。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Color, Square, DropKind, Move, Orientation）
//! - `index`: 指し手の密なインデックス化（玉の指し手 / 駒の指し手）
//! - `relation`: ビット単位の関係テーブルと KK/KP/PK/PP ストア
//! - `policy`: 関係ビットからの方策率・ティア計算
//! - `learn`: 対局結果ログ、学習設定、自己対局学習ループ
//!
//! 盤面表現・合法手生成・プレイアウトは外部エンジンの責務で、
//! `learn::rules` のトレイト越しにのみ利用する。

pub mod error;
pub mod types;

pub mod index;
pub mod relation;

pub mod policy;

pub mod learn;

pub use error::{RelationError, Result};
pub use index::MoveIndexes;
pub use relation::{ClassifiedMove, RelationKind, RelationStore, RelationTable};
pub use types::{Color, DropKind, Move, MoveSource, Orientation, OrientedMove, Square};
