//! 回復不能エラー
//!
//! 境界違反・テーブル引き当て失敗・巻き戻し不整合など、呼び出し側の前提条件違反を表す。
//! リトライで回復できる状態（設定ファイルやログの欠落）は `learn::driver::Transient` で扱う。

use std::path::PathBuf;

use crate::relation::RelationKind;
use crate::types::Color;

/// 関係テーブル・学習ループの致命的エラー
#[derive(thiserror::Error, Debug)]
pub enum RelationError {
    /// 駒打ちが玉の指し手として渡された
    #[error("drop move {notation} passed to the king move index")]
    KingDrop { notation: String },

    /// 玉の指し手テーブルに存在しない（玉以外の指し手 or 壊れた入力）
    #[error("king move {notation} not found: neighbors of {source_square} are [{neighbors}]")]
    KingMoveNotFound {
        notation: String,
        source_square: String,
        neighbors: String,
    },

    /// 駒の指し手テーブルに存在しない
    #[error("piece move {notation} not found in the piece move index")]
    PieceMoveNotFound { notation: String },

    /// 単体インデックスの範囲外
    #[error("{what} index {index} out of range (size {size})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        size: usize,
    },

    /// 合成インデックスの構成要素が範囲外
    #[error("{kind} component {component}={index} out of range (size {size})")]
    ComponentOutOfRange {
        kind: RelationKind,
        component: &'static str,
        index: usize,
        size: usize,
    },

    /// 合成インデックスが範囲外
    #[error("{kind} combined index {index} out of range (size {size_a}x{size_b})")]
    CombinedOutOfRange {
        kind: RelationKind,
        index: usize,
        size_a: usize,
        size_b: usize,
    },

    /// テーブルファイルのサイズ不一致
    #[error("relation table {path} has {actual} bytes, expected {expected}")]
    TableSizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// 巻き戻した局面が記録と一致しない
    #[error("rewind mismatch at mate distance {mate_distance}: expected '{expected}', got '{actual}'")]
    RewindMismatch {
        mate_distance: usize,
        expected: String,
        actual: String,
    },

    /// 棋譜の指し手が巻き戻し局面で合法手に含まれない
    #[error("principal move {notation} is not legal at mate distance {mate_distance} ({side:?} to move)")]
    IllegalPrincipal {
        notation: String,
        mate_distance: usize,
        side: Color,
    },

    /// 作業用ログの削除に失敗（次回の rename で未読データを壊すため致命的）
    #[error("failed to remove working log {path}: {source}")]
    WorkingLogRemoval {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 検証を通らない学習設定
    #[error("invalid learn config: {0}")]
    InvalidConfig(String),

    /// 外部ルールエンジン / プレイアウトのエラー
    #[error("rules engine: {0}")]
    Rules(String),

    /// File I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for relation operations
pub type Result<T> = std::result::Result<T, RelationError>;
