//! 指し手インデックス
//!
//! 関係テーブルの軸となる、指し手 ⇔ 密な整数インデックスの変換。
//! 変換表は起動時に `MoveIndexes::new()` で一度だけ構築し、参照で各所に渡す。

mod king;
mod piece;

pub use king::KingMoveIndexer;
pub use piece::PieceMoveIndexer;

use crate::types::{Orientation, OrientedMove};

/// 変換表の空きスロット
pub(crate) const NONE: u16 = u16::MAX;

/// エラーメッセージ用の指し手表記
pub(crate) fn describe(mv: OrientedMove) -> String {
    match mv.orientation {
        Orientation::Native => mv.mv.to_usi(),
        Orientation::Reflected => format!("{} (reflected: {})", mv.mv, mv.normalized()),
    }
}

/// 玉・駒の両インデックス変換表
pub struct MoveIndexes {
    king: KingMoveIndexer,
    piece: PieceMoveIndexer,
}

impl MoveIndexes {
    /// 両方の変換表を構築する
    pub fn new() -> MoveIndexes {
        let indexes = MoveIndexes {
            king: KingMoveIndexer::new(),
            piece: PieceMoveIndexer::new(),
        };
        log::debug!(
            "move indexes built: king={}, piece={}",
            indexes.king.len(),
            indexes.piece.len()
        );
        indexes
    }

    #[inline]
    pub fn king(&self) -> &KingMoveIndexer {
        &self.king
    }

    #[inline]
    pub fn piece(&self) -> &PieceMoveIndexer {
        &self.piece
    }

    /// 玉 / 駒それぞれのインデックス空間の大きさ
    #[inline]
    pub fn size(&self, king: bool) -> usize {
        if king { self.king.len() } else { self.piece.len() }
    }

    /// 玉 / 駒の区別に応じてエンコード
    #[inline]
    pub fn encode(&self, mv: OrientedMove, king: bool) -> crate::Result<usize> {
        if king { self.king.encode(mv) } else { self.piece.encode(mv) }
    }

    /// 玉 / 駒の区別に応じてデコード
    #[inline]
    pub fn decode(
        &self,
        index: usize,
        orientation: Orientation,
        king: bool,
    ) -> crate::Result<OrientedMove> {
        if king {
            self.king.decode(index, orientation)
        } else {
            self.piece.decode(index, orientation)
        }
    }
}

impl Default for MoveIndexes {
    fn default() -> Self {
        Self::new()
    }
}
