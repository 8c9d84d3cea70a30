//! 玉の指し手インデックス
//!
//! 各升から盤内に収まる近傍（最大8方向）だけに番号を振る。
//! 隅・端の升は近傍が少ないため、素朴な 81×8=648 に対して 544 に圧縮される。
//!
//! 番号は移動元の升の昇順、同じ移動元の中では移動先の升の昇順に振る。
//! 1一（升0）の近傍は 1二・2一・2二 の3つで、インデックス 0,1,2 になる。

use super::{NONE, describe};
use crate::error::{RelationError, Result};
use crate::types::{Move, Orientation, OrientedMove, Square};

/// 玉の移動方向（筋, 段）
const KING_DIRECTIONS: [(i8, i8); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

/// 玉の指し手 ⇔ インデックスの変換表
pub struct KingMoveIndexer {
    /// `[from * 81 + to]` -> インデックス（該当なしは `NONE`）
    forward: Vec<u16>,
    /// インデックス -> (移動元, 移動先)
    reverse: Vec<(Square, Square)>,
    /// 移動元ごとの `reverse` 上の開始位置（81 + 番兵1）
    starts: [u16; Square::NUM + 1],
}

impl KingMoveIndexer {
    /// 変換表を構築する
    pub fn new() -> KingMoveIndexer {
        let mut forward = vec![NONE; Square::NUM * Square::NUM];
        let mut reverse = Vec::new();
        let mut starts = [0u16; Square::NUM + 1];

        for from in Square::all() {
            starts[from.index()] = reverse.len() as u16;
            let mut neighbors: Vec<Square> = KING_DIRECTIONS
                .iter()
                .filter_map(|&(df, dr)| from.offset(df, dr))
                .collect();
            neighbors.sort_unstable();
            for to in neighbors {
                forward[from.index() * Square::NUM + to.index()] = reverse.len() as u16;
                reverse.push((from, to));
            }
        }
        starts[Square::NUM] = reverse.len() as u16;

        KingMoveIndexer {
            forward,
            reverse,
            starts,
        }
    }

    /// インデックス空間の大きさ
    #[inline]
    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.reverse.is_empty()
    }

    /// 移動元から到達できる升（昇順）
    pub fn neighbors(&self, from: Square) -> impl Iterator<Item = Square> + '_ {
        let begin = self.starts[from.index()] as usize;
        let end = self.starts[from.index() + 1] as usize;
        self.reverse[begin..end].iter().map(|&(_, to)| to)
    }

    /// 指し手をインデックスに変換
    pub fn encode(&self, mv: OrientedMove) -> Result<usize> {
        let normalized = mv.normalized();
        let Some(from) = normalized.from() else {
            return Err(RelationError::KingDrop {
                notation: describe(mv),
            });
        };
        let index = if normalized.is_promote() {
            NONE
        } else {
            self.forward[from.index() * Square::NUM + normalized.to().index()]
        };
        if index == NONE {
            let neighbors: Vec<String> = self.neighbors(from).map(|sq| sq.to_usi()).collect();
            return Err(RelationError::KingMoveNotFound {
                notation: describe(mv),
                source_square: from.to_usi(),
                neighbors: neighbors.join(" "),
            });
        }
        Ok(index as usize)
    }

    /// インデックスを指定の向きの指し手に変換
    pub fn decode(&self, index: usize, orientation: Orientation) -> Result<OrientedMove> {
        let &(from, to) = self.reverse.get(index).ok_or(RelationError::IndexOutOfRange {
            what: "king move",
            index,
            size: self.len(),
        })?;
        Ok(OrientedMove::from_normalized(Move::new_move(from, to, false), orientation))
    }
}

impl Default for KingMoveIndexer {
    fn default() -> Self {
        Self::new()
    }
}
