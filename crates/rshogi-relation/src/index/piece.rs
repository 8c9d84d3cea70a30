//! 駒（玉以外）の指し手インデックス
//!
//! 移動元ごとに、飛車・角・（先手向きの）桂馬の利きの和集合を移動先候補とする。
//! 金・銀・香・歩の移動先はすべてこの和集合に含まれるので、駒種を区別せずに済む。
//!
//! 番号は1本のカウンタで次の順に振る:
//! 1. (移動元, 不成の移動先)
//! 2. (移動元, 成りの移動先) - 移動元か移動先が敵陣（1-3段）のもの
//! 3. (打ち駒種, 打ち先) - 飛角金銀桂香歩の順、行きどころのない段は除く
//!
//! 空間の大きさ（3813）は上の生成手順の結果であって、定数としては持たない。

use super::{NONE, describe};
use crate::error::{RelationError, Result};
use crate::types::{DropKind, Move, MoveSource, Orientation, OrientedMove, Square};

/// 飛車・角の方向（筋, 段）
const SLIDER_DIRECTIONS: [(i8, i8); 8] =
    [(-1, -1), (-1, 0), (-1, 1), (0, -1), (0, 1), (1, -1), (1, 0), (1, 1)];

/// 先手の桂馬の跳び先（筋, 段）
const KNIGHT_JUMPS: [(i8, i8); 2] = [(-1, -2), (1, -2)];

/// 駒の指し手 ⇔ インデックスの変換表
pub struct PieceMoveIndexer {
    /// `[from * 81 + to]` -> 不成のインデックス
    plain: Vec<u16>,
    /// `[from * 81 + to]` -> 成りのインデックス
    promote: Vec<u16>,
    /// `[kind * 81 + to]` -> 駒打ちのインデックス
    drops: Vec<u16>,
    /// インデックス -> 先手座標系の指し手
    reverse: Vec<Move>,
    /// 成りの区間の開始インデックス
    promote_base: usize,
    /// 駒打ちの区間の開始インデックス
    drop_base: usize,
}

/// 移動元から飛車・角・桂馬の動きで届く升（昇順）
fn reachable(from: Square) -> Vec<Square> {
    let mut targets = Vec::with_capacity(24);
    for &(df, dr) in &SLIDER_DIRECTIONS {
        let mut cur = from;
        while let Some(next) = cur.offset(df, dr) {
            targets.push(next);
            cur = next;
        }
    }
    targets.extend(KNIGHT_JUMPS.iter().filter_map(|&(df, dr)| from.offset(df, dr)));
    targets.sort_unstable();
    targets.dedup();
    targets
}

/// 成りが可能か（移動元か移動先が1-3段）
#[inline]
fn can_promote(from: Square, to: Square) -> bool {
    from.in_promotion_zone() || to.in_promotion_zone()
}

impl PieceMoveIndexer {
    /// 変換表を構築する
    pub fn new() -> PieceMoveIndexer {
        let mut plain = vec![NONE; Square::NUM * Square::NUM];
        let mut promote = vec![NONE; Square::NUM * Square::NUM];
        let mut drops = vec![NONE; DropKind::NUM * Square::NUM];
        let mut reverse = Vec::new();

        let targets: Vec<Vec<Square>> = Square::all().map(reachable).collect();

        for from in Square::all() {
            for &to in &targets[from.index()] {
                plain[from.index() * Square::NUM + to.index()] = reverse.len() as u16;
                reverse.push(Move::new_move(from, to, false));
            }
        }

        let promote_base = reverse.len();
        for from in Square::all() {
            for &to in targets[from.index()].iter().filter(|&&to| can_promote(from, to)) {
                promote[from.index() * Square::NUM + to.index()] = reverse.len() as u16;
                reverse.push(Move::new_move(from, to, true));
            }
        }

        let drop_base = reverse.len();
        for kind in DropKind::ALL {
            let skip = kind.forbidden_far_ranks();
            for to in Square::all().filter(|sq| sq.rank() >= skip) {
                drops[kind.index() * Square::NUM + to.index()] = reverse.len() as u16;
                reverse.push(Move::new_drop(kind, to));
            }
        }

        debug_assert!(reverse.len() < NONE as usize);

        PieceMoveIndexer {
            plain,
            promote,
            drops,
            reverse,
            promote_base,
            drop_base,
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

    /// 成りの区間の開始インデックス
    #[inline]
    pub fn promote_base(&self) -> usize {
        self.promote_base
    }

    /// 駒打ちの区間の開始インデックス
    #[inline]
    pub fn drop_base(&self) -> usize {
        self.drop_base
    }

    /// 指し手をインデックスに変換
    pub fn encode(&self, mv: OrientedMove) -> Result<usize> {
        let normalized = mv.normalized();
        let to = normalized.to().index();
        let index = match normalized.source() {
            MoveSource::Board(from) if normalized.is_promote() => {
                self.promote[from.index() * Square::NUM + to]
            }
            MoveSource::Board(from) => self.plain[from.index() * Square::NUM + to],
            MoveSource::Drop(kind) => self.drops[kind.index() * Square::NUM + to],
        };
        if index == NONE {
            return Err(RelationError::PieceMoveNotFound {
                notation: describe(mv),
            });
        }
        Ok(index as usize)
    }

    /// インデックスを指定の向きの指し手に変換
    pub fn decode(&self, index: usize, orientation: Orientation) -> Result<OrientedMove> {
        let &normalized = self.reverse.get(index).ok_or(RelationError::IndexOutOfRange {
            what: "piece move",
            index,
            size: self.len(),
        })?;
        Ok(OrientedMove::from_normalized(normalized, orientation))
    }
}

impl Default for PieceMoveIndexer {
    fn default() -> Self {
        Self::new()
    }
}
