//! 向き（Orientation）
//!
//! 関係テーブルは先手視点で格納する。後手の指し手は 180 度回転して
//! 先手座標系に揃えてからインデックス化する。回転の要否は指し手と一緒に
//! `OrientedMove` として持ち回り、インデックス関数の内部でだけ正規化する。

use super::{Color, Move};

/// 指し手の座標系
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// 先手座標系のまま
    Native,
    /// 180度回転して先手座標系に揃える
    Reflected,
}

impl Orientation {
    /// 指し手を指す側の手番から決まる向き
    #[inline]
    pub const fn for_color(color: Color) -> Orientation {
        match color {
            Color::Black => Orientation::Native,
            Color::White => Orientation::Reflected,
        }
    }

    /// 回転が必要か
    #[inline]
    pub const fn is_reflected(self) -> bool {
        matches!(self, Orientation::Reflected)
    }

    /// 両向き
    pub const ALL: [Orientation; 2] = [Orientation::Native, Orientation::Reflected];
}

/// 向き付きの指し手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OrientedMove {
    pub mv: Move,
    pub orientation: Orientation,
}

impl OrientedMove {
    #[inline]
    pub const fn new(mv: Move, orientation: Orientation) -> OrientedMove {
        OrientedMove { mv, orientation }
    }

    /// 手番から向きを決めて生成
    #[inline]
    pub const fn for_color(mv: Move, color: Color) -> OrientedMove {
        OrientedMove::new(mv, Orientation::for_color(color))
    }

    /// 先手座標系の指し手
    #[inline]
    pub const fn normalized(self) -> Move {
        match self.orientation {
            Orientation::Native => self.mv,
            Orientation::Reflected => self.mv.reflected(),
        }
    }

    /// 先手座標系の指し手から、指定の向きの指し手を復元
    #[inline]
    pub const fn from_normalized(normalized: Move, orientation: Orientation) -> OrientedMove {
        let mv = match orientation {
            Orientation::Native => normalized,
            Orientation::Reflected => normalized.reflected(),
        };
        OrientedMove { mv, orientation }
    }
}
