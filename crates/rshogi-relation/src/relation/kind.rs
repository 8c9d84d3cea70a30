//! 関係の種類（KK / KP / PK / PP）

use std::fmt;

use crate::index::MoveIndexes;

/// 指し手側 × 応手側の玉 / 駒の組み合わせ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum RelationKind {
    /// 玉の指し手 × 玉の応手
    Kk = 0,
    /// 玉の指し手 × 駒の応手
    Kp = 1,
    /// 駒の指し手 × 玉の応手
    Pk = 2,
    /// 駒の指し手 × 駒の応手
    Pp = 3,
}

impl RelationKind {
    pub const NUM: usize = 4;

    pub const ALL: [RelationKind; 4] =
        [RelationKind::Kk, RelationKind::Kp, RelationKind::Pk, RelationKind::Pp];

    /// 指し手と応手が玉の指し手かどうかから種類を決める
    #[inline]
    pub const fn from_flags(mover_king: bool, reply_king: bool) -> RelationKind {
        match (mover_king, reply_king) {
            (true, true) => RelationKind::Kk,
            (true, false) => RelationKind::Kp,
            (false, true) => RelationKind::Pk,
            (false, false) => RelationKind::Pp,
        }
    }

    #[inline]
    pub const fn mover_is_king(self) -> bool {
        matches!(self, RelationKind::Kk | RelationKind::Kp)
    }

    #[inline]
    pub const fn reply_is_king(self) -> bool {
        matches!(self, RelationKind::Kk | RelationKind::Pk)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// ファイル名用の小文字ラベル
    pub const fn label(self) -> &'static str {
        match self {
            RelationKind::Kk => "kk",
            RelationKind::Kp => "kp",
            RelationKind::Pk => "pk",
            RelationKind::Pp => "pp",
        }
    }

    /// (指し手側, 応手側) のインデックス空間の大きさ
    #[inline]
    pub fn sizes(self, indexes: &MoveIndexes) -> (usize, usize) {
        (indexes.size(self.mover_is_king()), indexes.size(self.reply_is_king()))
    }

    /// テーブルのビット数
    #[inline]
    pub fn bit_count(self, indexes: &MoveIndexes) -> usize {
        let (a, b) = self.sizes(indexes);
        a * b
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelationKind::Kk => "KK",
            RelationKind::Kp => "KP",
            RelationKind::Pk => "PK",
            RelationKind::Pp => "PP",
        })
    }
}
