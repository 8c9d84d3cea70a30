//! 打ち駒種（DropKind）

/// 持ち駒として打てる駒種
///
/// 並び順はインデックス生成時の走査順（飛角金銀桂香歩）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum DropKind {
    Rook = 0,
    Bishop = 1,
    Gold = 2,
    Silver = 3,
    Knight = 4,
    Lance = 5,
    Pawn = 6,
}

impl DropKind {
    /// 打ち駒種の数
    pub const NUM: usize = 7;

    /// 全ての打ち駒種（インデックス生成順）
    pub const ALL: [DropKind; 7] = [
        DropKind::Rook,
        DropKind::Bishop,
        DropKind::Gold,
        DropKind::Silver,
        DropKind::Knight,
        DropKind::Lance,
        DropKind::Pawn,
    ];

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 基準向きで打てない奥の段数（桂:2, 香・歩:1）
    #[inline]
    pub const fn forbidden_far_ranks(self) -> u8 {
        match self {
            DropKind::Knight => 2,
            DropKind::Lance | DropKind::Pawn => 1,
            _ => 0,
        }
    }

    /// USI形式の駒文字
    #[inline]
    pub const fn to_usi_char(self) -> char {
        match self {
            DropKind::Rook => 'R',
            DropKind::Bishop => 'B',
            DropKind::Gold => 'G',
            DropKind::Silver => 'S',
            DropKind::Knight => 'N',
            DropKind::Lance => 'L',
            DropKind::Pawn => 'P',
        }
    }

    /// USI形式の駒文字から変換
    #[inline]
    pub const fn from_usi_char(c: char) -> Option<DropKind> {
        match c {
            'R' => Some(DropKind::Rook),
            'B' => Some(DropKind::Bishop),
            'G' => Some(DropKind::Gold),
            'S' => Some(DropKind::Silver),
            'N' => Some(DropKind::Knight),
            'L' => Some(DropKind::Lance),
            'P' => Some(DropKind::Pawn),
            _ => None,
        }
    }
}
