//! 手番（Color）

/// 手番（先手/後手）
///
/// 関係テーブルは先手（`Black`）を基準向きとして格納する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    Black = 0,
    White = 1,
}

impl Color {
    /// 手番の数
    pub const NUM: usize = 2;

    /// 全ての手番
    pub const ALL: [Color; 2] = [Color::Black, Color::White];

    /// 相手番を返す
    #[inline]
    pub const fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// USI の手番文字（'b' / 'w'）
    #[inline]
    pub const fn to_usi_char(self) -> char {
        match self {
            Color::Black => 'b',
            Color::White => 'w',
        }
    }

    /// USI の手番文字から変換
    #[inline]
    pub const fn from_usi_char(c: char) -> Option<Color> {
        match c {
            'b' => Some(Color::Black),
            'w' => Some(Color::White),
            _ => None,
        }
    }

    /// ファイル名などに使うラベル
    pub const fn label(self) -> &'static str {
        match self {
            Color::Black => "black",
            Color::White => "white",
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    #[inline]
    fn not(self) -> Color {
        self.opponent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_opponent() {
        assert_eq!(Color::Black.opponent(), Color::White);
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn test_color_usi_char() {
        assert_eq!(Color::Black.to_usi_char(), 'b');
        assert_eq!(Color::from_usi_char('w'), Some(Color::White));
        assert_eq!(Color::from_usi_char('x'), None);
    }
}
