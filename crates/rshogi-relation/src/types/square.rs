//! 升目（Square）

use std::fmt;

/// 升目（0-80）
///
/// `file * 9 + rank`（どちらも 0 始まり）。1a=0, 1b=1, ..., 1i=8, 2a=9, ..., 9i=80。
/// 段は先手から見て奥（a）が 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    pub const NUM: usize = 81;

    /// 筋・段の0始まりの座標から生成
    #[inline]
    pub const fn from_coords(file: u8, rank: u8) -> Option<Square> {
        if file < 9 && rank < 9 { Some(Square(file * 9 + rank)) } else { None }
    }

    /// 筋（0 = 1筋）
    #[inline]
    pub const fn file(self) -> u8 {
        self.0 / 9
    }

    /// 段（0 = a段）
    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 % 9
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn from_index(n: usize) -> Option<Square> {
        if n < Self::NUM { Some(Square(n as u8)) } else { None }
    }

    /// 180度回転
    #[inline]
    pub const fn inverse(self) -> Square {
        Square(80 - self.0)
    }

    /// 基準向きで成れる段（a〜c）か
    #[inline]
    pub const fn in_promotion_zone(self) -> bool {
        self.rank() < 3
    }

    /// 筋・段方向にずらした升（盤外なら None）
    #[inline]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Square> {
        let file = self.file() as i8 + file_delta;
        let rank = self.rank() as i8 + rank_delta;
        if file < 0 || rank < 0 {
            return None;
        }
        Square::from_coords(file as u8, rank as u8)
    }

    /// "7g" 形式
    pub fn to_usi(self) -> String {
        self.to_string()
    }

    pub fn from_usi(s: &str) -> Option<Square> {
        match s.as_bytes() {
            &[file @ b'1'..=b'9', rank @ b'a'..=b'i'] => {
                Square::from_coords(file - b'1', rank - b'a')
            }
            _ => None,
        }
    }

    /// 1a から 9i まで昇順
    pub fn all() -> impl Iterator<Item = Square> {
        (0..Self::NUM as u8).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'1' + self.file()) as char, (b'a' + self.rank()) as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_usi(s).unwrap()
    }

    #[test]
    fn test_square_layout() {
        assert_eq!(sq("1a").index(), 0);
        assert_eq!(sq("1i").index(), 8);
        assert_eq!(sq("2a").index(), 9);
        assert_eq!(sq("9i").index(), 80);
        assert_eq!(sq("7g").file(), 6);
        assert_eq!(sq("7g").rank(), 6);
        assert_eq!(Square::from_coords(9, 0), None);
        assert_eq!(Square::all().count(), Square::NUM);
    }

    #[test]
    fn test_square_inverse() {
        assert_eq!(sq("1a").inverse(), sq("9i"));
        assert_eq!(sq("5e").inverse(), sq("5e"));
        assert_eq!(sq("7g").inverse(), sq("3c"));
        assert!(Square::all().all(|s| s.inverse().inverse() == s));
    }

    #[test]
    fn test_square_offset() {
        assert_eq!(sq("1a").offset(-1, 0), None);
        assert_eq!(sq("1a").offset(0, -1), None);
        assert_eq!(sq("1a").offset(1, 1), Some(sq("2b")));
        assert_eq!(sq("9i").offset(1, 0), None);
        assert_eq!(sq("5e").offset(0, -2), Some(sq("5c")));
    }

    #[test]
    fn test_promotion_zone() {
        assert!(sq("1a").in_promotion_zone());
        assert!(sq("9c").in_promotion_zone());
        assert!(!sq("5d").in_promotion_zone());
    }

    #[test]
    fn test_square_usi() {
        assert_eq!(sq("7g").to_usi(), "7g");
        assert_eq!(sq("9i").to_string(), "9i");
        for bad in ["", "0a", "1j", "1a+", "a1", "１a"] {
            assert_eq!(Square::from_usi(bad), None, "{bad}");
        }
    }
}
