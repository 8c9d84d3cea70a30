//! 指し手（Move）

use std::fmt;

use super::{DropKind, Square};

/// 移動元（盤上の升 or 打ち駒種）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveSource {
    Board(Square),
    Drop(DropKind),
}

/// 指し手
///
/// 向きを持たない生のデータ。どちらの手番の座標系で解釈するかは
/// `OrientedMove` が保持する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    source: MoveSource,
    to: Square,
    promote: bool,
}

impl Move {
    /// 移動の指し手を生成
    #[inline]
    pub const fn new_move(from: Square, to: Square, promote: bool) -> Move {
        Move {
            source: MoveSource::Board(from),
            to,
            promote,
        }
    }

    /// 駒打ちの指し手を生成
    #[inline]
    pub const fn new_drop(kind: DropKind, to: Square) -> Move {
        Move {
            source: MoveSource::Drop(kind),
            to,
            promote: false,
        }
    }

    /// 移動元
    #[inline]
    pub const fn source(self) -> MoveSource {
        self.source
    }

    /// 移動元の升（駒打ちなら None）
    #[inline]
    pub const fn from(self) -> Option<Square> {
        match self.source {
            MoveSource::Board(sq) => Some(sq),
            MoveSource::Drop(_) => None,
        }
    }

    /// 移動先
    #[inline]
    pub const fn to(self) -> Square {
        self.to
    }

    /// 成りかどうか
    #[inline]
    pub const fn is_promote(self) -> bool {
        self.promote
    }

    /// 駒打ちかどうか
    #[inline]
    pub const fn is_drop(self) -> bool {
        matches!(self.source, MoveSource::Drop(_))
    }

    /// 盤面を180度回転させた指し手（打ち駒種はそのまま）
    #[inline]
    pub const fn reflected(self) -> Move {
        let source = match self.source {
            MoveSource::Board(sq) => MoveSource::Board(sq.inverse()),
            MoveSource::Drop(kind) => MoveSource::Drop(kind),
        };
        Move {
            source,
            to: self.to.inverse(),
            promote: self.promote,
        }
    }

    /// USI形式の文字列に変換（"7g7f", "P*5e", "3h3i+"）
    pub fn to_usi(self) -> String {
        self.to_string()
    }

    /// USI形式の文字列から変換
    pub fn from_usi(s: &str) -> Option<Move> {
        let bytes = s.as_bytes();
        if bytes.len() == 4 && bytes[1] == b'*' {
            let kind = DropKind::from_usi_char(bytes[0] as char)?;
            let to = Square::from_usi(s.get(2..4)?)?;
            return Some(Move::new_drop(kind, to));
        }
        let promote = match bytes.len() {
            4 => false,
            5 if bytes[4] == b'+' => true,
            _ => return None,
        };
        let from = Square::from_usi(s.get(0..2)?)?;
        let to = Square::from_usi(s.get(2..4)?)?;
        Some(Move::new_move(from, to, promote))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.source {
            MoveSource::Board(from) => write!(f, "{from}{}", self.to)?,
            MoveSource::Drop(kind) => write!(f, "{}*{}", kind.to_usi_char(), self.to)?,
        }
        if self.promote {
            f.write_str("+")?;
        }
        Ok(())
    }
}
