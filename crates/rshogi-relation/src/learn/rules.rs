//! 外部ルールエンジン / プレイアウトとの境界
//!
//! 盤面表現・合法手生成・詰み判定・プレイアウト探索はこのクレートの外にある。
//! 学習ループは以下のトレイト越しにだけそれらを使う。
//!
//! 局面は「初期局面 + 指し手列の先頭 n 手」から毎回作り直す値として扱い、
//! do/undo による破壊的な巻き戻しは行わない。

use crate::error::Result;
use crate::relation::ClassifiedMove;
use crate::types::{Color, Move};

/// 対局の初期局面
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartPosition {
    /// 平手
    Startpos,
    /// SFEN 文字列
    Sfen(String),
}

/// 外部ルールエンジン
pub trait ShogiRules {
    /// 局面（値として複製できること）
    type Position: Clone;

    /// 初期局面から指し手列を適用した局面
    fn position_after(&self, start: &StartPosition, moves: &[Move]) -> Result<Self::Position>;

    /// 1手進めた局面（元の局面は変えない）
    fn play(&self, position: &Self::Position, mv: Move) -> Result<Self::Position>;

    /// 手番
    fn side_to_move(&self, position: &Self::Position) -> Color;

    /// 合法手一覧
    fn legal_moves(&self, position: &Self::Position) -> Result<Vec<Move>>;

    /// 玉を動かす指し手か
    fn is_king_move(&self, position: &Self::Position, mv: Move) -> bool;

    /// 局面の SFEN 表記（一致判定に使う）
    fn sfen(&self, position: &Self::Position) -> String;

    /// 合法手を玉 / 駒に分類して返す
    fn classified_moves(&self, position: &Self::Position) -> Result<Vec<ClassifiedMove>> {
        Ok(self
            .legal_moves(position)?
            .into_iter()
            .map(|mv| ClassifiedMove::new(mv, self.is_king_move(position, mv)))
            .collect())
    }
}

/// プレイアウトの結末
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayoutOutcome {
    /// 投了で終わった
    Resigned,
    /// 入玉宣言勝ちで終わった
    DeclaredEntryWin,
    /// 手数制限に達した
    MoveLimit,
    /// 探索の延長手数を使い切った
    DepthExhausted,
}

/// プレイアウト（与えられた局面から延長手数 `budget` まで指し進める）
pub trait Playout<P> {
    fn playout(&mut self, position: &P, budget: u32) -> Result<PlayoutOutcome>;
}

impl<P, T> Playout<P> for &mut T
where
    T: Playout<P> + ?Sized,
{
    fn playout(&mut self, position: &P, budget: u32) -> Result<PlayoutOutcome> {
        (**self).playout(position, budget)
    }
}
