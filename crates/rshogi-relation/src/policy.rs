//! 方策率とティア
//!
//! ある指し手に対する相手の応手のうち、関係ビットが立っているものの割合を方策率とし、
//! それを `tier_resolution` 段階のティア（0 が最良）に落とす。
//! 応手が無い指し手は方策率 1.0（ティア 0）として扱う。

use crate::error::Result;
use crate::relation::{ClassifiedMove, RelationKind, RelationStore};
use crate::types::{Color, Move};

/// ティア分割数の既定値
pub const DEFAULT_TIER_RESOLUTION: usize = 10;

/// 1つの指し手の方策評価
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyEvaluation {
    /// 集計した応手数
    pub total: usize,
    /// 関係ビットが 1 の応手数
    pub positive: usize,
    /// ティア（0 が最良）
    pub tier: usize,
}

impl PolicyEvaluation {
    pub fn new(positive: usize, total: usize, resolution: usize) -> PolicyEvaluation {
        PolicyEvaluation {
            total,
            positive,
            tier: tier(positive, total, resolution),
        }
    }

    #[inline]
    pub fn rate(&self) -> f64 {
        policy_rate(self.positive, self.total)
    }

    /// "66.7%" 形式
    pub fn percent(&self) -> String {
        format_percent(self.positive, self.total)
    }
}

/// 方策率（応手が無ければ 1.0）
#[inline]
pub fn policy_rate(positive: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        positive as f64 / total as f64
    }
}

/// ティア = floor((1 - rate) * resolution) を [0, resolution-1] に丸めたもの
///
/// 浮動小数の誤差で境界がずれないよう整数で計算する。
#[inline]
pub fn tier(positive: usize, total: usize, resolution: usize) -> usize {
    if total == 0 || resolution == 0 {
        return 0;
    }
    let negative = total.saturating_sub(positive);
    (negative * resolution / total).min(resolution - 1)
}

/// 百分率を小数第1位で四捨五入（half-up）した文字列
pub fn format_percent(positive: usize, total: usize) -> String {
    let tenths = if total == 0 {
        1000
    } else {
        (positive * 2000 + total) / (2 * total)
    };
    format!("{}.{}%", tenths / 10, tenths % 10)
}

/// 指し手 `mover`（手番 `color`）に対する応手集合の関係ビットを集計する
///
/// 玉の応手は KK / PK、駒の応手は KP / PP のテーブルから読む。
pub fn evaluate(
    store: &mut RelationStore<'_>,
    color: Color,
    mover: ClassifiedMove,
    replies: &[ClassifiedMove],
    resolution: usize,
) -> Result<PolicyEvaluation> {
    let king_replies: Vec<Move> = replies.iter().filter(|r| r.king).map(|r| r.mv).collect();
    let piece_replies: Vec<Move> = replies.iter().filter(|r| !r.king).map(|r| r.mv).collect();

    let mut total = 0;
    let mut positive = 0;
    for (reply_king, moves) in [(true, &king_replies), (false, &piece_replies)] {
        if moves.is_empty() {
            continue;
        }
        let kind = RelationKind::from_flags(mover.king, reply_king);
        let relations = store.select_relations(kind, color, mover.mv, moves)?;
        total += relations.len();
        positive += relations.values().filter(|&&bit| bit).count();
    }
    Ok(PolicyEvaluation::new(positive, total, resolution))
}

/// ティア付きの候補手
#[derive(Debug, Clone, Copy)]
pub struct RankedMove {
    pub mv: ClassifiedMove,
    pub evaluation: PolicyEvaluation,
}

/// ティアの良い順に並べる（同ティア内は元の順序を保つ）
pub fn rank_moves(mut moves: Vec<RankedMove>) -> Vec<RankedMove> {
    moves.sort_by_key(|m| m.evaluation.tier);
    moves
}
