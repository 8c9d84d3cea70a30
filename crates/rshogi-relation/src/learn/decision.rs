//! 詰み手数ごとの局面区分・候補手の扱い・関係ビットの調整方針

use super::config::{Checkpoint, SearchExtension};
use super::rules::PlayoutOutcome;

/// 巻き戻した局面の区分
///
/// 奇数手戻しは最終的な勝者の手番（攻め方）、偶数手戻しは敗者の手番（受け方）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Attacker,
    Defender,
}

impl Phase {
    #[inline]
    pub const fn from_mate_distance(mate_distance: usize) -> Phase {
        if mate_distance % 2 == 1 { Phase::Attacker } else { Phase::Defender }
    }

    /// プレイアウトに渡す延長手数
    #[inline]
    pub fn budget(self, mate_distance: usize, extension: &SearchExtension) -> u32 {
        let extra = match self {
            Phase::Attacker => extension.attack,
            Phase::Defender => extension.escape,
        };
        mate_distance as u32 + extra
    }
}

impl Checkpoint {
    /// この詰み手数を処理し終えたところでテーブルを保存するか
    pub fn should_save(&self, mate_distance: usize, phase: Phase) -> bool {
        if mate_distance <= self.dense_until {
            return true;
        }
        match phase {
            Phase::Attacker => mate_distance % self.interval == 1,
            Phase::Defender => mate_distance % self.interval == 0,
        }
    }
}

/// 候補手のプレイアウト方法
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateMode {
    /// 通常の延長手数で調べる
    Full,
    /// 短手数（`short_mate_mode.relay_move_number`）の詰み確認だけ行う
    ShortMate,
    /// 調べない
    Skip,
}

/// 関係ビットの調整方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// 1 にそろえる
    Strengthen,
    /// 0 にそろえる
    Weaken,
    /// 変えない
    Keep,
}

impl Adjustment {
    /// プレイアウト結果から調整方針を決める
    ///
    /// `mover_is_winner`: 巻き戻し局面の手番側が実戦の勝者か
    pub fn decide(
        outcome: PlayoutOutcome,
        mover_is_winner: bool,
        mate_distance: usize,
        short_mate: bool,
    ) -> Adjustment {
        let (for_winner, for_loser) = match outcome {
            PlayoutOutcome::Resigned => (Adjustment::Weaken, Adjustment::Strengthen),
            PlayoutOutcome::DeclaredEntryWin => (Adjustment::Strengthen, Adjustment::Weaken),
            PlayoutOutcome::MoveLimit => (Adjustment::Keep, Adjustment::Keep),
            PlayoutOutcome::DepthExhausted if short_mate || mate_distance >= 2 => {
                (Adjustment::Keep, Adjustment::Keep)
            }
            PlayoutOutcome::DepthExhausted => (Adjustment::Weaken, Adjustment::Strengthen),
        };
        if mover_is_winner { for_winner } else { for_loser }
    }

    /// 設定するビット値（変えない場合は None）
    #[inline]
    pub const fn bit(self) -> Option<bool> {
        match self {
            Adjustment::Strengthen => Some(true),
            Adjustment::Weaken => Some(false),
            Adjustment::Keep => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_alternates() {
        assert_eq!(Phase::from_mate_distance(1), Phase::Attacker);
        assert_eq!(Phase::from_mate_distance(2), Phase::Defender);
        assert_eq!(Phase::from_mate_distance(7), Phase::Attacker);
    }

    #[test]
    fn test_phase_budget() {
        let ext = SearchExtension::default();
        assert_eq!(Phase::Attacker.budget(3, &ext), 13);
        assert_eq!(Phase::Defender.budget(4, &ext), 34);
    }

    #[test]
    fn test_checkpoint_cadence() {
        let cp = Checkpoint::default();
        let saved: Vec<usize> = (1..=62)
            .filter(|&d| cp.should_save(d, Phase::from_mate_distance(d)))
            .collect();
        assert_eq!(saved, vec![1, 2, 3, 4, 20, 21, 40, 41, 60, 61]);
    }

    #[test]
    fn test_adjustment_table() {
        use Adjustment::*;
        use PlayoutOutcome::*;
        let cases = [
            // (outcome, winner?, distance, short, expected)
            (Resigned, true, 1, false, Weaken),
            (Resigned, false, 2, false, Strengthen),
            (Resigned, true, 5, true, Weaken),
            (DeclaredEntryWin, true, 3, false, Strengthen),
            (DeclaredEntryWin, false, 4, false, Weaken),
            (MoveLimit, true, 1, false, Keep),
            (MoveLimit, false, 1, false, Keep),
            (DepthExhausted, true, 1, false, Weaken),
            (DepthExhausted, false, 1, false, Strengthen),
            (DepthExhausted, true, 2, false, Keep),
            (DepthExhausted, false, 6, false, Keep),
            (DepthExhausted, true, 1, true, Keep),
            (DepthExhausted, false, 1, true, Keep),
        ];
        for (outcome, winner, distance, short, expected) in cases {
            assert_eq!(
                Adjustment::decide(outcome, winner, distance, short),
                expected,
                "{outcome:?} winner={winner} d={distance} short={short}"
            );
        }
    }

    #[test]
    fn test_adjustment_bit() {
        assert_eq!(Adjustment::Strengthen.bit(), Some(true));
        assert_eq!(Adjustment::Weaken.bit(), Some(false));
        assert_eq!(Adjustment::Keep.bit(), None);
    }
}
