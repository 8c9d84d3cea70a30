//! 詰み手数ベースの自己対局学習
//!
//! 決着した1局を終局から1手ずつ巻き戻し、各局面の候補手をプレイアウトで調べて、
//! 「その局面に至った直前の相手の手」と「その局面の合法手」の関係ビットを調整する。
//!
//! 巻き戻しは `ShogiRules::position_after` で指し手列の先頭から作り直し、
//! 残りの手順を再生すると終局図に戻ることを SFEN で確かめてから使う。

use std::fmt;
use std::ops::AddAssign;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::config::{LearnConfig, LearnRate};
use super::decision::{Adjustment, CandidateMode, Phase};
use super::game_log::GameRecord;
use super::rules::{Playout, ShogiRules};
use crate::error::{RelationError, Result};
use crate::policy::{self, RankedMove};
use crate::relation::{ClassifiedMove, RelationStore};
use crate::types::Color;

/// この詰み手数以上では、棋譜の手以外の候補手を抽選する
const SAMPLING_MATE_DISTANCE: usize = 4;

/// 1局分の学習結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GameLearnReport {
    /// 処理した詰み手数の数
    pub levels: usize,
    pub playouts: usize,
    /// うち短手数モード
    pub short_mate_playouts: usize,
    pub skipped_candidates: usize,
    /// 実際に値が変わった関係ビット数
    pub bits_changed: usize,
    /// テーブルを書き出した回数
    pub checkpoints: usize,
}

impl AddAssign for GameLearnReport {
    fn add_assign(&mut self, rhs: GameLearnReport) {
        self.levels += rhs.levels;
        self.playouts += rhs.playouts;
        self.short_mate_playouts += rhs.short_mate_playouts;
        self.skipped_candidates += rhs.skipped_candidates;
        self.bits_changed += rhs.bits_changed;
        self.checkpoints += rhs.checkpoints;
    }
}

impl fmt::Display for GameLearnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "levels={} playouts={} (short={}) skipped={} bits_changed={} checkpoints={}",
            self.levels,
            self.playouts,
            self.short_mate_playouts,
            self.skipped_candidates,
            self.bits_changed,
            self.checkpoints
        )
    }
}

/// 自己対局学習器
///
/// ルールエンジンは借用し、プレイアウトと関係ストアは所有する。
/// プレイアウトを後から参照したい場合は `&mut` で渡せばよい。
pub struct SelfPlayLearner<'a, R: ShogiRules, P> {
    rules: &'a R,
    playout: P,
    store: RelationStore<'a>,
    rng: Xoshiro256PlusPlus,
}

impl<'a, R, P> SelfPlayLearner<'a, R, P>
where
    R: ShogiRules,
    P: Playout<R::Position>,
{
    pub fn new(rules: &'a R, playout: P, store: RelationStore<'a>) -> Self {
        Self::with_seed(rules, playout, store, rand::random())
    }

    /// 候補手抽選の乱数シードを指定する
    pub fn with_seed(rules: &'a R, playout: P, store: RelationStore<'a>, seed: u64) -> Self {
        SelfPlayLearner {
            rules,
            playout,
            store,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn store(&self) -> &RelationStore<'a> {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut RelationStore<'a> {
        &mut self.store
    }

    pub fn into_store(self) -> RelationStore<'a> {
        self.store
    }

    /// 1局を学習する
    ///
    /// 引き分け（勝者なし）は何もせずに空のレポートを返す。
    /// 設定は `LearnConfig::validate` を通ること。
    pub fn learn_game(&mut self, game: &GameRecord, config: &LearnConfig) -> Result<GameLearnReport> {
        config.validate().map_err(RelationError::InvalidConfig)?;
        let mut report = GameLearnReport::default();
        let Some(winner) = game.winner else {
            log::info!("skipping game without winner ({}, {} plies)", game.reason, game.moves.len());
            return Ok(report);
        };

        let terminal = self.rules.position_after(&game.start, &game.moves)?;
        let terminal_sfen = self.rules.sfen(&terminal);

        for mate_distance in 1..=game.moves.len() {
            let before = report;
            self.learn_level(game, winner, mate_distance, &terminal_sfen, config, &mut report)?;
            report.levels += 1;

            let phase = Phase::from_mate_distance(mate_distance);
            if config.checkpoint.should_save(mate_distance, phase) && self.store.save_all()? > 0 {
                report.checkpoints += 1;
            }
            log::debug!(
                "mate distance {mate_distance} ({phase:?}): playouts={} bits_changed={}",
                report.playouts - before.playouts,
                report.bits_changed - before.bits_changed
            );
        }

        log::info!(
            "learned game: {} plies, winner {}, reason {}: {report}",
            game.moves.len(),
            winner.label(),
            game.reason
        );
        Ok(report)
    }

    fn learn_level(
        &mut self,
        game: &GameRecord,
        winner: Color,
        mate_distance: usize,
        terminal_sfen: &str,
        config: &LearnConfig,
        report: &mut GameLearnReport,
    ) -> Result<()> {
        let rules = self.rules;
        let split = game.moves.len() - mate_distance;
        let phase = Phase::from_mate_distance(mate_distance);

        let rewound = rules.position_after(&game.start, &game.moves[..split])?;
        let rewound_sfen = rules.sfen(&rewound);
        let replayed = game.moves[split..]
            .iter()
            .try_fold(rewound.clone(), |pos, &mv| rules.play(&pos, mv))?;
        let replayed_sfen = rules.sfen(&replayed);
        if replayed_sfen != terminal_sfen {
            return Err(RelationError::RewindMismatch {
                mate_distance,
                expected: terminal_sfen.to_string(),
                actual: replayed_sfen,
            });
        }

        let mover = rules.side_to_move(&rewound);
        let mover_is_winner = mover == winner;
        let legal = rules.classified_moves(&rewound)?;
        let principal_move = game.moves[split];
        let Some(&principal) = legal.iter().find(|m| m.mv == principal_move) else {
            return Err(RelationError::IllegalPrincipal {
                notation: principal_move.to_usi(),
                mate_distance,
                side: mover,
            });
        };

        // 巻き戻し局面に至った直前の手（相手の手番）
        let anchor = match split.checked_sub(1) {
            Some(prev) => {
                let before = rules.position_after(&game.start, &game.moves[..prev])?;
                let mv = game.moves[prev];
                Some((
                    rules.side_to_move(&before),
                    ClassifiedMove::new(mv, rules.is_king_move(&before, mv)),
                ))
            }
            None => None,
        };

        let ranked = self.rank_candidates(&rewound, mover, &legal, config.policy.tier_resolution)?;
        let mut candidates = Vec::with_capacity(ranked.len());
        candidates.push(principal);
        candidates.extend(ranked.iter().map(|r| r.mv).filter(|m| m.mv != principal.mv));

        for (i, candidate) in candidates.into_iter().enumerate() {
            let mode = self.candidate_mode(i == 0, mate_distance, mover_is_winner, &config.learn_rate);
            let budget = match mode {
                CandidateMode::Full => phase.budget(mate_distance, &config.search_extension),
                CandidateMode::ShortMate => config.short_mate_mode.relay_move_number,
                CandidateMode::Skip => {
                    report.skipped_candidates += 1;
                    continue;
                }
            };

            let child = rules.play(&rewound, candidate.mv)?;
            let outcome = self.playout.playout(&child, budget)?;
            report.playouts += 1;
            let short_mate = mode == CandidateMode::ShortMate;
            if short_mate {
                report.short_mate_playouts += 1;
            }

            let adjustment = Adjustment::decide(outcome, mover_is_winner, mate_distance, short_mate);
            log::trace!("d={mate_distance} {} budget={budget}: {outcome:?} -> {adjustment:?}", candidate.mv);
            if let (Some((anchor_color, anchor_move)), Some(bit)) = (anchor, adjustment.bit()) {
                report.bits_changed += self.store.set_relations(anchor_color, anchor_move, &legal, bit)?;
            }

            let current = rules.sfen(&rewound);
            if current != rewound_sfen {
                return Err(RelationError::RewindMismatch {
                    mate_distance,
                    expected: rewound_sfen,
                    actual: current,
                });
            }
        }
        Ok(())
    }

    /// 候補手を、指した後の相手の応手集合に対するティア順に並べる
    fn rank_candidates(
        &mut self,
        position: &R::Position,
        mover: Color,
        legal: &[ClassifiedMove],
        resolution: usize,
    ) -> Result<Vec<RankedMove>> {
        let rules = self.rules;
        let mut ranked = Vec::with_capacity(legal.len());
        for &candidate in legal {
            let child = rules.play(position, candidate.mv)?;
            let replies = rules.classified_moves(&child)?;
            let evaluation = policy::evaluate(&mut self.store, mover, candidate, &replies, resolution)?;
            ranked.push(RankedMove {
                mv: candidate,
                evaluation,
            });
        }
        Ok(policy::rank_moves(ranked))
    }

    fn candidate_mode(
        &mut self,
        principal: bool,
        mate_distance: usize,
        mover_is_winner: bool,
        rate: &LearnRate,
    ) -> CandidateMode {
        if principal || mate_distance < SAMPLING_MATE_DISTANCE || rate.sample(&mut self.rng) {
            CandidateMode::Full
        } else if mover_is_winner {
            CandidateMode::ShortMate
        } else {
            CandidateMode::Skip
        }
    }
}
