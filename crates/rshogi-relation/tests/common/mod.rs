//! テスト用のルールエンジン / プレイアウト
//!
//! 局面は「指した手の列」そのもの。合法手は局面ごとに台本で与え、
//! 台本に無い局面では共通の手を返す。
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use rshogi_relation::learn::{Playout, PlayoutOutcome, ShogiRules, StartPosition};
use rshogi_relation::{Color, Move, Result};

pub fn mv(usi: &str) -> Move {
    Move::from_usi(usi).unwrap()
}

pub fn moves(usi: &[&str]) -> Vec<Move> {
    usi.iter().map(|s| mv(s)).collect()
}

pub struct ScriptedRules {
    legal: HashMap<Vec<Move>, Vec<Move>>,
    fallback: Vec<Move>,
    king_moves: HashSet<Move>,
    /// この手数の局面を作り直すと余分な1手が混ざる
    drift_at: Option<usize>,
}

impl ScriptedRules {
    pub fn new() -> ScriptedRules {
        ScriptedRules {
            legal: HashMap::new(),
            fallback: moves(&["5e5d", "4e4d"]),
            king_moves: moves(&["5i5h", "5a4b"]).into_iter().collect(),
            drift_at: None,
        }
    }

    pub fn script(mut self, played: &[&str], legal: &[&str]) -> ScriptedRules {
        self.legal.insert(moves(played), moves(legal));
        self
    }

    pub fn drift_at(mut self, plies: usize) -> ScriptedRules {
        self.drift_at = Some(plies);
        self
    }

    /// 7g7f 3c3d 2g2f の3手
    pub fn three_ply() -> ScriptedRules {
        ScriptedRules::new()
            .script(&[], &["7g7f", "2g2f"])
            .script(&["7g7f"], &["3c3d", "8c8d", "5a4b"])
            .script(&["7g7f", "3c3d"], &["2g2f", "6g6f", "5i5h"])
    }

    /// 7g7f 3c3d 2g2f 8c8d 2f2e の5手
    pub fn five_ply() -> ScriptedRules {
        ScriptedRules::new()
            .script(&[], &["7g7f", "2g2f", "5i5h"])
            .script(&["7g7f"], &["3c3d", "8c8d", "5a4b"])
            .script(&["7g7f", "3c3d"], &["2g2f", "6g6f", "5i5h"])
            .script(&["7g7f", "3c3d", "2g2f"], &["8c8d", "4c4d"])
            .script(&["7g7f", "3c3d", "2g2f", "8c8d"], &["2f2e", "9g9f"])
    }
}

impl ShogiRules for ScriptedRules {
    type Position = Vec<Move>;

    fn position_after(&self, _start: &StartPosition, moves: &[Move]) -> Result<Vec<Move>> {
        let mut position = moves.to_vec();
        if self.drift_at == Some(moves.len()) {
            position.push(mv("9g9f"));
        }
        Ok(position)
    }

    fn play(&self, position: &Vec<Move>, mv: Move) -> Result<Vec<Move>> {
        let mut next = position.clone();
        next.push(mv);
        Ok(next)
    }

    fn side_to_move(&self, position: &Vec<Move>) -> Color {
        if position.len() % 2 == 0 { Color::Black } else { Color::White }
    }

    fn legal_moves(&self, position: &Vec<Move>) -> Result<Vec<Move>> {
        Ok(self.legal.get(position).cloned().unwrap_or_else(|| self.fallback.clone()))
    }

    fn is_king_move(&self, _position: &Vec<Move>, mv: Move) -> bool {
        self.king_moves.contains(&mv)
    }

    fn sfen(&self, position: &Vec<Move>) -> String {
        let played: Vec<String> = position.iter().map(|m| m.to_usi()).collect();
        format!("startpos moves {}", played.join(" "))
    }
}

/// 常に同じ結末を返し、呼ばれた (局面の手数, 延長手数) を記録する
pub struct ScriptedPlayout {
    pub outcome: PlayoutOutcome,
    pub calls: Vec<(usize, u32)>,
}

impl ScriptedPlayout {
    pub fn new(outcome: PlayoutOutcome) -> ScriptedPlayout {
        ScriptedPlayout {
            outcome,
            calls: Vec::new(),
        }
    }

    pub fn budgets(&self) -> Vec<u32> {
        self.calls.iter().map(|&(_, budget)| budget).collect()
    }
}

impl Playout<Vec<Move>> for ScriptedPlayout {
    fn playout(&mut self, position: &Vec<Move>, budget: u32) -> Result<PlayoutOutcome> {
        self.calls.push((position.len(), budget));
        Ok(self.outcome)
    }
}
