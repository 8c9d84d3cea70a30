//! KK / KP / PK / PP 関係ストア
//!
//! 種類ごと・手番ごとに1枚の `RelationTable` を持ち、2つの指し手インデックスを
//! `combined = a * size_b + b` で1本のビット位置に合成する。
//!
//! 手番 `color` のテーブルは「`color` の指し手 × 相手の応手」の関係を持つ。
//! 指し手はそれぞれ自分の手番を基準向きに正規化してからインデックス化するので、
//! 後手の指し手も先手と同じインデックス空間に乗る。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use super::{RelationKind, RelationTable};
use crate::error::{RelationError, Result};
use crate::index::MoveIndexes;
use crate::types::{Color, Move, OrientedMove};

/// 玉の指し手かどうかを添えた指し手
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassifiedMove {
    pub mv: Move,
    pub king: bool,
}

impl ClassifiedMove {
    #[inline]
    pub const fn new(mv: Move, king: bool) -> ClassifiedMove {
        ClassifiedMove { mv, king }
    }

    #[inline]
    pub const fn king(mv: Move) -> ClassifiedMove {
        ClassifiedMove { mv, king: true }
    }

    #[inline]
    pub const fn piece(mv: Move) -> ClassifiedMove {
        ClassifiedMove { mv, king: false }
    }
}

/// テーブルのファイル名（`relation_kp_white.bin` など）
pub fn table_file_name(kind: RelationKind, color: Color) -> String {
    format!("relation_{}_{}.bin", kind.label(), color.label())
}

/// 合成インデックスを作る
pub fn compose(indexes: &MoveIndexes, kind: RelationKind, a: usize, b: usize) -> Result<usize> {
    let (size_a, size_b) = kind.sizes(indexes);
    if a >= size_a {
        return Err(RelationError::ComponentOutOfRange {
            kind,
            component: "a",
            index: a,
            size: size_a,
        });
    }
    if b >= size_b {
        return Err(RelationError::ComponentOutOfRange {
            kind,
            component: "b",
            index: b,
            size: size_b,
        });
    }
    Ok(a * size_b + b)
}

/// 合成インデックスを (a, b) に分解する
pub fn decompose(indexes: &MoveIndexes, kind: RelationKind, combined: usize) -> Result<(usize, usize)> {
    let (size_a, size_b) = kind.sizes(indexes);
    if combined >= size_a * size_b {
        return Err(RelationError::CombinedOutOfRange {
            kind,
            index: combined,
            size_a,
            size_b,
        });
    }
    let b = combined % size_b;
    let a = combined / size_b;
    debug_assert!(a < size_a && b < size_b);
    Ok((a, b))
}

/// 種類 × 手番の8枚のテーブルを束ねたストア
///
/// テーブルは最初に触れたときにディレクトリから読み込む（無ければ乱数で作る）。
pub struct RelationStore<'a> {
    dir: PathBuf,
    indexes: &'a MoveIndexes,
    tables: [[Option<RelationTable>; Color::NUM]; RelationKind::NUM],
    rng: Xoshiro256PlusPlus,
}

impl<'a> RelationStore<'a> {
    /// 乱数シードをOSから取る
    pub fn new(dir: impl Into<PathBuf>, indexes: &'a MoveIndexes) -> RelationStore<'a> {
        Self::with_seed(dir, indexes, rand::random())
    }

    /// 乱数シードを指定する（テスト・再現用）
    pub fn with_seed(
        dir: impl Into<PathBuf>,
        indexes: &'a MoveIndexes,
        seed: u64,
    ) -> RelationStore<'a> {
        RelationStore {
            dir: dir.into(),
            indexes,
            tables: Default::default(),
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
        }
    }

    #[inline]
    pub fn indexes(&self) -> &'a MoveIndexes {
        self.indexes
    }

    #[inline]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// テーブルファイルのパス
    pub fn table_path(&self, kind: RelationKind, color: Color) -> PathBuf {
        self.dir.join(table_file_name(kind, color))
    }

    #[inline]
    pub fn compose(&self, kind: RelationKind, a: usize, b: usize) -> Result<usize> {
        compose(self.indexes, kind, a, b)
    }

    #[inline]
    pub fn decompose(&self, kind: RelationKind, combined: usize) -> Result<(usize, usize)> {
        decompose(self.indexes, kind, combined)
    }

    /// テーブルを読み込む（読み込み済みならそのまま返す）
    pub fn load(&mut self, kind: RelationKind, color: Color) -> Result<&mut RelationTable> {
        let bits = kind.bit_count(self.indexes);
        let path = self.table_path(kind, color);
        let slot = &mut self.tables[kind.index()][color.index()];
        if slot.is_none() {
            *slot = Some(RelationTable::load(&path, bits, &mut self.rng)?);
        }
        Ok(slot.get_or_insert_with(|| RelationTable::new(bits)))
    }

    /// 読み込み済みのテーブル
    pub fn table(&self, kind: RelationKind, color: Color) -> Option<&RelationTable> {
        self.tables[kind.index()][color.index()].as_ref()
    }

    /// 変更のあるテーブルが1枚でもあるか
    pub fn is_dirty(&self) -> bool {
        self.tables.iter().flatten().flatten().any(RelationTable::is_dirty)
    }

    /// 1枚保存する（未読み込み・未変更なら何もしない）
    pub fn save(&mut self, kind: RelationKind, color: Color) -> Result<bool> {
        let path = self.table_path(kind, color);
        match &mut self.tables[kind.index()][color.index()] {
            Some(table) => table.save(&path),
            None => Ok(false),
        }
    }

    /// 変更のあるテーブルをすべて保存し、書き込んだ枚数を返す
    pub fn save_all(&mut self) -> Result<usize> {
        let mut written = 0;
        for kind in RelationKind::ALL {
            for color in Color::ALL {
                if self.save(kind, color)? {
                    written += 1;
                }
            }
        }
        if written > 0 {
            log::info!("saved {written} relation table(s) to {}", self.dir.display());
        }
        Ok(written)
    }

    /// `color` の指し手と相手の応手の合成インデックス
    pub fn pair_index(
        &self,
        kind: RelationKind,
        color: Color,
        mover: Move,
        reply: Move,
    ) -> Result<usize> {
        let a = self
            .indexes
            .encode(OrientedMove::for_color(mover, color), kind.mover_is_king())?;
        let b = self
            .indexes
            .encode(OrientedMove::for_color(reply, !color), kind.reply_is_king())?;
        self.compose(kind, a, b)
    }

    /// 1つの指し手に対する応手集合の (合成インデックス, ビット) 一覧
    pub fn select_relations(
        &mut self,
        kind: RelationKind,
        color: Color,
        mover: Move,
        replies: &[Move],
    ) -> Result<BTreeMap<usize, bool>> {
        let indices = replies
            .iter()
            .map(|&reply| self.pair_index(kind, color, mover, reply))
            .collect::<Result<Vec<_>>>()?;
        let table = self.load(kind, color)?;
        indices
            .into_iter()
            .map(|index| Ok((index, table.get(index)?)))
            .collect()
    }

    /// 玉 / 駒の区別付きで1組の関係ビットを読む
    pub fn relation(
        &mut self,
        color: Color,
        mover: ClassifiedMove,
        reply: ClassifiedMove,
    ) -> Result<bool> {
        let kind = RelationKind::from_flags(mover.king, reply.king);
        let index = self.pair_index(kind, color, mover.mv, reply.mv)?;
        self.load(kind, color)?.get(index)
    }

    /// 指し手と全応手の関係ビットを `bit` にそろえ、実際に変わった数を返す
    pub fn set_relations(
        &mut self,
        color: Color,
        mover: ClassifiedMove,
        replies: &[ClassifiedMove],
        bit: bool,
    ) -> Result<usize> {
        let mut changed = 0;
        for reply in replies {
            let kind = RelationKind::from_flags(mover.king, reply.king);
            let index = self.pair_index(kind, color, mover.mv, reply.mv)?;
            if self.load(kind, color)?.set(index, bit)? {
                changed += 1;
            }
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn mv(s: &str) -> Move {
        Move::from_usi(s).unwrap()
    }

    #[test]
    fn test_compose_decompose_boundaries() {
        let indexes = MoveIndexes::new();
        for kind in RelationKind::ALL {
            let (size_a, size_b) = kind.sizes(&indexes);
            for (a, b) in [(0, 0), (size_a - 1, size_b - 1), (1, size_b - 1), (size_a / 2, 17)] {
                let combined = compose(&indexes, kind, a, b).unwrap();
                assert_eq!(decompose(&indexes, kind, combined).unwrap(), (a, b));
            }
            let max = compose(&indexes, kind, size_a - 1, size_b - 1).unwrap();
            assert_eq!(max, size_a * size_b - 1);
        }
    }

    #[test]
    fn test_compose_rejects_out_of_range() {
        let indexes = MoveIndexes::new();
        let (size_a, size_b) = RelationKind::Kp.sizes(&indexes);
        assert!(matches!(
            compose(&indexes, RelationKind::Kp, size_a, 0),
            Err(RelationError::ComponentOutOfRange { component: "a", .. })
        ));
        assert!(matches!(
            compose(&indexes, RelationKind::Kp, 0, size_b),
            Err(RelationError::ComponentOutOfRange { component: "b", .. })
        ));
        assert!(matches!(
            decompose(&indexes, RelationKind::Kp, size_a * size_b),
            Err(RelationError::CombinedOutOfRange { .. })
        ));
    }

    #[test]
    fn test_table_file_name() {
        assert_eq!(table_file_name(RelationKind::Kp, Color::White), "relation_kp_white.bin");
        assert_eq!(table_file_name(RelationKind::Pp, Color::Black), "relation_pp_black.bin");
    }

    #[test]
    fn test_pair_index_orients_each_side_by_its_mover() {
        let dir = TempDir::new().unwrap();
        let indexes = MoveIndexes::new();
        let store = RelationStore::with_seed(dir.path(), &indexes, 1);

        // 先手 7g7f に対する後手 3c3d は、後手自身の向きでは 7g7f と同じ
        let black = store.pair_index(RelationKind::Pp, Color::Black, mv("7g7f"), mv("3c3d")).unwrap();
        let white = store.pair_index(RelationKind::Pp, Color::White, mv("3c3d"), mv("7g7f")).unwrap();
        assert_eq!(black, white);

        // 後手の応手は後手の向きで判定する（1段目への歩打ちは可、9段目は不可）
        assert!(store.pair_index(RelationKind::Pp, Color::Black, mv("7g7f"), mv("P*5a")).is_ok());
        assert!(store.pair_index(RelationKind::Pp, Color::Black, mv("7g7f"), mv("P*5i")).is_err());
    }

    #[test]
    fn test_select_and_set_relations() {
        let dir = TempDir::new().unwrap();
        let indexes = MoveIndexes::new();
        let mut store = RelationStore::with_seed(dir.path(), &indexes, 99);

        let mover = ClassifiedMove::piece(mv("7g7f"));
        let replies = [
            ClassifiedMove::piece(mv("3c3d")),
            ClassifiedMove::king(mv("5a4b")),
            ClassifiedMove::piece(mv("8c8d")),
        ];

        store.set_relations(Color::Black, mover, &replies, true).unwrap();
        for reply in &replies {
            assert!(store.relation(Color::Black, mover, *reply).unwrap());
        }
        assert_eq!(store.set_relations(Color::Black, mover, &replies, true).unwrap(), 0);
        assert_eq!(store.set_relations(Color::Black, mover, &replies, false).unwrap(), 3);

        let piece_replies = [mv("3c3d"), mv("8c8d")];
        let selected = store
            .select_relations(RelationKind::Pp, Color::Black, mover.mv, &piece_replies)
            .unwrap();
        assert_eq!(selected.len(), 2);
        assert!(selected.values().all(|&bit| !bit));
        for (&index, _) in &selected {
            let (a, _) = store.decompose(RelationKind::Pp, index).unwrap();
            assert_eq!(a, indexes.piece().encode(OrientedMove::for_color(mover.mv, Color::Black)).unwrap());
        }
    }

    #[test]
    fn test_store_persists_only_touched_tables() {
        let dir = TempDir::new().unwrap();
        let indexes = MoveIndexes::new();
        let mut store = RelationStore::with_seed(dir.path(), &indexes, 5);
        assert!(!store.is_dirty());

        store.load(RelationKind::Kk, Color::White).unwrap();
        assert!(store.is_dirty());
        assert_eq!(store.save_all().unwrap(), 1);
        assert!(!store.is_dirty());
        assert!(store.table_path(RelationKind::Kk, Color::White).exists());
        assert!(!store.table_path(RelationKind::Kk, Color::Black).exists());
        assert_eq!(store.save_all().unwrap(), 0);

        let size = std::fs::metadata(store.table_path(RelationKind::Kk, Color::White)).unwrap().len();
        assert_eq!(size as usize, (544 * 544usize).div_ceil(8));
    }

    #[test]
    fn test_store_reloads_saved_bits() {
        let dir = TempDir::new().unwrap();
        let indexes = MoveIndexes::new();
        let mover = ClassifiedMove::king(mv("5i4h"));
        let reply = ClassifiedMove::piece(mv("2b8h+"));

        let mut store = RelationStore::with_seed(dir.path(), &indexes, 11);
        store.set_relations(Color::Black, mover, &[reply], true).unwrap();
        store.save_all().unwrap();

        let mut reloaded = RelationStore::with_seed(dir.path(), &indexes, 12);
        assert!(reloaded.relation(Color::Black, mover, reply).unwrap());
        store.set_relations(Color::Black, mover, &[reply], false).unwrap();
        store.save_all().unwrap();

        let mut reloaded = RelationStore::with_seed(dir.path(), &indexes, 13);
        assert!(!reloaded.relation(Color::Black, mover, reply).unwrap());
    }
}
