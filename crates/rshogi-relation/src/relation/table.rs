//! 関係テーブル（ビット配列）とファイル永続化
//!
//! 論理的には N ビットの列、物理的には ceil(N/8) バイトで MSB から詰める。
//! 最終バイトの未使用下位ビットは常に 0 に保つ。

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::error::{RelationError, Result};

/// ビット単位の関係テーブル
#[derive(Debug, Clone)]
pub struct RelationTable {
    bytes: Vec<u8>,
    len: usize,
    dirty: bool,
}

/// ビット数から必要なバイト数
#[inline]
const fn byte_len(bit_count: usize) -> usize {
    bit_count.div_ceil(8)
}

/// ビット位置のマスク（MSB-first）
#[inline]
const fn bit_mask(index: usize) -> u8 {
    0x80 >> (index % 8)
}

impl RelationTable {
    /// 全ビット 0 のテーブル（未変更扱い）
    pub fn new(bit_count: usize) -> RelationTable {
        RelationTable {
            bytes: vec![0; byte_len(bit_count)],
            len: bit_count,
            dirty: false,
        }
    }

    /// 各ビットが独立に一様乱数のテーブル（未保存なので dirty）
    pub fn random<R: RngCore + ?Sized>(bit_count: usize, rng: &mut R) -> RelationTable {
        let mut table = RelationTable {
            bytes: vec![0; byte_len(bit_count)],
            len: bit_count,
            dirty: true,
        };
        rng.fill_bytes(&mut table.bytes);
        table.clear_padding();
        table
    }

    /// ファイルから読み込む
    ///
    /// ファイルが無ければ乱数で初期化したテーブルを返す。
    /// それ以外の読み込み失敗とサイズ不一致はエラー。
    pub fn load<R: RngCore + ?Sized>(
        path: &Path,
        bit_count: usize,
        rng: &mut R,
    ) -> Result<RelationTable> {
        match Self::load_existing(path, bit_count)? {
            Some(table) => Ok(table),
            None => {
                log::info!(
                    "relation table {} not found, bootstrapping {} random bits",
                    path.display(),
                    bit_count
                );
                Ok(RelationTable::random(bit_count, rng))
            }
        }
    }

    /// 既存のファイルだけを読み込む（無ければ None）
    pub fn load_existing(path: &Path, bit_count: usize) -> Result<Option<RelationTable>> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let expected = byte_len(bit_count);
        if bytes.len() != expected {
            return Err(RelationError::TableSizeMismatch {
                path: path.to_path_buf(),
                expected: expected as u64,
                actual: bytes.len() as u64,
            });
        }

        let mut table = RelationTable {
            bytes,
            len: bit_count,
            dirty: false,
        };
        table.clear_padding();
        log::debug!("relation table {} loaded ({} bits)", path.display(), bit_count);
        Ok(Some(table))
    }

    /// ビット数
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 最後の保存以降に変更があったか
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index < self.len {
            Ok(())
        } else {
            Err(RelationError::IndexOutOfRange {
                what: "relation bit",
                index,
                size: self.len,
            })
        }
    }

    /// ビットを取得
    #[inline]
    pub fn get(&self, index: usize) -> Result<bool> {
        self.check(index)?;
        Ok(self.bytes[index / 8] & bit_mask(index) != 0)
    }

    /// ビットを設定し、値が実際に変わったかを返す
    #[inline]
    pub fn set(&mut self, index: usize, bit: bool) -> Result<bool> {
        self.check(index)?;
        let byte = &mut self.bytes[index / 8];
        let mask = bit_mask(index);
        if (*byte & mask != 0) == bit {
            return Ok(false);
        }
        *byte ^= mask;
        self.dirty = true;
        Ok(true)
    }

    /// 1 のビット数
    pub fn count_ones(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// 生のバイト列（ファイル表現と同一）
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 変更があればファイルに保存し、書き込んだかを返す
    ///
    /// 一時ファイルに書いてから rename するので、保存先が書きかけの状態で
    /// 観測されることはない。
    pub fn save(&mut self, path: &Path) -> Result<bool> {
        if !self.dirty {
            return Ok(false);
        }
        let tmp = temporary_path(path);
        fs::write(&tmp, &self.bytes)?;
        match fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::rename(&tmp, path)?;
        self.dirty = false;
        log::debug!("relation table {} saved ({} bits)", path.display(), self.len);
        Ok(true)
    }

    fn clear_padding(&mut self) {
        let used = self.len % 8;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }
    }
}

fn temporary_path(path: &Path) -> PathBuf {
    let pid = std::process::id();
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("bin");
    path.with_extension(format!("{ext}.tmp.{pid}"))
}
