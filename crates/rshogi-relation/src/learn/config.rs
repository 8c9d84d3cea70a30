//! 学習設定ファイル
//!
//! 拡張子が `.yaml` / `.yml` なら YAML、それ以外は TOML として読む。
//! 学習ループは反復ごとに読み直すため、実行中に書き換えてよい。
//!
//! ```toml
//! [learn_rate]
//! numerator = 1
//! denominator = 4
//!
//! [short_mate_mode]
//! relay_move_number = 3
//! ```

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Deserialize;

use crate::policy::DEFAULT_TIER_RESOLUTION;

/// 設定読み込みエラー（いずれもリトライ対象）
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file {0} not found")]
    Missing(PathBuf),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid config {path}: {message}")]
    Invalid { path: PathBuf, message: String },
}

/// 候補手をフル探索する確率 `numerator / denominator`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LearnRate {
    pub numerator: u32,
    pub denominator: u32,
}

impl LearnRate {
    /// フル探索する候補手を抽選する（`validate` 済みであること）
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.random_ratio(self.numerator, self.denominator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShortMateMode {
    /// 短手数モードの延長手数
    pub relay_move_number: u32,
}

/// プレイアウトの延長手数（詰み手数に加算）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchExtension {
    #[serde(default = "default_attack")]
    pub attack: u32,
    #[serde(default = "default_escape")]
    pub escape: u32,
}

fn default_attack() -> u32 {
    10
}

fn default_escape() -> u32 {
    30
}

impl Default for SearchExtension {
    fn default() -> Self {
        Self {
            attack: default_attack(),
            escape: default_escape(),
        }
    }
}

/// テーブル保存の間隔
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Checkpoint {
    /// この詰み手数までは毎回保存する
    #[serde(default = "default_dense_until")]
    pub dense_until: usize,
    #[serde(default = "default_interval")]
    pub interval: usize,
}

fn default_dense_until() -> usize {
    4
}

fn default_interval() -> usize {
    20
}

impl Default for Checkpoint {
    fn default() -> Self {
        Self {
            dense_until: default_dense_until(),
            interval: default_interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    #[serde(default = "default_tier_resolution")]
    pub tier_resolution: usize,
}

fn default_tier_resolution() -> usize {
    DEFAULT_TIER_RESOLUTION
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            tier_resolution: default_tier_resolution(),
        }
    }
}

/// 学習設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LearnConfig {
    pub learn_rate: LearnRate,
    pub short_mate_mode: ShortMateMode,
    #[serde(default)]
    pub search_extension: SearchExtension,
    #[serde(default)]
    pub checkpoint: Checkpoint,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl LearnConfig {
    /// 既定値で組み立てる（テスト・ツール用）
    pub fn new(learn_rate: LearnRate, relay_move_number: u32) -> LearnConfig {
        LearnConfig {
            learn_rate,
            short_mate_mode: ShortMateMode { relay_move_number },
            search_extension: SearchExtension::default(),
            checkpoint: Checkpoint::default(),
            policy: PolicyConfig::default(),
        }
    }

    /// ファイルから読み込んで検証する
    pub fn load(path: &Path) -> Result<LearnConfig, ConfigError> {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::Missing(path.to_path_buf()));
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let ext = path.extension().and_then(|s| s.to_str()).map(|s| s.to_ascii_lowercase());
        let parsed = match ext.as_deref() {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str::<LearnConfig>(&data).map_err(|e| e.to_string())
            }
            _ => toml::from_str::<LearnConfig>(&data).map_err(|e| e.to_string()),
        };
        let config = parsed.map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        config.validate().map_err(|message| ConfigError::Invalid {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        let rate = &self.learn_rate;
        if rate.denominator == 0 {
            return Err("learn_rate.denominator must be positive".to_string());
        }
        if rate.numerator > rate.denominator {
            return Err(format!(
                "learn_rate.numerator ({}) exceeds denominator ({})",
                rate.numerator, rate.denominator
            ));
        }
        if self.checkpoint.interval == 0 {
            return Err("checkpoint.interval must be positive".to_string());
        }
        if self.policy.tier_resolution == 0 {
            return Err("policy.tier_resolution must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_load_toml_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "learn.toml",
            "[learn_rate]\nnumerator = 1\ndenominator = 4\n\n[short_mate_mode]\nrelay_move_number = 3\n",
        );
        let config = LearnConfig::load(&path).unwrap();
        assert_eq!(config, LearnConfig::new(LearnRate { numerator: 1, denominator: 4 }, 3));
        assert_eq!(config.search_extension.attack, 10);
        assert_eq!(config.search_extension.escape, 30);
        assert_eq!(config.checkpoint.dense_until, 4);
        assert_eq!(config.checkpoint.interval, 20);
        assert_eq!(config.policy.tier_resolution, 10);
    }

    #[test]
    fn test_load_yaml_overrides() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "learn.yaml",
            "learn_rate:\n  numerator: 2\n  denominator: 3\nshort_mate_mode:\n  relay_move_number: 5\nsearch_extension:\n  escape: 12\ncheckpoint:\n  interval: 7\n",
        );
        let config = LearnConfig::load(&path).unwrap();
        assert_eq!(config.learn_rate, LearnRate { numerator: 2, denominator: 3 });
        assert_eq!(config.short_mate_mode.relay_move_number, 5);
        assert_eq!(config.search_extension.attack, 10);
        assert_eq!(config.search_extension.escape, 12);
        assert_eq!(config.checkpoint.dense_until, 4);
        assert_eq!(config.checkpoint.interval, 7);
    }

    #[test]
    fn test_load_missing() {
        let dir = TempDir::new().unwrap();
        let err = LearnConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_load_rejects_unknown_and_missing_keys() {
        let dir = TempDir::new().unwrap();
        let unknown = write(
            &dir,
            "unknown.toml",
            "[learn_rate]\nnumerator = 1\ndenominator = 4\nspeed = 9\n\n[short_mate_mode]\nrelay_move_number = 3\n",
        );
        assert!(matches!(LearnConfig::load(&unknown), Err(ConfigError::Parse { .. })));

        let missing = write(&dir, "missing.toml", "[learn_rate]\nnumerator = 1\ndenominator = 4\n");
        assert!(matches!(LearnConfig::load(&missing), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_rejects_invalid_rate() {
        let dir = TempDir::new().unwrap();
        let zero = write(
            &dir,
            "zero.toml",
            "[learn_rate]\nnumerator = 0\ndenominator = 0\n\n[short_mate_mode]\nrelay_move_number = 3\n",
        );
        assert!(matches!(LearnConfig::load(&zero), Err(ConfigError::Invalid { .. })));

        let over = write(
            &dir,
            "over.toml",
            "[learn_rate]\nnumerator = 5\ndenominator = 4\n\n[short_mate_mode]\nrelay_move_number = 3\n",
        );
        let err = LearnConfig::load(&over).unwrap_err();
        assert!(err.to_string().contains("exceeds denominator"), "{err}");
    }

    #[test]
    fn test_sample_extremes() {
        use rand::SeedableRng;
        let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(3);
        let never = LearnRate { numerator: 0, denominator: 4 };
        let always = LearnRate { numerator: 4, denominator: 4 };
        for _ in 0..100 {
            assert!(!never.sample(&mut rng));
            assert!(always.sample(&mut rng));
        }
    }
}
