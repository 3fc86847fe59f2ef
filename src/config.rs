use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::DEFAULT_MAX_FRAME_BYTES;

/// 监听端配置（TOML）
///
/// ```toml
/// max_keys = 10000
/// max_frame_bytes = 16777216
/// pump_capacity = 64
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// 单个快照允许的最大 key 数，超出按损坏快照拒绝
    pub max_keys: usize,
    pub max_frame_bytes: usize,
    /// 更新泵 channel 容量（满了就让发送方等待，不丢弃）
    pub pump_capacity: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            max_keys: 10_000,
            max_frame_bytes: DEFAULT_MAX_FRAME_BYTES,
            pump_capacity: 64,
        }
    }
}

impl ListenerConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("notif-rank").join("config.toml"))
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let cfg: ListenerConfig = toml::from_str(&text)?;
        if cfg.pump_capacity == 0 {
            anyhow::bail!("pump_capacity must be > 0 ({})", path.display());
        }
        Ok(cfg)
    }

    /// 显式路径必须可读；未指定时尝试默认路径，不存在则用默认值。
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(p) = path {
            return Self::load(p);
        }
        match Self::default_path() {
            Some(p) if p.exists() => {
                tracing::info!("Loading config from {}", p.display());
                Self::load(&p)
            }
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unique_tmp_dir(tag: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("notif-rank-{}-{}", tag, nanos))
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let dir = unique_tmp_dir("cfg");
        std::fs::create_dir_all(&dir).unwrap();
        let p = dir.join("config.toml");
        std::fs::write(&p, "max_keys = 12\n").unwrap();

        let cfg = ListenerConfig::load(&p).unwrap();
        assert_eq!(cfg.max_keys, 12);
        assert_eq!(cfg.max_frame_bytes, DEFAULT_MAX_FRAME_BYTES);
        assert_eq!(cfg.pump_capacity, 64);
    }

    #[test]
    fn zero_pump_capacity_is_rejected() {
        let dir = unique_tmp_dir("cfg-zero");
        std::fs::create_dir_all(&dir).unwrap();
        let p = dir.join("config.toml");
        std::fs::write(&p, "pump_capacity = 0\n").unwrap();
        assert!(ListenerConfig::load(&p).is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let p = unique_tmp_dir("cfg-missing").join("nope.toml");
        assert!(ListenerConfig::load_or_default(Some(&p)).is_err());
    }
}
