use std::collections::HashMap;

use crate::core::{RankingAttributes, RankingError, RankingResult, RankingSnapshot};
use crate::index::view::Ranking;
use crate::storage::wire::RankingUpdate;

/// 解码端的只读排名索引
///
/// - `positions`：key → rank，O(1) 定位
/// - `entries` / `intercepted`：按 rank 平铺，一次定位拿齐所有属性
///
/// 构造后不再修改，可被任意多个读者共享（由 `ListenerState` 以 `Arc` 持有）。
#[derive(Debug, Default)]
pub struct RankingIndex {
    ordered_keys: Vec<String>,
    positions: HashMap<String, usize>,
    entries: Vec<RankingAttributes>,
    intercepted: Vec<bool>,
}

impl RankingIndex {
    pub fn empty() -> Self {
        Self::default()
    }

    /// 从跨边界的 wire record 解码；record 可能被截断或损坏，因此完整重校验。
    pub fn decode(update: RankingUpdate) -> RankingResult<Self> {
        Self::decode_with_limit(update, usize::MAX)
    }

    pub fn decode_with_limit(update: RankingUpdate, max_keys: usize) -> RankingResult<Self> {
        if update.key_count() > max_keys {
            return Err(RankingError::malformed(format!(
                "{} ranked keys exceeds limit {}",
                update.key_count(),
                max_keys
            )));
        }
        let snap = RankingSnapshot::try_from(update)?;
        Self::from_snapshot(snap)
    }

    /// 单次线性扫描 ordered_keys 建立位置表。
    pub fn from_snapshot(snap: RankingSnapshot) -> RankingResult<Self> {
        let (ordered_keys, intercepted_set, mut attributes) = snap.into_parts();

        let n = ordered_keys.len();
        let mut positions = HashMap::with_capacity(n);
        let mut entries = Vec::with_capacity(n);
        let mut intercepted = Vec::with_capacity(n);

        for (rank, key) in ordered_keys.iter().enumerate() {
            if positions.insert(key.clone(), rank).is_some() {
                return Err(RankingError::malformed(format!("duplicate key {key:?}")));
            }
            let attrs = attributes
                .remove(key)
                .ok_or_else(|| RankingError::malformed(format!("no attributes for key {key:?}")))?;
            entries.push(attrs);
            intercepted.push(intercepted_set.contains(key));
        }

        Ok(Self {
            ordered_keys,
            positions,
            entries,
            intercepted,
        })
    }

    /// key 不存在返回 false，`out` 的内容此时无意义；存在则填满所有字段。
    pub fn lookup(&self, key: &str, out: &mut Ranking) -> bool {
        let Some(&rank) = self.positions.get(key) else {
            tracing::debug!("Ranking lookup miss: {:?}", key);
            return false;
        };
        out.populate(key, rank, self.intercepted[rank], &self.entries[rank]);
        true
    }

    /// 便捷版本：每次分配一个新的 `Ranking`
    pub fn get(&self, key: &str) -> Option<Ranking> {
        let mut out = Ranking::new();
        self.lookup(key, &mut out).then_some(out)
    }

    /// `Some(!intercepted)`；key 不存在时为 `None`（语义未定义，调用方应先判断存在性）
    pub fn matches_interruption_filter(&self, key: &str) -> Option<bool> {
        self.positions.get(key).map(|&rank| !self.intercepted[rank])
    }

    pub fn size(&self) -> usize {
        self.ordered_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_keys.is_empty()
    }

    pub fn key_at(&self, rank: usize) -> Option<&str> {
        self.ordered_keys.get(rank).map(String::as_str)
    }

    pub fn rank_of(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.positions.contains_key(key)
    }

    pub fn ordered_keys(&self) -> &[String] {
        &self.ordered_keys
    }

    pub fn intercepted_count(&self) -> usize {
        self.intercepted.iter().filter(|&&b| b).count()
    }
}
