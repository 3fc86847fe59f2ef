use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::config::ListenerConfig;
use crate::core::{RankingError, RankingResult};
use crate::index::{Ranking, RankingIndex};
use crate::stats::ListenerStats;
use crate::storage::{FrameCodec, RankingUpdate};

/// 监听端的"当前排名"槽位
///
/// 替换协议：
/// 1) 持写锁，把 update 解码成候选 `RankingIndex`；失败则整批拒绝，旧索引原样保留
/// 2) `ArcSwap::store` 原子切换，generation + 1，释放写锁
///
/// 读者只通过 `ArcSwap::load` 拿到某一代完整索引，看不到半更新状态。
/// 写锁只串行化写者（保证按调用顺序生效），从不阻塞读者。
pub struct ListenerState {
    current: ArcSwap<RankingIndex>,
    update_gate: Mutex<()>,
    codec: FrameCodec,
    max_keys: usize,
    generation: AtomicU64,
    applied: AtomicU64,
    rejected: AtomicU64,
}

impl Default for ListenerState {
    fn default() -> Self {
        Self::new(&ListenerConfig::default())
    }
}

impl ListenerState {
    pub fn new(config: &ListenerConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(RankingIndex::empty()),
            update_gate: Mutex::new(()),
            codec: FrameCodec::new(config.max_frame_bytes),
            max_keys: config.max_keys,
            generation: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// 应用一次排名更新，返回新 generation。
    pub fn apply_update(&self, update: RankingUpdate) -> RankingResult<u64> {
        let _g = self.update_gate.lock();
        self.apply_locked(update)
    }

    /// 先过帧校验再解码；任何一步失败都同样整批拒绝。
    pub fn apply_update_bytes(&self, frame: &[u8]) -> RankingResult<u64> {
        let _g = self.update_gate.lock();
        match self.codec.decode(frame) {
            Ok(update) => self.apply_locked(update),
            Err(e) => Err(self.reject(e)),
        }
    }

    fn apply_locked(&self, update: RankingUpdate) -> RankingResult<u64> {
        let candidate = RankingIndex::decode_with_limit(update, self.max_keys)
            .map_err(|e| self.reject(e))?;

        let keys = candidate.size();
        self.current.store(Arc::new(candidate));
        let gen = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.applied.fetch_add(1, Ordering::Relaxed);
        tracing::info!("Ranking installed: generation={} keys={}", gen, keys);
        Ok(gen)
    }

    fn reject(&self, e: RankingError) -> RankingError {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        tracing::warn!("Ranking update rejected, keeping previous ranking: {}", e);
        e
    }

    /// 当前整代索引；持有期间即使发生更新也保持自洽
    pub fn current_ranking(&self) -> Arc<RankingIndex> {
        self.current.load_full()
    }

    pub fn lookup(&self, key: &str, out: &mut Ranking) -> bool {
        self.current.load().lookup(key, out)
    }

    pub fn matches_interruption_filter(&self, key: &str) -> Option<bool> {
        self.current.load().matches_interruption_filter(key)
    }

    pub fn key_at(&self, rank: usize) -> Option<String> {
        self.current.load().key_at(rank).map(str::to_owned)
    }

    pub fn size(&self) -> usize {
        self.current.load().size()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    pub fn codec(&self) -> &FrameCodec {
        &self.codec
    }

    pub fn stats(&self) -> ListenerStats {
        let idx = self.current.load();
        ListenerStats {
            generation: self.generation(),
            applied: self.applied.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            key_count: idx.size(),
            intercepted_count: idx.intercepted_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RankingAttributes, RankingSnapshot, UserSentiment};
    use crate::storage::encode_frame;

    fn update_with(values: &[(&str, i32)]) -> RankingUpdate {
        let mut b = RankingSnapshot::builder();
        for (k, v) in values {
            b = b.push(
                *k,
                RankingAttributes {
                    visibility_override: *v,
                    user_sentiment: UserSentiment::Positive,
                    ..Default::default()
                },
            );
        }
        RankingUpdate::from_snapshot(&b.build().unwrap())
    }

    #[test]
    fn starts_empty() {
        let st = ListenerState::default();
        assert_eq!(st.size(), 0);
        assert_eq!(st.generation(), 0);
        assert!(!st.lookup("a", &mut Ranking::new()));
    }

    #[test]
    fn apply_installs_new_ranking() {
        let st = ListenerState::default();
        let gen = st.apply_update(update_with(&[("a", 1), ("b", 2)])).unwrap();
        assert_eq!(gen, 1);
        assert_eq!(st.key_at(1).as_deref(), Some("b"));

        let mut view = Ranking::new();
        assert!(st.lookup("b", &mut view));
        assert_eq!(view.visibility_override(), 2);
    }

    #[test]
    fn failed_update_keeps_previous_state() {
        let st = ListenerState::default();
        st.apply_update(update_with(&[("a", 1)])).unwrap();

        let mut bad = update_with(&[("a", 5), ("b", 6)]);
        bad.channel.take("b");
        assert!(st.apply_update(bad).unwrap_err().is_malformed());

        let mut view = Ranking::new();
        assert!(st.lookup("a", &mut view));
        assert_eq!(view.visibility_override(), 1);
        assert!(!st.lookup("b", &mut view));
        assert_eq!(st.generation(), 1);

        let s = st.stats();
        assert_eq!(s.applied, 1);
        assert_eq!(s.rejected, 1);
    }

    #[test]
    fn corrupt_frame_keeps_previous_state() {
        let st = ListenerState::default();
        st.apply_update_bytes(&encode_frame(&update_with(&[("a", 1)])).unwrap())
            .unwrap();

        let mut frame = encode_frame(&update_with(&[("a", 9)])).unwrap();
        let last = frame.len() - 1;
        frame[last] ^= 0x55;
        assert!(st.apply_update_bytes(&frame).is_err());

        assert_eq!(st.current_ranking().get("a").unwrap().visibility_override(), 1);
    }

    #[test]
    fn held_snapshot_is_not_torn_by_update() {
        let st = ListenerState::default();
        st.apply_update(update_with(&[("a", 1)])).unwrap();
        let held = st.current_ranking();

        st.apply_update(update_with(&[("b", 2)])).unwrap();

        assert!(held.contains("a"));
        assert!(!held.contains("b"));
        assert!(st.current_ranking().contains("b"));
        assert!(!st.current_ranking().contains("a"));
    }

    #[test]
    fn key_limit_from_config_is_enforced() {
        let cfg = ListenerConfig {
            max_keys: 1,
            ..ListenerConfig::default()
        };
        let st = ListenerState::new(&cfg);
        assert!(st.apply_update(update_with(&[("a", 1), ("b", 2)])).is_err());
        assert!(st.apply_update(update_with(&[("a", 1)])).is_ok());
    }

    #[test]
    fn codec_follows_configured_frame_limit() {
        let cfg = ListenerConfig {
            max_frame_bytes: 512,
            ..ListenerConfig::default()
        };
        let st = ListenerState::new(&cfg);
        assert_eq!(st.codec().max_frame_bytes(), 512);

        let big: Vec<(String, i32)> = (0..16).map(|i| (format!("key{i}"), i)).collect();
        let refs: Vec<(&str, i32)> = big.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        assert!(st.codec().encode(&update_with(&refs)).is_err());

        let small = st.codec().encode(&RankingUpdate::default()).unwrap();
        assert_eq!(st.apply_update_bytes(&small).unwrap(), 1);
    }

    #[test]
    fn concurrent_readers_see_whole_generations() {
        let st = Arc::new(ListenerState::default());
        st.apply_update(update_with(&[("a", 0), ("b", 0)])).unwrap();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let st = st.clone();
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        let idx = st.current_ranking();
                        let a = idx.get("a").unwrap().visibility_override();
                        let b = idx.get("b").unwrap().visibility_override();
                        assert_eq!(a, b);
                    }
                })
            })
            .collect();

        for v in 1..50 {
            st.apply_update(update_with(&[("a", v), ("b", v)])).unwrap();
        }
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(st.generation(), 50);
    }
}
