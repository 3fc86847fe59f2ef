use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::config::ListenerConfig;
use crate::listener::ListenerState;

/// 更新泵退出时的汇总
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    pub applied: u64,
    pub rejected: u64,
}

/// 排名帧发送端（可 clone，多个生产者共用一个泵）
#[derive(Clone)]
pub struct UpdateSender {
    tx: mpsc::Sender<Vec<u8>>,
}

impl UpdateSender {
    /// channel 满时等待而不是丢弃：丢一帧就会让后续帧之间的顺序语义失效。
    pub async fn send(&self, frame: Vec<u8>) -> anyhow::Result<()> {
        self.tx
            .send(frame)
            .await
            .map_err(|_| anyhow::anyhow!("ranking update pump has stopped"))
    }
}

/// 单消费者更新泵：按 channel 顺序逐帧应用到 `ListenerState`
pub struct UpdatePump;

impl UpdatePump {
    /// channel 容量取自 `pump_capacity`
    pub fn from_config(
        state: Arc<ListenerState>,
        config: &ListenerConfig,
    ) -> (UpdateSender, JoinHandle<PumpReport>) {
        Self::spawn(state, config.pump_capacity)
    }

    /// 所有 `UpdateSender` drop 后任务结束，返回统计。
    pub fn spawn(
        state: Arc<ListenerState>,
        capacity: usize,
    ) -> (UpdateSender, JoinHandle<PumpReport>) {
        let (tx, mut rx) = mpsc::channel::<Vec<u8>>(capacity.max(1));

        let handle = tokio::spawn(async move {
            let mut report = PumpReport::default();
            while let Some(frame) = rx.recv().await {
                match state.apply_update_bytes(&frame) {
                    Ok(gen) => {
                        report.applied += 1;
                        tracing::debug!("Pump applied ranking frame: generation={}", gen);
                    }
                    Err(e) => {
                        report.rejected += 1;
                        tracing::warn!("Pump dropped ranking frame: {}", e);
                    }
                }
            }
            tracing::info!(
                "Ranking update pump stopped: applied={} rejected={}",
                report.applied,
                report.rejected
            );
            report
        });

        (UpdateSender { tx }, handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RankingAttributes, RankingSnapshot};
    use crate::storage::{encode_frame, RankingUpdate};

    fn frame(key: &str, v: i32) -> Vec<u8> {
        let snap = RankingSnapshot::builder()
            .push(
                key,
                RankingAttributes {
                    visibility_override: v,
                    ..Default::default()
                },
            )
            .build()
            .unwrap();
        encode_frame(&RankingUpdate::from_snapshot(&snap)).unwrap()
    }

    #[tokio::test]
    async fn frames_apply_in_send_order() {
        let state = Arc::new(ListenerState::default());
        let (tx, h) = UpdatePump::spawn(state.clone(), 2);

        for v in 0..10 {
            tx.send(frame("k", v)).await.unwrap();
        }
        drop(tx);

        let report = h.await.unwrap();
        assert_eq!(report.applied, 10);
        assert_eq!(report.rejected, 0);
        assert_eq!(state.generation(), 10);
        assert_eq!(
            state.current_ranking().get("k").unwrap().visibility_override(),
            9
        );
    }

    #[tokio::test]
    async fn pump_built_from_config_applies_in_order() {
        let cfg = ListenerConfig {
            pump_capacity: 1,
            ..ListenerConfig::default()
        };
        let state = Arc::new(ListenerState::new(&cfg));
        let (tx, h) = UpdatePump::from_config(state.clone(), &cfg);

        for v in 0..8 {
            tx.send(frame("k", v)).await.unwrap();
        }
        drop(tx);

        let report = h.await.unwrap();
        assert_eq!(report, PumpReport { applied: 8, rejected: 0 });
        assert_eq!(state.generation(), 8);
        assert_eq!(
            state.current_ranking().get("k").unwrap().visibility_override(),
            7
        );
    }

    #[tokio::test]
    async fn bad_frame_is_skipped_and_prior_state_kept() {
        let state = Arc::new(ListenerState::default());
        let (tx, h) = UpdatePump::spawn(state.clone(), 4);

        tx.send(frame("a", 1)).await.unwrap();
        tx.send(b"garbage".to_vec()).await.unwrap();
        drop(tx);

        let report = h.await.unwrap();
        assert_eq!(report, PumpReport { applied: 1, rejected: 1 });
        assert!(state.current_ranking().contains("a"));
        assert_eq!(state.stats().rejected, 1);
    }
}
