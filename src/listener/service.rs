use std::sync::Arc;

use crate::core::{RankingError, RankingResult};
use crate::index::RankingIndex;
use crate::listener::authority::{ActiveNotification, NotificationAuthority, Trim};
use crate::listener::state::ListenerState;

/// 监听端客户端：组合远端权威方与本地排名状态
pub struct ListenerService<A: NotificationAuthority> {
    state: Arc<ListenerState>,
    authority: Arc<A>,
}

impl<A: NotificationAuthority> ListenerService<A> {
    pub fn new(state: Arc<ListenerState>, authority: Arc<A>) -> Self {
        Self { state, authority }
    }

    pub fn state(&self) -> &Arc<ListenerState> {
        &self.state
    }

    pub fn authority(&self) -> &Arc<A> {
        &self.authority
    }

    pub fn active_notifications(&self) -> Vec<ActiveNotification> {
        self.fetch(None, Trim::Full)
    }

    pub fn active_notifications_trimmed(&self, trim: Trim) -> Vec<ActiveNotification> {
        self.fetch(None, trim)
    }

    pub fn active_notifications_for(&self, keys: &[String]) -> Vec<ActiveNotification> {
        self.fetch(Some(keys), Trim::Full)
    }

    pub fn active_notifications_for_trimmed(
        &self,
        keys: &[String],
        trim: Trim,
    ) -> Vec<ActiveNotification> {
        self.fetch(Some(keys), trim)
    }

    /// 永不返回"空引用"：远端返回 None 或调用失败都折叠成空列表。
    fn fetch(&self, keys: Option<&[String]>, trim: Trim) -> Vec<ActiveNotification> {
        match self.authority.active_notifications(keys, trim) {
            Ok(Some(v)) => v,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to fetch active notifications: {:#}", e);
                Vec::new()
            }
        }
    }

    /// 收到一帧排名更新
    pub fn on_ranking_update(&self, frame: &[u8]) -> RankingResult<u64> {
        if !self.authority.supports_ranking_updates() {
            return Err(RankingError::Authority(
                "authority does not deliver ranking updates".into(),
            ));
        }
        self.state.apply_update_bytes(frame)
    }

    pub fn current_ranking(&self) -> Arc<RankingIndex> {
        self.state.current_ranking()
    }
}
