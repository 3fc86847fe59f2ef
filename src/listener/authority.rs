use serde::{Deserialize, Serialize};

/// 拉取活动通知时的裁剪级别
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trim {
    #[default]
    Full,
    /// 去掉大字段（图片、扩展内容），只保留排名和展示需要的部分
    Light,
}

/// 活动通知的轻量描述
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveNotification {
    pub key: String,
    pub package: String,
    pub id: i32,
    pub tag: Option<String>,
    pub post_time_ms: i64,
}

/// 远端通知权威方（跨进程的那一端）
///
/// 传输层不在本 crate 内；宿主提供实现，测试直接写 fake。
pub trait NotificationAuthority: Send + Sync {
    /// `keys = None` 表示全部活动通知。远端可能返回 `None`（对端语义里的 null）。
    fn active_notifications(
        &self,
        keys: Option<&[String]>,
        trim: Trim,
    ) -> anyhow::Result<Option<Vec<ActiveNotification>>>;

    /// 能力位：对端是否会推送排名更新
    fn supports_ranking_updates(&self) -> bool {
        true
    }
}
