use thiserror::Error;

/// 排名快照链路上的错误
///
/// - `MalformedSnapshot`：违反 I1–I3 或 record 形状不对，不可重试，整批丢弃
/// - `Frame`：跨进程字节帧损坏（magic/version/长度/checksum/bincode）
/// - `Authority`：远端通知权威方调用失败
///
/// 注意：key 不存在不是错误，由 `lookup` 的 bool / `Option` 返回值表达。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RankingError {
    #[error("malformed ranking snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    #[error("invalid ranking frame: {0}")]
    Frame(String),

    #[error("notification authority failed: {0}")]
    Authority(String),
}

impl RankingError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedSnapshot {
            reason: reason.into(),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedSnapshot { .. })
    }
}

pub type RankingResult<T> = Result<T, RankingError>;
