use serde::{Deserialize, Serialize};

use crate::core::error::{RankingError, RankingResult};

/// 通知渠道引用（只携带排名需要的字段）
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRef {
    pub id: String,
    pub name: String,
    pub importance: i32,
}

impl ChannelRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>, importance: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            importance,
        }
    }
}

/// 延后提醒条件
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnoozeCriterion {
    pub id: String,
    pub explanation: String,
    pub confirmation: String,
}

impl SnoozeCriterion {
    pub fn new(
        id: impl Into<String>,
        explanation: impl Into<String>,
        confirmation: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            explanation: explanation.into(),
            confirmation: confirmation.into(),
        }
    }
}

/// 智能操作：标题 + 不透明的动作引用（由宿主解析）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmartAction {
    pub title: String,
    pub action_ref: String,
}

impl SmartAction {
    pub fn new(title: impl Into<String>, action_ref: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            action_ref: action_ref.into(),
        }
    }
}

/// 用户情绪三态
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserSentiment {
    Negative,
    #[default]
    Neutral,
    Positive,
}

impl UserSentiment {
    pub const WIRE_NEGATIVE: i32 = -1;
    pub const WIRE_NEUTRAL: i32 = 0;
    pub const WIRE_POSITIVE: i32 = 1;

    pub fn to_wire(self) -> i32 {
        match self {
            UserSentiment::Negative => Self::WIRE_NEGATIVE,
            UserSentiment::Neutral => Self::WIRE_NEUTRAL,
            UserSentiment::Positive => Self::WIRE_POSITIVE,
        }
    }

    /// 未知取值视为快照损坏，而不是静默回退到 Neutral。
    pub fn from_wire(v: i32) -> RankingResult<Self> {
        match v {
            Self::WIRE_NEGATIVE => Ok(UserSentiment::Negative),
            Self::WIRE_NEUTRAL => Ok(UserSentiment::Neutral),
            Self::WIRE_POSITIVE => Ok(UserSentiment::Positive),
            other => Err(RankingError::malformed(format!(
                "unknown user sentiment value {other}"
            ))),
        }
    }
}

/// 单个 key 的全部排名属性（内部强类型模型，一次查找拿齐所有字段）
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingAttributes {
    pub visibility_override: i32,
    /// bitmask
    pub suppressed_visual_effects: i32,
    pub override_group_key: Option<String>,
    pub importance: i32,
    pub importance_explanation: Option<String>,
    pub channel: ChannelRef,
    pub additional_people: Vec<String>,
    pub snooze_criteria: Vec<SnoozeCriterion>,
    pub show_badge: bool,
    pub user_sentiment: UserSentiment,
    pub is_suspended: bool,
    pub audibly_alerted: bool,
    pub smart_actions: Vec<SmartAction>,
    pub smart_replies: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentiment_wire_values_are_stable() {
        assert_eq!(UserSentiment::Negative.to_wire(), -1);
        assert_eq!(UserSentiment::Neutral.to_wire(), 0);
        assert_eq!(UserSentiment::Positive.to_wire(), 1);
        assert_eq!(UserSentiment::from_wire(1).unwrap(), UserSentiment::Positive);
    }

    #[test]
    fn unknown_sentiment_is_malformed() {
        let err = UserSentiment::from_wire(7).unwrap_err();
        assert!(err.is_malformed());
    }
}
