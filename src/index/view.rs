use serde::Serialize;

use crate::core::{ChannelRef, RankingAttributes, SmartAction, SnoozeCriterion, UserSentiment};

/// 单个通知的排名投影（可复用的 scratch 对象）
///
/// 由 `RankingIndex::lookup` 原地填充；list 字段用 `clone_from` 复用已有容量，
/// 同一个 `Ranking` 反复查询不会每次重新分配。
///
/// 背后的索引被替换后内容即过期，跨更新边界使用前必须重新 lookup。
/// lookup 返回 false 时字段内容无意义，调用方只看返回值。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Ranking {
    key: String,
    rank: usize,
    matches_interruption_filter: bool,
    visibility_override: i32,
    suppressed_visual_effects: i32,
    override_group_key: Option<String>,
    importance: i32,
    importance_explanation: Option<String>,
    channel: ChannelRef,
    additional_people: Vec<String>,
    snooze_criteria: Vec<SnoozeCriterion>,
    show_badge: bool,
    user_sentiment: UserSentiment,
    is_suspended: bool,
    audibly_alerted: bool,
    smart_actions: Vec<SmartAction>,
    smart_replies: Vec<String>,
}

impl Ranking {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn populate(
        &mut self,
        key: &str,
        rank: usize,
        intercepted: bool,
        a: &RankingAttributes,
    ) {
        self.key.clear();
        self.key.push_str(key);
        self.rank = rank;
        self.matches_interruption_filter = !intercepted;
        self.visibility_override = a.visibility_override;
        self.suppressed_visual_effects = a.suppressed_visual_effects;
        self.override_group_key.clone_from(&a.override_group_key);
        self.importance = a.importance;
        self.importance_explanation
            .clone_from(&a.importance_explanation);
        self.channel.clone_from(&a.channel);
        self.additional_people.clone_from(&a.additional_people);
        self.snooze_criteria.clone_from(&a.snooze_criteria);
        self.show_badge = a.show_badge;
        self.user_sentiment = a.user_sentiment;
        self.is_suspended = a.is_suspended;
        self.audibly_alerted = a.audibly_alerted;
        self.smart_actions.clone_from(&a.smart_actions);
        self.smart_replies.clone_from(&a.smart_replies);
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    /// false 表示该通知当前被打扰过滤策略拦截
    pub fn matches_interruption_filter(&self) -> bool {
        self.matches_interruption_filter
    }

    pub fn visibility_override(&self) -> i32 {
        self.visibility_override
    }

    pub fn suppressed_visual_effects(&self) -> i32 {
        self.suppressed_visual_effects
    }

    pub fn override_group_key(&self) -> Option<&str> {
        self.override_group_key.as_deref()
    }

    pub fn importance(&self) -> i32 {
        self.importance
    }

    pub fn importance_explanation(&self) -> Option<&str> {
        self.importance_explanation.as_deref()
    }

    pub fn channel(&self) -> &ChannelRef {
        &self.channel
    }

    pub fn additional_people(&self) -> &[String] {
        &self.additional_people
    }

    pub fn snooze_criteria(&self) -> &[SnoozeCriterion] {
        &self.snooze_criteria
    }

    pub fn can_show_badge(&self) -> bool {
        self.show_badge
    }

    pub fn user_sentiment(&self) -> UserSentiment {
        self.user_sentiment
    }

    pub fn is_suspended(&self) -> bool {
        self.is_suspended
    }

    pub fn audibly_alerted(&self) -> bool {
        self.audibly_alerted
    }

    pub fn smart_actions(&self) -> &[SmartAction] {
        &self.smart_actions
    }

    pub fn smart_replies(&self) -> &[String] {
        &self.smart_replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn populate_overwrites_previous_contents() {
        let mut view = Ranking::new();
        let long = RankingAttributes {
            additional_people: vec!["a".into(), "b".into(), "c".into()],
            override_group_key: Some("g".into()),
            ..Default::default()
        };
        view.populate("x", 3, true, &long);
        assert_eq!(view.additional_people().len(), 3);
        assert!(!view.matches_interruption_filter());

        let short = RankingAttributes {
            additional_people: vec!["z".into()],
            ..Default::default()
        };
        view.populate("y", 0, false, &short);
        assert_eq!(view.key(), "y");
        assert_eq!(view.rank(), 0);
        assert_eq!(view.additional_people(), ["z".to_string()]);
        assert_eq!(view.override_group_key(), None);
        assert!(view.matches_interruption_filter());
    }
}
