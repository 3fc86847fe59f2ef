use serde::{Deserialize, Serialize};

use crate::core::{
    AttributeStore, AttributeStores, ChannelRef, RankingError, RankingResult, RankingSnapshot,
    SmartAction, SnoozeCriterion, UserSentiment,
};

/// 跨进程传输的扁平排名记录（字段顺序即线格式顺序，勿调整）
///
/// 注意 `importance` 的不对称：它是与 `ordered_keys` 平行的按位置序列，
/// 其余属性都按 key 索引。这是对端协议的既有约定，下游依赖这种对齐方式，
/// 不要"顺手修正"。
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingUpdate {
    pub ordered_keys: Vec<String>,
    pub intercepted_keys: Vec<String>,
    pub visibility_override: AttributeStore<i32>,
    pub suppressed_visual_effects: AttributeStore<i32>,
    pub importance: Vec<i32>,
    pub importance_explanation: AttributeStore<Option<String>>,
    pub override_group_key: AttributeStore<Option<String>>,
    pub channel: AttributeStore<ChannelRef>,
    pub additional_people: AttributeStore<Vec<String>>,
    pub snooze_criteria: AttributeStore<Vec<SnoozeCriterion>>,
    pub show_badge: AttributeStore<bool>,
    pub user_sentiment: AttributeStore<i32>,
    pub is_suspended: AttributeStore<bool>,
    pub smart_actions: AttributeStore<Vec<SmartAction>>,
    pub smart_replies: AttributeStore<Vec<String>>,
    pub audibly_alerted: AttributeStore<bool>,
}

impl RankingUpdate {
    /// 编码端：把强类型快照拍平成 wire record
    pub fn from_snapshot(snap: &RankingSnapshot) -> Self {
        let n = snap.len();
        let mut out = RankingUpdate {
            ordered_keys: snap.ordered_keys().to_vec(),
            intercepted_keys: snap.intercepted_keys().map(str::to_owned).collect(),
            importance: Vec::with_capacity(n),
            visibility_override: AttributeStore::with_capacity(n),
            suppressed_visual_effects: AttributeStore::with_capacity(n),
            importance_explanation: AttributeStore::with_capacity(n),
            override_group_key: AttributeStore::with_capacity(n),
            channel: AttributeStore::with_capacity(n),
            additional_people: AttributeStore::with_capacity(n),
            snooze_criteria: AttributeStore::with_capacity(n),
            show_badge: AttributeStore::with_capacity(n),
            user_sentiment: AttributeStore::with_capacity(n),
            is_suspended: AttributeStore::with_capacity(n),
            smart_actions: AttributeStore::with_capacity(n),
            smart_replies: AttributeStore::with_capacity(n),
            audibly_alerted: AttributeStore::with_capacity(n),
        };

        for key in snap.ordered_keys() {
            // 快照构造时已保证 I1，这里一定命中
            let Some(a) = snap.attributes(key) else {
                continue;
            };
            let k = key.as_str();
            out.visibility_override.insert(k, a.visibility_override);
            out.suppressed_visual_effects
                .insert(k, a.suppressed_visual_effects);
            out.importance.push(a.importance);
            out.importance_explanation
                .insert(k, a.importance_explanation.clone());
            out.override_group_key.insert(k, a.override_group_key.clone());
            out.channel.insert(k, a.channel.clone());
            out.additional_people.insert(k, a.additional_people.clone());
            out.snooze_criteria.insert(k, a.snooze_criteria.clone());
            out.show_badge.insert(k, a.show_badge);
            out.user_sentiment.insert(k, a.user_sentiment.to_wire());
            out.is_suspended.insert(k, a.is_suspended);
            out.smart_actions.insert(k, a.smart_actions.clone());
            out.smart_replies.insert(k, a.smart_replies.clone());
            out.audibly_alerted.insert(k, a.audibly_alerted);
        }
        out
    }

    pub fn key_count(&self) -> usize {
        self.ordered_keys.len()
    }
}

impl TryFrom<RankingUpdate> for RankingSnapshot {
    type Error = RankingError;

    /// 解码端：还原为按 key 聚合的快照，并完整重跑 I1–I3 校验。
    fn try_from(u: RankingUpdate) -> RankingResult<Self> {
        if u.importance.len() != u.ordered_keys.len() {
            return Err(RankingError::malformed(format!(
                "importance has {} entries for {} ranked keys",
                u.importance.len(),
                u.ordered_keys.len()
            )));
        }

        // 按位置的 importance 经 ordered_keys[i] 对齐到 key
        let importance: AttributeStore<i32> = u
            .ordered_keys
            .iter()
            .cloned()
            .zip(u.importance.iter().copied())
            .collect();

        let mut user_sentiment = AttributeStore::with_capacity(u.user_sentiment.len());
        for (k, v) in u.user_sentiment.iter() {
            user_sentiment.insert(k.as_str(), UserSentiment::from_wire(*v)?);
        }

        let stores = AttributeStores {
            visibility_override: u.visibility_override,
            suppressed_visual_effects: u.suppressed_visual_effects,
            override_group_key: u.override_group_key,
            importance,
            importance_explanation: u.importance_explanation,
            channel: u.channel,
            additional_people: u.additional_people,
            snooze_criteria: u.snooze_criteria,
            show_badge: u.show_badge,
            user_sentiment,
            is_suspended: u.is_suspended,
            audibly_alerted: u.audibly_alerted,
            smart_actions: u.smart_actions,
            smart_replies: u.smart_replies,
        };

        RankingSnapshot::build(u.ordered_keys, u.intercepted_keys, stores)
    }
}

impl From<&RankingSnapshot> for RankingUpdate {
    fn from(snap: &RankingSnapshot) -> Self {
        RankingUpdate::from_snapshot(snap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RankingAttributes;

    fn snap() -> RankingSnapshot {
        RankingSnapshot::builder()
            .push(
                "first",
                RankingAttributes {
                    importance: 4,
                    user_sentiment: UserSentiment::Negative,
                    ..Default::default()
                },
            )
            .push(
                "second",
                RankingAttributes {
                    importance: 1,
                    importance_explanation: Some(String::new()),
                    ..Default::default()
                },
            )
            .intercept("second")
            .build()
            .unwrap()
    }

    #[test]
    fn importance_is_positional_on_the_wire() {
        let u = RankingUpdate::from_snapshot(&snap());
        assert_eq!(u.importance, vec![4, 1]);
        assert_eq!(u.intercepted_keys, vec!["second".to_string()]);
        assert_eq!(u.user_sentiment.get("first"), Some(&-1));
    }

    #[test]
    fn positional_importance_realigns_by_key() {
        let back = RankingSnapshot::try_from(RankingUpdate::from_snapshot(&snap())).unwrap();
        assert_eq!(back.attributes("first").unwrap().importance, 4);
        assert_eq!(back.attributes("second").unwrap().importance, 1);
        // 空串与缺省保持区分
        assert_eq!(
            back.attributes("second").unwrap().importance_explanation,
            Some(String::new())
        );
        assert_eq!(back.attributes("first").unwrap().importance_explanation, None);
    }

    #[test]
    fn short_importance_sequence_is_malformed() {
        let mut u = RankingUpdate::from_snapshot(&snap());
        u.importance.pop();
        assert!(RankingSnapshot::try_from(u).unwrap_err().is_malformed());
    }

    #[test]
    fn missing_keyed_entry_is_malformed() {
        let mut u = RankingUpdate::from_snapshot(&snap());
        u.audibly_alerted.take("second");
        assert!(RankingSnapshot::try_from(u).unwrap_err().is_malformed());
    }

    #[test]
    fn unknown_sentiment_is_malformed() {
        let mut u = RankingUpdate::from_snapshot(&snap());
        u.user_sentiment.insert("first", 42);
        assert!(RankingSnapshot::try_from(u).unwrap_err().is_malformed());
    }
}
