use crate::core::{
    ChannelRef, RankingAttributes, RankingResult, RankingSnapshot, SmartAction, SnoozeCriterion,
    UserSentiment,
};

/// 演示/自检用的默认 key 集合
pub const DEMO_KEYS: [&str; 4] = ["key", "key1", "key2", "key3"];

/// 第 `i` 名通知的确定性属性：每个字段都由 key 和 rank 推出，便于比对。
pub fn demo_attributes(key: &str, i: usize) -> RankingAttributes {
    let rank = i as i32;
    RankingAttributes {
        visibility_override: 9 * rank,
        suppressed_visual_effects: 2 * rank,
        override_group_key: Some(format!("{key}{key}")),
        importance: rank,
        importance_explanation: Some(format!("{key}explain")),
        channel: ChannelRef::new(key, key, rank),
        additional_people: (0..i).map(|j| format!("{j}{key}")).collect(),
        snooze_criteria: (0..i)
            .map(|j| SnoozeCriterion::new(format!("{key}{j}"), format!("{key}explain"), key))
            .collect(),
        show_badge: i % 3 == 0,
        user_sentiment: match i % 3 {
            0 => UserSentiment::Negative,
            1 => UserSentiment::Neutral,
            _ => UserSentiment::Positive,
        },
        is_suspended: i % 2 == 0,
        audibly_alerted: i < 2,
        smart_actions: (0..i)
            .map(|_| SmartAction::new(key, format!("ACTION_{key}")))
            .collect(),
        smart_replies: (0..i).map(|j| format!("choice_{key}_{j}")).collect(),
    }
}

/// 偶数名次被拦截
pub fn demo_snapshot(keys: &[&str]) -> RankingResult<RankingSnapshot> {
    let mut b = RankingSnapshot::builder();
    for (i, key) in keys.iter().enumerate() {
        b = b.push(*key, demo_attributes(key, i));
        if i % 2 == 0 {
            b = b.intercept(*key);
        }
    }
    b.build()
}
