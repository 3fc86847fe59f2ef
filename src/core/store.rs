use std::collections::hash_map;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::core::attributes::{
    ChannelRef, RankingAttributes, SmartAction, SnoozeCriterion, UserSentiment,
};
use crate::core::error::{RankingError, RankingResult};

/// 单一属性的 key → value 容器（每种属性一个实例）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeStore<T> {
    inner: HashMap<String, T>,
}

impl<T> Default for AttributeStore<T> {
    fn default() -> Self {
        Self {
            inner: HashMap::new(),
        }
    }
}

impl<T> AttributeStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            inner: HashMap::with_capacity(cap),
        }
    }

    /// 返回被覆盖的旧值（若有）
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> Option<T> {
        self.inner.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.inner.get(key)
    }

    pub fn take(&mut self, key: &str) -> Option<T> {
        self.inner.remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, T> {
        self.inner.iter()
    }

    /// I1 检查：恰好覆盖 `keys`，不多不少。
    fn require_exact(&self, name: &str, ordered: &[String], keys: &HashSet<&str>) -> RankingResult<()> {
        if let Some(missing) = ordered.iter().find(|k| !self.inner.contains_key(k.as_str())) {
            return Err(RankingError::malformed(format!(
                "{name}: missing entry for key {missing:?}"
            )));
        }
        if self.inner.len() != keys.len() {
            let stray = self
                .inner
                .keys()
                .find(|k| !keys.contains(k.as_str()))
                .cloned()
                .unwrap_or_default();
            return Err(RankingError::malformed(format!(
                "{name}: entry for unlisted key {stray:?}"
            )));
        }
        Ok(())
    }

    fn take_required(&mut self, name: &str, key: &str) -> RankingResult<T> {
        self.take(key)
            .ok_or_else(|| RankingError::malformed(format!("{name}: missing entry for key {key:?}")))
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for AttributeStore<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self {
            inner: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// 十四种属性的扁平化存储（编码端输入 / wire 适配层的中间形态）
///
/// `importance` 在这里按 key 索引；按位置索引只存在于 wire record。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeStores {
    pub visibility_override: AttributeStore<i32>,
    pub suppressed_visual_effects: AttributeStore<i32>,
    pub override_group_key: AttributeStore<Option<String>>,
    pub importance: AttributeStore<i32>,
    pub importance_explanation: AttributeStore<Option<String>>,
    pub channel: AttributeStore<ChannelRef>,
    pub additional_people: AttributeStore<Vec<String>>,
    pub snooze_criteria: AttributeStore<Vec<SnoozeCriterion>>,
    pub show_badge: AttributeStore<bool>,
    pub user_sentiment: AttributeStore<UserSentiment>,
    pub is_suspended: AttributeStore<bool>,
    pub audibly_alerted: AttributeStore<bool>,
    pub smart_actions: AttributeStore<Vec<SmartAction>>,
    pub smart_replies: AttributeStore<Vec<String>>,
}

impl AttributeStores {
    pub fn new() -> Self {
        Self::default()
    }

    /// 把一个 key 的复合属性拆进各个 store
    pub fn insert(&mut self, key: &str, attrs: RankingAttributes) {
        self.visibility_override.insert(key, attrs.visibility_override);
        self.suppressed_visual_effects
            .insert(key, attrs.suppressed_visual_effects);
        self.override_group_key.insert(key, attrs.override_group_key);
        self.importance.insert(key, attrs.importance);
        self.importance_explanation
            .insert(key, attrs.importance_explanation);
        self.channel.insert(key, attrs.channel);
        self.additional_people.insert(key, attrs.additional_people);
        self.snooze_criteria.insert(key, attrs.snooze_criteria);
        self.show_badge.insert(key, attrs.show_badge);
        self.user_sentiment.insert(key, attrs.user_sentiment);
        self.is_suspended.insert(key, attrs.is_suspended);
        self.audibly_alerted.insert(key, attrs.audibly_alerted);
        self.smart_actions.insert(key, attrs.smart_actions);
        self.smart_replies.insert(key, attrs.smart_replies);
    }

    /// 校验 I1 后按 key 重新聚合为复合结构；任何缺失/多余条目都会整体失败。
    pub(crate) fn into_attributes(
        mut self,
        ordered: &[String],
        keys: &HashSet<&str>,
    ) -> RankingResult<HashMap<String, RankingAttributes>> {
        self.visibility_override
            .require_exact("visibility_override", ordered, keys)?;
        self.suppressed_visual_effects
            .require_exact("suppressed_visual_effects", ordered, keys)?;
        self.override_group_key
            .require_exact("override_group_key", ordered, keys)?;
        self.importance.require_exact("importance", ordered, keys)?;
        self.importance_explanation
            .require_exact("importance_explanation", ordered, keys)?;
        self.channel.require_exact("channel", ordered, keys)?;
        self.additional_people
            .require_exact("additional_people", ordered, keys)?;
        self.snooze_criteria
            .require_exact("snooze_criteria", ordered, keys)?;
        self.show_badge.require_exact("show_badge", ordered, keys)?;
        self.user_sentiment
            .require_exact("user_sentiment", ordered, keys)?;
        self.is_suspended.require_exact("is_suspended", ordered, keys)?;
        self.audibly_alerted
            .require_exact("audibly_alerted", ordered, keys)?;
        self.smart_actions.require_exact("smart_actions", ordered, keys)?;
        self.smart_replies.require_exact("smart_replies", ordered, keys)?;

        let mut out = HashMap::with_capacity(ordered.len());
        for key in ordered {
            let k = key.as_str();
            let attrs = RankingAttributes {
                visibility_override: self
                    .visibility_override
                    .take_required("visibility_override", k)?,
                suppressed_visual_effects: self
                    .suppressed_visual_effects
                    .take_required("suppressed_visual_effects", k)?,
                override_group_key: self
                    .override_group_key
                    .take_required("override_group_key", k)?,
                importance: self.importance.take_required("importance", k)?,
                importance_explanation: self
                    .importance_explanation
                    .take_required("importance_explanation", k)?,
                channel: self.channel.take_required("channel", k)?,
                additional_people: self
                    .additional_people
                    .take_required("additional_people", k)?,
                snooze_criteria: self.snooze_criteria.take_required("snooze_criteria", k)?,
                show_badge: self.show_badge.take_required("show_badge", k)?,
                user_sentiment: self.user_sentiment.take_required("user_sentiment", k)?,
                is_suspended: self.is_suspended.take_required("is_suspended", k)?,
                audibly_alerted: self.audibly_alerted.take_required("audibly_alerted", k)?,
                smart_actions: self.smart_actions.take_required("smart_actions", k)?,
                smart_replies: self.smart_replies.take_required("smart_replies", k)?,
            };
            out.insert(key.clone(), attrs);
        }
        Ok(out)
    }
}
