use std::collections::{HashMap, HashSet};

use crate::core::attributes::RankingAttributes;
use crate::core::error::{RankingError, RankingResult};
use crate::core::store::AttributeStores;

/// 一次排名更新的不可变快照（编码端）
///
/// 不变式：
/// - I1：`ordered_keys` 中每个 key 在每种属性里都恰有一条
/// - I2：`ordered_keys` 无重复
/// - I3：`intercepted` ⊆ `ordered_keys`
///
/// 构造后无任何修改 API；要变更只能重新 build。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankingSnapshot {
    ordered_keys: Vec<String>,
    intercepted: HashSet<String>,
    attributes: HashMap<String, RankingAttributes>,
}

impl RankingSnapshot {
    /// 从有序 key、拦截集合和十四个属性 store 组装快照。
    pub fn build(
        ordered_keys: Vec<String>,
        intercepted_keys: Vec<String>,
        stores: AttributeStores,
    ) -> RankingResult<Self> {
        let keys = check_ordered_keys(&ordered_keys)?;
        let intercepted = check_intercepted(&keys, intercepted_keys)?;
        let attributes = stores.into_attributes(&ordered_keys, &keys)?;
        Ok(Self {
            ordered_keys,
            intercepted,
            attributes,
        })
    }

    pub fn builder() -> RankingSnapshotBuilder {
        RankingSnapshotBuilder::default()
    }

    pub fn empty() -> Self {
        Self {
            ordered_keys: Vec::new(),
            intercepted: HashSet::new(),
            attributes: HashMap::new(),
        }
    }

    pub fn ordered_keys(&self) -> &[String] {
        &self.ordered_keys
    }

    pub fn is_intercepted(&self, key: &str) -> bool {
        self.intercepted.contains(key)
    }

    /// 拦截 key 按排名顺序返回（wire 上的顺序稳定）
    pub fn intercepted_keys(&self) -> impl Iterator<Item = &str> {
        self.ordered_keys
            .iter()
            .map(String::as_str)
            .filter(|k| self.intercepted.contains(*k))
    }

    pub fn intercepted_count(&self) -> usize {
        self.intercepted.len()
    }

    pub fn attributes(&self, key: &str) -> Option<&RankingAttributes> {
        self.attributes.get(key)
    }

    pub fn len(&self) -> usize {
        self.ordered_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_keys.is_empty()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<String>,
        HashSet<String>,
        HashMap<String, RankingAttributes>,
    ) {
        (self.ordered_keys, self.intercepted, self.attributes)
    }
}

/// I2：无重复，返回 key 集合供后续检查复用
fn check_ordered_keys(ordered_keys: &[String]) -> RankingResult<HashSet<&str>> {
    let mut keys = HashSet::with_capacity(ordered_keys.len());
    for k in ordered_keys {
        if !keys.insert(k.as_str()) {
            return Err(RankingError::malformed(format!("duplicate key {k:?}")));
        }
    }
    Ok(keys)
}

/// I3：拦截集合必须是 ordered_keys 的子集
fn check_intercepted(
    keys: &HashSet<&str>,
    intercepted_keys: Vec<String>,
) -> RankingResult<HashSet<String>> {
    let mut out = HashSet::with_capacity(intercepted_keys.len());
    for k in intercepted_keys {
        if !keys.contains(k.as_str()) {
            return Err(RankingError::malformed(format!(
                "intercepted key {k:?} is not ranked"
            )));
        }
        out.insert(k);
    }
    Ok(out)
}

/// 按 key 逐条组装快照；`build` 时走与 `RankingSnapshot::build` 相同的校验。
#[derive(Debug, Default)]
pub struct RankingSnapshotBuilder {
    ordered_keys: Vec<String>,
    intercepted_keys: Vec<String>,
    stores: AttributeStores,
}

impl RankingSnapshotBuilder {
    /// 追加到排名末尾
    pub fn push(mut self, key: impl Into<String>, attrs: RankingAttributes) -> Self {
        let key = key.into();
        self.stores.insert(&key, attrs);
        self.ordered_keys.push(key);
        self
    }

    pub fn intercept(mut self, key: impl Into<String>) -> Self {
        self.intercepted_keys.push(key.into());
        self
    }

    pub fn build(self) -> RankingResult<RankingSnapshot> {
        RankingSnapshot::build(self.ordered_keys, self.intercepted_keys, self.stores)
    }
}
