//! 有序分布表
//!
//! 组卷时按分布表中键的书写顺序依次处理各个分桶，因此这里不用 HashMap，
//! 而是保存 `(键, 百分比)` 的有序列表。反序列化时按文档顺序读取表中的键值对。

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// 有序的 `(键, 百分比)` 分布
///
/// 键是自由字符串，不在已知取值中的键不会匹配任何题目；百分比不做校验，
/// 也不要求总和为 100。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    entries: Vec<(String, f64)>,
}

impl Distribution {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个分桶；重复的键会作为独立条目保留
    pub fn with(mut self, key: impl Into<String>, percentage: f64) -> Self {
        self.entries.push((key.into(), percentage));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(key, pct)| (key.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 百分比之和（仅用于日志提示）
    pub fn total_percentage(&self) -> f64 {
        self.entries.iter().map(|(_, pct)| pct).sum()
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|(key, pct)| format!("{}:{}", key, pct))
            .collect();
        write!(f, "{{{}}}", parts.join(", "))
    }
}

impl Serialize for Distribution {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, pct) in &self.entries {
            map.serialize_entry(key, pct)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Distribution {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DistributionVisitor;

        impl<'de> Visitor<'de> for DistributionVisitor {
            type Value = Distribution;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a table mapping keys to percentages")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, pct)) = access.next_entry::<String, f64>()? {
                    entries.push((key, pct));
                }
                Ok(Distribution { entries })
            }
        }

        deserializer.deserialize_map(DistributionVisitor)
    }
}
