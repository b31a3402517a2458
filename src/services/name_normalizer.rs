//! 名字清洗服务
//!
//! 只负责把原始输入行变成去重后的 [`CleanName`] 列表，不关心搜索和关注

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::models::CleanName;

/// 去重方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupMode {
    /// "Alice" 与 "alice" 视为不同名字
    #[default]
    CaseSensitive,
    /// 忽略大小写，保留第一次出现的写法
    CaseInsensitive,
}

/// 清洗结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedNames {
    /// 去重后的名字，顺序为首次出现顺序
    pub names: Vec<CleanName>,
    /// 输入行数
    pub raw_count: usize,
    /// 因重复被跳过的行数
    pub duplicates: usize,
    /// 清洗后为空的行数
    pub invalid: usize,
}

/// 名字清洗器
pub struct NameNormalizer {
    mode: DedupMode,
}

impl NameNormalizer {
    pub fn new(mode: DedupMode) -> Self {
        Self { mode }
    }

    /// 清洗并去重
    pub fn normalize<I, S>(&self, lines: I) -> NormalizedNames
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut result = NormalizedNames::default();

        for line in lines {
            let raw = line.as_ref();
            result.raw_count += 1;

            let Some(name) = CleanName::from_raw(raw) else {
                debug!("跳过清洗后为空的名字: '{}'", raw);
                result.invalid += 1;
                continue;
            };

            let key = match self.mode {
                DedupMode::CaseSensitive => name.as_str().to_string(),
                DedupMode::CaseInsensitive => name.fold_key(),
            };

            if seen.insert(key) {
                debug!("清洗 '{}' -> '{}'", raw, name);
                result.names.push(name);
            } else {
                info!("跳过重复名字: '{}' (原始: '{}')", name, raw);
                result.duplicates += 1;
            }
        }

        result
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::new(DedupMode::default())
    }
}
