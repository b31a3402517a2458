use serde::{Deserialize, Serialize};

use super::CleanName;

/// 从搜索结果中提取哪个字段作为关注目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierField {
    /// `profileId` 字段
    #[default]
    ProfileId,
    /// `handle` 字段
    Handle,
}

impl IdentifierField {
    /// 响应 JSON 中对应的字段名
    pub fn json_key(self) -> &'static str {
        match self {
            IdentifierField::ProfileId => "profileId",
            IdentifierField::Handle => "handle",
        }
    }
}

/// 搜索命中的一个账号
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileMatch {
    /// 用于关注的标识（profileId 或 handle）
    pub identifier: String,
    /// 产生该结果的搜索名字
    pub source_name: CleanName,
}

impl ProfileMatch {
    pub fn new(identifier: impl Into<String>, source_name: CleanName) -> Self {
        Self {
            identifier: identifier.into(),
            source_name,
        }
    }
}
