use std::fmt::{self, Display};

/// 清洗后的名字
///
/// 只包含 ASCII 字母，保留原始大小写。只能通过
/// [`CleanName::from_raw`] 构造，因此不会出现空值或非字母字符。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CleanName(String);

impl CleanName {
    /// 从原始输入行清洗出名字
    ///
    /// 去掉所有非 ASCII 字母字符；清洗后为空则返回 `None`
    pub fn from_raw(raw: &str) -> Option<Self> {
        let cleaned: String = raw
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();

        if cleaned.is_empty() {
            None
        } else {
            Some(Self(cleaned))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 大小写不敏感去重时使用的键
    pub fn fold_key(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl AsRef<str> for CleanName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CleanName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
