use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::models::IdentifierField;
use crate::orchestrator::{Pacing, RateLimitPolicy};
use crate::services::DedupMode;

/// 令牌占位符，原样出现时视为未配置
pub const TOKEN_PLACEHOLDER: &str = "YOUR_FRESH_BEARER_TOKEN_HERE";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// 程序配置
///
/// 启动时构建一次，之后以引用方式传给各个组件
#[derive(Clone, Debug)]
pub struct Config {
    /// Bearer 认证令牌
    pub auth_token: String,
    /// 名字列表文件
    pub names_file: PathBuf,
    /// 账号搜索接口
    pub search_api_url: String,
    /// 关注接口（GraphQL）
    pub follow_api_url: String,
    /// 同时处理的名字数量，每个名字占用一个名额直到关注结束
    pub max_workers: usize,
    /// 每批名字数量
    pub batch_size: usize,
    /// 提交搜索任务之间的间隔（毫秒）
    pub search_submit_delay_ms: u64,
    /// 同一搜索结果内两次关注之间的间隔（毫秒）
    pub follow_delay_ms: u64,
    /// 单个请求超时（秒）
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// 从搜索结果中提取的字段
    pub identifier_field: IdentifierField,
    /// 名字去重方式
    pub dedup_mode: DedupMode,
    /// 关注被限流后的处理策略
    pub rate_limit_policy: RateLimitPolicy,
    /// 处理前是否打乱名字顺序
    pub shuffle: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_token: String::new(),
            names_file: PathBuf::from("names.txt"),
            search_api_url: "https://zora.co/api/trpc/mobile.profiles.searchProfile".to_string(),
            follow_api_url: "https://api.zora.co/universal/graphql".to_string(),
            max_workers: 1,
            batch_size: 30,
            search_submit_delay_ms: 100,
            follow_delay_ms: 3000,
            request_timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            identifier_field: IdentifierField::ProfileId,
            dedup_mode: DedupMode::CaseSensitive,
            rate_limit_policy: RateLimitPolicy::Drop,
            shuffle: false,
            verbose_logging: false,
        }
    }
}

/// TOML 配置文件，所有键均可省略
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    auth_token: Option<String>,
    names_file: Option<PathBuf>,
    search_api_url: Option<String>,
    follow_api_url: Option<String>,
    max_workers: Option<usize>,
    batch_size: Option<usize>,
    search_submit_delay_ms: Option<u64>,
    follow_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    user_agent: Option<String>,
    identifier_field: Option<IdentifierField>,
    dedup_mode: Option<DedupMode>,
    rate_limit_policy: Option<RateLimitPolicy>,
    shuffle: Option<bool>,
    verbose_logging: Option<bool>,
}

impl Config {
    /// 按 默认值 → 配置文件 → 环境变量 的顺序加载配置
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = config_file {
            config = config.merge_file(path)?;
        }
        Ok(config.apply_env(|key| std::env::var(key).ok()))
    }

    /// 合并 TOML 配置文件
    pub fn merge_file(self, path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.display().to_string(),
            source,
        })?;
        self.merge_toml_str(&content, &path.display().to_string())
    }

    /// 合并 TOML 文本
    pub fn merge_toml_str(self, content: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(content).map_err(|source| ConfigError::TomlParse {
            path: origin.to_string(),
            source,
        })?;

        Ok(Self {
            auth_token: file.auth_token.unwrap_or(self.auth_token),
            names_file: file.names_file.unwrap_or(self.names_file),
            search_api_url: file.search_api_url.unwrap_or(self.search_api_url),
            follow_api_url: file.follow_api_url.unwrap_or(self.follow_api_url),
            max_workers: file.max_workers.unwrap_or(self.max_workers),
            batch_size: file.batch_size.unwrap_or(self.batch_size),
            search_submit_delay_ms: file
                .search_submit_delay_ms
                .unwrap_or(self.search_submit_delay_ms),
            follow_delay_ms: file.follow_delay_ms.unwrap_or(self.follow_delay_ms),
            request_timeout_secs: file.request_timeout_secs.unwrap_or(self.request_timeout_secs),
            user_agent: file.user_agent.unwrap_or(self.user_agent),
            identifier_field: file.identifier_field.unwrap_or(self.identifier_field),
            dedup_mode: file.dedup_mode.unwrap_or(self.dedup_mode),
            rate_limit_policy: file.rate_limit_policy.unwrap_or(self.rate_limit_policy),
            shuffle: file.shuffle.unwrap_or(self.shuffle),
            verbose_logging: file.verbose_logging.unwrap_or(self.verbose_logging),
        })
    }

    /// 用环境变量覆盖配置
    ///
    /// 数值无法解析时保留原值
    pub fn apply_env<F>(self, var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            auth_token: var("ZORA_AUTH_TOKEN").unwrap_or(self.auth_token),
            names_file: var("NAMES_FILE").map(PathBuf::from).unwrap_or(self.names_file),
            search_api_url: var("SEARCH_API_URL").unwrap_or(self.search_api_url),
            follow_api_url: var("FOLLOW_API_URL").unwrap_or(self.follow_api_url),
            max_workers: var("MAX_WORKERS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.max_workers),
            batch_size: var("BATCH_SIZE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.batch_size),
            search_submit_delay_ms: var("SEARCH_SUBMIT_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.search_submit_delay_ms),
            follow_delay_ms: var("FOLLOW_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.follow_delay_ms),
            request_timeout_secs: var("REQUEST_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.request_timeout_secs),
            verbose_logging: var("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(self.verbose_logging),
            ..self
        }
    }

    /// 校验配置，失败时程序应在任何网络请求之前退出
    pub fn validate(&self) -> Result<(), ConfigError> {
        let token = self.auth_token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        if token == TOKEN_PLACEHOLDER {
            return Err(ConfigError::PlaceholderToken(token.to_string()));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size",
                reason: "必须大于 0".to_string(),
            });
        }
        if self.max_workers == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_workers",
                reason: "必须大于 0".to_string(),
            });
        }
        Ok(())
    }

    /// 调度节奏参数
    pub fn pacing(&self) -> Pacing {
        Pacing {
            submit_delay: Duration::from_millis(self.search_submit_delay_ms),
            follow_delay: Duration::from_millis(self.follow_delay_ms),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 令牌前 8 个字符，用于日志
    pub fn token_preview(&self) -> String {
        self.auth_token.chars().take(8).collect()
    }
}
