use thiserror::Error;

/// 配置错误
///
/// 启动阶段发现即终止程序，不会发出任何网络请求
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 未提供认证令牌
    #[error("认证令牌缺失，请设置 ZORA_AUTH_TOKEN 环境变量")]
    MissingToken,

    /// 认证令牌仍是占位符
    #[error("认证令牌仍是占位符 '{0}'，请替换为有效的 Bearer 令牌")]
    PlaceholderToken(String),

    /// 配置值不合法
    #[error("配置项 {field} 不合法: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    /// 读取配置文件失败
    #[error("读取配置文件失败 ({path}): {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件 TOML 解析失败
    #[error("配置文件 TOML 解析失败 ({path}): {source}")]
    TomlParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 连接层面的失败（超时、DNS、连接被拒绝等）
    #[error("网络请求失败 ({endpoint}): {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 非 2xx 且非限流的状态码
    #[error("HTTP 错误 ({endpoint}): {status}, 响应: {body}")]
    Http {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// 请求频率限制
    #[error("API请求频率限制 ({endpoint}), 建议等待: {retry_after:?}秒")]
    RateLimited {
        endpoint: String,
        retry_after: Option<u64>,
    },

    /// 响应结构无法解析
    #[error("JSON解析失败 ({endpoint}): {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// 是否为限流错误
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }
}

/// API 调用结果类型
pub type ApiResult<T> = Result<T, ApiError>;
