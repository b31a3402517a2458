use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::Response;

use crate::config::Config;

/// 创建共享的 HTTP 客户端
///
/// 客户端内部使用连接池，clone 成本很低，可在任务间共享
pub fn build_http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(Duration::from_secs(10))
        .build()
        .context("无法创建 HTTP 客户端")
}

/// 构造 Bearer 认证头
pub fn auth_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
        .context("认证令牌包含非法字符")?;
    value.set_sensitive(true);
    headers.insert(reqwest::header::AUTHORIZATION, value);
    Ok(headers)
}

/// 读取 `Retry-After` 头（秒）
pub fn retry_after_secs(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
