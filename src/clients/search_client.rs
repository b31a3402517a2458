//! 账号搜索客户端

use async_trait::async_trait;
use reqwest::header::{HeaderMap, ACCEPT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::clients::http::{auth_headers, retry_after_secs};
use crate::clients::ProfileSearcher;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{CleanName, IdentifierField, ProfileMatch};
use crate::utils::logging::truncate_text;

/// 搜索接口响应：`result.data.json.profiles`
#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Option<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    data: Option<SearchData>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchData {
    #[serde(default)]
    json: Option<SearchPayload>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    profiles: Vec<Value>,
}

impl SearchResponse {
    fn into_profiles(self) -> Vec<Value> {
        self.result
            .and_then(|r| r.data)
            .and_then(|d| d.json)
            .map(|j| j.profiles)
            .unwrap_or_default()
    }
}

/// 账号搜索客户端
pub struct SearchClient {
    http: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
    field: IdentifierField,
}

impl SearchClient {
    /// 创建新的搜索客户端
    pub fn new(http: reqwest::Client, config: &Config) -> anyhow::Result<Self> {
        let mut headers = auth_headers(&config.auth_token)?;
        headers.insert(ACCEPT, "application/json".parse()?);

        Ok(Self {
            http,
            endpoint: config.search_api_url.clone(),
            headers,
            field: config.identifier_field,
        })
    }

    /// 构造 `input` 查询参数：`{"json":{"text":NAME}}`
    fn build_input(name: &CleanName) -> String {
        json!({ "json": { "text": name.as_str() } }).to_string()
    }

    /// 从账号列表中提取标识，缺少字段的条目被跳过
    fn extract_matches(&self, profiles: &[Value], name: &CleanName) -> Vec<ProfileMatch> {
        let key = self.field.json_key();
        profiles
            .iter()
            .filter_map(|p| p.get(key).and_then(Value::as_str))
            .filter(|id| !id.is_empty())
            .map(|id| ProfileMatch::new(id, name.clone()))
            .collect()
    }
}

#[async_trait]
impl ProfileSearcher for SearchClient {
    async fn search(&self, name: &CleanName) -> ApiResult<Vec<ProfileMatch>> {
        info!("🔍 搜索账号: '{}'", name);

        let input = Self::build_input(name);
        let response = self
            .http
            .get(&self.endpoint)
            .headers(self.headers.clone())
            .query(&[("input", input.as_str())])
            .send()
            .await
            .map_err(|source| ApiError::Network {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        debug!("搜索 '{}' 响应状态: {}", name, status);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ApiError::RateLimited {
                endpoint: self.endpoint.clone(),
                retry_after: retry_after_secs(&response),
            });
        }

        let body = response.text().await.map_err(|source| ApiError::Network {
            endpoint: self.endpoint.clone(),
            source,
        })?;

        if !status.is_success() {
            return Err(ApiError::Http {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body: truncate_text(&body, 500),
            });
        }

        let parsed: SearchResponse =
            serde_json::from_str(&body).map_err(|source| ApiError::Parse {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let matches = self.extract_matches(&parsed.into_profiles(), name);

        if matches.is_empty() {
            info!("未找到 '{}' 的账号", name);
        } else {
            info!(
                "✓ '{}' 找到 {} 个账号标识 ({})",
                name,
                matches.len(),
                self.field.json_key()
            );
            debug!(
                "标识列表: {:?}",
                matches.iter().map(|m| m.identifier.as_str()).collect::<Vec<_>>()
            );
        }

        Ok(matches)
    }
}

impl std::fmt::Debug for SearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchClient")
            .field("endpoint", &self.endpoint)
            .field("field", &self.field)
            .finish()
    }
}

/// 记录搜索错误的日志级别：限流为 warn，其余为 error
pub fn log_search_error(name: &CleanName, err: &ApiError) {
    if err.is_rate_limited() {
        warn!("⚠️ 搜索 '{}' 被限流: {}", name, err);
    } else {
        tracing::error!("❌ 搜索 '{}' 失败: {}", name, err);
    }
}
