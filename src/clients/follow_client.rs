//! 关注客户端
//!
//! 发送 GraphQL 关注请求，并把响应归类为 [`FollowOutcome`]

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::clients::http::{auth_headers, retry_after_secs};
use crate::clients::ProfileFollower;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::FollowOutcome;
use crate::utils::logging::truncate_text;

/// GraphQL 关注 mutation
pub const FOLLOW_MUTATION: &str = r#"
mutation useFollowsMutation_followMutation(
  $profileId: String!
) {
  follow(followeeId: $profileId) {
    __typename
    ...FollowButton_profile
    id
  }
}

fragment FollowButton_profile on IGraphQLProfile {
  __isIGraphQLProfile: __typename
  vcFollowingStatus
}
"#;

/// 视为关注成功的 `__typename`
const SUCCESS_TYPENAMES: [&str; 2] = ["GraphQLAccountProfile", "IGraphQLFollowResult"];

/// 关注客户端
pub struct FollowClient {
    http: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl FollowClient {
    /// 创建新的关注客户端
    pub fn new(http: reqwest::Client, config: &Config) -> anyhow::Result<Self> {
        let mut headers = auth_headers(&config.auth_token)?;
        headers.insert(CONTENT_TYPE, "application/json".parse()?);

        Ok(Self {
            http,
            endpoint: config.follow_api_url.clone(),
            headers,
        })
    }

    /// 发送关注请求，返回响应 JSON
    async fn send_follow(&self, identifier: &str) -> ApiResult<Value> {
        let payload = json!({
            "query": FOLLOW_MUTATION,
            "variables": { "profileId": identifier },
        });

        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&payload)
            .send()
            .await
            .map_err(|source| ApiError::Network {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        debug!("关注 '{}' 响应状态: {}", identifier, status);

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

        debug!("关注 '{}' 响应体: {}", identifier, body);

        if !status.is_success() {
            return Err(ApiError::Http {
                endpoint: self.endpoint.clone(),
                status: status.as_u16(),
                body: truncate_text(&body, 500),
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Parse {
            endpoint: self.endpoint.clone(),
            source,
        })
    }
}

#[async_trait]
impl ProfileFollower for FollowClient {
    async fn follow(&self, identifier: &str) -> FollowOutcome {
        let outcome = match self.send_follow(identifier).await {
            Ok(data) => interpret_follow_response(&data),
            Err(ApiError::RateLimited { .. }) => FollowOutcome::RateLimited,
            Err(ApiError::Http { status, body, .. }) => {
                error!("关注 '{}' HTTP 错误 {}: {}", identifier, status, body);
                FollowOutcome::Failed(format!("HTTP {}", status))
            }
            Err(e @ ApiError::Network { .. }) => {
                error!("关注 '{}' 请求失败: {}", identifier, e);
                FollowOutcome::Failed("网络错误".to_string())
            }
            Err(e @ ApiError::Parse { .. }) => {
                error!("关注 '{}' 响应无法解析: {}", identifier, e);
                FollowOutcome::Failed("响应不是合法 JSON".to_string())
            }
        };

        match &outcome {
            FollowOutcome::Succeeded => info!("✓ 已关注 '{}'", identifier),
            FollowOutcome::AlreadyFollowing => info!("已经关注过 '{}'，视为成功", identifier),
            FollowOutcome::RateLimited => warn!("⚠️ 关注 '{}' 被限流", identifier),
            FollowOutcome::Failed(reason) => warn!("关注 '{}' 失败: {}", identifier, reason),
        }

        outcome
    }
}

/// 解析关注接口的 GraphQL 响应
///
/// 先看 `errors`，再看 `data.follow`
pub fn interpret_follow_response(data: &Value) -> FollowOutcome {
    if let Some(errors) = data.get("errors").and_then(Value::as_array) {
        if let Some(first) = errors.first() {
            let message = first
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown API error");

            if message.to_lowercase().contains("already following") {
                return FollowOutcome::AlreadyFollowing;
            }
            if message.contains("Rate limit exceeded") {
                return FollowOutcome::RateLimited;
            }
            if message.contains("Invalid user identifier") {
                return FollowOutcome::Failed("无效的用户标识".to_string());
            }
            return FollowOutcome::Failed(message.to_string());
        }
    }

    let Some(follow) = data
        .get("data")
        .and_then(|d| d.get("follow"))
        .and_then(Value::as_object)
    else {
        return FollowOutcome::Failed("响应缺少 data.follow".to_string());
    };

    let status = follow.get("vcFollowingStatus").and_then(Value::as_str);
    let typename = follow.get("__typename").and_then(Value::as_str);

    let is_success = status == Some("FOLLOWING")
        || typename.is_some_and(|t| SUCCESS_TYPENAMES.contains(&t));

    if is_success {
        FollowOutcome::Succeeded
    } else {
        FollowOutcome::Failed(format!(
            "状态异常 (status: {:?}, type: {:?})",
            status, typename
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_success_by_status() {
        let data = json!({
            "data": {
                "follow": { "__typename": "Other", "vcFollowingStatus": "FOLLOWING", "id": "1" }
            }
        });
        assert_eq!(interpret_follow_response(&data), FollowOutcome::Succeeded);
    }

    #[test]
    fn test_interpret_success_by_typename() {
        for typename in SUCCESS_TYPENAMES {
            let data = json!({ "data": { "follow": { "__typename": typename } } });
            assert_eq!(interpret_follow_response(&data), FollowOutcome::Succeeded);
        }
    }

    #[test]
    fn test_interpret_graphql_errors() {
        let already =
            json!({ "errors": [{ "message": "User is Already Following this profile" }] });
        assert_eq!(interpret_follow_response(&already), FollowOutcome::AlreadyFollowing);

        let limited = json!({ "errors": [{ "message": "Rate limit exceeded, slow down" }] });
        assert_eq!(interpret_follow_response(&limited), FollowOutcome::RateLimited);

        let invalid = json!({ "errors": [{ "message": "Invalid user identifier" }] });
        assert!(matches!(interpret_follow_response(&invalid), FollowOutcome::Failed(_)));

        let other = json!({ "errors": [{ "message": "boom" }], "data": null });
        assert_eq!(interpret_follow_response(&other), FollowOutcome::Failed("boom".to_string()));

        let no_message = json!({ "errors": [{}] });
        assert_eq!(
            interpret_follow_response(&no_message),
            FollowOutcome::Failed("Unknown API error".to_string())
        );
    }

    #[test]
    fn test_interpret_malformed_data() {
        assert!(matches!(interpret_follow_response(&json!({})), FollowOutcome::Failed(_)));
        assert!(matches!(
            interpret_follow_response(&json!({ "data": { "follow": null } })),
            FollowOutcome::Failed(_)
        ));
        assert!(matches!(
            interpret_follow_response(&json!({
                "data": {
                    "follow": { "__typename": "Nope", "vcFollowingStatus": "NOT_FOLLOWING" }
                }
            })),
            FollowOutcome::Failed(_)
        ));
    }

    #[test]
    fn test_empty_errors_array_falls_through_to_data() {
        let data = json!({
            "errors": [],
            "data": { "follow": { "vcFollowingStatus": "FOLLOWING" } }
        });
        assert_eq!(interpret_follow_response(&data), FollowOutcome::Succeeded);
    }
}
