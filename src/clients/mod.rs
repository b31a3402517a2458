//! 外部 API 客户端
//!
//! 每个客户端只发送一次请求，不做任何重试；重试与节奏由编排层决定

pub mod follow_client;
pub mod http;
pub mod search_client;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{CleanName, FollowOutcome, ProfileMatch};

pub use follow_client::{interpret_follow_response, FollowClient};
pub use http::build_http_client;
pub use search_client::SearchClient;

/// 账号搜索能力
#[async_trait]
pub trait ProfileSearcher: Send + Sync {
    /// 按名字搜索账号，无结果时返回空列表
    async fn search(&self, name: &CleanName) -> ApiResult<Vec<ProfileMatch>>;
}

/// 关注能力
#[async_trait]
pub trait ProfileFollower: Send + Sync {
    /// 关注一个账号，所有失败都折叠进 [`FollowOutcome`]
    async fn follow(&self, identifier: &str) -> FollowOutcome;
}
