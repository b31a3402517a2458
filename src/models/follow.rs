use std::fmt::{self, Display};

/// 一次关注请求的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FollowOutcome {
    /// 关注成功
    Succeeded,
    /// 之前已经关注过
    AlreadyFollowing,
    /// 触发限流，未自动重试
    RateLimited,
    /// 其他失败
    Failed(String),
}

impl FollowOutcome {
    /// 成功或已关注都视为达成目标
    pub fn is_success(&self) -> bool {
        matches!(self, FollowOutcome::Succeeded | FollowOutcome::AlreadyFollowing)
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FollowOutcome::RateLimited)
    }
}

impl Display for FollowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FollowOutcome::Succeeded => write!(f, "关注成功"),
            FollowOutcome::AlreadyFollowing => write!(f, "已关注"),
            FollowOutcome::RateLimited => write!(f, "被限流"),
            FollowOutcome::Failed(reason) => write!(f, "失败: {}", reason),
        }
    }
}
