//! # Profile Follower
//!
//! 按名字列表批量搜索账号并发起关注的命令行工具
//!
//! ## 架构设计
//!
//! ### ① 数据模型（Models）
//! - `models/` - `CleanName`、`ProfileMatch`、`FollowOutcome`，以及名字文件加载
//!
//! ### ② 业务能力层（Services / Clients）
//! - `services/` - `NameNormalizer`：清洗、去重
//! - `clients/` - `SearchClient` / `FollowClient`：各自只发一次请求，不重试
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 分批、并发、节奏、限流策略
//! - `orchestrator/name_processor` - 单个名字：搜索 → 关注
//! - `orchestrator/summary` - 线程安全的统计
//!
//! ### ④ 应用（App）
//! - `app` - 组装配置、客户端和调度器，打印最终统计
//!
//! ## 模块结构

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use app::App;
pub use clients::{FollowClient, ProfileFollower, ProfileSearcher, SearchClient};
pub use config::Config;
pub use error::{ApiError, ApiResult, ConfigError};
pub use models::{CleanName, FollowOutcome, IdentifierField, ProfileMatch};
pub use orchestrator::{
    BatchDispatcher, DispatchSettings, Pacing, RateLimitPolicy, RunOutcome, Summary,
    SummarySnapshot,
};
pub use services::{DedupMode, NameNormalizer};
