//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量调度器
//! - 分批、控制并发（Semaphore）、控制节奏
//! - 收集各任务的结果，执行限流策略
//!
//! ### `name_processor` - 单个名字处理器
//! - 一个名字：搜索 → 依次关注
//!
//! ### `summary` - 运行统计
//!
//! ### `shutdown` - 中断信号
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<CleanName>)
//!     ↓
//! name_processor (处理单个 CleanName)
//!     ↓
//! clients (能力层：search / follow)
//! ```

pub mod batch_processor;
pub mod name_processor;
pub mod shutdown;
pub mod summary;

pub use batch_processor::{
    plan_batches, BatchDispatcher, DispatchSettings, Pacing, RateLimitPolicy, RunOutcome, RunReport,
};
pub use name_processor::NameReport;
pub use shutdown::{shutdown_channel, ShutdownSignal, ShutdownTrigger};
pub use summary::{Summary, SummarySnapshot};
