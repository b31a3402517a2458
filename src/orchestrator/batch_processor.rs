//! 批量调度器 - 编排层
//!
//! ## 职责
//!
//! 1. **分批**：把名字列表切成固定大小的批次，批次之间严格串行
//! 2. **并发控制**：使用 Semaphore 限制同时处理的名字数量（搜索加关注）
//! 3. **节奏控制**：提交间隔与关注间隔由 [`Pacing`] 决定
//! 4. **关注串行化**：关注请求通过关注锁全局串行，与并发数无关
//! 5. **中断**：收到中断信号后停止提交、放弃未完成任务
//! 6. **限流策略**：按 [`RateLimitPolicy`] 决定被限流的关注是丢弃还是批次结束后重试

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::clients::{ProfileFollower, ProfileSearcher};
use crate::models::CleanName;
use crate::orchestrator::name_processor::{process_name, NameReport};
use crate::orchestrator::shutdown::ShutdownSignal;
use crate::orchestrator::summary::Summary;
use crate::utils::logging::{log_batch_complete, log_batch_start};

/// 节奏参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// 同一批内两次提交搜索任务之间的间隔
    pub submit_delay: Duration,
    /// 同一搜索结果内两次关注之间的间隔
    pub follow_delay: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            submit_delay: Duration::from_millis(100),
            follow_delay: Duration::from_secs(3),
        }
    }
}

/// 关注被限流后的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitPolicy {
    /// 直接放弃
    #[default]
    Drop,
    /// 批次结束后重试一次
    RequeueAtBatchEnd,
}

/// 调度参数
#[derive(Debug, Clone, Copy)]
pub struct DispatchSettings {
    pub batch_size: usize,
    pub max_workers: usize,
    pub pacing: Pacing,
    pub rate_limit_policy: RateLimitPolicy,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 30,
            max_workers: 1,
            pacing: Pacing::default(),
            rate_limit_policy: RateLimitPolicy::Drop,
        }
    }
}

/// 运行结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// 所有批次处理完成
    Completed,
    /// 被中断信号打断
    Interrupted,
}

/// 一次运行的报告
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: RunOutcome,
    /// 已完成批次的大小，按处理顺序
    pub batch_sizes: Vec<usize>,
}

/// 在任务之间共享的状态
///
/// 客户端只读共享；统计内部加锁
pub(crate) struct DispatchShared {
    pub(crate) searcher: Arc<dyn ProfileSearcher>,
    pub(crate) follower: Arc<dyn ProfileFollower>,
    pub(crate) summary: Arc<Summary>,
    pub(crate) worker_slots: Semaphore,
    pub(crate) follow_gate: Mutex<()>,
    pub(crate) pacing: Pacing,
    pub(crate) shutdown: ShutdownSignal,
}

/// 单批处理结果
enum BatchOutcome {
    Completed { tasks: usize, rate_limited: Vec<String> },
    Interrupted,
}

/// 把名字列表切成批次
pub fn plan_batches(names: &[CleanName], batch_size: usize) -> Vec<&[CleanName]> {
    names.chunks(batch_size.max(1)).collect()
}

/// 批量调度器
pub struct BatchDispatcher {
    shared: Arc<DispatchShared>,
    batch_size: usize,
    rate_limit_policy: RateLimitPolicy,
}

impl BatchDispatcher {
    pub fn new(
        searcher: Arc<dyn ProfileSearcher>,
        follower: Arc<dyn ProfileFollower>,
        summary: Arc<Summary>,
        settings: DispatchSettings,
        shutdown: ShutdownSignal,
    ) -> Self {
        let shared = DispatchShared {
            searcher,
            follower,
            summary,
            worker_slots: Semaphore::new(settings.max_workers.max(1)),
            follow_gate: Mutex::new(()),
            pacing: settings.pacing,
            shutdown,
        };

        Self {
            shared: Arc::new(shared),
            batch_size: settings.batch_size.max(1),
            rate_limit_policy: settings.rate_limit_policy,
        }
    }

    pub fn summary(&self) -> Arc<Summary> {
        Arc::clone(&self.shared.summary)
    }

    /// 处理所有名字
    pub async fn run(&self, names: &[CleanName]) -> RunReport {
        let batches = plan_batches(names, self.batch_size);
        let total_batches = batches.len();
        let mut report = RunReport {
            outcome: RunOutcome::Completed,
            batch_sizes: Vec::with_capacity(total_batches),
        };

        for (idx, batch) in batches.into_iter().enumerate() {
            if self.shared.shutdown.is_triggered() {
                report.outcome = RunOutcome::Interrupted;
                break;
            }

            let batch_num = idx + 1;
            let batch_start = idx * self.batch_size;
            log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                names.len(),
            );

            let (tasks, rate_limited) = match self.process_batch(batch, batch_num).await {
                BatchOutcome::Completed { tasks, rate_limited } => (tasks, rate_limited),
                BatchOutcome::Interrupted => {
                    report.outcome = RunOutcome::Interrupted;
                    break;
                }
            };

            if !rate_limited.is_empty() {
                match self.rate_limit_policy {
                    RateLimitPolicy::Drop => {
                        warn!(
                            "第 {} 批有 {} 个关注被限流，已放弃",
                            batch_num,
                            rate_limited.len()
                        );
                    }
                    RateLimitPolicy::RequeueAtBatchEnd => {
                        if !self.requeue(rate_limited, batch_num).await {
                            report.outcome = RunOutcome::Interrupted;
                            break;
                        }
                    }
                }
            }

            self.shared.summary.record_batch_completed();
            report.batch_sizes.push(batch.len());
            log_batch_complete(batch_num, tasks, batch.len());
        }

        if report.outcome == RunOutcome::Completed {
            info!("所有批次处理完毕");
        } else {
            warn!("⚠️ 收到中断信号，停止提交新任务");
        }

        report
    }

    /// 处理单个批次
    async fn process_batch(&self, batch: &[CleanName], batch_num: usize) -> BatchOutcome {
        let shutdown = &self.shared.shutdown;
        let submit_delay = self.shared.pacing.submit_delay;
        let mut tasks = JoinSet::new();

        for (i, name) in batch.iter().enumerate() {
            if shutdown.is_triggered() {
                tasks.shutdown().await;
                return BatchOutcome::Interrupted;
            }

            info!("提交任务: '{}' [第 {} 批]", name, batch_num);
            let shared = Arc::clone(&self.shared);
            let name = name.clone();
            tasks.spawn(async move { process_name(&shared, name, batch_num).await });

            if i + 1 < batch.len() && !shutdown.sleep(submit_delay).await {
                tasks.shutdown().await;
                return BatchOutcome::Interrupted;
            }
        }

        info!("第 {} 批已提交 {} 个任务，等待完成...", batch_num, tasks.len());

        // 按完成顺序收集结果
        let mut completed = 0;
        let mut rate_limited = Vec::new();
        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.triggered() => None,
                next = tasks.join_next() => Some(next),
            };

            let Some(next) = next else {
                tasks.shutdown().await;
                return BatchOutcome::Interrupted;
            };

            match next {
                None => break,
                Some(Ok(NameReport { found, followed, rate_limited: limited })) => {
                    completed += 1;
                    debug!("[第 {} 批] 任务完成: 找到 {}, 成功 {}", batch_num, found, followed);
                    rate_limited.extend(limited);
                }
                Some(Err(e)) => {
                    completed += 1;
                    error!("[第 {} 批] 任务执行失败: {}", batch_num, e);
                    self.shared.summary.record_error();
                }
            }
        }

        BatchOutcome::Completed {
            tasks: completed,
            rate_limited,
        }
    }

    /// 批次结束后重试被限流的关注，每个标识只重试一次
    ///
    /// 被中断时返回 `false`
    async fn requeue(&self, identifiers: Vec<String>, batch_num: usize) -> bool {
        let shared = &self.shared;
        let _gate = shared.follow_gate.lock().await;

        info!("第 {} 批结束，重试 {} 个被限流的关注", batch_num, identifiers.len());

        for identifier in identifiers {
            if !shared.shutdown.sleep(shared.pacing.follow_delay).await {
                return false;
            }
            shared.summary.record_requeued();
            let outcome = shared.follower.follow(&identifier).await;
            shared.summary.record_follow(&outcome);
        }

        true
    }
}
