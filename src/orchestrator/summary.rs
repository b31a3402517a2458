//! 运行统计
//!
//! 计数器被多个任务并发更新，每次递增都在互斥锁内完成

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::models::FollowOutcome;
use crate::services::NormalizedNames;

/// 某一时刻的统计快照
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummarySnapshot {
    pub names_read: usize,
    pub names_duplicate: usize,
    pub names_invalid: usize,
    pub searches_performed: usize,
    pub searches_rate_limited: usize,
    pub searches_failed: usize,
    pub profiles_found: usize,
    pub follows_succeeded: usize,
    pub follows_already_following: usize,
    pub follows_rate_limited: usize,
    pub follows_failed: usize,
    pub follows_requeued: usize,
    pub errors: usize,
    pub batches_completed: usize,
}

impl SummarySnapshot {
    /// 成功 + 已关注
    pub fn follows_ok(&self) -> usize {
        self.follows_succeeded + self.follows_already_following
    }

    /// 发出的关注请求总数
    pub fn follows_attempted(&self) -> usize {
        self.follows_ok() + self.follows_rate_limited + self.follows_failed
    }
}

/// 线程安全的统计汇总
#[derive(Debug, Default)]
pub struct Summary {
    counters: Mutex<SummarySnapshot>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    // 计数器互相独立，锁中毒后继续使用
    fn lock(&self) -> MutexGuard<'_, SummarySnapshot> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// 记录名字清洗结果
    pub fn record_names(&self, names: &NormalizedNames) {
        let mut c = self.lock();
        c.names_read += names.raw_count;
        c.names_duplicate += names.duplicates;
        c.names_invalid += names.invalid;
    }

    pub fn record_search(&self) {
        self.lock().searches_performed += 1;
    }

    pub fn record_search_rate_limited(&self) {
        self.lock().searches_rate_limited += 1;
    }

    pub fn record_search_failed(&self) {
        self.lock().searches_failed += 1;
    }

    pub fn record_profiles_found(&self, count: usize) {
        self.lock().profiles_found += count;
    }

    /// 按结果类型记录一次关注
    pub fn record_follow(&self, outcome: &FollowOutcome) {
        let mut c = self.lock();
        match outcome {
            FollowOutcome::Succeeded => c.follows_succeeded += 1,
            FollowOutcome::AlreadyFollowing => c.follows_already_following += 1,
            FollowOutcome::RateLimited => c.follows_rate_limited += 1,
            FollowOutcome::Failed(_) => c.follows_failed += 1,
        }
    }

    pub fn record_requeued(&self) {
        self.lock().follows_requeued += 1;
    }

    pub fn record_error(&self) {
        self.lock().errors += 1;
    }

    pub fn record_batch_completed(&self) {
        self.lock().batches_completed += 1;
    }

    pub fn snapshot(&self) -> SummarySnapshot {
        *self.lock()
    }
}
