//! 单个名字处理器
//!
//! 一个名字的完整流程：占用工作名额 → 搜索 → 获取关注锁 → 依次关注 → 释放名额
//!
//! 名额覆盖搜索和关注两个阶段，所以单个工作者时名字之间严格串行

use tracing::{debug, info};

use crate::clients::search_client::log_search_error;
use crate::models::{CleanName, ProfileMatch};
use crate::orchestrator::batch_processor::DispatchShared;

/// 单个名字的处理结果
#[derive(Debug, Clone, Default)]
pub struct NameReport {
    /// 找到的账号数
    pub found: usize,
    /// 关注成功或已关注的数量
    pub followed: usize,
    /// 被限流的标识，供批次结束时重新排队
    pub rate_limited: Vec<String>,
}

/// 处理一个名字
///
/// 所有错误都在这里记录进统计，不向上传播
pub(crate) async fn process_name(
    shared: &DispatchShared,
    name: CleanName,
    batch_num: usize,
) -> NameReport {
    // 信号量从不关闭
    let Ok(_permit) = shared.worker_slots.acquire().await else {
        return NameReport::default();
    };
    if shared.shutdown.is_triggered() {
        return NameReport::default();
    }

    let Some(matches) = search(shared, &name).await else {
        return NameReport::default();
    };

    let mut report = NameReport {
        found: matches.len(),
        ..Default::default()
    };

    if matches.is_empty() {
        return report;
    }

    follow_all(shared, &name, &matches, &mut report).await;

    debug!(
        "[第 {} 批] '{}' 处理完成: 成功 {}, 找到 {}",
        batch_num, name, report.followed, report.found
    );

    report
}

/// 执行一次搜索，调用方持有工作名额
async fn search(shared: &DispatchShared, name: &CleanName) -> Option<Vec<ProfileMatch>> {
    shared.summary.record_search();
    match shared.searcher.search(name).await {
        Ok(matches) => {
            shared.summary.record_profiles_found(matches.len());
            Some(matches)
        }
        Err(e) => {
            log_search_error(name, &e);
            if e.is_rate_limited() {
                shared.summary.record_search_rate_limited();
            } else {
                shared.summary.record_search_failed();
            }
            None
        }
    }
}

/// 串行关注同一搜索结果中的所有账号
async fn follow_all(
    shared: &DispatchShared,
    name: &CleanName,
    matches: &[ProfileMatch],
    report: &mut NameReport,
) {
    let total = matches.len();
    let _gate = shared.follow_gate.lock().await;

    info!("开始关注 '{}' 的 {} 个搜索结果", name, total);

    for (i, m) in matches.iter().enumerate() {
        if shared.shutdown.is_triggered() {
            break;
        }

        info!(
            "--> 尝试关注 {}/{}: '{}' (来自搜索 '{}')",
            i + 1,
            total,
            m.identifier,
            m.source_name
        );

        let outcome = shared.follower.follow(&m.identifier).await;
        shared.summary.record_follow(&outcome);

        if outcome.is_success() {
            report.followed += 1;
        } else if outcome.is_rate_limited() {
            report.rate_limited.push(m.identifier.clone());
        }

        if i + 1 < total {
            debug!("等待 {:?} 后关注下一个", shared.pacing.follow_delay);
            if !shared.shutdown.sleep(shared.pacing.follow_delay).await {
                break;
            }
        }
    }

    info!("'{}' 关注结束: 成功/已关注 {}/{}", name, report.followed, total);
}
