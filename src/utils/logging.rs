//! 日志工具模块
//!
//! 提供日志初始化和格式化输出的辅助函数

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::orchestrator::{RunOutcome, SummarySnapshot};

/// 初始化日志
///
/// 优先使用 `RUST_LOG`；否则本 crate 为 info（verbose 时为 debug），依赖库为 warn
pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,profile_follower={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 按名字列表批量搜索并关注");
    info!("{}", "=".repeat(60));
    info!("🔑 认证令牌已加载 (前缀: {}...)", config.token_preview());
    info!("📄 名字文件: {}", config.names_file.display());
    info!("📊 最大并发工作数: {}", config.max_workers);
    info!("📋 每批名字数: {}", config.batch_size);
    info!(
        "⏱️ 关注间隔: {}ms / 提交间隔: {}ms",
        config.follow_delay_ms, config.search_submit_delay_ms
    );
    info!("🏷️ 提取字段: {}", config.identifier_field.json_key());
    info!("🔁 去重方式: {:?} / 限流策略: {:?}", config.dedup_mode, config.rate_limit_policy);
}

/// 记录名字加载信息
pub fn log_names_loaded(unique: usize, batch_size: usize, total_batches: usize) {
    info!("✓ 共 {} 个待处理的名字", unique);
    info!("📋 将以每批 {} 个的方式处理，共 {} 批", batch_size, total_batches);
    info!("💡 每批完成后再开始下一批\n");
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始名字编号
/// - `end`: 结束名字编号
/// - `total`: 名字总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批名字: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, completed: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: 处理 {}/{} 个任务", batch_num, completed, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(stats: &SummarySnapshot, outcome: RunOutcome) {
    info!("\n{}", "=".repeat(60));
    match outcome {
        RunOutcome::Completed => info!("📊 全部处理完成统计"),
        RunOutcome::Interrupted => warn!("📊 程序被中断，以下为中断前的统计"),
    }
    info!("完成时间: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", "=".repeat(60));
    info!("📄 读取名字: {}", stats.names_read);
    info!("🔁 跳过重复名字: {}", stats.names_duplicate);
    info!("🚫 跳过无效名字: {}", stats.names_invalid);
    info!(
        "🔍 完成搜索: {} (限流 {}, 失败 {})",
        stats.searches_performed, stats.searches_rate_limited, stats.searches_failed
    );
    info!("👤 找到账号: {}", stats.profiles_found);
    info!("✅ 关注成功: {}", stats.follows_succeeded);
    info!("☑️ 已关注跳过: {}", stats.follows_already_following);
    info!(
        "⚠️ 关注被限流: {} (重新排队 {})",
        stats.follows_rate_limited, stats.follows_requeued
    );
    info!("❌ 关注失败: {}", stats.follows_failed);
    info!("💥 未处理错误: {}", stats.errors);
    info!("📦 完成批次: {}", stats.batches_completed);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度（字符数）
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
