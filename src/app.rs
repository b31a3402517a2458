use std::sync::Arc;

use anyhow::Result;
use tracing::warn;

use crate::clients::{build_http_client, FollowClient, SearchClient};
use crate::config::Config;
use crate::models::{load_names_file, load_names_file_shuffled};
use crate::orchestrator::{
    plan_batches, BatchDispatcher, DispatchSettings, RunOutcome, ShutdownSignal, Summary,
    SummarySnapshot,
};
use crate::services::NameNormalizer;
use crate::utils::logging::{log_names_loaded, log_startup, print_final_stats};

/// 应用主结构
pub struct App {
    config: Config,
    dispatcher: BatchDispatcher,
    summary: Arc<Summary>,
}

impl App {
    /// 初始化应用
    ///
    /// 配置不合法时直接返回错误，不会发出任何网络请求
    pub fn initialize(config: Config, shutdown: ShutdownSignal) -> Result<Self> {
        config.validate()?;

        log_startup(&config);

        let http = build_http_client(&config)?;
        let searcher = Arc::new(SearchClient::new(http.clone(), &config)?);
        let follower = Arc::new(FollowClient::new(http, &config)?);
        let summary = Arc::new(Summary::new());

        let settings = DispatchSettings {
            batch_size: config.batch_size,
            max_workers: config.max_workers,
            pacing: config.pacing(),
            rate_limit_policy: config.rate_limit_policy,
        };
        let dispatcher = BatchDispatcher::new(
            searcher,
            follower,
            Arc::clone(&summary),
            settings,
            shutdown,
        );

        Ok(Self {
            config,
            dispatcher,
            summary,
        })
    }

    /// 当前统计快照
    pub fn summary(&self) -> SummarySnapshot {
        self.summary.snapshot()
    }

    /// 运行应用主逻辑
    ///
    /// 无论正常结束还是被中断，都会打印统计
    pub async fn run(&self) -> Result<RunOutcome> {
        let lines = if self.config.shuffle {
            load_names_file_shuffled(&self.config.names_file).await?
        } else {
            load_names_file(&self.config.names_file).await?
        };

        let normalized = NameNormalizer::new(self.config.dedup_mode).normalize(&lines);
        self.summary.record_names(&normalized);

        if normalized.names.is_empty() {
            warn!("⚠️ 没有可处理的名字，程序结束");
            print_final_stats(&self.summary.snapshot(), RunOutcome::Completed);
            return Ok(RunOutcome::Completed);
        }

        let total_batches = plan_batches(&normalized.names, self.config.batch_size).len();
        log_names_loaded(normalized.names.len(), self.config.batch_size, total_batches);

        let report = self.dispatcher.run(&normalized.names).await;

        print_final_stats(&self.summary.snapshot(), report.outcome);

        Ok(report.outcome)
    }
}
