use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, warn};

use profile_follower::config::Config;
use profile_follower::models::IdentifierField;
use profile_follower::orchestrator::{shutdown_channel, RateLimitPolicy, RunOutcome};
use profile_follower::services::DedupMode;
use profile_follower::utils::logging;
use profile_follower::App;

/// 中断退出码（128 + SIGINT）
const EXIT_INTERRUPTED: u8 = 130;

#[derive(Parser)]
#[command(name = "profile-follower", version, about = "按名字列表批量搜索账号并关注")]
struct Cli {
    /// 显示 DEBUG 级别日志
    #[arg(short, long, default_value_t = false)]
    verbose: bool,

    /// 名字列表文件，每行一个名字
    #[arg(short, long)]
    names_file: Option<PathBuf>,

    /// TOML 配置文件
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 每批名字数量
    #[arg(long)]
    batch_size: Option<usize>,

    /// 同时进行的搜索数量
    #[arg(long)]
    max_workers: Option<usize>,

    /// 同一搜索结果内两次关注之间的间隔（毫秒）
    #[arg(long)]
    follow_delay_ms: Option<u64>,

    /// 提交搜索任务之间的间隔（毫秒）
    #[arg(long)]
    submit_delay_ms: Option<u64>,

    /// 使用 handle 而不是 profileId 作为关注目标
    #[arg(long, default_value_t = false)]
    use_handle: bool,

    /// 去重时忽略大小写
    #[arg(long, default_value_t = false)]
    case_insensitive: bool,

    /// 批次结束后重试被限流的关注
    #[arg(long, default_value_t = false)]
    requeue_rate_limited: bool,

    /// 处理前打乱名字顺序
    #[arg(long, default_value_t = false)]
    shuffle: bool,
}

impl Cli {
    /// 命令行参数优先级最高
    fn apply(&self, config: &mut Config) {
        if self.verbose {
            config.verbose_logging = true;
        }
        if let Some(path) = &self.names_file {
            config.names_file = path.clone();
        }
        if let Some(v) = self.batch_size {
            config.batch_size = v;
        }
        if let Some(v) = self.max_workers {
            config.max_workers = v;
        }
        if let Some(v) = self.follow_delay_ms {
            config.follow_delay_ms = v;
        }
        if let Some(v) = self.submit_delay_ms {
            config.search_submit_delay_ms = v;
        }
        if self.use_handle {
            config.identifier_field = IdentifierField::Handle;
        }
        if self.case_insensitive {
            config.dedup_mode = DedupMode::CaseInsensitive;
        }
        if self.requeue_rate_limited {
            config.rate_limit_policy = RateLimitPolicy::RequeueAtBatchEnd;
        }
        if self.shuffle {
            config.shuffle = true;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // 加载配置
    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init(cli.verbose);
            error!("❌ {}", e);
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    // 初始化日志
    logging::init(config.verbose_logging);

    let (trigger, shutdown) = shutdown_channel();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("⚠️ 收到中断信号 (Ctrl+C)，正在停止...");
            trigger.trigger();
        }
    });

    // 初始化并运行应用
    let app = match App::initialize(config, shutdown) {
        Ok(app) => app,
        Err(e) => {
            error!("❌ 启动失败: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    match app.run().await {
        Ok(RunOutcome::Completed) => ExitCode::SUCCESS,
        Ok(RunOutcome::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
        Err(e) => {
            error!("❌ 运行失败: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
