use anyhow::Context;
use clap::Parser;
use tidy_etl::server;
use tidy_etl::utils::{logger, validation::Validate};
use tidy_etl::ServerConfig;

#[derive(Parser)]
#[command(name = "tidy-server")]
#[command(about = "Web front end for uploading, cleaning and downloading data files")]
struct Args {
    /// Path to TOML configuration file (optional)
    #[arg(short, long)]
    config: Option<String>,

    /// Override server.bind_address
    #[arg(long)]
    bind: Option<String>,

    /// Override server.upload_dir
    #[arg(long)]
    upload_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON logs
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置，未指定時全部使用預設值
    let mut config = match &args.config {
        Some(path) => ServerConfig::from_file(path)
            .with_context(|| format!("failed to load config file '{}'", path))?,
        None => ServerConfig::default(),
    };

    // 應用命令列覆蓋設定
    if let Some(bind) = args.bind {
        config.server.bind_address = bind;
    }
    if let Some(upload_dir) = args.upload_dir {
        config.server.upload_dir = upload_dir;
    }
    config.monitoring.json_logs |= args.json_logs;

    logger::init_server_logger(args.verbose, config.monitoring.json_logs);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "🚀 Starting tidy-server (uploads: {}, max upload: {}MB, defaults: {:?})",
        config.upload_dir(),
        config.server.max_upload_mb,
        config.processing
    );

    server::serve(config).await?;
    Ok(())
}
