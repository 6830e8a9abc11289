use clap::Parser;
use tidy_etl::utils::error::ErrorSeverity;
use tidy_etl::utils::{logger, validation::Validate};
use tidy_etl::{CleaningPipeline, CliConfig, EtlEngine, LocalStorage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting tidy-etl CLI");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 輸入檔改用絕對路徑，storage 以輸出目錄為根
    config.input = match std::fs::canonicalize(&config.input) {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(e) => {
            eprintln!("❌ Cannot open input file '{}': {}", config.input, e);
            std::process::exit(1);
        }
    };

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = CleaningPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(outcome) => {
            let report = &outcome.report;
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", outcome.output_path);
            println!(
                "📊 Rows: {} -> {} ({} duplicates, {} outliers removed, {} cells imputed)",
                report.rows_in,
                report.rows_out,
                report.duplicates_removed,
                report.outliers_removed,
                report.imputed_cells
            );
            if !report.encoded_columns.is_empty() {
                println!("🏷️ Encoded columns: {}", report.encoded_columns.join(", "));
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
