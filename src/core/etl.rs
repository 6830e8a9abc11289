use crate::core::{Pipeline, ProcessingReport};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct EtlOutcome {
    pub output_path: String,
    pub report: ProcessingReport,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<EtlOutcome> {
        tracing::info!("🚀 Starting ETL process");
        self.monitor.log_stats("Start");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!(
            "📥 Extracted {} rows, {} columns",
            raw_data.row_count(),
            raw_data.columns.len()
        );
        self.monitor.log_stats("Extract");

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;
        tracing::info!(
            "🔄 Transformed {} rows -> {} rows ({} duplicates, {} outliers removed, {} cells imputed)",
            transformed.report.rows_in,
            transformed.report.rows_out,
            transformed.report.duplicates_removed,
            transformed.report.outliers_removed,
            transformed.report.imputed_cells
        );
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(&transformed).await?;
        tracing::info!("📁 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(EtlOutcome {
            output_path,
            report: transformed.report,
        })
    }
}
