use crate::core::{cleaning, csv_io, spreadsheet, transform};
use crate::core::{ConfigProvider, Dataset, Pipeline, ProcessingReport, Storage, TransformResult};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{validate_file_extension, SUPPORTED_INPUT_EXTENSIONS};
use std::io::Write;
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};

/// 輸出檔名：CSV 輸入為 `processed_<主檔名>.csv`，其他格式把副檔名併入檔名
/// (`data.tsv` → `processed_data_tsv.csv`)，同主檔名的輸入各自有輸出檔
pub fn processed_file_name(input: &str) -> String {
    let path = Path::new(input);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
    {
        Some(ext) if ext != "csv" => format!("processed_{}_{}.csv", stem, ext),
        _ => format!("processed_{}.csv", stem),
    }
}

/// 讀取上傳的 CSV/TSV/試算表，清理並轉換後寫回 storage
pub struct CleaningPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> CleaningPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file(&self, name: &str) -> String {
        format!("{}/{}", self.config.output_path().trim_end_matches('/'), name)
    }

    fn build_bundle(&self, result: &TransformResult) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();

        zip.start_file("processed.csv", options)?;
        zip.write_all(&csv_io::write_dataset(&result.dataset, b',')?)?;

        zip.start_file("processed.tsv", options)?;
        zip.write_all(&csv_io::write_dataset(&result.dataset, b'\t')?)?;

        zip.start_file("report.json", options)?;
        zip.write_all(serde_json::to_string_pretty(&result.report)?.as_bytes())?;

        Ok(zip.finish()?.into_inner())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for CleaningPipeline<S, C> {
    async fn extract(&self) -> Result<Dataset> {
        let input = self.config.input_file();
        validate_file_extension(input, SUPPORTED_INPUT_EXTENSIONS)?;

        if !self.storage.exists(input).await? {
            return Err(EtlError::NotFoundError {
                resource: input.to_string(),
            });
        }

        tracing::debug!("Reading input file: {}", input);
        let bytes = self.storage.read_file(input).await?;
        let dataset = if spreadsheet::is_spreadsheet(input) {
            spreadsheet::read_spreadsheet(input, &bytes)?
        } else {
            csv_io::read_dataset(&bytes, csv_io::delimiter_for(input))?
        };

        tracing::debug!(
            "Parsed {} rows x {} columns from {}",
            dataset.row_count(),
            dataset.columns.len(),
            input
        );
        Ok(dataset)
    }

    async fn transform(&self, data: Dataset) -> Result<TransformResult> {
        let options = self.config.options();
        let source = self.config.input_file().to_string();

        // 純 CPU 運算，移到 blocking pool 避免卡住 runtime
        tokio::task::spawn_blocking(move || {
            let mut dataset = data;
            let mut report = ProcessingReport::new(source, &dataset);

            cleaning::clean(&mut dataset, &options, &mut report);
            transform::transform(&mut dataset, &options, &mut report);

            report.rows_out = dataset.row_count();
            TransformResult { dataset, report }
        })
        .await
        .map_err(|e| EtlError::ProcessingError {
            message: format!("Transform task failed: {}", e),
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let file_name = processed_file_name(self.config.input_file());
        let csv_data = csv_io::write_dataset(&result.dataset, b',')?;

        tracing::debug!("Writing {} ({} bytes) to storage", file_name, csv_data.len());
        self.storage.write_file(&file_name, &csv_data).await?;

        if self.config.bundle_output() {
            let bundle_name = format!("{}.zip", file_name.trim_end_matches(".csv"));
            let zip_data = self.build_bundle(result)?;
            tracing::debug!("Writing bundle {} ({} bytes)", bundle_name, zip_data.len());
            self.storage.write_file(&bundle_name, &zip_data).await?;
        }

        Ok(self.output_file(&file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessingOptions;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_file(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(path.to_string(), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                EtlError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn exists(&self, path: &str) -> Result<bool> {
            Ok(self.files.lock().await.contains_key(path))
        }
    }

    struct MockConfig {
        input_file: String,
        options: ProcessingOptions,
        bundle: bool,
    }

    impl MockConfig {
        fn new(input_file: &str) -> Self {
            Self {
                input_file: input_file.to_string(),
                options: ProcessingOptions::default(),
                bundle: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn input_file(&self) -> &str {
            &self.input_file
        }

        fn output_path(&self) -> &str {
            "test_output"
        }

        fn options(&self) -> ProcessingOptions {
            self.options
        }

        fn bundle_output(&self) -> bool {
            self.bundle
        }
    }

    const SAMPLE: &str = "id,age,city\n1,20,Taipei\n2,,Tainan\n2,,Tainan\n3,40,\n";

    #[test]
    fn test_processed_file_name() {
        assert_eq!(processed_file_name("abc_sales.csv"), "processed_abc_sales.csv");
        assert_eq!(processed_file_name("metrics.tsv"), "processed_metrics_tsv.csv");
        assert_eq!(processed_file_name("Report.XLSX"), "processed_Report_xlsx.csv");
    }

    #[test]
    fn test_processed_file_name_keeps_formats_apart() {
        assert_ne!(processed_file_name("data.csv"), processed_file_name("data.tsv"));
        assert_ne!(processed_file_name("data.xlsx"), processed_file_name("data.xls"));
    }

    #[tokio::test]
    async fn test_extract_reads_dataset() {
        let storage = MockStorage::with_file("sample.csv", SAMPLE);
        let pipeline = CleaningPipeline::new(storage, MockConfig::new("sample.csv"));

        let dataset = pipeline.extract().await.unwrap();

        assert_eq!(dataset.row_count(), 4);
        assert_eq!(dataset.column_names(), vec!["id", "age", "city"]);
    }

    #[tokio::test]
    async fn test_extract_missing_file() {
        let storage = MockStorage::with_file("sample.csv", SAMPLE);
        let pipeline = CleaningPipeline::new(storage, MockConfig::new("other.csv"));

        let result = pipeline.extract().await;

        assert!(matches!(result, Err(EtlError::NotFoundError { .. })));
    }

    #[tokio::test]
    async fn test_extract_rejects_unknown_format() {
        let storage = MockStorage::with_file("sample.json", SAMPLE);
        let pipeline = CleaningPipeline::new(storage, MockConfig::new("sample.json"));

        let result = pipeline.extract().await;

        assert!(matches!(result, Err(EtlError::UnsupportedFileError { .. })));
    }

    #[tokio::test]
    async fn test_extract_reads_spreadsheet_by_extension() {
        let storage = MockStorage {
            files: Arc::new(Mutex::new(HashMap::from([(
                "sales.xlsx".to_string(),
                include_bytes!("../../tests/fixtures/sales.xlsx").to_vec(),
            )]))),
        };
        let pipeline = CleaningPipeline::new(storage, MockConfig::new("sales.xlsx"));

        let dataset = pipeline.extract().await.unwrap();

        assert_eq!(dataset.row_count(), 8);
        assert_eq!(dataset.column_names(), vec!["order_id", "region", "units", "price"]);
    }

    #[tokio::test]
    async fn test_extract_csv_named_as_spreadsheet_fails() {
        let storage = MockStorage::with_file("sample.xlsx", SAMPLE);
        let pipeline = CleaningPipeline::new(storage, MockConfig::new("sample.xlsx"));

        let result = pipeline.extract().await;

        assert!(matches!(result, Err(EtlError::UnsupportedFileError { .. })));
    }

    #[tokio::test]
    async fn test_transform_cleans_and_encodes() {
        let storage = MockStorage::with_file("sample.csv", SAMPLE);
        let pipeline = CleaningPipeline::new(storage, MockConfig::new("sample.csv"));

        let dataset = pipeline.extract().await.unwrap();
        let result = pipeline.transform(dataset).await.unwrap();

        assert_eq!(result.report.rows_in, 4);
        assert_eq!(result.report.rows_out, 3);
        assert_eq!(result.report.duplicates_removed, 1);
        // age 一格、city 一格
        assert_eq!(result.report.imputed_cells, 2);
        assert_eq!(
            result.dataset.column_names(),
            vec!["id", "age", "city_Tainan", "city_Taipei"]
        );
    }

    #[tokio::test]
    async fn test_load_writes_csv_only_by_default() {
        let storage = MockStorage::with_file("sample.csv", SAMPLE);
        let pipeline = CleaningPipeline::new(storage.clone(), MockConfig::new("sample.csv"));

        let dataset = pipeline.extract().await.unwrap();
        let result = pipeline.transform(dataset).await.unwrap();
        let output_path = pipeline.load(&result).await.unwrap();

        assert_eq!(output_path, "test_output/processed_sample.csv");

        let csv = String::from_utf8(storage.get_file("processed_sample.csv").await.unwrap()).unwrap();
        assert!(csv.starts_with("id,age,city_Tainan,city_Taipei\n"));
        assert_eq!(csv.lines().count(), 4);
        assert!(storage.get_file("processed_sample.zip").await.is_none());
    }

    #[tokio::test]
    async fn test_load_with_bundle() {
        let storage = MockStorage::with_file("sample.csv", SAMPLE);
        let mut config = MockConfig::new("sample.csv");
        config.bundle = true;
        let pipeline = CleaningPipeline::new(storage.clone(), config);

        let dataset = pipeline.extract().await.unwrap();
        let result = pipeline.transform(dataset).await.unwrap();
        pipeline.load(&result).await.unwrap();

        let zip_bytes = storage.get_file("processed_sample.zip").await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_bytes)).unwrap();

        let mut file_names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        file_names.sort();
        assert_eq!(file_names, vec!["processed.csv", "processed.tsv", "report.json"]);

        let report: ProcessingReport = {
            let mut report_file = archive.by_name("report.json").unwrap();
            let mut content = String::new();
            std::io::Read::read_to_string(&mut report_file, &mut content).unwrap();
            serde_json::from_str(&content).unwrap()
        };
        assert_eq!(report.source_file, "sample.csv");
        assert_eq!(report.rows_out, 3);
    }
}
