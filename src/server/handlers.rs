use crate::config::ProcessJob;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::CleaningPipeline;
use crate::core::{ProcessingOptions, ProcessingReport, Storage};
use crate::domain::options::{Encoding, ImputeStrategy, OutlierMethod, Scaling};
use crate::server::AppState;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

const UPLOAD_FIELD: &str = "file";
const PROCESSED_PREFIX: &str = "processed_";
const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub message: String,
    pub file_path: String,
}

/// 未帶的選項沿用伺服器設定檔的 `[processing]` 預設值
#[derive(Debug, Default, Deserialize)]
pub struct ProcessRequest {
    pub file_path: Option<String>,
    pub impute_strategy: Option<ImputeStrategy>,
    pub remove_outliers: Option<bool>,
    pub outlier_method: Option<OutlierMethod>,
    pub scaling: Option<Scaling>,
    pub encoding: Option<Encoding>,
}

impl ProcessRequest {
    fn options(&self, defaults: ProcessingOptions) -> ProcessingOptions {
        ProcessingOptions {
            impute_strategy: self.impute_strategy.unwrap_or(defaults.impute_strategy),
            remove_outliers: self.remove_outliers.unwrap_or(defaults.remove_outliers),
            outlier_method: self.outlier_method.unwrap_or(defaults.outlier_method),
            scaling: self.scaling.unwrap_or(defaults.scaling),
            encoding: self.encoding.unwrap_or(defaults.encoding),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub message: String,
    pub processed_file: String,
    pub download_url: String,
    pub report: ProcessingReport,
}

fn no_file_uploaded() -> EtlError {
    EtlError::ValidationError {
        message: "No file uploaded".to_string(),
    }
}

fn invalid_file_path() -> EtlError {
    EtlError::ValidationError {
        message: "Invalid file path".to_string(),
    }
}

fn multipart_error(e: MultipartError) -> EtlError {
    EtlError::ValidationError {
        message: format!("Malformed upload: {}", e.body_text()),
    }
}

/// 只保留檔名部分，非 `[A-Za-z0-9._-]` 字元換成 `_`
pub fn sanitize_file_name(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    // 保留副檔名，截掉過長的主檔名
    if cleaned.len() > MAX_NAME_LEN {
        let ext_start = cleaned.rfind('.').unwrap_or(cleaned.len());
        let ext = &cleaned[ext_start..];
        let keep = MAX_NAME_LEN.saturating_sub(ext.len());
        format!("{}{}", &cleaned[..keep.min(ext_start)], ext)
    } else {
        cleaned.to_string()
    }
}

pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // 瀏覽器在未選擇檔案時仍會送出空檔名的欄位
        let original = match field.file_name() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => return Err(no_file_uploaded()),
        };
        let sanitized = sanitize_file_name(&original);
        validation::validate_file_extension(&sanitized, validation::SUPPORTED_INPUT_EXTENSIONS)?;

        let data = field.bytes().await.map_err(multipart_error)?;
        let stored = format!("{}_{}", uuid::Uuid::new_v4().simple(), sanitized);
        state.storage.write_file(&stored, &data).await?;

        tracing::info!(
            "📤 Stored upload '{}' as {} ({} bytes)",
            original,
            stored,
            data.len()
        );

        return Ok(Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_path: stored,
        }));
    }

    Err(no_file_uploaded())
}

pub async fn process(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>> {
    let Json(request) = payload.map_err(|rejection| EtlError::ValidationError {
        message: rejection.body_text(),
    })?;

    let file_path = request.file_path.clone().unwrap_or_default();
    if validation::validate_file_name("file_path", &file_path).is_err()
        || !state.storage.exists(&file_path).await?
    {
        return Err(invalid_file_path());
    }

    let job = ProcessJob {
        input_file: file_path,
        output_path: state.config.upload_dir().to_string(),
        options: request.options(state.config.processing),
    };
    job.validate()?;

    tracing::info!("⚙️ Processing {} with {:?}", job.input_file, job.options);

    let pipeline = CleaningPipeline::new(state.storage.clone(), job);
    let engine = EtlEngine::new_with_monitoring(pipeline, state.config.monitoring.enabled);
    let outcome = engine.run().await?;

    let processed_file = std::path::Path::new(&outcome.output_path)
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| EtlError::ProcessingError {
            message: format!("Unexpected output path: {}", outcome.output_path),
        })?;

    Ok(Json(ProcessResponse {
        message: "Data processed successfully".to_string(),
        download_url: format!("/download/{}", processed_file),
        processed_file,
        report: outcome.report,
    }))
}

pub async fn download(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse> {
    validation::validate_file_name("name", &name)?;

    if !name.starts_with(PROCESSED_PREFIX) || !state.storage.exists(&name).await? {
        return Err(EtlError::NotFoundError { resource: name });
    }

    let data = state.storage.read_file(&name).await?;
    let content_type = match std::path::Path::new(&name)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some("csv") => "text/csv; charset=utf-8",
        Some("zip") => "application/zip",
        _ => "application/octet-stream",
    };

    tracing::info!("📥 Serving download {} ({} bytes)", name, data.len());

    Ok((
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", name),
            ),
        ],
        data,
    ))
}
