//! Synchronous upload processing.

use axum::extract::multipart::Multipart;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::info;

use hushcut_models::{is_allowed_input, OutputFormat, ProcessingSummary, SilencePolicy};

use crate::archive::build_archive;
use crate::batch::{process_batch, ProcessedFile, UploadedFile};
use crate::error::{ApiError, ApiResult, FailureDetail};
use crate::state::AppState;

/// Multipart field names accepted for file parts.
const FILE_FIELDS: &[&str] = &["file", "audio"];

/// Everything parsed out of a multipart request body.
pub(crate) struct UploadRequest {
    pub files: Vec<UploadedFile>,
    pub format: Option<OutputFormat>,
    pub policy: SilencePolicy,
}

/// Parse the multipart body: file parts plus optional policy fields.
pub(crate) async fn parse_upload(
    mut multipart: Multipart,
    base_policy: &SilencePolicy,
    max_upload_bytes: usize,
) -> ApiResult<UploadRequest> {
    let mut files = Vec::new();
    let mut format = None;
    let mut policy = base_policy.clone();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };

        if FILE_FIELDS.contains(&name.as_str()) {
            let filename = field.file_name().unwrap_or_default().to_string();
            if filename.is_empty() {
                return Err(ApiError::bad_request("No file selected"));
            }
            if !is_allowed_input(&filename) {
                return Err(ApiError::bad_request(format!(
                    "File type not allowed: {}",
                    filename
                )));
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

            if data.len() > max_upload_bytes {
                return Err(ApiError::PayloadTooLarge(format!(
                    "{} exceeds the {} byte upload limit",
                    filename, max_upload_bytes
                )));
            }

            files.push(UploadedFile {
                filename,
                data: data.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed form field: {}", e)))?;

        match name.as_str() {
            "output_format" => format = Some(OutputFormat::parse_or_default(&value)),
            "min_silence_len" => {
                if let Ok(ms) = value.trim().parse() {
                    policy = policy.with_min_silence_ms(ms);
                }
            }
            "silence_thresh" => {
                if let Ok(dbfs) = value.trim().parse() {
                    policy = policy.with_silence_thresh(dbfs);
                }
            }
            "keep_silence" => {
                if let Ok(ms) = value.trim().parse() {
                    policy = policy.with_keep_silence_ms(ms);
                }
            }
            _ => {}
        }
    }

    Ok(UploadRequest {
        files,
        format,
        policy,
    })
}

/// `POST /process-audio`: trim silence from one or more uploads.
///
/// One file returns a direct audio attachment; several return a zip of
/// the successful artifacts plus `processing_summary.json`.
pub async fn process_audio(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let request = parse_upload(
        multipart,
        &state.config.silence_policy,
        state.config.max_upload_bytes,
    )
    .await?;

    if request.files.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }

    let file_count = request.files.len();
    info!(files = file_count, "Processing upload batch");

    let processed = process_batch(
        request.files,
        &request.policy,
        request.format,
        &state.config.export_policy,
        state.encoder.as_ref(),
    )
    .await;

    if file_count == 1 {
        return single_file_response(processed).await;
    }

    let summary =
        ProcessingSummary::from_outcomes(processed.iter().map(|p| p.outcome.clone()).collect());

    if !summary.any_success() {
        return Err(batch_failure(&processed));
    }

    let bytes = build_archive(&processed, &summary).await?;
    info!(
        entries = summary.succeeded,
        failed = summary.failed,
        archive_bytes = bytes.len(),
        "Returning archive response"
    );

    Ok(attachment_response(
        "application/zip",
        "processed_audio.zip",
        bytes,
    ))
}

/// Build the direct single-artifact response (archive bypass for N == 1).
async fn single_file_response(processed: Vec<ProcessedFile>) -> ApiResult<Response> {
    let file = processed
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::internal("Batch produced no outcome"))?;

    let Some(artifact) = file.artifact else {
        return Err(batch_failure(&[file]));
    };

    let output_name = file
        .outcome
        .output_name
        .as_deref()
        .unwrap_or("processed_audio")
        .to_string();

    let format = file
        .outcome
        .output_name
        .as_deref()
        .and_then(|n| n.rsplit_once('.'))
        .map(|(_, ext)| OutputFormat::parse_or_default(ext))
        .unwrap_or_default();

    let data = tokio::fs::read(artifact.file.path())
        .await
        .map_err(|e| ApiError::internal(format!("Failed to read artifact: {}", e)))?;

    Ok(attachment_response(format.mime_type(), &output_name, data))
}

/// Aggregate per-file failures into the request-terminal error.
fn batch_failure(processed: &[ProcessedFile]) -> ApiError {
    ApiError::BatchFailed {
        details: processed
            .iter()
            .filter(|p| !p.outcome.success)
            .map(|p| FailureDetail {
                filename: p.outcome.source_filename.clone(),
                error: p
                    .outcome
                    .error
                    .clone()
                    .unwrap_or_else(|| "Unknown error".to_string()),
            })
            .collect(),
    }
}

/// Build a download response with attachment headers.
pub(crate) fn attachment_response(
    content_type: &str,
    filename: &str,
    body: Vec<u8>,
) -> Response {
    let disposition = format!("attachment; filename=\"{}\"", filename);

    let mut response = (StatusCode::OK, body).into_response();
    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(content_type) {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    response
}
