//! Async job submission and single-delivery polling.

use axum::extract::multipart::Multipart;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

use hushcut_models::JobId;

use crate::batch::process_batch;
use crate::error::{ApiError, ApiResult};
use crate::handlers::process::{attachment_response, parse_upload};
use crate::jobs::{CompletedOutput, JobPoll};
use crate::state::AppState;

/// In-progress status body for `GET /job/{job_id}`.
#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: JobId,
    pub status: String,
    pub filename: String,
    pub created_at: String,
    pub message: String,
}

/// `POST /process-audio-async`: submit one file for background processing.
pub async fn submit_async(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResult<Response> {
    let mut request = parse_upload(
        multipart,
        &state.config.silence_policy,
        state.config.max_upload_bytes,
    )
    .await?;

    if request.files.is_empty() {
        return Err(ApiError::bad_request("No files provided"));
    }
    if request.files.len() > 1 {
        return Err(ApiError::bad_request(
            "Async processing accepts exactly one file",
        ));
    }

    let file = request.files.remove(0);
    let record = state.jobs.create_pending(&file.filename);
    info!(job_id = %record.job_id, filename = %file.filename, "Job submitted");

    let job_id = record.job_id.clone();
    let worker_state = state.clone();
    let policy = request.policy;
    let format = request.format;

    tokio::spawn(async move {
        worker_state.jobs.mark_processing(&job_id);

        let output_format = file.output_format(format);
        let mut processed = process_batch(
            vec![file],
            &policy,
            format,
            &worker_state.config.export_policy,
            worker_state.encoder.as_ref(),
        )
        .await;

        match processed.pop() {
            Some(p) if p.outcome.success => {
                let Some(artifact) = p.artifact else {
                    worker_state.jobs.mark_failed(&job_id, "No artifact produced");
                    return;
                };
                let download_name = p
                    .outcome
                    .output_name
                    .clone()
                    .unwrap_or_else(|| "processed_audio".to_string());
                worker_state.jobs.mark_completed(
                    &job_id,
                    CompletedOutput {
                        bytes: artifact.bytes,
                        file: artifact.file,
                        format: output_format,
                        download_name,
                    },
                );
                info!(job_id = %job_id, "Job completed");
            }
            Some(p) => {
                let detail = p
                    .outcome
                    .error
                    .unwrap_or_else(|| "Unknown error".to_string());
                error!(job_id = %job_id, error = %detail, "Job failed");
                worker_state.jobs.mark_failed(&job_id, detail);
            }
            None => {
                worker_state.jobs.mark_failed(&job_id, "No outcome produced");
            }
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({
            "job_id": record.job_id,
            "status": record.status,
            "filename": record.filename,
            "created_at": record.created_at.to_rfc3339(),
        })),
    )
        .into_response())
}

/// `GET /job/{job_id}`: poll a job; terminal states deliver once.
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Response> {
    let job_id = JobId::from(job_id);

    match state.jobs.poll(&job_id) {
        None => Err(ApiError::not_found("Job not found")),
        Some(JobPoll::InProgress(record)) => Ok(Json(JobStatusResponse {
            job_id: record.job_id,
            status: record.status.to_string(),
            filename: record.filename,
            created_at: record.created_at.to_rfc3339(),
            message: "Audio processing in progress...".to_string(),
        })
        .into_response()),
        Some(JobPoll::Completed(record, output)) => {
            let data = tokio::fs::read(output.file.path())
                .await
                .map_err(|e| ApiError::internal(format!("Failed to read artifact: {}", e)))?;

            info!(job_id = %record.job_id, bytes = output.bytes, "Delivering job artifact");
            Ok(attachment_response(
                output.format.mime_type(),
                &output.download_name,
                data,
            ))
        }
        Some(JobPoll::Failed(record)) => {
            let detail = record
                .error
                .unwrap_or_else(|| "Unknown error".to_string());
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": detail })),
            )
                .into_response())
        }
    }
}
