#![allow(clippy::unused_async)]
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Multipart, State};
use kernel::{FileReport, FsMover, UploadRegistry, Uploads};

use crate::config::Config;
use crate::error::ApiError;
use crate::naming::destination_name;
use crate::staging::{self, StagedRequest};
use crate::upload_reply::UploadReply;

/// Receives files from a multipart form and saves each successfully uploaded one.
///
/// Part names `field`, `field[]` and `field[N]` group files by field.
#[utoipa::path(
    post,
    path = "/api/upload",
    request_body(content = String, content_type = "multipart/form-data", description = "Files to upload"),
    responses(
        (status = 201, description = "At least one file saved", body = [FileReport]),
        (status = 200, description = "No file saved", body = [FileReport]),
        (status = 400, description = "Malformed multipart body", body = String),
        (status = 500, description = "Server error", body = String)
    ),
    tag = "uploads",
)]
pub async fn upload(
    State(config): State<Arc<Config>>,
    mut multipart: Multipart,
) -> Result<UploadReply, ApiError> {
    let start = Instant::now();
    let StagedRequest { source, dir } =
        staging::stage(&mut multipart, &config.temp_dir, config.max_file_size).await?;

    let uploads = UploadRegistry::normalize(source);
    tracing::info!(
        "received {} file(s) in {} field(s)",
        uploads.file_count(),
        uploads.len()
    );

    let save_dir = config.save_dir.clone();
    let reports = tokio::task::spawn_blocking(move || {
        let reports = save_all(uploads, &save_dir);
        drop(dir);
        reports
    })
    .await?;

    tracing::info!("upload handled in {:?}", start.elapsed());
    Ok(UploadReply::new(reports))
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Server is up", body = String),
    ),
    tag = "uploads",
)]
pub async fn health() -> &'static str {
    "OK"
}

/// Saves every file on its own so that one failure never stops the others.
fn save_all(mut uploads: Uploads, save_dir: &Path) -> Vec<FileReport> {
    uploads
        .files_mut()
        .map(|(field, index, file)| {
            let destination = save_dir.join(destination_name(file.uid(), file.client_name()));
            let outcome = file.save(&destination, &FsMover);
            match &outcome {
                Ok(()) => tracing::info!(
                    "file '{}' of field '{field}' saved to {} ({} bytes)",
                    file.client_name(),
                    destination.display(),
                    file.size()
                ),
                Err(e) => tracing::warn!(
                    "file '{}' of field '{field}' not saved: {e}",
                    file.client_name()
                ),
            }
            FileReport::new(field, index, file).with_outcome(outcome.as_ref().map(|_| ()))
        })
        .collect()
}
