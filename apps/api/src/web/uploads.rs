use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

#[derive(Debug)]
pub struct UploadedResume {
    pub file_name: String,
    pub data: Bytes,
}

/// The `/matcher` form: a job description and any number of resume files.
#[derive(Debug, Default)]
pub struct MatchUpload {
    pub job_description: String,
    pub resumes: Vec<UploadedResume>,
}

#[derive(Debug)]
pub struct SavedResume {
    pub file_name: String,
    pub path: PathBuf,
}

pub async fn read_match_upload(mut multipart: Multipart) -> Result<MatchUpload, AppError> {
    let mut upload = MatchUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "job_description" => {
                upload.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?;
            }
            "resumes" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?;
                // An empty file input still submits a part, with no file name.
                if file_name.is_empty() {
                    continue;
                }
                upload.resumes.push(UploadedResume { file_name, data });
            }
            _ => {
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?;
            }
        }
    }

    Ok(upload)
}

/// Writes every upload into `dir` under the client's file name.
///
/// Names are used as given. Two uploads sharing a name land on the same path,
/// so the later one overwrites the earlier before anything is extracted.
pub async fn save_uploads(
    dir: &Path,
    resumes: &[UploadedResume],
) -> Result<Vec<SavedResume>, AppError> {
    let mut saved = Vec::with_capacity(resumes.len());
    for resume in resumes {
        let path = dir.join(&resume.file_name);
        tokio::fs::write(&path, &resume.data)
            .await
            .with_context(|| format!("Failed to save upload to {}", path.display()))?;
        saved.push(SavedResume {
            file_name: resume.file_name.clone(),
            path,
        });
    }
    Ok(saved)
}
