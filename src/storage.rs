use crate::errors::AppError;
use crate::models::SubmissionRecord;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

pub fn resolve_submissions_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("BAND_SUBMISSIONS_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/registrations.json"))
}

pub async fn record_submission(path: &Path, record: &SubmissionRecord) -> Result<(), AppError> {
    let mut records: Vec<serde_json::Value> = match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(err) => {
                error!("failed to parse submissions file, starting a new one: {err}");
                Vec::new()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
        Err(err) => return Err(AppError::internal(err)),
    };

    records.push(serde_json::to_value(record).map_err(AppError::internal)?);
    let payload = serde_json::to_vec_pretty(&records).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(AppError::internal)?;
    Ok(())
}
