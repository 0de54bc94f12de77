use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use bytes::Bytes;
use uuid::Uuid;

use crate::config::MAX_UPLOAD_SIZE;

/// Writes one uploaded document under `{upload_dir}/{kind}/{owner_id}/` and
/// returns the stored path. The original filename survives only in sanitized
/// form; the extension must be on the allow-list.
pub async fn save_upload(
    upload_dir: &str,
    kind: &str,
    owner_id: Uuid,
    original_filename: &str,
    allowed_extensions: &[&str],
    data: Bytes,
) -> Result<String> {
    if data.is_empty() {
        return Err(anyhow!("Uploaded file is empty"));
    }
    if data.len() > MAX_UPLOAD_SIZE {
        return Err(anyhow!(
            "Uploaded file exceeds the {} byte limit",
            MAX_UPLOAD_SIZE
        ));
    }

    let extension = Path::new(original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .ok_or_else(|| anyhow!("Uploaded file has no extension"))?;

    if !allowed_extensions.contains(&extension.as_str()) {
        return Err(anyhow!(
            "Only {} files are allowed",
            allowed_extensions.join("/")
        ));
    }

    let directory: PathBuf = Path::new(upload_dir).join(kind).join(owner_id.to_string());
    tokio::fs::create_dir_all(&directory).await?;

    let safe_name = sanitize_filename::sanitize(original_filename);
    let file_path = directory.join(format!("{}_{}", Uuid::new_v4(), safe_name));
    tokio::fs::write(&file_path, &data).await?;

    Ok(file_path.to_string_lossy().into_owned())
}
