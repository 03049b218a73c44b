use std::path::Path;

use axum::extract::Multipart;
use cricket_server_domain::{ServiceError, ServiceResult};
use log::{error, info};
use rand::{Rng, distr::Alphanumeric};

use crate::config::ApiConfig;

/// Prefix under which stored files are served and referenced in records.
pub const PUBLIC_PREFIX: &str = "uploads";

const RANDOM_SUFFIX_LEN: usize = 8;

pub struct UploadedFile {
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

/// Reads the named file field from the form, ignoring every other field.
pub async fn read_file_field(
    mut multipart: Multipart,
    field_name: &str,
) -> ServiceResult<UploadedFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some(field_name) {
            let file_name = field.file_name().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| ServiceError::BadRequest(format!("Failed to read upload: {}", e)))?
                .to_vec();
            return Ok(UploadedFile { file_name, data });
        }
    }
    ServiceError::bad_request(format!("Missing file field '{}'", field_name))
}

/// Checks the file against the configured limits and writes it to the upload
/// directory. Returns the public path, e.g. `uploads/1718000000000_ab12CD34.png`.
pub async fn store_upload(config: &ApiConfig, file: &UploadedFile) -> ServiceResult<String> {
    if file.data.is_empty() {
        return ServiceError::bad_request("Uploaded file is empty");
    }
    if file.data.len() > config.upload_max_bytes {
        return ServiceError::bad_request(format!(
            "File exceeds the maximum size of {} bytes",
            config.upload_max_bytes
        ));
    }

    let extension = file
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !config.upload_extensions.contains(&extension) {
        return ServiceError::bad_request(format!(
            "File type not allowed, expected one of: {}",
            config.upload_extensions.join(", ")
        ));
    }

    let stored_name = format!("{}_{}.{}", unix_millis(), random_suffix(), extension);

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| ServiceError::Internal(format!("Failed to create upload dir: {}", e)))?;
    tokio::fs::write(config.upload_dir.join(&stored_name), &file.data)
        .await
        .map_err(|e| ServiceError::Internal(format!("Failed to write upload: {}", e)))?;

    info!("Stored upload {} ({} bytes)", stored_name, file.data.len());
    Ok(format!("{}/{}", PUBLIC_PREFIX, stored_name))
}

/// Called when the record update after a successful store fails.
pub fn log_orphaned_upload(public_path: &str, e: &ServiceError) {
    error!("Upload {} is orphaned, record update failed: {}", public_path, e);
}

fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn random_suffix() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_SUFFIX_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;

    use super::*;

    fn test_config() -> ApiConfig {
        ApiConfig {
            upload_dir: std::env::temp_dir().join(format!("cricket-uploads-{}", Uuid::new_v4())),
            upload_max_bytes: 16,
            ..Default::default()
        }
    }

    fn file(name: &str, data: &[u8]) -> UploadedFile {
        UploadedFile {
            file_name: Some(name.to_string()),
            data: data.to_vec(),
        }
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let config = test_config();
        let public_path = store_upload(&config, &file("Logo.PNG", b"png-bytes"))
            .await
            .unwrap();

        let stored_name = public_path.strip_prefix("uploads/").unwrap();
        let (millis, rest) = stored_name.split_once('_').unwrap();
        assert!(millis.parse::<i64>().is_ok());
        assert_eq!(rest.len(), RANDOM_SUFFIX_LEN + ".png".len());
        assert!(rest.ends_with(".png"));

        let on_disk: PathBuf = config.upload_dir.join(stored_name);
        assert_eq!(tokio::fs::read(&on_disk).await.unwrap(), b"png-bytes");
        tokio::fs::remove_dir_all(&config.upload_dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_disallowed_extension() {
        let config = test_config();
        for name in ["script.exe", "no_extension"] {
            assert!(matches!(
                store_upload(&config, &file(name, b"data")).await,
                Err(ServiceError::BadRequest(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_rejects_empty_and_oversized() {
        let config = test_config();
        assert!(store_upload(&config, &file("a.png", b"")).await.is_err());
        assert!(store_upload(&config, &file("a.png", &[0u8; 17])).await.is_err());
        assert!(!config.upload_dir.exists());
    }
}
