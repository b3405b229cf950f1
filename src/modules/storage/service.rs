use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::api::error;
use crate::modules::storage::model::{ImageKind, UploadConfig, PUBLIC_PATH};

/// Local-disk store for uploaded photos.
pub struct ImageStorage {
    config: UploadConfig,
}

impl ImageStorage {
    pub fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    pub fn max_file_size(&self) -> usize {
        self.config.max_file_size
    }

    /// Validate file size and sniff the image type
    pub fn inspect(&self, bytes: &[u8]) -> Result<ImageKind, error::SystemError> {
        if bytes.is_empty() {
            return Err(error::SystemError::bad_request("invalid file"));
        }

        if bytes.len() > self.config.max_file_size {
            return Err(error::SystemError::bad_request(format!(
                "File size exceeds maximum allowed size of {} bytes",
                self.config.max_file_size
            )));
        }

        ImageKind::sniff(bytes).ok_or_else(|| error::SystemError::bad_request("invalid file type"))
    }

    /// Writes the image under a fresh name and returns its public path,
    /// e.g. `public/images/<uuid>.png`.
    pub async fn save(&self, kind: ImageKind, bytes: &[u8]) -> Result<String, error::SystemError> {
        tokio::fs::create_dir_all(&self.config.upload_dir).await?;

        let filename = format!("{}.{}", Uuid::now_v7(), kind.extension());
        tokio::fs::write(Path::new(&self.config.upload_dir).join(&filename), bytes).await?;

        log::info!("Stored image {} ({} bytes)", filename, bytes.len());
        Ok(format!("{PUBLIC_PATH}/{filename}"))
    }

    /// Deletes the file behind a stored public path. Failures are logged and
    /// otherwise ignored.
    pub async fn remove(&self, photo_url: &str) {
        let Some(path) = photo_url.rsplit('/').next().and_then(|name| self.resolve(name)) else {
            log::warn!("Refusing to remove unexpected photo path {}", photo_url);
            return;
        };

        if let Err(e) = tokio::fs::remove_file(&path).await {
            log::warn!("Failed to remove image {}: {}", path.display(), e);
        }
    }

    /// Reads a stored image by file name, returning its bytes and content type.
    pub async fn read(
        &self,
        filename: &str,
    ) -> Result<Option<(Vec<u8>, String)>, error::SystemError> {
        let Some(path) = self.resolve(filename) else {
            return Ok(None);
        };

        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let mime = mime_guess::from_path(&path).first_or_octet_stream();
                Ok(Some((bytes, mime.to_string())))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if filename.is_empty()
            || filename.contains(['/', '\\'])
            || filename.contains("..")
            || filename.starts_with('.')
        {
            return None;
        }
        Some(Path::new(&self.config.upload_dir).join(filename))
    }
}
