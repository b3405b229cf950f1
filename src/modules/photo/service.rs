use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::photo::{
    model::{NewPhoto, PhotoForm, PhotoListResponse, PhotoResponse, UpdatePhoto},
    repository::PhotoRepository,
};
use crate::modules::storage::ImageStorage;

#[derive(Clone)]
pub struct PhotoService {
    repo: Arc<dyn PhotoRepository + Send + Sync>,
    storage: Arc<ImageStorage>,
}

impl PhotoService {
    pub fn with_dependencies(
        repo: Arc<dyn PhotoRepository + Send + Sync>,
        storage: Arc<ImageStorage>,
    ) -> Self {
        info!("PhotoService initialized with dependencies");
        PhotoService { repo, storage }
    }

    pub fn max_file_size(&self) -> usize {
        self.storage.max_file_size()
    }

    /// Store the image and save its metadata
    pub async fn upload(
        &self,
        user_id: i64,
        form: PhotoForm,
    ) -> Result<PhotoResponse, error::SystemError> {
        let bytes = form.file.ok_or_else(|| error::SystemError::bad_request("file is required"))?;
        let kind = self.storage.inspect(&bytes)?;
        let photo_url = self.storage.save(kind, &bytes).await?;

        let new_photo = NewPhoto { title: form.title, caption: form.caption, photo_url, user_id };

        match self.repo.create(&new_photo).await {
            Ok(entity) => {
                info!("User {} uploaded photo {}", user_id, entity.id);
                Ok(PhotoResponse::from(entity))
            }
            Err(e) => {
                self.storage.remove(&new_photo.photo_url).await;
                Err(e)
            }
        }
    }

    pub async fn list(&self, user_id: i64) -> Result<PhotoListResponse, error::SystemError> {
        let photos = self.repo.find_all_by_user(user_id).await?;
        Ok(PhotoListResponse { photos: photos.into_iter().map(PhotoResponse::from).collect() })
    }

    /// Replace title and caption, and the image itself when a new file is sent
    pub async fn update(
        &self,
        user_id: i64,
        photo_id: i64,
        form: PhotoForm,
    ) -> Result<PhotoResponse, error::SystemError> {
        if self.repo.find_owned(photo_id, user_id).await?.is_none() {
            return Err(error::SystemError::not_found("Photo not found"));
        }

        let new_url = match &form.file {
            Some(bytes) => {
                let kind = self.storage.inspect(bytes)?;
                Some(self.storage.save(kind, bytes).await?)
            }
            None => None,
        };

        let update = UpdatePhoto {
            id: photo_id,
            user_id,
            title: form.title,
            caption: form.caption,
            photo_url: new_url.clone(),
        };

        let result = self.repo.update(&update).await.and_then(|row| {
            row.ok_or_else(|| error::SystemError::not_found("Photo not found"))
        });

        let (updated, previous_url) = match result {
            Ok(row) => row,
            Err(e) => {
                if let Some(url) = &new_url {
                    self.storage.remove(url).await;
                }
                return Err(e);
            }
        };

        if previous_url != updated.photo_url {
            self.storage.remove(&previous_url).await;
        }

        info!("User {} updated photo {}", user_id, photo_id);
        Ok(PhotoResponse::from(updated))
    }

    pub async fn delete(&self, user_id: i64, photo_id: i64) -> Result<(), error::SystemError> {
        let deleted = self
            .repo
            .delete(photo_id, user_id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("Photo not found"))?;

        self.storage.remove(&deleted.photo_url).await;

        info!("User {} deleted photo {}", user_id, photo_id);
        Ok(())
    }
}
