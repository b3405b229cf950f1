use crate::{
    api::error,
    modules::photo::{
        model::{NewPhoto, UpdatePhoto},
        schema::PhotoEntity,
    },
};

/// Every lookup and mutation is scoped to the owning user.
#[async_trait::async_trait]
pub trait PhotoRepository {
    async fn create(&self, photo: &NewPhoto) -> Result<PhotoEntity, error::SystemError>;
    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PhotoEntity>, error::SystemError>;
    async fn find_owned(
        &self,
        photo_id: i64,
        user_id: i64,
    ) -> Result<Option<PhotoEntity>, error::SystemError>;
    /// Returns the updated row together with the `photo_url` it replaced.
    async fn update(
        &self,
        photo: &UpdatePhoto,
    ) -> Result<Option<(PhotoEntity, String)>, error::SystemError>;
    /// Returns the deleted row so its file can be cleaned up.
    async fn delete(
        &self,
        photo_id: i64,
        user_id: i64,
    ) -> Result<Option<PhotoEntity>, error::SystemError>;
}
