use crate::{
    api::error,
    modules::user::{
        model::{InsertUser, UpdateUser},
        schema::UserEntity,
    },
};

#[async_trait::async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, error::SystemError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError>;
    async fn create(&self, user: &InsertUser) -> Result<i64, error::SystemError>;
    /// Applies the provided fields only; `NotFound` when the row is gone.
    async fn update(&self, id: i64, user: &UpdateUser) -> Result<UserEntity, error::SystemError>;
    /// Deletes the user with its photos and returns their `photo_url`s;
    /// `None` when the user does not exist.
    async fn delete(&self, id: i64) -> Result<Option<Vec<String>>, error::SystemError>;
}
