use log::info;
use std::sync::Arc;

use crate::api::error;
use crate::modules::storage::ImageStorage;
use crate::modules::user::model::{
    InsertUser, LoginModel, RegisterModel, UpdateUser, UpdateUserModel, UserResponse,
};
use crate::modules::user::repository::UserRepository;
use crate::utils::{hash_password, verify_password, TokenConfig};

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository + Send + Sync>,
    storage: Arc<ImageStorage>,
    tokens: Arc<TokenConfig>,
}

impl UserService {
    pub fn with_dependencies(
        repo: Arc<dyn UserRepository + Send + Sync>,
        storage: Arc<ImageStorage>,
        tokens: Arc<TokenConfig>,
    ) -> Self {
        info!("UserService initialized with dependencies");
        UserService { repo, storage, tokens }
    }

    pub async fn register(&self, user: RegisterModel) -> Result<i64, error::SystemError> {
        if self.repo.find_by_email(&user.email).await?.is_some() {
            return Err(error::SystemError::conflict("Email already exists"));
        }

        let hash_password = hash_password(&user.password)?;

        let new_user =
            InsertUser { username: user.username, email: user.email, hash_password };

        let user_id = self.repo.create(&new_user).await?;
        info!("User {} registered", user_id);
        Ok(user_id)
    }

    pub async fn login(&self, user: LoginModel) -> Result<String, error::SystemError> {
        let user_entity = self
            .repo
            .find_by_email(&user.email)
            .await?
            .ok_or_else(|| error::SystemError::unauthorized("wrong email or password"))?;

        let valid = verify_password(&user_entity.hash_password, &user.password)?;
        if !valid {
            return Err(error::SystemError::unauthorized("wrong email or password"));
        }

        self.tokens.issue(user_entity.id)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<UserResponse, error::SystemError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| error::SystemError::not_found("User not found"))
    }

    pub async fn update(&self, id: i64, user: UpdateUserModel) -> Result<(), error::SystemError> {
        if user.username.is_none() && user.email.is_none() && user.password.is_none() {
            return Err(error::SystemError::bad_request("No fields to update"));
        }

        let hash_password = match user.password {
            Some(password) => Some(hash_password(&password)?),
            None => None,
        };

        let update_user = UpdateUser { username: user.username, email: user.email, hash_password };

        self.repo.update(id, &update_user).await?;
        info!("User {} updated", id);
        Ok(())
    }

    /// Deletes the account with its photos, then removes their files.
    pub async fn delete(&self, id: i64) -> Result<(), error::SystemError> {
        let photo_urls = self
            .repo
            .delete(id)
            .await?
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        for photo_url in &photo_urls {
            self.storage.remove(photo_url).await;
        }

        info!("User {} deleted along with {} photo(s)", id, photo_urls.len());
        Ok(())
    }
}
