//! In-memory repositories and request helpers for service and HTTP tests.

use actix_web::{
    body::{to_bytes, MessageBody},
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test, web,
};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};

use crate::{
    api::error,
    modules::{
        photo::{
            model::{NewPhoto, PhotoForm, PhotoResponse, UpdatePhoto},
            repository::PhotoRepository,
            schema::PhotoEntity,
            service::PhotoService,
        },
        storage::{ImageStorage, UploadConfig},
        user::{
            model::{InsertUser, RegisterModel, UpdateUser},
            repository::UserRepository,
            schema::UserEntity,
            service::UserService,
        },
    },
    utils::TokenConfig,
};


pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00];
pub const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "secret123";

#[derive(Default)]
struct Store {
    users: Vec<UserEntity>,
    photos: Vec<PhotoEntity>,
    next_user_id: i64,
    next_photo_id: i64,
}

fn email_conflict() -> error::SystemError {
    error::SystemError::Conflict(error::conflict_message(Some("uq_users_email")))
}

/// Mirrors the `users` table, including the unique email constraint and the
/// cascade onto `photos`.
pub struct InMemoryUserRepository {
    store: Arc<Mutex<Store>>,
}

/// Mirrors the `photos` table, including the foreign key onto `users`.
pub struct InMemoryPhotoRepository {
    store: Arc<Mutex<Store>>,
}

#[async_trait::async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, error::SystemError> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserEntity>, error::SystemError> {
        let store = self.store.lock().unwrap();
        Ok(store.users.iter().find(|u| u.email == email).cloned())
    }

    async fn create(&self, user: &InsertUser) -> Result<i64, error::SystemError> {
        let mut store = self.store.lock().unwrap();
        if store.users.iter().any(|u| u.email == user.email) {
            return Err(email_conflict());
        }

        store.next_user_id += 1;
        let now = chrono::Utc::now();
        let entity = UserEntity {
            id: store.next_user_id,
            username: user.username.clone(),
            email: user.email.clone(),
            hash_password: user.hash_password.clone(),
            created_at: now,
            updated_at: now,
        };
        store.users.push(entity);
        Ok(store.next_user_id)
    }

    async fn update(&self, id: i64, user: &UpdateUser) -> Result<UserEntity, error::SystemError> {
        let mut store = self.store.lock().unwrap();
        if let Some(email) = &user.email {
            if store.users.iter().any(|u| u.id != id && &u.email == email) {
                return Err(email_conflict());
            }
        }

        let entity = store
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or_else(|| error::SystemError::not_found("User not found"))?;

        if let Some(username) = &user.username {
            entity.username = username.clone();
        }
        if let Some(email) = &user.email {
            entity.email = email.clone();
        }
        if let Some(hash_password) = &user.hash_password {
            entity.hash_password = hash_password.clone();
        }
        entity.updated_at = chrono::Utc::now();
        Ok(entity.clone())
    }

    async fn delete(&self, id: i64) -> Result<Option<Vec<String>>, error::SystemError> {
        let mut store = self.store.lock().unwrap();
        let Some(position) = store.users.iter().position(|u| u.id == id) else {
            return Ok(None);
        };
        store.users.remove(position);

        let (removed, kept): (Vec<_>, Vec<_>) =
            store.photos.drain(..).partition(|p| p.user_id == id);
        store.photos = kept;
        Ok(Some(removed.into_iter().map(|p| p.photo_url).collect()))
    }
}

#[async_trait::async_trait]
impl PhotoRepository for InMemoryPhotoRepository {
    async fn create(&self, photo: &NewPhoto) -> Result<PhotoEntity, error::SystemError> {
        let mut store = self.store.lock().unwrap();
        if !store.users.iter().any(|u| u.id == photo.user_id) {
            return Err(error::SystemError::not_found("User not found"));
        }

        store.next_photo_id += 1;
        let now = chrono::Utc::now();
        let entity = PhotoEntity {
            id: store.next_photo_id,
            title: photo.title.clone(),
            caption: photo.caption.clone(),
            photo_url: photo.photo_url.clone(),
            user_id: photo.user_id,
            created_at: now,
            updated_at: now,
        };
        store.photos.push(entity.clone());
        Ok(entity)
    }

    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PhotoEntity>, error::SystemError> {
        let store = self.store.lock().unwrap();
        Ok(store.photos.iter().filter(|p| p.user_id == user_id).cloned().collect())
    }

    async fn find_owned(
        &self,
        photo_id: i64,
        user_id: i64,
    ) -> Result<Option<PhotoEntity>, error::SystemError> {
        let store = self.store.lock().unwrap();
        Ok(store.photos.iter().find(|p| p.id == photo_id && p.user_id == user_id).cloned())
    }

    async fn update(
        &self,
        photo: &UpdatePhoto,
    ) -> Result<Option<(PhotoEntity, String)>, error::SystemError> {
        let mut store = self.store.lock().unwrap();
        let Some(entity) =
            store.photos.iter_mut().find(|p| p.id == photo.id && p.user_id == photo.user_id)
        else {
            return Ok(None);
        };

        let previous_url = entity.photo_url.clone();
        entity.title = photo.title.clone();
        entity.caption = photo.caption.clone();
        if let Some(photo_url) = &photo.photo_url {
            entity.photo_url = photo_url.clone();
        }
        entity.updated_at = chrono::Utc::now();
        Ok(Some((entity.clone(), previous_url)))
    }

    async fn delete(
        &self,
        photo_id: i64,
        user_id: i64,
    ) -> Result<Option<PhotoEntity>, error::SystemError> {
        let mut store = self.store.lock().unwrap();
        let position =
            store.photos.iter().position(|p| p.id == photo_id && p.user_id == user_id);
        Ok(position.map(|i| store.photos.remove(i)))
    }
}

/// Services wired to in-memory repositories and a temporary upload directory.
pub struct TestContext {
    pub users: Arc<InMemoryUserRepository>,
    pub photos: Arc<InMemoryPhotoRepository>,
    pub storage: Arc<ImageStorage>,
    pub tokens: Arc<TokenConfig>,
    pub user_service: UserService,
    pub photo_service: PhotoService,
    upload_dir: tempfile::TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_max_file_size(1024 * 1024)
    }

    pub fn with_max_file_size(max_file_size: usize) -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Mutex::new(Store::default()));

        let users = Arc::new(InMemoryUserRepository { store: store.clone() });
        let photos = Arc::new(InMemoryPhotoRepository { store });
        let storage = Arc::new(ImageStorage::new(UploadConfig {
            max_file_size,
            upload_dir: upload_dir.path().to_string_lossy().into_owned(),
        }));
        let tokens = Arc::new(TokenConfig::new(TEST_SECRET, 1));

        let user_service =
            UserService::with_dependencies(users.clone(), storage.clone(), tokens.clone());
        let photo_service = PhotoService::with_dependencies(photos.clone(), storage.clone());

        Self { users, photos, storage, tokens, user_service, photo_service, upload_dir }
    }

    /// Registers app data the same way `main` does, then the routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.user_service.clone()))
            .app_data(web::Data::new(self.photo_service.clone()))
            .app_data(web::Data::from(self.storage.clone()))
            .app_data(web::Data::from(self.tokens.clone()))
            .configure(crate::configure);
    }

    pub async fn register(&self, email: &str) -> i64 {
        self.user_service
            .register(RegisterModel {
                username: email.split('@').next().unwrap().to_string(),
                email: email.to_string(),
                password: TEST_PASSWORD.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn upload(&self, user_id: i64, bytes: &[u8]) -> PhotoResponse {
        let form = PhotoForm {
            title: "Title".to_string(),
            caption: "Caption".to_string(),
            file: Some(bytes.to_vec()),
        };
        self.photo_service.upload(user_id, form).await.unwrap()
    }

    pub fn token_for(&self, user_id: i64) -> String {
        self.tokens.issue(user_id).unwrap()
    }

    pub fn stored_file(&self, photo_url: &str) -> PathBuf {
        self.upload_dir.path().join(photo_url.rsplit('/').next().unwrap())
    }

    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.upload_dir.path()).unwrap().count()
    }
}

pub const BOUNDARY: &str = "photo-api-test-boundary";

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Builds a `multipart/form-data` body from text fields and an optional file.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(bytes) = file {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            b"Content-Disposition: form-data; name=\"file\"; filename=\"upload.bin\"\r\n",
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Calls the service and returns the status with the parsed JSON body.
/// Errors raised by middleware are rendered the way the server would.
pub async fn call_json<S, R, B>(app: &S, req: R) -> (StatusCode, serde_json::Value)
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let (status, bytes) = match test::try_call_service(app, req).await {
        Ok(res) => (res.status(), test::read_body(res).await),
        Err(err) => {
            let res = err.error_response();
            (res.status(), to_bytes(res.into_body()).await.unwrap())
        }
    };

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
