use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{api::error, modules::photo::schema::PhotoEntity};

/// Multipart body of photo upload and update requests.
#[derive(Default, Validate)]
pub struct PhotoForm {
    #[validate(length(min = 1, message = "title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "caption is required"))]
    pub caption: String,
    pub file: Option<Vec<u8>>,
}

impl PhotoForm {
    /// Collects the `file`, `title` and `caption` fields. Any field larger
    /// than `max_file_size` aborts the read.
    pub async fn from_multipart(
        mut payload: Multipart,
        max_file_size: usize,
    ) -> Result<Self, error::Error> {
        let mut form = PhotoForm::default();

        while let Some(mut field) =
            payload.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            let mut bytes = Vec::new();
            while let Some(chunk) =
                field.try_next().await.map_err(|e| error::Error::bad_request(e.to_string()))?
            {
                if bytes.len() + chunk.len() > max_file_size {
                    return Err(error::Error::bad_request(format!(
                        "File size exceeds maximum allowed size of {} bytes",
                        max_file_size
                    )));
                }
                bytes.extend_from_slice(&chunk);
            }

            match name.as_str() {
                "file" => form.file = Some(bytes),
                "title" => form.title = text_field("title", bytes)?,
                "caption" => form.caption = text_field("caption", bytes)?,
                _ => {}
            }
        }

        form.validate().map_err(|e| error::Error::bad_request(e.to_string()))?;
        Ok(form)
    }
}

fn text_field(name: &str, bytes: Vec<u8>) -> Result<String, error::Error> {
    String::from_utf8(bytes)
        .map(|s| s.trim().to_string())
        .map_err(|_| error::Error::bad_request(format!("{name} must be valid UTF-8 text")))
}

pub struct NewPhoto {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
}

pub struct UpdatePhoto {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub caption: String,
    /// `None` keeps the current image.
    pub photo_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoResponse {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Deserialize, Serialize)]
pub struct PhotoListResponse {
    pub photos: Vec<PhotoResponse>,
}

impl From<PhotoEntity> for PhotoResponse {
    fn from(entity: PhotoEntity) -> Self {
        PhotoResponse {
            id: entity.id,
            title: entity.title,
            caption: entity.caption,
            photo_url: entity.photo_url,
            user_id: entity.user_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
