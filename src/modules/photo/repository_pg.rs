use sqlx::prelude::FromRow;

use crate::{
    api::error,
    modules::photo::{
        model::{NewPhoto, UpdatePhoto},
        repository::PhotoRepository,
        schema::PhotoEntity,
    },
};

#[derive(FromRow)]
struct UpdatedPhotoRow {
    #[sqlx(flatten)]
    photo: PhotoEntity,
    previous_url: String,
}

#[derive(Clone)]
pub struct PhotoRepositoryPg {
    pool: sqlx::PgPool,
}

impl PhotoRepositoryPg {
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PhotoRepository for PhotoRepositoryPg {
    async fn create(&self, photo: &NewPhoto) -> Result<PhotoEntity, error::SystemError> {
        let entity = sqlx::query_as::<_, PhotoEntity>(
            r#"
            INSERT INTO photos (title, caption, photo_url, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&photo.title)
        .bind(&photo.caption)
        .bind(&photo.photo_url)
        .bind(photo.user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(entity)
    }

    async fn find_all_by_user(&self, user_id: i64) -> Result<Vec<PhotoEntity>, error::SystemError> {
        let photos = sqlx::query_as::<_, PhotoEntity>(
            "SELECT * FROM photos WHERE user_id = $1 ORDER BY id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(photos)
    }

    async fn find_owned(
        &self,
        photo_id: i64,
        user_id: i64,
    ) -> Result<Option<PhotoEntity>, error::SystemError> {
        let photo = sqlx::query_as::<_, PhotoEntity>(
            "SELECT * FROM photos WHERE id = $1 AND user_id = $2",
        )
        .bind(photo_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(photo)
    }

    async fn update(
        &self,
        photo: &UpdatePhoto,
    ) -> Result<Option<(PhotoEntity, String)>, error::SystemError> {
        // the locked subquery reads the url being replaced in the same statement
        let row = sqlx::query_as::<_, UpdatedPhotoRow>(
            r#"
            UPDATE photos p
            SET
                title      = $3,
                caption    = $4,
                photo_url  = COALESCE($5, p.photo_url),
                updated_at = NOW()
            FROM (
                SELECT id, photo_url FROM photos
                WHERE id = $1 AND user_id = $2
                FOR UPDATE
            ) old
            WHERE p.id = old.id
            RETURNING p.*, old.photo_url AS previous_url
            "#,
        )
        .bind(photo.id)
        .bind(photo.user_id)
        .bind(&photo.title)
        .bind(&photo.caption)
        .bind(&photo.photo_url) // $5: Option<String>
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| (row.photo, row.previous_url)))
    }

    async fn delete(
        &self,
        photo_id: i64,
        user_id: i64,
    ) -> Result<Option<PhotoEntity>, error::SystemError> {
        let entity = sqlx::query_as::<_, PhotoEntity>(
            "DELETE FROM photos WHERE id = $1 AND user_id = $2 RETURNING *",
        )
        .bind(photo_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(entity)
    }
}
