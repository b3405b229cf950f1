use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct PhotoEntity {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
