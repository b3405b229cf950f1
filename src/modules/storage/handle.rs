use actix_web::{get, web, HttpResponse};

use crate::api::error;
use crate::modules::storage::service::ImageStorage;

#[get("/{filename}")]
pub async fn serve_image(
    storage: web::Data<ImageStorage>,
    filename: web::Path<String>,
) -> Result<HttpResponse, error::Error> {
    let (bytes, mime) =
        storage.read(&filename).await?.ok_or_else(|| error::Error::not_found("Image not found"))?;
    Ok(HttpResponse::Ok().content_type(mime).body(bytes))
}
