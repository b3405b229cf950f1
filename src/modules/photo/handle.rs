use actix_multipart::Multipart;
use actix_web::{delete, get, post, put, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::photo::{
        model::{PhotoForm, PhotoListResponse, PhotoResponse},
        service::PhotoService,
    },
    utils::Claims,
};

#[get("")]
pub async fn list_photos(
    photo_service: web::Data<PhotoService>,
    req: HttpRequest,
) -> Result<success::Success<PhotoListResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.id;
    let photos = photo_service.list(user_id).await?;
    Ok(success::Success::ok(Some(photos)))
}

#[post("")]
pub async fn upload_photo(
    photo_service: web::Data<PhotoService>,
    payload: Multipart,
    req: HttpRequest,
) -> Result<success::Success<PhotoResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.id;
    let form = PhotoForm::from_multipart(payload, photo_service.max_file_size()).await?;
    let photo = photo_service.upload(user_id, form).await?;
    Ok(success::Success::created(Some(photo)))
}

#[put("/{photo_id}")]
pub async fn update_photo(
    photo_service: web::Data<PhotoService>,
    photo_id: web::Path<i64>,
    payload: Multipart,
    req: HttpRequest,
) -> Result<success::Success<PhotoResponse>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.id;
    let form = PhotoForm::from_multipart(payload, photo_service.max_file_size()).await?;
    let photo = photo_service.update(user_id, photo_id.into_inner(), form).await?;
    Ok(success::Success::ok(Some(photo)))
}

#[delete("/{photo_id}")]
pub async fn delete_photo(
    photo_service: web::Data<PhotoService>,
    photo_id: web::Path<i64>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let user_id = get_extensions::<Claims>(&req)?.id;
    photo_service.delete(user_id, photo_id.into_inner()).await?;
    Ok(success::Success::ok(None))
}
