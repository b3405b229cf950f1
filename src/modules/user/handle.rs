use actix_web::{delete, get, middleware::from_fn, post, put, web, HttpRequest};

use crate::modules::user::{model, service::UserService};
use crate::{
    api::{error, success},
    middlewares::{authentication, get_extensions},
    utils::{Claims, ValidatedJson},
};

#[post("/register")]
pub async fn register(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::RegisterModel>,
) -> Result<success::Success<()>, error::Error> {
    user_service.register(user_data.0).await?;
    Ok(success::Success::created(None))
}

#[post("/login")]
pub async fn login(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::LoginModel>,
) -> Result<success::Success<model::LoginResponse>, error::Error> {
    let token = user_service.login(user_data.0).await?;
    Ok(success::Success::ok(Some(model::LoginResponse { token })))
}

#[get("", wrap = "from_fn(authentication)")]
pub async fn get_profile(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<model::UserResponse>, error::Error> {
    let id = get_extensions::<Claims>(&req)?.id;
    let user = user_service.get_by_id(id).await?;
    Ok(success::Success::ok(Some(user)))
}

#[put("", wrap = "from_fn(authentication)")]
pub async fn update_profile(
    user_service: web::Data<UserService>,
    user_data: ValidatedJson<model::UpdateUserModel>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let id = get_extensions::<Claims>(&req)?.id;
    user_service.update(id, user_data.0).await?;
    Ok(success::Success::ok(None))
}

#[delete("", wrap = "from_fn(authentication)")]
pub async fn delete_account(
    user_service: web::Data<UserService>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let id = get_extensions::<Claims>(&req)?.id;
    user_service.delete(id).await?;
    Ok(success::Success::ok(None))
}
