use actix_cors::Cors;
use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use std::sync::Arc;

use crate::{
    api::error,
    configs::{connect_database, run_migrations},
    modules::{
        photo::{repository_pg::PhotoRepositoryPg, service::PhotoService},
        storage::{ImageStorage, UploadConfig},
        user::{repository_pg::UserRepositoryPg, service::UserService},
    },
    utils::TokenConfig,
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

/// Routes and extractor settings shared by the server and the HTTP tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::PathConfig::default()
            .error_handler(|err, _| error::Error::bad_request(err.to_string()).into()),
    )
    .service(health_check)
    .configure(modules::storage::route::configure)
    .service(
        web::scope("/api/v1")
            .configure(modules::user::route::configure)
            .configure(modules::photo::route::configure),
    );
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let env = constants::Env::new().map_err(std::io::Error::other)?;
    log::info!("Environment variables loaded");

    let db_pool = connect_database(&env)
        .await
        .map_err(|_| std::io::Error::other("Database connection error"))?;
    run_migrations(&db_pool).await.map_err(std::io::Error::other)?;

    let tokens = Arc::new(TokenConfig::new(env.jwt_secret.clone(), env.jwt_expiration_hours));
    let storage = Arc::new(ImageStorage::new(UploadConfig {
        max_file_size: env.max_upload_size,
        upload_dir: env.upload_dir.clone(),
    }));

    let user_repo = Arc::new(UserRepositoryPg::new(db_pool.clone()));
    let photo_repo = Arc::new(PhotoRepositoryPg::new(db_pool.clone()));

    let user_service = UserService::with_dependencies(user_repo, storage.clone(), tokens.clone());
    let photo_service = PhotoService::with_dependencies(photo_repo, storage.clone());

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    let frontend_url = env.frontend_url.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(photo_service.clone()))
            .app_data(web::Data::from(storage.clone()))
            .app_data(web::Data::from(tokens.clone()))
            .configure(configure)
    })
    .bind((env.ip.as_str(), env.port))?
    .workers(env.workers)
    .run()
    .await
}
