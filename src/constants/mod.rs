use std::str::FromStr;

use crate::api::error::SystemError;

pub struct Env {
    pub jwt_secret: String,
    pub jwt_expiration_hours: u64,
    pub database_url: String,
    pub database_max_connections: u32,
    pub frontend_url: String,
    pub upload_dir: String,
    pub max_upload_size: usize,
    pub ip: String,
    pub port: u16,
    pub workers: usize,
}

fn required(key: &'static str) -> Result<String, SystemError> {
    std::env::var(key).map_err(|_| {
        SystemError::config(format!("{key} must be set in .env file or environment variable"))
    })
}

fn optional<T: FromStr>(key: &'static str, default: T) -> Result<T, SystemError> {
    match std::env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            SystemError::config(format!("{key} must be a valid {}", std::any::type_name::<T>()))
        }),
        Err(_) => Ok(default),
    }
}

impl Env {
    pub fn new() -> Result<Self, SystemError> {
        let jwt_secret = required("SECRET_KEY")?;
        if jwt_secret.is_empty() {
            return Err(SystemError::config("SECRET_KEY cannot be empty"));
        }

        Ok(Env {
            jwt_secret,
            jwt_expiration_hours: optional("JWT_EXPIRATION_HOURS", 72)?,
            database_url: required("DATABASE_URL")?,
            database_max_connections: optional("DATABASE_MAX_CONNECTIONS", 5)?,
            frontend_url: optional("FRONTEND_URL", "http://localhost:5173".to_string())?,
            upload_dir: optional("UPLOAD_DIR", "./public/images".to_string())?,
            max_upload_size: optional("MAX_UPLOAD_SIZE", 10 * 1024 * 1024)?,
            ip: optional("IP", "127.0.0.1".to_string())?,
            port: optional("PORT", 8080)?,
            workers: optional("WORKERS", 2)?,
        })
    }
}
