use crate::modules::user::handle::*;
use actix_web::web::{scope, ServiceConfig};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/users")
            .service(register)
            .service(login)
            .service(get_profile)
            .service(update_profile)
            .service(delete_account),
    );
}
