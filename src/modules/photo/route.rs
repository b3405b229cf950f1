use crate::{middlewares::authentication, modules::photo::handle::*};
use actix_web::{
    middleware::from_fn,
    web::{scope, ServiceConfig},
};

pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/photos")
            .wrap(from_fn(authentication))
            .service(list_photos)
            .service(upload_photo)
            .service(update_photo)
            .service(delete_photo),
    );
}
