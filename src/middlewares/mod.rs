use actix_web::{
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header,
    middleware::Next,
    web, Error, HttpMessage, HttpRequest,
};

use crate::{api::error, utils::TokenConfig};

/// Verifies the bearer token and stores its `Claims` in the request
/// extensions. A bare token without the `Bearer ` prefix is accepted too.
pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<B>, Error>
where
    B: MessageBody + 'static,
{
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .map(|h| h.strip_prefix("Bearer ").unwrap_or(h).trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| error::Error::unauthorized("token not found"))?;

    let tokens = req.app_data::<web::Data<TokenConfig>>().cloned().ok_or_else(|| {
        log::error!("TokenConfig is not registered as app data");
        error::Error::internal_server_error()
    })?;

    let claims = tokens.verify(&token).map_err(|_| error::Error::unauthorized("token invalid"))?;

    req.extensions_mut().insert(claims);

    next.call(req).await
}

pub fn get_extensions<T: Clone + 'static>(req: &HttpRequest) -> Result<T, error::Error> {
    let extensions = req.extensions();

    let value =
        extensions.get::<T>().ok_or_else(|| error::Error::unauthorized("Unauthorized"))?.clone();

    Ok(value)
}
