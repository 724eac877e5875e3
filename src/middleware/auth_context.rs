use std::future::{ready, Ready};

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, web, Error, FromRequest, HttpMessage, HttpRequest,
};

use crate::middleware::auth::Claims;
use crate::services::auth_service::decode_token;
use crate::state::AppState;

/// The caller behind a request. Uses the claims left by `AuthMiddleware`, or
/// decodes the bearer token itself on routes without the middleware.
/// Take it as `Option<AuthenticatedUser>` where signing in is optional.
#[derive(Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
}

impl From<&Claims> for AuthenticatedUser {
    fn from(claims: &Claims) -> Self {
        Self {
            user_id: claims.user_id.clone(),
            email: claims.sub.clone(),
        }
    }
}

fn claims_from_header(req: &HttpRequest) -> Option<Claims> {
    let token = req
        .headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    let state = req.app_data::<web::Data<AppState>>()?;
    decode_token(token, &state.config.jwt_secret).ok()
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        if let Some(claims) = req.extensions().get::<Claims>() {
            return ready(Ok(AuthenticatedUser::from(claims)));
        }

        match claims_from_header(req) {
            Some(claims) => ready(Ok(AuthenticatedUser::from(&claims))),
            None => ready(Err(ErrorUnauthorized("User not authenticated"))),
        }
    }
}
