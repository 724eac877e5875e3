use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId, DateTime};
use mongodb::error::{ErrorKind, WriteError, WriteFailure};

use crate::middleware::auth_context::AuthenticatedUser;
use crate::models::user::{AuthResponse, LoginRequest, RegisterRequest, User, UserProfile};
use crate::routes::{error_body, parse_object_id};
use crate::services::auth_service::{
    generate_token, hash_password, is_valid_email, is_valid_password, verify_password,
};
use crate::state::AppState;

const DUPLICATE_KEY: i32 = 11000;

fn token_response(user: &User, data: &AppState) -> HttpResponse {
    let user_id = user.id.unwrap_or_default();
    match generate_token(&user.email, user_id, &data.config.jwt_secret) {
        Ok(token) => HttpResponse::Ok().json(AuthResponse {
            token,
            user: UserProfile::from(user),
        }),
        Err(err) => {
            log::error!("Token generation failed: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Token generation failed"))
        }
    }
}

/*
    POST /api/auth/register
*/
pub async fn register(
    data: web::Data<AppState>,
    input: web::Json<RegisterRequest>,
) -> impl Responder {
    let input = input.into_inner();
    let email = input.email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return HttpResponse::BadRequest().json(error_body("Invalid email address"));
    }
    if !is_valid_password(&input.password) {
        return HttpResponse::BadRequest()
            .json(error_body("Password must be at least 8 characters"));
    }

    let password = match hash_password(&input.password) {
        Ok(hash) => hash,
        Err(err) => {
            log::error!("Failed to hash password: {:?}", err);
            return HttpResponse::InternalServerError().json(error_body("Failed to create user"));
        }
    };

    let mut user = User {
        id: None,
        name: input.name.trim().to_string(),
        email,
        password,
        created_at: Some(DateTime::now()),
    };

    match data.store.users().insert_one(&user).await {
        Ok(result) => {
            user.id = result.inserted_id.as_object_id();
            token_response(&user, &data)
        }
        Err(err) => match *err.kind {
            ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. }))
                if code == DUPLICATE_KEY =>
            {
                HttpResponse::Conflict().json(error_body("User already exists"))
            }
            _ => {
                log::error!("Failed to create user: {:?}", err);
                HttpResponse::InternalServerError().json(error_body("Failed to create user"))
            }
        },
    }
}

/*
    POST /api/auth/login
*/
pub async fn login(data: web::Data<AppState>, input: web::Json<LoginRequest>) -> impl Responder {
    let email = input.email.trim().to_lowercase();

    match data.store.users().find_one(doc! { "email": &email }).await {
        Ok(Some(user)) if verify_password(&input.password, &user.password) => {
            token_response(&user, &data)
        }
        Ok(_) => HttpResponse::Unauthorized().json(error_body("Invalid credentials")),
        Err(err) => {
            log::error!("Database error during login: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to sign in"))
        }
    }
}

/*
    GET /api/auth/me
*/
pub async fn me(user: AuthenticatedUser, data: web::Data<AppState>) -> impl Responder {
    let user_id: ObjectId = match parse_object_id(&user.user_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match data.store.users().find_one(doc! { "_id": user_id }).await {
        Ok(Some(user)) => {
            HttpResponse::Ok().json(serde_json::json!({ "user": UserProfile::from(&user) }))
        }
        Ok(None) => HttpResponse::NotFound().json(error_body("User not found")),
        Err(err) => {
            log::error!("Failed to fetch user: {:?}", err);
            HttpResponse::InternalServerError().json(error_body("Failed to fetch user"))
        }
    }
}
