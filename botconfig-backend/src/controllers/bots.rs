//! Bot-config HTTP surface.
//!
//! One resource multiplexes the four operations: POST carries either
//! the first-use password set
//! (`{"action":"set_password",...}`) or a full save, GET and DELETE take
//! the password in the query string. `/api/bots/public` serves the
//! republished snapshot without a credential check.

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::models::BotConfig;
use crate::store::StoreError;

#[derive(Deserialize)]
pub struct BotsPostRequest {
    action: Option<String>,
    password: Option<String>,
    bots: Option<Vec<BotConfig>>,
}

#[derive(Deserialize)]
pub struct GetBotsQuery {
    password: Option<String>,
}

#[derive(Deserialize)]
pub struct DeleteBotQuery {
    password: Option<String>,
    #[serde(rename = "botId")]
    bot_id: Option<String>,
}

#[derive(Serialize)]
struct SuccessResponse {
    success: bool,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/bots")
            .route(web::get().to(get_bots))
            .route(web::post().to(post_bots))
            .route(web::delete().to(delete_bot)),
    );
    cfg.service(web::resource("/api/bots/public").route(web::get().to(public_bots)));
}

fn bad_request(msg: &str) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: msg.to_string(),
    })
}

fn store_error_response(e: StoreError) -> HttpResponse {
    match e {
        StoreError::Unauthorized => HttpResponse::Unauthorized().json(ErrorResponse {
            error: "Invalid password".to_string(),
        }),
        StoreError::AlreadySet => bad_request("Password already set"),
        StoreError::Storage(msg) => {
            log::error!("Storage backend failure: {}", msg);
            HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Database error".to_string(),
            })
        }
    }
}

async fn get_bots(state: web::Data<AppState>, query: web::Query<GetBotsQuery>) -> impl Responder {
    let Some(password) = query.password.as_deref() else {
        return bad_request("Password required");
    };

    match state.gateway.get_bots(password) {
        Ok(bots) => HttpResponse::Ok().json(bots),
        Err(e) => store_error_response(e),
    }
}

async fn post_bots(
    state: web::Data<AppState>,
    body: web::Json<BotsPostRequest>,
) -> impl Responder {
    // First-use password set shares the endpoint with saves
    if body.action.as_deref() == Some("set_password") {
        let Some(password) = body.password.as_deref() else {
            return bad_request("Invalid request");
        };
        return match state.gateway.set_password(password) {
            Ok(()) => HttpResponse::Ok().json(SuccessResponse { success: true }),
            Err(e) => store_error_response(e),
        };
    }

    let (Some(password), Some(bots)) = (body.password.as_deref(), body.bots.as_ref()) else {
        return bad_request("Password and bots required");
    };

    match state.gateway.save_bots(password, bots) {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse { success: true }),
        Err(e) => store_error_response(e),
    }
}

async fn delete_bot(
    state: web::Data<AppState>,
    query: web::Query<DeleteBotQuery>,
) -> impl Responder {
    let (Some(password), Some(bot_id)) = (query.password.as_deref(), query.bot_id.as_deref())
    else {
        return bad_request("Password and botId required");
    };

    match state.gateway.delete_bot(password, bot_id) {
        Ok(()) => HttpResponse::Ok().json(SuccessResponse { success: true }),
        Err(e) => store_error_response(e),
    }
}

async fn public_bots(state: web::Data<AppState>) -> impl Responder {
    // The public read never fails; worst case an empty list
    let bots = state.gateway.public_bots().unwrap_or_else(|e| {
        log::error!("Failed to read published snapshot: {}", e);
        Vec::new()
    });
    HttpResponse::Ok().json(bots)
}
