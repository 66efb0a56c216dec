use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{HttpResponse, Responder, web};
use log::{error, warn};
use serde::Deserialize;

use crate::captions::fetch_transcript;
use crate::extract_video_id;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct TranscriptRequest {
    pub url: String,
}

/// Register the transcript endpoint. POST does the work, OPTIONS answers
/// CORS preflight, every other method gets the 405 JSON body.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/transcript")
            .route(web::post().to(transcript))
            .route(web::method(Method::OPTIONS).to(preflight))
            .default_service(web::to(method_not_allowed)),
    );
}

/// Applied to every response, including error and 405 bodies.
pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new().add(("Access-Control-Allow-Origin", "*"))
}

/// Map body deserialization failures (missing or non-string `url`, malformed
/// JSON) onto the same error shape the handlers produce.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        actix_web::error::InternalError::from_response(
            err,
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Invalid request",
                "details": "URL is required and must be a string"
            })),
        )
        .into()
    })
}

pub async fn transcript(req: web::Json<TranscriptRequest>, state: web::Data<AppState>) -> impl Responder {
    let video_id = match extract_video_id(&req.url) {
        Some(id) => id,
        None => {
            warn!("No video ID in {:?}", req.url);
            return HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Failed to process request",
                "details": "Invalid YouTube URL format"
            }));
        }
    };

    match fetch_transcript(state.captions.as_ref(), &video_id).await {
        Ok(transcript) => HttpResponse::Ok().json(serde_json::json!({ "transcript": transcript })),
        Err(e) => {
            error!("Transcript request for {video_id} failed: {e:#}");
            HttpResponse::BadRequest().json(serde_json::json!({
                "error": "Failed to get transcript",
                "details": format!("{e:#}")
            }))
        }
    }
}

pub async fn preflight() -> impl Responder {
    HttpResponse::Ok()
        .insert_header(("Access-Control-Allow-Origin", "*"))
        .insert_header(("Access-Control-Allow-Methods", "POST, OPTIONS"))
        .insert_header(("Access-Control-Allow-Headers", "Content-Type"))
        .finish()
}

pub async fn method_not_allowed() -> impl Responder {
    HttpResponse::MethodNotAllowed().json(serde_json::json!({
        "error": "Method not allowed",
        "details": "Only POST requests are allowed"
    }))
}
