use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpResponse, HttpServer, Responder};
use chrono::Utc;
use host::{MemoryScoreSink, RopeConfig, RopeService, ScoreSink};
use rope_core::{RopeError, Submission};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
struct ErrorResponse {
    ok: bool,
    error: String,
}

/// GET /rope/start
/// Round parameters for the current UTC day
async fn rope_start(service: web::Data<RopeService>) -> impl Responder {
    let start = service.round_start(Utc::now());
    tracing::debug!("Round start requested (hint {})", start.seed_hint);
    HttpResponse::Ok().json(start)
}

/// POST /rope/submit
/// Replay a tap log and record the authoritative score
async fn rope_submit(
    req: web::Json<Submission>,
    service: web::Data<RopeService>,
    sink: web::Data<Arc<dyn ScoreSink>>,
) -> impl Responder {
    match service.submit(&req, Utc::now()) {
        Ok(result) => {
            let total = sink.record(req.player_id, result.score);
            tracing::debug!(
                "Player {} total is now {} after +{}",
                req.player_id,
                total,
                result.score
            );
            HttpResponse::Ok().json(result)
        }
        Err(e @ RopeError::TimeExceeded { .. }) => HttpResponse::BadRequest().json(ErrorResponse {
            ok: false,
            error: e.to_string(),
        }),
    }
}

/// GET /health
/// Health check endpoint
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "rope-miner-api"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::filter::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Rope Miner API Server");

    let config = RopeConfig::from_env()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
    tracing::info!(
        "Round duration {}s, submission grace {}s",
        config.duration_sec,
        config.grace_sec
    );

    let service = web::Data::new(RopeService::new(config));
    let sink: web::Data<Arc<dyn ScoreSink>> = web::Data::new(Arc::new(MemoryScoreSink::new()));

    let bind_address = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into());
    tracing::info!("Binding to {}", bind_address);

    HttpServer::new(move || {
        // Configure CORS to allow all origins
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(86400);

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(service.clone())
            .app_data(sink.clone())
            .app_data(web::JsonConfig::default().limit(256 * 1024))
            .route("/health", web::get().to(health))
            .route("/rope/start", web::get().to(rope_start))
            .route("/rope/submit", web::post().to(rope_submit))
    })
    .bind(bind_address)?
    .run()
    .await
}
