use actix_cors::Cors;
use actix_web::{get, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::prelude::*;

use leadboard_api::config::ApiConfig;
use leadboard_api::database::{default_db_path, Database};
use leadboard_api::handlers;
use leadboard_api::helpers::query_cache::LeadQueryCache;
use leadboard_api::jobs::sync_bridge::RealtimeBridge;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "leadboard-api"
    }))
}

#[get("/health")]
async fn health(db: web::Data<Arc<Database>>) -> impl Responder {
    // Test database connection
    match db.connection.lock() {
        Ok(_) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "database": "connected"
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy",
            "database": "disconnected"
        })),
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("leadboard-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Initialize database
    let db_path = args.db_path.unwrap_or_else(default_db_path);
    let db = Arc::new(Database::new(&db_path).expect("Failed to initialize database"));
    tracing::info!("Database initialized at: {:?}", db_path);

    // Load config
    let (config, config_path) = ApiConfig::load().expect("Failed to load config");
    tracing::info!("Config loaded from: {:?}", config_path);
    let config = Arc::new(config);

    // Get server config or use defaults
    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };

    tracing::info!("Server will listen on {}:{}", host, port);

    // Query cache plus the realtime bridge that keeps it honest
    let query_cache = Arc::new(LeadQueryCache::new());
    let bridge = Arc::new(RealtimeBridge::new(query_cache.clone()));
    let bridge_handle = bridge.spawn(db.subscribe_changes());

    let config_for_server = config.clone();
    let db_for_server = db.clone();
    let server = HttpServer::new(move || {
        // Configure CORS
        let cors = if let Some(cors_config) = &config_for_server.cors {
            let mut cors_builder = Cors::default();
            for origin in &cors_config.allowed_origins {
                cors_builder = cors_builder.allowed_origin(origin);
            }
            cors_builder
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        } else {
            Cors::default()
                .allow_any_origin()
                .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
                .max_age(3600)
        };

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(db_for_server.clone()))
            .app_data(web::Data::new(config_for_server.clone()))
            .app_data(web::Data::new(query_cache.clone()))
            .app_data(web::Data::new(bridge.clone()))
            .service(hello)
            .service(health)
            .route("/api/leads", web::get().to(handlers::leads::list_leads))
            .route("/api/leads", web::post().to(handlers::leads::create_lead))
            .route("/api/leads/stats", web::get().to(handlers::leads::lead_stats))
            .route("/api/leads/options", web::get().to(handlers::leads::filter_options))
            .route("/api/leads/{id}", web::get().to(handlers::leads::get_lead))
            .route("/api/leads/{id}", web::patch().to(handlers::leads::update_lead))
            .route("/api/analytics", web::get().to(handlers::analytics::get_analytics))
            .route("/api/notifications", web::get().to(handlers::notifications::list_notifications))
            .route("/api/auth/users", web::post().to(handlers::auth::create_user))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    let result = server.await;
    bridge_handle.abort();
    result
}
