use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use price_lists::config::ServerConfig;
use price_lists::db::{establish_connection_pool_with, run_migrations};
use price_lists::repository::DieselRepository;
use price_lists::routes::price_lists::{PriceBatchHandler, batch_update_prices};
use price_lists::services::feature_flags::{FeatureFlagRouter, WORKFLOW_PRICE_UPDATES_FLAG};
use price_lists::workflows::LocalWorkflowEngine;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let config = ServerConfig::from_env();

    let pool = match establish_connection_pool_with(&config.database_url, config.pool_options()) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run_migrations(&pool) {
        log::error!("{e}");
        std::process::exit(1);
    }

    let repo = DieselRepository::new(pool);
    let flags = config.feature_flags();
    log::info!(
        "Batch price updates run through the {} path",
        if flags.is_feature_enabled(WORKFLOW_PRICE_UPDATES_FLAG) {
            "workflow"
        } else {
            "transactional"
        }
    );

    let handler = web::Data::new(PriceBatchHandler::new(
        repo.clone(),
        LocalWorkflowEngine::new(repo),
        flags,
    ));

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .service(batch_update_prices)
            .app_data(handler.clone())
    })
    .bind((config.address.clone(), config.port))?
    .run()
    .await
}
