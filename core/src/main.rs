mod cors;

use std::sync::Arc;

use actix_web::{
    App, HttpServer,
    web::{self},
};
use common::env_config::Config;
use gateway::PixClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // get env vars
    let config = Config::from_env();
    let config_data = config.clone();
    let origin = config.cors_allowed_origin.clone();
    let console_logging_enabled = config.console_logging_enabled;

    // init logger
    if console_logging_enabled {
        logger::setup(&config.log_file, config.environment == "production")
            .expect("Failed to set up logger");
    }

    // init outbound clients
    let pix_client =
        Arc::new(PixClient::new(&config.gateway).expect("Failed to set up PIX gateway client"));
    let recorder = store::setup(&config.store).expect("Failed to set up order store client");

    log::info!(
        "Starting checkout on {}:{} ({})",
        config.server_host,
        config.server_port,
        config.environment
    );

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config_data.clone()))
            .app_data(web::Data::new(pix_client.clone()))
            .app_data(web::Data::new(recorder.clone()))
            .wrap(logger::middleware(console_logging_enabled)) // 2nd
            .wrap(cors::middleware(&origin)) // 1st
            .service(web::scope("/api").service(checkout::mount_checkout()))
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .workers(config.num_workers)
    .run()
    .await
}
