use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};
use distributor::bootstrap;
use distributor::config::AppConfig;
use distributor::services;
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config =
        AppConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let state = bootstrap::prepare(&config).map_err(io::Error::other)?;
    let state = web::Data::new(state);

    let (host, port) = config.bind_address();
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(services::configure_services)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
