use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use clap::Parser;
use eyre::Result;
use log::info;

mod cli;

use cli::Cli;
use ytcap::captions::{CaptionsApi, YouTubeCaptions};
use ytcap::config::{Config, Credentials};
use ytcap::handlers;
use ytcap::state::AppState;

#[actix_web::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(default_filter));

    let config = Config::load().unwrap_or_default();
    if cli.verbose {
        let config_path = ytcap::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
    }

    let listen_addr = cli
        .listen
        .or(config.listen_addr)
        .unwrap_or_else(|| "0.0.0.0:8080".to_string());

    let captions: Arc<dyn CaptionsApi> = Arc::new(YouTubeCaptions::new(
        reqwest::Client::new(),
        Credentials::from_env(),
    ));
    let state = web::Data::new(AppState { captions });

    info!("Listening on http://{listen_addr}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .wrap(handlers::cors_headers())
            .app_data(state.clone())
            .app_data(handlers::json_config())
            .configure(handlers::configure)
    })
    .bind(listen_addr.as_str())?
    .run()
    .await?;

    Ok(())
}
