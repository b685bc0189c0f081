//! menu-server binary
//!
//! `menu-server` serves the HTTP API.
//! `menu-server hash-password <password>` prints an argon2 hash for
//! `ADMIN_PASSWORD_HASH`.

use std::net::SocketAddr;

use menu_server::{AppState, BoxError, Config, api, logger, util};

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let mut args = std::env::args().skip(1);
    if let Some(command) = args.next() {
        return run_command(&command, args.next());
    }

    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    logger::init_logger(&config);

    tracing::info!("Starting menu-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let rate_limiter = state.rate_limiter.clone();
    let app = api::build_app(state);

    // Drop closed attempt windows every 5 minutes
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.prune();
        }
    });

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("menu-server HTTP listening on {http_addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("menu-server stopped");
    Ok(())
}

fn run_command(command: &str, arg: Option<String>) -> Result<(), BoxError> {
    match (command, arg) {
        ("hash-password", Some(password)) => {
            let hash = util::hash_password(&password)
                .map_err(|e| format!("failed to hash password: {e}"))?;
            println!("{hash}");
            Ok(())
        }
        ("hash-password", None) => Err("usage: menu-server hash-password <password>".into()),
        (other, _) => Err(format!("unknown command: {other}").into()),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
