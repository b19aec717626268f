use std::io;
use std::sync::Arc;

use skincare_store::config::load_app_config;
use skincare_store::payment::{Reconciler, ZaloPayClient};
use skincare_store::scheduler::build_scheduler;
use skincare_store::{build_server, create_pool, run_migrations, AppState, Repositories};

fn startup_error(context: &str, e: impl std::fmt::Display) -> io::Error {
    log::error!("{context}: {e}");
    io::Error::other(format!("{context}: {e}"))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = load_app_config().map_err(|e| startup_error("invalid configuration", e))?;

    let pool = create_pool(&config.database_url, config.db_max_connections)
        .map_err(|e| startup_error("failed to create database pool", e))?;
    run_migrations(&pool).map_err(|e| startup_error("failed to migrate database", e))?;

    let repos = Repositories::postgres(pool);
    let gateway = Arc::new(
        ZaloPayClient::new(config.zalopay.clone())
            .map_err(|e| startup_error("failed to build ZaloPay client", e))?,
    );
    let reconciler = Reconciler::new(
        Arc::clone(&gateway),
        Arc::clone(&repos.orders),
        config.payment_recheck_delay,
        config.reconcile_concurrency,
    );

    // Kept alive for the lifetime of the server.
    let _scheduler = match &config.reconcile_sweep_cron {
        Some(cron) => Some(
            build_scheduler(cron, reconciler.clone())
                .await
                .map_err(|e| startup_error("failed to start sweep scheduler", e))?,
        ),
        None => None,
    };

    let state = AppState::new(repos, reconciler, gateway);

    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(state, &config.host, config.port)?.await
}
