//! HTTP transport of the game server.
//!
//! Wires the actix-web application together: REST routes under `/api/v1`,
//! static frontend files everywhere else, the tick scheduler, and the
//! startup/shutdown snapshot protocol.
//!
//! ## Submodules
//!
//! - [`api`] — REST handlers and error translation
//! - [`cli`] — command-line surface
//! - [`config`] — JSON game config loading
//! - [`files`] — static file serving
//! - [`ticker`] — internal tick scheduler
pub mod api;
pub mod cli;
pub mod config;
mod dto;
pub mod files;
pub mod ticker;

use actix_web::App;
use actix_web::HttpServer;
use actix_web::middleware::Logger;
use actix_web::web;
use anyhow::Context;
use fd_app::Application;
use fd_app::Saver;
use fd_db::RecordStore;
use std::sync::Arc;
use std::time::Duration;

/// Builds everything and serves until SIGINT/SIGTERM. Exits with an error
/// (and thus a non-zero code) on config or restore failures.
pub async fn run(args: cli::Args) -> anyhow::Result<()> {
    let www_root = std::fs::canonicalize(&args.www_root)
        .with_context(|| format!("could not find www root {}", args.www_root.display()))?;
    let game = config::load(&args.config_file)?;
    let store: Arc<dyn RecordStore> = Arc::new(fd_db::db().await);
    let app = Application::new(game, store.clone(), args.randomize_spawn_points);
    if let Some(state_file) = &args.state_file {
        app.restore_from(state_file)
            .await
            .with_context(|| format!("could not restore state from {}", state_file.display()))?;
        if args.save_state_period > 0 {
            app.install_saver(Saver::new(
                state_file.clone(),
                Duration::from_millis(args.save_state_period),
            ))
            .await;
        }
    }
    let app = web::Data::new(app);
    if args.tick_period > 0 {
        ticker::spawn(app.clone().into_inner(), Duration::from_millis(args.tick_period));
    }
    let external_ticks = args.tick_period == 0;
    if external_ticks {
        log::info!("[server] external tick mode, POST /api/v1/game/tick enabled");
    }
    let store = web::Data::new(store);
    let root = web::Data::new(files::DocumentRoot(www_root));
    let handlers = app.clone();
    log::info!("[server] listening on 0.0.0.0:8080");
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .app_data(handlers.clone())
            .app_data(store.clone())
            .app_data(root.clone())
            .route("/health", web::get().to(api::health))
            .service(api::scope(external_ticks))
            .default_service(web::to(files::serve))
    })
    .client_request_timeout(fd_core::REQUEST_TIMEOUT)
    .bind(("0.0.0.0", 8080))?
    .run()
    .await?;
    // the event loop stopped on a signal; leave a fresh image behind
    if let Some(state_file) = &args.state_file {
        app.save_to(state_file)
            .await
            .with_context(|| format!("could not save state to {}", state_file.display()))?;
        log::info!("[server] final state saved to {}", state_file.display());
    }
    Ok(())
}
