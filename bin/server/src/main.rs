//! Game Server Binary
//!
//! Serves the REST API and static frontend on 0.0.0.0:8080.

use clap::Parser;

#[tokio::main]
async fn main() {
    fd_core::log();
    let args = fd_server::cli::Args::parse();
    if let Err(e) = fd_server::run(args).await {
        log::error!("server exited: {:#}", e);
        std::process::exit(1);
    }
    log::info!("server exited cleanly");
}
