use fd_app::Application;
use std::sync::Arc;
use std::time::Duration;

/// Internal tick scheduler: fires every `period` and feeds the engine the
/// real measured delta, not the nominal period, so a slow tick never loses
/// game time.
pub fn spawn(app: Arc<Application>, period: Duration) {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(period);
        timer.tick().await; // first tick resolves immediately
        let mut last = tokio::time::Instant::now();
        log::info!("[ticker] internal ticks every {:?}", period);
        loop {
            timer.tick().await;
            let now = tokio::time::Instant::now();
            app.tick(now - last).await;
            last = now;
        }
    });
}
