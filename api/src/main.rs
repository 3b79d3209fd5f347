use actix_web::{web, HttpServer};
use anyhow::Context;

use otp_api::app::create_app;
use otp_api::bootstrap::build_runtime;
use otp_api::lifecycle::{install_panic_hook, shutdown_signal, ExitReason};
use otp_api::telemetry::init_tracing;
use otp_shared::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_tracing(&config.logging)?;
    let mut faults = install_panic_hook();

    tracing::info!(
        environment = ?config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting OTP relay"
    );

    let runtime = build_runtime(&config)?;
    let session = runtime.session;
    let mut event_loop = runtime.event_loop;
    session.start();

    let state = web::Data::new(runtime.state);
    let cors = config.server.cors.clone();
    let environment = config.environment;
    let bind_address = config.server.bind_address();

    let mut server = HttpServer::new(move || create_app(state.clone(), &cors, environment))
        .disable_signals()
        .shutdown_timeout(config.server.shutdown_timeout);
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }
    let server = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run();
    let handle = server.handle();
    tracing::info!(address = %bind_address, "HTTP server listening");

    let mut server_task = actix_web::rt::spawn(server);

    let reason = tokio::select! {
        signal = shutdown_signal() => ExitReason::Signal(signal),
        result = &mut server_task => match result {
            Ok(Ok(())) => ExitReason::ServerStopped,
            Ok(Err(e)) => ExitReason::ServerFailed(e.to_string()),
            Err(e) => ExitReason::ServerFailed(e.to_string()),
        },
        result = &mut event_loop => ExitReason::EventLoopStopped(match result {
            Ok(()) => "event stream closed".to_string(),
            Err(e) => e.to_string(),
        }),
        Some(fault) = faults.recv() => ExitReason::Fault(fault),
    };

    if reason.is_failure() {
        tracing::error!(reason = %reason, "Shutting down after failure");
    } else {
        tracing::info!(reason = %reason, "Shutting down");
    }

    handle.stop(true).await;
    session.shutdown().await;
    event_loop.abort();
    tracing::info!("Shutdown complete");

    if reason.is_failure() {
        anyhow::bail!("{}", reason);
    }
    Ok(())
}
