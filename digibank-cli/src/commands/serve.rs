//! Serve command - run the REST API until Ctrl-C

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use digibank_cli::http::{self, AppState, TokenIssuer};

use super::get_context;

pub fn run(host: Option<String>, port: Option<u16>) -> Result<()> {
    let mut ctx = get_context()?;
    if let Some(host) = host {
        ctx.config.server.host = host;
    }
    if let Some(port) = port {
        ctx.config.server.port = port;
    }

    let tokens = TokenIssuer::new(&ctx.config.jwt_secret(), ctx.config.auth.token_ttl_minutes);
    let addr = format!("{}:{}", ctx.config.server.host, ctx.config.server.port);
    let state = AppState::new(ctx, tokens);

    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(async move {
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("binding {addr}"))?;
        tracing::info!(%addr, "digibank server listening");

        axum::serve(listener, http::router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("server error")?;

        tracing::info!("digibank server stopped");
        Ok(())
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
    }
}
