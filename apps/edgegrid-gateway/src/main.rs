//! EdgeGrid verification gateway.
//!
//! A small HTTP server that checks the EdgeGrid authorization of every request
//! it receives against one configured credential set. It stands in for the
//! remote API host when exercising API clients end to end.
//!
//! # Usage
//!
//! ```text
//! EDGEGRID_CLIENT_TOKEN=ct1 EDGEGRID_ACCESS_TOKEN=at1 \
//! EDGEGRID_CLIENT_SECRET=sec1 EDGEGRID_HOST=localhost:8080 edgegrid-gateway
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `GATEWAY_LISTEN` | `0.0.0.0:8080` | Bind address |
//! | `EDGEGRID_CLIENT_TOKEN` | *(required)* | Accepted client token |
//! | `EDGEGRID_ACCESS_TOKEN` | *(required)* | Accepted access token |
//! | `EDGEGRID_CLIENT_SECRET` | *(required)* | Shared secret |
//! | `EDGEGRID_HOST` | *(required)* | Host the clients sign for |
//! | `EDGEGRID_SCHEME` | `https` | Scheme the clients sign for |
//! | `EDGEGRID_MAX_CLOCK_SKEW_SECS` | *(unset)* | Reject timestamps further off than this |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod config;
mod service;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use edgegrid_auth::{Signer, StaticCredentialProvider};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{GatewayConfig, LogFormat};
use crate::service::GatewayService;

/// Gateway version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `LOG_LEVEL`; `LOG_FORMAT=json` switches to
/// line-delimited JSON for log shippers.
fn init_tracing(config: &GatewayConfig) -> Result<()> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("bad LOG_LEVEL filter: {}", config.log_level))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.log_format {
        LogFormat::Json => builder.json().with_current_span(false).init(),
        LogFormat::Text => builder.with_target(true).init(),
    }

    Ok(())
}

/// Resolve once Ctrl-C or, on Unix, SIGTERM arrives.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => info!("received Ctrl-C"),
        () = terminate => info!("received SIGTERM"),
    }
}

/// Accept connections until `shutdown` resolves, then drain in-flight requests.
async fn serve(
    listener: TcpListener,
    gateway: GatewayService,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let builder = HttpConnBuilder::new(TokioExecutor::new());
    tokio::pin!(shutdown);

    loop {
        let (stream, peer_addr) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    warn!(error = %e, "accept failed");
                    continue;
                }
            },
            () = &mut shutdown => break,
        };

        debug!(%peer_addr, "accepted connection");
        let conn = builder
            .serve_connection(TokioIo::new(stream), gateway.clone())
            .into_owned();
        let conn = graceful.watch(conn);
        tokio::spawn(async move {
            if let Err(e) = conn.await {
                error!(%peer_addr, error = %e, "connection error");
            }
        });
    }

    info!("draining open connections");
    graceful.shutdown().await;
    info!("gateway stopped");

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = GatewayConfig::from_env()?;
    init_tracing(&config)?;

    let provider = Arc::new(StaticCredentialProvider::new(vec![
        config.credentials.clone(),
    ]));
    let gateway = GatewayService::new(Signer::new(config.signer.clone()), provider);

    let addr: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("invalid bind address: {}", config.listen))?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    info!(
        %addr,
        host = %config.credentials.host,
        client_token = %config.credentials.client_token,
        max_clock_skew_secs = ?config.signer.max_clock_skew_secs,
        version = VERSION,
        "starting EdgeGrid gateway",
    );

    serve(listener, gateway, shutdown_signal()).await
}
