//! `hal` - Humans Are Listening
//!
//! Serves an OpenAI-compatible chat-completion endpoint where every reply
//! comes from a human operator in a terminal session, or from a fixed
//! string in daemon mode. Built so clients of a chat-completion API can be
//! exercised end-to-end without a live model backend.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;

use crate::cli::Cli;
use crate::server::shutdown::ShutdownHandle;
use crate::server::AppState;
use crate::tui::InteractiveReply;
use hal_core::audit::AuditLog;
use hal_core::gate::RequestGate;
use hal_core::reply::{FixedReply, ReplySource};
use hal_core::{info_log, warn_log};

mod cli;
mod server;
mod tui;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    hal_core::logger::init(cli.log.clone(), cli.verbose);
    info_log!("starting HAL");

    let daemon_mode = cli.fix_reply_daemon.is_some();
    let reply: Arc<dyn ReplySource> = match &cli.fix_reply_daemon {
        Some(text) => {
            info_log!("daemon mode enabled - fixed reply: {text}");
            Arc::new(FixedReply::new(text))
        }
        None => Arc::new(InteractiveReply),
    };

    let audit = cli.json_dump_log.clone().map(AuditLog::new);
    if let Some(audit) = &audit {
        info_log!("audit log enabled: {}", audit.path().display());
    }

    let shutdown = ShutdownHandle::new();
    let state = Arc::new(AppState {
        gate: RequestGate::new(),
        reply,
        audit,
        daemon_mode,
        shutdown: shutdown.clone(),
    });
    let app = server::build_router(state);

    let addr = format!("{}:{}", cli.host, cli.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let mode = if daemon_mode { "daemon" } else { "interactive" };
    println!("HAL listening on http://{addr} ({mode} mode)");
    info_log!("HAL listening on {addr} ({mode} mode)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .context("server error")?;

    info_log!("HAL stopped");
    Ok(())
}

/// Resolves on Ctrl-C, SIGTERM, or a scheduled remote shutdown.
async fn shutdown_signal(shutdown: ShutdownHandle) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn_log!("failed to install CTRL+C signal handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => warn_log!("failed to install SIGTERM handler: {e}"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
        _ = shutdown.triggered() => {}
    }

    info_log!("shutdown signal received");
}
