//! WebSocket server: accept loop and per-session task management.
//!
//! This module is responsible for:
//!
//! 1. Binding a TCP listener on the configured address.
//! 2. Accepting incoming TCP connections from browsers.
//! 3. Upgrading each connection to a WebSocket session.
//! 4. Registering the session with the hub, which queues its `setColor`.
//! 5. Running two concurrent tasks per session:
//!    - **Reader**: decodes JSON frames and submits them to the hub.
//!    - **Writer**: drains the session's outbound queue into WebSocket text
//!      frames, and pings the browser every `ping_interval`.
//! 6. Reporting the disconnect to the hub when either task ends.
//! 7. Stopping the accept loop when the `running` flag is cleared.
//!
//! Frames and messages larger than [`MAX_FRAME_LEN`] are refused while the
//! frame header is parsed, before the payload is buffered.  The session that
//! sent one is closed.
//!
//! # Scalability
//!
//! Each browser session runs in its own Tokio tasks; the accept loop never
//! blocks on a session.  All session state lives in the single hub task, so
//! per-session tasks share nothing but a [`HubHandle`].

use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{interval, timeout};
use tokio_tungstenite::{
    accept_async_with_config,
    tungstenite::{protocol::WebSocketConfig, Error as WsError, Message as WsMessage},
};
use tracing::{debug, error, info, warn};

use whiteboard_core::{
    decode_client_message, encode_server_message, ConnectionState, MAX_FRAME_LEN,
};

use crate::application::{spawn_hub, ChannelOutbox, HubHandle};
use crate::domain::config::ServerConfig;

/// How often the accept loop re-checks the shutdown flag when idle.
const ACCEPT_POLL: Duration = Duration::from_millis(200);

// ── Public API ────────────────────────────────────────────────────────────────

/// Binds the TCP listener browsers connect to.
///
/// # Errors
///
/// Returns an error if the port is already in use or the process lacks
/// permission to bind it.
pub async fn bind(addr: SocketAddr) -> anyhow::Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind WebSocket listener on {addr}"))
}

/// Binds `config.bind_addr` and serves until `running` is set to `false`.
///
/// # Errors
///
/// Returns an error if the listener cannot be bound.
pub async fn run_server(config: ServerConfig, running: Arc<AtomicBool>) -> anyhow::Result<()> {
    let listener = bind(config.bind_addr).await?;
    serve(listener, config, running).await
}

/// Starts the hub and accepts browser connections on an already-bound listener.
///
/// Each accepted connection is handed off to a dedicated Tokio task so that
/// one slow browser never blocks others.
///
/// # Errors
///
/// Returns an error if `config` fails [`ServerConfig::validate`] or the
/// listener's local address cannot be read.
pub async fn serve(
    listener: TcpListener,
    config: ServerConfig,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    config.validate()?;
    let (hub, _hub_task) = spawn_hub(config.palette.clone(), config.hub_capacity);
    serve_with_hub(listener, config, hub, running).await
}

/// Accepts browser connections and attaches each one to an existing hub.
///
/// The hub already owns its palette, so `config.palette` and
/// `config.hub_capacity` are not used here.
///
/// # Errors
///
/// Returns an error if `config` fails [`ServerConfig::validate`] or the
/// listener's local address cannot be read.
pub async fn serve_with_hub(
    listener: TcpListener,
    config: ServerConfig,
    hub: HubHandle,
    running: Arc<AtomicBool>,
) -> anyhow::Result<()> {
    config.validate()?;
    let local_addr = listener
        .local_addr()
        .context("failed to read listener address")?;
    info!("whiteboard server running on {local_addr}");

    let config = Arc::new(config);

    loop {
        if !running.load(Ordering::Relaxed) {
            info!("shutdown flag set; stopping accept loop");
            break;
        }

        // Short timeout so the loop notices the shutdown flag while idle.
        match timeout(ACCEPT_POLL, listener.accept()).await {
            Ok(Ok((stream, peer_addr))) => {
                debug!("new connection from {peer_addr}");
                let hub = hub.clone();
                let cfg = Arc::clone(&config);
                tokio::spawn(async move {
                    handle_browser_session(stream, peer_addr, hub, cfg).await;
                });
            }
            Ok(Err(e)) => {
                // Transient (e.g. too many open file descriptors); keep serving.
                error!("accept error: {e}");
            }
            Err(_) => {}
        }
    }

    Ok(())
}

/// Per-session read limits, both capped at [`MAX_FRAME_LEN`].
fn websocket_config() -> WebSocketConfig {
    WebSocketConfig {
        max_message_size: Some(MAX_FRAME_LEN),
        max_frame_size: Some(MAX_FRAME_LEN),
        ..WebSocketConfig::default()
    }
}

// ── Per-session handler ───────────────────────────────────────────────────────

/// Entry point of each per-session task: runs the session and logs how it ended.
async fn handle_browser_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    hub: HubHandle,
    config: Arc<ServerConfig>,
) {
    match run_session(raw_stream, peer_addr, hub, config).await {
        Ok(()) => debug!("{peer_addr}: connection closed"),
        Err(e) => warn!("{peer_addr}: connection closed with error: {e:#}"),
    }
}

/// Runs the complete lifecycle of one browser connection.
///
/// 1. Completes the WebSocket handshake (`Connecting`).
/// 2. Registers with the hub, which queues `setColor` (`Connected`).
/// 3. Runs the reader and writer tasks until either ends.
/// 4. Reports the disconnect to the hub (`Disconnected`).
///
/// # Errors
///
/// Returns an error if the handshake fails or the hub has stopped.
async fn run_session(
    raw_stream: TcpStream,
    peer_addr: SocketAddr,
    hub: HubHandle,
    config: Arc<ServerConfig>,
) -> anyhow::Result<()> {
    debug!("{peer_addr}: {:?}", ConnectionState::Connecting);
    let ws_stream = accept_async_with_config(raw_stream, Some(websocket_config()))
        .await
        .with_context(|| format!("WebSocket handshake failed with {peer_addr}"))?;

    let (outbox, mut outbound_rx) = ChannelOutbox::channel(config.outbox_capacity);
    let session = hub
        .connect(outbox)
        .await
        .with_context(|| format!("{peer_addr}: hub unavailable"))?;
    let session_id = session.id();
    debug!("{peer_addr}: {:?} as session {session_id}", ConnectionState::Connected);

    let (mut ws_tx, mut ws_rx) = ws_stream.split();

    // ── Writer: outbound queue + keepalive → WebSocket ────────────────────────
    let ping_interval = config.ping_interval;
    let mut writer_task = tokio::spawn(async move {
        let mut ticker = interval(ping_interval);
        ticker.tick().await; // first tick fires immediately

        loop {
            tokio::select! {
                outbound = outbound_rx.recv() => {
                    // `None`: the hub dropped this session's outbox.
                    let Some(message) = outbound else { break };
                    let text = match encode_server_message(&message) {
                        Ok(text) => text,
                        Err(e) => {
                            error!("session {session_id}: encode error: {e}");
                            continue;
                        }
                    };
                    if ws_tx.send(WsMessage::Text(text)).await.is_err() {
                        debug!("session {session_id}: send failed (browser disconnected)");
                        break;
                    }
                }
                _ = ticker.tick() => {
                    if ws_tx.send(WsMessage::Ping(Vec::new())).await.is_err() {
                        debug!("session {session_id}: keepalive ping failed");
                        break;
                    }
                }
            }
        }

        let _ = ws_tx.close().await;
    });

    // ── Reader: WebSocket → hub ───────────────────────────────────────────────
    let reader_hub = hub.clone();
    let mut reader_task = tokio::spawn(async move {
        loop {
            let ws_msg = match ws_rx.next().await {
                Some(Ok(msg)) => msg,
                Some(Err(WsError::ConnectionClosed | WsError::Protocol(_))) => {
                    debug!("session {session_id}: WebSocket closed");
                    break;
                }
                Some(Err(e)) => {
                    warn!("session {session_id}: WebSocket error: {e}");
                    break;
                }
                None => {
                    debug!("session {session_id}: stream ended");
                    break;
                }
            };

            match ws_msg {
                WsMessage::Text(text) => {
                    let message = match decode_client_message(&text) {
                        Ok(m) => m,
                        Err(e) => {
                            // One bad frame does not end the session.
                            debug!("session {session_id}: {e}");
                            continue;
                        }
                    };
                    if reader_hub.submit(session_id, message).await.is_err() {
                        warn!("session {session_id}: hub stopped");
                        break;
                    }
                }
                WsMessage::Binary(_) => {
                    debug!("session {session_id}: unexpected binary frame (ignored)");
                }
                WsMessage::Ping(_) | WsMessage::Pong(_) => {
                    // tungstenite queues the Pong reply itself.
                }
                WsMessage::Close(_) => {
                    debug!("session {session_id}: Close frame received");
                    break;
                }
                WsMessage::Frame(_) => {}
            }
        }
    });

    tokio::select! {
        _ = &mut writer_task => reader_task.abort(),
        _ = &mut reader_task => writer_task.abort(),
    }

    hub.disconnect(session_id)
        .await
        .with_context(|| format!("session {session_id}: hub unavailable on disconnect"))?;
    debug!("session {session_id}: {:?}", ConnectionState::Disconnected);
    Ok(())
}
