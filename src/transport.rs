//! Line-oriented TCP transport: one task per connected session.
//!
//! Each input line is split into character keys followed by `enter`, so a
//! plain `telnet`/`nc` client can type names and moves. A line that is
//! exactly `esc`, `enter`, `backspace` or `ctrl+c` sends that key instead.

use crate::handler::{Reply, SessionHandler};
use crate::host::MatchHost;
use crate::input::Key;
use crate::registry::{Registration, SessionId};
use crate::view;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

const CLEAR: &str = "\x1b[2J\x1b[H";

/// Accepts connections forever, spawning a task for each.
#[instrument(skip(listener, host))]
pub async fn serve(
    listener: TcpListener,
    host: Arc<MatchHost>,
    idle_timeout: Option<Duration>,
) -> std::io::Result<()> {
    info!(addr = ?listener.local_addr().ok(), "Accepting connections");
    let mut accepted: u64 = 0;
    loop {
        let (stream, addr) = listener.accept().await?;
        accepted += 1;
        let id = format!("{}#{}", addr, accepted);
        debug!(session_id = %id, "Connection accepted");

        let host = Arc::clone(&host);
        tokio::spawn(async move {
            if let Err(e) = run_session(stream, id.clone(), host, idle_timeout).await {
                warn!(session_id = %id, error = %e, "Session ended with error");
            }
        });
    }
}

/// Registers one connection, runs it to completion, then unregisters it.
#[instrument(skip(stream, host))]
pub async fn run_session(
    stream: TcpStream,
    id: SessionId,
    host: Arc<MatchHost>,
    idle_timeout: Option<Duration>,
) -> std::io::Result<()> {
    let (reader, mut writer) = stream.into_split();

    let registration = match host.connect(&id) {
        Ok(registration) => registration,
        Err(e) => {
            info!(error = %e, "Refusing connection");
            writer
                .write_all(format!("connection refused: {}\r\n", e).as_bytes())
                .await?;
            writer.shutdown().await?;
            return Ok(());
        }
    };
    info!(slot = %registration.slot, "Session joined");
    host.registry().broadcast();

    let result = session_loop(reader, &mut writer, &id, &host, registration, idle_timeout).await;
    host.disconnect(&id);
    info!("Session left");
    result
}

async fn session_loop<W: AsyncWrite + Unpin>(
    reader: OwnedReadHalf,
    writer: &mut W,
    id: &str,
    host: &Arc<MatchHost>,
    registration: Registration,
    idle_timeout: Option<Duration>,
) -> std::io::Result<()> {
    let Registration {
        slot,
        mut notifications,
    } = registration;
    let mut handler = SessionHandler::new(Arc::clone(host), id);
    let mut lines = BufReader::new(reader).lines();
    let mut deadline = idle_timeout.map(|d| Instant::now() + d);

    draw(writer, &handler).await?;
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("Peer closed connection");
                    return Ok(());
                };
                deadline = idle_timeout.map(|d| Instant::now() + d);
                for key in keys_for(&line) {
                    if handler.handle(key) == Reply::Quit {
                        info!(%slot, "Session quit");
                        return Ok(());
                    }
                }
                draw(writer, &handler).await?;
            }
            Some(_) = notifications.recv() => {
                draw(writer, &handler).await?;
            }
            _ = idle(deadline) => {
                info!(%slot, "Idle timeout");
                writer.write_all(b"idle timeout\r\n").await?;
                return Ok(());
            }
        }
    }
}

async fn idle(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn draw<W: AsyncWrite + Unpin>(writer: &mut W, handler: &SessionHandler) -> std::io::Result<()> {
    let state = handler.host().snapshot();
    let draft = (state.naming_slot().is_some() && state.naming_slot() == handler.slot())
        .then(|| handler.draft());
    let text = view::render(&state, handler.view(), draft).replace('\n', "\r\n");
    writer
        .write_all(format!("{}{}\r\n", CLEAR, text).as_bytes())
        .await?;
    writer.flush().await
}

/// Keys carried by one input line.
pub fn keys_for(line: &str) -> Vec<Key> {
    let line = line.trim_end_matches(['\r', '\n']);
    match line {
        "esc" | "enter" | "backspace" | "ctrl+c" => line.parse::<Key>().into_iter().collect(),
        _ => line
            .chars()
            .map(|c| match c {
                '\x1b' => Key::Esc,
                '\x03' => Key::CtrlC,
                '\x08' | '\x7f' => Key::Backspace,
                c => Key::Char(c),
            })
            .chain(std::iter::once(Key::Enter))
            .collect(),
    }
}
