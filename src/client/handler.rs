//! Client connection handler
//!
//! Runs one connected client's session from accept to teardown:
//! nickname negotiation, the command/message read loop, and the outbound
//! writer task that serializes every line sent to this peer.
//!
//! - Uses `BufReader` to read newline-delimited lines from the client.
//! - Every read point also observes the shutdown signal, so a global
//!   shutdown unblocks handlers parked on idle peers.
//! - Outbound delivery goes through an unbounded channel: broadcasts never
//!   block on a slow or dead peer, and per-sender line order is preserved.

use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use crate::client::registry::{ClientHandle, ClientRegistry};
use crate::client::state::Session;
use crate::protocol::{Command, parse_line, responses, trim_line_ending};
use crate::server::shutdown::ShutdownSignal;

/// Handles one client connection to completion.
///
/// State machine: CONNECTED (prompt, await one nickname line) → NAMED
/// (registered, join announced) → ACTIVE (read loop) → CLOSED (unregister,
/// close stream). CLOSED is reachable from every prior state; a peer that
/// disconnects before naming itself is never registered and never
/// announced.
pub async fn handle_client(
    stream: TcpStream,
    addr: SocketAddr,
    registry: Arc<ClientRegistry>,
    shutdown: Arc<ShutdownSignal>,
) {
    let (read_half, write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let (tx, rx) = mpsc::unbounded_channel();
    let writer = tokio::spawn(write_lines(write_half, rx));

    let mut session = Session::new(addr);
    let _ = tx.send(responses::NICKNAME_PROMPT.to_string());

    let mut line = String::new();
    let named = tokio::select! {
        result = reader.read_line(&mut line) => match result {
            // Disconnect before sending a nickname is a normal path.
            Ok(0) => false,
            Ok(_) => {
                // Verbatim, empty allowed; only the terminator is stripped.
                session.set_nickname(trim_line_ending(&line).to_string());
                true
            }
            Err(e) => {
                warn!("Failed to read nickname from {}: {}", addr, e);
                false
            }
        },
        _ = shutdown.wait() => false,
    };

    if !named {
        info!("Client {} left before choosing a nickname", addr);
        drop(tx);
        let _ = writer.await;
        return;
    }

    info!("Client {} connected as {:?}", addr, session.nickname());

    // Registered before the join broadcast, so the client receives its own
    // announcements from here on.
    registry.register(addr, ClientHandle::new(tx.clone())).await;
    registry.broadcast(&responses::joined(session.nickname())).await;

    loop {
        line.clear();
        let result = tokio::select! {
            result = reader.read_line(&mut line) => result,
            _ = shutdown.wait() => break,
        };
        match result {
            Ok(0) => {
                info!("Connection closed by client {}", addr);
                break;
            }
            Ok(_) => match parse_line(trim_line_ending(&line)) {
                Command::Nick(new_nickname) => {
                    // Announce with the old name, then rename.
                    registry
                        .broadcast(&responses::renamed(session.nickname(), &new_nickname))
                        .await;
                    info!(
                        "Client {} changed nickname from {:?} to {:?}",
                        addr,
                        session.nickname(),
                        new_nickname
                    );
                    session.set_nickname(new_nickname);
                }
                Command::NickMissing => {
                    // Private reply to the issuer only.
                    let _ = tx.send(responses::NO_NICKNAME.to_string());
                }
                Command::Quit => {
                    // One peer's /quit stops the whole server.
                    registry
                        .broadcast(&responses::departed(session.nickname()))
                        .await;
                    info!("Client {} quit, shutting the server down", addr);
                    shutdown.trigger();
                    break;
                }
                Command::Message(text) => {
                    registry
                        .broadcast(&responses::chat(session.nickname(), &text))
                        .await;
                }
            },
            Err(e) => {
                // Treated as a disconnect; no retry, no announcement.
                warn!("Failed to read from {}: {}", addr, e);
                break;
            }
        }
    }

    // CLOSED: idempotent unregister, then let the writer drain whatever is
    // already queued (a departure broadcast issued just before shutdown
    // still reaches this peer) and release the socket.
    registry.unregister(session.addr()).await;
    drop(tx);
    let _ = writer.await;
    info!(
        "Client {} ({:?}) disconnected",
        session.addr(),
        session.nickname()
    );
}

/// Drains the outbound queue into the write half, one `\n`-terminated line
/// per queued message. Ends when every sender is gone and the queue is
/// empty, or on the first write error; either way the write half is
/// dropped, closing the connection.
async fn write_lines(mut write_half: OwnedWriteHalf, mut rx: UnboundedReceiver<String>) {
    while let Some(line) = rx.recv().await {
        if write_half
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .is_err()
        {
            break;
        }
    }
}
