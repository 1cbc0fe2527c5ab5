//! Server core functionality
//!
//! The accept loop and shutdown coordination: accept a connection, spawn a
//! handler task for it, and on shutdown stop accepting, release the
//! listening socket, and sweep the client registry.

use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::client::{ClientRegistry, handle_client};
use crate::error::ServerError;
use crate::server::config::ServerConfig;
use crate::server::shutdown::ShutdownSignal;

pub struct Server {
    registry: Arc<ClientRegistry>,
    listener: TcpListener,
    shutdown: Arc<ShutdownSignal>,
}

impl Server {
    /// Binds the listening socket. Failure to bind is fatal at startup.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let addr = config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        info!("Server bound to {}", addr);

        Ok(Self {
            registry: Arc::new(ClientRegistry::new()),
            listener,
            shutdown: Arc::new(ShutdownSignal::new()),
        })
    }

    /// The address the listener actually bound to (useful with port 0).
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// A handle that triggers the server's shutdown from outside the
    /// accept loop, e.g. from a Ctrl-C task.
    pub fn shutdown_handle(&self) -> Arc<ShutdownSignal> {
        Arc::clone(&self.shutdown)
    }

    /// Runs the accept loop until shutdown is triggered — by a peer's
    /// `/quit`, by an accept error, or externally via `shutdown_handle`.
    /// Returning drops the listener, so further connection attempts are
    /// refused.
    pub async fn run(self) {
        info!("Chat relay server is running...");

        loop {
            tokio::select! {
                result = self.listener.accept() => match result {
                    Ok((stream, addr)) => {
                        info!("Accepted connection from {}", addr);
                        let registry = Arc::clone(&self.registry);
                        let shutdown = Arc::clone(&self.shutdown);

                        // Spawn a task per client so the accept loop never blocks.
                        tokio::spawn(async move {
                            handle_client(stream, addr, registry, shutdown).await;
                        });
                    }
                    Err(e) => {
                        error!("Error accepting connection: {}", e);
                        self.shutdown.trigger();
                        break;
                    }
                },
                _ = self.shutdown.wait() => break,
            }
        }

        info!("Server is shutting down...");

        // Stop accepting before sweeping the registry.
        drop(self.listener);

        // Handlers unregister themselves as they observe the signal; this
        // final sweep drops any remaining handles so every writer task
        // drains its queue and closes its connection.
        self.registry.clear().await;
        info!("Server shut down");
    }
}
