//! End-to-end tests driving real TCP connections against an in-process
//! server bound to an ephemeral port. Every read is guarded by a timeout
//! so a lost line fails the test instead of hanging it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::time::{sleep, timeout};

use chat_relay_server::{Server, ServerConfig, ShutdownSignal};

const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Starts a server on an ephemeral port and runs it in the background.
async fn start_server() -> (SocketAddr, Arc<ShutdownSignal>) {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
    };
    let server = Server::new(config).await.expect("failed to bind server");
    let addr = server.local_addr().expect("failed to get local addr");
    let shutdown = server.shutdown_handle();
    tokio::spawn(server.run());
    (addr, shutdown)
}

struct TestClient {
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.expect("failed to connect");
        let (read_half, write_half) = stream.into_split();
        Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        }
    }

    /// Connects and completes nickname negotiation.
    async fn join(addr: SocketAddr, nickname: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client.expect_line("Please enter a nickname: ").await;
        client.send_line(nickname).await;
        client
    }

    async fn send_line(&mut self, line: &str) {
        self.writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .expect("failed to send line");
    }

    async fn read_line(&mut self) -> String {
        let mut line = String::new();
        let n = timeout(READ_TIMEOUT, self.reader.read_line(&mut line))
            .await
            .expect("timed out waiting for a line")
            .expect("read failed");
        assert!(n > 0, "connection closed while expecting a line");
        line.strip_suffix('\n').unwrap_or(&line).to_string()
    }

    async fn expect_line(&mut self, expected: &str) {
        assert_eq!(self.read_line().await, expected);
    }

    /// Expects the server to close this connection.
    async fn expect_eof(&mut self) {
        let mut line = String::new();
        match timeout(READ_TIMEOUT, self.reader.read_line(&mut line)).await {
            Ok(Ok(0)) | Ok(Err(_)) => {}
            Ok(Ok(_)) => panic!("expected EOF, got line: {:?}", line),
            Err(_) => panic!("timed out waiting for EOF"),
        }
    }
}

/// Polls until new connections are refused or the deadline passes.
async fn assert_connect_refused(addr: SocketAddr) {
    for _ in 0..50 {
        if TcpStream::connect(addr).await.is_err() {
            return;
        }
        sleep(Duration::from_millis(50)).await;
    }
    panic!("server still accepting connections after shutdown");
}

#[tokio::test]
async fn test_join_is_broadcast_including_self() {
    let (addr, _shutdown) = start_server().await;

    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;
}

#[tokio::test]
async fn test_chat_lines_relayed_to_every_peer() {
    let (addr, _shutdown) = start_server().await;

    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;

    let mut alice = TestClient::join(addr, "alice").await;
    alice.expect_line("alice joined the chat!").await;
    bob.expect_line("alice joined the chat!").await;

    bob.send_line("hi").await;
    bob.expect_line("bob: hi").await;
    alice.expect_line("bob: hi").await;

    alice.send_line("hello bob").await;
    bob.expect_line("alice: hello bob").await;
    alice.expect_line("alice: hello bob").await;

    // The empty line is a chat message too.
    bob.send_line("").await;
    bob.expect_line("bob: ").await;
    alice.expect_line("bob: ").await;
}

#[tokio::test]
async fn test_rename_announces_old_name_then_uses_new() {
    let (addr, _shutdown) = start_server().await;

    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;
    let mut alice = TestClient::join(addr, "alice").await;
    alice.expect_line("alice joined the chat!").await;
    bob.expect_line("alice joined the chat!").await;

    bob.send_line("/nick robert").await;
    bob.expect_line("bob changed their nickname to robert").await;
    alice.expect_line("bob changed their nickname to robert").await;

    bob.send_line("hi").await;
    bob.expect_line("robert: hi").await;
    alice.expect_line("robert: hi").await;

    // The new name is everything after the first space, spaces included.
    bob.send_line("/nick bob the builder").await;
    bob.expect_line("robert changed their nickname to bob the builder")
        .await;
    alice
        .expect_line("robert changed their nickname to bob the builder")
        .await;

    bob.send_line("yes we can").await;
    alice.expect_line("bob the builder: yes we can").await;
}

#[tokio::test]
async fn test_bare_nick_gets_private_reply_only() {
    let (addr, _shutdown) = start_server().await;

    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;
    let mut alice = TestClient::join(addr, "alice").await;
    alice.expect_line("alice joined the chat!").await;
    bob.expect_line("alice joined the chat!").await;

    bob.send_line("/nick").await;
    bob.expect_line("No nickname provided.").await;
    bob.send_line("/nick ").await;
    bob.expect_line("No nickname provided.").await;

    // Alice saw neither reply: her next line is the sentinel chat message,
    // and bob's nickname is unchanged.
    bob.send_line("ping").await;
    alice.expect_line("bob: ping").await;
    bob.expect_line("bob: ping").await;
}

#[tokio::test]
async fn test_quit_broadcasts_departure_and_stops_the_server() {
    let (addr, _shutdown) = start_server().await;

    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;
    let mut alice = TestClient::join(addr, "alice").await;
    alice.expect_line("alice joined the chat!").await;
    bob.expect_line("alice joined the chat!").await;

    bob.send_line("/quit").await;

    // Departure reaches every peer, then every connection is closed.
    alice.expect_line("bob left the chat!").await;
    alice.expect_eof().await;
    bob.expect_line("bob left the chat!").await;
    bob.expect_eof().await;

    assert_connect_refused(addr).await;
}

#[tokio::test]
async fn test_abrupt_disconnect_makes_no_announcement() {
    let (addr, _shutdown) = start_server().await;

    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;
    let mut alice = TestClient::join(addr, "alice").await;
    alice.expect_line("alice joined the chat!").await;
    bob.expect_line("alice joined the chat!").await;

    // Bob's socket closes without /quit.
    drop(bob);
    sleep(Duration::from_millis(200)).await;

    // No departure line: alice's next line is her own sentinel, and the
    // server keeps serving new connections.
    alice.send_line("ping").await;
    alice.expect_line("alice: ping").await;

    let mut carol = TestClient::join(addr, "carol").await;
    carol.expect_line("carol joined the chat!").await;
    alice.expect_line("carol joined the chat!").await;
}

#[tokio::test]
async fn test_empty_nickname_accepted_verbatim() {
    let (addr, _shutdown) = start_server().await;

    let mut anon = TestClient::join(addr, "").await;
    anon.expect_line(" joined the chat!").await;

    anon.send_line("hi").await;
    anon.expect_line(": hi").await;
}

#[tokio::test]
async fn test_duplicate_nicknames_allowed() {
    let (addr, _shutdown) = start_server().await;

    let mut first = TestClient::join(addr, "bob").await;
    first.expect_line("bob joined the chat!").await;

    let mut second = TestClient::join(addr, "bob").await;
    second.expect_line("bob joined the chat!").await;
    first.expect_line("bob joined the chat!").await;
}

#[tokio::test]
async fn test_disconnect_before_nickname_is_silent() {
    let (addr, _shutdown) = start_server().await;

    let mut ghost = TestClient::connect(addr).await;
    ghost.expect_line("Please enter a nickname: ").await;
    drop(ghost);
    sleep(Duration::from_millis(200)).await;

    // No join was ever announced for the ghost; the first line bob sees is
    // his own join.
    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;
}

#[tokio::test]
async fn test_external_shutdown_is_idempotent() {
    let (addr, shutdown) = start_server().await;

    let mut bob = TestClient::join(addr, "bob").await;
    bob.expect_line("bob joined the chat!").await;

    shutdown.trigger();
    shutdown.trigger();

    // No announcements on this path, just an orderly close.
    bob.expect_eof().await;
    assert_connect_refused(addr).await;
}
