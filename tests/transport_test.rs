//! End-to-end tests over real TCP connections.

use std::sync::Arc;
use std::time::Duration;
use tiktag::{Cell, MatchHost, Phase, Player, Settings, transport};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;

async fn start() -> (Arc<MatchHost>, std::net::SocketAddr) {
    let host = Arc::new(MatchHost::new(&Settings::default()));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(transport::serve(listener, Arc::clone(&host), None));
    (host, addr)
}

/// Connects and waits for the first screen, so registration has happened.
async fn join(addr: std::net::SocketAddr) -> BufReader<TcpStream> {
    let stream = TcpStream::connect(addr).await.expect("connect");
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    timeout(Duration::from_secs(5), reader.read_line(&mut line))
        .await
        .expect("first screen in time")
        .expect("read");
    reader
}

async fn send(conn: &mut BufReader<TcpStream>, line: &str) {
    conn.get_mut()
        .write_all(format!("{}\n", line).as_bytes())
        .await
        .expect("write");
}

async fn wait_for(host: &MatchHost, pred: impl Fn(&tiktag::RenderState) -> bool) {
    timeout(Duration::from_secs(5), async {
        while !pred(&host.snapshot()) {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("condition reached in time");
}

#[tokio::test]
async fn test_third_connection_refused() {
    let (host, addr) = start().await;
    let _a = join(addr).await;
    let _b = join(addr).await;

    let mut c = TcpStream::connect(addr).await.expect("connect");
    let mut text = String::new();
    timeout(Duration::from_secs(5), c.read_to_string(&mut text))
        .await
        .expect("closed in time")
        .expect("read");
    assert!(text.starts_with("connection refused"), "{text}");
    assert_eq!(host.registry().session_count(), 2);
    assert_eq!(host.snapshot().phase, Phase::NamingA);
}

#[tokio::test]
async fn test_two_remote_players_play_a_move() {
    let (host, addr) = start().await;
    let mut a = join(addr).await;
    let mut b = join(addr).await;

    send(&mut a, "Alice").await;
    wait_for(&host, |s| s.phase == Phase::NamingB).await;
    send(&mut b, "Bob").await;
    wait_for(&host, |s| s.phase == Phase::Playing).await;

    send(&mut a, "s").await;
    wait_for(&host, |s| s.cell(1, 1) == Cell::Marked(Player::A)).await;
    assert_eq!(host.snapshot().turn, Player::B);
}

#[tokio::test]
async fn test_disconnect_frees_seat() {
    let (host, addr) = start().await;
    let a = join(addr).await;
    let _b = join(addr).await;
    drop(a);

    timeout(Duration::from_secs(5), async {
        while host.registry().holder_of(Player::A).is_some() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("seat released in time");

    let _c = join(addr).await;
    assert_eq!(host.registry().session_count(), 2);
}
