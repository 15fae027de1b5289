//! Peer connection over TCP
//!
//! [`PeerLink`] owns a background thread running a single-threaded tokio
//! runtime. Bevy systems talk to it through two channels:
//!
//! - outbound: [`PeerLink::send`] queues a [`PeerMessage`] (tokio unbounded mpsc)
//! - inbound: [`PeerLink::poll`] drains [`PeerEvent`]s (crossbeam, non-blocking)
//!
//! The host accepts one peer at a time and goes back to accepting when it
//! leaves. The guest reconnects after `reconnect_delay` whenever the connect
//! fails or the connection closes. Messages sent with no peer attached are
//! dropped.

use super::error::{NetError, NetResult};
use super::protocol::{decode, encode, PeerMessage};
use crate::game::PeerRole;
use bevy::log::{debug, info, warn};
use crossbeam_channel::{Receiver, Sender};
use std::net::SocketAddr;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

/// Something that happened on the connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerEvent {
    /// Host is accepting on this address
    Listening(SocketAddr),
    /// A peer is attached
    Connected(SocketAddr),
    /// The peer went away
    Disconnected,
    Message(PeerMessage),
    /// Non-fatal problem (bad line, failed connect, bind failure)
    Error(String),
}

/// Handle to the background connection
pub struct PeerLink {
    role: PeerRole,
    outbound: mpsc::UnboundedSender<PeerMessage>,
    inbound: Receiver<PeerEvent>,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl PeerLink {
    /// Start hosting or joining in the background
    pub fn start(role: PeerRole, reconnect_delay: Duration) -> NetResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = crossbeam_channel::unbounded();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let thread = std::thread::Builder::new()
            .name("peer-link".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    tokio::select! {
                        _ = run(role, reconnect_delay, out_rx, in_tx) => {}
                        _ = shutdown_rx => {}
                    }
                });
                debug!("[NET] Peer link thread exiting");
            })?;

        Ok(Self {
            role,
            outbound: out_tx,
            inbound: in_rx,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    /// Queue a message for the peer
    pub fn send(&self, message: PeerMessage) -> NetResult<()> {
        self.outbound
            .send(message)
            .map_err(|_| NetError::ChannelClosed)
    }

    /// Everything received since the last call, without blocking
    pub fn poll(&self) -> Vec<PeerEvent> {
        self.inbound.try_iter().collect()
    }

    /// Wait up to `timeout` for the next event
    pub fn recv_timeout(&self, timeout: Duration) -> Option<PeerEvent> {
        self.inbound.recv_timeout(timeout).ok()
    }
}

impl Drop for PeerLink {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("[NET] Peer link thread panicked");
            }
        }
    }
}

async fn run(
    role: PeerRole,
    reconnect_delay: Duration,
    mut outbound: mpsc::UnboundedReceiver<PeerMessage>,
    events: Sender<PeerEvent>,
) {
    match role {
        PeerRole::Host { bind } => run_host(bind, &mut outbound, &events).await,
        PeerRole::Guest { addr } => run_guest(addr, reconnect_delay, &mut outbound, &events).await,
    }
}

async fn run_host(
    bind: SocketAddr,
    outbound: &mut mpsc::UnboundedReceiver<PeerMessage>,
    events: &Sender<PeerEvent>,
) {
    let listener = match TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(e) => {
            let _ = events.send(PeerEvent::Error(format!("Failed to listen on {}: {}", bind, e)));
            return;
        }
    };
    let local = listener.local_addr().unwrap_or(bind);
    info!("[NET] Hosting on {}", local);
    if events.send(PeerEvent::Listening(local)).is_err() {
        return;
    }

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    info!("[NET] Peer connected from {}", peer);
                    if events.send(PeerEvent::Connected(peer)).is_err() {
                        return;
                    }
                    let keep_running = serve(stream, outbound, events).await;
                    info!("[NET] Peer {} disconnected", peer);
                    if events.send(PeerEvent::Disconnected).is_err() || !keep_running {
                        return;
                    }
                }
                Err(e) => {
                    warn!("[NET] Accept failed: {}", e);
                    let _ = events.send(PeerEvent::Error(format!("Accept failed: {}", e)));
                }
            },
            message = outbound.recv() => match message {
                Some(message) => drop_unsent(&message),
                None => return,
            },
        }
    }
}

async fn run_guest(
    addr: SocketAddr,
    reconnect_delay: Duration,
    outbound: &mut mpsc::UnboundedReceiver<PeerMessage>,
    events: &Sender<PeerEvent>,
) {
    loop {
        match TcpStream::connect(addr).await {
            Ok(stream) => {
                info!("[NET] Connected to host {}", addr);
                if events.send(PeerEvent::Connected(addr)).is_err() {
                    return;
                }
                let keep_running = serve(stream, outbound, events).await;
                info!("[NET] Host {} closed the connection", addr);
                if events.send(PeerEvent::Disconnected).is_err() || !keep_running {
                    return;
                }
            }
            Err(e) => {
                debug!("[NET] Connect to {} failed: {}", addr, e);
                if events
                    .send(PeerEvent::Error(format!("Connect to {} failed: {}", addr, e)))
                    .is_err()
                {
                    return;
                }
            }
        }

        let delay = tokio::time::sleep(reconnect_delay);
        tokio::pin!(delay);
        loop {
            tokio::select! {
                _ = &mut delay => break,
                message = outbound.recv() => match message {
                    Some(message) => drop_unsent(&message),
                    None => return,
                },
            }
        }
        debug!("[NET] Reconnecting to {}", addr);
    }
}

/// Pump one connection until it closes.
///
/// Returns `false` when the link itself is shutting down (either channel
/// closed), `true` when only the peer went away.
async fn serve(
    stream: TcpStream,
    outbound: &mut mpsc::UnboundedReceiver<PeerMessage>,
    events: &Sender<PeerEvent>,
) -> bool {
    if let Err(e) = stream.set_nodelay(true) {
        debug!("[NET] set_nodelay failed: {}", e);
    }
    let (read, mut write) = stream.into_split();
    let mut lines = BufReader::new(read).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let event = match decode(&line) {
                        Ok(message) => {
                            debug!("[NET] <- {}", message.kind());
                            PeerEvent::Message(message)
                        }
                        Err(e) => {
                            warn!("[NET] Ignoring bad line {:?}: {}", line, e);
                            PeerEvent::Error(e.to_string())
                        }
                    };
                    if events.send(event).is_err() {
                        return false;
                    }
                }
                Ok(None) => return true,
                Err(e) => {
                    warn!("[NET] Read failed: {}", e);
                    return events.send(PeerEvent::Error(format!("Read failed: {}", e))).is_ok();
                }
            },
            message = outbound.recv() => match message {
                Some(message) => {
                    let mut line = match encode(&message) {
                        Ok(line) => line,
                        Err(e) => {
                            warn!("[NET] Could not encode {}: {}", message.kind(), e);
                            continue;
                        }
                    };
                    line.push('\n');
                    if let Err(e) = write.write_all(line.as_bytes()).await {
                        warn!("[NET] Write failed: {}", e);
                        return events.send(PeerEvent::Error(format!("Write failed: {}", e))).is_ok();
                    }
                    debug!("[NET] -> {}", message.kind());
                }
                None => return false,
            },
        }
    }
}

fn drop_unsent(message: &PeerMessage) {
    warn!("[NET] No peer connected, dropping {}", message.kind());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader as StdBufReader, Write};
    use std::net::TcpListener as StdTcpListener;

    const WAIT: Duration = Duration::from_secs(5);

    fn next_non_error(link: &PeerLink) -> Option<PeerEvent> {
        loop {
            match link.recv_timeout(WAIT)? {
                PeerEvent::Error(_) => continue,
                event => return Some(event),
            }
        }
    }

    #[test]
    fn test_guest_exchanges_lines_with_plain_socket() {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let link = PeerLink::start(PeerRole::Guest { addr }, Duration::from_millis(50)).unwrap();
        let (mut socket, _) = listener.accept().unwrap();
        socket.set_read_timeout(Some(WAIT)).unwrap();

        assert_eq!(next_non_error(&link), Some(PeerEvent::Connected(addr)));

        socket.write_all(b"{\"type\":\"RESET\"}\n").unwrap();
        assert_eq!(
            next_non_error(&link),
            Some(PeerEvent::Message(PeerMessage::Reset))
        );

        link.send(PeerMessage::Move {
            uci: "e7e5".to_string(),
            fen: None,
        })
        .unwrap();
        let mut line = String::new();
        StdBufReader::new(&socket).read_line(&mut line).unwrap();
        assert_eq!(line, "{\"type\":\"MOVE\",\"uci\":\"e7e5\"}\n");
    }

    #[test]
    fn test_bad_line_reports_error_and_keeps_connection() {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let link = PeerLink::start(PeerRole::Guest { addr }, Duration::from_millis(50)).unwrap();
        let (mut socket, _) = listener.accept().unwrap();
        assert_eq!(next_non_error(&link), Some(PeerEvent::Connected(addr)));

        socket.write_all(b"garbage\n{\"type\":\"RESET\"}\n").unwrap();
        assert!(matches!(link.recv_timeout(WAIT), Some(PeerEvent::Error(_))));
        assert_eq!(
            link.recv_timeout(WAIT),
            Some(PeerEvent::Message(PeerMessage::Reset))
        );
    }

    #[test]
    fn test_guest_reconnects_after_close() {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let link = PeerLink::start(PeerRole::Guest { addr }, Duration::from_millis(50)).unwrap();
        let (first, _) = listener.accept().unwrap();
        assert_eq!(next_non_error(&link), Some(PeerEvent::Connected(addr)));

        drop(first);
        assert_eq!(next_non_error(&link), Some(PeerEvent::Disconnected));

        let (_second, _) = listener.accept().unwrap();
        assert_eq!(next_non_error(&link), Some(PeerEvent::Connected(addr)));
    }

    #[test]
    fn test_host_reports_listening_and_shuts_down_on_drop() {
        let listener = StdTcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let link = PeerLink::start(PeerRole::Host { bind: addr }, Duration::from_millis(50)).unwrap();
        assert_eq!(link.recv_timeout(WAIT), Some(PeerEvent::Listening(addr)));
        drop(link);
    }
}
