//! Networking plugin - bridges the peer link and the game messages
//!
//! Inbound peer messages become `MoveRequest` / `ResetRequest` with
//! `MoveOrigin::Remote`; locally caused `MoveApplied` / `SessionReset` go out
//! as `MOVE`, `RESET` or `SYNC`. Remote-origin changes are never echoed.

use super::protocol::PeerMessage;
use super::transport::{PeerEvent, PeerLink};
use crate::core::{GameSettings, GameState};
use crate::game::events::{MoveApplied, MoveOrigin, MoveRequest, ResetRequest, SessionReset};
use crate::game::mode::{GameMode, PeerRole};
use crate::game::session::ChessSession;
use crate::game::system_sets::GameSystems;
use crate::game::systems::replay_history;
use bevy::prelude::*;
use std::collections::VecDeque;
use std::net::SocketAddr;

/// Connection state shown in the UI, plus the link itself
#[derive(Resource, Default)]
pub struct NetworkSession {
    link: Option<PeerLink>,
    /// Events drained from the link but not routed yet
    backlog: VecDeque<PeerEvent>,
    pub connected: bool,
    pub peer_addr: Option<SocketAddr>,
    pub listening_on: Option<SocketAddr>,
    pub last_error: Option<String>,
    pub messages_received: u32,
    pub messages_sent: u32,
}

impl NetworkSession {
    pub fn role(&self) -> Option<PeerRole> {
        self.link.as_ref().map(PeerLink::role)
    }

    pub fn is_active(&self) -> bool {
        self.link.is_some()
    }

    /// One-line status for the in-game panel
    pub fn status_text(&self) -> String {
        match (self.role(), self.connected) {
            (None, _) => "Offline".to_string(),
            (Some(_), true) => match self.peer_addr {
                Some(addr) => format!("Connected to {}", addr),
                None => "Connected".to_string(),
            },
            (Some(PeerRole::Host { bind }), false) => {
                format!("Waiting for opponent on {}", self.listening_on.unwrap_or(bind))
            }
            (Some(PeerRole::Guest { addr }), false) => format!("Connecting to {}...", addr),
        }
    }

    fn send(&mut self, message: PeerMessage) {
        let Some(link) = &self.link else {
            return;
        };
        let kind = message.kind();
        match link.send(message) {
            Ok(()) => self.messages_sent += 1,
            Err(e) => {
                warn!("[NET] Failed to queue {}: {}", kind, e);
                self.last_error = Some(e.to_string());
            }
        }
    }
}

/// Game request produced by one inbound peer message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Move(MoveRequest),
    Reset(ResetRequest),
}

/// Map an inbound message to a request, tracking its effect on `shadow`.
///
/// `shadow` is a copy of the session advanced by everything routed so far
/// this frame, so several `MOVE`s arriving together are each checked against
/// the right position. An illegal `MOVE` that carries a FEN makes us adopt the
/// sender's position instead.
pub fn route_message(shadow: &mut ChessSession, message: PeerMessage) -> Option<Routed> {
    match message {
        PeerMessage::Move { uci, fen } => {
            if shadow.play_uci(&uci).is_ok() {
                return Some(Routed::Move(MoveRequest::new(uci, MoveOrigin::Remote)));
            }
            match fen {
                Some(fen) if shadow.load_fen(&fen).is_ok() => {
                    warn!("[NET] Peer move {} is illegal here, adopting their position", uci);
                    Some(Routed::Reset(ResetRequest::from_fen(fen, MoveOrigin::Remote)))
                }
                _ => {
                    warn!("[NET] Ignoring illegal peer move {}", uci);
                    None
                }
            }
        }
        PeerMessage::Sync { fen, history } => {
            if let Err(e) = shadow.load_fen(&fen) {
                warn!("[NET] Ignoring SYNC with bad position: {}", e);
                return None;
            }
            replay_history(shadow, &history);
            Some(Routed::Reset(ResetRequest {
                fen: Some(fen),
                history,
                origin: MoveOrigin::Remote,
            }))
        }
        PeerMessage::Reset => {
            shadow.reset();
            Some(Routed::Reset(ResetRequest::standard(MoveOrigin::Remote)))
        }
    }
}

/// Message that tells the peer about a local session change
pub fn outbound_for_move(applied: &MoveApplied) -> Option<PeerMessage> {
    (applied.origin != MoveOrigin::Remote).then(|| PeerMessage::Move {
        uci: applied.record.uci.clone(),
        fen: Some(applied.record.fen_after.clone()),
    })
}

pub fn outbound_for_reset(reset: &SessionReset, session: &ChessSession) -> Option<PeerMessage> {
    if reset.origin == MoveOrigin::Remote {
        return None;
    }
    Some(match reset.fen {
        None => PeerMessage::Reset,
        Some(_) => sync_message(session),
    })
}

fn sync_message(session: &ChessSession) -> PeerMessage {
    PeerMessage::Sync {
        fen: session.start_fen().to_string(),
        history: session.history().to_vec(),
    }
}

/// Networking plugin
pub struct NetworkingPlugin;

impl Plugin for NetworkingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<NetworkSession>()
            .add_systems(OnEnter(GameState::InGame), start_peer_link)
            .add_systems(OnExit(GameState::InGame), stop_peer_link)
            .add_systems(Update, poll_peer_link.in_set(GameSystems::Input))
            .add_systems(Update, forward_local_changes.in_set(GameSystems::Visual));
    }
}

fn start_peer_link(
    mode: Res<GameMode>,
    settings: Res<GameSettings>,
    mut network: ResMut<NetworkSession>,
) {
    let GameMode::Online { role } = *mode else {
        return;
    };
    if network.role() == Some(role) {
        return;
    }

    *network = NetworkSession::default();
    match PeerLink::start(role, settings.network.reconnect_delay()) {
        Ok(link) => {
            info!("[NET] Peer link started as {:?}", role);
            network.link = Some(link);
        }
        Err(e) => {
            error!("[NET] Could not start peer link: {}", e);
            network.last_error = Some(e.to_string());
        }
    }
}

fn stop_peer_link(mut network: ResMut<NetworkSession>) {
    if network.is_active() {
        info!("[NET] Closing peer link");
    }
    *network = NetworkSession::default();
}

fn poll_peer_link(
    mut network: ResMut<NetworkSession>,
    session: Res<ChessSession>,
    mut moves: MessageWriter<MoveRequest>,
    mut resets: MessageWriter<ResetRequest>,
) {
    let drained = network.link.as_ref().map(PeerLink::poll).unwrap_or_default();
    network.backlog.extend(drained);
    if network.backlog.is_empty() {
        return;
    }

    let mut shadow = session.clone();
    let mut moved_this_frame = false;

    while let Some(event) = network.backlog.pop_front() {
        match event {
            PeerEvent::Listening(addr) => network.listening_on = Some(addr),
            PeerEvent::Connected(addr) => {
                network.connected = true;
                network.peer_addr = Some(addr);
                network.last_error = None;
                if matches!(network.role(), Some(PeerRole::Host { .. })) {
                    info!("[NET] Sending position to new peer");
                    network.send(sync_message(&shadow));
                }
            }
            PeerEvent::Disconnected => {
                network.connected = false;
                network.peer_addr = None;
            }
            PeerEvent::Error(e) => network.last_error = Some(e),
            PeerEvent::Message(message) => {
                let mut next = shadow.clone();
                let routed = route_message(&mut next, message.clone());
                // Resets are applied before moves each frame; anything that
                // resets after a move (including a MOVE that adopts a FEN)
                // waits for the next frame so the order holds
                if moved_this_frame && matches!(routed, Some(Routed::Reset(_))) {
                    network.backlog.push_front(PeerEvent::Message(message));
                    break;
                }
                shadow = next;
                network.messages_received += 1;
                debug!("[NET] Routing {}", message.kind());
                match routed {
                    Some(Routed::Move(request)) => {
                        moved_this_frame = true;
                        moves.write(request);
                    }
                    Some(Routed::Reset(request)) => {
                        resets.write(request);
                    }
                    None => {}
                }
            }
        }
    }
}

fn forward_local_changes(
    mut network: ResMut<NetworkSession>,
    session: Res<ChessSession>,
    mut applied: MessageReader<MoveApplied>,
    mut resets: MessageReader<SessionReset>,
) {
    if !network.is_active() {
        applied.clear();
        resets.clear();
        return;
    }
    for reset in resets.read() {
        if let Some(message) = outbound_for_reset(reset, &session) {
            network.send(message);
        }
    }
    for move_applied in applied.read() {
        if let Some(message) = outbound_for_move(move_applied) {
            network.send(message);
        }
    }
}
