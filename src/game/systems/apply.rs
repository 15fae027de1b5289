//! Session mutation systems
//!
//! The only place the [`ChessSession`] is written during play. Requests are
//! validated by the session (i.e. by the rules library); anything illegal is
//! logged and dropped, never half-applied.

use crate::game::events::{
    BoardChanged, MoveApplied, MoveOrigin, MoveRequest, ResetRequest, SessionReset,
};
use crate::game::mode::GameMode;
use crate::game::selection::Selection;
use crate::game::session::ChessSession;
use bevy::prelude::*;

/// Apply queued [`MoveRequest`]s in arrival order
pub fn apply_move_requests(
    mut requests: MessageReader<MoveRequest>,
    mut session: ResMut<ChessSession>,
    mut selection: ResMut<Selection>,
    mode: Res<GameMode>,
    mut applied: MessageWriter<MoveApplied>,
    mut changed: MessageWriter<BoardChanged>,
) {
    for request in requests.read() {
        if request.origin == MoveOrigin::Local && !mode.can_move_locally(session.turn()) {
            warn!(
                "[SESSION] Ignoring local move {} - not this side's turn",
                request.uci
            );
            continue;
        }
        if let Some(revision) = request.revision {
            if revision != session.revision() {
                info!(
                    "[SESSION] Dropping {:?} move {} chosen for revision {} (now {})",
                    request.origin,
                    request.uci,
                    revision,
                    session.revision()
                );
                continue;
            }
        }

        match session.play_uci(&request.uci) {
            Ok(record) => {
                info!(
                    "[SESSION] {:?} played {} ({}) -> {}",
                    request.origin,
                    record.san,
                    record.uci,
                    session.status().describe()
                );
                selection.clear();
                changed.write(BoardChanged {
                    revision: session.revision(),
                });
                applied.write(MoveApplied {
                    record,
                    origin: request.origin,
                });
            }
            Err(e) => {
                warn!("[SESSION] Rejected {:?} move: {}", request.origin, e);
            }
        }
    }
}

/// Apply queued [`ResetRequest`]s
pub fn apply_reset_requests(
    mut requests: MessageReader<ResetRequest>,
    mut session: ResMut<ChessSession>,
    mut selection: ResMut<Selection>,
    mut resets: MessageWriter<SessionReset>,
    mut changed: MessageWriter<BoardChanged>,
) {
    for request in requests.read() {
        match &request.fen {
            Some(fen) => {
                if let Err(e) = session.load_fen(fen) {
                    warn!("[SESSION] Rejected {:?} position: {}", request.origin, e);
                    continue;
                }
                info!("[SESSION] Loaded position {}", fen);
            }
            None => {
                session.reset();
                info!("[SESSION] New game ({:?})", request.origin);
            }
        }

        replay_history(&mut session, &request.history);

        selection.clear();
        changed.write(BoardChanged {
            revision: session.revision(),
        });
        resets.write(SessionReset {
            fen: request.fen.clone(),
            origin: request.origin,
        });
    }
}

/// Play SAN moves on top of the freshly reset session, stopping at the first
/// one that doesn't apply.
pub fn replay_history(session: &mut ChessSession, history: &[String]) {
    for (ply, san) in history.iter().enumerate() {
        if let Err(e) = session.play_san(san) {
            warn!(
                "[SESSION] History replay stopped at ply {} ({}): {}",
                ply + 1,
                san,
                e
            );
            return;
        }
    }
}
