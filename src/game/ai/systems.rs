use super::client::{CompletionClient, GeminiClient};
use super::error::{AiError, AiResult};
use super::fallback::random_legal_move;
use super::prompt::build_prompt;
use super::reply::extract_move;
use super::resource::AiStatus;
use crate::core::{GameSettings, GameState};
use crate::game::events::{MoveOrigin, MoveRequest};
use crate::game::mode::GameMode;
use crate::game::session::ChessSession;
use crate::game::system_sets::GameSystems;
use crate::game::systems::apply_move_requests;
use bevy::prelude::*;
use bevy::tasks::{block_on, AsyncComputeTaskPool, Task};
use futures_lite::future;
use rand::Rng;
use shakmaty::{CastlingMode, Chess};

/// Resource holding the in-flight completion task
///
/// `revision` is the session revision the request was built from; a reply
/// for any other revision is stale and dropped.
#[derive(Resource)]
pub struct PendingAIMove {
    pub task: Task<AiResult<AiDecision>>,
    pub revision: u64,
}

/// The move the AI settled on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiDecision {
    pub uci: String,
    /// Completion text, when the API answered
    pub reply: Option<String>,
    /// Set when the move is the random fallback
    pub fallback_reason: Option<String>,
}

/// Plugin for AI systems
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AiStatus>()
            .register_type::<AiStatus>()
            .add_systems(
                Update,
                (poll_ai_task_system, spawn_ai_task_system)
                    .chain()
                    .after(apply_move_requests)
                    .in_set(GameSystems::Execution),
            )
            .add_systems(OnExit(GameState::InGame), cancel_ai_task);
    }
}

/// Ask the client for a move, falling back to a random legal one on any
/// failure. Only errors when the position has no legal moves.
pub fn decide_move<C, R>(
    client: AiResult<&C>,
    position: &Chess,
    prompt: &str,
    rng: &mut R,
) -> AiResult<AiDecision>
where
    C: CompletionClient + ?Sized,
    R: Rng + ?Sized,
{
    let mut reply_text = None;
    let attempt = client.and_then(|client| {
        let text = client.complete(prompt)?;
        reply_text = Some(text.clone());
        extract_move(&text, position).ok_or(AiError::NoLegalMove { reply: text })
    });

    match attempt {
        Ok(m) => Ok(AiDecision {
            uci: m.to_uci(CastlingMode::Standard).to_string(),
            reply: reply_text,
            fallback_reason: None,
        }),
        Err(e) => {
            let m = random_legal_move(position, rng)?;
            Ok(AiDecision {
                uci: m.to_uci(CastlingMode::Standard).to_string(),
                reply: reply_text,
                fallback_reason: Some(e.to_string()),
            })
        }
    }
}

/// Spawn a completion task when it's the AI's turn
fn spawn_ai_task_system(
    mut commands: Commands,
    mode: Res<GameMode>,
    session: Res<ChessSession>,
    settings: Res<GameSettings>,
    pending: Option<Res<PendingAIMove>>,
    mut status: ResMut<AiStatus>,
) {
    if pending.is_some() || session.is_game_over() {
        return;
    }
    if mode.ai_color() != Some(session.turn()) {
        return;
    }

    let prompt = build_prompt(
        &session.fen(),
        session.turn(),
        &session.legal_san_moves(),
        session.history(),
    );
    let position = session.position().clone();
    let ai_settings = settings.ai.clone();

    info!(
        "[AI] Requesting move {} from {} (revision {})",
        session.history().len() + 1,
        ai_settings.model,
        session.revision()
    );

    let task = AsyncComputeTaskPool::get().spawn(async move {
        let client = GeminiClient::from_settings(&ai_settings);
        let owned;
        let client = match client {
            Ok(c) => {
                owned = c;
                Ok(&owned)
            }
            Err(e) => Err(e),
        };
        decide_move(client, &position, &prompt, &mut rand::rng())
    });

    status.thinking = true;
    commands.insert_resource(PendingAIMove {
        task,
        revision: session.revision(),
    });
}

/// Poll the completion task and submit its move when ready
fn poll_ai_task_system(
    mut commands: Commands,
    pending: Option<ResMut<PendingAIMove>>,
    session: Res<ChessSession>,
    mut status: ResMut<AiStatus>,
    mut moves: MessageWriter<MoveRequest>,
) {
    let Some(mut pending) = pending else {
        return;
    };
    if !pending.task.is_finished() {
        return;
    }

    let Some(result) = block_on(future::poll_once(&mut pending.task)) else {
        warn!("[AI] Task reported finished but result not available");
        return;
    };
    commands.remove_resource::<PendingAIMove>();
    status.thinking = false;

    if pending.revision != session.revision() {
        info!(
            "[AI] Discarding reply for revision {} (now {})",
            pending.revision,
            session.revision()
        );
        return;
    }

    match result {
        Ok(decision) => {
            match &decision.fallback_reason {
                Some(reason) => warn!("[AI] Falling back to random move {}: {}", decision.uci, reason),
                None => info!("[AI] Model chose {}", decision.uci),
            }
            status.moves_played += 1;
            if decision.fallback_reason.is_some() {
                status.fallbacks += 1;
            }
            status.last_reply = decision.reply.clone();
            status.last_move = Some(decision.uci.clone());
            status.last_fallback_reason = decision.fallback_reason.clone();
            moves.write(MoveRequest::for_revision(
                decision.uci,
                MoveOrigin::Ai,
                pending.revision,
            ));
        }
        Err(e) => {
            error!("[AI] No move available: {}", e);
        }
    }
}

fn cancel_ai_task(mut commands: Commands, mut status: ResMut<AiStatus>) {
    commands.remove_resource::<PendingAIMove>();
    status.thinking = false;
}
