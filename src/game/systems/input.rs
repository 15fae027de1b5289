//! Pointer input - click-to-select-move flow
//!
//! Observers are attached to every square and piece entity when they're
//! spawned (see `rendering::board` and `rendering::pieces`). Both funnel into
//! [`resolve_click`], which decides what a click on a square means:
//!
//! - own piece → select it (or deselect if it already was)
//! - legal destination of the selection → `MoveRequest`
//! - anything else → clear the selection

use crate::game::ai::AiStatus;
use crate::game::events::{MoveOrigin, MoveRequest};
use crate::game::mode::GameMode;
use crate::game::selection::Selection;
use crate::game::session::ChessSession;
use crate::rendering::board::BoardSquare;
use crate::rendering::pieces::PieceModel;
use bevy::ecs::system::SystemParam;
use bevy::picking::events::{Click, Pointer};
use bevy::picking::pointer::PointerButton;
use bevy::prelude::*;
use shakmaty::{CastlingMode, Square};

/// What a click on a square should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Select the piece on this square; its legal destinations attached
    Select { from: Square, targets: Vec<Square> },
    /// Clear the selection
    Deselect,
    /// Play this UCI move
    Move { uci: String },
    /// Input not accepted right now
    Ignore,
}

/// Decide what clicking `square` means in the current state
pub fn resolve_click(
    session: &ChessSession,
    selection: &Selection,
    mode: GameMode,
    ai_thinking: bool,
    square: Square,
) -> ClickOutcome {
    let turn = session.turn();
    if session.is_game_over() || ai_thinking || !mode.can_move_locally(turn) {
        return ClickOutcome::Ignore;
    }

    if let Some(piece) = session.piece_at(square) {
        if piece.color == turn {
            if selection.from == Some(square) {
                return ClickOutcome::Deselect;
            }
            return ClickOutcome::Select {
                from: square,
                targets: session.legal_targets(square),
            };
        }
    }

    match selection.from {
        Some(from) if selection.is_target(square) => match session.find_move(from, square, None) {
            Some(m) => ClickOutcome::Move {
                uci: m.to_uci(CastlingMode::Standard).to_string(),
            },
            None => ClickOutcome::Deselect,
        },
        Some(_) => ClickOutcome::Deselect,
        None => ClickOutcome::Ignore,
    }
}

/// Everything the click observers need
#[derive(SystemParam)]
pub struct ClickParams<'w> {
    pub session: Res<'w, ChessSession>,
    pub selection: ResMut<'w, Selection>,
    pub mode: Res<'w, GameMode>,
    pub ai_status: Option<Res<'w, AiStatus>>,
    pub moves: MessageWriter<'w, MoveRequest>,
}

impl ClickParams<'_> {
    fn activate(&mut self, square: Square) {
        let ai_thinking = self.ai_status.as_ref().is_some_and(|s| s.thinking);
        let outcome = resolve_click(&self.session, &self.selection, *self.mode, ai_thinking, square);

        match outcome {
            ClickOutcome::Select { from, targets } => {
                debug!("[INPUT] Selected {} ({} targets)", from, targets.len());
                self.selection.select(from, targets);
            }
            ClickOutcome::Deselect => {
                debug!("[INPUT] Selection cleared");
                self.selection.clear();
            }
            ClickOutcome::Move { uci } => {
                debug!("[INPUT] Requesting {}", uci);
                self.moves.write(MoveRequest::new(uci, MoveOrigin::Local));
            }
            ClickOutcome::Ignore => {}
        }
    }
}

fn is_primary(button: PointerButton) -> bool {
    matches!(button, PointerButton::Primary)
}

/// Handle click on a board square
pub fn on_square_click(
    click: On<Pointer<Click>>,
    squares: Query<&BoardSquare>,
    mut params: ClickParams,
) {
    if !is_primary(click.event.button) {
        return;
    }
    let Ok(board_square) = squares.get(click.entity) else {
        return;
    };
    params.activate(board_square.square);
}

/// Handle click on a piece (bubbled up from its mesh children)
pub fn on_piece_click(
    click: On<Pointer<Click>>,
    pieces: Query<&PieceModel>,
    mut params: ClickParams,
) {
    if !is_primary(click.event.button) {
        return;
    }
    let Ok(model) = pieces.get(click.entity) else {
        warn!("[INPUT] Clicked entity {:?} has no PieceModel", click.entity);
        return;
    };
    params.activate(model.square);
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::Color;

    fn ai_black() -> GameMode {
        GameMode::VsAi {
            ai_color: Color::Black,
        }
    }

    #[test]
    fn test_click_own_piece_selects() {
        let session = ChessSession::new();
        let outcome = resolve_click(&session, &Selection::default(), ai_black(), false, Square::G1);
        assert_eq!(
            outcome,
            ClickOutcome::Select {
                from: Square::G1,
                targets: vec![Square::F3, Square::H3],
            }
        );
    }

    #[test]
    fn test_click_selected_piece_deselects() {
        let session = ChessSession::new();
        let mut selection = Selection::default();
        selection.select(Square::E2, session.legal_targets(Square::E2));
        let outcome = resolve_click(&session, &selection, ai_black(), false, Square::E2);
        assert_eq!(outcome, ClickOutcome::Deselect);
    }

    #[test]
    fn test_click_target_moves() {
        let session = ChessSession::new();
        let mut selection = Selection::default();
        selection.select(Square::E2, session.legal_targets(Square::E2));
        let outcome = resolve_click(&session, &selection, ai_black(), false, Square::E4);
        assert_eq!(
            outcome,
            ClickOutcome::Move {
                uci: "e2e4".to_string()
            }
        );
    }

    #[test]
    fn test_click_non_target_deselects() {
        let session = ChessSession::new();
        let mut selection = Selection::default();
        selection.select(Square::E2, session.legal_targets(Square::E2));
        let outcome = resolve_click(&session, &selection, ai_black(), false, Square::E5);
        assert_eq!(outcome, ClickOutcome::Deselect);
    }

    #[test]
    fn test_click_enemy_piece_without_selection_is_ignored() {
        let session = ChessSession::new();
        let outcome = resolve_click(&session, &Selection::default(), ai_black(), false, Square::E7);
        assert_eq!(outcome, ClickOutcome::Ignore);
    }

    #[test]
    fn test_clicks_ignored_on_ai_turn_or_while_thinking() {
        let mut session = ChessSession::new();
        session.play_uci("e2e4").unwrap();
        let outcome = resolve_click(&session, &Selection::default(), ai_black(), false, Square::E7);
        assert_eq!(outcome, ClickOutcome::Ignore);

        let fresh = ChessSession::new();
        let outcome = resolve_click(&fresh, &Selection::default(), ai_black(), true, Square::E2);
        assert_eq!(outcome, ClickOutcome::Ignore);
    }

    #[test]
    fn test_capture_by_clicking_enemy_on_target() {
        let mut session = ChessSession::new();
        for uci in ["e2e4", "d7d5"] {
            session.play_uci(uci).unwrap();
        }
        let mut selection = Selection::default();
        selection.select(Square::E4, session.legal_targets(Square::E4));
        let outcome = resolve_click(&session, &selection, GameMode::Local, false, Square::D5);
        assert_eq!(
            outcome,
            ClickOutcome::Move {
                uci: "e4d5".to_string()
            }
        );
    }

    #[test]
    fn test_promotion_click_picks_queen() {
        let session = ChessSession::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let mut selection = Selection::default();
        selection.select(Square::A7, session.legal_targets(Square::A7));
        let outcome = resolve_click(&session, &selection, GameMode::Local, false, Square::A8);
        assert_eq!(
            outcome,
            ClickOutcome::Move {
                uci: "a7a8q".to_string()
            }
        );
    }
}
