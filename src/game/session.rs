//! Chess session resource - the authoritative game state
//!
//! Wraps a `shakmaty::Chess` position. All rule knowledge (legal move
//! generation, check/mate/stalemate, SAN/UCI/FEN parsing) is delegated to
//! `shakmaty`; this type only adds what a match needs on top of a bare
//! position:
//!
//! - SAN move history and the FEN the game started from
//! - the last move's endpoints (for highlighting)
//! - repetition keys for threefold detection
//! - a `revision` counter bumped on every mutation, used by the renderer and
//!   the AI task to notice stale state
//!
//! # Coordinates
//!
//! Squares are `shakmaty::Square`. Rendering maps them to world space in
//! [`crate::rendering::board::square_to_world`].

use super::error::{GameError, GameResult};
use bevy::prelude::Resource;
use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus};
use shakmaty::uci::Uci;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Piece, Position, Role, Square};

/// Summary of a move that was just played
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    /// Long algebraic form, e.g. `e7e8q`
    pub uci: String,
    /// Standard algebraic form with check suffix, e.g. `exd8=Q+`
    pub san: String,
    pub from: Square,
    pub to: Square,
    pub captured: Option<Role>,
    /// FEN of the position after the move
    pub fen_after: String,
}

/// Where the game stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// Side to move is in check but has moves
    Check,
    Checkmate { winner: Color },
    Stalemate,
    InsufficientMaterial,
    FiftyMoveRule,
    ThreefoldRepetition,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        !matches!(self, GameStatus::Ongoing | GameStatus::Check)
    }

    /// Short human readable description for the UI
    pub fn describe(self) -> String {
        match self {
            GameStatus::Ongoing => "In progress".to_string(),
            GameStatus::Check => "Check".to_string(),
            GameStatus::Checkmate { winner } => format!("Checkmate - {} wins", color_name(winner)),
            GameStatus::Stalemate => "Draw by stalemate".to_string(),
            GameStatus::InsufficientMaterial => "Draw by insufficient material".to_string(),
            GameStatus::FiftyMoveRule => "Draw by fifty-move rule".to_string(),
            GameStatus::ThreefoldRepetition => "Draw by threefold repetition".to_string(),
        }
    }
}

pub fn color_name(color: Color) -> &'static str {
    match color {
        Color::White => "White",
        Color::Black => "Black",
    }
}

/// The current match
#[derive(Resource, Debug, Clone)]
pub struct ChessSession {
    position: Chess,
    start_fen: String,
    history: Vec<String>,
    last_move: Option<(Square, Square)>,
    repetition_keys: Vec<String>,
    revision: u64,
}

impl Default for ChessSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessSession {
    /// New game from the standard starting position
    pub fn new() -> Self {
        Self::from_position(Chess::default())
    }

    /// New game from an arbitrary FEN
    pub fn from_fen(fen: &str) -> GameResult<Self> {
        Ok(Self::from_position(parse_fen(fen)?))
    }

    fn from_position(position: Chess) -> Self {
        let start_fen = fen_of(&position);
        let key = repetition_key(&start_fen);
        Self {
            position,
            start_fen,
            history: Vec::new(),
            last_move: None,
            repetition_keys: vec![key],
            revision: 0,
        }
    }

    /// Back to the standard starting position
    pub fn reset(&mut self) {
        let revision = self.revision;
        *self = Self::new();
        self.revision = revision + 1;
    }

    /// Replace the game with the position described by `fen`.
    ///
    /// On error the current game is left untouched.
    pub fn load_fen(&mut self, fen: &str) -> GameResult<()> {
        let position = parse_fen(fen)?;
        let revision = self.revision;
        *self = Self::from_position(position);
        self.revision = revision + 1;
        Ok(())
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn fen(&self) -> String {
        fen_of(&self.position)
    }

    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// SAN of every move played since the start position
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.last_move
    }

    /// Every occupied square, in square order
    pub fn pieces(&self) -> Vec<(Square, Piece)> {
        let board = self.position.board();
        Square::ALL
            .iter()
            .filter_map(|&square| board.piece_at(square).map(|piece| (square, piece)))
            .collect()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.position.board().piece_at(square)
    }

    /// Square of the side-to-move's king if it is in check
    pub fn checked_king(&self) -> Option<Square> {
        if !self.position.is_check() {
            return None;
        }
        self.position.board().king_of(self.position.turn())
    }

    /// Destination squares of every legal move starting on `from`
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        let mut targets: Vec<Square> = self
            .position
            .legal_moves()
            .iter()
            .filter(|m| m.from() == Some(from))
            .map(|m| m.to())
            .collect();
        // Promotions produce one move per role
        targets.sort();
        targets.dedup();
        targets
    }

    /// The legal move from `from` to `to`.
    ///
    /// When several moves match (promotions) the one promoting to `promotion`
    /// is chosen, a queen when `None`.
    pub fn find_move(&self, from: Square, to: Square, promotion: Option<Role>) -> Option<Move> {
        let wanted = promotion.unwrap_or(Role::Queen);
        let candidates: Vec<Move> = self
            .position
            .legal_moves()
            .into_iter()
            .filter(|m| m.from() == Some(from) && m.to() == to)
            .collect();
        candidates
            .iter()
            .find(|m| m.promotion().is_none() || m.promotion() == Some(wanted))
            .or_else(|| candidates.first())
            .cloned()
    }

    /// Every legal move in UCI notation
    pub fn legal_uci_moves(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|m| m.to_uci(CastlingMode::Standard).to_string())
            .collect()
    }

    /// Every legal move in SAN (without check suffixes)
    pub fn legal_san_moves(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(|m| San::from_move(&self.position, m).to_string())
            .collect()
    }

    /// Parse a UCI move (`e2e4`, `e7e8q`) and play it if legal
    pub fn play_uci(&mut self, text: &str) -> GameResult<MoveRecord> {
        let m = self.parse_uci(text)?;
        self.play_move(&m)
    }

    /// Parse a SAN move (`Nf3`, `O-O`, `exd8=Q+`) and play it if legal
    pub fn play_san(&mut self, text: &str) -> GameResult<MoveRecord> {
        let m = self.parse_san(text)?;
        self.play_move(&m)
    }

    /// Resolve UCI text to a legal move without playing it
    pub fn parse_uci(&self, text: &str) -> GameResult<Move> {
        self.ensure_not_over()?;
        let uci: Uci = text.trim().parse().map_err(|_| GameError::UnparseableMove {
            notation: text.to_string(),
        })?;
        uci.to_move(&self.position).map_err(|_| GameError::IllegalMove {
            notation: text.to_string(),
            fen: self.fen(),
        })
    }

    /// Resolve SAN text to a legal move without playing it
    pub fn parse_san(&self, text: &str) -> GameResult<Move> {
        self.ensure_not_over()?;
        let san: SanPlus = text.trim().parse().map_err(|_| GameError::UnparseableMove {
            notation: text.to_string(),
        })?;
        san.san.to_move(&self.position).map_err(|_| GameError::IllegalMove {
            notation: text.to_string(),
            fen: self.fen(),
        })
    }

    /// Play a move that must be legal in the current position
    pub fn play_move(&mut self, m: &Move) -> GameResult<MoveRecord> {
        self.ensure_not_over()?;
        if !self.position.is_legal(m) {
            return Err(GameError::IllegalMove {
                notation: m.to_uci(CastlingMode::Standard).to_string(),
                fen: self.fen(),
            });
        }

        let uci = m.to_uci(CastlingMode::Standard).to_string();
        let from = m.from().unwrap_or_else(|| m.to());
        let to = m.to();
        let captured = m.capture();

        let san = SanPlus::from_move_and_play_unchecked(&mut self.position, m).to_string();
        let fen_after = self.fen();

        self.history.push(san.clone());
        self.repetition_keys.push(repetition_key(&fen_after));
        self.last_move = Some((from, to));
        self.revision += 1;

        Ok(MoveRecord {
            uci,
            san,
            from,
            to,
            captured,
            fen_after,
        })
    }

    pub fn status(&self) -> GameStatus {
        let pos = &self.position;
        if pos.is_checkmate() {
            return GameStatus::Checkmate {
                winner: pos.turn().other(),
            };
        }
        if pos.is_stalemate() {
            return GameStatus::Stalemate;
        }
        if pos.is_insufficient_material() {
            return GameStatus::InsufficientMaterial;
        }
        if pos.halfmoves() >= 100 {
            return GameStatus::FiftyMoveRule;
        }
        if self.is_threefold_repetition() {
            return GameStatus::ThreefoldRepetition;
        }
        if pos.is_check() {
            return GameStatus::Check;
        }
        GameStatus::Ongoing
    }

    pub fn is_game_over(&self) -> bool {
        self.status().is_over()
    }

    fn is_threefold_repetition(&self) -> bool {
        let Some(current) = self.repetition_keys.last() else {
            return false;
        };
        self.repetition_keys.iter().filter(|key| *key == current).count() >= 3
    }

    fn ensure_not_over(&self) -> GameResult<()> {
        if self.is_game_over() {
            return Err(GameError::GameOver {
                status: self.status().describe(),
            });
        }
        Ok(())
    }
}

fn parse_fen(fen: &str) -> GameResult<Chess> {
    let parsed: Fen = fen.trim().parse().map_err(|e| GameError::InvalidFen {
        fen: fen.to_string(),
        reason: format!("{}", e),
    })?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|e| GameError::InvalidFen {
            fen: fen.to_string(),
            reason: format!("{}", e),
        })
}

fn fen_of(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// Piece placement, side to move, castling rights and en passant square:
/// the FEN without its move counters.
fn repetition_key(fen: &str) -> String {
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}
