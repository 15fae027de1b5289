//! Random-move fallback
//!
//! Used whenever the completion path fails for any reason.

use super::error::{AiError, AiResult};
use rand::seq::IndexedRandom;
use rand::Rng;
use shakmaty::{Chess, Move, Position};

/// Uniformly random legal move
pub fn random_legal_move<R: Rng + ?Sized>(position: &Chess, rng: &mut R) -> AiResult<Move> {
    let moves = position.legal_moves();
    moves.as_slice().choose(rng).cloned().ok_or(AiError::NoMovesAvailable)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use shakmaty::fen::Fen;
    use shakmaty::CastlingMode;

    #[test]
    fn test_random_move_is_legal() {
        let pos = Chess::default();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let m = random_legal_move(&pos, &mut rng).unwrap();
            assert!(pos.is_legal(&m));
        }
    }

    #[test]
    fn test_no_moves_in_checkmate() {
        let pos: Chess = "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
            .parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            random_legal_move(&pos, &mut rng),
            Err(AiError::NoMovesAvailable)
        ));
    }
}
