//! Completion reply post-processing
//!
//! Models rarely answer with a bare move. Replies seen in practice include
//! `**Nf3**`, fenced code blocks, `1... e5`, `I'll play Bxc6!`, `0-0`, `e7-e5`
//! and `e8Q`. The text is split into tokens, each token is normalized, and
//! the first one that is a legal move (SAN first, then UCI) wins.

use shakmaty::san::San;
use shakmaty::uci::Uci;
use shakmaty::{Chess, Move};

/// Characters that never belong to a move token
const NOISE: &[char] = &[
    '*', '_', '`', '"', '\'', '(', ')', '[', ']', '{', '}', ',', ';', ':', '<', '>', '|',
];

/// First legal move mentioned in `text`, if any
pub fn extract_move(text: &str, position: &Chess) -> Option<Move> {
    let cleaned: String = text
        .replace("```", " ")
        .chars()
        .map(|c| if NOISE.contains(&c) { ' ' } else { c })
        .collect();

    cleaned
        .split_whitespace()
        .flat_map(candidates)
        .find_map(|candidate| resolve(&candidate, position))
}

/// Normalized spellings worth trying for one raw token
fn candidates(token: &str) -> Vec<String> {
    let token = strip_move_number(token);
    let token = token.trim_end_matches(['.', '!', '?', '+', '#']);
    if token.is_empty() {
        return Vec::new();
    }

    let mut out = vec![token.replace("0-0-0", "O-O-O").replace("0-0", "O-O")];

    // e8Q → e8=Q
    let bytes = token.as_bytes();
    if bytes.len() >= 3 {
        let last = bytes[bytes.len() - 1];
        let before = bytes[bytes.len() - 2];
        if b"QRBN".contains(&last) && before.is_ascii_digit() {
            out.push(format!("{}={}", &token[..token.len() - 1], last as char));
        }
    }

    // e2-e4 / e2xe4 / E2E4 → e2e4
    let squashed: String = token
        .chars()
        .filter(|c| *c != '-' && *c != 'x' && *c != '=')
        .collect::<String>()
        .to_ascii_lowercase();
    if squashed.len() == 4 || squashed.len() == 5 {
        out.push(squashed);
    }

    out
}

/// `12.` / `12...` / `12...e5` → `e5`
fn strip_move_number(token: &str) -> &str {
    let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits == 0 {
        return token;
    }
    let rest = &token[digits..];
    if rest.starts_with('.') {
        rest.trim_start_matches('.')
    } else {
        token
    }
}

fn resolve(candidate: &str, position: &Chess) -> Option<Move> {
    if let Ok(san) = candidate.parse::<San>() {
        if let Ok(m) = san.to_move(position) {
            return Some(m);
        }
    }
    if let Ok(uci) = candidate.parse::<Uci>() {
        if let Ok(m) = uci.to_move(position) {
            return Some(m);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::fen::Fen;
    use shakmaty::{CastlingMode, Position, Role, Square};

    fn start() -> Chess {
        Chess::default()
    }

    fn from_fen(fen: &str) -> Chess {
        fen.parse::<Fen>()
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap()
    }

    fn target(text: &str, pos: &Chess) -> Option<(Square, Square)> {
        extract_move(text, pos).map(|m| (m.from().unwrap(), m.to()))
    }

    #[test]
    fn test_bare_san() {
        assert_eq!(target("Nf3", &start()), Some((Square::G1, Square::F3)));
    }

    #[test]
    fn test_markdown_and_prose() {
        let reply = "I'll develop my knight: **Nc3**. It controls the center!";
        assert_eq!(target(reply, &start()), Some((Square::B1, Square::C3)));
    }

    #[test]
    fn test_code_fence() {
        let reply = "```\ne4\n```";
        assert_eq!(target(reply, &start()), Some((Square::E2, Square::E4)));
    }

    #[test]
    fn test_move_number_prefix() {
        let mut pos = start();
        let m = "e4".parse::<San>().unwrap().to_move(&pos).unwrap();
        pos.play_unchecked(&m);
        assert_eq!(target("1... e5", &pos), Some((Square::E7, Square::E5)));
        assert_eq!(target("1...c5!?", &pos), Some((Square::C7, Square::C5)));
    }

    #[test]
    fn test_uci_and_long_algebraic() {
        assert_eq!(target("g1f3", &start()), Some((Square::G1, Square::F3)));
        assert_eq!(target("Move: d2-d4", &start()), Some((Square::D2, Square::D4)));
    }

    #[test]
    fn test_zero_castling() {
        let pos = from_fen("4k3/8/8/8/8/8/8/4K2R w K - 0 1");
        let m = extract_move("0-0", &pos).unwrap();
        assert!(m.is_castle());
    }

    #[test]
    fn test_promotion_without_equals() {
        let pos = from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1");
        let m = extract_move("a8Q", &pos).unwrap();
        assert_eq!(m.promotion(), Some(Role::Queen));

        let knight = extract_move("a8=N+", &pos).unwrap();
        assert_eq!(knight.promotion(), Some(Role::Knight));
    }

    #[test]
    fn test_illegal_mentions_are_skipped() {
        // Nf6 is not legal for White; e4 later in the text is
        let reply = "Nf6 would be nice but I play e4";
        assert_eq!(target(reply, &start()), Some((Square::E2, Square::E4)));
    }

    #[test]
    fn test_no_move_in_text() {
        assert!(extract_move("I resign, good game.", &start()).is_none());
        assert!(extract_move("", &start()).is_none());
    }
}
