//! Prompt construction
//!
//! The model gets the FEN, the side it plays, the game so far and the full list
//! of legal SAN moves, and is told to answer with exactly one of them. Listing
//! the legal moves keeps most replies usable; [`super::reply`] deals with the rest.

use crate::game::session::color_name;
use shakmaty::Color;

/// Build the instruction text for one move request
pub fn build_prompt(fen: &str, side: Color, legal_sans: &[String], history: &[String]) -> String {
    let mut prompt = String::new();
    prompt.push_str(&format!(
        "You are playing chess as {}. Choose your next move.\n\n",
        color_name(side)
    ));
    prompt.push_str(&format!("Position (FEN): {}\n", fen));

    if history.is_empty() {
        prompt.push_str("Moves so far: none\n");
    } else {
        prompt.push_str(&format!("Moves so far: {}\n", format_history(history)));
    }

    prompt.push_str(&format!("Legal moves: {}\n\n", legal_sans.join(", ")));
    prompt.push_str(
        "Reply with exactly one move from the legal moves list in standard algebraic \
         notation (for example: Nf3). Do not add commentary.",
    );
    prompt
}

/// `1. e4 e5 2. Nf3` style numbering for the history line
pub fn format_history(history: &[String]) -> String {
    history
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| format!("{}. {}", i + 1, pair.join(" ")))
        .collect::<Vec<_>>()
        .join(" ")
}
