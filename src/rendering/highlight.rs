//! Square highlighting
//!
//! Each frame every square material is moved a little toward the tint its
//! square should have right now. The blend factor is `1 - exp(-rate * dt)`,
//! so the fade takes the same wall time at any frame rate.

use super::board::{BoardPalette, BoardSquare};
use crate::core::GameSettings;
use crate::game::selection::Selection;
use crate::game::session::ChessSession;
use bevy::color::Mix;
use bevy::prelude::*;
use shakmaty::Square;

/// Higher is snappier; ~95% of the way there after 0.25s
const TWEEN_RATE: f32 = 12.0;

/// Below this summed channel difference a material is left alone
const SETTLE_EPSILON: f32 = 0.002;

/// How much of the highlight colour shows through the square colour
const HIGHLIGHT_MIX: f32 = 0.55;
const EMISSIVE_STRENGTH: f32 = 0.25;

/// Why a square is tinted, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquareHighlight {
    Check,
    Selected,
    Target,
    LastMove,
    None,
}

/// Inputs the highlight decision depends on
#[derive(Debug, Clone, Copy)]
pub struct HighlightContext<'a> {
    pub selection: &'a Selection,
    pub last_move: Option<(Square, Square)>,
    pub checked_king: Option<Square>,
    pub show_hints: bool,
    pub show_last_move: bool,
}

pub fn square_highlight(square: Square, ctx: &HighlightContext) -> SquareHighlight {
    if ctx.checked_king == Some(square) {
        return SquareHighlight::Check;
    }
    if ctx.selection.from == Some(square) {
        return SquareHighlight::Selected;
    }
    if ctx.show_hints && ctx.selection.is_target(square) {
        return SquareHighlight::Target;
    }
    if ctx.show_last_move {
        if let Some((from, to)) = ctx.last_move {
            if square == from || square == to {
                return SquareHighlight::LastMove;
            }
        }
    }
    SquareHighlight::None
}

/// Base colour and emissive a square should settle at
pub fn desired_tint(
    highlight: SquareHighlight,
    is_light: bool,
    palette: &BoardPalette,
) -> (LinearRgba, LinearRgba) {
    let plain = if is_light { palette.light } else { palette.dark }.to_linear();
    let accent = match highlight {
        SquareHighlight::Check => palette.check,
        SquareHighlight::Selected => palette.selected,
        SquareHighlight::Target => palette.target,
        SquareHighlight::LastMove => palette.last_move,
        SquareHighlight::None => return (plain, LinearRgba::BLACK),
    }
    .to_linear();

    let base = plain.mix(&accent, HIGHLIGHT_MIX);
    let emissive = LinearRgba::rgb(
        accent.red * EMISSIVE_STRENGTH,
        accent.green * EMISSIVE_STRENGTH,
        accent.blue * EMISSIVE_STRENGTH,
    );
    (base, emissive)
}

/// Fraction of the remaining distance to cover this frame
pub fn blend_factor(rate: f32, dt: f32) -> f32 {
    1.0 - (-rate * dt.max(0.0)).exp()
}

fn distance(a: LinearRgba, b: LinearRgba) -> f32 {
    (a.red - b.red).abs() + (a.green - b.green).abs() + (a.blue - b.blue).abs()
}

/// Move `current` toward `target`; snaps once close enough
pub fn step_toward(current: LinearRgba, target: LinearRgba, t: f32) -> LinearRgba {
    let next = current.mix(&target, t);
    if distance(next, target) < SETTLE_EPSILON {
        target
    } else {
        next
    }
}

pub fn tween_square_materials(
    time: Res<Time>,
    session: Res<ChessSession>,
    selection: Res<Selection>,
    settings: Res<GameSettings>,
    palette: Res<BoardPalette>,
    squares: Query<(&BoardSquare, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let ctx = HighlightContext {
        selection: &selection,
        last_move: session.last_move(),
        checked_king: session.checked_king(),
        show_hints: settings.show_hints,
        show_last_move: settings.highlight_last_move,
    };
    let t = blend_factor(TWEEN_RATE, time.delta_secs());

    for (board_square, material_handle) in &squares {
        let highlight = square_highlight(board_square.square, &ctx);
        let (target_base, target_emissive) =
            desired_tint(highlight, board_square.is_light(), &palette);

        let Some(current) = materials.get(&material_handle.0) else {
            continue;
        };
        let current_base = current.base_color.to_linear();
        let current_emissive = current.emissive;
        if current_base == target_base && current_emissive == target_emissive {
            continue;
        }

        if let Some(mut material) = materials.get_mut(&material_handle.0) {
            material.base_color = step_toward(current_base, target_base, t).into();
            material.emissive = step_toward(current_emissive, target_emissive, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(selection: &Selection) -> HighlightContext<'_> {
        HighlightContext {
            selection,
            last_move: Some((Square::E2, Square::E4)),
            checked_king: None,
            show_hints: true,
            show_last_move: true,
        }
    }

    #[test]
    fn test_highlight_priority() {
        let mut selection = Selection::default();
        selection.select(Square::E4, vec![Square::E5]);
        let mut context = ctx(&selection);

        assert_eq!(square_highlight(Square::E4, &context), SquareHighlight::Selected);
        assert_eq!(square_highlight(Square::E5, &context), SquareHighlight::Target);
        assert_eq!(square_highlight(Square::E2, &context), SquareHighlight::LastMove);
        assert_eq!(square_highlight(Square::A1, &context), SquareHighlight::None);

        context.checked_king = Some(Square::E4);
        assert_eq!(square_highlight(Square::E4, &context), SquareHighlight::Check);
    }

    #[test]
    fn test_settings_disable_hints_and_last_move() {
        let mut selection = Selection::default();
        selection.select(Square::E4, vec![Square::E5]);
        let mut context = ctx(&selection);
        context.show_hints = false;
        context.show_last_move = false;

        assert_eq!(square_highlight(Square::E5, &context), SquareHighlight::None);
        assert_eq!(square_highlight(Square::E2, &context), SquareHighlight::None);
        // Selection itself always shows
        assert_eq!(square_highlight(Square::E4, &context), SquareHighlight::Selected);
    }

    #[test]
    fn test_plain_tint_has_no_emissive() {
        let palette = BoardPalette::default();
        let (base, emissive) = desired_tint(SquareHighlight::None, true, &palette);
        assert_eq!(base, palette.light.to_linear());
        assert_eq!(emissive, LinearRgba::BLACK);

        let (_, lit) = desired_tint(SquareHighlight::Check, false, &palette);
        assert!(lit.red > 0.0);
    }

    #[test]
    fn test_blend_factor_is_frame_rate_independent() {
        //! Two half steps cover the same distance as one full step
        let full = blend_factor(TWEEN_RATE, 1.0 / 30.0);
        let half = blend_factor(TWEEN_RATE, 1.0 / 60.0);
        let two_halves = 1.0 - (1.0 - half) * (1.0 - half);
        assert!((full - two_halves).abs() < 1e-5);
        assert_eq!(blend_factor(TWEEN_RATE, 0.0), 0.0);
    }

    #[test]
    fn test_step_toward_converges_and_snaps() {
        let target = LinearRgba::rgb(1.0, 0.0, 0.0);
        let mut current = LinearRgba::BLACK;
        for _ in 0..200 {
            current = step_toward(current, target, blend_factor(TWEEN_RATE, 1.0 / 60.0));
        }
        assert_eq!(current, target);
    }
}
