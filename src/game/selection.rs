//! Piece selection state for the click-to-move flow

use bevy::prelude::*;
use shakmaty::Square;

/// Currently selected square and its legal destinations
#[derive(Resource, Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    pub from: Option<Square>,
    pub targets: Vec<Square>,
}

impl Selection {
    pub fn is_selected(&self) -> bool {
        self.from.is_some()
    }

    pub fn is_target(&self, square: Square) -> bool {
        self.targets.contains(&square)
    }

    pub fn select(&mut self, from: Square, targets: Vec<Square>) {
        self.from = Some(from);
        self.targets = targets;
    }

    pub fn clear(&mut self) {
        self.from = None;
        self.targets.clear();
    }
}
