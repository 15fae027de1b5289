//! Colour palette for the egui overlay

use bevy_egui::egui;

pub struct UiColors;

impl UiColors {
    /// Panel background
    pub const BG_OVERLAY: egui::Color32 = egui::Color32::from_black_alpha(220);
    pub const BORDER: egui::Color32 = egui::Color32::from_rgb(60, 60, 65);

    pub const TEXT_PRIMARY: egui::Color32 = egui::Color32::from_rgb(240, 240, 245);
    pub const TEXT_SECONDARY: egui::Color32 = egui::Color32::from_rgb(200, 200, 205);
    pub const TEXT_TERTIARY: egui::Color32 = egui::Color32::from_rgb(150, 150, 155);

    /// Headings and game-over banner
    pub const ACCENT_GOLD: egui::Color32 = egui::Color32::from_rgb(218, 165, 32);
    pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(40, 180, 40);
    pub const WARNING: egui::Color32 = egui::Color32::from_rgb(255, 150, 0);
    pub const DANGER: egui::Color32 = egui::Color32::from_rgb(220, 50, 50);
}
