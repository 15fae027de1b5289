//! Core module - application states, settings and error types
//!
//! Owns the pieces every other module leans on:
//!
//! - [`GameState`] - the top-level state machine (`Menu` → `InGame`)
//! - [`GameSettings`] - persisted user configuration (AI endpoint, networking, visuals)
//! - [`settings_persistence`] - JSON load/save in the platform config directory
//! - [`CorePlugin`] - registers the above with the app
//!
//! Settings are loaded *before* the app is built (see `main.rs`) so command line
//! overrides and the log filter can be applied; the plugin only saves them back
//! when they change.

pub mod error;
pub mod plugin;
pub mod settings;
pub mod settings_persistence;
pub mod states;

pub use error::{CoreError, CoreResult};
pub use plugin::CorePlugin;
pub use settings::*;
pub use states::*;
