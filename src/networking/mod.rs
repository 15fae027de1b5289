//! Peer-to-peer play
//!
//! Two instances connect directly over TCP and relay three message types
//! (`MOVE`, `SYNC`, `RESET`). There's no ordering guarantee beyond the
//! stream's, no acknowledgement and no persistence; each side validates
//! incoming moves with its own session and adopts the sender's FEN if the
//! two drift apart.
//!
//! - `protocol` - wire format
//! - `transport` - background connection with reconnect
//! - `plugin` - [`NetworkingPlugin`] wiring to the game messages

pub mod error;
pub mod plugin;
pub mod protocol;
pub mod transport;

pub use error::{NetError, NetResult};
pub use plugin::{NetworkSession, NetworkingPlugin};
pub use protocol::PeerMessage;
pub use transport::{PeerEvent, PeerLink};
