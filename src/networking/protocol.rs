//! Peer wire format
//!
//! One JSON object per line, tagged by `"type"`:
//!
//! ```text
//! {"type":"MOVE","uci":"e2e4","fen":"rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1"}
//! {"type":"SYNC","fen":"…","history":["e4","e5"]}
//! {"type":"RESET"}
//! ```
//!
//! There's no sequencing or acknowledgement. A `MOVE` carries the mover's FEN
//! afterwards so a receiver that has drifted can adopt it.

use super::error::NetResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PeerMessage {
    /// A move just played by the sender
    Move {
        uci: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fen: Option<String>,
    },
    /// Full position, sent by the host when a guest connects or after a FEN load
    Sync {
        fen: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        history: Vec<String>,
    },
    /// Start a new game from the standard position
    Reset,
}

impl PeerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            PeerMessage::Move { .. } => "MOVE",
            PeerMessage::Sync { .. } => "SYNC",
            PeerMessage::Reset => "RESET",
        }
    }
}

/// Serialize to a single line, without the trailing newline
pub fn encode(message: &PeerMessage) -> NetResult<String> {
    Ok(serde_json::to_string(message)?)
}

/// Parse one received line
pub fn decode(line: &str) -> NetResult<PeerMessage> {
    Ok(serde_json::from_str(line.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::networking::error::NetError;

    #[test]
    fn test_move_wire_format() {
        let line = encode(&PeerMessage::Move {
            uci: "e2e4".to_string(),
            fen: None,
        })
        .unwrap();
        assert_eq!(line, r#"{"type":"MOVE","uci":"e2e4"}"#);
    }

    #[test]
    fn test_reset_wire_format() {
        assert_eq!(encode(&PeerMessage::Reset).unwrap(), r#"{"type":"RESET"}"#);
        assert_eq!(decode("  {\"type\":\"RESET\"}\r\n").unwrap(), PeerMessage::Reset);
    }

    #[test]
    fn test_sync_history_is_optional() {
        let msg = decode(r#"{"type":"SYNC","fen":"8/8/8/8/8/8/8/K6k w - - 0 1"}"#).unwrap();
        assert_eq!(
            msg,
            PeerMessage::Sync {
                fen: "8/8/8/8/8/8/8/K6k w - - 0 1".to_string(),
                history: Vec::new(),
            }
        );
    }

    #[test]
    fn test_encoded_line_has_no_newline() {
        let msg = PeerMessage::Sync {
            fen: "line\nbreak".to_string(),
            history: vec!["e4".to_string()],
        };
        let line = encode(&msg).unwrap();
        assert!(!line.contains('\n'));
        assert_eq!(decode(&line).unwrap(), msg);
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(matches!(
            decode(r#"{"type":"CHAT","text":"hi"}"#),
            Err(NetError::Codec(_))
        ));
        assert!(decode("not json").is_err());
    }
}
