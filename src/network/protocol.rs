//! Network protocol message types
//!
//! Length-prefixed JSON messages over TCP: a 4-byte big-endian length,
//! then a JSON object tagged by `"type"`.

use crate::game::event::GameEvent;
use crate::lobby::settings::SettingsPatch;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::io::{self, Read, Write};

/// Largest frame body accepted from the wire
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Commands sent by a client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Take a seat with a display name
    Join { name: String },
    /// Play a word on our turn
    SubmitWord { word: String },
    /// Admin only
    StartGame,
    /// Admin only, between games
    UpdateSettings { settings: SettingsPatch },
    /// Live input preview relayed to the others
    Typing { text: String },
}

/// Everything the server sends is a game event
pub type ServerMessage = GameEvent;

/// Serialize a message to bytes (length-prefixed JSON)
pub fn encode<T: Serialize>(msg: &T) -> io::Result<Vec<u8>> {
    let json = serde_json::to_vec(msg).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    if json.len() > MAX_FRAME_LEN {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "message too large"));
    }
    let len = json.len() as u32;
    let mut bytes = Vec::with_capacity(4 + json.len());
    bytes.extend_from_slice(&len.to_be_bytes());
    bytes.extend_from_slice(&json);
    Ok(bytes)
}

/// Write pre-encoded frame bytes
pub fn write_frame<W: Write>(writer: &mut W, bytes: &[u8]) -> io::Result<()> {
    writer.write_all(bytes)?;
    writer.flush()
}

/// Read exactly one message
pub fn read_frame<T: DeserializeOwned, R: Read>(reader: &mut R) -> io::Result<T> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;

    if len > MAX_FRAME_LEN {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "message too large"));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    serde_json::from_slice(&body).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lobby::PlayerId;
    use std::io::Cursor;

    #[test]
    fn test_client_message_json() {
        let json = serde_json::to_string(&ClientMessage::SubmitWord {
            word: "maison".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"submit_word","word":"maison"}"#);

        let msg: ClientMessage = serde_json::from_str(r#"{"type":"start_game"}"#).unwrap();
        assert_eq!(msg, ClientMessage::StartGame);
    }

    #[test]
    fn test_update_settings_accepts_partial() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"update_settings","settings":{"min_time":5}}"#).unwrap();
        match msg {
            ClientMessage::UpdateSettings { settings } => {
                assert_eq!(settings.min_time, Some(5));
                assert_eq!(settings.max_time, None);
            }
            other => panic!("Expected UpdateSettings, got {:?}", other),
        }
    }

    #[test]
    fn test_frame_has_length_prefix() {
        let bytes = encode(&ClientMessage::StartGame).unwrap();
        let body = br#"{"type":"start_game"}"#;
        assert_eq!(&bytes[..4], &(body.len() as u32).to_be_bytes());
        assert_eq!(&bytes[4..], body);
    }

    #[test]
    fn test_read_frame_consumes_one_message() {
        let mut bytes = encode(&ClientMessage::Typing {
            text: "ab".to_string(),
        })
        .unwrap();
        bytes.extend(encode(&ClientMessage::StartGame).unwrap());

        let mut reader = Cursor::new(bytes);
        let first: ClientMessage = read_frame(&mut reader).unwrap();
        assert!(matches!(first, ClientMessage::Typing { .. }));
        let second: ClientMessage = read_frame(&mut reader).unwrap();
        assert_eq!(second, ClientMessage::StartGame);

        let err = read_frame::<ClientMessage, _>(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_frame_rejects_oversize() {
        let mut bytes = ((MAX_FRAME_LEN + 1) as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(b"{}");
        let err = read_frame::<ClientMessage, _>(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_read_frame_rejects_unknown_type() {
        let body = br#"{"type":"teleport"}"#;
        let mut bytes = (body.len() as u32).to_be_bytes().to_vec();
        bytes.extend_from_slice(body);
        let err = read_frame::<ClientMessage, _>(&mut Cursor::new(bytes)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_server_message_through_frame() {
        let event = ServerMessage::PlayerEliminated {
            player_id: PlayerId(3),
        };
        let bytes = encode(&event).unwrap();
        let back: ServerMessage = read_frame(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(back, event);
    }
}
