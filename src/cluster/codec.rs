//! Versioned wire codec for coordinator/worker messages.
//!
//! Frames are a one-byte version tag followed by the borsh encoding of
//! [`Message`]. Nothing on the wire depends on native memory layout, so any
//! transport that delivers whole frames in order can carry the protocol.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::core::{CollisionEvent, Particle};
use crate::error::{Error, Result};

/// Current frame format version.
pub const WIRE_VERSION: u8 = 1;

/// Every message exchanged between the coordinator and the workers.
#[derive(Debug, Clone, PartialEq, BorshSerialize, BorshDeserialize)]
pub enum Message {
    /// Run parameters, broadcast once before the first round.
    Params {
        n: u32,
        box_len: f64,
        radius: f64,
        steps: u32,
    },
    /// The complete particle array (first round only).
    FullState(Vec<Particle>),
    /// Pair-collision participants from the previous round (later rounds).
    Delta(Vec<Particle>),
    /// One worker's candidate events for the current round.
    Events(Vec<CollisionEvent>),
}

/// Encode a message into a framed byte vector.
pub fn encode(msg: &Message) -> Result<Vec<u8>> {
    let mut frame = vec![WIRE_VERSION];
    msg.serialize(&mut frame)
        .map_err(|e| Error::Codec(e.to_string()))?;
    Ok(frame)
}

/// Decode a framed byte vector, rejecting unknown versions and malformed
/// payloads.
pub fn decode(frame: &[u8]) -> Result<Message> {
    let (&version, payload) = frame
        .split_first()
        .ok_or_else(|| Error::Codec("empty frame".into()))?;
    if version != WIRE_VERSION {
        return Err(Error::WireVersion {
            found: version,
            expected: WIRE_VERSION,
        });
    }
    Message::try_from_slice(payload).map_err(|e| Error::Codec(e.to_string()))
}
