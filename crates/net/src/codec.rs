//! Length-prefixed framing.
//!
//! Frame format: `[length: u32 LE][tag: u8][postcard payload]`, where the
//! length counts the tag and payload but not itself.

use crate::protocol::ServerMessage;
use thiserror::Error;
use tracing::debug;

/// Bytes preceding the payload (length plus tag).
pub const FRAME_HEADER_LEN: usize = 5;

/// Largest accepted frame body.
pub const MAX_FRAME_LEN: usize = 64 * 1024;

/// Frame decoding failures.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Fewer bytes than a frame header.
    #[error("frame too short: {0} bytes (minimum {FRAME_HEADER_LEN})")]
    TooShort(usize),
    /// The length prefix points past the end of the buffer.
    #[error("incomplete frame: expected {expected} bytes, got {actual}")]
    Incomplete {
        /// Bytes the frame claims.
        expected: usize,
        /// Bytes available.
        actual: usize,
    },
    /// The length prefix is zero or above [`MAX_FRAME_LEN`].
    #[error("invalid frame length {0}")]
    BadLength(usize),
    /// The tag byte does not name a message.
    #[error("unknown message tag {0}")]
    UnknownTag(u8),
    /// The tag disagrees with the decoded payload.
    #[error("tag {tag} does not match decoded message tag {decoded}")]
    TagMismatch {
        /// Tag read from the frame.
        tag: u8,
        /// Tag of the decoded message.
        decoded: u8,
    },
    /// The message violates protocol limits.
    #[error("invalid message: {0}")]
    Invalid(&'static str),
    /// Postcard failed to encode or decode.
    #[error("payload: {0}")]
    Payload(#[from] postcard::Error),
}

/// Encode a server message into one frame.
pub fn encode_server_message(msg: &ServerMessage) -> Result<Vec<u8>, CodecError> {
    let payload = postcard::to_allocvec(msg)?;
    let length = 1 + payload.len();
    if length > MAX_FRAME_LEN {
        return Err(CodecError::BadLength(length));
    }

    let mut frame = Vec::with_capacity(4 + length);
    frame.extend_from_slice(&(length as u32).to_le_bytes());
    frame.push(msg.tag());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Decode the first frame in `data`.
pub fn decode_server_message(data: &[u8]) -> Result<ServerMessage, CodecError> {
    decode_frame(data).map(|(msg, _)| msg)
}

/// Decode every back-to-back frame in `data`.
pub fn decode_stream(mut data: &[u8]) -> Result<Vec<ServerMessage>, CodecError> {
    let mut messages = Vec::new();
    while !data.is_empty() {
        let (msg, used) = decode_frame(data)?;
        messages.push(msg);
        data = &data[used..];
    }
    Ok(messages)
}

fn decode_frame(data: &[u8]) -> Result<(ServerMessage, usize), CodecError> {
    if data.len() < FRAME_HEADER_LEN {
        return Err(CodecError::TooShort(data.len()));
    }

    let length = u32::from_le_bytes([data[0], data[1], data[2], data[3]]) as usize;
    if length == 0 || length > MAX_FRAME_LEN {
        return Err(CodecError::BadLength(length));
    }
    if data.len() < 4 + length {
        return Err(CodecError::Incomplete {
            expected: 4 + length,
            actual: data.len(),
        });
    }

    let tag = data[4];
    if tag > 3 {
        return Err(CodecError::UnknownTag(tag));
    }

    let msg: ServerMessage = postcard::from_bytes(&data[FRAME_HEADER_LEN..4 + length])?;
    if msg.tag() != tag {
        return Err(CodecError::TagMismatch {
            tag,
            decoded: msg.tag(),
        });
    }
    msg.verify().map_err(CodecError::Invalid)?;
    debug!(tag, length, "Decoded server message");
    Ok((msg, 4 + length))
}
