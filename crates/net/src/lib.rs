#![warn(missing_docs)]
//! Wire format for pushing spit state to observers.

mod codec;
mod protocol;

pub use codec::{
    decode_server_message, decode_stream, encode_server_message, CodecError, FRAME_HEADER_LEN,
    MAX_FRAME_LEN,
};
pub use protocol::{
    ServerMessage, MAX_PLAYER_NAME_LEN, MAX_REFRESH_SLOTS, MAX_SPIT_SLOTS, PROTOCOL_VERSION,
};
