//! Session channel and session directory adapters

pub mod channel;
pub mod codec;
pub mod directory;

pub use channel::SessionChannel;
pub use codec::{WireMessage, decode_envelope};
pub use directory::HttpSessionDirectory;
