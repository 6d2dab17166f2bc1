//! Fixed-width binary record codec with tagged unions and a JSON mirror.

/// Schema resolution, binary encode/decode, and the JSON mirror.
pub mod codec;
