//! HTTP Handlers

mod ask;
mod audio;
mod ping;

pub use ask::*;
pub use audio::*;
pub use ping::*;
