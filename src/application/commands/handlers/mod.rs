//! Command Handlers 实现

mod ask_handlers;

pub use ask_handlers::*;
