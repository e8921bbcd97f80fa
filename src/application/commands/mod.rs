//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：问答请求会生成并写入新的音频产物

mod ask_commands;

pub mod handlers;

pub use ask_commands::*;
