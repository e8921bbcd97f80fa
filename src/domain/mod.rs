//! Domain Layer - 领域层
//!
//! 包含两个限界上下文:
//! - Ask Context: 查询与回答
//! - Audio Context: 合成音频产物

pub mod ask;
pub mod audio;
