//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod audio;
pub mod llm;
pub mod storage;
pub mod tts;

pub use audio::*;
pub use llm::*;
pub use storage::*;
pub use tts::*;
