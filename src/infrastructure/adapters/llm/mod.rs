//! LLM Adapter - 文本生成客户端实现

mod fake_text_generator;
mod http_text_generator;

pub use fake_text_generator::{FakeTextGenerator, FakeTextGeneratorConfig};
pub use http_text_generator::*;
