//! Ask Context - 问答限界上下文
//!
//! 职责:
//! - 用户查询的校验
//! - 生成文本的约束
//! - 请求标识

mod errors;
mod value_objects;

pub use errors::AskError;
pub use value_objects::{Answer, Query, RequestId};
