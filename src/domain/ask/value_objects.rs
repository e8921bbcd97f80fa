//! Ask Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AskError;

/// 请求唯一标识（仅用于日志追踪）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 用户查询
///
/// 不变量:
/// - 去除首尾空白后不能为空
/// - 保留原始文本（发送给模型的是原文）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Result<Self, AskError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AskError::EmptyQuery);
        }
        Ok(Self(text))
    }

    /// 从可选字段解析（请求体中 `query` 可能缺失）
    pub fn parse(raw: Option<String>) -> Result<Self, AskError> {
        raw.ok_or(AskError::MissingQuery).and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 模型生成的回答
///
/// 空回答无法合成语音，视为模型输出异常
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer(String);

impl Answer {
    pub fn new(text: impl Into<String>) -> Result<Self, AskError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(AskError::EmptyAnswer);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_rejects_missing_and_blank() {
        assert_eq!(Query::parse(None), Err(AskError::MissingQuery));
        assert_eq!(Query::parse(Some(String::new())), Err(AskError::EmptyQuery));
        assert_eq!(Query::new(" \t\n"), Err(AskError::EmptyQuery));
    }

    #[test]
    fn test_query_keeps_original_text() {
        let query = Query::parse(Some("  What is the weather today? ".to_string())).unwrap();
        assert_eq!(query.as_str(), "  What is the weather today? ");
        assert_eq!(query.char_count(), 29);
    }

    #[test]
    fn test_answer_rejects_blank() {
        assert_eq!(Answer::new("   "), Err(AskError::EmptyAnswer));
        assert_eq!(Answer::new("Sunny.").unwrap().as_str(), "Sunny.");
    }
}
