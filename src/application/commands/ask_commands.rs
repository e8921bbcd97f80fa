//! Ask Commands - 问答命令

use crate::domain::ask::RequestId;
use crate::domain::audio::AudioArtifact;

/// 提交查询命令
///
/// `query` 为原始请求字段，缺失时为 None，由处理器校验
#[derive(Debug, Clone)]
pub struct AskCommand {
    pub query: Option<String>,
}

/// 提交查询响应
#[derive(Debug, Clone)]
pub struct AskResponse {
    pub request_id: RequestId,
    /// 生成的回答文本
    pub answer: String,
    /// 音频检索路径，如 `/api/audio/response.wav`
    pub audio: String,
    /// 已落盘的音频产物
    pub artifact: AudioArtifact,
}
