//! Audio Adapter - WAV 校验与编码

mod wav_encoder;
mod wav_inspector;

pub use wav_encoder::encode_pcm16_wav;
pub use wav_inspector::WavInspector;
