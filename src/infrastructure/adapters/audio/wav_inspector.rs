//! WAV Inspector - 基于 symphonia 的音频校验
//!
//! TTS 服务返回的字节必须是可解码、非空的 WAV，否则视为模型输出异常

use std::io::Cursor;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioInfo, AudioInspectorPort, InspectError};

/// WAV 校验器
#[derive(Debug, Default, Clone, Copy)]
pub struct WavInspector;

impl WavInspector {
    pub fn new() -> Self {
        Self
    }
}

impl AudioInspectorPort for WavInspector {
    fn inspect(&self, data: &[u8]) -> Result<AudioInfo, InspectError> {
        if data.is_empty() {
            return Err(InspectError::Empty);
        }

        let cursor = Cursor::new(data.to_vec());
        let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

        let mut hint = Hint::new();
        hint.with_extension("wav");

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| InspectError::Decode(format!("Probe failed: {}", e)))?;

        let mut format = probed.format;

        let track = format
            .default_track()
            .ok_or_else(|| InspectError::Decode("No audio track found".to_string()))?;

        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or_else(|| InspectError::Decode("Unknown sample rate".to_string()))?;

        let channels = track
            .codec_params
            .channels
            .map(|c| c.count() as u16)
            .ok_or_else(|| InspectError::Decode("Unknown channel count".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| InspectError::Decode(format!("Decoder creation failed: {}", e)))?;

        let track_id = track.id;
        let mut frames: u64 = 0;

        loop {
            let packet = match format.next_packet() {
                Ok(p) => p,
                Err(symphonia::core::errors::Error::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    break;
                }
                Err(e) => {
                    return Err(InspectError::Decode(format!("Packet read error: {}", e)));
                }
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => frames += decoded.frames() as u64,
                Err(e) => {
                    tracing::warn!("Decode error (skipping packet): {}", e);
                }
            }
        }

        if frames == 0 {
            return Err(InspectError::Empty);
        }

        let duration_ms = if sample_rate > 0 {
            frames * 1000 / sample_rate as u64
        } else {
            0
        };

        Ok(AudioInfo {
            sample_rate,
            channels,
            frames,
            duration_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::audio::encode_pcm16_wav;

    #[test]
    fn test_inspect_one_second_mono() {
        let wav = encode_pcm16_wav(&vec![0i16; 16000], 16000, 1);

        let info = WavInspector::new().inspect(&wav).unwrap();
        assert_eq!(info.sample_rate, 16000);
        assert_eq!(info.channels, 1);
        assert_eq!(info.frames, 16000);
        assert!(info.duration_ms >= 990 && info.duration_ms <= 1010); // ~1000ms
    }

    #[test]
    fn test_inspect_stereo_counts_frames_per_channel() {
        let wav = encode_pcm16_wav(&vec![0i16; 2 * 8000], 8000, 2);

        let info = WavInspector::new().inspect(&wav).unwrap();
        assert_eq!(info.channels, 2);
        assert_eq!(info.frames, 8000);
    }

    #[test]
    fn test_rejects_garbage_and_empty() {
        let inspector = WavInspector::new();
        assert!(matches!(inspector.inspect(&[]), Err(InspectError::Empty)));
        assert!(inspector.inspect(b"definitely not audio").is_err());
    }
}
